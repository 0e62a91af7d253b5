//! Process-wide (per toolkit) global attributes.
//!
//! A handful of global names act as theme-tracked defaults: a class default
//! equal to one of these names resolves through the global table at use time.

use trellis_core::alloc::HashMap;

/// Global names that descriptor defaults may track.
const DYNAMIC_DEFAULTS: &[&str] = &[
    "DLGBGCOLOR",
    "DLGFGCOLOR",
    "TXTBGCOLOR",
    "TXTFGCOLOR",
    "TXTHLCOLOR",
    "LINKFGCOLOR",
    "MENUBGCOLOR",
    "MENUFGCOLOR",
    "DEFAULTFONT",
    "DEFAULTFONTFACE",
    "DEFAULTFONTSIZE",
    "DEFAULTFONTSTYLE",
];

/// Returns true if `name` is one of the theme-tracked global names.
pub fn is_global_default_dynamic(name: &str) -> bool {
    DYNAMIC_DEFAULTS.contains(&name)
}

/// Global attribute table plus the snapshot taken at toolkit start-up.
#[derive(Debug, Default, Clone)]
pub struct GlobalAttributes {
    values: HashMap<String, String>,
    initial: HashMap<String, String>,
}

impl GlobalAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in values for the dynamic defaults, used when no driver
    /// bootstraps the table.
    pub fn with_builtin_theme() -> Self {
        let mut globals = Self::new();
        for (name, value) in [
            ("DLGBGCOLOR", "240 240 240"),
            ("DLGFGCOLOR", "0 0 0"),
            ("TXTBGCOLOR", "255 255 255"),
            ("TXTFGCOLOR", "0 0 0"),
            ("TXTHLCOLOR", "0 120 215"),
            ("LINKFGCOLOR", "0 0 238"),
            ("MENUBGCOLOR", "240 240 240"),
            ("MENUFGCOLOR", "0 0 0"),
            ("DEFAULTFONT", "Sans, 10"),
            ("DEFAULTFONTFACE", "Sans"),
            ("DEFAULTFONTSIZE", "10"),
            ("DEFAULTFONTSTYLE", ""),
        ] {
            globals.set(name, Some(value));
        }
        globals.snapshot();
        globals
    }

    /// Set (or with `None`, remove) a global attribute.
    pub fn set(&mut self, name: &str, value: Option<&str>) {
        match value {
            Some(value) => {
                self.values.insert(name.to_string(), value.to_string());
            }
            None => {
                self.values.remove(name);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Record the current dynamic-default values as the start-up state.
    pub fn snapshot(&mut self) {
        self.initial = DYNAMIC_DEFAULTS
            .iter()
            .filter_map(|name| {
                self.values
                    .get(*name)
                    .map(|value| (name.to_string(), value.clone()))
            })
            .collect();
    }

    /// Returns true if the global has changed since the last [`snapshot`](Self::snapshot).
    pub fn default_changed(&self, name: &str) -> bool {
        match (self.values.get(name), self.initial.get(name)) {
            (Some(now), Some(then)) => !now.eq_ignore_ascii_case(then),
            (None, None) => false,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dynamic_names() {
        assert!(is_global_default_dynamic("DLGBGCOLOR"));
        assert!(is_global_default_dynamic("DEFAULTFONT"));
        assert!(!is_global_default_dynamic("BGCOLOR"));
        assert!(!is_global_default_dynamic("dlgbgcolor"));
    }

    #[test]
    fn test_default_changed_after_snapshot() {
        let mut globals = GlobalAttributes::with_builtin_theme();
        assert!(!globals.default_changed("DLGBGCOLOR"));

        globals.set("DLGBGCOLOR", Some("30 30 30"));
        assert!(globals.default_changed("DLGBGCOLOR"));

        globals.snapshot();
        assert!(!globals.default_changed("DLGBGCOLOR"));
    }

    #[test]
    fn test_remove_global() {
        let mut globals = GlobalAttributes::with_builtin_theme();
        globals.set("TXTHLCOLOR", None);
        assert_eq!(globals.get("TXTHLCOLOR"), None);
        assert!(globals.default_changed("TXTHLCOLOR"));
    }
}
