//! The set of registered widget classes.

use crate::class::{ClassId, WidgetClass};
use crate::descriptor::{AttrDefault, AttribDescriptor};
use crate::error::{AttribError, AttribResult};
use crate::flags::AttribFlags;
use indexmap::IndexMap;

/// Owns every registered [`WidgetClass`].
///
/// Classes are never removed, so a [`ClassId`] stays valid for the lifetime of
/// the registry. Mutating a class after objects exist (for example through
/// [`set_class_default_attribute`](Self::set_class_default_attribute)) affects
/// every later lookup; the registry is not synchronized and belongs to one thread.
#[derive(Debug, Default)]
pub struct ClassRegistry {
    classes: IndexMap<String, WidgetClass>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class. Names are unique.
    pub fn register(&mut self, class: WidgetClass) -> AttribResult<ClassId> {
        if self.classes.contains_key(class.name()) {
            return Err(AttribError::DuplicateClass {
                name: class.name().to_string(),
            });
        }
        tracing::debug!(
            class = class.name(),
            attributes = class.attribute_count(),
            "Registering class"
        );
        let (index, _) = self.classes.insert_full(class.name().to_string(), class);
        Ok(ClassId(index))
    }

    /// Start a new class from a registered one.
    pub fn derive(&self, name: &str, parent: &str) -> AttribResult<WidgetClass> {
        let parent = self.by_name(parent).ok_or_else(|| AttribError::ClassNotFound {
            name: parent.to_string(),
        })?;
        Ok(WidgetClass::derive(name, parent))
    }

    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.classes.get_index_of(name).map(ClassId)
    }

    pub fn get(&self, id: ClassId) -> &WidgetClass {
        &self.classes[id.0]
    }

    pub fn get_mut(&mut self, id: ClassId) -> &mut WidgetClass {
        &mut self.classes[id.0]
    }

    pub fn by_name(&self, name: &str) -> Option<&WidgetClass> {
        self.classes.get(name)
    }

    pub fn by_name_mut(&mut self, name: &str) -> Option<&mut WidgetClass> {
        self.classes.get_mut(name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn descriptor(&self, class: &str, name: &str) -> Option<&AttribDescriptor> {
        self.by_name(class)?.attribute(name)
    }

    /// Flags of a registered attribute; `None` for unknown classes or names.
    pub fn attribute_flags(&self, class: &str, name: &str) -> Option<AttribFlags> {
        self.descriptor(class, name).map(AttribDescriptor::flags)
    }

    /// Attribute names (callbacks excluded) in registration order.
    pub fn list_attributes(&self, class: &str) -> Vec<String> {
        self.list_by(class, |d| !d.is_callback())
    }

    /// Callback names in registration order.
    pub fn list_callbacks(&self, class: &str) -> Vec<String> {
        self.list_by(class, AttribDescriptor::is_callback)
    }

    fn list_by(&self, class: &str, keep: impl Fn(&AttribDescriptor) -> bool) -> Vec<String> {
        self.by_name(class)
            .map(|class| {
                class
                    .attributes()
                    .filter(|(_, d)| keep(*d))
                    .map(|(name, _)| name.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Override a class default for every object created afterwards.
    /// Unknown classes are ignored.
    pub fn set_class_default_attribute(
        &mut self,
        class: &str,
        name: &str,
        default: impl Into<AttrDefault>,
    ) {
        match self.by_name_mut(class) {
            Some(class) => class.set_default_attribute(name, default),
            None => tracing::debug!(class, attribute = name, "Default for unknown class ignored"),
        }
    }

    /// Returns true if `class` is `ancestor` or derives from it.
    pub fn class_matches(&self, class: ClassId, ancestor: ClassId) -> bool {
        let target = self.get(ancestor).name();
        let mut current = Some(self.get(class));
        // Bounded by the class count, in case a parent name was re-registered oddly.
        for _ in 0..=self.classes.len() {
            let Some(c) = current else {
                return false;
            };
            if c.name() == target {
                return true;
            }
            current = c.parent_name().and_then(|p| self.by_name(p));
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::{IndexingMode, NativeType};
    use crate::flags::AttribFlags;

    fn registry() -> ClassRegistry {
        let mut registry = ClassRegistry::new();
        let mut button = WidgetClass::new("button", NativeType::Control, IndexingMode::None);
        button.register_attribute("TITLE", None, None, "", None, AttribFlags::NONE);
        button.register_callback("ACTION", "");
        button.register_attribute("ALIGNMENT", None, None, "ACENTER", Some("ACENTER"), AttribFlags::NONE);
        button.register_callback("ENTERWINDOW_CB", "");
        registry.register(button).unwrap();
        registry
    }

    #[test]
    fn test_duplicate_class_rejected() {
        let mut registry = registry();
        let err = registry
            .register(WidgetClass::new("button", NativeType::Void, IndexingMode::None))
            .unwrap_err();
        assert_eq!(err, AttribError::DuplicateClass { name: "button".into() });
    }

    #[test]
    fn test_list_partition() {
        let registry = registry();
        assert_eq!(registry.list_attributes("button"), vec!["TITLE", "ALIGNMENT"]);
        assert_eq!(registry.list_callbacks("button"), vec!["ACTION", "ENTERWINDOW_CB"]);
        assert!(registry.list_attributes("missing").is_empty());
    }

    #[test]
    fn test_class_matches_derivation() {
        let mut registry = registry();
        let derived = registry.derive("flatbutton", "button").unwrap();
        let flat = registry.register(derived).unwrap();
        let button = registry.class_id("button").unwrap();
        let label = registry
            .register(WidgetClass::new("label", NativeType::Control, IndexingMode::None))
            .unwrap();

        assert!(registry.class_matches(flat, button));
        assert!(registry.class_matches(button, button));
        assert!(!registry.class_matches(button, flat));
        assert!(!registry.class_matches(label, button));
    }

    #[test]
    fn test_set_class_default() {
        let mut registry = registry();
        registry.set_class_default_attribute("button", "ALIGNMENT", "ALEFT");
        let d = registry.descriptor("button", "ALIGNMENT").unwrap();
        assert_eq!(d.default_value().unwrap().raw(), "ALEFT");
        assert_eq!(d.system_default(), Some("ACENTER"));

        registry.set_class_default_attribute("button", "ALIGNMENT", AttrDefault::SameAsSystem);
        let d = registry.descriptor("button", "ALIGNMENT").unwrap();
        assert_eq!(d.default_value().unwrap().raw(), "ACENTER");

        // Unknown class is a silent no-op.
        registry.set_class_default_attribute("missing", "ALIGNMENT", "ALEFT");
    }
}
