//! Attribute descriptors: the per-class behaviour contract for one name.

use crate::flags::AttribFlags;
use crate::globals::{GlobalAttributes, is_global_default_dynamic};
use crate::object::ObjectId;
use crate::toolkit::Toolkit;
use crate::value::AttrValue;
use std::fmt;
use std::rc::Rc;

/// Reads a plain attribute.
pub type PlainGetter = Rc<dyn Fn(&Toolkit, ObjectId) -> Option<AttrValue>>;
/// Writes a plain attribute. Returns true if the caller should also cache the
/// string in the instance-local store.
pub type PlainSetter = Rc<dyn Fn(&mut Toolkit, ObjectId, Option<&AttrValue>) -> bool>;
pub type IdGetter = Rc<dyn Fn(&Toolkit, ObjectId, i32) -> Option<AttrValue>>;
pub type IdSetter = Rc<dyn Fn(&mut Toolkit, ObjectId, i32, Option<&AttrValue>) -> bool>;
pub type Id2Getter = Rc<dyn Fn(&Toolkit, ObjectId, i32, i32) -> Option<AttrValue>>;
pub type Id2Setter = Rc<dyn Fn(&mut Toolkit, ObjectId, i32, i32, Option<&AttrValue>) -> bool>;

/// Wrap a closure as a plain getter.
pub fn getter<F>(f: F) -> Option<PlainGetter>
where
    F: Fn(&Toolkit, ObjectId) -> Option<AttrValue> + 'static,
{
    Some(Rc::new(f))
}

/// Wrap a closure as a plain setter.
pub fn setter<F>(f: F) -> Option<PlainSetter>
where
    F: Fn(&mut Toolkit, ObjectId, Option<&AttrValue>) -> bool + 'static,
{
    Some(Rc::new(f))
}

pub fn id_getter<F>(f: F) -> Option<IdGetter>
where
    F: Fn(&Toolkit, ObjectId, i32) -> Option<AttrValue> + 'static,
{
    Some(Rc::new(f))
}

pub fn id_setter<F>(f: F) -> Option<IdSetter>
where
    F: Fn(&mut Toolkit, ObjectId, i32, Option<&AttrValue>) -> bool + 'static,
{
    Some(Rc::new(f))
}

pub fn id2_getter<F>(f: F) -> Option<Id2Getter>
where
    F: Fn(&Toolkit, ObjectId, i32, i32) -> Option<AttrValue> + 'static,
{
    Some(Rc::new(f))
}

pub fn id2_setter<F>(f: F) -> Option<Id2Setter>
where
    F: Fn(&mut Toolkit, ObjectId, i32, i32, Option<&AttrValue>) -> bool + 'static,
{
    Some(Rc::new(f))
}

/// Getter/setter pair in one of the three call shapes.
#[derive(Clone)]
pub enum Accessors {
    Plain {
        get: Option<PlainGetter>,
        set: Option<PlainSetter>,
    },
    Id {
        get: Option<IdGetter>,
        set: Option<IdSetter>,
    },
    Id2 {
        get: Option<Id2Getter>,
        set: Option<Id2Setter>,
    },
}

impl Accessors {
    pub fn none() -> Self {
        Accessors::Plain {
            get: None,
            set: None,
        }
    }

    pub fn has_getter(&self) -> bool {
        match self {
            Accessors::Plain { get, .. } => get.is_some(),
            Accessors::Id { get, .. } => get.is_some(),
            Accessors::Id2 { get, .. } => get.is_some(),
        }
    }

    pub fn has_setter(&self) -> bool {
        match self {
            Accessors::Plain { set, .. } => set.is_some(),
            Accessors::Id { set, .. } => set.is_some(),
            Accessors::Id2 { set, .. } => set.is_some(),
        }
    }

    /// Make `flags` agree with the call shape: id shapes force their implied
    /// flags, the plain shape drops stray id flags.
    pub(crate) fn normalize(&self, flags: AttribFlags) -> AttribFlags {
        let bare = flags - (AttribFlags::HAS_ID | AttribFlags::HAS_ID2);
        match self {
            Accessors::Plain { .. } => bare,
            Accessors::Id { .. } => bare | AttribFlags::ID_IMPLIED,
            Accessors::Id2 { .. } => bare | AttribFlags::ID2_IMPLIED,
        }
    }
}

impl fmt::Debug for Accessors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = match self {
            Accessors::Plain { .. } => "Plain",
            Accessors::Id { .. } => "Id",
            Accessors::Id2 { .. } => "Id2",
        };
        f.debug_struct(shape)
            .field("get", &self.has_getter())
            .field("set", &self.has_setter())
            .finish()
    }
}

/// Default requested at registration time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AttrDefault {
    #[default]
    Unset,
    /// Use the system default given alongside.
    SameAsSystem,
    Value(String),
}

impl From<&str> for AttrDefault {
    fn from(s: &str) -> Self {
        AttrDefault::Value(s.to_string())
    }
}

impl From<String> for AttrDefault {
    fn from(s: String) -> Self {
        AttrDefault::Value(s)
    }
}

impl From<Option<&str>> for AttrDefault {
    fn from(s: Option<&str>) -> Self {
        s.map_or(AttrDefault::Unset, AttrDefault::from)
    }
}

/// Resolved default of a descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    Static(String),
    /// Read the named global attribute every time the default is needed.
    TracksGlobal(String),
}

impl DefaultValue {
    fn classify(value: String) -> Self {
        if is_global_default_dynamic(&value) {
            DefaultValue::TracksGlobal(value)
        } else {
            DefaultValue::Static(value)
        }
    }

    /// The registered text: the literal default or the global attribute name.
    pub fn raw(&self) -> &str {
        match self {
            DefaultValue::Static(s) | DefaultValue::TracksGlobal(s) => s,
        }
    }

    pub fn resolve(&self, globals: &GlobalAttributes) -> Option<String> {
        match self {
            DefaultValue::Static(s) => Some(s.clone()),
            DefaultValue::TracksGlobal(key) => globals.get(key).map(str::to_string),
        }
    }
}

/// Registration record for one attribute name on one class.
#[derive(Clone)]
pub struct AttribDescriptor {
    pub(crate) accessors: Accessors,
    pub(crate) default_value: Option<DefaultValue>,
    pub(crate) system_default: Option<String>,
    pub(crate) flags: AttribFlags,
}

impl AttribDescriptor {
    pub(crate) fn new(
        accessors: Accessors,
        default: AttrDefault,
        system_default: Option<&str>,
        flags: AttribFlags,
    ) -> Self {
        let flags = accessors.normalize(flags);
        let mut descriptor = Self {
            accessors,
            default_value: None,
            system_default: system_default.map(str::to_string),
            flags,
        };
        descriptor.set_default(default);
        descriptor
    }

    pub(crate) fn set_default(&mut self, default: AttrDefault) {
        self.default_value = match default {
            AttrDefault::Unset => None,
            AttrDefault::SameAsSystem => self.system_default.clone().map(DefaultValue::classify),
            AttrDefault::Value(value) => Some(DefaultValue::classify(value)),
        };
    }

    pub fn accessors(&self) -> &Accessors {
        &self.accessors
    }

    pub fn flags(&self) -> AttribFlags {
        self.flags
    }

    pub fn default_value(&self) -> Option<&DefaultValue> {
        self.default_value.as_ref()
    }

    pub fn system_default(&self) -> Option<&str> {
        self.system_default.as_deref()
    }

    pub fn is_callback(&self) -> bool {
        self.flags.contains(AttribFlags::CALLBACK)
    }

    pub fn calls_global_default(&self) -> bool {
        matches!(self.default_value, Some(DefaultValue::TracksGlobal(_)))
    }

    pub fn resolve_default(&self, globals: &GlobalAttributes) -> Option<String> {
        self.default_value.as_ref().and_then(|d| d.resolve(globals))
    }

    /// Returns true if the accessor may run given the object's realization state.
    pub(crate) fn can_get(&self, mapped: bool) -> bool {
        self.accessors.has_getter() && (mapped || self.flags.allows_unmapped())
    }

    pub(crate) fn can_set(&self, mapped: bool) -> bool {
        self.accessors.has_setter() && (mapped || self.flags.allows_unmapped())
    }
}

impl fmt::Debug for AttribDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttribDescriptor")
            .field("accessors", &self.accessors)
            .field("default_value", &self.default_value)
            .field("system_default", &self.system_default)
            .field("flags", &self.flags)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_as_system_copies_system_default() {
        let d = AttribDescriptor::new(
            Accessors::none(),
            AttrDefault::SameAsSystem,
            Some("YES"),
            AttribFlags::NONE,
        );
        assert_eq!(d.default_value(), Some(&DefaultValue::Static("YES".into())));
        assert_eq!(d.system_default(), Some("YES"));
    }

    #[test]
    fn test_global_name_default_tracks_global() {
        let d = AttribDescriptor::new(
            Accessors::none(),
            "DLGBGCOLOR".into(),
            Some("DLGBGCOLOR"),
            AttribFlags::NONE,
        );
        assert!(d.calls_global_default());

        let mut globals = GlobalAttributes::new();
        globals.set("DLGBGCOLOR", Some("10 20 30"));
        assert_eq!(d.resolve_default(&globals).as_deref(), Some("10 20 30"));
        globals.set("DLGBGCOLOR", Some("1 2 3"));
        assert_eq!(d.resolve_default(&globals).as_deref(), Some("1 2 3"));
    }

    #[test]
    fn test_plain_shape_drops_id_flags() {
        let d = AttribDescriptor::new(
            Accessors::none(),
            AttrDefault::Unset,
            None,
            AttribFlags::HAS_ID | AttribFlags::NO_SAVE,
        );
        assert_eq!(d.flags(), AttribFlags::NO_SAVE);
    }

    #[test]
    fn test_id_shape_forces_implied_flags() {
        let accessors = Accessors::Id {
            get: None,
            set: None,
        };
        let d = AttribDescriptor::new(accessors, AttrDefault::Unset, None, AttribFlags::NOT_MAPPED);
        assert!(d.flags().contains(AttribFlags::ID_IMPLIED | AttribFlags::NOT_MAPPED));
        assert!(!d.flags().is_inheritable());
    }
}
