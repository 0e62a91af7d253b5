//! Widget classes and their attribute tables.

use crate::descriptor::{
    Accessors, AttrDefault, AttribDescriptor, Id2Getter, Id2Setter, IdGetter, IdSetter,
    PlainGetter, PlainSetter,
};
use crate::flags::AttribFlags;
use crate::object::{NativeHandle, ObjectId};
use crate::toolkit::Toolkit;
use crate::value::AttrValue;
use indexmap::IndexMap;
use std::fmt;
use std::ops::Range;
use std::rc::Rc;

/// Identifier of a class inside a [`ClassRegistry`](crate::ClassRegistry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId(pub(crate) usize);

/// Which `Name<id>` forms a class accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexingMode {
    #[default]
    None,
    Single,
    Double,
}

/// Native category of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NativeType {
    /// No native element (layout boxes, timers).
    #[default]
    Void,
    Control,
    Canvas,
    /// Top-level window; hidden before it is destroyed.
    Dialog,
}

/// Class construction. May fail, in which case the object is torn down.
pub type CreateHook = Rc<dyn Fn(&mut Toolkit, ObjectId, &[AttrValue]) -> Result<(), String>>;
/// Realizes the native side of an object.
pub type MapHook = Rc<dyn Fn(&mut Toolkit, ObjectId) -> Result<NativeHandle, String>>;
/// Teardown and unmap notification.
pub type ObjectHook = Rc<dyn Fn(&mut Toolkit, ObjectId)>;
/// Returns true if this object must not save this attribute.
pub type NoSaveHook = Rc<dyn Fn(&Toolkit, ObjectId, &str) -> bool>;
/// Live id range of an object along one dimension.
pub type IdRangeHook = Rc<dyn Fn(&Toolkit, ObjectId) -> Range<i32>>;

/// Class-specific behaviour around the object lifecycle.
#[derive(Clone, Default)]
pub struct ClassHooks {
    pub create: Option<CreateHook>,
    pub map: Option<MapHook>,
    pub unmap: Option<ObjectHook>,
    pub destroy: Option<ObjectHook>,
    pub no_save: Option<NoSaveHook>,
    /// Items, or lines for double-id classes.
    pub id_range: Option<IdRangeHook>,
    /// Columns of double-id classes.
    pub id2_range: Option<IdRangeHook>,
}

impl fmt::Debug for ClassHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassHooks")
            .field("create", &self.create.is_some())
            .field("map", &self.map.is_some())
            .field("unmap", &self.unmap.is_some())
            .field("destroy", &self.destroy.is_some())
            .field("no_save", &self.no_save.is_some())
            .field("id_range", &self.id_range.is_some())
            .field("id2_range", &self.id2_range.is_some())
            .finish()
    }
}

/// One kind of widget, shared by all of its instances.
#[derive(Debug, Clone)]
pub struct WidgetClass {
    name: String,
    parent: Option<String>,
    native_type: NativeType,
    indexing: IndexingMode,
    attributes: IndexMap<String, AttribDescriptor>,
    hooks: ClassHooks,
}

impl WidgetClass {
    pub fn new(name: impl Into<String>, native_type: NativeType, indexing: IndexingMode) -> Self {
        Self {
            name: name.into(),
            parent: None,
            native_type,
            indexing,
            attributes: IndexMap::new(),
            hooks: ClassHooks::default(),
        }
    }

    /// A new class starting from a copy of `parent`'s attributes and hooks.
    pub fn derive(name: impl Into<String>, parent: &WidgetClass) -> Self {
        let mut class = parent.clone();
        class.name = name.into();
        class.parent = Some(parent.name.clone());
        class
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent_name(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn native_type(&self) -> NativeType {
        self.native_type
    }

    pub fn indexing(&self) -> IndexingMode {
        self.indexing
    }

    pub fn hooks(&self) -> &ClassHooks {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut ClassHooks {
        &mut self.hooks
    }

    /// Register (or replace) a plain attribute. Flags are taken as given,
    /// apart from id flags which a plain accessor cannot honour.
    pub fn register_attribute(
        &mut self,
        name: &str,
        get: Option<PlainGetter>,
        set: Option<PlainSetter>,
        default: impl Into<AttrDefault>,
        system_default: Option<&str>,
        flags: AttribFlags,
    ) {
        let accessors = Accessors::Plain { get, set };
        self.insert(
            name,
            AttribDescriptor::new(accessors, default.into(), system_default, flags),
        );
    }

    /// Register (or replace) a single-id attribute.
    pub fn register_attribute_id(
        &mut self,
        name: &str,
        get: Option<IdGetter>,
        set: Option<IdSetter>,
        flags: AttribFlags,
    ) {
        let accessors = Accessors::Id { get, set };
        self.insert(
            name,
            AttribDescriptor::new(accessors, AttrDefault::Unset, None, flags),
        );
    }

    /// Register (or replace) a double-id attribute.
    pub fn register_attribute_id2(
        &mut self,
        name: &str,
        get: Option<Id2Getter>,
        set: Option<Id2Setter>,
        flags: AttribFlags,
    ) {
        let accessors = Accessors::Id2 { get, set };
        self.insert(
            name,
            AttribDescriptor::new(accessors, AttrDefault::Unset, None, flags),
        );
    }

    /// Register a callback slot; the default is its parameter format.
    pub fn register_callback(&mut self, name: &str, format: &str) {
        self.insert(
            name,
            AttribDescriptor::new(
                Accessors::none(),
                format.into(),
                None,
                AttribFlags::CALLBACK | AttribFlags::NO_INHERIT | AttribFlags::NOT_MAPPED,
            ),
        );
    }

    fn insert(&mut self, name: &str, descriptor: AttribDescriptor) {
        tracing::trace!(class = %self.name, attribute = name, flags = ?descriptor.flags, "Registering attribute");
        // Replacing keeps the original registration position.
        self.attributes.insert(name.to_string(), descriptor);
    }

    /// Replace only the default pair. Returns false if `name` is not registered.
    pub fn replace_default(
        &mut self,
        name: &str,
        default: impl Into<AttrDefault>,
        system_default: Option<&str>,
    ) -> bool {
        let Some(descriptor) = self.attributes.get_mut(name) else {
            return false;
        };
        descriptor.system_default = system_default.map(str::to_string);
        descriptor.set_default(default.into());
        true
    }

    /// Replace only the accessors, keeping defaults and non-id flags.
    pub fn replace_accessors(&mut self, name: &str, accessors: Accessors) -> bool {
        let Some(descriptor) = self.attributes.get_mut(name) else {
            return false;
        };
        descriptor.flags = accessors.normalize(descriptor.flags);
        descriptor.accessors = accessors;
        true
    }

    /// Replace only the flags; the accessor shape still decides the id flags.
    pub fn replace_flags(&mut self, name: &str, flags: AttribFlags) -> bool {
        let Some(descriptor) = self.attributes.get_mut(name) else {
            return false;
        };
        descriptor.flags = descriptor.accessors.normalize(flags);
        true
    }

    /// Change the default of a registered attribute, or register a
    /// default-only attribute if `name` is unknown.
    pub fn set_default_attribute(&mut self, name: &str, default: impl Into<AttrDefault>) {
        let default = default.into();
        match self.attributes.get_mut(name) {
            Some(descriptor) => {
                let locked = AttribFlags::NO_DEFAULT_VALUE
                    | AttribFlags::READ_ONLY
                    | AttribFlags::WRITE_ONLY;
                if descriptor.flags.intersects(locked) {
                    tracing::debug!(class = %self.name, attribute = name, "Default is locked, ignoring");
                    return;
                }
                descriptor.set_default(default);
            }
            None => {
                if default != AttrDefault::Unset {
                    self.register_attribute(name, None, None, default, None, AttribFlags::NONE);
                }
            }
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&AttribDescriptor> {
        self.attributes.get(name)
    }

    /// Registered attributes in registration order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &AttribDescriptor)> + '_ {
        self.attributes.iter().map(|(name, d)| (name.as_str(), d))
    }

    pub(crate) fn snapshot(&self) -> Vec<(String, AttribDescriptor)> {
        self.attributes
            .iter()
            .map(|(name, d)| (name.clone(), d.clone()))
            .collect()
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }
}
