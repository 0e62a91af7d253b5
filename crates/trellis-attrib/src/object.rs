//! Widget instances.

use crate::class::ClassId;
use crate::toolkit::Toolkit;
use indexmap::IndexMap;
use std::any::Any;
use std::fmt;
use std::rc::Rc;
use trellis_core::alloc::HashMap;
use trellis_core::alloc::sparse_set::IndexSlot;

/// Handle to a widget instance.
///
/// Handles are generational: once the object is destroyed every copy of the
/// handle reports "not live", even if the slot is reused by a new object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub(crate) IndexSlot);

impl ObjectId {
    pub fn index(&self) -> u32 {
        self.0.index()
    }

    pub fn generation(&self) -> u32 {
        self.0.generation()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({}v{})", self.index(), self.generation())
    }
}

/// Opaque token for a realized native element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeHandle(pub u64);

/// Event callback bound to an object.
pub type Callback = Rc<dyn Fn(&mut Toolkit, ObjectId)>;

/// One live widget.
pub struct Object {
    pub(crate) class: ClassId,
    /// Instance-local string attributes, in insertion order.
    pub(crate) store: IndexMap<String, String>,
    pub(crate) native: Option<NativeHandle>,
    pub(crate) parent: Option<ObjectId>,
    pub(crate) children: Vec<ObjectId>,
    pub(crate) callbacks: HashMap<String, Callback>,
    /// Class-private data, dropped on destroy.
    pub(crate) data: Option<Box<dyn Any>>,
}

impl Object {
    pub(crate) fn new(class: ClassId) -> Self {
        Self {
            class,
            store: IndexMap::new(),
            native: None,
            parent: None,
            children: Vec::new(),
            callbacks: HashMap::new(),
            data: None,
        }
    }

    pub fn class(&self) -> ClassId {
        self.class
    }

    pub fn is_mapped(&self) -> bool {
        self.native.is_some()
    }

    pub fn native(&self) -> Option<NativeHandle> {
        self.native
    }

    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }

    pub fn stored(&self, name: &str) -> Option<&str> {
        self.store.get(name).map(String::as_str)
    }

    pub fn stored_attributes(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.store.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("class", &self.class)
            .field("store", &self.store)
            .field("native", &self.native)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("callbacks", &self.callbacks.keys().collect::<Vec<_>>())
            .field("data", &self.data.is_some())
            .finish()
    }
}
