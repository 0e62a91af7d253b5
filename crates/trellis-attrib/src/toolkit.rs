//! The toolkit context: classes, objects and globals.

use crate::class::{ClassId, WidgetClass};
use crate::config::Config;
use crate::error::{AttribError, AttribResult};
use crate::globals::GlobalAttributes;
use crate::object::{Callback, NativeHandle, Object, ObjectId};
use crate::registry::ClassRegistry;
use indexmap::IndexMap;
use std::any::Any;
use std::rc::Rc;
use trellis_core::alloc::sparse_set::SparseSet;

/// Owner of every class, object and global attribute.
///
/// All operations take the toolkit explicitly. It is neither `Send` nor
/// `Sync`: accessors are `Rc` closures and the inheritance walk re-enters the
/// dispatcher, so confine a toolkit to one thread (or wrap it in one external
/// lock).
pub struct Toolkit {
    pub(crate) classes: ClassRegistry,
    pub(crate) objects: SparseSet<Object>,
    pub(crate) globals: GlobalAttributes,
    pub(crate) names: IndexMap<String, ObjectId>,
    pub(crate) config: Config,
    next_native: u64,
}

impl Default for Toolkit {
    fn default() -> Self {
        Self::new()
    }
}

impl Toolkit {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self::with_globals(config, GlobalAttributes::with_builtin_theme())
    }

    /// Start with a driver-provided global table. The table's current
    /// dynamic defaults become the start-up snapshot.
    pub fn with_globals(config: Config, mut globals: GlobalAttributes) -> Self {
        globals.snapshot();
        Self {
            classes: ClassRegistry::new(),
            objects: SparseSet::new(),
            globals,
            names: IndexMap::new(),
            config,
            next_native: 1,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn classes(&self) -> &ClassRegistry {
        &self.classes
    }

    /// Mutable access to the class registry, e.g. to override class defaults.
    pub fn classes_mut(&mut self) -> &mut ClassRegistry {
        &mut self.classes
    }

    pub fn register_class(&mut self, class: WidgetClass) -> AttribResult<ClassId> {
        self.classes.register(class)
    }

    pub fn globals(&self) -> &GlobalAttributes {
        &self.globals
    }

    pub fn globals_mut(&mut self) -> &mut GlobalAttributes {
        &mut self.globals
    }

    pub fn set_global(&mut self, name: &str, value: Option<&str>) {
        self.globals.set(name, value);
    }

    pub fn global(&self, name: &str) -> Option<&str> {
        self.globals.get(name)
    }

    /// Returns true while `id` refers to an object that has not been destroyed.
    pub fn is_live(&self, id: ObjectId) -> bool {
        self.objects.contains(id.0)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn object(&self, id: ObjectId) -> AttribResult<&Object> {
        self.objects
            .try_get(id.0)
            .ok_or(AttribError::ObjectNotLive { id })
    }

    pub(crate) fn object_mut(&mut self, id: ObjectId) -> AttribResult<&mut Object> {
        self.objects
            .try_get_mut(id.0)
            .ok_or(AttribError::ObjectNotLive { id })
    }

    pub fn class_of(&self, id: ObjectId) -> AttribResult<&WidgetClass> {
        let class = self.object(id)?.class;
        Ok(self.classes.get(class))
    }

    pub fn parent(&self, id: ObjectId) -> Option<ObjectId> {
        self.object(id).ok().and_then(|o| o.parent)
    }

    pub fn children(&self, id: ObjectId) -> Vec<ObjectId> {
        self.object(id)
            .map(|o| o.children.clone())
            .unwrap_or_default()
    }

    pub fn is_mapped(&self, id: ObjectId) -> bool {
        self.object(id).map(Object::is_mapped).unwrap_or(false)
    }

    pub(crate) fn allocate_native(&mut self) -> NativeHandle {
        let handle = NativeHandle(self.next_native);
        self.next_native += 1;
        handle
    }

    /// Value held in the instance-local store, ignoring descriptors.
    pub fn stored(&self, id: ObjectId, name: &str) -> Option<&str> {
        self.object(id).ok().and_then(|o| o.stored(name))
    }

    /// Instance-local store keys in insertion order.
    pub fn stored_attributes(&self, id: ObjectId) -> Vec<String> {
        self.object(id)
            .map(|o| o.store.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub(crate) fn store_set(&mut self, id: ObjectId, name: &str, value: Option<&str>) -> AttribResult<()> {
        let object = self.object_mut(id)?;
        match value {
            Some(value) => {
                object.store.insert(name.to_string(), value.to_string());
            }
            None => {
                object.store.shift_remove(name);
            }
        }
        Ok(())
    }

    /// Bind a global name to an object, replacing any previous binding.
    pub fn set_handle_name(&mut self, name: &str, id: ObjectId) -> AttribResult<()> {
        self.object(id)?;
        self.names.insert(name.to_string(), id);
        Ok(())
    }

    pub fn handle_by_name(&self, name: &str) -> Option<ObjectId> {
        self.names
            .get(name)
            .copied()
            .filter(|id| self.is_live(*id))
    }

    /// Every name bound to `id`.
    pub fn handle_names(&self, id: ObjectId) -> Vec<String> {
        self.names
            .iter()
            .filter(|(_, bound)| **bound == id)
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn set_callback<F>(&mut self, id: ObjectId, name: &str, callback: F) -> AttribResult<()>
    where
        F: Fn(&mut Toolkit, ObjectId) + 'static,
    {
        self.object_mut(id)?
            .callbacks
            .insert(name.to_string(), Rc::new(callback));
        Ok(())
    }

    pub fn remove_callback(&mut self, id: ObjectId, name: &str) -> AttribResult<()> {
        self.object_mut(id)?.callbacks.remove(name);
        Ok(())
    }

    pub fn callback(&self, id: ObjectId, name: &str) -> Option<Callback> {
        self.object(id).ok()?.callbacks.get(name).cloned()
    }

    /// Invoke a callback if it is bound. Returns true if one ran.
    pub fn call_callback(&mut self, id: ObjectId, name: &str) -> bool {
        match self.callback(id, name) {
            Some(cb) => {
                cb(self, id);
                true
            }
            None => false,
        }
    }

    /// Attach class-private data, replacing any previous block.
    pub fn set_data<T: Any>(&mut self, id: ObjectId, data: T) -> AttribResult<()> {
        self.object_mut(id)?.data = Some(Box::new(data));
        Ok(())
    }

    pub fn data<T: Any>(&self, id: ObjectId) -> Option<&T> {
        self.object(id).ok()?.data.as_ref()?.downcast_ref()
    }

    pub fn data_mut<T: Any>(&mut self, id: ObjectId) -> Option<&mut T> {
        self.object_mut(id).ok()?.data.as_mut()?.downcast_mut()
    }
}
