//! Object lifecycle: creation, tree structure, realization and teardown.

use crate::class::NativeType;
use crate::descriptor::{Accessors, AttribDescriptor};
use crate::error::{AttribError, AttribResult};
use crate::flags::AttribFlags;
use crate::name::is_internal;
use crate::object::{Object, ObjectId};
use crate::toolkit::Toolkit;
use crate::value::{AttrValue, eq_no_case};
use tracing::{debug, warn};
use trellis_core::alloc::HashSet;
use trellis_core::profiling::profile_function;

/// Callback run before an object's children are destroyed.
pub const DESTROY_CB: &str = "DESTROY_CB";
/// Callback run after the object has been detached from its parent.
pub const LDESTROY_CB: &str = "LDESTROY_CB";

impl Toolkit {
    pub fn create(&mut self, class: &str) -> AttribResult<ObjectId> {
        self.create_with_params(class, &[])
    }

    /// Create an object of `class`.
    ///
    /// Without a create hook, `Handle` parameters are appended as children.
    /// If construction fails the object is discarded and never escapes.
    pub fn create_with_params(&mut self, class: &str, params: &[AttrValue]) -> AttribResult<ObjectId> {
        profile_function!();
        let class_id = self
            .classes
            .class_id(class)
            .ok_or_else(|| AttribError::ClassNotFound {
                name: class.to_string(),
            })?;
        let id = ObjectId(self.objects.push(Object::new(class_id)));

        let create = self.classes.get(class_id).hooks().create.clone();
        let result = match create {
            Some(create) => create(self, id, params),
            None => self.append_params(id, params),
        };
        if let Err(reason) = result {
            warn!(class, %id, %reason, "Construction failed");
            self.discard(id);
            return Err(AttribError::ConstructionFailed {
                class: class.to_string(),
                reason,
            });
        }

        if self.config.apply_defaults_on_create {
            self.ensure_default_attributes(id)?;
        }
        debug!(class, %id, "Created object");
        Ok(id)
    }

    fn append_params(&mut self, id: ObjectId, params: &[AttrValue]) -> Result<(), String> {
        for child in params.iter().filter_map(AttrValue::as_handle) {
            self.append(id, child).map_err(|err| err.to_string())?;
        }
        Ok(())
    }

    /// Drop a half-built object, releasing anything it linked to.
    fn discard(&mut self, id: ObjectId) {
        for child in self.children(id) {
            self.unlink(id, child);
        }
        if let Some(parent) = self.parent(id) {
            self.unlink(parent, id);
        }
        self.names.retain(|_, bound| *bound != id);
        self.objects.try_remove(id.0);
    }

    /// Apply every default that differs from the system default, or that
    /// tracks a global changed since start-up. Only descriptors usable in
    /// the object's current realization state are considered.
    pub(crate) fn ensure_default_attributes(&mut self, id: ObjectId) -> AttribResult<()> {
        let object = self.object(id)?;
        let mapped = object.is_mapped();
        let descriptors = self.classes.get(object.class).snapshot();

        for (name, descriptor) in descriptors {
            if !self.needs_default(id, &name, &descriptor, mapped) {
                continue;
            }
            let Accessors::Plain { set: Some(set), .. } = descriptor.accessors().clone() else {
                continue;
            };
            let Some(value) = descriptor.resolve_default(&self.globals) else {
                continue;
            };
            if self.config.trace_dispatch {
                tracing::trace!(%id, attribute = %name, %value, "Applying default");
            }
            set(self, id, Some(&AttrValue::Text(value)));
        }
        Ok(())
    }

    fn needs_default(&self, id: ObjectId, name: &str, descriptor: &AttribDescriptor, mapped: bool) -> bool {
        let flags = descriptor.flags();
        if flags.is_indexed()
            || flags.intersects(AttribFlags::READ_ONLY | AttribFlags::CALLBACK | AttribFlags::NO_STRING)
            || flags.contains(AttribFlags::NOT_MAPPED) == mapped
            || !descriptor.accessors().has_setter()
            || self.stored(id, name).is_some()
        {
            return false;
        }
        let Some(default) = descriptor.default_value() else {
            return false;
        };
        let differs = descriptor
            .system_default()
            .is_none_or(|system| !eq_no_case(default.raw(), system));
        differs || (descriptor.calls_global_default() && self.globals.default_changed(default.raw()))
    }

    /// Realize an object and its subtree.
    ///
    /// Runs the class map hook, applies mapped-only defaults, pushes stored
    /// and inherited strings to the native side, then maps the children.
    pub fn map(&mut self, id: ObjectId) -> AttribResult<()> {
        profile_function!();
        let object = self.object(id)?;
        if object.is_mapped() {
            return Ok(());
        }
        let class = self.classes.get(object.class);
        let hook = class.hooks().map.clone();

        let native = match hook {
            Some(map) => match map(self, id) {
                Ok(native) => native,
                Err(reason) => {
                    let class = self.class_of(id)?.name().to_string();
                    warn!(%class, %id, %reason, "Map failed");
                    return Err(AttribError::MapFailed { class, reason });
                }
            },
            None => self.allocate_native(),
        };
        self.object_mut(id)?.native = Some(native);
        debug!(%id, ?native, "Mapped object");

        self.ensure_default_attributes(id)?;
        self.apply_stored_attributes(id)?;
        self.apply_inherited_attributes(id)?;

        for child in self.children(id) {
            self.map(child)?;
        }
        Ok(())
    }

    /// Re-dispatch the instance-local store. Entries the setter declines to
    /// keep are removed.
    fn apply_stored_attributes(&mut self, id: ObjectId) -> AttribResult<()> {
        let stored: Vec<(String, String)> = self
            .object(id)?
            .stored_attributes()
            .filter(|(name, _)| !is_internal(name))
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        for (name, value) in stored {
            let outcome = self.class_set_attribute(id, &name, Some(&AttrValue::Text(value)))?;
            if !outcome.should_store() {
                self.store_set(id, &name, None)?;
            }
        }
        Ok(())
    }

    /// Apply inheritable strings stored on ancestors, nearest first, unless
    /// the object has its own value.
    fn apply_inherited_attributes(&mut self, id: ObjectId) -> AttribResult<()> {
        let mut seen = HashSet::new();
        let mut current = self.parent(id);
        let mut depth = 1;
        while let Some(ancestor) = current {
            if depth > self.config.max_inherit_depth {
                warn!(%id, depth, "Ancestor chain too deep, inherited attributes truncated");
                break;
            }
            let stored: Vec<(String, String)> = self
                .object(ancestor)?
                .stored_attributes()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect();
            for (name, value) in stored {
                if is_internal(&name) || !seen.insert(name.clone()) || self.stored(id, &name).is_some() {
                    continue;
                }
                if self.attribute_info(id, &name)?.inheritable {
                    self.class_set_attribute(id, &name, Some(&AttrValue::Text(value)))?;
                }
            }
            current = self.parent(ancestor);
            depth += 1;
        }
        Ok(())
    }

    /// Release the native side of an object, children first.
    pub fn unmap(&mut self, id: ObjectId) -> AttribResult<()> {
        if !self.object(id)?.is_mapped() {
            return Ok(());
        }
        for child in self.children(id) {
            self.unmap(child)?;
        }
        let unmap = self.class_of(id)?.hooks().unmap.clone();
        if let Some(unmap) = unmap {
            unmap(self, id);
        }
        self.object_mut(id)?.native = None;
        debug!(%id, "Unmapped object");
        Ok(())
    }

    /// Append `child` as the last child of `parent`.
    pub fn append(&mut self, parent: ObjectId, child: ObjectId) -> AttribResult<()> {
        self.object(parent)?;
        let has_parent = self.object(child)?.parent.is_some();
        if child == parent || has_parent || self.is_ancestor(child, parent) {
            return Err(AttribError::InvalidParent { child, parent });
        }
        self.object_mut(parent)?.children.push(child);
        self.object_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Remove an object from its parent, unmapping it first.
    pub fn detach(&mut self, id: ObjectId) -> AttribResult<()> {
        if self.object(id)?.is_mapped() {
            self.unmap(id)?;
        }
        let parent = self.object(id)?.parent;
        if let Some(parent) = parent {
            self.unlink(parent, id);
        }
        Ok(())
    }

    fn unlink(&mut self, parent: ObjectId, child: ObjectId) {
        if let Ok(parent) = self.object_mut(parent) {
            parent.children.retain(|c| *c != child);
        }
        if let Ok(child) = self.object_mut(child) {
            child.parent = None;
        }
    }

    fn is_ancestor(&self, ancestor: ObjectId, id: ObjectId) -> bool {
        let mut current = self.parent(id);
        let mut steps = 0;
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            steps += 1;
            if steps > self.objects.len() {
                return false;
            }
            current = self.parent(node);
        }
        false
    }

    /// Destroy an object and its whole subtree.
    ///
    /// Order: hide a mapped dialog, `DESTROY_CB`, destroy children (always
    /// the current first child), detach, `LDESTROY_CB`, drop handle names,
    /// class destroy hook, drop private data, release the handle.
    pub fn destroy(&mut self, id: ObjectId) -> AttribResult<()> {
        profile_function!();
        let class = self.class_of(id)?;
        let is_dialog = class.native_type() == NativeType::Dialog;
        let destroy_hook = class.hooks().destroy.clone();

        if is_dialog && self.is_mapped(id) {
            self.set_attribute(id, "VISIBLE", Some("NO"))?;
        }
        self.call_callback(id, DESTROY_CB);

        loop {
            let Some(child) = self.object(id)?.children.first().copied() else {
                break;
            };
            self.destroy(child)?;
        }

        self.detach(id)?;
        self.call_callback(id, LDESTROY_CB);
        self.names.retain(|_, bound| *bound != id);

        if let Some(destroy) = destroy_hook {
            destroy(self, id);
        }
        self.object_mut(id)?.data = None;
        self.objects.try_remove(id.0);
        debug!(%id, "Destroyed object");
        Ok(())
    }
}
