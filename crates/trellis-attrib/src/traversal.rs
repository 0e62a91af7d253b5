//! Bulk save and copy over a class's attribute table.

use crate::class::ClassId;
use crate::descriptor::AttribDescriptor;
use crate::error::{AttribError, AttribResult};
use crate::flags::AttribFlags;
use crate::name::{compose_id_name, compose_id2_name};
use crate::object::ObjectId;
use crate::toolkit::Toolkit;
use crate::value::{AttrValue, eq_no_case};
use tracing::debug;
use trellis_core::profiling::{profile_function, profile_scope};

/// One live position of an indexed attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IdKey {
    Single(i32),
    Double(i32, i32),
}

impl IdKey {
    fn compose(self, base: &str) -> String {
        match self {
            IdKey::Single(id) => compose_id_name(base, id),
            IdKey::Double(lin, col) => compose_id2_name(base, lin, col),
        }
    }
}

impl Toolkit {
    /// Persist every current class value that differs from its default into
    /// the instance-local store. Returns the number of entries written.
    pub fn save_all_attributes(&mut self, id: ObjectId) -> AttribResult<usize> {
        profile_function!();
        let class = self.object(id)?.class;
        let mut written = 0;

        for (name, descriptor) in self.classes.get(class).snapshot() {
            let flags = descriptor.flags();
            if !flags.is_transferable() || self.skips_save(id, class, &name, flags) {
                continue;
            }

            if flags.is_indexed() {
                for key in self.live_ids(id, class, flags) {
                    let value = match key {
                        IdKey::Single(id1) => self.class_get_attribute_id(id, &name, id1)?,
                        IdKey::Double(lin, col) => self.class_get_attribute_id2(id, &name, lin, col)?,
                    };
                    if self.save_value(id, &key.compose(&name), value, None)? {
                        written += 1;
                    }
                }
            } else {
                let query = self.class_get_attribute(id, &name)?;
                if self.save_value(id, &name, query.value, query.default.as_deref())? {
                    written += 1;
                }
            }
        }

        debug!(%id, written, "Saved attributes");
        Ok(written)
    }

    fn skips_save(&self, id: ObjectId, class: ClassId, name: &str, flags: AttribFlags) -> bool {
        if !flags.contains(AttribFlags::NO_SAVE) {
            return false;
        }
        match &self.classes.get(class).hooks().no_save {
            Some(no_save) => no_save(self, id, name),
            None => true,
        }
    }

    fn save_value(
        &mut self,
        id: ObjectId,
        key: &str,
        value: Option<AttrValue>,
        default: Option<&str>,
    ) -> AttribResult<bool> {
        let Some(AttrValue::Text(value)) = value else {
            return Ok(false);
        };
        if value.is_empty()
            || default.is_some_and(|default| eq_no_case(&value, default))
            || self.stored(id, key) == Some(value.as_str())
        {
            return Ok(false);
        }
        self.store_set(id, key, Some(&value))?;
        Ok(true)
    }

    /// Live ids of an indexed attribute, from the class range hooks. Classes
    /// without the hooks have nothing to enumerate.
    fn live_ids(&self, id: ObjectId, class: ClassId, flags: AttribFlags) -> Vec<IdKey> {
        let hooks = self.classes.get(class).hooks();
        let Some(id_range) = &hooks.id_range else {
            return Vec::new();
        };
        let lines = id_range(self, id);

        if flags.contains(AttribFlags::HAS_ID2) {
            let Some(id2_range) = &hooks.id2_range else {
                return Vec::new();
            };
            let columns = id2_range(self, id);
            lines
                .flat_map(|lin| columns.clone().map(move |col| IdKey::Double(lin, col)))
                .collect()
        } else {
            lines.map(IdKey::Single).collect()
        }
    }

    /// Copy every transferable attribute from `source` to `destination`.
    ///
    /// Runs in two passes. The first copies indexed values only. Indexed
    /// setters may rewrite plain attributes on the destination, so the
    /// second pass copies every plain value that differs between the two
    /// objects once those side effects have happened.
    pub fn copy_all_attributes(&mut self, source: ObjectId, destination: ObjectId) -> AttribResult<()> {
        profile_function!();
        let src_class = self.object(source)?.class;
        let dst_class = self.object(destination)?.class;
        if !self.classes.class_matches(dst_class, src_class)
            && !self.classes.class_matches(src_class, dst_class)
        {
            return Err(AttribError::IncompatibleClass {
                source: self.classes.get(src_class).name().to_string(),
                destination: self.classes.get(dst_class).name().to_string(),
            });
        }

        let descriptors: Vec<(String, AttribDescriptor)> = self
            .classes
            .get(src_class)
            .snapshot()
            .into_iter()
            .filter(|(_, d)| d.flags().is_transferable())
            .collect();

        {
            profile_scope!("copy_first_pass");
            for (name, descriptor) in &descriptors {
                let flags = descriptor.flags();
                if flags.is_indexed() {
                    self.copy_indexed(source, destination, src_class, name, flags)?;
                }
            }
        }

        {
            profile_scope!("copy_second_pass");
            for (name, descriptor) in &descriptors {
                if descriptor.flags().is_indexed() {
                    continue;
                }
                let Some(value) = self.get_str(source, name) else {
                    continue;
                };
                if self.get_str(destination, name).as_deref() != Some(value.as_str()) {
                    self.set_attribute(destination, name, Some(&value))?;
                }
            }
        }

        debug!(%source, %destination, "Copied attributes");
        Ok(())
    }

    fn copy_indexed(
        &mut self,
        source: ObjectId,
        destination: ObjectId,
        src_class: ClassId,
        name: &str,
        flags: AttribFlags,
    ) -> AttribResult<()> {
        for key in self.live_ids(source, src_class, flags) {
            match key {
                IdKey::Single(id1) => {
                    if let Some(value) = self.get_attribute_id(source, name, id1)?.and_then(AttrValue::into_text) {
                        self.set_attribute_id(destination, name, id1, Some(&value))?;
                    }
                }
                IdKey::Double(lin, col) => {
                    if let Some(value) = self
                        .get_attribute_id2(source, name, lin, col)?
                        .and_then(AttrValue::into_text)
                    {
                        self.set_attribute_id2(destination, name, lin, col, Some(&value))?;
                    }
                }
            }
        }
        Ok(())
    }
}
