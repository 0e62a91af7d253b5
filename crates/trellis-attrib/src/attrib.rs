//! Object attribute facade: class dispatch combined with the instance store.
//!
//! Writes go through the class first; the [`SetOutcome`] decides whether the
//! string is cached on the object, and inheritable writes are pushed down to
//! children that have no value of their own. Reads try the class getter, then
//! the stored string, then the class default. Reads never walk the parent
//! chain; [`Toolkit::get_inherited`] does that explicitly.

use crate::dispatch::{AttributeQuery, SetOutcome};
use crate::error::{AttribError, AttribResult};
use crate::name::{compose_id_name, compose_id2_name, is_internal};
use crate::object::ObjectId;
use crate::toolkit::Toolkit;
use crate::value::AttrValue;
use tracing::warn;
use trellis_core::profiling::profile_function;

impl Toolkit {
    /// Set a string attribute. `None` resets it to its inherited or default value.
    pub fn set_attribute(
        &mut self,
        id: ObjectId,
        name: &str,
        value: Option<&str>,
    ) -> AttribResult<SetOutcome> {
        let value = value.map(AttrValue::from);
        self.set_attribute_at(id, name, value.as_ref())
    }

    /// Set an attribute with a possibly non-string value.
    pub fn set_attribute_value(
        &mut self,
        id: ObjectId,
        name: &str,
        value: AttrValue,
    ) -> AttribResult<SetOutcome> {
        self.set_attribute_at(id, name, Some(&value))
    }

    pub fn reset_attribute(&mut self, id: ObjectId, name: &str) -> AttribResult<SetOutcome> {
        self.set_attribute_at(id, name, None)
    }

    fn set_attribute_at(
        &mut self,
        id: ObjectId,
        name: &str,
        value: Option<&AttrValue>,
    ) -> AttribResult<SetOutcome> {
        profile_function!();
        if is_internal(name) {
            self.store_value(id, name, value)?;
            return Ok(SetOutcome::Unhandled);
        }

        let outcome = self.class_set_attribute(id, name, value)?;
        if outcome.should_store() {
            self.store_value(id, name, value)?;
        }
        if !outcome.is_rejected()
            && self.config.notify_children
            && self.attribute_info(id, name)?.inheritable
        {
            self.notify_children(id, name, value, 1);
        }
        Ok(outcome)
    }

    fn store_value(&mut self, id: ObjectId, name: &str, value: Option<&AttrValue>) -> AttribResult<()> {
        match value {
            None => self.store_set(id, name, None),
            Some(AttrValue::Text(text)) => self.store_set(id, name, Some(text)),
            Some(other) => {
                tracing::debug!(%id, attribute = name, value = %other, "Non-string value not stored");
                self.object(id).map(|_| ())
            }
        }
    }

    /// Re-dispatch an inheritable write to every descendant that has no
    /// stored value of its own.
    ///
    /// The write on `id` stands regardless: a subtree deeper than
    /// `max_inherit_depth`, or a child whose dispatch fails, is logged and
    /// skipped.
    fn notify_children(&mut self, id: ObjectId, name: &str, value: Option<&AttrValue>, depth: usize) {
        if depth > self.config.max_inherit_depth {
            warn!(%id, attribute = name, depth, "Subtree too deep, notification truncated");
            return;
        }
        for child in self.children(id) {
            if self.stored(child, name).is_some() {
                continue;
            }
            let inheritable = match self.class_set_attribute(child, name, value) {
                Ok(outcome) if outcome.is_rejected() => false,
                Ok(_) => self.attribute_info(child, name).is_ok_and(|info| info.inheritable),
                Err(err) => {
                    warn!(%child, attribute = name, %err, "Child notification failed");
                    false
                }
            };
            if inheritable {
                self.notify_children(child, name, value, depth + 1);
            }
        }
    }

    /// Read an attribute: class getter, then stored string, then default.
    pub fn get_attribute(&self, id: ObjectId, name: &str) -> AttribResult<AttributeQuery> {
        let stored = self.object(id)?.stored(name).map(AttrValue::text);
        if is_internal(name) {
            return Ok(AttributeQuery {
                value: stored,
                ..AttributeQuery::default()
            });
        }

        let mut query = self.class_get_attribute(id, name)?;
        if query.value.is_none() {
            query.value = stored.or_else(|| query.default.clone().map(AttrValue::Text));
        }
        Ok(query)
    }

    /// Text value of an attribute; `None` for dead objects, absent or
    /// non-string values.
    pub fn get_str(&self, id: ObjectId, name: &str) -> Option<String> {
        self.get_attribute(id, name).ok()?.value?.into_text()
    }

    /// Walk this object and its ancestors for a stored value.
    pub fn get_inherited(&self, id: ObjectId, name: &str) -> AttribResult<Option<String>> {
        let mut current = Some(id);
        let mut depth = 0;
        while let Some(node) = current {
            if depth > self.config.max_inherit_depth {
                return Err(AttribError::InheritanceTooDeep {
                    name: name.to_string(),
                    depth,
                });
            }
            let object = self.object(node)?;
            if let Some(value) = object.stored(name) {
                return Ok(Some(value.to_string()));
            }
            current = object.parent;
            depth += 1;
        }
        Ok(None)
    }

    pub fn set_attribute_id(
        &mut self,
        id: ObjectId,
        name: &str,
        id1: i32,
        value: Option<&str>,
    ) -> AttribResult<SetOutcome> {
        let value = value.map(AttrValue::from);
        let outcome = self.class_set_attribute_id(id, name, id1, value.as_ref())?;
        if outcome.should_store() {
            self.store_value(id, &compose_id_name(name, id1), value.as_ref())?;
        }
        Ok(outcome)
    }

    pub fn set_attribute_id2(
        &mut self,
        id: ObjectId,
        name: &str,
        id1: i32,
        id2: i32,
        value: Option<&str>,
    ) -> AttribResult<SetOutcome> {
        let value = value.map(AttrValue::from);
        let outcome = self.class_set_attribute_id2(id, name, id1, id2, value.as_ref())?;
        if outcome.should_store() {
            self.store_value(id, &compose_id2_name(name, id1, id2), value.as_ref())?;
        }
        Ok(outcome)
    }

    pub fn get_attribute_id(&self, id: ObjectId, name: &str, id1: i32) -> AttribResult<Option<AttrValue>> {
        match self.class_get_attribute_id(id, name, id1)? {
            Some(value) => Ok(Some(value)),
            None => Ok(self
                .object(id)?
                .stored(&compose_id_name(name, id1))
                .map(AttrValue::text)),
        }
    }

    pub fn get_attribute_id2(
        &self,
        id: ObjectId,
        name: &str,
        id1: i32,
        id2: i32,
    ) -> AttribResult<Option<AttrValue>> {
        match self.class_get_attribute_id2(id, name, id1, id2)? {
            Some(value) => Ok(Some(value)),
            None => Ok(self
                .object(id)?
                .stored(&compose_id2_name(name, id1, id2))
                .map(AttrValue::text)),
        }
    }
}
