//! Class-level get/set resolution.
//!
//! These entry points decide what a class does with a named attribute. They
//! never touch the instance-local store themselves; the returned
//! [`SetOutcome`] tells the caller whether to cache the string. The
//! [`Toolkit::set_attribute`] facade is the usual caller.
//!
//! Resolution order for a name on a class with ids: split the name, and if
//! the base name has an indexed descriptor use it (no inheritance, no
//! default). Otherwise look the full name up as a plain descriptor. No
//! descriptor at all means a free-form attribute.

use crate::class::IndexingMode;
use crate::descriptor::{Accessors, AttribDescriptor};
use crate::error::{AttribError, AttribResult};
use crate::flags::AttribFlags;
use crate::name::{ID_ONLY_NAME, parse_id, parse_id2, split_indexed_name};
use crate::object::ObjectId;
use crate::toolkit::Toolkit;
use crate::value::AttrValue;
use tracing::{debug, trace, warn};
use trellis_core::profiling::profile_function;

/// What the caller should do with the string after a class set.
///
/// The toolkit protocol has four answers: store, ignore, rejected as
/// not-a-string, and unhandled. `Applied` and `RejectedSilently` are both
/// "ignore" for the store; they differ only in whether a setter ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    /// Cache the string in the instance-local store.
    Stored,
    /// The setter consumed the value and asked not to cache it.
    Applied,
    /// The attribute is read-only; ignore the write.
    RejectedSilently,
    /// The value is not a string and must not reach the string store.
    RejectedNotString,
    /// No descriptor: a free-form attribute, store the string.
    Unhandled,
}

impl SetOutcome {
    /// Returns true if the caller should write the string to the store.
    #[inline]
    pub fn should_store(&self) -> bool {
        matches!(self, SetOutcome::Stored | SetOutcome::Unhandled)
    }

    #[inline]
    pub fn is_rejected(&self) -> bool {
        matches!(
            self,
            SetOutcome::RejectedSilently | SetOutcome::RejectedNotString
        )
    }
}

/// Result of a class get: the value plus descriptor metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttributeQuery {
    pub value: Option<AttrValue>,
    pub default: Option<String>,
    pub inheritable: bool,
}

impl AttributeQuery {
    pub fn text(&self) -> Option<&str> {
        self.value.as_ref().and_then(AttrValue::as_str)
    }
}

/// Descriptor metadata for a name, without running any getter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttributeInfo {
    pub default: Option<String>,
    pub inheritable: bool,
    pub known: bool,
}

/// An indexed descriptor matched by a name with embedded ids.
struct IndexedMatch {
    descriptor: AttribDescriptor,
    ids: String,
}

impl Toolkit {
    fn find_indexed(&self, id: ObjectId, name: &str) -> AttribResult<Option<IndexedMatch>> {
        let class = self.class_of(id)?;
        if class.indexing() == IndexingMode::None {
            return Ok(None);
        }
        let Some(split) = split_indexed_name(name) else {
            return Ok(None);
        };
        Ok(class
            .attribute(split.base)
            .filter(|d| d.flags().is_indexed())
            .map(|d| IndexedMatch {
                descriptor: d.clone(),
                ids: split.ids.to_string(),
            }))
    }

    fn find_plain(&self, id: ObjectId, name: &str) -> AttribResult<Option<AttribDescriptor>> {
        Ok(self.class_of(id)?.attribute(name).cloned())
    }

    fn find_by_base(&self, id: ObjectId, name: &str, flag: AttribFlags) -> AttribResult<Option<AttribDescriptor>> {
        let base = if name.is_empty() { ID_ONLY_NAME } else { name };
        Ok(self
            .class_of(id)?
            .attribute(base)
            .filter(|d| d.flags().contains(flag))
            .cloned())
    }

    /// Outcome of a write to a read-only descriptor.
    fn read_only_outcome(flags: AttribFlags) -> SetOutcome {
        if flags.contains(AttribFlags::NO_STRING) {
            SetOutcome::RejectedNotString
        } else {
            SetOutcome::RejectedSilently
        }
    }

    /// Map a setter's "store" answer to an outcome. Inheritable attributes
    /// are always stored so children resolving through this object see the
    /// literal string.
    fn setter_outcome(flags: AttribFlags, store: bool, inheritable: bool) -> SetOutcome {
        if store && flags.contains(AttribFlags::NO_STRING) {
            SetOutcome::RejectedNotString
        } else if inheritable || store {
            SetOutcome::Stored
        } else {
            SetOutcome::Applied
        }
    }

    /// Outcome when the setter may not run yet (no setter, or unmapped).
    /// The string is kept so mapping can apply it later.
    fn deferred_outcome(flags: AttribFlags) -> SetOutcome {
        if flags.contains(AttribFlags::NO_STRING) {
            SetOutcome::RejectedNotString
        } else {
            SetOutcome::Stored
        }
    }

    /// Run the class setter for `name`.
    ///
    /// `None` is a reset: inheritable attributes resolve their parent's
    /// effective value first, then the descriptor default.
    pub fn class_set_attribute(
        &mut self,
        id: ObjectId,
        name: &str,
        value: Option<&AttrValue>,
    ) -> AttribResult<SetOutcome> {
        profile_function!();
        let object = self.object(id)?;
        let mapped = object.is_mapped();
        let parent = object.parent;

        if let Some(IndexedMatch { descriptor, ids }) = self.find_indexed(id, name)? {
            let flags = descriptor.flags();
            let outcome = if flags.contains(AttribFlags::READ_ONLY) {
                Self::read_only_outcome(flags)
            } else if descriptor.can_set(mapped) {
                match self.invoke_indexed_setter(&descriptor, id, &ids, value) {
                    Some(store) => Self::setter_outcome(flags, store, false),
                    None => Self::deferred_outcome(flags),
                }
            } else {
                Self::deferred_outcome(flags)
            };
            self.trace_set(id, name, "indexed", outcome);
            return Ok(outcome);
        }

        let Some(descriptor) = self.find_plain(id, name)? else {
            self.trace_set(id, name, "free-form", SetOutcome::Unhandled);
            return Ok(SetOutcome::Unhandled);
        };

        let flags = descriptor.flags();
        let inheritable = flags.is_inheritable();

        if flags.contains(AttribFlags::READ_ONLY) {
            let outcome = Self::read_only_outcome(flags);
            debug!(%id, attribute = name, ?outcome, "Write to read-only attribute ignored");
            return Ok(outcome);
        }

        let Accessors::Plain { set: Some(set), .. } = descriptor.accessors().clone() else {
            return Ok(Self::deferred_outcome(flags));
        };
        if !descriptor.can_set(mapped) {
            return Ok(Self::deferred_outcome(flags));
        }

        let resolved = match value {
            Some(value) => Some(value.clone()),
            None => {
                let mut inherited = None;
                if inheritable {
                    if let Some(parent) = parent {
                        inherited = self.effective_value(parent, name)?;
                    }
                }
                inherited
                    .or_else(|| descriptor.resolve_default(&self.globals))
                    .map(AttrValue::Text)
            }
        };

        let store = set(self, id, resolved.as_ref());
        let outcome = Self::setter_outcome(flags, store, inheritable);
        self.trace_set(id, name, "plain", outcome);
        Ok(outcome)
    }

    fn invoke_indexed_setter(
        &mut self,
        descriptor: &AttribDescriptor,
        id: ObjectId,
        ids: &str,
        value: Option<&AttrValue>,
    ) -> Option<bool> {
        match descriptor.accessors().clone() {
            Accessors::Id { set: Some(set), .. } => Some(set(self, id, parse_id(ids), value)),
            Accessors::Id2 { set: Some(set), .. } => {
                let (id1, id2) = parse_id2(ids);
                Some(set(self, id, id1, id2, value))
            }
            _ => None,
        }
    }

    /// The value a reset child inherits from `id`: its class getter, its
    /// stored string, or further up the chain. The depth counts ancestors
    /// of the reset object, starting at 1 for `id`.
    pub(crate) fn effective_value(&self, id: ObjectId, name: &str) -> AttribResult<Option<String>> {
        let mut current = Some(id);
        let mut depth = 1;
        while let Some(node) = current {
            if depth > self.config.max_inherit_depth {
                warn!(attribute = name, depth, "Inheritance walk too deep");
                return Err(AttribError::InheritanceTooDeep {
                    name: name.to_string(),
                    depth,
                });
            }
            if let Some(AttrValue::Text(value)) = self.class_get_attribute(node, name)?.value {
                return Ok(Some(value));
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

    /// Run the class getter for `name` and report its default and
    /// inheritability.
    pub fn class_get_attribute(&self, id: ObjectId, name: &str) -> AttribResult<AttributeQuery> {
        profile_function!();
        let mapped = self.object(id)?.is_mapped();

        if let Some(IndexedMatch { descriptor, ids }) = self.find_indexed(id, name)? {
            let value = if descriptor.flags().contains(AttribFlags::WRITE_ONLY) {
                None
            } else if descriptor.can_get(mapped) {
                self.invoke_indexed_getter(&descriptor, id, &ids)
            } else {
                None
            };
            return Ok(AttributeQuery {
                value,
                default: None,
                inheritable: false,
            });
        }

        let Some(descriptor) = self.find_plain(id, name)? else {
            return Ok(AttributeQuery::default());
        };

        let flags = descriptor.flags();
        let mut query = AttributeQuery {
            value: None,
            default: descriptor.resolve_default(&self.globals),
            inheritable: flags.is_inheritable(),
        };
        if flags.contains(AttribFlags::WRITE_ONLY) || !descriptor.can_get(mapped) {
            return Ok(query);
        }
        if let Accessors::Plain { get: Some(get), .. } = descriptor.accessors() {
            query.value = get(self, id);
        }
        Ok(query)
    }

    fn invoke_indexed_getter(
        &self,
        descriptor: &AttribDescriptor,
        id: ObjectId,
        ids: &str,
    ) -> Option<AttrValue> {
        match descriptor.accessors() {
            Accessors::Id { get: Some(get), .. } => get(self, id, parse_id(ids)),
            Accessors::Id2 { get: Some(get), .. } => {
                let (id1, id2) = parse_id2(ids);
                get(self, id, id1, id2)
            }
            _ => None,
        }
    }

    /// Default and inheritability of `name` without invoking any getter.
    pub fn attribute_info(&self, id: ObjectId, name: &str) -> AttribResult<AttributeInfo> {
        if self.find_indexed(id, name)?.is_some() {
            return Ok(AttributeInfo {
                default: None,
                inheritable: false,
                known: true,
            });
        }
        Ok(match self.find_plain(id, name)? {
            Some(descriptor) => AttributeInfo {
                default: descriptor.resolve_default(&self.globals),
                inheritable: descriptor.flags().is_inheritable(),
                known: true,
            },
            None => AttributeInfo::default(),
        })
    }

    /// Single-id class set. Unknown or non-indexed names are free-form.
    pub fn class_set_attribute_id(
        &mut self,
        id: ObjectId,
        name: &str,
        id1: i32,
        value: Option<&AttrValue>,
    ) -> AttribResult<SetOutcome> {
        let mapped = self.object(id)?.is_mapped();
        let Some(descriptor) = self.find_by_base(id, name, AttribFlags::HAS_ID)? else {
            return Ok(SetOutcome::Unhandled);
        };
        let flags = descriptor.flags();
        if flags.contains(AttribFlags::READ_ONLY) {
            return Ok(Self::read_only_outcome(flags));
        }
        match descriptor.accessors().clone() {
            Accessors::Id { set: Some(set), .. } if descriptor.can_set(mapped) => {
                let store = set(self, id, id1, value);
                Ok(Self::setter_outcome(flags, store, false))
            }
            _ => Ok(Self::deferred_outcome(flags)),
        }
    }

    /// Double-id class set. Unknown or non-indexed names are free-form.
    pub fn class_set_attribute_id2(
        &mut self,
        id: ObjectId,
        name: &str,
        id1: i32,
        id2: i32,
        value: Option<&AttrValue>,
    ) -> AttribResult<SetOutcome> {
        let mapped = self.object(id)?.is_mapped();
        let Some(descriptor) = self.find_by_base(id, name, AttribFlags::HAS_ID2)? else {
            return Ok(SetOutcome::Unhandled);
        };
        let flags = descriptor.flags();
        if flags.contains(AttribFlags::READ_ONLY) {
            return Ok(Self::read_only_outcome(flags));
        }
        match descriptor.accessors().clone() {
            Accessors::Id2 { set: Some(set), .. } if descriptor.can_set(mapped) => {
                let store = set(self, id, id1, id2, value);
                Ok(Self::setter_outcome(flags, store, false))
            }
            _ => Ok(Self::deferred_outcome(flags)),
        }
    }

    pub fn class_get_attribute_id(
        &self,
        id: ObjectId,
        name: &str,
        id1: i32,
    ) -> AttribResult<Option<AttrValue>> {
        let mapped = self.object(id)?.is_mapped();
        let Some(descriptor) = self.find_by_base(id, name, AttribFlags::HAS_ID)? else {
            return Ok(None);
        };
        if descriptor.flags().contains(AttribFlags::WRITE_ONLY) || !descriptor.can_get(mapped) {
            return Ok(None);
        }
        Ok(match descriptor.accessors() {
            Accessors::Id { get: Some(get), .. } => get(self, id, id1),
            _ => None,
        })
    }

    pub fn class_get_attribute_id2(
        &self,
        id: ObjectId,
        name: &str,
        id1: i32,
        id2: i32,
    ) -> AttribResult<Option<AttrValue>> {
        let mapped = self.object(id)?.is_mapped();
        let Some(descriptor) = self.find_by_base(id, name, AttribFlags::HAS_ID2)? else {
            return Ok(None);
        };
        if descriptor.flags().contains(AttribFlags::WRITE_ONLY) || !descriptor.can_get(mapped) {
            return Ok(None);
        }
        Ok(match descriptor.accessors() {
            Accessors::Id2 { get: Some(get), .. } => get(self, id, id1, id2),
            _ => None,
        })
    }

    fn trace_set(&self, id: ObjectId, name: &str, path: &str, outcome: SetOutcome) {
        if self.config.trace_dispatch {
            trace!(%id, attribute = name, path, ?outcome, "Class set");
        }
    }
}
