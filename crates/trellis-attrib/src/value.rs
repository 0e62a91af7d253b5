//! Attribute values passed to and returned from accessors.

use crate::object::ObjectId;
use std::fmt;

/// A value flowing through the dispatcher.
///
/// Almost every attribute is textual. `Handle` and `Opaque` exist for
/// attributes flagged `NO_STRING`, which the instance-local store never holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttrValue {
    Text(String),
    /// Reference to another live object.
    Handle(ObjectId),
    /// Host-defined token (user data, native pointers).
    Opaque(u64),
}

impl AttrValue {
    pub fn text(value: impl Into<String>) -> Self {
        AttrValue::Text(value.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, AttrValue::Text(_))
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_handle(&self) -> Option<ObjectId> {
        match self {
            AttrValue::Handle(id) => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Text(s) => f.write_str(s),
            AttrValue::Handle(id) => write!(f, "{}", id),
            AttrValue::Opaque(token) => write!(f, "0x{:x}", token),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s)
    }
}

impl From<ObjectId> for AttrValue {
    fn from(id: ObjectId) -> Self {
        AttrValue::Handle(id)
    }
}

/// Case-insensitive comparison used for default checks.
pub(crate) fn eq_no_case(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}
