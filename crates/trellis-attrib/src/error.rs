//! Error types for the attribute system.
//!
//! Attribute mismatches never surface here: read-only writes, unknown names and
//! malformed ids are reported in-band through [`SetOutcome`](crate::SetOutcome)
//! or absent values. These errors cover structural failures only.

use crate::object::ObjectId;
use std::fmt;

/// Errors that can occur during object and class operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttribError {
    /// The handle refers to an object that was destroyed (or never existed).
    ObjectNotLive {
        /// The stale handle.
        id: ObjectId,
    },

    /// No class is registered under this name.
    ClassNotFound {
        /// The requested class name.
        name: String,
    },

    /// A class with this name is already registered.
    DuplicateClass {
        /// The conflicting class name.
        name: String,
    },

    /// The parent walk exceeded the configured depth bound.
    InheritanceTooDeep {
        /// The attribute being resolved.
        name: String,
        /// Depth reached when the walk was aborted.
        depth: usize,
    },

    /// The class create hook failed; the object has been torn down.
    ConstructionFailed {
        /// Class of the object being built.
        class: String,
        /// Reason reported by the hook.
        reason: String,
    },

    /// The class map hook failed to realize the native side.
    MapFailed {
        /// Class of the object being mapped.
        class: String,
        /// Reason reported by the hook.
        reason: String,
    },

    /// Source and destination classes are unrelated.
    IncompatibleClass {
        /// Source class name.
        source: String,
        /// Destination class name.
        destination: String,
    },

    /// The child cannot be attached under this parent.
    InvalidParent {
        /// The object being attached.
        child: ObjectId,
        /// The requested parent.
        parent: ObjectId,
    },
}

impl fmt::Display for AttribError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttribError::ObjectNotLive { id } => {
                write!(f, "Object is not live: {}", id)
            }
            AttribError::ClassNotFound { name } => {
                write!(f, "Class not found: {}", name)
            }
            AttribError::DuplicateClass { name } => {
                write!(f, "Class already registered: {}", name)
            }
            AttribError::InheritanceTooDeep { name, depth } => {
                write!(
                    f,
                    "Inheritance walk for '{}' exceeded depth {} (cyclic parent chain?)",
                    name, depth
                )
            }
            AttribError::ConstructionFailed { class, reason } => {
                write!(f, "Failed to create '{}': {}", class, reason)
            }
            AttribError::MapFailed { class, reason } => {
                write!(f, "Failed to map '{}': {}", class, reason)
            }
            AttribError::IncompatibleClass {
                source,
                destination,
            } => {
                write!(
                    f,
                    "Cannot copy attributes from '{}' to '{}': classes do not match",
                    source, destination
                )
            }
            AttribError::InvalidParent { child, parent } => {
                write!(f, "Cannot attach {} under {}", child, parent)
            }
        }
    }
}

impl std::error::Error for AttribError {}

/// Result type alias for attribute system operations.
pub type AttribResult<T> = Result<T, AttribError>;
