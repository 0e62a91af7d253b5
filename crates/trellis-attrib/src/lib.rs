//! Trellis attribute core - class-registered, string-keyed widget attributes
//!
//! This crate provides the dispatch layer that sits between application code
//! and widget drivers:
//! - Per-class attribute registries with plain, single-id and double-id accessors
//! - Name parsing for indexed attributes (`ITEM3`, `CELL3:5`, `COL*`)
//! - Get/set resolution with inheritance on reset and live global defaults
//! - Generational object handles, widget trees and ordered teardown
//! - Bulk save and copy of non-default attribute values
//!
//! ## Quick Start
//!
//! ```rust
//! use trellis_attrib::{
//!     AttrDefault, AttribFlags, IndexingMode, NativeType, SetOutcome, Toolkit, WidgetClass,
//!     setter,
//! };
//!
//! let mut toolkit = Toolkit::new();
//!
//! let mut button = WidgetClass::new("button", NativeType::Control, IndexingMode::None);
//! button.register_attribute(
//!     "TITLE",
//!     None,
//!     setter(|_, _, _| true),
//!     AttrDefault::from(""),
//!     None,
//!     AttribFlags::NOT_MAPPED,
//! );
//! toolkit.register_class(button)?;
//!
//! let ok = toolkit.create("button")?;
//! assert_eq!(toolkit.set_attribute(ok, "TITLE", Some("OK"))?, SetOutcome::Stored);
//! assert_eq!(toolkit.get_str(ok, "TITLE").as_deref(), Some("OK"));
//!
//! toolkit.destroy(ok)?;
//! assert!(!toolkit.is_live(ok));
//! # Ok::<(), trellis_attrib::AttribError>(())
//! ```
//!
//! A toolkit is single-threaded; see [`Toolkit`].

pub mod attrib;
pub mod class;
pub mod config;
pub mod descriptor;
pub mod dispatch;
pub mod error;
pub mod flags;
pub mod globals;
pub mod lifecycle;
pub mod name;
pub mod object;
pub mod registry;
pub mod toolkit;
pub mod traversal;
pub mod value;

pub use class::{ClassHooks, ClassId, IndexingMode, NativeType, WidgetClass};
pub use config::Config;
pub use descriptor::{
    Accessors, AttrDefault, AttribDescriptor, DefaultValue, id_getter, id_setter, id2_getter,
    id2_setter, getter, setter,
};
pub use dispatch::{AttributeInfo, AttributeQuery, SetOutcome};
pub use error::{AttribError, AttribResult};
pub use flags::AttribFlags;
pub use globals::{GlobalAttributes, is_global_default_dynamic};
pub use lifecycle::{DESTROY_CB, LDESTROY_CB};
pub use name::{INVALID_ID, ID_ONLY_NAME, IndexedName, split_indexed_name};
pub use object::{Callback, NativeHandle, Object, ObjectId};
pub use registry::ClassRegistry;
pub use toolkit::Toolkit;
pub use value::AttrValue;
