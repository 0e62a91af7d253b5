//! Shared fixtures: small widget classes whose accessors record every call.
#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use trellis_attrib::{
    AttrDefault, AttrValue, AttribFlags, IndexingMode, NativeType, ObjectId, Toolkit, WidgetClass,
    setter,
};

/// Ordered record of accessor and hook invocations.
#[derive(Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<String>>>);

impl CallLog {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.0.borrow().last().cloned()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.0.borrow().iter().filter(|e| e.starts_with(prefix)).count()
    }
}

pub fn toolkit() -> Toolkit {
    let _ = trellis_core::logging::try_init();
    Toolkit::new()
}

fn show(value: Option<&AttrValue>) -> String {
    value.map(ToString::to_string).unwrap_or_else(|| "<null>".to_string())
}

/// Setter that logs `NAME=value` and returns `store`.
pub fn logging_setter(
    log: &CallLog,
    name: &'static str,
    store: bool,
) -> Option<trellis_attrib::descriptor::PlainSetter> {
    let log = log.clone();
    setter(move |_, _, value| {
        log.push(format!("{name}={}", show(value)));
        store
    })
}

/// `button`: inheritable `TITLE` (default ""), usable before mapping.
pub fn button_class(log: &CallLog) -> WidgetClass {
    let mut class = WidgetClass::new("button", NativeType::Control, IndexingMode::None);
    class.register_attribute(
        "TITLE",
        None,
        logging_setter(log, "TITLE", true),
        AttrDefault::from(""),
        None,
        AttribFlags::NOT_MAPPED,
    );
    class
}

/// `box`: a container with inheritable `FONT` and `FGCOLOR`, and a
/// non-inheritable `MARGIN`.
pub fn box_class(log: &CallLog) -> WidgetClass {
    let mut class = WidgetClass::new("box", NativeType::Void, IndexingMode::None);
    class.register_attribute(
        "FONT",
        None,
        logging_setter(log, "FONT", true),
        AttrDefault::from("Sans, 10"),
        Some("Sans, 10"),
        AttribFlags::NOT_MAPPED,
    );
    class.register_attribute(
        "FGCOLOR",
        None,
        logging_setter(log, "FGCOLOR", true),
        AttrDefault::from("0 0 0"),
        Some("0 0 0"),
        AttribFlags::NOT_MAPPED,
    );
    class.register_attribute(
        "MARGIN",
        None,
        logging_setter(log, "MARGIN", true),
        AttrDefault::from("0x0"),
        Some("0x0"),
        AttribFlags::NOT_MAPPED | AttribFlags::NO_INHERIT,
    );
    class
}

/// Build a parent/child chain of `len` boxes, root first.
pub fn box_chain(toolkit: &mut Toolkit, len: usize) -> Vec<ObjectId> {
    let mut chain: Vec<ObjectId> = Vec::with_capacity(len);
    for _ in 0..len {
        let id = toolkit.create("box").expect("create box");
        if let Some(parent) = chain.last() {
            toolkit.append(*parent, id).expect("append");
        }
        chain.push(id);
    }
    chain
}
