//! Inheritance on reset and propagation of inheritable writes.

mod common;

use common::{CallLog, box_chain, box_class, toolkit};
use trellis_attrib::{
    AttrDefault, AttrValue, AttribError, AttribFlags, Config, IndexingMode, NativeType,
    SetOutcome, Toolkit, WidgetClass, getter, id_setter,
};

fn setup() -> (Toolkit, CallLog) {
    let log = CallLog::default();
    let mut tk = toolkit();
    tk.register_class(box_class(&log)).unwrap();
    (tk, log)
}

#[test]
fn test_reset_without_parent_value_uses_default() {
    let (mut tk, log) = setup();
    let chain = box_chain(&mut tk, 2);
    let child = chain[1];

    tk.reset_attribute(child, "FONT").unwrap();
    assert_eq!(log.entries(), vec!["FONT=Sans, 10"]);

    tk.set_attribute(child, "FONT", Some("Serif, 12")).unwrap();
    assert_eq!(tk.stored(child, "FONT"), Some("Serif, 12"));

    log.clear();
    tk.reset_attribute(child, "FONT").unwrap();
    assert_eq!(log.entries(), vec!["FONT=Sans, 10"]);
    assert_eq!(tk.stored(child, "FONT"), None);
    assert_eq!(tk.get_str(child, "FONT").as_deref(), Some("Sans, 10"));
}

#[test]
fn test_reset_walks_past_parent_without_value() {
    let (mut tk, log) = setup();
    let chain = box_chain(&mut tk, 3);

    tk.set_attribute(chain[0], "FONT", Some("Mono, 12")).unwrap();
    assert_eq!(log.count("FONT=Mono, 12"), 3);
    assert_eq!(tk.stored(chain[1], "FONT"), None);

    log.clear();
    tk.reset_attribute(chain[2], "FONT").unwrap();
    assert_eq!(log.entries(), vec!["FONT=Mono, 12"]);
}

#[test]
fn test_reset_prefers_parent_getter() {
    let log = CallLog::default();
    let mut tk = toolkit();
    tk.register_class(box_class(&log)).unwrap();
    let mut frame = WidgetClass::new("frame", NativeType::Control, IndexingMode::None);
    frame.register_attribute(
        "FONT",
        getter(|_, _| Some(AttrValue::text("Frame, 9"))),
        None,
        AttrDefault::Unset,
        None,
        AttribFlags::NOT_MAPPED,
    );
    tk.register_class(frame).unwrap();

    let parent = tk.create("frame").unwrap();
    let child = tk.create("box").unwrap();
    tk.append(parent, child).unwrap();

    tk.reset_attribute(child, "FONT").unwrap();
    assert_eq!(log.entries(), vec!["FONT=Frame, 9"]);
}

#[test]
fn test_notify_skips_subtrees_with_own_value() {
    let (mut tk, log) = setup();
    let chain = box_chain(&mut tk, 3);

    tk.set_attribute(chain[1], "FGCOLOR", Some("255 0 0")).unwrap();
    log.clear();

    tk.set_attribute(chain[0], "FGCOLOR", Some("0 0 255")).unwrap();
    assert_eq!(log.entries(), vec!["FGCOLOR=0 0 255"]);
    assert_eq!(tk.stored(chain[1], "FGCOLOR"), Some("255 0 0"));
}

#[test]
fn test_non_inheritable_is_not_propagated() {
    let (mut tk, log) = setup();
    let chain = box_chain(&mut tk, 3);

    assert_eq!(
        tk.set_attribute(chain[0], "MARGIN", Some("5x5")).unwrap(),
        SetOutcome::Stored
    );
    assert_eq!(log.entries(), vec!["MARGIN=5x5"]);
}

#[test]
fn test_notify_can_be_disabled() {
    let log = CallLog::default();
    let mut tk = Toolkit::with_config(Config::default().notify_children(false));
    tk.register_class(box_class(&log)).unwrap();
    let chain = box_chain(&mut tk, 3);

    tk.set_attribute(chain[0], "FONT", Some("Mono, 12")).unwrap();
    assert_eq!(log.entries(), vec!["FONT=Mono, 12"]);
}

#[test]
fn test_get_never_walks_parents() {
    let (mut tk, _log) = setup();
    let chain = box_chain(&mut tk, 3);
    tk.set_attribute(chain[0], "FONT", Some("Mono, 12")).unwrap();

    assert_eq!(tk.get_str(chain[2], "FONT").as_deref(), Some("Sans, 10"));
    assert_eq!(
        tk.get_inherited(chain[2], "FONT").unwrap().as_deref(),
        Some("Mono, 12")
    );
    assert_eq!(tk.get_inherited(chain[2], "MISSING").unwrap(), None);
}

#[test]
fn test_indexed_reset_bypasses_parents() {
    let log = CallLog::default();
    let mut tk = toolkit();
    tk.register_class(box_class(&log)).unwrap();
    let mut list = WidgetClass::new("list", NativeType::Control, IndexingMode::Single);
    let items = log.clone();
    list.register_attribute_id(
        "ITEM",
        None,
        id_setter(move |_, _, id, value| {
            items.push(format!("ITEM({id})={}", value.map(ToString::to_string).unwrap_or_default()));
            true
        }),
        AttribFlags::NOT_MAPPED,
    );
    tk.register_class(list).unwrap();

    let parent = tk.create("box").unwrap();
    let child = tk.create("list").unwrap();
    tk.append(parent, child).unwrap();
    tk.set_attribute(parent, "ITEM3", Some("inherited?")).unwrap();

    tk.reset_attribute(child, "ITEM3").unwrap();
    assert_eq!(log.entries(), vec!["ITEM(3)="]);
    assert!(!tk.attribute_info(child, "ITEM3").unwrap().inheritable);
}

#[test]
fn test_inheritance_depth_guard() {
    let log = CallLog::default();
    let mut tk = Toolkit::with_config(Config::default().max_inherit_depth(2));
    tk.register_class(box_class(&log)).unwrap();
    let chain = box_chain(&mut tk, 5);

    let err = tk.reset_attribute(chain[4], "FONT").unwrap_err();
    assert_eq!(
        err,
        AttribError::InheritanceTooDeep {
            name: "FONT".to_string(),
            depth: 3
        }
    );

    // A shallow walk is unaffected.
    tk.reset_attribute(chain[1], "FONT").unwrap();
    assert_eq!(log.last().as_deref(), Some("FONT=Sans, 10"));
}

#[test]
fn test_reset_root_of_deep_chain() {
    let (mut tk, log) = setup();
    let len = 40;
    assert!(len > Config::default().max_inherit_depth / 2);
    let chain = box_chain(&mut tk, len);

    tk.set_attribute(chain[0], "FONT", Some("Mono, 9")).unwrap();
    assert_eq!(log.count("FONT=Mono, 9"), len);

    log.clear();
    assert_eq!(tk.reset_attribute(chain[0], "FONT").unwrap(), SetOutcome::Stored);
    assert_eq!(log.count("FONT=Sans, 10"), len);
    assert_eq!(tk.stored(chain[0], "FONT"), None);
    assert_eq!(tk.get_str(chain[len - 1], "FONT").as_deref(), Some("Sans, 10"));
}

#[test]
fn test_notify_stops_at_depth_limit() {
    let log = CallLog::default();
    let mut tk = Toolkit::with_config(Config::default().max_inherit_depth(2));
    tk.register_class(box_class(&log)).unwrap();
    let chain = box_chain(&mut tk, 5);

    let outcome = tk.set_attribute(chain[0], "FONT", Some("Mono, 9")).unwrap();
    assert_eq!(outcome, SetOutcome::Stored);
    assert_eq!(log.entries(), vec!["FONT=Mono, 9"; 3]);
    assert_eq!(tk.stored(chain[0], "FONT"), Some("Mono, 9"));
    for &node in &chain[1..] {
        assert_eq!(tk.stored(node, "FONT"), None);
    }

    // Descendants the notification never reached can still inherit explicitly.
    assert_eq!(tk.get_inherited(chain[2], "FONT").unwrap().as_deref(), Some("Mono, 9"));
}
