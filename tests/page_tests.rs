//! Page-level behavior: ownership, event relaying, and (de)serialization.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use schemcore::{Net, Object, Page, PageEvent, Pin, PinKind, SchemCoreError};

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn add_takes_ownership() {
    let page = Page::new();
    let net = Net::new(1, 0, 0, 100, 0);
    assert!(net.page().is_none());

    page.add(&net);
    assert_eq!(net.page().unwrap(), page);
    assert_eq!(page.objects().len(), 1);
}

#[test]
#[should_panic(expected = "already belongs to a page")]
fn add_rejects_attached_object() {
    let first = Page::new();
    let second = Page::new();
    let net = Net::new(1, 0, 0, 100, 0);
    first.add(&net);
    second.add(&net);
}

#[test]
#[should_panic(expected = "already belongs to a page")]
fn add_rejects_double_add_to_same_page() {
    let page = Page::new();
    let net = Net::new(1, 0, 0, 100, 0);
    page.add(&net);
    page.add(&net);
}

#[test]
fn remove_releases_ownership() {
    let page = Page::new();
    let net = Net::new(1, 0, 0, 100, 0);
    page.add(&net);
    page.remove(&net);

    assert!(net.page().is_none());
    assert!(page.objects().is_empty());

    // a released object can join another page
    let other = Page::new();
    other.add(&net);
    assert_eq!(net.page().unwrap(), other);
}

#[test]
#[should_panic(expected = "not a member")]
fn remove_rejects_non_member() {
    let page = Page::new();
    let net = Net::new(1, 0, 0, 100, 0);
    page.remove(&net);
}

#[test]
fn membership_events_carry_the_object() {
    let page = Page::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    page.connect(move |_, event| sink.borrow_mut().push(event.clone()));

    let net: Object = Net::new(1, 0, 0, 100, 0).into();
    page.add(&net);
    page.remove(&net);
    assert_eq!(
        *log.borrow(),
        vec![
            PageEvent::ObjectAdded(net.clone()),
            PageEvent::ObjectRemoved(net.clone()),
        ]
    );
}

#[test]
fn member_changes_are_relayed_around_the_mutation() {
    let page = Page::new();
    let net = Net::new(1, 0, 0, 100, 0);
    page.add(&net);

    // one log shared by the page handler and an object handler, so the
    // interleaving of the two streams is observable
    let log = Rc::new(RefCell::new(Vec::new()));

    let sink = Rc::clone(&log);
    page.connect(move |_, event| {
        let tag = match event {
            PageEvent::PreObjectChanged(_) => "page:pre",
            PageEvent::ObjectChanged(_) => "page:post",
            _ => "page:other",
        };
        sink.borrow_mut().push(tag.to_string());
    });

    let sink = Rc::clone(&log);
    net.connect(move |_, event| sink.borrow_mut().push(format!("obj:{event:?}")));

    net.translate(10, 0);
    assert_eq!(
        *log.borrow(),
        vec![
            "page:pre".to_string(),
            "obj:PreChanged".to_string(),
            "obj:Translated { dx: 10, dy: 0 }".to_string(),
            "page:post".to_string(),
            "obj:Changed".to_string(),
        ]
    );
}

#[test]
fn relay_stops_after_removal() {
    let page = Page::new();
    let net = Net::new(1, 0, 0, 100, 0);
    page.add(&net);

    let count = Rc::new(RefCell::new(0usize));
    let sink = Rc::clone(&count);
    page.connect(move |_, event| {
        if matches!(event, PageEvent::ObjectChanged(_)) {
            *sink.borrow_mut() += 1;
        }
    });

    net.translate(1, 0);
    page.remove(&net);
    net.translate(1, 0);
    assert_eq!(*count.borrow(), 1);
}

#[test]
fn remove_all_is_silent_and_detaches_everything() {
    let page = Page::new();
    let a: Object = Net::new(1, 0, 0, 1, 1).into();
    let b: Object = Pin::new(PinKind::Net, 0, 0, 0, 1, 1, 1).into();
    page.add(&a);
    page.add(&b);

    let count = Rc::new(RefCell::new(0usize));
    let sink = Rc::clone(&count);
    page.connect(move |_, _| *sink.borrow_mut() += 1);

    page.remove_all();
    assert_eq!(*count.borrow(), 0);
    assert!(page.objects().is_empty());
    assert!(a.page().is_none());
    assert!(b.page().is_none());
}

#[test]
fn dropping_the_page_detaches_members() {
    let net = Net::new(1, 0, 0, 100, 0);
    {
        let page = Page::new();
        page.add(&net);
        assert!(net.page().is_some());
    }
    assert!(net.page().is_none());
    // mutating after the page is gone must not panic
    net.translate(1, 1);
}

#[test]
fn serialization_is_header_plus_records_in_order() {
    let page = Page::new();
    page.add(&Net::new(1, 9, 8, 7, 6).into());
    page.add(&Pin::new(PinKind::Net, 0, 0, 0, 100, 0, 2).into());
    assert_eq!(
        page.to_string(),
        "v 20250901 2\nN 9 8 7 6 1\nP 0 0 100 0 2 0 0\n"
    );
}

#[test]
fn empty_page_serializes_to_just_the_header() {
    assert_eq!(Page::new().to_string(), "v 20250901 2\n");
}

#[test]
fn from_string_round_trips() {
    let input = "v 20250901 2\nN 9 8 7 6 1\nP 0 0 100 0 2 1 1\n";
    let page = Page::from_string(input).unwrap();
    assert_eq!(page.objects().len(), 2);
    assert_eq!(page.to_string(), input);
}

#[test]
fn from_string_rejects_bad_header() {
    let err = Page::from_string("not a header\n").unwrap_err();
    assert!(matches!(
        err,
        SchemCoreError::Deserialization {
            what: "header",
            offset: 0
        }
    ));
}

#[test]
fn from_string_reports_the_offset_of_the_bad_record() {
    // header is 6 bytes, so the broken record starts at offset 6
    let err = Page::from_string("v 1 2\nN 1 2 broken\n").unwrap_err();
    assert!(matches!(
        err,
        SchemCoreError::Deserialization {
            what: "net object",
            offset: 6
        }
    ));
}

#[test]
fn from_string_rejects_unknown_tag() {
    let err = Page::from_string("v 1 2\nQ 1 2 3\n").unwrap_err();
    assert!(matches!(
        err,
        SchemCoreError::Deserialization {
            what: "object",
            offset: 6
        }
    ));
}

#[test]
fn fixture_resaves_byte_for_byte() {
    let path = fixture_path("page.sch");
    let original = std::fs::read_to_string(&path).unwrap();
    let page = Page::from_file(&path).unwrap();
    assert_eq!(page.objects().len(), 4);
    assert_eq!(page.filename(), Some(path));
    assert_eq!(page.to_string(), original);
}

#[test]
fn from_file_reports_missing_file_as_io() {
    let err = Page::from_file(fixture_path("no-such-page.sch")).unwrap_err();
    assert!(matches!(err, SchemCoreError::Io { .. }));
}

#[test]
fn from_file_wraps_parse_failures_with_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.sch");
    std::fs::write(&path, "v 1 2\nN nope\n").unwrap();

    let err = Page::from_file(&path).unwrap_err();
    match err {
        SchemCoreError::Load { path: p, source } => {
            assert_eq!(p, path);
            assert!(matches!(
                *source,
                SchemCoreError::Deserialization { offset: 6, .. }
            ));
        }
        other => panic!("expected a load error, got {other:?}"),
    }
}

#[test]
fn to_file_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.sch");

    let page = Page::new();
    page.add(&Net::new(1, 0, 0, 100, 0).into());
    page.to_file(&path).unwrap();
    // saving never rebinds the page to the output file
    assert_eq!(page.filename(), None);

    let reloaded = Page::from_file(&path).unwrap();
    assert_eq!(reloaded.to_string(), page.to_string());
}
