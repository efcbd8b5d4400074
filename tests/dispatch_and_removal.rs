//! Integration tests for dispatch order and identity-based removal.
//!
//! Each test records the arguments every listener receives so that both the
//! call order and the single-slice argument shape can be asserted.

use event_registry::{EventBus, Handler, OffTarget};
use std::sync::{Arc, Mutex};

type Calls = Arc<Mutex<Vec<(&'static str, Vec<i32>)>>>;

fn recorder(calls: &Calls, label: &'static str) -> Handler<i32> {
    let calls = calls.clone();
    Handler::new(move |args: &[i32]| {
        calls.lock().unwrap().push((label, args.to_vec()));
    })
}

#[test]
fn test_listener_receives_all_arguments_as_one_slice() {
    let calls = Calls::default();
    let bus = EventBus::new();

    bus.on_handler("e", &recorder(&calls, "cb"));
    bus.emit("e", &[1, 2, 3]);

    assert_eq!(*calls.lock().unwrap(), vec![("cb", vec![1, 2, 3])]);
}

#[test]
fn test_emit_without_arguments_passes_empty_slice() {
    let calls = Calls::default();
    let bus = EventBus::new();

    bus.on_handler("e", &recorder(&calls, "cb")).emit("e", &[]);

    assert_eq!(*calls.lock().unwrap(), vec![("cb", vec![])]);
}

#[test]
fn test_listeners_run_in_registration_order() {
    let calls = Calls::default();
    let bus = EventBus::new();

    bus.on_handler("e", &recorder(&calls, "cb1"))
        .on_handler("e", &recorder(&calls, "cb2"))
        .on_handler("e", &recorder(&calls, "cb3"));
    bus.emit("e", &[9]);

    let labels: Vec<_> = calls.lock().unwrap().iter().map(|(l, _)| *l).collect();
    assert_eq!(labels, vec!["cb1", "cb2", "cb3"]);
}

#[test]
fn test_events_are_dispatched_independently() {
    let calls = Calls::default();
    let bus = EventBus::new();

    bus.on_handler("a", &recorder(&calls, "a"))
        .on_handler("b", &recorder(&calls, "b"));
    bus.emit("b", &[2]);

    assert_eq!(*calls.lock().unwrap(), vec![("b", vec![2])]);
}

#[test]
fn test_emit_unknown_event_is_silent() {
    let bus = EventBus::<i32>::new();

    let returned = bus.emit("neverRegistered", &[1, 2, 3]);

    assert!(std::ptr::eq(returned, &bus));
    assert!(bus.is_empty());
}

#[test]
fn test_off_single_handler_keeps_the_rest() {
    let calls = Calls::default();
    let bus = EventBus::new();
    let cb_a = recorder(&calls, "A");
    let cb_b = recorder(&calls, "B");

    bus.on_handler("e", &cb_a)
        .on_handler("e", &cb_b)
        .off("e", &cb_a)
        .emit("e", &[1]);

    assert_eq!(*calls.lock().unwrap(), vec![("B", vec![1])]);
}

#[test]
fn test_off_without_handler_removes_everything() {
    let calls = Calls::default();
    let bus = EventBus::new();

    bus.on_handler("e", &recorder(&calls, "A"))
        .on("e", |_| panic!("should have been removed"))
        .off("e", ())
        .emit("e", &[1]);

    assert!(calls.lock().unwrap().is_empty());
    assert!(!bus.contains("e"));
}

#[test]
fn test_off_with_none_removes_everything() {
    let bus = EventBus::<i32>::new();
    bus.on("e", |_| {}).on("e", |_| {});

    bus.off("e", None);

    assert_eq!(bus.listener_count("e"), 0);
}

#[test]
fn test_off_removes_every_occurrence_of_duplicate() {
    let calls = Calls::default();
    let bus = EventBus::new();
    let dup = recorder(&calls, "dup");
    let other = recorder(&calls, "other");

    bus.on_handler("e", &dup)
        .on_handler("e", &other)
        .on_handler("e", &dup);
    bus.emit("e", &[1]);
    assert_eq!(calls.lock().unwrap().len(), 3);

    bus.off("e", &dup);
    assert_eq!(bus.listener_count("e"), 1);

    calls.lock().unwrap().clear();
    bus.emit("e", &[2]);
    assert_eq!(*calls.lock().unwrap(), vec![("other", vec![2])]);
}

#[test]
fn test_off_handler_only_affects_named_event() {
    let bus = EventBus::<i32>::new();
    let shared = Handler::new(|_: &[i32]| {});

    bus.on_handler("a", &shared).on_handler("b", &shared);
    bus.off("a", &shared);

    assert!(!bus.contains("a"));
    assert_eq!(bus.listener_count("b"), 1);
}

#[test]
fn test_off_many_removes_each_handler() {
    let calls = Calls::default();
    let bus = EventBus::new();
    let a = recorder(&calls, "a");
    let b = recorder(&calls, "b");
    let c = recorder(&calls, "c");

    bus.on_handler("e", &a).on_handler("e", &b).on_handler("e", &c);
    bus.off("e", &[a, c]).emit("e", &[5]);

    assert_eq!(*calls.lock().unwrap(), vec![("b", vec![5])]);
}

#[test]
fn test_off_many_from_vec_and_explicit_target() {
    let bus = EventBus::<i32>::new();
    let a = Handler::new(|_: &[i32]| {});
    let b = Handler::new(|_: &[i32]| {});
    let both = vec![a.clone(), b.clone()];

    bus.on_handler("e", &a).on_handler("e", &b);
    bus.off("e", &both);
    assert!(!bus.contains("e"));

    bus.on_handler("e", &a).on_handler("e", &b);
    bus.off("e", OffTarget::Many(&both[..1]));
    assert_eq!(bus.listener_count("e"), 1);

    bus.off("e", OffTarget::All);
    assert!(bus.is_empty());
}

#[test]
fn test_closure_registered_twice_has_two_identities() {
    let bus = EventBus::<i32>::new();
    let noop = |_: &[i32]| {};

    bus.on("e", noop).on("e", noop);
    bus.off("e", &Handler::new(noop));

    assert_eq!(bus.listener_count("e"), 2);
}

#[test]
fn test_event_names_and_counts() {
    let bus = EventBus::<i32>::new();
    bus.on("a", |_| {}).on("b", |_| {}).on("b", |_| {});

    let mut names = bus.event_names();
    names.sort();
    assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(bus.listener_count("b"), 2);

    bus.clear();
    assert!(bus.event_names().is_empty());
}

#[test]
fn test_non_numeric_payload() {
    #[derive(Debug, Clone, PartialEq)]
    enum Arg {
        Int(i64),
        Text(String),
    }

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let bus = EventBus::new();

    bus.on("mixed", move |args: &[Arg]| sink.lock().unwrap().extend_from_slice(args))
        .emit("mixed", &[Arg::Int(1), Arg::Text("two".into())]);

    assert_eq!(
        *seen.lock().unwrap(),
        vec![Arg::Int(1), Arg::Text("two".into())]
    );
}
