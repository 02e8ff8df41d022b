use std::{cell::Cell, rc::Rc};

use kinesis_bind::{
    dom::{memory::MemoryEvent, Dom, Listener},
    Action, Reducer,
};
use serde_json::{json, Value};

use super::{given_a_mounted_component, given_a_recording_reducer};

#[test]
fn global_action_invokes_reducer_exactly_once_in_any_state() {
    for state in ["idle", "busy", "done"] {
        let page = given_a_mounted_component(
            "kinesis-state",
            &[],
            |dom| vec![dom.element("button", &[("action", "press")])],
            json!({ "_state": state }),
        );
        let (reducer, seen) = given_a_recording_reducer();
        page.component.set_reducer(reducer);

        page.dom.dispatch(page.rendered()[0], "click");

        assert_eq!(*seen.borrow(), vec!["press"], "state {state}");
    }
}

#[test]
fn submit_is_contained_within_the_form() {
    let page = given_a_mounted_component(
        "kinesis-state",
        &[],
        |dom| vec![dom.element("form", &[("submit.action", "save")])],
        json!({}),
    );
    let (reducer, seen) = given_a_recording_reducer();
    page.component.set_reducer(reducer);

    let leaked = Rc::new(Cell::new(0));
    let listener: Listener<MemoryEvent> = {
        let leaked = Rc::clone(&leaked);
        Rc::new(move |_: &MemoryEvent| leaked.set(leaked.get() + 1))
    };
    page.dom
        .add_event_listener(&page.host, "submit", listener)
        .unwrap();

    let event = page.dom.dispatch(page.rendered()[0], "submit");

    assert!(event.default_prevented());
    assert!(event.propagation_stopped());
    assert_eq!(leaked.get(), 0);
    assert_eq!(*seen.borrow(), vec!["save"]);
}

#[test]
fn other_events_keep_bubbling() {
    let page = given_a_mounted_component(
        "kinesis-state",
        &[],
        |dom| vec![dom.element("button", &[("action", "press")])],
        json!({}),
    );
    let (reducer, seen) = given_a_recording_reducer();
    page.component.set_reducer(reducer);

    let bubbled = Rc::new(Cell::new(0));
    let listener: Listener<MemoryEvent> = {
        let bubbled = Rc::clone(&bubbled);
        Rc::new(move |_: &MemoryEvent| bubbled.set(bubbled.get() + 1))
    };
    page.dom
        .add_event_listener(&page.host, "click", listener)
        .unwrap();

    let event = page.dom.dispatch(page.rendered()[0], "click");

    assert!(!event.default_prevented());
    assert_eq!(bubbled.get(), 1);
    assert_eq!(*seen.borrow(), vec!["press"]);
}

#[test]
fn actions_follow_the_current_state() {
    let page = given_a_mounted_component(
        "kinesis-state",
        &[],
        |dom| {
            vec![dom.element(
                "button",
                &[
                    ("watch", "label"),
                    ("click.action", "start"),
                    ("click.running.action", "stop"),
                ],
            )]
        },
        json!({ "label": "Start" }),
    );

    let reducer: Reducer<MemoryEvent> = Rc::new(|_: &Value, action: &Action<MemoryEvent>| {
        match action.action_type.as_str() {
            "start" => json!({ "_state": "running", "label": "Stop" }),
            _ => json!({ "label": "Start" }),
        }
    });
    page.component.set_reducer(reducer);

    let button = page.rendered()[0];
    page.dom.dispatch(button, "click");
    assert_eq!(page.dom.text_content(button), "Stop");
    assert_eq!(page.component.data()["_state"], json!("running"));

    page.dom.dispatch(button, "click");
    assert_eq!(page.dom.text_content(button), "Start");
    assert_eq!(page.component.data()["_state"], Value::Null);
}

#[test]
fn unmatched_events_leave_data_alone() {
    let page = given_a_mounted_component(
        "kinesis-state",
        &[],
        |dom| vec![dom.element("button", &[("click.busy.action", "wait")])],
        json!({ "_state": "idle", "count": 1 }),
    );
    let (reducer, seen) = given_a_recording_reducer();
    page.component.set_reducer(reducer);

    page.dom.dispatch(page.rendered()[0], "click");

    assert!(seen.borrow().is_empty());
    assert_eq!(page.component.data(), json!({ "_state": "idle", "count": 1 }));
}

#[test]
fn actions_without_reducer_are_dropped() {
    let page = given_a_mounted_component(
        "kinesis-state",
        &[],
        |dom| vec![dom.element("button", &[("action", "press")])],
        json!({ "count": 1 }),
    );

    page.dom.dispatch(page.rendered()[0], "click");

    assert_eq!(page.component.data(), json!({ "count": 1 }));
}
