use std::{cell::RefCell, rc::Rc};

use kinesis_bind::{
    dom::memory::{MemoryDom, MemoryEvent},
    Action, BindError, BindingConfig, Component, Mode, Reducer,
};
use serde_json::{json, Value};

use super::{given_a_mounted_component, Page};

fn given_a_keyed_list(items: Value) -> Page {
    given_a_mounted_component(
        "kinesis-list",
        &[("data.key", "id")],
        |dom| vec![dom.element("li", &[("watch", "label"), ("action", "pick")])],
        items,
    )
}

fn labels(page: &Page) -> Vec<String> {
    page.rendered()
        .into_iter()
        .map(|node| page.dom.text_content(node))
        .collect()
}

#[test]
fn removed_keys_are_evicted_and_survivors_keep_their_nodes() {
    let page = given_a_keyed_list(json!([
        { "id": "A", "label": "a" },
        { "id": "B", "label": "b" },
        { "id": "C", "label": "c" },
    ]));
    let [a, b, c] = page.rendered()[..] else {
        panic!("expected three nodes");
    };

    page.component
        .set_data(json!([
            { "id": "B", "label": "b" },
            { "id": "C", "label": "c" },
        ]))
        .unwrap();

    assert_eq!(page.rendered(), vec![b, c]);
    assert!(!page.rendered().contains(&a));
    assert_eq!(labels(&page), vec!["b", "c"]);
}

#[test]
fn reordering_moves_existing_nodes() {
    let page = given_a_keyed_list(json!([
        { "id": 1, "label": "one" },
        { "id": 2, "label": "two" },
        { "id": 3, "label": "three" },
    ]));
    let [one, two, three] = page.rendered()[..] else {
        panic!("expected three nodes");
    };

    page.component
        .set_data(json!([
            { "id": 3, "label": "three" },
            { "id": 1, "label": "one" },
            { "id": 2, "label": "two" },
        ]))
        .unwrap();

    assert_eq!(page.rendered(), vec![three, one, two]);
}

#[test]
fn items_are_updated_in_place() {
    let page = given_a_keyed_list(json!([{ "id": 1, "label": "before" }]));
    let node = page.rendered()[0];

    page.component
        .set_data(json!([{ "id": 1, "label": "after" }]))
        .unwrap();

    assert_eq!(page.rendered(), vec![node]);
    assert_eq!(labels(&page), vec!["after"]);
}

#[test]
fn actions_carry_the_item_key_and_position() {
    let page = given_a_keyed_list(json!([
        { "id": "A", "label": "a" },
        { "id": "B", "label": "b" },
        { "id": "C", "label": "c" },
    ]));

    let picked = Rc::new(RefCell::new(Vec::new()));
    let reducer: Reducer<MemoryEvent> = {
        let picked = Rc::clone(&picked);
        Rc::new(move |previous: &Value, action: &Action<MemoryEvent>| {
            picked.borrow_mut().push((
                action.key.clone(),
                action.index,
                action.data["label"].clone(),
            ));
            previous.clone()
        })
    };
    page.component.set_reducer(reducer);

    page.component
        .set_data(json!([
            { "id": "B", "label": "b" },
            { "id": "C", "label": "c" },
        ]))
        .unwrap();

    for node in page.rendered() {
        page.dom.dispatch(node, "click");
    }

    assert_eq!(
        *picked.borrow(),
        vec![
            (Some("B".to_string()), Some(0), json!("b")),
            (Some("C".to_string()), Some(1), json!("c")),
        ]
    );
}

#[test]
fn reducer_output_rerenders_the_list() {
    let page = given_a_keyed_list(json!([
        { "id": 1, "label": "one" },
        { "id": 2, "label": "two" },
    ]));

    let reducer: Reducer<MemoryEvent> = Rc::new(|previous: &Value, action: &Action<MemoryEvent>| {
        let Some(index) = action.index else {
            return previous.clone();
        };

        let mut items = previous.as_array().cloned().unwrap_or_default();
        if index < items.len() {
            items.remove(index);
        }

        Value::Array(items)
    });
    page.component.set_reducer(reducer);

    let first = page.rendered()[0];
    page.dom.dispatch(first, "click");

    assert_eq!(labels(&page), vec!["two"]);
    assert_eq!(page.component.data(), json!([{ "id": 2, "label": "two" }]));
}

#[test]
fn list_without_key_field_fails_to_render_items() {
    let dom = MemoryDom::new();
    let host = dom.element("kinesis-list", &[]);
    dom.append(dom.body(), host);
    dom.append(host, dom.element("li", &[("watch", "label")]));

    let component = Component::new(&dom, host, Mode::List, &Rc::new(BindingConfig::default()));
    component.set_data(json!([{ "label": "orphan" }])).unwrap();

    assert!(matches!(component.mount(), Err(BindError::MissingKeyField)));
}
