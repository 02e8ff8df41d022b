use kinesis_bind::dom::{
    memory::{MemoryDom, NodeId},
    Dom,
};
use serde_json::json;

use super::given_a_mounted_component;

fn texts(dom: &MemoryDom, parent: NodeId) -> Vec<String> {
    dom.children(&parent)
        .into_iter()
        .map(|node| dom.text_content(node))
        .collect()
}

#[test]
fn list_within_a_state_follows_the_outer_data() {
    let page = given_a_mounted_component(
        "kinesis-state",
        &[],
        |dom| {
            let list = dom.element("kinesis-list", &[("data.key", "id"), ("data.watch", "items")]);
            dom.append(list, dom.element("li", &[("watch", "label")]));
            vec![list]
        },
        json!({
            "items": [{ "id": 1, "label": "one" }, { "id": 2, "label": "two" }],
        }),
    );
    let [list] = page.rendered()[..] else {
        panic!("expected one node");
    };

    assert_eq!(texts(&page.dom, list), vec!["one", "two"]);
    assert!(page
        .dom
        .children(&list)
        .into_iter()
        .all(|item| page.dom.attribute(item, "watch").is_none()));
    assert!(!page.dom.has_class(list, "kinesis-hidden"));

    page.component
        .set_data(json!({ "items": [{ "id": 2, "label": "two!" }] }))
        .unwrap();
    assert_eq!(texts(&page.dom, list), vec!["two!"]);
}

#[test]
fn state_within_each_list_item_renders_its_item() {
    let page = given_a_mounted_component(
        "kinesis-list",
        &[("data.key", "id")],
        |dom| {
            let card = dom.element("kinesis-state", &[("data.watch", "details")]);
            dom.append(card, dom.element("span", &[("watch", "text")]));
            vec![card]
        },
        json!([
            { "id": "a", "details": { "text": "first" } },
            { "id": "b", "details": { "text": "second" } },
        ]),
    );

    let cards = page.rendered();
    assert_eq!(cards.len(), 2);
    assert_eq!(texts(&page.dom, cards[0]), vec!["first"]);
    assert_eq!(texts(&page.dom, cards[1]), vec!["second"]);

    page.component
        .set_data(json!([
            { "id": "b", "details": { "text": "second, again" } },
            { "id": "a", "details": { "text": "first" } },
        ]))
        .unwrap();

    assert_eq!(page.rendered(), vec![cards[1], cards[0]]);
    assert_eq!(texts(&page.dom, cards[1]), vec!["second, again"]);
}
