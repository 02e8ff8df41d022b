use std::rc::Rc;

use kinesis_bind::{
    dom::memory::MemoryDom, BindError, BindingConfig, Component, Mode,
};
use serde_json::json;

use super::{given_a_configured_component, given_a_mounted_component};

#[test]
fn state_scoped_watch_leaves_attributes_untouched() {
    let page = given_a_mounted_component(
        "kinesis-state",
        &[],
        |dom| vec![dom.element("div", &[("title.editing.watch", "draft")])],
        json!({ "_state": "viewing", "draft": "Unsaved" }),
    );
    let node = page.rendered()[0];

    assert_eq!(page.dom.attribute(node, "title"), None);
    assert_eq!(page.dom.attribute_writes(node), 0);

    page.component
        .set_data(json!({ "_state": "editing", "draft": "Unsaved" }))
        .unwrap();

    assert_eq!(page.dom.attribute(node, "title").as_deref(), Some("Unsaved"));
}

#[test]
fn toggle_appends_to_base_value_and_skips_unchanged_writes() {
    let page = given_a_mounted_component(
        "kinesis-state",
        &[],
        |dom| {
            vec![dom.element(
                "p",
                &[("class", "base"), ("class.hot.toggle", "hot")],
            )]
        },
        json!({ "_state": "hot" }),
    );
    let node = page.rendered()[0];

    assert_eq!(page.dom.attribute(node, "class").as_deref(), Some("base hot"));
    let writes = page.dom.attribute_writes(node);

    page.component.set_data(json!({ "_state": "hot" })).unwrap();
    assert_eq!(page.dom.attribute_writes(node), writes);

    page.component.set_data(json!({ "_state": "cold" })).unwrap();
    assert_eq!(page.dom.attribute(node, "class").as_deref(), Some("base"));
    assert_eq!(page.dom.attribute_writes(node), writes + 1);
}

#[test]
fn watch_fills_content_and_strips_binding_attributes() {
    let page = given_a_mounted_component(
        "kinesis-state",
        &[],
        |dom| {
            vec![
                dom.element("h1", &[("watch", "user.name")]),
                dom.element("span", &[("watch", "user.nickname")]),
            ]
        },
        json!({ "user": { "name": "Ada", "nickname": null } }),
    );
    let [name, nickname] = page.rendered()[..] else {
        panic!("expected two nodes");
    };

    assert_eq!(page.dom.text_content(name), "Ada");
    assert_eq!(page.dom.text_content(nickname), "");
    assert_eq!(page.dom.attribute(name, "watch"), None);
}

#[test]
fn registered_properties_are_assigned_directly() {
    let page = given_a_mounted_component(
        "kinesis-state",
        &[],
        |dom| {
            vec![
                dom.element("input", &[("value.watch", "query"), ("disabled.watch", "busy")]),
                dom.element("kinesis-state", &[("data.watch", "profile")]),
            ]
        },
        json!({ "query": "rust", "busy": true, "profile": { "name": "Ada" } }),
    );
    let [input, profile] = page.rendered()[..] else {
        panic!("expected two nodes");
    };

    assert_eq!(page.dom.property(input, "value"), Some(json!("rust")));
    assert_eq!(page.dom.attribute(input, "value").as_deref(), Some("rust"));
    assert_eq!(page.dom.property(input, "disabled"), Some(json!(true)));

    assert_eq!(page.dom.property(profile, "data"), Some(json!({ "name": "Ada" })));
    assert_eq!(page.dom.attribute(profile, "data"), None);
}

#[test]
fn assets_resolve_against_the_configured_base() {
    let config = BindingConfig {
        asset_base: "/static/".to_string(),
        ..BindingConfig::default()
    };
    let page = given_a_configured_component(
        config,
        "kinesis-state",
        &[],
        |dom| {
            vec![
                dom.element("img", &[("asset", "logo.png")]),
                dom.element("link", &[("href.asset", "site.css")]),
                dom.element("img", &[("asset", "https://example.com/a.png")]),
            ]
        },
        json!({}),
    );
    let [logo, stylesheet, remote] = page.rendered()[..] else {
        panic!("expected three nodes");
    };

    assert_eq!(
        page.dom.attribute(logo, "src").as_deref(),
        Some("/static/logo.png")
    );
    assert_eq!(
        page.dom.attribute(stylesheet, "href").as_deref(),
        Some("/static/site.css")
    );
    assert_eq!(
        page.dom.attribute(remote, "src").as_deref(),
        Some("https://example.com/a.png")
    );
}

#[test]
fn state_field_is_configurable() {
    let config = BindingConfig::from_json(r#"{ "state_field": "mode" }"#).unwrap();
    let page = given_a_configured_component(
        config,
        "kinesis-state",
        &[],
        |dom| vec![dom.element("div", &[("class.open.toggle", "is-open")])],
        json!({ "mode": "open", "_state": "closed" }),
    );

    assert_eq!(
        page.dom.attribute(page.rendered()[0], "class").as_deref(),
        Some("is-open")
    );
}

#[test]
fn malformed_toggle_aborts_the_first_render() {
    let dom = MemoryDom::new();
    let host = dom.element("kinesis-state", &[]);
    dom.append(dom.body(), host);
    dom.append(host, dom.element("div", &[("class.toggle", "on")]));

    let component = Component::new(&dom, host, Mode::Single, &Rc::new(BindingConfig::default()));

    assert!(matches!(
        component.mount(),
        Err(BindError::ToggleArity { attribute }) if attribute == "class.toggle"
    ));
}

#[test]
fn unresolvable_paths_render_empty() {
    let page = given_a_mounted_component(
        "kinesis-state",
        &[],
        |dom| vec![dom.element("p", &[("watch", "profile.address.city")])],
        json!({ "profile": "anonymous" }),
    );

    assert_eq!(page.dom.text_content(page.rendered()[0]), "");
}
