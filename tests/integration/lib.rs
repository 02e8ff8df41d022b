use std::{cell::RefCell, rc::Rc};

use kinesis_bind::{
    dom::{
        memory::{MemoryDom, MemoryEvent, NodeId},
        Dom,
    },
    Action, BindingConfig, Component, Reducer,
};
use serde_json::Value;

mod actions_tests;
mod bindings_tests;
mod grammar_properties;
mod keyed_list_tests;
mod nested_components_tests;

/// A document containing a single component, already mounted.
pub(crate) struct Page {
    pub dom: MemoryDom,
    pub host: NodeId,
    pub component: Rc<Component<MemoryDom>>,
}

impl Page {
    /// The rendered children of the component.
    pub fn rendered(&self) -> Vec<NodeId> {
        self.dom.children(&self.host)
    }
}

/// Build a component element from `tag` and `attributes`, fill it with `template`, and mount it
/// with `data`.
pub(crate) fn given_a_mounted_component<T>(
    tag: &str,
    attributes: &[(&str, &str)],
    template: T,
    data: Value,
) -> Page
where
    T: FnOnce(&MemoryDom) -> Vec<NodeId>,
{
    given_a_configured_component(BindingConfig::default(), tag, attributes, template, data)
}

pub(crate) fn given_a_configured_component<T>(
    config: BindingConfig,
    tag: &str,
    attributes: &[(&str, &str)],
    template: T,
    data: Value,
) -> Page
where
    T: FnOnce(&MemoryDom) -> Vec<NodeId>,
{
    let dom = MemoryDom::new();
    let host = dom.element(tag, attributes);
    dom.append(dom.body(), host);
    for node in template(&dom) {
        dom.append(host, node);
    }

    let component = Component::for_element(&dom, host, &Rc::new(config))
        .expect("host to carry a component tag");
    component.set_data(data).expect("data to be accepted");
    component.connect().expect("component to connect");
    dom.run_frames();
    assert!(component.is_mounted());

    Page {
        dom,
        host,
        component,
    }
}

/// A reducer recording every action type it sees, and otherwise returning the previous data.
pub(crate) fn given_a_recording_reducer() -> (Reducer<MemoryEvent>, Rc<RefCell<Vec<String>>>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let reducer: Reducer<MemoryEvent> = {
        let seen = Rc::clone(&seen);
        Rc::new(move |previous: &Value, action: &Action<MemoryEvent>| {
            seen.borrow_mut().push(action.action_type.clone());
            previous.clone()
        })
    };

    (reducer, seen)
}
