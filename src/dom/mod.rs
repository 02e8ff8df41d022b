mod location;
pub mod memory;
pub mod web;

use std::{fmt::Debug, rc::Rc};

use serde_json::Value;

use crate::error::BindError;
pub use location::Location;

/// Listener attached to a node for a named event.
pub type Listener<E> = Rc<dyn Fn(&E)>;

/// Callback installed on a node as `<property>Changed`, invoked by the node with its new value.
pub type ChangedCallback = Rc<dyn Fn(Value)>;

/// Work deferred until the next animation frame.
pub type FrameCallback = Box<dyn FnOnce()>;

/// The broad categories of node that the binding engine distinguishes between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// An element, with its lower case tag name.
    Element(String),
    Text,
    Other,
}

/// The host document, as seen by the binding engine. Every primitive that the engine needs from
/// the DOM passes through here, so that it can render into a browser document ([`web::WebDom`])
/// or an in-memory one ([`memory::MemoryDom`]).
///
/// Implementations are cheap handles: cloning one must refer to the same document.
pub trait Dom: Clone + 'static {
    /// A handle to a node. Equality must be node identity.
    type Node: Clone + PartialEq + Debug + 'static;

    /// A native event, handed to listeners and carried within actions.
    type Event: Clone + 'static;

    fn kind(&self, node: &Self::Node) -> NodeKind;

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    fn next_sibling(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Names of every attribute on the node, in declaration order.
    fn attribute_names(&self, node: &Self::Node) -> Vec<String>;

    fn get_attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str) -> Result<(), BindError>;

    fn remove_attribute(&self, node: &Self::Node, name: &str) -> Result<(), BindError>;

    /// Replace the markup within the node.
    fn set_inner_html(&self, node: &Self::Node, html: &str) -> Result<(), BindError>;

    /// Assign a property of the node directly.
    fn set_property(&self, node: &Self::Node, name: &str, value: &Value)
        -> Result<(), BindError>;

    /// Install `callback` on the node as the `<name>Changed` property.
    fn set_changed_callback(
        &self,
        node: &Self::Node,
        name: &str,
        callback: ChangedCallback,
    ) -> Result<(), BindError>;

    /// Create a deep copy of the node. Properties and listeners are not copied.
    fn clone_node(&self, node: &Self::Node) -> Result<Self::Node, BindError>;

    /// Insert `node` into `parent` before `reference`, or at the end without a reference. A node
    /// that is already mounted elsewhere is moved.
    fn insert_before(
        &self,
        parent: &Self::Node,
        node: &Self::Node,
        reference: Option<&Self::Node>,
    ) -> Result<(), BindError>;

    /// Detach the node from its parent. Detaching an unmounted node does nothing.
    fn remove(&self, node: &Self::Node) -> Result<(), BindError>;

    fn add_event_listener(
        &self,
        node: &Self::Node,
        event: &str,
        listener: Listener<Self::Event>,
    ) -> Result<(), BindError>;

    fn event_type(&self, event: &Self::Event) -> String;

    fn prevent_default(&self, event: &Self::Event);

    fn stop_propagation(&self, event: &Self::Event);

    fn add_class(&self, node: &Self::Node, class: &str) -> Result<(), BindError>;

    fn remove_class(&self, node: &Self::Node, class: &str) -> Result<(), BindError>;

    /// Run `callback` on the next animation frame.
    fn request_frame(&self, callback: FrameCallback) -> Result<(), BindError>;

    /// Add a style sheet to the document.
    fn inject_style(&self, css: &str) -> Result<(), BindError>;

    /// Tag name of the node, if it is an element.
    fn tag(&self, node: &Self::Node) -> Option<String> {
        match self.kind(node) {
            NodeKind::Element(tag) => Some(tag),
            _ => None,
        }
    }

    /// Whether the node is within a parent.
    fn is_attached(&self, node: &Self::Node) -> bool {
        self.parent(node).is_some()
    }
}
