//! An in-memory document, for rendering without a browser. Every node lives in a single arena
//! owned by the document, and is referred to by its [`NodeId`].

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use indexmap::IndexMap;
use serde_json::Value;

use super::{ChangedCallback, Dom, FrameCallback, Listener, NodeKind};
use crate::error::BindError;

/// Handle to a node within a [`MemoryDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug)]
struct EventState {
    name: String,
    target: NodeId,
    default_prevented: Cell<bool>,
    propagation_stopped: Cell<bool>,
}

/// An event dispatched through a [`MemoryDom`].
#[derive(Debug, Clone)]
pub struct MemoryEvent(Rc<EventState>);

impl MemoryEvent {
    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn target(&self) -> NodeId {
        self.0.target
    }

    pub fn default_prevented(&self) -> bool {
        self.0.default_prevented.get()
    }

    pub fn propagation_stopped(&self) -> bool {
        self.0.propagation_stopped.get()
    }
}

struct NodeData {
    kind: NodeKind,
    text: String,
    attributes: IndexMap<String, String>,
    properties: IndexMap<String, Value>,
    changed_callbacks: IndexMap<String, ChangedCallback>,
    listeners: Vec<(String, Listener<MemoryEvent>)>,
    inner_html: Option<String>,
    attribute_writes: usize,
    insertions: usize,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            text: String::new(),
            attributes: IndexMap::new(),
            properties: IndexMap::new(),
            changed_callbacks: IndexMap::new(),
            listeners: Vec::new(),
            inner_html: None,
            attribute_writes: 0,
            insertions: 0,
            parent: None,
            children: Vec::new(),
        }
    }
}

#[derive(Default)]
struct Document {
    nodes: Vec<NodeData>,
    frames: Vec<FrameCallback>,
    styles: Vec<String>,
}

impl Document {
    fn create(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(data);
        id
    }

    fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0]
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node_mut(id).parent.take() {
            self.node_mut(parent).children.retain(|child| *child != id);
        }
    }

    fn deep_clone(&mut self, id: NodeId) -> NodeId {
        let source = self.node(id);
        let mut data = NodeData::new(source.kind.clone());
        data.text = source.text.clone();
        data.attributes = source.attributes.clone();
        let children = source.children.clone();

        let clone = self.create(data);
        for child in children {
            let child = self.deep_clone(child);
            self.node_mut(child).parent = Some(clone);
            self.node_mut(clone).children.push(child);
        }

        clone
    }

    fn text_content(&self, id: NodeId) -> String {
        let node = self.node(id);
        match node.kind {
            NodeKind::Text => node.text.clone(),
            _ => node
                .children
                .iter()
                .map(|child| self.text_content(*child))
                .collect(),
        }
    }
}

/// A document held entirely in memory. Cloning the handle refers to the same document.
#[derive(Clone)]
pub struct MemoryDom {
    document: Rc<RefCell<Document>>,
    body: NodeId,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// Create an empty document with a `body` element.
    pub fn new() -> Self {
        let mut document = Document::default();
        let body = document.create(NodeData::new(NodeKind::Element("body".to_string())));

        Self {
            document: Rc::new(RefCell::new(document)),
            body,
        }
    }

    /// The root element of the document. Nodes count as attached once they are within a parent.
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Create a detached element with the given attributes, in order.
    pub fn element(&self, tag: &str, attributes: &[(&str, &str)]) -> NodeId {
        let mut data = NodeData::new(NodeKind::Element(tag.to_ascii_lowercase()));
        data.attributes = attributes
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        self.document.borrow_mut().create(data)
    }

    /// Create a detached text node.
    pub fn text(&self, content: &str) -> NodeId {
        let mut data = NodeData::new(NodeKind::Text);
        data.text = content.to_string();

        self.document.borrow_mut().create(data)
    }

    /// Append `child` to `parent`, returning `parent` so that calls can be chained.
    pub fn append(&self, parent: NodeId, child: NodeId) -> NodeId {
        let mut document = self.document.borrow_mut();
        document.detach(child);
        document.node_mut(child).parent = Some(parent);
        document.node_mut(parent).children.push(child);

        parent
    }

    /// Read an attribute without going through [`Dom`].
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.document
            .borrow()
            .node(node)
            .attributes
            .get(name)
            .cloned()
    }

    /// A property previously assigned with [`Dom::set_property`].
    pub fn property(&self, node: NodeId, name: &str) -> Option<Value> {
        self.document
            .borrow()
            .node(node)
            .properties
            .get(name)
            .cloned()
    }

    /// The markup last assigned with [`Dom::set_inner_html`].
    pub fn inner_html(&self, node: NodeId) -> Option<String> {
        self.document.borrow().node(node).inner_html.clone()
    }

    /// Concatenated text of the node and its descendants.
    pub fn text_content(&self, node: NodeId) -> String {
        self.document.borrow().text_content(node)
    }

    /// Number of times [`Dom::set_attribute`] has been called on the node.
    pub fn attribute_writes(&self, node: NodeId) -> usize {
        self.document.borrow().node(node).attribute_writes
    }

    /// Number of times the node has been inserted with [`Dom::insert_before`].
    pub fn insertions(&self, node: NodeId) -> usize {
        self.document.borrow().node(node).insertions
    }

    /// Style sheets injected into the document, in order.
    pub fn styles(&self) -> Vec<String> {
        self.document.borrow().styles.clone()
    }

    /// Whether `class` is present in the `class` attribute of the node.
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.attribute(node, "class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Detach a node, as if removed by something other than the binding engine.
    pub fn detach(&self, node: NodeId) {
        self.document.borrow_mut().detach(node);
    }

    /// Dispatch a bubbling event at `target`. Listeners on the target run first, followed by each
    /// ancestor in turn until one stops propagation.
    pub fn dispatch(&self, target: NodeId, name: &str) -> MemoryEvent {
        let event = MemoryEvent(Rc::new(EventState {
            name: name.to_string(),
            target,
            default_prevented: Cell::new(false),
            propagation_stopped: Cell::new(false),
        }));

        let mut current = Some(target);
        while let Some(node) = current {
            // Listeners are collected before running, as they are free to mutate the document
            let (listeners, parent) = {
                let document = self.document.borrow();
                let data = document.node(node);
                let listeners = data
                    .listeners
                    .iter()
                    .filter(|(event_name, _)| event_name == name)
                    .map(|(_, listener)| Rc::clone(listener))
                    .collect::<Vec<_>>();

                (listeners, data.parent)
            };

            listeners.iter().for_each(|listener| listener(&event));

            if event.propagation_stopped() {
                break;
            }
            current = parent;
        }

        event
    }

    /// Invoke the `<name>Changed` callback of the node, as the node itself would when its value
    /// changes. Returns whether a callback was installed.
    pub fn invoke_changed(&self, node: NodeId, name: &str, value: Value) -> bool {
        let callback = self
            .document
            .borrow()
            .node(node)
            .changed_callbacks
            .get(name)
            .map(Rc::clone);

        match callback {
            Some(callback) => {
                callback(value);
                true
            }
            None => false,
        }
    }

    /// Run frame callbacks until none remain, including those queued by earlier callbacks.
    pub fn run_frames(&self) {
        loop {
            let frames = std::mem::take(&mut self.document.borrow_mut().frames);
            if frames.is_empty() {
                break;
            }

            frames.into_iter().for_each(|frame| frame());
        }
    }

    fn edit_classes<F>(&self, node: NodeId, edit: F) -> Result<(), BindError>
    where
        F: FnOnce(&mut Vec<String>),
    {
        let mut classes = self
            .attribute(node, "class")
            .unwrap_or_default()
            .split_whitespace()
            .map(String::from)
            .collect::<Vec<_>>();
        edit(&mut classes);

        self.set_attribute(&node, "class", &classes.join(" "))
    }
}

impl Dom for MemoryDom {
    type Node = NodeId;
    type Event = MemoryEvent;

    fn kind(&self, node: &NodeId) -> NodeKind {
        self.document.borrow().node(*node).kind.clone()
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.document.borrow().node(*node).parent
    }

    fn children(&self, node: &NodeId) -> Vec<NodeId> {
        self.document.borrow().node(*node).children.clone()
    }

    fn next_sibling(&self, node: &NodeId) -> Option<NodeId> {
        let document = self.document.borrow();
        let parent = document.node(*node).parent?;
        let siblings = &document.node(parent).children;
        let position = siblings.iter().position(|sibling| sibling == node)?;

        siblings.get(position + 1).copied()
    }

    fn attribute_names(&self, node: &NodeId) -> Vec<String> {
        self.document
            .borrow()
            .node(*node)
            .attributes
            .keys()
            .cloned()
            .collect()
    }

    fn get_attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.attribute(*node, name)
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) -> Result<(), BindError> {
        let mut document = self.document.borrow_mut();
        let data = document.node_mut(*node);
        data.attributes.insert(name.to_string(), value.to_string());
        data.attribute_writes += 1;

        Ok(())
    }

    fn remove_attribute(&self, node: &NodeId, name: &str) -> Result<(), BindError> {
        self.document
            .borrow_mut()
            .node_mut(*node)
            .attributes
            .shift_remove(name);

        Ok(())
    }

    fn set_inner_html(&self, node: &NodeId, html: &str) -> Result<(), BindError> {
        let mut document = self.document.borrow_mut();

        for child in document.node(*node).children.clone() {
            document.detach(child);
        }

        let mut text = NodeData::new(NodeKind::Text);
        text.text = html.to_string();
        text.parent = Some(*node);
        let text = document.create(text);

        let data = document.node_mut(*node);
        data.children.push(text);
        data.inner_html = Some(html.to_string());

        Ok(())
    }

    fn set_property(&self, node: &NodeId, name: &str, value: &Value) -> Result<(), BindError> {
        self.document
            .borrow_mut()
            .node_mut(*node)
            .properties
            .insert(name.to_string(), value.clone());

        Ok(())
    }

    fn set_changed_callback(
        &self,
        node: &NodeId,
        name: &str,
        callback: ChangedCallback,
    ) -> Result<(), BindError> {
        self.document
            .borrow_mut()
            .node_mut(*node)
            .changed_callbacks
            .insert(name.to_string(), callback);

        Ok(())
    }

    fn clone_node(&self, node: &NodeId) -> Result<NodeId, BindError> {
        Ok(self.document.borrow_mut().deep_clone(*node))
    }

    fn insert_before(
        &self,
        parent: &NodeId,
        node: &NodeId,
        reference: Option<&NodeId>,
    ) -> Result<(), BindError> {
        let mut document = self.document.borrow_mut();

        if reference == Some(node) {
            return Ok(());
        }

        document.detach(*node);

        let position = match reference {
            Some(reference) => document
                .node(*parent)
                .children
                .iter()
                .position(|child| child == reference)
                .ok_or_else(|| {
                    BindError::dom("insert_before", "reference is not a child of the parent")
                })?,
            None => document.node(*parent).children.len(),
        };

        let data = document.node_mut(*node);
        data.parent = Some(*parent);
        data.insertions += 1;
        document.node_mut(*parent).children.insert(position, *node);

        Ok(())
    }

    fn remove(&self, node: &NodeId) -> Result<(), BindError> {
        self.document.borrow_mut().detach(*node);
        Ok(())
    }

    fn add_event_listener(
        &self,
        node: &NodeId,
        event: &str,
        listener: Listener<MemoryEvent>,
    ) -> Result<(), BindError> {
        self.document
            .borrow_mut()
            .node_mut(*node)
            .listeners
            .push((event.to_string(), listener));

        Ok(())
    }

    fn event_type(&self, event: &MemoryEvent) -> String {
        event.name().to_string()
    }

    fn prevent_default(&self, event: &MemoryEvent) {
        event.0.default_prevented.set(true);
    }

    fn stop_propagation(&self, event: &MemoryEvent) {
        event.0.propagation_stopped.set(true);
    }

    fn add_class(&self, node: &NodeId, class: &str) -> Result<(), BindError> {
        self.edit_classes(*node, |classes| {
            if !classes.iter().any(|c| c == class) {
                classes.push(class.to_string());
            }
        })
    }

    fn remove_class(&self, node: &NodeId, class: &str) -> Result<(), BindError> {
        self.edit_classes(*node, |classes| classes.retain(|c| c != class))
    }

    fn request_frame(&self, callback: FrameCallback) -> Result<(), BindError> {
        self.document.borrow_mut().frames.push(callback);
        Ok(())
    }

    fn inject_style(&self, css: &str) -> Result<(), BindError> {
        self.document.borrow_mut().styles.push(css.to_string());
        Ok(())
    }
}
