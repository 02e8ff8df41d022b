use js_sys::{Function, Reflect, JSON};
use serde_json::Value;
use wasm_bindgen::{prelude::Closure, JsCast, JsValue};
use web_sys::{window, Document, Element, Event, Node};

use super::{ChangedCallback, Dom, FrameCallback, Listener, NodeKind};
use crate::error::BindError;

/// Produce a closure converting a [`JsValue`] error into a [`BindError`] for `operation`.
fn js_error(operation: &'static str) -> impl Fn(JsValue) -> BindError {
    move |error| BindError::dom(operation, format!("{error:?}"))
}

/// Convert a data value into its JS representation.
fn to_js(value: &Value) -> Result<JsValue, BindError> {
    Ok(match value {
        Value::Null => JsValue::NULL,
        Value::Bool(value) => JsValue::from_bool(*value),
        Value::String(value) => JsValue::from_str(value),
        Value::Number(value) => value
            .as_f64()
            .map(JsValue::from_f64)
            .unwrap_or(JsValue::NULL),
        Value::Array(_) | Value::Object(_) => {
            JSON::parse(&value.to_string()).map_err(js_error("to_js"))?
        }
    })
}

/// Convert a JS value back into a data value. Anything that can't be represented becomes
/// [`Value::Null`].
fn from_js(value: JsValue) -> Value {
    if let Some(string) = value.as_string() {
        return Value::String(string);
    }
    if let Some(boolean) = value.as_bool() {
        return Value::Bool(boolean);
    }
    if let Some(number) = value.as_f64() {
        return serde_json::Number::from_f64(number)
            .map(Value::Number)
            .unwrap_or(Value::Null);
    }
    if value.is_null() || value.is_undefined() {
        return Value::Null;
    }

    JSON::stringify(&value)
        .ok()
        .and_then(|json| serde_json::from_str(&String::from(json)).ok())
        .unwrap_or(Value::Null)
}

/// The browser document, driven through [`web_sys`].
#[derive(Clone)]
pub struct WebDom {
    document: Document,
}

impl WebDom {
    pub fn new(document: &Document) -> Self {
        Self {
            document: document.clone(),
        }
    }

    /// Use the document of the global `window`.
    pub fn global() -> Result<Self, BindError> {
        let document = window()
            .and_then(|window| window.document())
            .ok_or_else(|| BindError::dom("global", "no global document exists"))?;

        Ok(Self::new(&document))
    }

    pub fn body(&self) -> Result<Node, BindError> {
        self.document
            .body()
            .map(Node::from)
            .ok_or_else(|| BindError::dom("body", "document has no body"))
    }

    fn element<'a>(node: &'a Node, operation: &'static str) -> Result<&'a Element, BindError> {
        node.dyn_ref::<Element>()
            .ok_or_else(|| BindError::dom(operation, "node is not an element"))
    }
}

impl Dom for WebDom {
    type Node = Node;
    type Event = Event;

    fn kind(&self, node: &Node) -> NodeKind {
        match node.node_type() {
            Node::ELEMENT_NODE => node
                .dyn_ref::<Element>()
                .map(|element| NodeKind::Element(element.tag_name().to_ascii_lowercase()))
                .unwrap_or(NodeKind::Other),
            Node::TEXT_NODE => NodeKind::Text,
            _ => NodeKind::Other,
        }
    }

    fn parent(&self, node: &Node) -> Option<Node> {
        node.parent_node()
    }

    fn children(&self, node: &Node) -> Vec<Node> {
        let children = node.child_nodes();
        (0..children.length())
            .filter_map(|index| children.get(index))
            .collect()
    }

    fn next_sibling(&self, node: &Node) -> Option<Node> {
        node.next_sibling()
    }

    fn attribute_names(&self, node: &Node) -> Vec<String> {
        node.dyn_ref::<Element>()
            .map(|element| {
                element
                    .get_attribute_names()
                    .iter()
                    .filter_map(|name| name.as_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn get_attribute(&self, node: &Node, name: &str) -> Option<String> {
        node.dyn_ref::<Element>()?.get_attribute(name)
    }

    fn set_attribute(&self, node: &Node, name: &str, value: &str) -> Result<(), BindError> {
        Self::element(node, "set_attribute")?
            .set_attribute(name, value)
            .map_err(js_error("set_attribute"))
    }

    fn remove_attribute(&self, node: &Node, name: &str) -> Result<(), BindError> {
        Self::element(node, "remove_attribute")?
            .remove_attribute(name)
            .map_err(js_error("remove_attribute"))
    }

    fn set_inner_html(&self, node: &Node, html: &str) -> Result<(), BindError> {
        Self::element(node, "set_inner_html")?.set_inner_html(html);
        Ok(())
    }

    fn set_property(&self, node: &Node, name: &str, value: &Value) -> Result<(), BindError> {
        Reflect::set(node, &JsValue::from_str(name), &to_js(value)?)
            .map(|_| ())
            .map_err(js_error("set_property"))
    }

    fn set_changed_callback(
        &self,
        node: &Node,
        name: &str,
        callback: ChangedCallback,
    ) -> Result<(), BindError> {
        let closure = Closure::<dyn Fn(JsValue)>::new(move |value: JsValue| {
            callback(from_js(value));
        })
        .into_js_value();

        Reflect::set(node, &JsValue::from_str(&format!("{name}Changed")), &closure)
            .map(|_| ())
            .map_err(js_error("set_changed_callback"))
    }

    fn clone_node(&self, node: &Node) -> Result<Node, BindError> {
        node.clone_node_with_deep(true)
            .map_err(js_error("clone_node"))
    }

    fn insert_before(
        &self,
        parent: &Node,
        node: &Node,
        reference: Option<&Node>,
    ) -> Result<(), BindError> {
        parent
            .insert_before(node, reference)
            .map(|_| ())
            .map_err(js_error("insert_before"))
    }

    fn remove(&self, node: &Node) -> Result<(), BindError> {
        match node.parent_node() {
            Some(parent) => parent
                .remove_child(node)
                .map(|_| ())
                .map_err(js_error("remove")),
            None => Ok(()),
        }
    }

    fn add_event_listener(
        &self,
        node: &Node,
        event: &str,
        listener: Listener<Event>,
    ) -> Result<(), BindError> {
        let function: Function = Closure::<dyn Fn(Event)>::new(move |event: Event| {
            listener(&event);
        })
        .into_js_value()
        .unchecked_into();

        node.add_event_listener_with_callback(event, &function)
            .map_err(js_error("add_event_listener"))
    }

    fn event_type(&self, event: &Event) -> String {
        event.type_()
    }

    fn prevent_default(&self, event: &Event) {
        event.prevent_default();
    }

    fn stop_propagation(&self, event: &Event) {
        event.stop_propagation();
    }

    fn add_class(&self, node: &Node, class: &str) -> Result<(), BindError> {
        Self::element(node, "add_class")?
            .class_list()
            .add_1(class)
            .map_err(js_error("add_class"))
    }

    fn remove_class(&self, node: &Node, class: &str) -> Result<(), BindError> {
        Self::element(node, "remove_class")?
            .class_list()
            .remove_1(class)
            .map_err(js_error("remove_class"))
    }

    fn request_frame(&self, callback: FrameCallback) -> Result<(), BindError> {
        let window = window().ok_or_else(|| BindError::dom("request_frame", "no window"))?;
        let function: Function = Closure::once_into_js(move || callback()).unchecked_into();

        window
            .request_animation_frame(&function)
            .map(|_| ())
            .map_err(js_error("request_frame"))
    }

    fn inject_style(&self, css: &str) -> Result<(), BindError> {
        let style = self
            .document
            .create_element("style")
            .map_err(js_error("inject_style"))?;
        style.set_text_content(Some(css));

        let head = self
            .document
            .head()
            .ok_or_else(|| BindError::dom("inject_style", "document has no head"))?;

        head.append_child(&style)
            .map(|_| ())
            .map_err(js_error("inject_style"))
    }
}
