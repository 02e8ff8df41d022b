use std::rc::Rc;

use indexmap::IndexSet;
use serde_json::Value;

use crate::{
    binding::NodeBindingSet,
    component::Component,
    dom::{ChangedCallback, Dom},
    error::BindError,
    evaluator::RenderContext,
    grammar::DEFAULT_WATCH_ATTRIBUTE,
    path::{extract_value, stringify},
    snapshot::{current_snapshot, DataSnapshot},
};

/// Attributes that are never written to the markup, as they carry structured values for nested
/// components.
pub const RESERVED_ATTRIBUTES: [&str; 2] = ["data", "reducer"];

/// Attribute carrying the data of a nested component.
const DATA_ATTRIBUTE: &str = "data";

/// Apply the watch bindings for the current state to `node`.
///
/// Each bound value is written as an attribute (unless reserved), mirrored as a property (when
/// the property registry lists it for the node's tag), and written as the node's markup (when the
/// attribute is `content`). These are independent, so a single binding may do all three.
///
/// When the node hosts a nested component, its `data` binding also becomes that component's data,
/// and updates made by the component are written back through the same callback.
pub fn watch_pass<D>(
    context: &RenderContext<D>,
    node: &D::Node,
    bindings: &Rc<NodeBindingSet>,
    snapshot: &DataSnapshot,
    installed: &mut IndexSet<String>,
    child: Option<&Component<D>>,
) -> Result<(), BindError>
where
    D: Dom,
{
    let state = snapshot.state_key(&context.config.state_field);
    let Some(watched) = bindings.watch_for(&state) else {
        return Ok(());
    };

    let dom = &context.dom;
    let tag = dom.tag(node).unwrap_or_default();

    for (attribute, path) in watched {
        let value = extract_value(&snapshot.data, path);

        if !RESERVED_ATTRIBUTES.contains(&attribute.as_str()) {
            dom.set_attribute(node, attribute, &stringify(&value))?;
        }

        if context.config.properties.contains(&tag, attribute) {
            dom.set_property(node, attribute, &value)?;

            if installed.insert(attribute.clone()) {
                let callback = changed_callback(context, bindings, attribute);
                dom.set_changed_callback(node, attribute, Rc::clone(&callback))?;

                if let Some(child) = child.filter(|_| attribute == DATA_ATTRIBUTE) {
                    child.on_data_changed(move |data: &Value| callback(data.clone()));
                }
            }
        }

        if attribute == DEFAULT_WATCH_ATTRIBUTE {
            dom.set_inner_html(node, &stringify(&value))?;
        }

        if let Some(child) = child.filter(|_| attribute == DATA_ATTRIBUTE) {
            child.set_data(value)?;
        }
    }

    Ok(())
}

/// Build the `<attribute>Changed` callback for a node. The path written to is looked up when the
/// callback runs, so that it follows the state the data is in at that point.
fn changed_callback<D>(
    context: &RenderContext<D>,
    bindings: &Rc<NodeBindingSet>,
    attribute: &str,
) -> ChangedCallback
where
    D: Dom,
{
    let getter = Rc::clone(&context.getter);
    let config = Rc::clone(&context.config);
    let write_back = Rc::clone(&context.link.write_back);
    let bindings = Rc::clone(bindings);
    let attribute = attribute.to_string();

    Rc::new(move |value: Value| {
        let Some(snapshot) = current_snapshot(&getter) else {
            return;
        };

        let state = snapshot.state_key(&config.state_field);
        if let Some(path) = bindings
            .watch_for(&state)
            .and_then(|watched| watched.get(&attribute))
        {
            write_back(snapshot.index, path, value);
        }
    })
}

/// Apply the toggle bindings for the current state to `node`. Attributes are only written when
/// their value changes.
pub fn toggle_pass<D>(
    context: &RenderContext<D>,
    node: &D::Node,
    bindings: &NodeBindingSet,
    snapshot: &DataSnapshot,
) -> Result<(), BindError>
where
    D: Dom,
{
    let state = snapshot.state_key(&context.config.state_field);

    for attribute in bindings.toggle.keys() {
        let value = bindings.toggled_value(attribute, &state);
        write_if_changed(&context.dom, node, attribute, &value)?;
    }

    Ok(())
}

/// Apply the asset bindings to `node`, resolving each path against the configured asset base.
pub fn asset_pass<D>(
    context: &RenderContext<D>,
    node: &D::Node,
    bindings: &NodeBindingSet,
) -> Result<(), BindError>
where
    D: Dom,
{
    for (attribute, path) in &bindings.assets {
        let value = context.config.resolve_asset(path);
        write_if_changed(&context.dom, node, attribute, &value)?;
    }

    Ok(())
}

fn write_if_changed<D>(
    dom: &D,
    node: &D::Node,
    attribute: &str,
    value: &str,
) -> Result<(), BindError>
where
    D: Dom,
{
    if dom.get_attribute(node, attribute).as_deref() != Some(value) {
        dom.set_attribute(node, attribute, value)?;
    }

    Ok(())
}
