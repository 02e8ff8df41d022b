use crate::{
    config::BindingConfig,
    dom::{Dom, NodeKind},
    grammar::is_binding,
};

/// Whether the node is an element carrying at least one binding attribute.
pub fn is_active<D>(dom: &D, node: &D::Node) -> bool
where
    D: Dom,
{
    dom.attribute_names(node)
        .iter()
        .any(|name| is_binding(name))
}

/// Collect every active node within `roots` (the roots included), in document order.
///
/// Elements with a component tag are collected if they are themselves active, however their
/// descendants are left alone as they belong to that nested component. The roots are disjoint
/// subtrees, so every node is visited once.
pub fn scan<D>(dom: &D, roots: &[D::Node], config: &BindingConfig) -> Vec<D::Node>
where
    D: Dom,
{
    let mut active = Vec::new();
    roots
        .iter()
        .for_each(|root| visit(dom, root, config, &mut active));

    active
}

fn visit<D>(dom: &D, node: &D::Node, config: &BindingConfig, active: &mut Vec<D::Node>)
where
    D: Dom,
{
    let NodeKind::Element(tag) = dom.kind(node) else {
        return;
    };

    if is_active(dom, node) {
        active.push(node.clone());
    }

    if config.is_component_tag(&tag) {
        return;
    }

    dom.children(node)
        .iter()
        .for_each(|child| visit(dom, child, config, active));
}

/// Collect the component elements within `roots` (the roots included) that are not themselves
/// within another component, in document order.
pub fn components<D>(dom: &D, roots: &[D::Node], config: &BindingConfig) -> Vec<D::Node>
where
    D: Dom,
{
    let mut found = Vec::new();
    roots
        .iter()
        .for_each(|root| visit_components(dom, root, config, &mut found));

    found
}

fn visit_components<D>(dom: &D, node: &D::Node, config: &BindingConfig, found: &mut Vec<D::Node>)
where
    D: Dom,
{
    let NodeKind::Element(tag) = dom.kind(node) else {
        return;
    };

    if config.is_component_tag(&tag) {
        found.push(node.clone());
        return;
    }

    dom.children(node)
        .iter()
        .for_each(|child| visit_components(dom, child, config, found));
}
