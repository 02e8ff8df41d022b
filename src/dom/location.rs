use super::Dom;
use crate::error::BindError;

/// Expresses a location relative to a node in the DOM. Used to direct where the root nodes of a
/// [`crate::renderer::Renderer`] are mounted.
pub struct Location<D>
where
    D: Dom,
{
    /// The parent to mount nodes within.
    parent: D::Node,

    /// An optional anchor to use when mounting. If provided, nodes will be inserted before the
    /// anchor, otherwise they will be appended to the parent.
    anchor: Option<D::Node>,
}

impl<D> Clone for Location<D>
where
    D: Dom,
{
    fn clone(&self) -> Self {
        Self {
            parent: self.parent.clone(),
            anchor: self.anchor.clone(),
        }
    }
}

impl<D> Location<D>
where
    D: Dom,
{
    /// Create a location from a parent, without an anchor.
    pub fn parent(parent: &D::Node) -> Self {
        Self {
            parent: parent.clone(),
            anchor: None,
        }
    }

    /// Whether `node` is already in place, immediately before the anchor (or last within the
    /// parent when there is no anchor).
    pub fn is_in_place(&self, dom: &D, node: &D::Node) -> bool {
        dom.parent(node).as_ref() == Some(&self.parent)
            && dom.next_sibling(node).as_ref() == self.anchor.as_ref()
    }

    /// Use the location to mount the provided node. Assumes that the parent is mounted.
    pub fn mount(&self, dom: &D, node: &D::Node) -> Result<(), BindError> {
        dom.insert_before(&self.parent, node, self.anchor.as_ref())
    }

    /// Mount `node` unless it is already in place. Returns whether the node was moved.
    pub fn mount_if_moved(&self, dom: &D, node: &D::Node) -> Result<bool, BindError> {
        if self.is_in_place(dom, node) {
            return Ok(false);
        }

        self.mount(dom, node)?;
        Ok(true)
    }

    /// Move the anchor onto `node`, so that later mounts land before it.
    pub fn advance_to(&mut self, node: &D::Node) {
        self.anchor = Some(node.clone());
    }
}
