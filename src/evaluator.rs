use std::rc::Rc;

use indexmap::IndexSet;

use crate::{
    binding::NodeBindingSet,
    component::Component,
    config::BindingConfig,
    dispatch::EventDispatcher,
    dom::Dom,
    error::BindError,
    snapshot::{DataSnapshot, HostLink, SharedGetter},
    sync::{asset_pass, toggle_pass, watch_pass},
};

/// State shared between every evaluator of a single [`crate::renderer::Renderer`], and the
/// listeners and callbacks that they install.
pub struct RenderContext<D>
where
    D: Dom,
{
    pub dom: D,
    pub config: Rc<BindingConfig>,
    pub link: HostLink<D::Event>,

    /// The getter used by the most recent render.
    pub getter: SharedGetter,
}

/// Keeps a single bound node in sync with the data.
pub struct Evaluator<D>
where
    D: Dom,
{
    node: D::Node,
    bindings: Rc<NodeBindingSet>,

    /// Kept so that the listeners attached to the node are known to this evaluator.
    dispatcher: EventDispatcher<D>,

    /// Attributes with a `<attribute>Changed` callback installed on the node.
    installed: IndexSet<String>,

    /// The component living on the node, when the node is a nested component.
    child: Option<Rc<Component<D>>>,
}

impl<D> Evaluator<D>
where
    D: Dom,
{
    /// Build the bindings of `node`, strip them from the markup, and attach its listeners. `child`
    /// is the component living on the node, which receives the node's `data` binding.
    pub fn new(
        context: &Rc<RenderContext<D>>,
        node: D::Node,
        child: Option<Rc<Component<D>>>,
    ) -> Result<Self, BindError> {
        let bindings = Rc::new(NodeBindingSet::build(&context.dom, &node)?);

        let mut dispatcher = EventDispatcher::new(context, &bindings);
        dispatcher.attach(&node)?;

        Ok(Self {
            node,
            bindings,
            dispatcher,
            installed: IndexSet::new(),
            child,
        })
    }

    /// Number of distinct events the node listens to.
    pub fn listener_count(&self) -> usize {
        self.dispatcher.len()
    }

    /// Bring the node in line with `snapshot`.
    pub fn synchronize(
        &mut self,
        context: &RenderContext<D>,
        snapshot: &DataSnapshot,
    ) -> Result<(), BindError> {
        watch_pass(
            context,
            &self.node,
            &self.bindings,
            snapshot,
            &mut self.installed,
            self.child.as_deref(),
        )?;
        toggle_pass(context, &self.node, &self.bindings, snapshot)?;
        asset_pass(context, &self.node, &self.bindings)?;

        Ok(())
    }
}
