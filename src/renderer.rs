use std::{cell::RefCell, rc::Rc};

use tracing::debug;

use crate::{
    component::Component,
    config::BindingConfig,
    dom::{Dom, Location},
    error::BindError,
    evaluator::{Evaluator, RenderContext},
    scanner::{components, scan},
    snapshot::{HostLink, SnapshotGetter},
};

/// A fragment cloned from a template, along with an evaluator for every bound node within it.
///
/// The root nodes are cloned once, and are only ever moved or detached afterwards. Every render
/// mutates them in place.
pub struct Renderer<D>
where
    D: Dom,
{
    context: Rc<RenderContext<D>>,

    /// Root nodes of the fragment, in template order.
    nodes: Vec<D::Node>,

    evaluators: Vec<Evaluator<D>>,

    /// Components nested within the fragment, fed their data by the evaluator of their element.
    children: Vec<Rc<Component<D>>>,
}

impl<D> Renderer<D>
where
    D: Dom,
{
    /// Clone `template`, and build the evaluators for every bound node within the clone. Component
    /// elements within the clone are upgraded, and mount once the fragment is attached.
    pub fn new(
        dom: &D,
        template: &[D::Node],
        config: &Rc<BindingConfig>,
        link: &HostLink<D::Event>,
    ) -> Result<Self, BindError> {
        let nodes = template
            .iter()
            .map(|node| dom.clone_node(node))
            .collect::<Result<Vec<_>, _>>()?;

        let context = Rc::new(RenderContext {
            dom: dom.clone(),
            config: Rc::clone(config),
            link: link.clone(),
            getter: Rc::new(RefCell::new(None)),
        });

        let children = components(dom, &nodes, config)
            .into_iter()
            .filter_map(|node| Component::for_element(dom, node, config))
            .collect::<Vec<_>>();

        let evaluators = scan(dom, &nodes, config)
            .into_iter()
            .map(|node| {
                let child = children
                    .iter()
                    .find(|child| *child.element() == node)
                    .map(Rc::clone);

                Evaluator::new(&context, node, child)
            })
            .collect::<Result<Vec<_>, _>>()?;

        // Defaults are captured above, before the hidden class lands on the children
        for child in &children {
            child.connect()?;
        }

        debug!(
            roots = nodes.len(),
            evaluators = evaluators.len(),
            children = children.len(),
            "created renderer"
        );

        Ok(Self {
            context,
            nodes,
            evaluators,
            children,
        })
    }

    pub fn nodes(&self) -> &[D::Node] {
        &self.nodes
    }

    pub fn evaluators(&self) -> &[Evaluator<D>] {
        &self.evaluators
    }

    pub fn children(&self) -> &[Rc<Component<D>>] {
        &self.children
    }

    /// Store `getter` for use by listeners, and synchronize every evaluator against the snapshot
    /// it produces. Every evaluator sees the same snapshot.
    pub fn render(&mut self, getter: SnapshotGetter) -> Result<(), BindError> {
        *self.context.getter.borrow_mut() = Some(Rc::clone(&getter));
        let snapshot = getter();

        for evaluator in &mut self.evaluators {
            evaluator.synchronize(&self.context, &snapshot)?;
        }

        Ok(())
    }

    /// Mount every root node at `location`, in order.
    pub fn mount(&self, location: &Location<D>) -> Result<(), BindError> {
        for node in &self.nodes {
            location.mount(&self.context.dom, node)?;
        }

        Ok(())
    }

    /// Detach every root node. Nodes that are already detached are left alone.
    pub fn remove(&self) -> Result<(), BindError> {
        for node in &self.nodes {
            self.context.dom.remove(node)?;
        }

        Ok(())
    }
}
