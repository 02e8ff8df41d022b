use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::{
    binding::NodeBindingSet,
    dom::{Dom, Listener},
    error::BindError,
    evaluator::RenderContext,
    snapshot::{current_snapshot, Action},
};

/// Event that has its default behaviour suppressed and does not propagate past the bound node.
const SUBMIT: &str = "submit";

/// A registry of listeners for a single node, caching one listener per distinct event name that
/// has an action bound to it.
pub struct EventDispatcher<D>
where
    D: Dom,
{
    /// The context of the renderer owning the node. Held weakly, so that listeners left on a
    /// removed node do nothing once their renderer is dropped.
    context: Weak<RenderContext<D>>,

    /// Bindings of the node, containing the action table.
    bindings: Rc<NodeBindingSet>,

    /// Cached listeners.
    listeners: IndexMap<String, Listener<D::Event>>,
}

impl<D> EventDispatcher<D>
where
    D: Dom,
{
    pub fn new(context: &Rc<RenderContext<D>>, bindings: &Rc<NodeBindingSet>) -> Self {
        Self {
            context: Rc::downgrade(context),
            bindings: Rc::clone(bindings),
            listeners: IndexMap::new(),
        }
    }

    /// Get or create the listener for the provided event name.
    pub fn get(&mut self, event: &str) -> &Listener<D::Event> {
        self.listeners.entry(event.to_string()).or_insert_with(|| {
            let context = Weak::clone(&self.context);
            let bindings = Rc::clone(&self.bindings);
            let event_name = event.to_string();
            trace!(event = %event_name, "creating listener");

            Rc::new(move |event: &D::Event| {
                if let Some(context) = context.upgrade() {
                    handle(&context, &bindings, &event_name, event);
                }
            })
        })
    }

    /// Attach one listener to `node` for every event in the action table.
    pub fn attach(&mut self, node: &D::Node) -> Result<(), BindError> {
        let Some(context) = self.context.upgrade() else {
            return Ok(());
        };

        let events = self
            .bindings
            .events()
            .map(String::from)
            .collect::<Vec<_>>();

        for event in events {
            let listener = Rc::clone(self.get(&event));
            context.dom.add_event_listener(node, &event, listener)?;
        }

        Ok(())
    }

    /// Number of distinct events listened to.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

/// Resolve the action bound to `event_name` for the current state, and feed it through the
/// reducer. Events without a matching action are ignored.
fn handle<D>(
    context: &RenderContext<D>,
    bindings: &NodeBindingSet,
    event_name: &str,
    event: &D::Event,
) where
    D: Dom,
{
    if event_name == SUBMIT {
        context.dom.prevent_default(event);
        context.dom.stop_propagation(event);
    }

    let Some(snapshot) = current_snapshot(&context.getter) else {
        return;
    };

    let state = snapshot.state_key(&context.config.state_field);
    let Some(action_type) = bindings.action_for(event_name, &state) else {
        return;
    };

    let reducer = context.link.reducer.borrow().as_ref().map(Rc::clone);
    let Some(reducer) = reducer else {
        debug!(action = %action_type, "no reducer installed, dropping action");
        return;
    };

    debug!(
        event = %context.dom.event_type(event),
        action = %action_type,
        key = ?snapshot.key,
        "dispatching action"
    );

    let action = Action {
        action_type: action_type.to_string(),
        event: event.clone(),
        data: snapshot.data.clone(),
        key: snapshot.key.clone(),
        index: snapshot.index,
    };

    (context.link.update)(Box::new(move |previous| reducer(previous, &action)));
}
