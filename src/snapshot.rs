use std::{cell::RefCell, rc::Rc};

use serde_json::Value;

use crate::{grammar::StateKey, path::stringify};

/// What an evaluator reads on each render: the data for its fragment, and where the fragment sits
/// within a list when rendering in list mode.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSnapshot {
    pub data: Value,
    pub key: Option<String>,
    pub index: Option<usize>,
}

impl DataSnapshot {
    /// A snapshot for a single (non-list) fragment.
    pub fn single(data: Value) -> Self {
        Self {
            data,
            key: None,
            index: None,
        }
    }

    /// A snapshot for one item of a list.
    pub fn item(data: Value, key: String, index: usize) -> Self {
        Self {
            data,
            key: Some(key),
            index: Some(index),
        }
    }

    /// The current state of the data, read from `state_field`. Data without the field has no
    /// state.
    pub fn state(&self, state_field: &str) -> Option<String> {
        match self.data.get(state_field)? {
            Value::Null => None,
            state => Some(stringify(state)),
        }
    }

    /// The [`StateKey`] matching the current state.
    pub fn state_key(&self, state_field: &str) -> StateKey {
        StateKey::current(self.state(state_field).as_deref())
    }
}

/// Produces the snapshot for the current render.
pub type SnapshotGetter = Rc<dyn Fn() -> Rc<DataSnapshot>>;

/// The most recent [`SnapshotGetter`] of a renderer, shared with its listeners and callbacks.
pub type SharedGetter = Rc<RefCell<Option<SnapshotGetter>>>;

/// Read the current snapshot through a [`SharedGetter`], if one has been stored yet.
pub fn current_snapshot(getter: &SharedGetter) -> Option<Rc<DataSnapshot>> {
    let getter = getter.borrow().as_ref().map(Rc::clone)?;
    Some(getter())
}

/// Passed to the reducer when an action binding fires.
#[derive(Debug, Clone)]
pub struct Action<E> {
    pub action_type: String,

    /// The native event that fired the action.
    pub event: E,

    /// The data of the fragment the event fired within.
    pub data: Value,

    /// Only present when rendering a list.
    pub key: Option<String>,

    /// Only present when rendering a list.
    pub index: Option<usize>,
}

/// Computes the next top-level data from the previous one and an action.
pub type Reducer<E> = Rc<dyn Fn(&Value, &Action<E>) -> Value>;

/// A transition from the previous top-level data to the next.
pub type Transition = Box<dyn FnOnce(&Value) -> Value>;

/// Replaces the top-level data by applying a transition, and re-renders.
pub type UpdateFn = Rc<dyn Fn(Transition)>;

/// Writes a value into the top-level data at a path, relative to the list item at the index (if
/// any), without re-rendering.
pub type WriteBackFn = Rc<dyn Fn(Option<usize>, &str, Value)>;

/// The reducer of a component, which may be installed or replaced at any point.
pub type SharedReducer<E> = Rc<RefCell<Option<Reducer<E>>>>;

/// Everything a fragment needs to feed changes back into the component that owns the data.
pub struct HostLink<E> {
    pub update: UpdateFn,
    pub reducer: SharedReducer<E>,
    pub write_back: WriteBackFn,
}

impl<E> Clone for HostLink<E> {
    fn clone(&self) -> Self {
        Self {
            update: Rc::clone(&self.update),
            reducer: Rc::clone(&self.reducer),
            write_back: Rc::clone(&self.write_back),
        }
    }
}

impl<E> HostLink<E> {
    pub fn new(update: UpdateFn, reducer: SharedReducer<E>, write_back: WriteBackFn) -> Self {
        Self {
            update,
            reducer,
            write_back,
        }
    }

    /// A link that drops every change, for fragments rendered without an owner.
    pub fn detached() -> Self {
        Self {
            update: Rc::new(|_| {}),
            reducer: Rc::new(RefCell::new(None)),
            write_back: Rc::new(|_, _, _| {}),
        }
    }
}
