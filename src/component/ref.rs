use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use tracing::error;

use super::Component;
use crate::{dom::Dom, error::BindError};

/// A weak self-reference to a [`Component`], handed to the closures that the component gives out
/// (its [`crate::snapshot::HostLink`] and its deferred mount). Initially empty, and filled in once
/// the component has been constructed.
///
/// Holding the component weakly means that a dropped component silently ignores any listener or
/// frame that outlives it.
pub struct ComponentRef<D>(Rc<RefCell<Weak<Component<D>>>>)
where
    D: Dom;

impl<D> ComponentRef<D>
where
    D: Dom,
{
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(Weak::new())))
    }

    pub fn replace_with(&self, component: &Rc<Component<D>>) {
        *self.0.borrow_mut() = Rc::downgrade(component);
    }

    pub fn get_ref(&self) -> Option<Rc<Component<D>>> {
        self.0.borrow().upgrade()
    }

    /// Run `f` against the component if it is still alive, logging any error it produces.
    ///
    /// The borrow of the reference is released before `f` runs, so `f` may freely re-enter the
    /// component.
    pub fn with<F>(&self, operation: &'static str, f: F)
    where
        F: FnOnce(&Component<D>) -> Result<(), BindError>,
    {
        let Some(component) = self.get_ref() else {
            return;
        };

        if let Err(error) = f(&component) {
            error!(%error, operation, "component operation failed");
        }
    }
}

impl<D> Clone for ComponentRef<D>
where
    D: Dom,
{
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<D> Default for ComponentRef<D>
where
    D: Dom,
{
    fn default() -> Self {
        Self::new()
    }
}
