//! Callable handles to a store's dispatch and state
//!
//! Middleware and callable actions never see the store itself. They get a
//! [`Dispatch`] that sends actions through the full middleware chain, and a
//! [`GetState`] that reads the current state.

use crate::action::{Action, Dispatched};
use crate::error::StoreError;
use std::fmt;
use std::rc::Rc;

type DispatchFn = dyn Fn(Action) -> Result<Dispatched, StoreError>;

/// Cloneable handle that dispatches actions
#[derive(Clone)]
pub struct Dispatch(Rc<DispatchFn>);

impl Dispatch {
    pub fn new<F>(dispatch: F) -> Self
    where
        F: Fn(Action) -> Result<Dispatched, StoreError> + 'static,
    {
        Self(Rc::new(dispatch))
    }

    /// Dispatch an action
    pub fn dispatch(&self, action: impl Into<Action>) -> Result<Dispatched, StoreError> {
        (self.0)(action.into())
    }
}

impl fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Dispatch(..)")
    }
}

/// Cloneable handle that reads the current state
pub struct GetState<S>(Rc<dyn Fn() -> Result<S, StoreError>>);

impl<S> GetState<S> {
    pub fn new<F>(get_state: F) -> Self
    where
        F: Fn() -> Result<S, StoreError> + 'static,
    {
        Self(Rc::new(get_state))
    }

    pub fn get(&self) -> Result<S, StoreError> {
        (self.0)()
    }
}

impl<S> Clone for GetState<S> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<S> fmt::Debug for GetState<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("GetState(..)")
    }
}
