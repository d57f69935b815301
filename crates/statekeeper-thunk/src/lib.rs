//! # statekeeper-thunk
//!
//! Middleware that lets a callable be dispatched in place of an action.
//!
//! A [`Thunk`] receives the store's `dispatch` and `get_state`, plus an
//! optional extra argument configured on the middleware. Whatever it returns
//! becomes the result of `dispatch`. Returning [`Dispatched::Pending`] hands
//! asynchronous work back to the caller, who decides when to await it.
//!
//! ```rust
//! use statekeeper::{apply_middleware, create_store, ActionRecord, Dispatched};
//! use statekeeper_thunk::{Thunk, ThunkMiddleware};
//!
//! fn counter(state: Option<i64>, action: &ActionRecord) -> Option<i64> {
//!     let count = state.unwrap_or(0);
//!     Some(if action.is("INC") { count + 1 } else { count })
//! }
//!
//! let enhancer = apply_middleware::<i64>(vec![Box::new(ThunkMiddleware::new())]);
//! let store = create_store(counter, None, Some(enhancer))?;
//!
//! let twice = Thunk::<i64>::new(|dispatch, _get_state, _extra| {
//!     dispatch.dispatch(ActionRecord::new("INC"))?;
//!     dispatch.dispatch(ActionRecord::new("INC"))?;
//!     Ok(Dispatched::Done)
//! });
//! store.dispatch(twice)?;
//! assert_eq!(store.get_state()?, 2);
//! # Ok::<(), statekeeper::StoreError>(())
//! ```

use statekeeper::{Action, Dispatch, Dispatched, GetState, Middleware, MiddlewareApi, StoreError};
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::rc::Rc;

/// Extra value handed to every thunk, set once on the middleware
#[derive(Clone, Default)]
pub struct ExtraArgument(Option<Rc<dyn Any>>);

impl ExtraArgument {
    pub fn new<T: Any>(value: T) -> Self {
        Self(Some(Rc::new(value)))
    }

    /// Borrow the extra argument as `T`
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_deref().and_then(|value| value.downcast_ref::<T>())
    }

    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }
}

impl fmt::Debug for ExtraArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(_) => f.write_str("ExtraArgument(..)"),
            None => f.write_str("ExtraArgument(None)"),
        }
    }
}

type ThunkFn<S> = dyn Fn(Dispatch, GetState<S>, ExtraArgument) -> Result<Dispatched, StoreError>;

/// A callable action for a store with state `S`
pub struct Thunk<S>(Rc<ThunkFn<S>>);

impl<S: 'static> Thunk<S> {
    pub fn new<F>(run: F) -> Self
    where
        F: Fn(Dispatch, GetState<S>, ExtraArgument) -> Result<Dispatched, StoreError> + 'static,
    {
        Self(Rc::new(run))
    }

    /// A thunk whose work continues asynchronously.
    ///
    /// Dispatching it returns [`Dispatched::Pending`] right away.
    pub fn deferred<F, Fut>(run: F) -> Self
    where
        F: Fn(Dispatch, GetState<S>, ExtraArgument) -> Fut + 'static,
        Fut: Future<Output = Result<Dispatched, StoreError>> + 'static,
    {
        Self::new(move |dispatch, get_state, extra| {
            Ok(Dispatched::Pending(Box::pin(run(dispatch, get_state, extra))))
        })
    }

    pub fn run(
        &self,
        dispatch: Dispatch,
        get_state: GetState<S>,
        extra: ExtraArgument,
    ) -> Result<Dispatched, StoreError> {
        (self.0)(dispatch, get_state, extra)
    }
}

impl<S> Clone for Thunk<S> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<S> fmt::Debug for Thunk<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Thunk(..)")
    }
}

impl<S: 'static> From<Thunk<S>> for Action {
    fn from(thunk: Thunk<S>) -> Self {
        Action::callable(thunk)
    }
}

/// ThunkMiddleware - runs [`Thunk`] actions instead of forwarding them
#[derive(Debug, Clone, Default)]
pub struct ThunkMiddleware {
    extra: ExtraArgument,
}

impl ThunkMiddleware {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand `extra` to every thunk this middleware runs
    pub fn with_extra_argument<T: Any>(extra: T) -> Self {
        Self {
            extra: ExtraArgument::new(extra),
        }
    }
}

impl<S: 'static> Middleware<S> for ThunkMiddleware {
    fn handle(
        &self,
        action: Action,
        api: &MiddlewareApi<S>,
        next: &Dispatch,
    ) -> Result<Dispatched, StoreError> {
        if let Some(thunk) = action.downcast_callable::<Thunk<S>>() {
            log::trace!("Running thunk");
            return thunk.run(api.dispatcher(), api.state_getter(), self.extra.clone());
        }

        next.dispatch(action)
    }
}
