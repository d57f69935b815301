//! # statekeeper
//!
//! A predictable state container: one store holds the application's whole
//! state, actions describe what happened, and a reducer computes the next
//! state from the previous one and an action.
//!
//! ## Building blocks
//!
//! - [`Store`]: holds the state, runs the reducer on [`Store::dispatch`] and
//!   notifies subscribed listeners afterwards.
//! - [`combine_reducers`]: merges named sub-reducers into one reducer over a
//!   [`Combined`] record.
//! - [`apply_middleware`]: an [`Enhancer`] that runs every dispatch through
//!   a chain of [`Middleware`].
//! - [`compose`]: right-to-left function composition used to chain
//!   middleware and enhancers.
//!
//! ## Usage
//!
//! ```rust
//! use statekeeper::{apply_middleware, combine_reducers, create_store};
//! use statekeeper::{ActionRecord, Combined, LoggingMiddleware, ReducerMap};
//!
//! fn counter(state: Option<i64>, action: &ActionRecord) -> Option<i64> {
//!     let count = state.unwrap_or(0);
//!     Some(if action.is("INC") { count + 1 } else { count })
//! }
//!
//! let reducer = combine_reducers(ReducerMap::new().with("counter", counter));
//! let enhancer = apply_middleware::<Combined<i64>>(vec![Box::new(LoggingMiddleware::new())]);
//! let store = create_store(reducer, None, Some(enhancer))?;
//!
//! store.dispatch(ActionRecord::new("INC"))?;
//! assert_eq!(store.get_state()?.get("counter"), Some(&1));
//! # Ok::<(), statekeeper::StoreError>(())
//! ```

pub mod action;
pub mod action_types;
pub mod combine;
pub mod compose;
pub mod config;
pub mod dispatcher;
pub mod enhancer;
pub mod error;
mod listeners;
pub mod middleware;
pub mod observable;
pub mod reducer;
pub mod store;

pub use action::{is_plain_object, Action, ActionRecord, Dispatched, LocalBoxFuture};
pub use combine::{combine_reducers, combine_reducers_with, Combined, ReducerMap, Slice};
pub use compose::{compose, Composable};
pub use config::{Mode, StoreConfig};
pub use dispatcher::{Dispatch, GetState};
pub use enhancer::{Enhancer, StoreCreator};
pub use error::{Operation, ShapeFailure, StoreError};
pub use middleware::{apply_middleware, Link, LoggingMiddleware, Middleware, MiddlewareApi};
pub use observable::{Observable, Observer, Subscription};
pub use reducer::Reducer;
pub use store::{create_store, Store, StoreBuilder, Unsubscribe};
