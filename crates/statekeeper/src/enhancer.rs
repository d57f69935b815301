//! Store enhancers - wrappers around store construction itself

use crate::compose::{compose, Composable};
use crate::error::StoreError;
use crate::reducer::Reducer;
use crate::store::Store;
use std::fmt;
use std::rc::Rc;

/// Builds a store from a reducer and optional preloaded state
pub type StoreCreator<S> = Rc<dyn Fn(Reducer<S>, Option<S>) -> Result<Store<S>, StoreError>>;

/// Takes a store creator and returns a wrapped one.
///
/// [`apply_middleware`](crate::apply_middleware) is the enhancer that ships
/// with the crate. A store accepts a single enhancer; use
/// [`Enhancer::compose`] to stack several.
pub struct Enhancer<S>(Composable<'static, StoreCreator<S>>);

impl<S: 'static> Enhancer<S> {
    pub fn new<F>(enhance: F) -> Self
    where
        F: Fn(StoreCreator<S>) -> StoreCreator<S> + 'static,
    {
        Self(Box::new(enhance))
    }

    /// Chain enhancers right to left: the first one listed wraps all others.
    pub fn compose(enhancers: impl IntoIterator<Item = Enhancer<S>>) -> Self {
        Self(compose(enhancers.into_iter().map(|enhancer| enhancer.0)))
    }

    pub fn apply(&self, create_store: StoreCreator<S>) -> StoreCreator<S> {
        (self.0)(create_store)
    }
}

impl<S> fmt::Debug for Enhancer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Enhancer(..)")
    }
}
