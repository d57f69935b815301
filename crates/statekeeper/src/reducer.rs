use crate::action::ActionRecord;
use crate::error::StoreError;
use std::fmt;
use std::rc::Rc;

type ReduceFn<S> = dyn Fn(Option<S>, &ActionRecord) -> Result<Option<S>, StoreError>;

/// Reducer - pure function that produces the next state from the current
/// state and an action
///
/// `None` stands for "no state yet" on the way in, and for a broken reducer
/// on the way out: a reducer must return the current state for unknown
/// actions and its initial state when it receives `None`.
pub struct Reducer<S> {
    reduce: Rc<ReduceFn<S>>,
}

impl<S> Reducer<S> {
    pub fn new<F>(reduce: F) -> Self
    where
        F: Fn(Option<S>, &ActionRecord) -> Option<S> + 'static,
    {
        Self {
            reduce: Rc::new(move |state: Option<S>, action: &ActionRecord| Ok(reduce(state, action))),
        }
    }

    /// A reducer that can fail, such as the one built by `combine_reducers`
    pub fn fallible<F>(reduce: F) -> Self
    where
        F: Fn(Option<S>, &ActionRecord) -> Result<Option<S>, StoreError> + 'static,
    {
        Self {
            reduce: Rc::new(reduce),
        }
    }

    pub fn reduce(&self, state: Option<S>, action: &ActionRecord) -> Result<Option<S>, StoreError> {
        (self.reduce)(state, action)
    }
}

impl<S> Clone for Reducer<S> {
    fn clone(&self) -> Self {
        Self {
            reduce: Rc::clone(&self.reduce),
        }
    }
}

impl<S> fmt::Debug for Reducer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Reducer(..)")
    }
}

impl<S, F> From<F> for Reducer<S>
where
    F: Fn(Option<S>, &ActionRecord) -> Option<S> + 'static,
{
    fn from(reduce: F) -> Self {
        Reducer::new(reduce)
    }
}
