//! Observer-style view of a store
//!
//! Emits the current state on subscription and again after every dispatch.

use crate::error::StoreError;
use crate::store::{Store, Unsubscribe};
use std::rc::{Rc, Weak};

/// Receives state values from an [`Observable`]
pub trait Observer<S> {
    fn next(&self, _state: &S) {}
}

impl<S, F> Observer<S> for F
where
    F: Fn(&S),
{
    fn next(&self, state: &S) {
        self(state)
    }
}

pub struct Observable<S> {
    store: Store<S>,
}

impl<S: Clone + 'static> Observable<S> {
    pub(crate) fn new(store: Store<S>) -> Self {
        Self { store }
    }

    /// Push the current state to `observer`, then keep it informed.
    pub fn subscribe(&self, observer: impl Observer<S> + 'static) -> Result<Subscription, StoreError> {
        let observer = Rc::new(observer);
        observer.next(&self.store.get_state()?);

        let core = Rc::downgrade(self.store.core());
        let listener_observer = Rc::clone(&observer);
        let unsubscribe = self.store.subscribe(move || {
            let Some(core) = Weak::upgrade(&core) else {
                return;
            };
            match core.get_state() {
                Ok(state) => listener_observer.next(&state),
                Err(err) => log::warn!("Observer skipped: {}", err),
            }
        })?;

        Ok(Subscription { unsubscribe })
    }
}

/// Stops emission to one observer
pub struct Subscription {
    unsubscribe: Unsubscribe,
}

impl Subscription {
    pub fn unsubscribe(&self) -> Result<(), StoreError> {
        self.unsubscribe.unsubscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionRecord;
    use crate::store::create_store;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    fn counter(state: Option<i64>, action: &ActionRecord) -> Option<i64> {
        let count = state.unwrap_or(0);
        Some(if action.is("INC") { count + 1 } else { count })
    }

    #[test]
    fn test_emits_initial_and_subsequent_states() {
        let store = create_store(counter, Some(5), None).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let subscription = {
            let seen = Rc::clone(&seen);
            store
                .observable()
                .subscribe(move |state: &i64| seen.borrow_mut().push(*state))
                .unwrap()
        };

        store.dispatch(ActionRecord::new("INC")).unwrap();
        subscription.unsubscribe().unwrap();
        store.dispatch(ActionRecord::new("INC")).unwrap();

        assert_eq!(*seen.borrow(), vec![5, 6]);
    }

    #[test]
    fn test_observer_without_next_is_accepted() {
        struct Silent;
        impl Observer<i64> for Silent {}

        let store = create_store(counter, None, None).unwrap();
        let subscription = store.observable().subscribe(Silent).unwrap();
        store.dispatch(ActionRecord::new("INC")).unwrap();
        subscription.unsubscribe().unwrap();
    }
}
