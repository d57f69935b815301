use crate::action::{Action, ActionRecord, Dispatched};
use crate::action_types;
use crate::dispatcher::{Dispatch, GetState};
use crate::enhancer::{Enhancer, StoreCreator};
use crate::error::{Operation, StoreError};
use crate::listeners::{ListenerId, ListenerRegistry};
use crate::observable::Observable;
use crate::reducer::Reducer;
use scopeguard::defer;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Store - holds the single state value and runs the dispatch loop
///
/// The only way to change the state is to dispatch an action. The reducer
/// computes the next state, then every subscribed listener is called, in
/// subscription order.
///
/// A `Store` is a cheap handle: clones share the same state. Stores built
/// with an enhancer share the state of the store they wrap but have their own
/// dispatch.
///
/// # Example
/// ```
/// use statekeeper::{create_store, ActionRecord};
///
/// fn counter(state: Option<i64>, action: &ActionRecord) -> Option<i64> {
///     let count = state.unwrap_or(0);
///     Some(if action.is("INC") { count + 1 } else { count })
/// }
///
/// let store = create_store(counter, None, None)?;
/// store.dispatch(ActionRecord::new("INC"))?;
/// assert_eq!(store.get_state()?, 1);
/// # Ok::<(), statekeeper::StoreError>(())
/// ```
pub struct Store<S> {
    core: Rc<StoreCore<S>>,
    dispatch: Dispatch,
}

pub(crate) struct StoreCore<S> {
    state: RefCell<S>,
    reducer: RefCell<Reducer<S>>,
    listeners: RefCell<ListenerRegistry>,
    is_dispatching: Cell<bool>,
}

impl<S: Clone + 'static> StoreCore<S> {
    pub(crate) fn get_state(&self) -> Result<S, StoreError> {
        if self.is_dispatching.get() {
            return Err(StoreError::Reentrancy(Operation::GetState));
        }
        Ok(self.state.borrow().clone())
    }

    fn dispatch(&self, action: Action) -> Result<Dispatched, StoreError> {
        let record = match action {
            Action::Record(record) => record,
            Action::Callable(_) => return Err(StoreError::InvalidAction),
        };
        if record.kind().is_none() {
            return Err(StoreError::MissingType);
        }
        if self.is_dispatching.get() {
            return Err(StoreError::Reentrancy(Operation::Dispatch));
        }

        self.reduce(&record)?;

        let listeners = self.listeners.borrow_mut().snapshot();
        log::trace!(
            "Reduced {:?}, notifying {} listener(s)",
            record.type_name(),
            listeners.len()
        );
        for (_, listener) in listeners.iter() {
            listener();
        }

        Ok(Dispatched::Action(record))
    }

    fn reduce(&self, action: &ActionRecord) -> Result<(), StoreError> {
        self.is_dispatching.set(true);
        defer! {
            self.is_dispatching.set(false);
        }

        let reducer = self.reducer.borrow().clone();
        let current = self.state.borrow().clone();
        let next = reducer
            .reduce(Some(current), action)?
            .ok_or_else(|| StoreError::UndefinedState {
                key: None,
                action: action.type_name(),
            })?;
        *self.state.borrow_mut() = next;
        Ok(())
    }

    fn subscribe(self: &Rc<Self>, listener: Rc<dyn Fn()>) -> Result<Unsubscribe, StoreError> {
        if self.is_dispatching.get() {
            return Err(StoreError::Reentrancy(Operation::Subscribe));
        }
        let id = self.listeners.borrow_mut().add(listener);
        let host: Weak<dyn ListenerHost> = Rc::downgrade(self) as Weak<dyn ListenerHost>;
        Ok(Unsubscribe {
            host,
            id,
            subscribed: Cell::new(true),
        })
    }

    fn replace_reducer(&self, next_reducer: Reducer<S>) -> Result<(), StoreError> {
        *self.reducer.borrow_mut() = next_reducer;
        // Reducers present in both the old and the new tree keep their state,
        // new ones populate theirs.
        self.dispatch(Action::Record(ActionRecord::new(action_types::replace())))
            .map(|_| ())
    }
}

trait ListenerHost {
    fn remove_listener(&self, id: ListenerId) -> Result<(), StoreError>;
}

impl<S> ListenerHost for StoreCore<S> {
    fn remove_listener(&self, id: ListenerId) -> Result<(), StoreError> {
        if self.is_dispatching.get() {
            return Err(StoreError::Reentrancy(Operation::Unsubscribe));
        }
        self.listeners.borrow_mut().remove(id);
        Ok(())
    }
}

/// Handle returned by [`Store::subscribe`]
///
/// Dropping it does not unsubscribe. Calling [`Unsubscribe::unsubscribe`]
/// more than once is a no-op.
pub struct Unsubscribe {
    host: Weak<dyn ListenerHost>,
    id: ListenerId,
    subscribed: Cell<bool>,
}

impl Unsubscribe {
    pub fn unsubscribe(&self) -> Result<(), StoreError> {
        if !self.subscribed.get() {
            return Ok(());
        }
        if let Some(host) = self.host.upgrade() {
            host.remove_listener(self.id)?;
        }
        self.subscribed.set(false);
        Ok(())
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed.get()
    }
}

impl<S: Clone + 'static> Store<S> {
    /// Start building a store around `reducer`
    pub fn builder(reducer: impl Into<Reducer<S>>) -> StoreBuilder<S> {
        StoreBuilder {
            reducer: reducer.into(),
            preloaded_state: None,
            enhancers: Vec::new(),
        }
    }

    /// The plain store creator, used as the innermost creator for enhancers
    pub fn creator() -> StoreCreator<S> {
        Rc::new(|reducer: Reducer<S>, preloaded_state: Option<S>| {
            Store::create(reducer, preloaded_state)
        })
    }

    fn create(reducer: Reducer<S>, preloaded_state: Option<S>) -> Result<Self, StoreError> {
        // Every reducer returns its initial state for INIT
        let init = ActionRecord::new(action_types::init());
        let state = reducer
            .reduce(preloaded_state, &init)?
            .ok_or_else(|| StoreError::UndefinedState {
                key: None,
                action: init.type_name(),
            })?;
        log::trace!("Store created");

        let core = Rc::new(StoreCore {
            state: RefCell::new(state),
            reducer: RefCell::new(reducer),
            listeners: RefCell::new(ListenerRegistry::new()),
            is_dispatching: Cell::new(false),
        });
        let dispatch = {
            let core = Rc::clone(&core);
            Dispatch::new(move |action| core.dispatch(action))
        };

        Ok(Self { core, dispatch })
    }

    /// Same state, different dispatch
    pub(crate) fn with_dispatch(&self, dispatch: Dispatch) -> Self {
        Self {
            core: Rc::clone(&self.core),
            dispatch,
        }
    }

    pub(crate) fn core(&self) -> &Rc<StoreCore<S>> {
        &self.core
    }

    /// Dispatch an action through this store's dispatch chain
    pub fn dispatch(&self, action: impl Into<Action>) -> Result<Dispatched, StoreError> {
        self.dispatch.dispatch(action)
    }

    /// A handle to this store's dispatch chain
    pub fn dispatcher(&self) -> Dispatch {
        self.dispatch.clone()
    }

    /// Read the current state.
    ///
    /// Fails while the reducer is executing: reducers receive the state as
    /// an argument.
    pub fn get_state(&self) -> Result<S, StoreError> {
        self.core.get_state()
    }

    /// A handle that reads this store's state
    pub fn state_getter(&self) -> GetState<S> {
        let core = Rc::clone(&self.core);
        GetState::new(move || core.get_state())
    }

    /// Register a listener called after every dispatch.
    ///
    /// Listeners added or removed while listeners are being notified take
    /// effect from the next dispatch.
    pub fn subscribe(&self, listener: impl Fn() + 'static) -> Result<Unsubscribe, StoreError> {
        self.core.subscribe(Rc::new(listener))
    }

    /// Swap the reducer and let it populate its state with a `REPLACE` action
    pub fn replace_reducer(&self, next_reducer: impl Into<Reducer<S>>) -> Result<(), StoreError> {
        self.core.replace_reducer(next_reducer.into())
    }

    /// Interop point for observer-style consumers
    pub fn observable(&self) -> Observable<S> {
        Observable::new(self.clone())
    }
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            core: Rc::clone(&self.core),
            dispatch: self.dispatch.clone(),
        }
    }
}

/// Builder for [`Store`]
pub struct StoreBuilder<S> {
    reducer: Reducer<S>,
    preloaded_state: Option<S>,
    enhancers: Vec<Enhancer<S>>,
}

impl<S: Clone + 'static> StoreBuilder<S> {
    pub fn preloaded_state(mut self, state: S) -> Self {
        self.preloaded_state = Some(state);
        self
    }

    /// Set the enhancer. Only one is accepted; compose several with
    /// [`Enhancer::compose`].
    pub fn enhancer(mut self, enhancer: Enhancer<S>) -> Self {
        self.enhancers.push(enhancer);
        self
    }

    pub fn build(mut self) -> Result<Store<S>, StoreError> {
        if self.enhancers.len() > 1 {
            return Err(StoreError::MultipleEnhancers);
        }

        match self.enhancers.pop() {
            Some(enhancer) => enhancer.apply(Store::creator())(self.reducer, self.preloaded_state),
            None => Store::create(self.reducer, self.preloaded_state),
        }
    }
}

/// Create a store with an optional preloaded state and enhancer
pub fn create_store<S: Clone + 'static>(
    reducer: impl Into<Reducer<S>>,
    preloaded_state: Option<S>,
    enhancer: Option<Enhancer<S>>,
) -> Result<Store<S>, StoreError> {
    let mut builder = Store::builder(reducer);
    if let Some(state) = preloaded_state {
        builder = builder.preloaded_state(state);
    }
    if let Some(enhancer) = enhancer {
        builder = builder.enhancer(enhancer);
    }
    builder.build()
}
