use crate::action::{Action, Dispatched};
use crate::compose::{compose, Composable};
use crate::dispatcher::{Dispatch, GetState};
use crate::enhancer::{Enhancer, StoreCreator};
use crate::error::StoreError;
use crate::reducer::Reducer;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

pub mod logging;

pub use logging::LoggingMiddleware;

/// Wraps the next dispatch of the chain into a new dispatch
pub type Link = Composable<'static, Dispatch>;

/// Middleware trait - intercepts actions before they reach the reducer
///
/// Middleware sits between `store.dispatch()` and the base store. It may
/// forward the action to `next`, swallow it, replace it, or dispatch other
/// actions through `api`, which re-enters the whole chain.
pub trait Middleware<S: 'static>: 'static {
    /// Handle an action
    ///
    /// - `action`: The action to process
    /// - `api`: Reads state and dispatches through the full chain
    /// - `next`: The rest of the chain, ending in the base store
    fn handle(
        &self,
        action: Action,
        api: &MiddlewareApi<S>,
        next: &Dispatch,
    ) -> Result<Dispatched, StoreError>;

    /// Called once per store while the chain is assembled.
    ///
    /// Dispatching through `api` here fails with
    /// [`StoreError::PrematureDispatch`].
    fn attach(self: Rc<Self>, api: MiddlewareApi<S>) -> Result<Link, StoreError> {
        Ok(Box::new(move |next: Dispatch| {
            let middleware = Rc::clone(&self);
            let api = api.clone();
            Dispatch::new(move |action| middleware.handle(action, &api, &next))
        }))
    }
}

impl<S, F> Middleware<S> for F
where
    S: 'static,
    F: Fn(Action, &MiddlewareApi<S>, &Dispatch) -> Result<Dispatched, StoreError> + 'static,
{
    fn handle(
        &self,
        action: Action,
        api: &MiddlewareApi<S>,
        next: &Dispatch,
    ) -> Result<Dispatched, StoreError> {
        self(action, api, next)
    }
}

/// The restricted store surface handed to middleware
pub struct MiddlewareApi<S> {
    get_state: GetState<S>,
    dispatch: Dispatch,
}

impl<S> MiddlewareApi<S> {
    pub fn get_state(&self) -> Result<S, StoreError> {
        self.get_state.get()
    }

    /// Dispatch through the full middleware chain
    pub fn dispatch(&self, action: impl Into<Action>) -> Result<Dispatched, StoreError> {
        self.dispatch.dispatch(action)
    }

    pub fn dispatcher(&self) -> Dispatch {
        self.dispatch.clone()
    }

    pub fn state_getter(&self) -> GetState<S> {
        self.get_state.clone()
    }
}

impl<S> Clone for MiddlewareApi<S> {
    fn clone(&self) -> Self {
        Self {
            get_state: self.get_state.clone(),
            dispatch: self.dispatch.clone(),
        }
    }
}

impl<S> fmt::Debug for MiddlewareApi<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiddlewareApi").finish_non_exhaustive()
    }
}

type DispatchSlot = Rc<RefCell<Option<Dispatch>>>;

/// Build an enhancer that runs every dispatch through `middlewares`.
///
/// The first middleware listed sees an action first. The innermost `next`
/// is the dispatch of the store being enhanced.
pub fn apply_middleware<S: Clone + 'static>(middlewares: Vec<Box<dyn Middleware<S>>>) -> Enhancer<S> {
    let middlewares: Rc<[Rc<dyn Middleware<S>>]> = middlewares.into_iter().map(Rc::from).collect();

    Enhancer::new(move |create_store: StoreCreator<S>| -> StoreCreator<S> {
        let middlewares = Rc::clone(&middlewares);
        Rc::new(move |reducer: Reducer<S>, preloaded_state: Option<S>| {
            let store = create_store(reducer, preloaded_state)?;

            let slot: DispatchSlot = Rc::new(RefCell::new(None));
            let api = MiddlewareApi {
                get_state: store.state_getter(),
                dispatch: api_dispatch(&slot),
            };

            let chain = middlewares
                .iter()
                .map(|middleware| Rc::clone(middleware).attach(api.clone()))
                .collect::<Result<Vec<Link>, StoreError>>()?;
            let dispatch = compose(chain)(store.dispatcher());
            *slot.borrow_mut() = Some(dispatch);
            log::trace!("Middleware chain assembled ({} middleware)", middlewares.len());

            Ok(store.with_dispatch(Dispatch::new(move |action| {
                let dispatch = slot.borrow().clone().ok_or(StoreError::PrematureDispatch)?;
                dispatch.dispatch(action)
            })))
        })
    })
}

/// The dispatch middleware see. It resolves the chain at call time and
/// only holds the slot weakly, so it never keeps a store alive.
fn api_dispatch(slot: &DispatchSlot) -> Dispatch {
    let slot = Rc::downgrade(slot);
    Dispatch::new(move |action| {
        let slot = slot.upgrade().ok_or(StoreError::StoreDropped)?;
        let dispatch = slot.borrow().clone().ok_or(StoreError::PrematureDispatch)?;
        dispatch.dispatch(action)
    })
}
