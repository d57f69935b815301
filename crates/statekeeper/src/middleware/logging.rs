use crate::action::{Action, Dispatched};
use crate::dispatcher::Dispatch;
use crate::error::StoreError;
use crate::middleware::{Middleware, MiddlewareApi};

/// LoggingMiddleware - logs all actions passing through
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingMiddleware;

impl LoggingMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl<S: 'static> Middleware<S> for LoggingMiddleware {
    fn handle(
        &self,
        action: Action,
        _api: &MiddlewareApi<S>,
        next: &Dispatch,
    ) -> Result<Dispatched, StoreError> {
        // Callables are not actions yet, whatever they dispatch shows up here
        if let Some(record) = action.as_record() {
            log::debug!("Action: {:?}", record);
        }

        next.dispatch(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionRecord;
    use crate::middleware::apply_middleware;
    use crate::store::create_store;

    #[test]
    fn test_forwards_actions_unchanged() {
        let store = create_store(
            |state: Option<Vec<String>>, action: &ActionRecord| {
                let mut seen = state.unwrap_or_default();
                if let Some(kind) = action.type_name().filter(|kind| kind.starts_with("TEST")) {
                    seen.push(kind);
                }
                Some(seen)
            },
            None,
            Some(apply_middleware::<Vec<String>>(vec![Box::new(LoggingMiddleware::new())])),
        )
        .unwrap();

        let action = ActionRecord::new("TEST_ONE").with("payload", 7);
        let returned = store.dispatch(action.clone()).unwrap().into_action();

        assert_eq!(returned, Some(action));
        assert_eq!(store.get_state(), Ok(vec!["TEST_ONE".to_string()]));
    }
}
