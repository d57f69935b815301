//! Error type shared by every store operation

use std::fmt;
use thiserror::Error;

/// Store operations that are forbidden while a reducer is executing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Dispatch,
    GetState,
    Subscribe,
    Unsubscribe,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Operation::Dispatch => "Reducers may not dispatch actions.",
            Operation::GetState => {
                "You may not call get_state() while the reducer is executing. \
                 The reducer has already received the state as an argument. \
                 Pass it down from the top reducer instead of reading it from the store."
            }
            Operation::Subscribe => {
                "You may not call subscribe() while the reducer is executing. \
                 If you would like to be notified after the store has been updated, \
                 subscribe and call get_state() in the listener to access the latest state."
            }
            Operation::Unsubscribe => {
                "You may not unsubscribe from a store listener while the reducer is executing."
            }
        };
        f.write_str(message)
    }
}

/// Which half of the reducer shape check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeFailure {
    /// Returned nothing for the `INIT` action with no prior state.
    Initialization,
    /// Returned nothing for a random unknown action with no prior state.
    UnknownAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Actions must be plain objects. Use custom middleware for async actions.")]
    InvalidAction,

    #[error("Actions may not have an undefined \"type\" property. Have you misspelled a constant?")]
    MissingType,

    #[error("{0}")]
    Reentrancy(Operation),

    #[error(
        "It looks like you are passing several store enhancers to the store. \
         This is not supported. Instead, compose them together into a single enhancer."
    )]
    MultipleEnhancers,

    #[error("{}", undefined_state_message(.key.as_deref(), .action.as_deref()))]
    UndefinedState {
        /// Key of the offending sub-reducer, `None` for the root reducer.
        key: Option<String>,
        /// Type of the action being reduced, if it had a readable one.
        action: Option<String>,
    },

    #[error("{}", reducer_shape_message(.key, .failure))]
    ReducerShape { key: String, failure: ShapeFailure },

    #[error(
        "Dispatching while constructing your middleware is not allowed. \
         Other middleware would not be applied to this dispatch."
    )]
    PrematureDispatch,

    #[error("The store behind this dispatch handle has been dropped.")]
    StoreDropped,
}

fn undefined_state_message(key: Option<&str>, action: Option<&str>) -> String {
    let action_description = match action {
        Some(kind) => format!("action \"{}\"", kind),
        None => "an action".to_string(),
    };
    let reducer = match key {
        Some(key) => format!("reducer \"{}\"", key),
        None => "the root reducer".to_string(),
    };
    format!(
        "Given {}, {} returned no state. \
         To ignore an action, you must explicitly return the previous state.",
        action_description, reducer
    )
}

fn reducer_shape_message(key: &str, failure: &ShapeFailure) -> String {
    match failure {
        ShapeFailure::Initialization => format!(
            "Reducer \"{}\" returned no state during initialization. \
             If the state passed to the reducer is missing, you must \
             explicitly return the initial state.",
            key
        ),
        ShapeFailure::UnknownAction => format!(
            "Reducer \"{}\" returned no state for a random unknown action type. \
             Don't try to handle the reserved INIT or other private action types. \
             Instead, you must return the current state for any unknown actions, \
             unless it is missing, in which case you must return the initial state, \
             regardless of the action type.",
            key
        ),
    }
}
