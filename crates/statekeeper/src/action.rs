//! Actions - the only way to describe a state change
//!
//! An action is either a serializable record carrying a `type` entry, or a
//! callable value that some middleware knows how to run. The base store only
//! accepts records.

use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

/// Future returned by callable actions that keep working after dispatch returns
pub type LocalBoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

const TYPE_KEY: &str = "type";

/// Whether `value` is a plain data record (an object map), as opposed to an
/// array, a primitive or null.
pub fn is_plain_object(value: &Value) -> bool {
    matches!(value, Value::Object(_))
}

/// A plain action record: a JSON object with a `type` entry plus any payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionRecord(Map<String, Value>);

impl ActionRecord {
    /// Create a record with the given type and no payload
    pub fn new(kind: impl Into<Value>) -> Self {
        let mut fields = Map::new();
        fields.insert(TYPE_KEY.to_string(), kind.into());
        Self(fields)
    }

    /// Wrap an arbitrary map. The `type` entry is checked when dispatched.
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Add a payload field
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// The `type` entry, `None` only when the key is missing
    pub fn kind(&self) -> Option<&Value> {
        self.0.get(TYPE_KEY)
    }

    /// Readable form of the type, used in error messages.
    ///
    /// Falsy types (`null`, `false`, `0`, `""`) have no readable name.
    pub fn type_name(&self) -> Option<String> {
        self.kind().and_then(|kind| match kind {
            Value::Null | Value::Bool(false) => None,
            Value::String(kind) if kind.is_empty() => None,
            Value::Number(number) if number.as_f64() == Some(0.0) => None,
            Value::String(kind) => Some(kind.clone()),
            other => Some(other.to_string()),
        })
    }

    /// Whether this record's type is the string `kind`
    pub fn is(&self, kind: &str) -> bool {
        self.kind().and_then(Value::as_str) == Some(kind)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl TryFrom<Value> for ActionRecord {
    type Error = StoreError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            _ => Err(StoreError::InvalidAction),
        }
    }
}

/// Anything that can be handed to `dispatch`
#[derive(Clone)]
pub enum Action {
    /// A plain record, the only kind the reducer ever sees
    Record(ActionRecord),
    /// A callable that middleware interprets. Rejected by the base store.
    Callable(Rc<dyn Any>),
}

impl Action {
    /// Wrap a callable value so it can travel through the middleware chain
    pub fn callable<T: Any>(callable: T) -> Self {
        Action::Callable(Rc::new(callable))
    }

    pub fn as_record(&self) -> Option<&ActionRecord> {
        match self {
            Action::Record(record) => Some(record),
            Action::Callable(_) => None,
        }
    }

    /// Borrow the callable as `T`, if this is a callable of that type
    pub fn downcast_callable<T: Any>(&self) -> Option<&T> {
        match self {
            Action::Callable(callable) => callable.downcast_ref::<T>(),
            Action::Record(_) => None,
        }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Record(record) => f.debug_tuple("Record").field(record).finish(),
            Action::Callable(_) => f.write_str("Callable(..)"),
        }
    }
}

impl From<ActionRecord> for Action {
    fn from(record: ActionRecord) -> Self {
        Action::Record(record)
    }
}

impl TryFrom<Value> for Action {
    type Error = StoreError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        ActionRecord::try_from(value).map(Action::Record)
    }
}

/// What a dispatch produced
pub enum Dispatched {
    /// The record that reached the reducer, returned unchanged
    Action(ActionRecord),
    /// A callable action ran and had nothing to return
    Done,
    /// A value returned by a callable action
    Value(Box<dyn Any>),
    /// A callable action that continues asynchronously
    Pending(LocalBoxFuture<'static, Result<Dispatched, StoreError>>),
}

impl Dispatched {
    pub fn into_action(self) -> Option<ActionRecord> {
        match self {
            Dispatched::Action(record) => Some(record),
            _ => None,
        }
    }

    /// Take out a value returned by a callable action
    pub fn into_value<T: Any>(self) -> Option<T> {
        match self {
            Dispatched::Value(value) => value.downcast::<T>().ok().map(|value| *value),
            _ => None,
        }
    }

    /// Wait for a pending callable action. Anything else resolves immediately.
    pub async fn settle(self) -> Result<Dispatched, StoreError> {
        match self {
            Dispatched::Pending(future) => future.await,
            other => Ok(other),
        }
    }
}

impl fmt::Debug for Dispatched {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dispatched::Action(record) => f.debug_tuple("Action").field(record).finish(),
            Dispatched::Done => f.write_str("Done"),
            Dispatched::Value(_) => f.write_str("Value(..)"),
            Dispatched::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}
