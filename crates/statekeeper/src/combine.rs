//! Combining named sub-reducers into one reducer over a composite record
//!
//! The combined reducer hands every sub-reducer its own slice of the state and
//! gathers the results into a [`Combined`] record with the same keys. When no
//! slice changed it returns the very same record, so consumers can detect
//! "nothing changed" with [`Combined::ptr_eq`].

use crate::action::ActionRecord;
use crate::action_types;
use crate::config::StoreConfig;
use crate::error::{ShapeFailure, StoreError};
use crate::reducer::Reducer;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Identity comparison for state slices
///
/// Shared pointers compare by address, plain values by equality. A reducer
/// that returns its input unchanged must produce a value that `is_same` as
/// the input.
///
/// Equality on `String` and `serde_json::Value` is a deep comparison, run for
/// every slice on every dispatch. Wrap large slices in `Rc` (for example
/// `Rc<Value>`) to get a pointer comparison instead.
pub trait Slice: Clone {
    fn is_same(&self, other: &Self) -> bool;
}

impl<T: ?Sized> Slice for Rc<T> {
    fn is_same(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

impl<T: ?Sized> Slice for Arc<T> {
    fn is_same(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<T: Slice> Slice for Option<T> {
    fn is_same(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.is_same(b),
            (None, None) => true,
            _ => false,
        }
    }
}

macro_rules! impl_slice_by_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Slice for $ty {
                fn is_same(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

impl_slice_by_value!(
    (),
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    String,
    &'static str,
    serde_json::Value,
);

/// Composite state produced by a combined reducer
///
/// Cloning is cheap and keeps identity: two clones are [`Combined::ptr_eq`].
pub struct Combined<V>(Rc<IndexMap<String, V>>);

impl<V> Combined<V> {
    pub fn new() -> Self {
        Self(Rc::new(IndexMap::new()))
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether both handles point at the same record
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<V> Clone for Combined<V> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<V> Default for Combined<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for Combined<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

impl<V: PartialEq> PartialEq for Combined<V> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<V> Slice for Combined<V> {
    fn is_same(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for Combined<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(Rc::new(
            iter.into_iter().map(|(key, value)| (key.into(), value)).collect(),
        ))
    }
}

/// Named sub-reducers, in the order they run
///
/// An entry without a reducer is kept so it can be reported, then dropped
/// when the map is combined.
pub struct ReducerMap<V> {
    entries: Vec<(String, Option<Reducer<V>>)>,
}

impl<V> ReducerMap<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn with(self, key: impl Into<String>, reducer: impl Into<Reducer<V>>) -> Self {
        self.with_entry(key, Some(reducer.into()))
    }

    /// Insert an entry that may be missing its reducer. A repeated key
    /// replaces the earlier entry but keeps its position.
    pub fn with_entry(mut self, key: impl Into<String>, reducer: Option<Reducer<V>>) -> Self {
        let key = key.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = reducer,
            None => self.entries.push((key, reducer)),
        }
        self
    }
}

impl<V> Default for ReducerMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V> FromIterator<(K, Reducer<V>)> for ReducerMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, Reducer<V>)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |map, (key, reducer)| map.with(key, reducer))
    }
}

/// Combine sub-reducers, taking the diagnostics mode from [`StoreConfig::load`].
pub fn combine_reducers<V: Slice + 'static>(reducers: ReducerMap<V>) -> Reducer<Combined<V>> {
    combine_reducers_with(reducers, &StoreConfig::load())
}

/// Combine sub-reducers into one reducer over a [`Combined`] record.
///
/// Each sub-reducer is called once, right here, with the `INIT` action and
/// with a random unknown action. A reducer that returns no state for either
/// makes the combined reducer fail with [`StoreError::ReducerShape`] every
/// time it runs.
pub fn combine_reducers_with<V: Slice + 'static>(
    reducers: ReducerMap<V>,
    config: &StoreConfig,
) -> Reducer<Combined<V>> {
    let diagnostics = config.diagnostics_enabled();

    let mut final_reducers: Vec<(String, Reducer<V>)> = Vec::with_capacity(reducers.entries.len());
    for (key, reducer) in reducers.entries {
        match reducer {
            Some(reducer) => final_reducers.push((key, reducer)),
            None if diagnostics => log::warn!("No reducer provided for key \"{}\"", key),
            None => {}
        }
    }

    let shape_error = assert_reducer_shape(&final_reducers).err();
    let unexpected_key_cache = RefCell::new(HashSet::new());

    Reducer::fallible(move |state: Option<Combined<V>>, action: &ActionRecord| {
        if let Some(err) = &shape_error {
            return Err(err.clone());
        }

        let state = state.unwrap_or_default();

        if diagnostics {
            let warning = unexpected_state_shape_warning(
                &state,
                &final_reducers,
                action,
                &mut unexpected_key_cache.borrow_mut(),
            );
            if let Some(message) = warning {
                log::warn!("{}", message);
            }
        }

        let mut has_changed = false;
        let mut next_state = IndexMap::with_capacity(final_reducers.len());
        for (key, reducer) in &final_reducers {
            let previous = state.get(key).cloned();
            let next = reducer
                .reduce(previous.clone(), action)?
                .ok_or_else(|| StoreError::UndefinedState {
                    key: Some(key.clone()),
                    action: action.type_name(),
                })?;
            has_changed = has_changed || !previous.is_some_and(|previous| previous.is_same(&next));
            next_state.insert(key.clone(), next);
        }
        has_changed = has_changed || final_reducers.len() != state.len();

        if has_changed {
            Ok(Some(Combined(Rc::new(next_state))))
        } else {
            Ok(Some(state))
        }
    })
}

fn assert_reducer_shape<V>(reducers: &[(String, Reducer<V>)]) -> Result<(), StoreError> {
    let shape_error = |key: &str, failure| StoreError::ReducerShape {
        key: key.to_string(),
        failure,
    };

    for (key, reducer) in reducers {
        let init = ActionRecord::new(action_types::init());
        if reducer.reduce(None, &init)?.is_none() {
            return Err(shape_error(key, ShapeFailure::Initialization));
        }

        let unknown = ActionRecord::new(action_types::random_unknown_action());
        if reducer.reduce(None, &unknown)?.is_none() {
            return Err(shape_error(key, ShapeFailure::UnknownAction));
        }
    }
    Ok(())
}

fn unexpected_state_shape_warning<V>(
    state: &Combined<V>,
    reducers: &[(String, Reducer<V>)],
    action: &ActionRecord,
    unexpected_key_cache: &mut HashSet<String>,
) -> Option<String> {
    if reducers.is_empty() {
        return Some(
            "Store does not have a valid reducer. Make sure the map passed \
             to combine_reducers contains reducers."
                .to_string(),
        );
    }

    let argument_name = if action.is(action_types::init()) {
        "preloaded state passed to the store"
    } else {
        "previous state received by the reducer"
    };

    let unexpected_keys: Vec<&str> = state
        .keys()
        .filter(|key| {
            !reducers.iter().any(|(known, _)| known.as_str() == *key) && !unexpected_key_cache.contains(*key)
        })
        .collect();
    for key in &unexpected_keys {
        unexpected_key_cache.insert(key.to_string());
    }

    if action.is(action_types::replace()) || unexpected_keys.is_empty() {
        return None;
    }

    let known_keys: Vec<&str> = reducers.iter().map(|(key, _)| key.as_str()).collect();
    Some(format!(
        "Unexpected {} \"{}\" found in {}. Expected to find one of the known reducer keys instead: \"{}\". Unexpected keys will be ignored.",
        if unexpected_keys.len() > 1 { "keys" } else { "key" },
        unexpected_keys.join("\", \""),
        argument_name,
        known_keys.join("\", \""),
    ))
}
