//! Private action types reserved by the store
//!
//! Reducers must return the current state for any unknown action, and the
//! initial state when there is no current state. They must never match on
//! these types: each one carries a random suffix chosen once per process, so
//! user action types can't collide with them by accident or on purpose.

use rand::distributions::Alphanumeric;
use rand::Rng;
use std::sync::OnceLock;

const PREFIX: &str = "@@statekeeper";

fn random_suffix() -> String {
    let token: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();
    token.to_lowercase()
}

fn reserved(name: &str) -> String {
    format!("{}/{}.{}", PREFIX, name, random_suffix())
}

/// Dispatched once when a store is created so every reducer returns its initial state.
pub fn init() -> &'static str {
    static INIT: OnceLock<String> = OnceLock::new();
    INIT.get_or_init(|| reserved("INIT"))
}

/// Dispatched after `replace_reducer` so the new reducer populates its state.
pub fn replace() -> &'static str {
    static REPLACE: OnceLock<String> = OnceLock::new();
    REPLACE.get_or_init(|| reserved("REPLACE"))
}

/// A fresh action type no reducer can know about, used to check reducer shape.
pub fn random_unknown_action() -> String {
    reserved("UNKNOWN_ACTION")
}
