use anyhow::Context;
use serde_json::{json, Map, Value};
use statekeeper::{
    apply_middleware, combine_reducers_with, ActionRecord, Combined, Dispatched,
    LoggingMiddleware, Middleware, ReducerMap, Store, StoreConfig,
};
use statekeeper_thunk::{Thunk, ThunkMiddleware};
use std::rc::Rc;

// Slices are shared so an untouched slice is compared by pointer
type SharedValue = Rc<Value>;
type AppState = Combined<SharedValue>;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = StoreConfig::load();
    log::info!("Starting statekeeper-demo ({:?} mode)", config.mode);

    let store = build_store(&config)?;

    // Print every state change
    let printer = store.clone();
    let unsubscribe = store.subscribe(move || match printer.get_state() {
        Ok(state) => println!("state: {}", render(&state)),
        Err(err) => log::warn!("Could not read state: {}", err),
    })?;

    store.dispatch(ActionRecord::new("INCREMENT"))?;
    store.dispatch(ActionRecord::new("ADD_TODO").with("text", "write reducers"))?;

    // A thunk can dispatch several actions and return a value of its own
    let added = store
        .dispatch(add_todos(vec!["wire middleware", "ship it"]))?
        .into_value::<usize>()
        .context("thunk did not report how many todos it added")?;
    log::info!("Thunk added {} todos", added);

    // Grow the state tree at runtime; existing slices keep their values
    store.replace_reducer(combine_reducers_with(
        app_reducers().with("visibility", visibility),
        &config,
    ))?;
    store.dispatch(ActionRecord::new("SET_VISIBILITY").with("filter", "active"))?;

    unsubscribe.unsubscribe()?;
    store.dispatch(ActionRecord::new("INCREMENT"))?;

    let observed = store
        .observable()
        .subscribe(|state: &AppState| println!("observed: {}", render(state)))?;
    observed.unsubscribe()?;

    log::info!("Exiting statekeeper-demo");
    Ok(())
}

fn build_store(config: &StoreConfig) -> anyhow::Result<Store<AppState>> {
    // Middleware run in this order
    let middlewares: Vec<Box<dyn Middleware<AppState>>> = vec![
        Box::new(LoggingMiddleware::new()),
        Box::new(ThunkMiddleware::with_extra_argument(String::from("demo"))),
    ];
    let store = Store::builder(combine_reducers_with(app_reducers(), config))
        .enhancer(apply_middleware(middlewares))
        .build()
        .context("failed to create store")?;
    Ok(store)
}

fn app_reducers() -> ReducerMap<SharedValue> {
    ReducerMap::new()
        .with("counter", counter)
        .with("todos", todos)
}

fn counter(state: Option<SharedValue>, action: &ActionRecord) -> Option<SharedValue> {
    let count = state.as_deref().and_then(Value::as_i64).unwrap_or(0);
    match action.type_name().as_deref() {
        Some("INCREMENT") => Some(Rc::new(json!(count + 1))),
        Some("DECREMENT") => Some(Rc::new(json!(count - 1))),
        _ => Some(state.unwrap_or_else(|| Rc::new(json!(0)))),
    }
}

fn todos(state: Option<SharedValue>, action: &ActionRecord) -> Option<SharedValue> {
    let state = state.unwrap_or_else(|| Rc::new(json!([])));
    if !action.is("ADD_TODO") {
        return Some(state);
    }

    let mut items = state.as_array().cloned().unwrap_or_default();
    let text = action.get("text").cloned().unwrap_or(Value::Null);
    items.push(json!({ "text": text, "done": false }));
    Some(Rc::new(Value::Array(items)))
}

fn visibility(state: Option<SharedValue>, action: &ActionRecord) -> Option<SharedValue> {
    match action.get("filter") {
        Some(filter) if action.is("SET_VISIBILITY") => Some(Rc::new(filter.clone())),
        _ => Some(state.unwrap_or_else(|| Rc::new(json!("all")))),
    }
}

fn add_todos(texts: Vec<&'static str>) -> Thunk<AppState> {
    Thunk::new(move |dispatch, _get_state, extra| {
        let source = extra.downcast_ref::<String>().cloned().unwrap_or_default();
        for text in &texts {
            dispatch.dispatch(
                ActionRecord::new("ADD_TODO")
                    .with("text", *text)
                    .with("source", source.clone()),
            )?;
        }
        Ok(Dispatched::Value(Box::new(texts.len())))
    })
}

fn render(state: &AppState) -> Value {
    let fields: Map<String, Value> = state
        .iter()
        .map(|(key, value)| (key.to_string(), Value::clone(value)))
        .collect();
    Value::Object(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_todos_appends_items() {
        let state = todos(None, &ActionRecord::new("ADD_TODO").with("text", "a")).unwrap();
        assert_eq!(*state, json!([{ "text": "a", "done": false }]));

        let unchanged = todos(Some(Rc::clone(&state)), &ActionRecord::new("OTHER")).unwrap();
        assert!(Rc::ptr_eq(&unchanged, &state));
    }

    #[test]
    fn test_unrelated_action_keeps_todos_slice() {
        let store = build_store(&StoreConfig::production()).unwrap();
        store
            .dispatch(ActionRecord::new("ADD_TODO").with("text", "a"))
            .unwrap();
        let before = store.get_state().unwrap();

        store.dispatch(ActionRecord::new("INCREMENT")).unwrap();
        let after = store.get_state().unwrap();

        assert!(Rc::ptr_eq(before.get("todos").unwrap(), after.get("todos").unwrap()));
        assert!(!after.ptr_eq(&before));
    }

    #[test]
    fn test_thunk_adds_todos_with_source() {
        let store = build_store(&StoreConfig::production()).unwrap();
        let added = store
            .dispatch(add_todos(vec!["x", "y"]))
            .unwrap()
            .into_value::<usize>();

        assert_eq!(added, Some(2));
        let state = store.get_state().unwrap();
        assert_eq!(
            state.get("todos").map(|todos| Value::clone(todos)),
            Some(json!([
                { "text": "x", "done": false },
                { "text": "y", "done": false }
            ]))
        );
    }

    #[test]
    fn test_replace_reducer_adds_visibility() {
        let config = StoreConfig::production();
        let store = build_store(&config).unwrap();
        store.dispatch(ActionRecord::new("INCREMENT")).unwrap();
        store
            .replace_reducer(combine_reducers_with(
                app_reducers().with("visibility", visibility),
                &config,
            ))
            .unwrap();

        let state = store.get_state().unwrap();
        assert_eq!(state.get("counter").map(|counter| Value::clone(counter)), Some(json!(1)));
        assert_eq!(
            state.get("visibility").map(|filter| Value::clone(filter)),
            Some(json!("all"))
        );
    }
}
