use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use derive_deref::{Deref, DerefMut};
use serde_json::Value;

use crate::core::state::StateFragment;

type Reducer = dyn Fn(&Value, &StateFragment) -> StateFragment + Send + Sync;

/// A named state transition supplied by the host or by a lazy module.
///
/// The reducer receives the call payload and the current top-level state
/// fragment, and returns a partial fragment that is shallow-merged back.
#[derive(Clone)]
pub struct Action {
    reducer: Arc<Reducer>,
}

impl Action {
    pub fn new<F>(reducer: F) -> Self
    where
        F: Fn(&Value, &StateFragment) -> StateFragment + Send + Sync + 'static,
    {
        Self {
            reducer: Arc::new(reducer),
        }
    }

    /// Action that writes `payload` under `key`
    pub fn setter(key: impl Into<String>) -> Self {
        let key = key.into();
        Self::new(move |payload, _| {
            let mut patch = StateFragment::new();
            patch.insert(key.clone(), payload.clone());
            patch
        })
    }

    /// Action that adds the numeric payload (default 1) to `key`
    pub fn counter(key: impl Into<String>) -> Self {
        let key = key.into();
        Self::new(move |payload, state| {
            let step = payload.as_i64().unwrap_or(1);
            let current = state.get(&key).and_then(Value::as_i64).unwrap_or(0);
            let mut patch = StateFragment::new();
            patch.insert(key.clone(), Value::from(current + step));
            patch
        })
    }

    /// Compute the patch for `payload` without applying it
    pub fn apply(&self, payload: &Value, state: &StateFragment) -> StateFragment {
        (self.reducer)(payload, state)
    }

    /// Whether both handles point at the same reducer
    pub fn same_as(&self, other: &Action) -> bool {
        Arc::ptr_eq(&self.reducer, &other.reducer)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Action(..)")
    }
}

/// Name to action mapping, merged last-write-wins
#[derive(Debug, Clone, Default, Deref, DerefMut)]
pub struct ActionTree(pub BTreeMap<String, Action>);

impl ActionTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, action: Action) -> Self {
        self.0.insert(name.into(), action);
        self
    }

    /// A new tree holding `self` overlaid by `overlay`; entries of `overlay`
    /// replace entries of `self` with the same name.
    pub fn merged(&self, overlay: &ActionTree) -> ActionTree {
        let mut merged = self.clone();
        for (name, action) in overlay.iter() {
            merged.insert(name.clone(), action.clone());
        }
        merged
    }

    pub fn names(&self) -> Vec<&str> {
        self.keys().map(String::as_str).collect()
    }

    /// Same names bound to the same reducers
    pub fn same_as(&self, other: &ActionTree) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(name, action)| other.get(name).is_some_and(|o| action.same_as(o)))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn fragment(value: Value) -> StateFragment {
        match value {
            Value::Object(map) => map,
            _ => StateFragment::new(),
        }
    }

    #[test]
    fn test_setter_patch() {
        let action = Action::setter("title");
        let patch = action.apply(&json!("hello"), &StateFragment::new());
        assert_eq!(Value::Object(patch), json!({ "title": "hello" }));
    }

    #[test]
    fn test_counter_patch() {
        let action = Action::counter("count");
        let state = fragment(json!({ "count": 2 }));

        assert_eq!(
            Value::Object(action.apply(&Value::Null, &state)),
            json!({ "count": 3 })
        );
        assert_eq!(
            Value::Object(action.apply(&json!(5), &state)),
            json!({ "count": 7 })
        );
        assert_eq!(
            Value::Object(action.apply(&Value::Null, &StateFragment::new())),
            json!({ "count": 1 })
        );
    }

    #[test]
    fn test_merge_overlay_wins() {
        let host_x = Action::setter("x");
        let host_y = Action::setter("y");
        let bundle_x = Action::counter("x");

        let host = ActionTree::new()
            .with("x", host_x.clone())
            .with("y", host_y.clone());
        let bundle = ActionTree::new().with("x", bundle_x.clone());

        let merged = host.merged(&bundle);

        assert_eq!(merged.names(), vec!["x", "y"]);
        assert!(merged["x"].same_as(&bundle_x));
        assert!(!merged["x"].same_as(&host_x));
        assert!(merged["y"].same_as(&host_y));
        // Inputs are untouched
        assert!(host["x"].same_as(&host_x));
    }

    #[test]
    fn test_tree_identity() {
        let a = Action::setter("a");
        let tree = ActionTree::new().with("a", a.clone());
        assert!(tree.same_as(&tree.clone()));
        assert!(!tree.same_as(&ActionTree::new().with("a", Action::setter("a"))));
        assert!(!tree.same_as(&ActionTree::new()));
    }
}
