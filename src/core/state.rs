use serde_json::{Map, Value};

use crate::core::error::LoadError;

/// Top-level host state that lazy modules contribute to
pub type StateFragment = Map<String, Value>;

/// Lazy-loading slice of the host application state
#[derive(Debug, Clone, PartialEq)]
pub struct LazyState<V> {
    /// Last view delivered by a completed load
    pub view: Option<V>,
    /// True until a load delivers a view
    pub fetching: bool,
    /// Props of the lazy element currently being rendered
    pub props: Value,
    /// Last load failure, cleared by the next successful load
    pub error: Option<LoadError>,
}

impl<V> Default for LazyState<V> {
    fn default() -> Self {
        Self {
            view: None,
            fetching: true,
            props: Value::Null,
            error: None,
        }
    }
}

/// Unified host application state
#[derive(Debug, Clone, PartialEq)]
pub struct AppState<V> {
    /// Global loading indicator shared by every module key
    pub fetching: bool,
    pub lazy: LazyState<V>,
    /// Host state plus whatever lazy modules merged in
    pub fragment: StateFragment,
}

impl<V> Default for AppState<V> {
    fn default() -> Self {
        Self {
            fetching: false,
            lazy: LazyState::default(),
            fragment: StateFragment::new(),
        }
    }
}

impl<V: Clone> AppState<V> {
    pub fn new(fragment: StateFragment) -> Self {
        Self {
            fragment,
            ..Self::default()
        }
    }

    /// State handed to the loading view: nothing but the fetching flag
    pub fn loading_placeholder(fetching: bool) -> Self {
        Self {
            fetching,
            ..Self::default()
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fragment.get(key)
    }

    /// Shallow-merge `patch` into the top-level fragment
    pub fn apply_patch(&mut self, patch: StateFragment) {
        self.fragment.extend(patch);
    }

    /// Copy of `self` with `overlay` merged into the top-level fragment.
    /// Keys of `overlay` win.
    pub fn merged(&self, overlay: &StateFragment) -> Self {
        let mut merged = self.clone();
        merged
            .fragment
            .extend(overlay.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }
}
