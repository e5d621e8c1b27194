use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::Display;

use crate::{
    core::{dispatch::BoundActions, registry::LoadState, state::AppState},
    host::{Container, Host, View},
    lazy::LazyLoader,
};

/// A lazy element in the host view tree: which module, with which props
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lazy {
    pub key: String,
    #[serde(default)]
    pub props: Value,
}

impl Lazy {
    pub fn new(key: impl Into<String>, props: Value) -> Self {
        Self {
            key: key.into(),
            props,
        }
    }
}

/// Which path a dispatch took
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
pub enum Route {
    /// Cached bundle mounted
    Rendered,
    /// Load started or still in flight
    Loading,
    /// Previous load failed; loading view shown without fetching
    Failed,
}

impl<V, C, H> LazyLoader<V, C, H>
where
    V: View,
    C: Container,
    H: Host<V, C>,
{
    /// Entry point called by the host view tree on every render pass
    pub fn lazy(&mut self, element: &Lazy, state: &AppState<V>, actions: &BoundActions<V>) -> Route {
        match self.registry.get(&element.key) {
            Some(LoadState::Loaded(bundle)) => {
                let bundle = Arc::clone(bundle);
                self.render(&bundle, state, actions, &element.props)
            }
            Some(LoadState::Failed(error)) => {
                log::debug!("lazy: '{}' failed earlier: {error}", element.key);
                self.mount_loading(false, actions);
                Route::Failed
            }
            Some(LoadState::Loading) | None => self.load_module(&element.key, state, actions),
        }
    }
}
