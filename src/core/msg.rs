use std::sync::Arc;

use serde_json::Value;

use crate::core::{action::Action, bundle::CachedBundle, error::LoadError};

/// Messages of the lazy-loading slice of the host state
#[derive(Debug, Clone)]
pub enum LazyMsg<V> {
    /// Set the global fetching flag
    SetFetching(bool),
    /// A module started loading: show the lazy slot as fetching
    Fetching { key: String },
    /// All providers of `key` resolved
    Loaded {
        key: String,
        bundle: Arc<CachedBundle<V>>,
    },
    /// A provider of `key` failed or the key is unknown
    Failed { key: String, error: LoadError },
    /// Forget a failed load so the next render starts over
    Retry { key: String },
}

/// Messages processed by `update`
#[derive(Debug, Clone)]
pub enum Msg<V> {
    Lazy(LazyMsg<V>),

    /// Invoke a host or module action with a payload
    Action {
        name: String,
        action: Action,
        payload: Value,
    },
}

impl<V> Msg<V> {
    /// Short label for logging without dumping payloads
    pub fn label(&self) -> String {
        match self {
            Msg::Lazy(LazyMsg::SetFetching(fetching)) => format!("SetFetching({fetching})"),
            Msg::Lazy(LazyMsg::Fetching { key }) => format!("Fetching({key})"),
            Msg::Lazy(LazyMsg::Loaded { key, .. }) => format!("Loaded({key})"),
            Msg::Lazy(LazyMsg::Failed { key, .. }) => format!("Failed({key})"),
            Msg::Lazy(LazyMsg::Retry { key }) => format!("Retry({key})"),
            Msg::Action { name, .. } => format!("Action({name})"),
        }
    }
}

impl<V> From<LazyMsg<V>> for Msg<V> {
    fn from(msg: LazyMsg<V>) -> Self {
        Msg::Lazy(msg)
    }
}
