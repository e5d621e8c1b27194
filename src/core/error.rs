use serde::{Deserialize, Serialize};
use strum::Display;
use thiserror::Error;

/// Which of the three providers of a module produced a value or failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
pub enum ProviderKind {
    View,
    Actions,
    State,
}

/// Failure reported by a single provider future
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ProviderError {
    message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for ProviderError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for ProviderError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Terminal outcome of a module load that did not produce a bundle.
///
/// Stored in the registry and carried by `LazyMsg::Failed`, so it has to be
/// cheap to clone and comparable in tests.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum LoadError {
    #[error("module '{key}' is not registered")]
    UnknownModule { key: String },

    #[error("{kind} provider for module '{key}' failed: {source}")]
    Provider {
        key: String,
        kind: ProviderKind,
        #[source]
        source: ProviderError,
    },

    #[error("no async runtime available to load module '{key}'")]
    NoRuntime { key: String },
}

impl LoadError {
    pub fn unknown(key: impl Into<String>) -> Self {
        LoadError::UnknownModule { key: key.into() }
    }

    pub fn provider(key: impl Into<String>, kind: ProviderKind, source: ProviderError) -> Self {
        LoadError::Provider {
            key: key.into(),
            kind,
            source,
        }
    }

    pub fn no_runtime(key: impl Into<String>) -> Self {
        LoadError::NoRuntime { key: key.into() }
    }

    /// Module key the failure belongs to
    pub fn key(&self) -> &str {
        match self {
            LoadError::UnknownModule { key }
            | LoadError::Provider { key, .. }
            | LoadError::NoRuntime { key } => key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_display() {
        assert_eq!(ProviderKind::View.to_string(), "view");
        assert_eq!(ProviderKind::Actions.to_string(), "actions");
        assert_eq!(ProviderKind::State.to_string(), "state");
    }

    #[test]
    fn test_load_error_messages() {
        let err = LoadError::unknown("home");
        assert_eq!(err.to_string(), "module 'home' is not registered");
        assert_eq!(err.key(), "home");

        let err = LoadError::provider("feed", ProviderKind::State, "network down".into());
        assert_eq!(
            err.to_string(),
            "state provider for module 'feed' failed: network down"
        );
        assert_eq!(err.key(), "feed");
    }

    #[test]
    fn test_load_error_source_chain() {
        use std::error::Error as _;

        let err = LoadError::provider("feed", ProviderKind::View, ProviderError::new("boom"));
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("boom"));
    }
}
