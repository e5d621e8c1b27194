//! Module descriptors, providers and resolved bundles
//!
//! A module is described by three providers (view, actions, state). Each
//! provider is a factory for a future, so the same descriptor can be fetched
//! again after a failure. Providers may hand back their value directly or
//! wrapped in a default-export envelope; [`Resolved`] makes that explicit.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use derive_deref::{Deref, DerefMut};
use futures::future::{self, BoxFuture, FutureExt};
use serde_json::Value;

use crate::core::{
    action::ActionTree,
    error::{LoadError, ProviderError, ProviderKind},
    state::StateFragment,
};

/// Field name of the default-export envelope
pub const DEFAULT_EXPORT: &str = "default";

/// Value produced by a provider, either bare or inside a default-export envelope
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<T> {
    Wrapped(T),
    Raw(T),
}

impl<T> Resolved<T> {
    /// Strip the envelope, if any
    pub fn into_inner(self) -> T {
        match self {
            Resolved::Wrapped(value) | Resolved::Raw(value) => value,
        }
    }

    pub fn is_wrapped(&self) -> bool {
        matches!(self, Resolved::Wrapped(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolved<U> {
        match self {
            Resolved::Wrapped(value) => Resolved::Wrapped(f(value)),
            Resolved::Raw(value) => Resolved::Raw(f(value)),
        }
    }

    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Resolved<U>, E> {
        Ok(match self {
            Resolved::Wrapped(value) => Resolved::Wrapped(f(value)?),
            Resolved::Raw(value) => Resolved::Raw(f(value)?),
        })
    }
}

impl Resolved<Value> {
    /// Classify a dynamically shaped value.
    ///
    /// An object whose `default` field is present and truthy is an envelope;
    /// anything else, including `{ "default": 0 }`, is taken as-is.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(mut map) if map.get(DEFAULT_EXPORT).is_some_and(is_truthy) => {
                match map.remove(DEFAULT_EXPORT) {
                    Some(inner) => Resolved::Wrapped(inner),
                    None => Resolved::Raw(Value::Object(map)),
                }
            }
            other => Resolved::Raw(other),
        }
    }
}

/// Normalize a provider result
pub fn unwrap<T>(resolved: Resolved<T>) -> T {
    resolved.into_inner()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Interpret a JSON value as a state fragment; `null` is an empty fragment
pub fn state_fragment(value: Value) -> Result<StateFragment, ProviderError> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(StateFragment::new()),
        other => Err(ProviderError::new(format!(
            "state must resolve to an object, got {other}"
        ))),
    }
}

pub type ProviderResult<T> = Result<Resolved<T>, ProviderError>;

type ProviderFn<T> = dyn Fn() -> BoxFuture<'static, ProviderResult<T>> + Send + Sync;

/// Asynchronous source of one part of a module
pub struct Provider<T> {
    fetch: Arc<ProviderFn<T>>,
}

impl<T> Clone for Provider<T> {
    fn clone(&self) -> Self {
        Self {
            fetch: Arc::clone(&self.fetch),
        }
    }
}

impl<T> fmt::Debug for Provider<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Provider(..)")
    }
}

impl<T: Send + 'static> Provider<T> {
    pub fn new<F, Fut>(fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ProviderResult<T>> + Send + 'static,
    {
        Self {
            fetch: Arc::new(move || fetch().boxed()),
        }
    }

    /// Provider that fails every time with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        let error = ProviderError::new(message);
        Self::new(move || future::ready(Err(error.clone())))
    }

    /// Start one fetch
    pub fn fetch(&self) -> BoxFuture<'static, ProviderResult<T>> {
        (self.fetch)()
    }
}

impl<T: Clone + Send + Sync + 'static> Provider<T> {
    /// Provider that resolves immediately to a clone of `resolved`
    pub fn ready(resolved: Resolved<T>) -> Self {
        Self::new(move || future::ready(Ok(resolved.clone())))
    }
}

impl Provider<StateFragment> {
    /// State provider backed by a dynamically shaped value; the envelope is
    /// detected with [`Resolved::from_json`].
    pub fn json_state(value: Value) -> Self {
        Self::new(move || {
            let resolved = Resolved::from_json(value.clone()).try_map(state_fragment);
            future::ready(resolved)
        })
    }
}

/// How to fetch the view, actions and state of one module
#[derive(Debug)]
pub struct ModuleDescriptor<V> {
    pub view: Provider<V>,
    pub actions: Provider<ActionTree>,
    pub state: Provider<StateFragment>,
}

impl<V> Clone for ModuleDescriptor<V> {
    fn clone(&self) -> Self {
        Self {
            view: self.view.clone(),
            actions: self.actions.clone(),
            state: self.state.clone(),
        }
    }
}

impl<V: Send + 'static> ModuleDescriptor<V> {
    pub fn new(
        view: Provider<V>,
        actions: Provider<ActionTree>,
        state: Provider<StateFragment>,
    ) -> Self {
        Self {
            view,
            actions,
            state,
        }
    }

    /// Fetch all three parts concurrently and normalize them.
    ///
    /// The first failing provider aborts the join; nothing is returned for
    /// the others.
    pub async fn fetch(&self, key: &str) -> Result<CachedBundle<V>, LoadError> {
        let with_kind = |kind: ProviderKind| {
            let key = key.to_string();
            move |source: ProviderError| LoadError::provider(key, kind, source)
        };

        let view = self.view.fetch().map(|r| r.map_err(with_kind(ProviderKind::View)));
        let actions = self
            .actions
            .fetch()
            .map(|r| r.map_err(with_kind(ProviderKind::Actions)));
        let state = self
            .state
            .fetch()
            .map(|r| r.map_err(with_kind(ProviderKind::State)));

        let (view, actions, state) = futures::try_join!(view, actions, state)?;

        Ok(CachedBundle {
            view: unwrap(view),
            actions: unwrap(actions),
            state: unwrap(state),
        })
    }
}

/// Static module key to descriptor table
#[derive(Debug, Deref, DerefMut)]
pub struct ModuleTable<V>(pub HashMap<String, ModuleDescriptor<V>>);

impl<V> Default for ModuleTable<V> {
    fn default() -> Self {
        Self(HashMap::new())
    }
}

impl<V> Clone for ModuleTable<V> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<V> ModuleTable<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, descriptor: ModuleDescriptor<V>) -> Self {
        self.0.insert(key.into(), descriptor);
        self
    }

    /// Keys in lexical order
    pub fn sorted_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.keys().cloned().collect();
        keys.sort();
        keys
    }
}

/// Fully resolved module, as held by the registry
#[derive(Debug, Clone)]
pub struct CachedBundle<V> {
    pub view: V,
    pub state: StateFragment,
    pub actions: ActionTree,
}
