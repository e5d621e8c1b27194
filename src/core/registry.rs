use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::core::{bundle::CachedBundle, error::LoadError};

/// Per-key load progress. An absent key has not been requested yet.
#[derive(Debug, Clone)]
pub enum LoadState<V> {
    Loading,
    Loaded(Arc<CachedBundle<V>>),
    Failed(LoadError),
}

/// Payload-free view of [`LoadState`], used for routing and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
pub enum LoadStatus {
    NotLoaded,
    Loading,
    Loaded,
    Failed,
}

impl<V> LoadState<V> {
    pub fn status(&self) -> LoadStatus {
        match self {
            LoadState::Loading => LoadStatus::Loading,
            LoadState::Loaded(_) => LoadStatus::Loaded,
            LoadState::Failed(_) => LoadStatus::Failed,
        }
    }
}

/// Module key to load state.
///
/// Written only from the update loop, so a `Loaded` entry always holds a
/// complete bundle: it is inserted in one step after all providers resolved.
#[derive(Debug)]
pub struct Registry<V> {
    entries: HashMap<String, LoadState<V>>,
}

impl<V> Default for Registry<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<V> Registry<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&LoadState<V>> {
        self.entries.get(key)
    }

    pub fn status(&self, key: &str) -> LoadStatus {
        self.get(key)
            .map_or(LoadStatus::NotLoaded, LoadState::status)
    }

    /// Cached bundle for `key`, if loaded
    pub fn bundle(&self, key: &str) -> Option<Arc<CachedBundle<V>>> {
        match self.entries.get(key) {
            Some(LoadState::Loaded(bundle)) => Some(Arc::clone(bundle)),
            _ => None,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        matches!(self.entries.get(key), Some(LoadState::Loaded(_)))
    }

    /// Record that a fetch for `key` is in flight.
    /// Returns false when the key is already loading or loaded.
    pub fn mark_loading(&mut self, key: &str) -> bool {
        match self.entries.get(key) {
            Some(LoadState::Loading) | Some(LoadState::Loaded(_)) => false,
            Some(LoadState::Failed(_)) | None => {
                self.entries.insert(key.to_string(), LoadState::Loading);
                true
            }
        }
    }

    pub fn insert_loaded(&mut self, key: impl Into<String>, bundle: Arc<CachedBundle<V>>) {
        let key = key.into();
        if let Some(LoadState::Loaded(_)) = self.entries.get(&key) {
            log::debug!("Registry: replacing loaded bundle for '{key}'");
        }
        self.entries.insert(key, LoadState::Loaded(bundle));
    }

    pub fn insert_failed(&mut self, key: impl Into<String>, error: LoadError) {
        self.entries.insert(key.into(), LoadState::Failed(error));
    }

    /// Forget a failed entry so the key can be requested again.
    /// Returns false when the key was not failed.
    pub fn clear_failed(&mut self, key: &str) -> bool {
        if let Some(LoadState::Failed(_)) = self.entries.get(key) {
            self.entries.remove(key);
            true
        } else {
            false
        }
    }

    /// Number of keys with a fetch in flight
    pub fn loading_count(&self) -> usize {
        self.entries
            .values()
            .filter(|state| matches!(state, LoadState::Loading))
            .count()
    }

    /// Keys holding a bundle, in lexical order
    pub fn loaded_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .entries
            .iter()
            .filter(|(_, state)| matches!(state, LoadState::Loaded(_)))
            .map(|(key, _)| key.as_str())
            .collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
