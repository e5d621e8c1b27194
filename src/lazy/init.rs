use std::marker::PhantomData;
use std::sync::Arc;

use crate::{
    core::{
        bundle::ModuleTable,
        state::{AppState, LazyState, StateFragment},
    },
    lazy::{LazyConfig, LazyLoader},
};

/// Record the host mount function and its container.
///
/// The returned [`Configurator`] still needs the module table and the
/// loading view.
pub fn create_lazy<V, C, H>(host: H, container: C) -> Configurator<V, C, H> {
    Configurator {
        host,
        container,
        _view: PhantomData,
    }
}

/// Second half of the setup, see [`create_lazy`]
pub struct Configurator<V, C, H> {
    host: H,
    container: C,
    _view: PhantomData<fn() -> V>,
}

impl<V, C, H> Configurator<V, C, H> {
    /// Finish the setup. The fragment must be merged into the host state
    /// before the first render.
    pub fn configure<L>(self, modules: ModuleTable<V>, loading: L) -> (LazyLoader<V, C, H>, LazyFragment<V>)
    where
        L: Fn(bool) -> V + Send + Sync + 'static,
    {
        log::info!("create_lazy: configured with {} modules", modules.len());
        let config = LazyConfig {
            modules,
            loading: Arc::new(loading),
            container: self.container,
        };
        (
            LazyLoader::from_parts(config, self.host),
            LazyFragment::default(),
        )
    }
}

/// Initial lazy slice of the host state.
///
/// The matching actions are the `LazyMsg` variants, reachable from views
/// through `BoundActions`.
#[derive(Debug, Clone, PartialEq)]
pub struct LazyFragment<V> {
    pub fetching: bool,
    pub lazy: LazyState<V>,
}

impl<V> Default for LazyFragment<V> {
    fn default() -> Self {
        Self {
            fetching: false,
            lazy: LazyState::default(),
        }
    }
}

impl<V> LazyFragment<V> {
    /// Host state made of the host's own fragment plus the lazy slice
    pub fn into_app_state(self, host: StateFragment) -> AppState<V> {
        AppState {
            fetching: self.fetching,
            lazy: self.lazy,
            fragment: host,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::test_helpers::{RecordingHost, TestContainer};

    #[test]
    fn test_configure_returns_initial_fragment() {
        let (loader, fragment) = create_lazy(RecordingHost::<String>::new(), TestContainer::root())
            .configure(ModuleTable::<String>::new(), |_| "loading".to_string());

        assert!(!fragment.fetching);
        assert!(fragment.lazy.fetching);
        assert!(fragment.lazy.view.is_none());
        assert!(loader.registry().is_empty());
        assert_eq!(loader.config().container, TestContainer::root());
        assert_eq!((loader.config().loading)(true), "loading");
    }

    #[test]
    fn test_into_app_state_keeps_host_fragment() {
        let fragment: LazyFragment<String> = LazyFragment::default();
        let host = match json!({ "title": "host" }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let state = fragment.into_app_state(host);
        assert_eq!(state.get("title"), Some(&json!("host")));
        assert!(!state.fetching);
        assert!(state.lazy.fetching);
    }

    #[test]
    fn test_loaders_are_independent() {
        let (mut first, _) = create_lazy(RecordingHost::<String>::new(), TestContainer::root())
            .configure(ModuleTable::<String>::new(), |_| "a".to_string());
        let (second, _) = create_lazy(RecordingHost::<String>::new(), TestContainer::root())
            .configure(ModuleTable::<String>::new(), |_| "b".to_string());

        first.registry_mut().mark_loading("home");
        assert_eq!(first.registry().len(), 1);
        assert!(second.registry().is_empty());
    }
}
