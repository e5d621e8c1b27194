use std::sync::Arc;

use tokio::runtime::Handle;

use crate::{
    core::{
        dispatch::BoundActions,
        error::LoadError,
        state::AppState,
    },
    host::{Container, Host, View},
    lazy::{LazyLoader, Route},
};

impl<V, C, H> LazyLoader<V, C, H>
where
    V: View,
    C: Container,
    H: Host<V, C>,
{
    /// Start loading `key`.
    ///
    /// Synchronously: marks the key as loading, raises the global fetching
    /// flag when it is down, or mounts the loading view when it is already up.
    /// The providers then run on a tokio task whose outcome comes back as
    /// `LazyMsg::Loaded` or `LazyMsg::Failed`.
    pub fn load_module(&mut self, key: &str, state: &AppState<V>, actions: &BoundActions<V>) -> Route {
        let first_request = self.registry.mark_loading(key);

        if state.fetching {
            self.mount_loading(true, actions);
        } else {
            actions.fetching(true);
        }

        if !first_request {
            log::debug!(
                "load_module: '{key}' is {}, not fetching again",
                self.registry.status(key)
            );
            return Route::Loading;
        }

        let Some(descriptor) = self.config.modules.get(key).cloned() else {
            log::warn!("load_module: unknown module '{key}'");
            actions.failed(key, LoadError::unknown(key));
            return Route::Loading;
        };

        let Ok(handle) = Handle::try_current() else {
            log::error!("load_module: no tokio runtime to load '{key}'");
            actions.failed(key, LoadError::no_runtime(key));
            return Route::Loading;
        };

        log::info!("load_module: fetching '{key}'");
        let key = key.to_string();
        let actions = actions.detached();
        handle.spawn(async move {
            match descriptor.fetch(&key).await {
                Ok(bundle) => {
                    log::debug!("load_module: '{key}' resolved");
                    actions.loaded(key, Arc::new(bundle));
                }
                Err(error) => {
                    log::warn!("load_module: {error}");
                    actions.failed(key, error);
                }
            }
        });

        Route::Loading
    }

    /// Mount the loading view into the container's first child, or into the
    /// container itself when it has no children.
    pub(crate) fn mount_loading(&mut self, fetching: bool, actions: &BoundActions<V>) {
        let view = (self.config.loading)(fetching);
        let target = self.config.container.first_child().unwrap_or_else(|| {
            log::debug!("mount_loading: container has no child, mounting in place");
            self.config.container.clone()
        });
        self.host.mount(
            &AppState::loading_placeholder(fetching),
            &actions.detached(),
            &view,
            &target,
        );
    }
}
