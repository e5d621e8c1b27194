//! Lazy module loading
//!
//! [`create_lazy`] records the host mount function and container, and
//! [`Configurator::configure`] adds the module table and loading view to
//! produce a [`LazyLoader`]. The host view tree then calls
//! [`LazyLoader::lazy`] on every render pass:
//!
//! - cached key: the bundle's state and actions are merged into the host's
//!   and its view is mounted ([`renderer`])
//! - cold key: the three providers are fetched concurrently on a tokio task
//!   while the loading view is shown ([`loader`])
//! - failed key: the loading view is shown with `fetching = false` until the
//!   host sends `LazyMsg::Retry`

pub mod dispatcher;
pub mod init;
pub mod loader;
pub mod renderer;

use std::fmt;
use std::sync::Arc;

use crate::core::{bundle::ModuleTable, registry::Registry};

pub use dispatcher::{Lazy, Route};
pub use init::{create_lazy, Configurator, LazyFragment};

/// Builds the transient loading view; the flag is the current fetching state
pub type LoadingView<V> = Arc<dyn Fn(bool) -> V + Send + Sync>;

/// Everything recorded at configuration time
pub struct LazyConfig<V, C> {
    pub modules: ModuleTable<V>,
    pub loading: LoadingView<V>,
    pub container: C,
}

impl<V, C: fmt::Debug> fmt::Debug for LazyConfig<V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyConfig")
            .field("modules", &self.modules.len())
            .field("container", &self.container)
            .finish_non_exhaustive()
    }
}

/// Configured loader instance: configuration, host and bundle registry
pub struct LazyLoader<V, C, H> {
    config: LazyConfig<V, C>,
    host: H,
    registry: Registry<V>,
}

impl<V, C, H> LazyLoader<V, C, H> {
    pub(crate) fn from_parts(config: LazyConfig<V, C>, host: H) -> Self {
        Self {
            config,
            host,
            registry: Registry::new(),
        }
    }

    pub fn config(&self) -> &LazyConfig<V, C> {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn registry(&self) -> &Registry<V> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry<V> {
        &mut self.registry
    }

    /// Replace the module table and loading view. Bundles already in the
    /// registry stay cached.
    pub fn reconfigure<L>(&mut self, modules: ModuleTable<V>, loading: L)
    where
        L: Fn(bool) -> V + Send + Sync + 'static,
    {
        log::info!("LazyLoader: reconfigured with {} modules", modules.len());
        self.config.modules = modules;
        self.config.loading = Arc::new(loading);
    }
}
