//! # Lazyview - lazy module loading for Elm-style UIs
//!
//! A host application declares a table of modules, each made of three
//! asynchronous providers (view, actions, state). Its view tree contains
//! [`Lazy`] elements; the first time one is rendered the providers are
//! fetched concurrently while a loading view is shown, and the resolved
//! bundle is cached and merged into the host's state and actions.
//!
//! ## Architecture Overview
//!
//! - **Model** (`core::state`): host state with a lazy-loading slice
//! - **Message** (`core::msg`): lazy lifecycle events and action calls
//! - **Update** (`core::update`): pure transitions, registry writes included
//! - **Command** (`core::cmd`): side effects requested by `update`
//! - **Loader** (`lazy`): dispatch, load and render of lazy elements
//!
//! ## Example Usage
//!
//! ```rust
//! use lazyview::{
//!     core::{action::ActionTree, bundle::{ModuleDescriptor, ModuleTable, Provider, Resolved}},
//!     integration::runtime::Runtime,
//!     lazy::{create_lazy, Lazy, Route},
//!     test_helpers::{fragment, RecordingHost, TestContainer},
//! };
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let home = ModuleDescriptor::new(
//!     Provider::ready(Resolved::Wrapped("home view".to_string())),
//!     Provider::ready(Resolved::Raw(ActionTree::new())),
//!     Provider::json_state(json!({ "greeting": "hi" })),
//! );
//! let (loader, lazy) = create_lazy(RecordingHost::new(), TestContainer::root())
//!     .configure(ModuleTable::new().with("home", home), |_| "loading".to_string());
//! let mut runtime = Runtime::new(loader, lazy, fragment(json!({})), ActionTree::new(), |_| {
//!     Lazy::new("home", json!(null))
//! });
//!
//! assert_eq!(runtime.run_until_settled().await, Route::Rendered);
//! let mounted = runtime.loader().host().last().cloned().unwrap();
//! assert_eq!(mounted.view, "home view");
//! assert_eq!(mounted.state.get("greeting"), Some(&json!("hi")));
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`core`] - state, messages, update, registry and module bundles
//! - [`lazy`] - `create_lazy`, the loader, renderer and dispatcher
//! - [`host`] - traits the host application implements
//! - [`integration`] - runtime and the demo application runner
//! - [`presentation`] - terminal and headless hosts
//! - [`infrastructure`] - config, CLI, simulated providers, terminal

pub mod core;
pub mod host;
pub mod infrastructure;
pub mod integration;
pub mod lazy;
pub mod presentation;
pub mod test_helpers;
pub mod utils;

pub use crate::core::{
    action::{Action, ActionTree},
    bundle::{CachedBundle, ModuleDescriptor, ModuleTable, Provider, Resolved},
    error::LoadError,
    msg::{LazyMsg, Msg},
    state::AppState,
    update::update,
};
pub use host::{Container, Host, View};
pub use integration::runtime::{Runtime, RuntimeStats};
pub use lazy::{create_lazy, Lazy, LazyLoader, Route};

/// Result type used throughout the library
pub type Result<T> = color_eyre::eyre::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
