use std::fmt;
use std::mem;

use tokio::sync::mpsc;

use crate::{
    core::{
        action::ActionTree,
        cmd::Cmd,
        dispatch::{BoundActions, Dispatch},
        msg::Msg,
        state::{AppState, StateFragment},
        update::{update, UpdateContext},
    },
    host::{Container, Host, View},
    lazy::{Lazy, LazyFragment, LazyLoader, Route},
};

type RootView<V> = Box<dyn Fn(&AppState<V>) -> Lazy + Send>;

/// Host-side update loop around a [`LazyLoader`].
///
/// Owns the host state and the message queue. Every message goes through
/// `update`; commands asking for a render are coalesced and the root view,
/// which picks the lazy element to show, is evaluated again.
pub struct Runtime<V, C, H> {
    state: AppState<V>,
    actions: ActionTree,
    loader: LazyLoader<V, C, H>,
    root: RootView<V>,
    dispatch: Dispatch<V>,
    msg_rx: mpsc::UnboundedReceiver<Msg<V>>,
    render_requested: bool,
    last_route: Option<Route>,
    stats: RuntimeStats,
}

/// Runtime statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeStats {
    pub messages_processed: usize,
    pub renders: usize,
    pub loads_in_flight: usize,
    pub cached_modules: usize,
}

impl<V, C, H> fmt::Debug for Runtime<V, C, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("render_requested", &self.render_requested)
            .field("last_route", &self.last_route)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<V, C, H> Runtime<V, C, H>
where
    V: View,
    C: Container,
    H: Host<V, C>,
{
    /// Create a runtime. `host_state` and `host_actions` are merged with the
    /// lazy fragment; `root` is the host view tree reduced to the lazy
    /// element it renders for a given state.
    pub fn new<F>(
        loader: LazyLoader<V, C, H>,
        fragment: LazyFragment<V>,
        host_state: StateFragment,
        host_actions: ActionTree,
        root: F,
    ) -> Self
    where
        F: Fn(&AppState<V>) -> Lazy + Send + 'static,
    {
        let (dispatch, msg_rx) = Dispatch::channel();
        Self {
            state: fragment.into_app_state(host_state),
            actions: host_actions,
            loader,
            root: Box::new(root),
            dispatch,
            msg_rx,
            render_requested: false,
            last_route: None,
            stats: RuntimeStats::default(),
        }
    }

    pub fn state(&self) -> &AppState<V> {
        &self.state
    }

    pub fn loader(&self) -> &LazyLoader<V, C, H> {
        &self.loader
    }

    pub fn loader_mut(&mut self) -> &mut LazyLoader<V, C, H> {
        &mut self.loader
    }

    pub fn dispatch(&self) -> Dispatch<V> {
        self.dispatch.clone()
    }

    /// Host actions bound to this runtime's queue
    pub fn bound_actions(&self) -> BoundActions<V> {
        BoundActions::new(self.actions.clone(), self.dispatch.clone())
    }

    pub fn send(&self, msg: impl Into<Msg<V>>) -> bool {
        self.dispatch.send(msg)
    }

    pub fn render_requested(&self) -> bool {
        self.render_requested
    }

    pub fn last_route(&self) -> Option<Route> {
        self.last_route
    }

    /// Evaluate the root view and hand its lazy element to the loader
    pub fn render(&mut self) -> Route {
        self.render_requested = false;
        let element = (self.root)(&self.state);
        let actions = self.bound_actions();
        let route = self.loader.lazy(&element, &self.state, &actions);
        log::debug!("Runtime: rendered '{}' -> {route}", element.key);
        self.stats.renders += 1;
        self.last_route = Some(route);
        route
    }

    /// Run one message through `update` and execute the resulting commands
    pub fn process_message(&mut self, msg: Msg<V>) -> Vec<Cmd> {
        log::debug!("Runtime: processing {}", msg.label());
        let state = mem::take(&mut self.state);
        let mut ctx = UpdateContext {
            registry: self.loader.registry_mut(),
        };
        let (state, commands) = update(msg, state, &mut ctx);
        self.state = state;
        self.stats.messages_processed += 1;
        for cmd in &commands {
            self.execute(cmd);
        }
        commands
    }

    /// Process every queued message without waiting. Returns how many ran.
    pub fn process_pending(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.process_message(msg);
            processed += 1;
        }
        processed
    }

    /// Wait for the next queued message
    pub async fn next_msg(&mut self) -> Option<Msg<V>> {
        self.msg_rx.recv().await
    }

    /// Render, then keep processing messages and re-rendering until nothing
    /// is queued, no render is pending and no load is in flight.
    pub async fn run_until_settled(&mut self) -> Route {
        let mut route = self.render();
        loop {
            self.process_pending();
            if self.render_requested {
                route = self.render();
                continue;
            }
            if self.loader.registry().loading_count() == 0 {
                break;
            }
            match self.msg_rx.recv().await {
                Some(msg) => {
                    self.process_message(msg);
                }
                None => break,
            }
        }
        route
    }

    /// Get runtime statistics
    pub fn get_stats(&self) -> RuntimeStats {
        RuntimeStats {
            loads_in_flight: self.loader.registry().loading_count(),
            cached_modules: self.loader.registry().loaded_keys().len(),
            ..self.stats
        }
    }

    fn execute(&mut self, cmd: &Cmd) {
        match cmd {
            Cmd::RequestRender => self.render_requested = true,
            Cmd::LogError { message } => log::error!("Runtime: {message}"),
            Cmd::LogInfo { message } => log::info!("Runtime: {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    use super::*;
    use crate::{
        core::{
            action::Action,
            bundle::ModuleTable,
            msg::LazyMsg,
            registry::LoadStatus,
        },
        lazy::create_lazy,
        test_helpers::{descriptor, fragment, RecordingHost, TestContainer},
    };

    type TestRuntime = Runtime<String, TestContainer, RecordingHost<String>>;

    fn create_test_runtime(modules: ModuleTable<String>) -> TestRuntime {
        let (loader, lazy) = create_lazy(RecordingHost::new(), TestContainer::root())
            .configure(modules, |fetching| format!("loading:{fetching}"));
        Runtime::new(
            loader,
            lazy,
            fragment(json!({ "route": "home" })),
            ActionTree::new().with("count", Action::counter("count")),
            |state: &AppState<String>| {
                let key = state
                    .get("route")
                    .and_then(Value::as_str)
                    .unwrap_or("home")
                    .to_string();
                Lazy::new(key, json!({ "p": 1 }))
            },
        )
    }

    #[test]
    fn test_runtime_creation() {
        let runtime = create_test_runtime(ModuleTable::new());
        let stats = runtime.get_stats();

        assert_eq!(stats, RuntimeStats::default());
        assert!(!runtime.state().fetching);
        assert!(!runtime.render_requested());
        assert_eq!(runtime.last_route(), None);
    }

    #[test]
    fn test_process_message() {
        let mut runtime = create_test_runtime(ModuleTable::new());

        let commands = runtime.process_message(LazyMsg::SetFetching(true).into());

        assert_eq!(commands, vec![Cmd::RequestRender]);
        assert!(runtime.state().fetching);
        assert!(runtime.render_requested());
        assert_eq!(runtime.get_stats().messages_processed, 1);
    }

    #[test]
    fn test_bound_host_action_roundtrip() {
        let mut runtime = create_test_runtime(ModuleTable::new());

        assert!(runtime.bound_actions().call("count", json!(2)));
        assert_eq!(runtime.process_pending(), 1);
        assert_eq!(runtime.state().get("count"), Some(&json!(2)));
    }

    #[tokio::test]
    async fn test_run_until_settled_loads_and_renders() {
        let modules = ModuleTable::new().with(
            "home",
            descriptor("V", ActionTree::new(), json!({ "default": { "s": 1 } })),
        );
        let mut runtime = create_test_runtime(modules);

        let route = runtime.run_until_settled().await;

        assert_eq!(route, Route::Rendered);
        assert!(!runtime.state().fetching);
        assert_eq!(runtime.loader().registry().status("home"), LoadStatus::Loaded);
        let last = runtime.loader().host().last().cloned().unwrap();
        assert_eq!(last.view, "V");
        assert_eq!(last.state.get("s"), Some(&json!(1)));
        assert_eq!(last.state.lazy.props, json!({ "p": 1 }));

        let stats = runtime.get_stats();
        assert_eq!(stats.loads_in_flight, 0);
        assert_eq!(stats.cached_modules, 1);
    }
}
