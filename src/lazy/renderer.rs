use serde_json::Value;

use crate::{
    core::{bundle::CachedBundle, dispatch::BoundActions, state::AppState},
    host::{Container, Host, View},
    lazy::{LazyLoader, Route},
};

impl<V, C, H> LazyLoader<V, C, H>
where
    V: View,
    C: Container,
    H: Host<V, C>,
{
    /// Mount a cached bundle.
    ///
    /// The bundle's state is merged into the top level of the host state and
    /// its actions over the host actions (bundle wins on both). `lazy.props`
    /// and `lazy.fetching` are overwritten, `lazy.error` is cleared and
    /// `lazy.view` is kept. A raised global fetching flag is lowered after
    /// mounting.
    pub fn render(
        &mut self,
        bundle: &CachedBundle<V>,
        state: &AppState<V>,
        actions: &BoundActions<V>,
        props: &Value,
    ) -> Route {
        let mut merged_state = state.merged(&bundle.state);
        merged_state.lazy.props = props.clone();
        merged_state.lazy.fetching = false;
        merged_state.lazy.error = None;
        let merged_actions = actions.merged(&bundle.actions);

        self.host.mount(
            &merged_state,
            &merged_actions,
            &bundle.view,
            &self.config.container,
        );

        if merged_state.fetching {
            actions.fetching(false);
        }
        Route::Rendered
    }

    /// Render the cached bundle for `key`; `None` when it is not loaded
    pub fn render_component(
        &mut self,
        key: &str,
        state: &AppState<V>,
        actions: &BoundActions<V>,
        props: &Value,
    ) -> Option<Route> {
        let bundle = self.registry.bundle(key)?;
        Some(self.render(&bundle, state, actions, props))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::{
        core::{
            action::{Action, ActionTree},
            bundle::ModuleTable,
            dispatch::Dispatch,
            error::LoadError,
            msg::{LazyMsg, Msg},
        },
        lazy::create_lazy,
        test_helpers::{fragment, RecordingHost, TestContainer},
    };

    fn cached(view: &str, state: Value, actions: ActionTree) -> Arc<CachedBundle<String>> {
        Arc::new(CachedBundle {
            view: view.to_string(),
            state: fragment(state),
            actions,
        })
    }

    #[test]
    fn test_render_merges_state_and_actions() {
        let (mut loader, _) = create_lazy(RecordingHost::new(), TestContainer::root())
            .configure(ModuleTable::<String>::new(), |_| "loading".to_string());
        let host_x = Action::setter("x");
        let bundle_x = Action::counter("x");
        let host_y = Action::setter("y");
        let bundle = cached(
            "V",
            json!({ "s": 1, "shared": "bundle" }),
            ActionTree::new().with("x", bundle_x.clone()),
        );
        let mut state = AppState::new(fragment(json!({ "h": 1, "shared": "host" })));
        state.lazy.view = Some("previous".to_string());
        let (dispatch, mut rx) = Dispatch::channel();
        let actions = BoundActions::new(
            ActionTree::new().with("x", host_x).with("y", host_y.clone()),
            dispatch,
        );

        let route = loader.render(&bundle, &state, &actions, &json!({ "p": 1 }));

        assert_eq!(route, Route::Rendered);
        let mounts = loader.host().mounts();
        assert_eq!(mounts.len(), 1);
        let mounted = &mounts[0];
        assert_eq!(mounted.view, "V");
        assert_eq!(mounted.container, TestContainer::root());
        assert_eq!(
            Value::Object(mounted.state.fragment.clone()),
            json!({ "h": 1, "s": 1, "shared": "bundle" })
        );
        assert_eq!(mounted.state.lazy.props, json!({ "p": 1 }));
        assert!(!mounted.state.lazy.fetching);
        assert_eq!(mounted.state.lazy.view.as_deref(), Some("previous"));
        assert!(mounted.actions["x"].same_as(&bundle_x));
        assert!(mounted.actions["y"].same_as(&host_y));
        // Flag was down, nothing dispatched
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_render_lowers_fetching_flag() {
        let (mut loader, _) = create_lazy(RecordingHost::new(), TestContainer::root())
            .configure(ModuleTable::<String>::new(), |_| "loading".to_string());
        let bundle = cached("V", json!({}), ActionTree::new());
        let mut state = AppState::default();
        state.fetching = true;
        let (dispatch, mut rx) = Dispatch::channel();
        let actions = BoundActions::new(ActionTree::new(), dispatch);

        loader.render(&bundle, &state, &actions, &Value::Null);

        // Mounted with the flag still up, then lowered
        assert!(loader.host().mounts()[0].state.fetching);
        assert!(matches!(
            rx.try_recv(),
            Ok(Msg::Lazy(LazyMsg::SetFetching(false)))
        ));
    }

    #[test]
    fn test_render_clears_stale_error() {
        let (mut loader, _) = create_lazy(RecordingHost::new(), TestContainer::root())
            .configure(ModuleTable::<String>::new(), |_| "loading".to_string());
        let bundle = cached("V", json!({}), ActionTree::new());
        let mut state = AppState::default();
        state.lazy.error = Some(LoadError::unknown("broken"));
        let (dispatch, _rx) = Dispatch::channel();
        let actions = BoundActions::new(ActionTree::new(), dispatch);

        loader.render(&bundle, &state, &actions, &Value::Null);

        assert!(loader.host().mounts()[0].state.lazy.error.is_none());
    }

    #[test]
    fn test_render_component_requires_cached_bundle() {
        let (mut loader, _) = create_lazy(RecordingHost::new(), TestContainer::root())
            .configure(ModuleTable::<String>::new(), |_| "loading".to_string());
        let state = AppState::default();
        let (dispatch, _rx) = Dispatch::channel();
        let actions = BoundActions::new(ActionTree::new(), dispatch);

        assert_eq!(
            loader.render_component("home", &state, &actions, &Value::Null),
            None
        );

        loader
            .registry_mut()
            .insert_loaded("home", cached("V", json!({}), ActionTree::new()));
        assert_eq!(
            loader.render_component("home", &state, &actions, &Value::Null),
            Some(Route::Rendered)
        );
        assert_eq!(loader.host().mounts().len(), 1);
    }
}
