use crate::core::{
    cmd::Cmd,
    msg::{LazyMsg, Msg},
    registry::Registry,
    state::AppState,
};

/// Everything `update` may touch besides the host state
pub struct UpdateContext<'a, V> {
    pub registry: &'a mut Registry<V>,
}

/// Elm-like update function
/// Returns new state and list of commands from current state and message
pub fn update<V: Clone>(
    msg: Msg<V>,
    mut state: AppState<V>,
    ctx: &mut UpdateContext<'_, V>,
) -> (AppState<V>, Vec<Cmd>) {
    match msg {
        Msg::Lazy(lazy_msg) => {
            let commands = update_lazy(lazy_msg, &mut state, ctx);
            (state, commands)
        }

        Msg::Action {
            name,
            action,
            payload,
        } => {
            let patch = action.apply(&payload, &state.fragment);
            log::debug!("update: action '{name}' patched {:?}", patch.keys());
            state.apply_patch(patch);
            (state, vec![Cmd::RequestRender])
        }
    }
}

fn update_lazy<V: Clone>(
    msg: LazyMsg<V>,
    state: &mut AppState<V>,
    ctx: &mut UpdateContext<'_, V>,
) -> Vec<Cmd> {
    match msg {
        LazyMsg::SetFetching(fetching) => {
            if state.fetching == fetching {
                return vec![];
            }
            state.fetching = fetching;
            vec![Cmd::RequestRender]
        }

        LazyMsg::Fetching { key } => {
            log::debug!("update: '{key}' fetching");
            state.lazy.fetching = true;
            state.lazy.props = serde_json::Value::Null;
            vec![Cmd::RequestRender]
        }

        LazyMsg::Loaded { key, bundle } => {
            state.lazy.view = Some(bundle.view.clone());
            state.lazy.fetching = false;
            state.lazy.props = serde_json::Value::Null;
            state.lazy.error = None;
            ctx.registry.insert_loaded(key.clone(), bundle);
            vec![
                Cmd::LogInfo {
                    message: format!("module '{key}' loaded"),
                },
                Cmd::RequestRender,
            ]
        }

        LazyMsg::Failed { key, error } => {
            let message = error.to_string();
            state.lazy.error = Some(error.clone());
            state.lazy.fetching = false;
            state.fetching = false;
            ctx.registry.insert_failed(key, error);
            vec![Cmd::LogError { message }, Cmd::RequestRender]
        }

        LazyMsg::Retry { key } => {
            if ctx.registry.clear_failed(&key) {
                state.lazy.error = None;
                vec![Cmd::RequestRender]
            } else {
                log::debug!("update: retry ignored, '{key}' has not failed");
                vec![]
            }
        }
    }
}
