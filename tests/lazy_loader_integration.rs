//! End-to-end behaviour of the lazy loader: cache population, cache hits,
//! the default-export convention, fetching transitions and merge precedence

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};

use lazyview::{
    core::{
        action::{Action, ActionTree},
        bundle::{ModuleDescriptor, ModuleTable, Provider, Resolved},
        dispatch::{BoundActions, Dispatch},
        msg::{LazyMsg, Msg},
        registry::LoadStatus,
        state::AppState,
        update::{update, UpdateContext},
    },
    integration::runtime::Runtime,
    lazy::{create_lazy, Lazy, LazyLoader, Route},
    test_helpers::{counting_descriptor, descriptor, fragment, RecordingHost, TestContainer},
};

type TestLoader = LazyLoader<String, TestContainer, RecordingHost<String>>;

fn loader(modules: ModuleTable<String>) -> (TestLoader, AppState<String>) {
    let (loader, lazy) = create_lazy(RecordingHost::new(), TestContainer::root())
        .configure(modules, |fetching| format!("loading:{fetching}"));
    (loader, lazy.into_app_state(fragment(json!({ "user": "guest" }))))
}

/// Home module: view `{default: V}`, actions `{a}`, state `{default: {s: 1}}`
fn home() -> ModuleDescriptor<String> {
    descriptor(
        "V",
        ActionTree::new().with("a", Action::setter("a")),
        json!({ "default": { "s": 1 } }),
    )
}

#[tokio::test]
async fn test_cache_population() {
    let modules = ModuleTable::new().with("home", home());
    let (mut loader, state) = loader(modules);
    let (dispatch, mut rx) = Dispatch::channel();
    let actions = BoundActions::new(ActionTree::new(), dispatch);

    assert_eq!(loader.lazy(&Lazy::new("home", json!(null)), &state, &actions), Route::Loading);

    let mut state = state;
    while loader.registry().status("home") != LoadStatus::Loaded {
        let Some(msg) = rx.recv().await else {
            panic!("queue closed before the module loaded");
        };
        let mut ctx = UpdateContext {
            registry: loader.registry_mut(),
        };
        state = update(msg, state, &mut ctx).0;
    }

    assert_eq!(loader.registry().len(), 1);
    assert_eq!(loader.registry().loaded_keys(), vec!["home"]);
    let bundle = loader.registry().bundle("home").unwrap();
    assert_eq!(bundle.view, "V");
    assert_eq!(Value::Object(bundle.state.clone()), json!({ "s": 1 }));
    assert_eq!(bundle.actions.names(), vec!["a"]);
}

#[tokio::test]
async fn test_idempotent_cache_hit() {
    let calls = Arc::new(AtomicUsize::new(0));
    let modules = ModuleTable::new().with("home", counting_descriptor("V", Arc::clone(&calls)));
    let (loader, lazy) = create_lazy(RecordingHost::new(), TestContainer::root())
        .configure(modules, |fetching| format!("loading:{fetching}"));
    let mut runtime = Runtime::new(
        loader,
        lazy,
        fragment(json!({})),
        ActionTree::new(),
        |_: &AppState<String>| Lazy::new("home", json!({ "p": 1 })),
    );
    runtime.run_until_settled().await;
    runtime.loader_mut().host_mut().clear();

    let first = runtime.render();
    let second = runtime.render();

    assert_eq!((first, second), (Route::Rendered, Route::Rendered));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let mounts = runtime.loader().host().mounts();
    assert_eq!(mounts.len(), 2);
    assert_eq!(mounts[0].state, mounts[1].state);
    assert_eq!(mounts[0].actions.names(), mounts[1].actions.names());
    assert_eq!(mounts[0].container, TestContainer::root());
}

#[rstest]
#[case::wrapped(Resolved::Wrapped("X".to_string()))]
#[case::raw(Resolved::Raw("X".to_string()))]
#[tokio::test]
async fn test_unwrap_convention(#[case] view: Resolved<String>) {
    let descriptor = ModuleDescriptor::new(
        Provider::ready(view),
        Provider::ready(Resolved::Raw(ActionTree::new())),
        Provider::json_state(json!({ "default": { "k": "v" } })),
    );

    let bundle = descriptor.fetch("m").await.unwrap();

    assert_eq!(bundle.view, "X");
    assert_eq!(bundle.state.get("k"), Some(&json!("v")));
}

#[tokio::test]
async fn test_fetching_flag_transition() {
    let modules = ModuleTable::new().with("home", home());
    let (mut loader, mut state) = loader(modules);
    let (dispatch, mut rx) = Dispatch::channel();
    let actions = BoundActions::new(ActionTree::new(), dispatch);
    assert!(!state.fetching);

    loader.lazy(&Lazy::new("home", json!(null)), &state, &actions);

    // Synchronous phase: the only queued message raises the global flag
    let msg = rx.try_recv().unwrap();
    assert!(matches!(msg, Msg::Lazy(LazyMsg::SetFetching(true))));
    let mut ctx = UpdateContext {
        registry: loader.registry_mut(),
    };
    state = update(msg, state, &mut ctx).0;
    assert!(state.fetching);
    assert!(state.lazy.view.is_none());

    // Asynchronous phase: the load resolves into a Loaded message
    let msg = rx.recv().await.unwrap();
    assert!(matches!(&msg, Msg::Lazy(LazyMsg::Loaded { key, .. }) if key == "home"));
    let mut ctx = UpdateContext {
        registry: loader.registry_mut(),
    };
    state = update(msg, state, &mut ctx).0;
    assert!(!state.lazy.fetching);
    assert_eq!(state.lazy.view.as_deref(), Some("V"));
}

#[test]
fn test_bundle_actions_take_precedence() {
    let host_action = Action::setter("host");
    let module_action = Action::setter("module");
    let modules = ModuleTable::new();
    let (mut loader, state) = loader(modules);
    loader.registry_mut().insert_loaded(
        "home",
        Arc::new(lazyview::CachedBundle {
            view: "V".to_string(),
            state: fragment(json!({ "user": "module" })),
            actions: ActionTree::new().with("x", module_action.clone()),
        }),
    );
    let (dispatch, _rx) = Dispatch::channel();
    let actions = BoundActions::new(
        ActionTree::new()
            .with("x", host_action.clone())
            .with("y", Action::setter("y")),
        dispatch,
    );

    loader.lazy(&Lazy::new("home", json!(null)), &state, &actions);

    let mounted = loader.host().last().cloned().unwrap();
    assert!(mounted.actions["x"].same_as(&module_action));
    assert!(!mounted.actions["x"].same_as(&host_action));
    assert_eq!(mounted.actions.names(), vec!["x", "y"]);
    // Bundle state wins at the top level as well
    assert_eq!(mounted.state.get("user"), Some(&json!("module")));
}

#[tokio::test]
async fn test_end_to_end_home_scenario() {
    let modules = ModuleTable::new().with("home", home());
    let (loader, lazy) = create_lazy(RecordingHost::new(), TestContainer::root())
        .configure(modules, |fetching| format!("loading:{fetching}"));
    let mut runtime = Runtime::new(
        loader,
        lazy,
        fragment(json!({})),
        ActionTree::new(),
        |_: &AppState<String>| Lazy::new("home", json!({ "p": 1 })),
    );

    assert_eq!(runtime.render(), Route::Loading);
    runtime.process_pending();
    assert!(runtime.state().fetching);
    assert_eq!(runtime.render(), Route::Loading);
    {
        let loading = runtime.loader().host().last().cloned().unwrap();
        assert_eq!(loading.view, "loading:true");
        assert_eq!(loading.container, TestContainer::leaf("root/0"));
    }

    assert_eq!(runtime.run_until_settled().await, Route::Rendered);

    let registry = runtime.loader().registry();
    assert_eq!(registry.loaded_keys(), vec!["home"]);
    let bundle = registry.bundle("home").unwrap();
    assert_eq!(bundle.view, "V");
    assert_eq!(bundle.actions.names(), vec!["a"]);
    assert_eq!(Value::Object(bundle.state.clone()), json!({ "s": 1 }));

    let mounted = runtime
        .loader()
        .host()
        .mounts()
        .iter()
        .find(|m| m.view == "V")
        .cloned()
        .unwrap();
    assert_eq!(mounted.state.get("s"), Some(&json!(1)));
    assert_eq!(mounted.state.lazy.props, json!({ "p": 1 }));
    assert!(!mounted.state.lazy.fetching);
    assert_eq!(mounted.container, TestContainer::root());
    assert!(!runtime.state().fetching);
}
