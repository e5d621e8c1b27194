//! Test doubles and fixtures shared by unit and integration tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::{
    core::{
        action::ActionTree,
        bundle::{ModuleDescriptor, Provider, Resolved},
        dispatch::BoundActions,
        state::{AppState, StateFragment},
    },
    host::{Container, Host},
};

/// One recorded call of the host mount function
#[derive(Debug, Clone)]
pub struct Mounted<V> {
    pub state: AppState<V>,
    pub actions: ActionTree,
    pub view: V,
    pub container: TestContainer,
}

/// Host that remembers every mount instead of drawing
#[derive(Debug, Clone)]
pub struct RecordingHost<V> {
    mounts: Vec<Mounted<V>>,
    bound: Option<BoundActions<V>>,
}

impl<V> Default for RecordingHost<V> {
    fn default() -> Self {
        Self {
            mounts: Vec::new(),
            bound: None,
        }
    }
}

impl<V> RecordingHost<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mounts(&self) -> &[Mounted<V>] {
        &self.mounts
    }

    pub fn last(&self) -> Option<&Mounted<V>> {
        self.mounts.last()
    }

    /// Actions handed to the most recent mount, for driving event handlers
    pub fn bound_actions(&self) -> Option<&BoundActions<V>> {
        self.bound.as_ref()
    }

    pub fn clear(&mut self) {
        self.mounts.clear();
    }
}

impl<V: Clone> Host<V, TestContainer> for RecordingHost<V> {
    fn mount(
        &mut self,
        state: &AppState<V>,
        actions: &BoundActions<V>,
        view: &V,
        container: &TestContainer,
    ) {
        self.mounts.push(Mounted {
            state: state.clone(),
            actions: actions.tree().clone(),
            view: view.clone(),
            container: container.clone(),
        });
        self.bound = Some(actions.clone());
    }
}

/// Named mount point with child mount points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestContainer {
    pub name: String,
    pub children: Vec<TestContainer>,
}

impl TestContainer {
    /// Container named `root` with a single child `root/0`
    pub fn root() -> Self {
        Self {
            name: "root".to_string(),
            children: vec![Self::leaf("root/0")],
        }
    }

    pub fn leaf(name: &str) -> Self {
        Self {
            name: name.to_string(),
            children: Vec::new(),
        }
    }
}

impl Container for TestContainer {
    fn first_child(&self) -> Option<Self> {
        self.children.first().cloned()
    }
}

/// Object value as a state fragment; anything else is empty
pub fn fragment(value: Value) -> StateFragment {
    match value {
        Value::Object(map) => map,
        _ => StateFragment::new(),
    }
}

/// Descriptor whose view is wrapped in a default-export envelope, whose
/// actions are bare and whose state is classified from `state`
pub fn descriptor(view: &str, actions: ActionTree, state: Value) -> ModuleDescriptor<String> {
    ModuleDescriptor::new(
        Provider::ready(Resolved::Wrapped(view.to_string())),
        Provider::ready(Resolved::Raw(actions)),
        Provider::json_state(state),
    )
}

/// Descriptor that counts view fetches and resolves after a short yield
pub fn counting_descriptor(view: &str, calls: Arc<AtomicUsize>) -> ModuleDescriptor<String> {
    let view = view.to_string();
    ModuleDescriptor::new(
        Provider::new(move || {
            calls.fetch_add(1, Ordering::SeqCst);
            let view = view.clone();
            async move {
                tokio::task::yield_now().await;
                Ok(Resolved::Raw(view))
            }
        }),
        Provider::ready(Resolved::Raw(ActionTree::new())),
        Provider::json_state(Value::Null),
    )
}

/// Descriptor whose view resolves after `delay`
pub fn delayed_descriptor(view: &str, delay: Duration) -> ModuleDescriptor<String> {
    let view = view.to_string();
    ModuleDescriptor::new(
        Provider::new(move || {
            let view = view.clone();
            async move {
                tokio::time::sleep(delay).await;
                Ok(Resolved::Raw(view))
            }
        }),
        Provider::ready(Resolved::Raw(ActionTree::new())),
        Provider::json_state(Value::Null),
    )
}

/// Descriptor whose state provider always fails with `message`
pub fn failing_descriptor(view: &str, message: &str) -> ModuleDescriptor<String> {
    ModuleDescriptor::new(
        Provider::ready(Resolved::Raw(view.to_string())),
        Provider::ready(Resolved::Raw(ActionTree::new())),
        Provider::failing(message),
    )
}
