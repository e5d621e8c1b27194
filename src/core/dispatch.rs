use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;

use crate::core::{
    action::ActionTree,
    bundle::CachedBundle,
    error::LoadError,
    msg::{LazyMsg, Msg},
};

/// Handle for queueing messages into the host update loop
#[derive(Debug)]
pub struct Dispatch<V> {
    sender: mpsc::UnboundedSender<Msg<V>>,
}

impl<V> Clone for Dispatch<V> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<V> Dispatch<V> {
    pub fn new(sender: mpsc::UnboundedSender<Msg<V>>) -> Self {
        Self { sender }
    }

    /// Create a handle together with the receiving end of its queue
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Msg<V>>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }

    /// Queue a message. Returns false once the update loop is gone.
    pub fn send(&self, msg: impl Into<Msg<V>>) -> bool {
        let msg = msg.into();
        match self.sender.send(msg) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("Dispatch: update loop closed, dropping {}", err.0.label());
                false
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Action tree bound to a dispatch handle, as seen by views.
///
/// Calling an action does not run its reducer; it queues the reducer so the
/// update loop applies it in order with every other message.
#[derive(Debug)]
pub struct BoundActions<V> {
    tree: ActionTree,
    dispatch: Dispatch<V>,
}

impl<V> Clone for BoundActions<V> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
            dispatch: self.dispatch.clone(),
        }
    }
}

impl<V> BoundActions<V> {
    pub fn new(tree: ActionTree, dispatch: Dispatch<V>) -> Self {
        Self { tree, dispatch }
    }

    pub fn tree(&self) -> &ActionTree {
        &self.tree
    }

    pub fn dispatch(&self) -> &Dispatch<V> {
        &self.dispatch
    }

    /// Same dispatch handle with `overlay` merged over the tree
    pub fn merged(&self, overlay: &ActionTree) -> Self {
        Self {
            tree: self.tree.merged(overlay),
            dispatch: self.dispatch.clone(),
        }
    }

    /// Same dispatch handle without any host or module actions
    pub fn detached(&self) -> Self {
        Self {
            tree: ActionTree::new(),
            dispatch: self.dispatch.clone(),
        }
    }

    /// Invoke the action called `name`. Returns false when there is none.
    pub fn call(&self, name: &str, payload: Value) -> bool {
        let Some(action) = self.tree.get(name) else {
            log::warn!("BoundActions: no action named '{name}'");
            return false;
        };
        self.dispatch.send(Msg::Action {
            name: name.to_string(),
            action: action.clone(),
            payload,
        })
    }

    pub fn fetching(&self, fetching: bool) -> bool {
        self.dispatch.send(LazyMsg::SetFetching(fetching))
    }

    pub fn lazy_fetching(&self, key: impl Into<String>) -> bool {
        self.dispatch.send(LazyMsg::Fetching { key: key.into() })
    }

    pub fn loaded(&self, key: impl Into<String>, bundle: Arc<CachedBundle<V>>) -> bool {
        self.dispatch.send(LazyMsg::Loaded {
            key: key.into(),
            bundle,
        })
    }

    pub fn failed(&self, key: impl Into<String>, error: LoadError) -> bool {
        self.dispatch.send(LazyMsg::Failed {
            key: key.into(),
            error,
        })
    }

    pub fn retry(&self, key: impl Into<String>) -> bool {
        self.dispatch.send(LazyMsg::Retry { key: key.into() })
    }
}
