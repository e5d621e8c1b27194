//! Contracts with the host application
//!
//! The loader never renders anything itself. It hands a view, a state
//! snapshot and bound actions to the host's mount function, and it only
//! knows two things about the mount point: how to pass it along and how to
//! reach its first child.

use crate::core::{dispatch::BoundActions, state::AppState};

/// Anything that can serve as a view definition
pub trait View: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> View for T {}

/// Opaque mount point supplied once at configuration time
pub trait Container: Clone {
    /// Child the transient loading view is mounted into
    fn first_child(&self) -> Option<Self>;
}

/// Host application mount function
pub trait Host<V, C> {
    fn mount(&mut self, state: &AppState<V>, actions: &BoundActions<V>, view: &V, container: &C);
}

impl<V, C, F> Host<V, C> for F
where
    F: FnMut(&AppState<V>, &BoundActions<V>, &V, &C),
{
    fn mount(&mut self, state: &AppState<V>, actions: &BoundActions<V>, view: &V, container: &C) {
        self(state, actions, view, container)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{action::ActionTree, dispatch::Dispatch};

    #[derive(Clone, Debug, PartialEq)]
    struct Slot(u8);

    impl Container for Slot {
        fn first_child(&self) -> Option<Self> {
            Some(Slot(self.0 + 1))
        }
    }

    #[test]
    fn test_closure_host() {
        let mut mounted = Vec::new();
        {
            let mut host = |_: &AppState<&str>, _: &BoundActions<&str>, view: &&str, slot: &Slot| {
                mounted.push((view.to_string(), slot.clone()));
            };
            let (dispatch, _rx) = Dispatch::channel();
            let actions = BoundActions::new(ActionTree::new(), dispatch);
            let slot = Slot(0);
            host.mount(&AppState::default(), &actions, &"V", &slot);
            if let Some(child) = slot.first_child() {
                host.mount(&AppState::default(), &actions, &"L", &child);
            }
        }
        assert_eq!(
            mounted,
            vec![("V".to_string(), Slot(0)), ("L".to_string(), Slot(1))]
        );
    }
}
