use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{core::state::StateFragment, host::Container};

/// View definition of the demo modules: a title and a body template.
///
/// `{name}` placeholders in the body are filled from the top-level state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextView {
    pub title: String,
    pub body: String,
}

impl TextView {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Loading view factory
    pub fn loading(fetching: bool) -> Self {
        if fetching {
            Self::new("Loading", "Fetching module...")
        } else {
            Self::new("Unavailable", "Module failed to load. Press r to retry.")
        }
    }

    /// Body with placeholders substituted
    pub fn render_body(&self, state: &StateFragment) -> String {
        state.iter().fold(self.body.clone(), |body, (key, value)| {
            let placeholder = format!("{{{key}}}");
            if body.contains(&placeholder) {
                body.replace(&placeholder, &display_value(value))
            } else {
                body
            }
        })
    }
}

/// Strings without quotes, everything else as JSON
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Screen regions. The root fills the screen; its first child is the body
/// overlay the loading view is drawn into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    Root,
    Body,
}

impl Container for Region {
    fn first_child(&self) -> Option<Self> {
        match self {
            Region::Root => Some(Region::Body),
            Region::Body => None,
        }
    }
}
