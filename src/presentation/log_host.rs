use crate::{
    core::{dispatch::BoundActions, state::AppState},
    host::Host,
    presentation::view::{display_value, Region, TextView},
};

/// Headless host: every mount becomes one line of text
#[derive(Debug, Default)]
pub struct LogHost {
    lines: Vec<String>,
}

impl LogHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl Host<TextView, Region> for LogHost {
    fn mount(
        &mut self,
        state: &AppState<TextView>,
        _actions: &BoundActions<TextView>,
        view: &TextView,
        container: &Region,
    ) {
        let body = view.render_body(&state.fragment);
        let mut line = format!("[{container:?}] {}: {body}", view.title);
        if !state.lazy.props.is_null() {
            line.push_str(&format!(" (props: {})", display_value(&state.lazy.props)));
        }
        log::info!("LogHost: {line}");
        self.lines.push(line);
    }
}
