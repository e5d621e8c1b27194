//! Terminal host
//!
//! Mount calls only record what should be on screen; drawing happens later
//! in [`TuiHost::draw`] when the runner gets a render event.

use ratatui::{prelude::*, widgets::Clear};
use serde_json::Value;

use crate::{
    core::{dispatch::BoundActions, state::AppState},
    host::Host,
    presentation::{
        view::{Region, TextView},
        widgets::{ModuleViewWidget, StatusBarWidget},
    },
};

/// A view as it was mounted: the definition plus what it was rendered with
#[derive(Debug, Clone, PartialEq)]
pub struct MountedView {
    pub view: TextView,
    pub body: String,
    pub props: Value,
    pub fetching: bool,
    pub error: Option<String>,
}

impl MountedView {
    fn new(state: &AppState<TextView>, view: &TextView) -> Self {
        Self {
            view: view.clone(),
            body: view.render_body(&state.fragment),
            props: state.lazy.props.clone(),
            fetching: state.fetching,
            error: state.lazy.error.as_ref().map(ToString::to_string),
        }
    }
}

#[derive(Debug, Default)]
pub struct TuiHost {
    root: Option<MountedView>,
    overlay: Option<MountedView>,
    actions: Option<BoundActions<TextView>>,
    mounts: usize,
}

impl TuiHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<&MountedView> {
        self.root.as_ref()
    }

    /// Loading view currently shown over the body
    pub fn overlay(&self) -> Option<&MountedView> {
        self.overlay.as_ref()
    }

    /// Actions bound by the latest mount
    pub fn bound_actions(&self) -> Option<&BoundActions<TextView>> {
        self.actions.as_ref()
    }

    pub fn mount_count(&self) -> usize {
        self.mounts
    }

    pub fn draw(&self, frame: &mut Frame<'_>, status: StatusBarWidget<'_>) {
        let layout = Layout::new(
            Direction::Vertical,
            [Constraint::Min(0), Constraint::Length(1)],
        )
        .split(frame.area());

        match &self.root {
            Some(root) => frame.render_widget(ModuleViewWidget::new(root), layout[0]),
            None => frame.render_widget(Clear, layout[0]),
        }

        if let Some(overlay) = &self.overlay {
            let area = centered(layout[0], 60, 40);
            frame.render_widget(Clear, area);
            frame.render_widget(ModuleViewWidget::new(overlay).highlight(true), area);
        }

        frame.render_widget(Clear, layout[1]);
        frame.render_widget(status, layout[1]);
    }
}

impl Host<TextView, Region> for TuiHost {
    fn mount(
        &mut self,
        state: &AppState<TextView>,
        actions: &BoundActions<TextView>,
        view: &TextView,
        container: &Region,
    ) {
        let mounted = MountedView::new(state, view);
        log::debug!("TuiHost: mount '{}' into {container:?}", mounted.view.title);
        match container {
            Region::Root => {
                self.root = Some(mounted);
                self.overlay = None;
            }
            Region::Body => self.overlay = Some(mounted),
        }
        self.actions = Some(actions.clone());
        self.mounts += 1;
    }
}

/// Rect of `percent_x` by `percent_y` percent centered in `area`
fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::new(
        Direction::Vertical,
        [
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ],
    )
    .split(area);
    Layout::new(
        Direction::Horizontal,
        [
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ],
    )
    .split(vertical[1])[1]
}
