use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::presentation::{tui_host::MountedView, view::display_value};

/// Draws one mounted view: bordered block titled with the view title,
/// the rendered body, and the props it was mounted with.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleViewWidget<'a> {
    mounted: &'a MountedView,
    highlight: bool,
}

impl<'a> ModuleViewWidget<'a> {
    pub fn new(mounted: &'a MountedView) -> Self {
        Self {
            mounted,
            highlight: false,
        }
    }

    /// Draw the border in the accent color
    pub fn highlight(mut self, highlight: bool) -> Self {
        self.highlight = highlight;
        self
    }
}

impl<'a> Widget for ModuleViewWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let border_style = if self.highlight {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(Span::styled(
                self.mounted.view.title.clone(),
                Style::default().bold(),
            ));

        let mut lines = vec![Line::from(self.mounted.body.clone())];
        if !self.mounted.props.is_null() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("props: {}", display_value(&self.mounted.props)),
                Style::default().dim(),
            )));
        }
        if let Some(error) = &self.mounted.error {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        }

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
