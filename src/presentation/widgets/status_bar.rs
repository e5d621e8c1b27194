use ratatui::{prelude::*, widgets::Paragraph};

/// One-line footer: module list with the active one highlighted, then a
/// status message.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusBarWidget<'a> {
    modules: &'a [String],
    active: Option<&'a str>,
    message: Option<&'a str>,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(modules: &'a [String], active: Option<&'a str>) -> Self {
        Self {
            modules,
            active,
            message: None,
        }
    }

    pub fn message(mut self, message: Option<&'a str>) -> Self {
        self.message = message;
        self
    }

    fn module_spans(&self) -> Vec<Span<'a>> {
        self.modules
            .iter()
            .enumerate()
            .map(|(i, key)| {
                let label = format!(" {}:{key} ", i + 1);
                if Some(key.as_str()) == self.active {
                    Span::styled(label, Style::default().fg(Color::Black).bg(Color::Cyan))
                } else {
                    Span::styled(label, Style::default().fg(Color::Gray))
                }
            })
            .collect()
    }
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let mut spans = self.module_spans();
        spans.push(Span::raw(" "));
        let hint = self.message.unwrap_or("+ count  r retry  q quit");
        spans.push(Span::styled(hint.to_string(), Style::default().italic().dim()));

        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(Color::Black))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_to_string(widget: StatusBarWidget<'_>) -> String {
        let area = Rect::new(0, 0, 60, 1);
        let mut buffer = Buffer::empty(area);
        widget.render(area, &mut buffer);
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_render_modules_and_hint() {
        let modules = vec!["feed".to_string(), "home".to_string()];
        let content = render_to_string(StatusBarWidget::new(&modules, Some("home")));
        assert!(content.contains("1:feed"));
        assert!(content.contains("2:home"));
        assert!(content.contains("q quit"));
    }

    #[test]
    fn test_render_message_replaces_hint() {
        let modules = vec!["home".to_string()];
        let content = render_to_string(
            StatusBarWidget::new(&modules, None).message(Some("module 'home' loaded")),
        );
        assert!(content.contains("module 'home' loaded"));
        assert!(!content.contains("q quit"));
    }

    #[test]
    fn test_active_module_is_highlighted() {
        let modules = vec!["feed".to_string(), "home".to_string()];
        let widget = StatusBarWidget::new(&modules, Some("home"));
        let spans = widget.module_spans();
        assert_eq!(spans[1].style.bg, Some(Color::Cyan));
        assert_eq!(spans[0].style.bg, None);
    }
}
