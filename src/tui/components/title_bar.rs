//! # TitleBar Component
//!
//! One-line status bar: app name, model, transient status and a "↓ New"
//! marker when the user has scrolled away from fresh content.
//!
//! Purely presentational. All fields are props.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::component::Component;

pub struct TitleBar<'a> {
    pub model_name: &'a str,
    pub status_message: &'a str,
    pub has_unseen_content: bool,
}

impl<'a> TitleBar<'a> {
    pub fn new(model_name: &'a str, status_message: &'a str, has_unseen_content: bool) -> Self {
        Self {
            model_name,
            status_message,
            has_unseen_content,
        }
    }

    fn line(&self) -> Line<'static> {
        let mut spans = vec![
            Span::styled(
                " PhyQuest ",
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::LightBlue)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" model: {}", self.model_name),
                Style::default().fg(Color::DarkGray),
            ),
        ];
        if !self.status_message.is_empty() {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(
                self.status_message.to_string(),
                Style::default().fg(Color::Yellow),
            ));
        }
        if self.has_unseen_content {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled("↓ New", Style::default().fg(Color::Cyan)));
        }
        Line::from(spans)
    }
}

impl Component for TitleBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(self.line(), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered(title_bar: &mut TitleBar) -> String {
        let backend = TestBackend::new(80, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| title_bar.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_title_bar_with_status_message() {
        let text = rendered(&mut TitleBar::new("gemini-2.5-flash", "Thinking...", false));
        assert!(text.contains("PhyQuest"));
        assert!(text.contains("gemini-2.5-flash"));
        assert!(text.contains("Thinking..."));
        assert!(!text.contains("↓ New"));
    }

    #[test]
    fn test_title_bar_with_unseen_content() {
        let text = rendered(&mut TitleBar::new("gemini-2.5-flash", "", true));
        assert!(text.contains("↓ New"));
    }

    #[test]
    fn test_title_bar_default_no_status() {
        let text = rendered(&mut TitleBar::new("gemini-2.5-flash", "", false));
        assert!(!text.contains('|'));
    }
}
