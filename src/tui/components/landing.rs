//! # Landing Page Component
//!
//! Welcome text and the suggested problems, shown while the conversation
//! is empty. Suggested problems are Markdown with inline math, so they go
//! through the same renderer as tutor replies.

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Paragraph, Wrap};

use crate::core::topics::SUGGESTED_PROBLEMS;
use crate::tui::component::Component;
use crate::tui::markdown;

pub struct LandingPage {
    /// Suggestion highlighted by the picker, if any (Prop)
    pub highlighted: Option<usize>,
}

impl LandingPage {
    pub fn new(highlighted: Option<usize>) -> Self {
        Self { highlighted }
    }

    fn text(&self) -> Text<'static> {
        let mut lines = vec![
            Line::from(Span::styled(
                "Welcome to PhyQuest!",
                Style::default()
                    .fg(Color::LightBlue)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(Span::styled(
                "Ask any 11th grade physics question and get a step-by-step solution.",
                Style::default().fg(Color::Gray),
            )),
            Line::from(Span::styled(
                "Press Tab to pick a topic or one of these problems:",
                Style::default().fg(Color::DarkGray),
            )),
            Line::default(),
        ];

        for (i, problem) in SUGGESTED_PROBLEMS.iter().enumerate() {
            let selected = self.highlighted == Some(i);
            let (marker, base) = if selected {
                ("▶ ", Color::White)
            } else {
                ("  ", Color::Gray)
            };
            let rendered = markdown::render(problem, base);
            for (n, line) in rendered.lines.into_iter().enumerate() {
                let prefix = if n == 0 { marker } else { "  " };
                let mut spans = vec![Span::styled(prefix, Style::default().fg(Color::Cyan))];
                spans.extend(line.spans);
                let mut line = Line::from(spans);
                if selected {
                    line = line.style(Style::default().add_modifier(Modifier::BOLD));
                }
                lines.push(line);
            }
            lines.push(Line::default());
        }
        Text::from(lines)
    }
}

impl Component for LandingPage {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let paragraph = Paragraph::new(self.text()).wrap(Wrap { trim: false });
        let height = (paragraph.line_count(area.width) as u16).min(area.height);

        let [centered] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(area);
        frame.render_widget(paragraph, centered);
    }
}
