//! Modal asking the student to confirm clearing the session.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Paragraph};

use crate::tui::component::Component;

const WIDTH: u16 = 44;
const HEIGHT: u16 = 5;

pub struct ConfirmClear;

impl Component for ConfirmClear {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(WIDTH, HEIGHT, area);
        frame.render_widget(Clear, overlay);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Clear session ");
        let body = Paragraph::new(vec![
            Line::from("Clear the whole conversation?"),
            Line::from(vec![
                Span::styled("y", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                Span::raw(" yes   "),
                Span::styled("n", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
                Span::raw(" no"),
            ]),
        ])
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(body, overlay);
    }
}

/// A `width` x `height` rect centered in `outer`, shrunk to fit.
fn centered_rect(width: u16, height: u16, outer: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(outer.height))])
        .flex(Flex::Center)
        .areas(outer);
    let [center] = Layout::horizontal([Constraint::Length(width.min(outer.width))])
        .flex(Flex::Center)
        .areas(row);
    center
}
