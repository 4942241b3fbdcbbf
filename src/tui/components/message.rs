use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Text;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::message::{Message, Role};
use crate::tui::markdown;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// One conversation turn drawn as a rounded card.
///
/// Both sides go through the Markdown renderer in the role's color, so a
/// student's `$...$` comes out typeset just like the tutor's. Height is measured
/// with the same `Paragraph` that renders, so the scroll layout matches
/// what ends up on screen.
pub struct MessageCard {
    role: Role,
    time: String,
    body: Paragraph<'static>,
}

impl MessageCard {
    pub fn new(message: &Message) -> Self {
        Self {
            role: message.role,
            time: message.timestamp.format("%H:%M").to_string(),
            body: Paragraph::new(body_text(message)).wrap(Wrap { trim: false }),
        }
    }

    /// Rows needed to draw this card at `width` columns.
    pub fn height(&self, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Too narrow for borders + padding; still occupy a row
            return 1;
        }
        let lines = self.body.line_count(content_width) as u16;
        lines.max(1) + VERTICAL_OVERHEAD
    }
}

fn body_text(message: &Message) -> Text<'static> {
    let content = message.content.trim();
    let base_fg = match message.role {
        Role::User => Color::Green,
        Role::Assistant => Color::Gray,
    };
    markdown::render(content, base_fg)
}

pub(crate) fn role_style(role: Role) -> Style {
    match role {
        Role::User => Style::default().fg(Color::Green),
        Role::Assistant => Style::default().fg(Color::Blue),
    }
}

impl Widget for MessageCard {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = role_style(self.role).add_modifier(Modifier::DIM);
        let block = Block::bordered()
            .title(self.role.label())
            .title_top(ratatui::text::Line::from(format!(" {} ", self.time)).right_aligned())
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(role_style(self.role).add_modifier(Modifier::BOLD))
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(area);
        block.render(area, buf);
        self.body.render(inner_area, buf);
    }
}
