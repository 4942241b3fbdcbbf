//! # InputBox Component
//!
//! Multi-line editor bound to the conversation draft.
//!
//! The box owns a local copy of the text and the cursor; every edit is
//! reported as `ContentChanged` so the parent can push the new text into the
//! core via `Action::EditDraft`. After each state update the parent calls
//! [`InputBox::sync`] so the box follows the core's draft (cleared on
//! submit, untouched while a submission is rejected).

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{
    Block, BorderType, Padding, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Border (2) + padding (2) consumed horizontally
const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders
const VERTICAL_OVERHEAD: u16 = 2;
/// Content lines shown before the box scrolls internally
const MAX_VISIBLE_LINES: u16 = 5;
/// Offset from the left edge of the area to the first text column
const TEXT_OFFSET_X: u16 = 2;

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Enter pressed. The parent submits the draft.
    Submit,
    /// Text changed.
    ContentChanged,
}

pub struct InputBox {
    buffer: String,
    /// Byte offset into `buffer`, always on a char boundary
    cursor: usize,
    scroll_offset: u16,
    /// Whether keystrokes currently land here (Prop)
    pub focused: bool,
    /// A reply is pending (Prop)
    pub awaiting: bool,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            scroll_offset: 0,
            focused: true,
            awaiting: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Adopt the core's draft if it differs from the local buffer.
    pub fn sync(&mut self, draft: &str) {
        if self.buffer != draft {
            self.buffer = draft.to_string();
            self.cursor = self.buffer.len();
            self.scroll_offset = 0;
        }
    }

    /// Height for the current content, clamped to the visible line limit.
    pub fn calculate_height(&self, area_width: u16) -> u16 {
        let lines = wrapped_lines(&self.buffer, inner_width(area_width)).len() as u16;
        lines.clamp(1, MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }

    fn insert_str(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
    }

    /// Move to the same column on the previous/next logical line.
    /// Returns false at the first/last line.
    pub fn move_cursor_vertically(&mut self, up: bool) -> bool {
        let line_start = self.buffer[..self.cursor].rfind('\n').map_or(0, |i| i + 1);
        let column = self.buffer[line_start..self.cursor].chars().count();

        let target_start = if up {
            if line_start == 0 {
                return false;
            }
            self.buffer[..line_start - 1]
                .rfind('\n')
                .map_or(0, |i| i + 1)
        } else {
            match self.buffer[self.cursor..].find('\n') {
                Some(i) => self.cursor + i + 1,
                None => return false,
            }
        };
        let target_end = self.buffer[target_start..]
            .find('\n')
            .map_or(self.buffer.len(), |i| target_start + i);

        self.cursor = self.buffer[target_start..target_end]
            .char_indices()
            .nth(column)
            .map_or(target_end, |(i, _)| target_start + i);
        true
    }

    fn update_scroll_offset(&mut self, cursor_row: u16, total_lines: u16) {
        if total_lines <= MAX_VISIBLE_LINES {
            self.scroll_offset = 0;
        } else if cursor_row < self.scroll_offset {
            self.scroll_offset = cursor_row;
        } else if cursor_row >= self.scroll_offset + MAX_VISIBLE_LINES {
            self.scroll_offset = cursor_row + 1 - MAX_VISIBLE_LINES;
        }
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = inner_width(area.width);
        let lines = wrapped_lines(&self.buffer, width);
        let total = lines.len() as u16;
        let (row, col) = cursor_offset(&self.buffer, self.cursor, width);
        self.update_scroll_offset(row, total);

        let visible: Vec<Line> = lines
            .into_iter()
            .skip(self.scroll_offset as usize)
            .take(MAX_VISIBLE_LINES as usize)
            .map(Line::from)
            .collect();

        let title = if self.awaiting {
            " Waiting for PhyQuest… "
        } else {
            " Ask a physics question "
        };
        let border_style = if self.focused {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let text_style = if self.focused {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::Gray).add_modifier(Modifier::DIM)
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(title)
            .title_bottom(Line::from(" Enter send · Ctrl+J newline ").right_aligned())
            .padding(Padding::horizontal(1));

        frame.render_widget(Paragraph::new(visible).block(block).style(text_style), area);

        if total > MAX_VISIBLE_LINES {
            let mut scrollbar_state = ScrollbarState::default()
                .content_length((total - MAX_VISIBLE_LINES) as usize)
                .position(self.scroll_offset as usize);
            let scrollbar_area = Rect {
                x: area.x + area.width.saturating_sub(1),
                y: area.y + 1,
                width: 1,
                height: area.height.saturating_sub(VERTICAL_OVERHEAD),
            };
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                scrollbar_area,
                &mut scrollbar_state,
            );
        }

        if self.focused {
            let x = area.x + TEXT_OFFSET_X + col.min(width);
            let y = area.y + 1 + row.saturating_sub(self.scroll_offset);
            frame.set_cursor_position((x, y));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                let mut buf = [0u8; 4];
                self.insert_str(c.encode_utf8(&mut buf));
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                self.insert_str(&text.replace("\r\n", "\n").replace('\r', "\n"));
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => {
                let prev = self.buffer[..self.cursor].char_indices().next_back()?.0;
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Delete => {
                let len = self.buffer[self.cursor..].chars().next()?.len_utf8();
                self.buffer.drain(self.cursor..self.cursor + len);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorLeft => {
                self.cursor = self.buffer[..self.cursor].char_indices().next_back()?.0;
                None
            }
            TuiEvent::CursorRight => {
                self.cursor += self.buffer[self.cursor..].chars().next()?.len_utf8();
                None
            }
            TuiEvent::CursorHome => {
                self.cursor = self.buffer[..self.cursor].rfind('\n').map_or(0, |i| i + 1);
                None
            }
            TuiEvent::CursorEnd => {
                self.cursor = self.buffer[self.cursor..]
                    .find('\n')
                    .map_or(self.buffer.len(), |i| self.cursor + i);
                None
            }
            TuiEvent::Submit => Some(InputEvent::Submit),
            _ => None,
        }
    }
}

// ── Wrapping helpers ────────────────────────────────────────────────────────

fn inner_width(area_width: u16) -> u16 {
    area_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

fn wrap_options(width: u16) -> textwrap::Options<'static> {
    textwrap::Options::new(width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

/// Display lines for `text` at `width`, including the empty line a
/// trailing newline opens.
fn wrapped_lines(text: &str, width: u16) -> Vec<String> {
    if width == 0 || text.is_empty() {
        return vec![String::new()];
    }
    let mut lines: Vec<String> = textwrap::wrap(text, wrap_options(width))
        .into_iter()
        .map(|l| l.into_owned())
        .collect();
    if text.ends_with('\n') && !lines.last().is_some_and(|l| l.is_empty()) {
        lines.push(String::new());
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// (row, column) of the cursor within the wrapped text.
fn cursor_offset(buffer: &str, pos: usize, width: u16) -> (u16, u16) {
    if width == 0 {
        return (0, 0);
    }
    let before = &buffer[..pos];
    let row = (wrapped_lines(before, width).len() as u16).saturating_sub(1);

    // Measure from the last newline: wrapping trims trailing spaces
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let logical = &before[line_start..];
    let segments = textwrap::wrap(logical, wrap_options(width));
    let consumed: usize = segments
        .iter()
        .take(segments.len().saturating_sub(1))
        .map(|s| s.width())
        .sum();
    let col = logical.width().saturating_sub(consumed) as u16;
    (row, col)
}
