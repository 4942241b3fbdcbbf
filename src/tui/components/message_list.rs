//! # MessageList Component
//!
//! Scrollable view of the conversation.
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the message slice
//! (props). Heights are cached per `MessageId`: messages never change once
//! appended, so only new messages, a width change, or a cleared session
//! force re-measurement.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::message::{Message, MessageId};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::MessageCard;
use crate::tui::event::TuiEvent;

/// Rows reserved under the last message while a reply is pending.
const THINKING_HEIGHT: u16 = 2;
const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// Canvas height of the last frame, thinking indicator included
    canvas_height: u16,
    /// (message count, awaiting) seen on the last frame
    last_seen: (usize, bool),
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true,
            viewport_height: 0,
            canvas_height: 0,
            last_seen: (0, false),
        }
    }

    fn max_scroll(&self) -> u16 {
        self.canvas_height.saturating_sub(self.viewport_height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_scroll();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Re-engage auto-scroll once the user scrolls back to the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_scroll();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// True when content exists below the visible window.
    pub fn has_unseen_content(&self) -> bool {
        !self.stick_to_bottom && self.scroll_state.offset().y < self.max_scroll()
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub messages: &'a [Message],
    pub awaiting: bool,
    pub spinner_frame: usize,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        messages: &'a [Message],
        awaiting: bool,
        spinner_frame: usize,
    ) -> Self {
        Self {
            state,
            messages,
            awaiting,
            spinner_frame,
        }
    }
}

impl Component for MessageList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar

        // New message or awaiting flip: follow the conversation again
        let seen = (self.messages.len(), self.awaiting);
        if seen != self.state.last_seen {
            self.state.last_seen = seen;
            self.state.stick_to_bottom = true;
        }

        self.state.layout.refresh(self.messages, content_width);
        let messages_height = self.state.layout.total_height();
        let indicator_height = if self.awaiting { THINKING_HEIGHT } else { 0 };
        self.state.canvas_height = messages_height + indicator_height;
        self.state.viewport_height = area.height;

        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible_range = self.state.layout.visible_range(scroll_offset, area.height);

        let mut scroll_view =
            ScrollView::new(Size::new(content_width, self.state.canvas_height))
                .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
                .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset = self.state.layout.top_of(visible_range.start);
        for i in visible_range {
            let height = self.state.layout.heights[i];
            let rect = Rect::new(0, y_offset, content_width, height);
            scroll_view.render_widget(MessageCard::new(&self.messages[i]), rect);
            y_offset += height;
        }

        if self.awaiting {
            let spinner = SPINNER[self.spinner_frame % SPINNER.len()];
            let indicator = Paragraph::new(Line::from(vec![
                Span::styled(format!(" {spinner} "), Style::default().fg(Color::Cyan)),
                Span::styled(
                    "PhyQuest is thinking…",
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                ),
            ]));
            let rect = Rect::new(0, messages_height + 1, content_width, 1);
            scroll_view.render_widget(indicator, rect);
        }

        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            _ => {}
        }
        None
    }
}

/// Cached per-message heights for one content width.
pub struct LayoutCache {
    ids: Vec<MessageId>,
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    content_width: u16,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            ids: Vec::new(),
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            content_width: 0,
        }
    }

    /// Number of leading cached heights still valid for `messages`.
    pub fn reusable_count(&self, messages: &[Message], content_width: u16) -> usize {
        if self.content_width != content_width {
            return 0;
        }
        self.ids
            .iter()
            .zip(messages)
            .take_while(|(id, message)| **id == message.id)
            .count()
    }

    /// Measure whatever is not already cached.
    pub fn refresh(&mut self, messages: &[Message], content_width: u16) {
        let keep = self.reusable_count(messages, content_width);
        self.ids.truncate(keep);
        self.heights.truncate(keep);
        for message in &messages[keep..] {
            self.ids.push(message.id);
            self.heights
                .push(MessageCard::new(message).height(content_width));
        }
        self.content_width = content_width;
        self.rebuild_prefix_heights();
    }

    fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// Canvas y of message `index`.
    pub fn top_of(&self, index: usize) -> u16 {
        match index {
            0 => 0,
            i => self.prefix_heights.get(i - 1).copied().unwrap_or(0),
        }
    }

    /// Messages overlapping the viewport, with half a screen of slack either side.
    pub fn visible_range(&self, scroll_offset: u16, viewport_height: u16) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end.max(start)
    }
}
