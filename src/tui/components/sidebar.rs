//! # Sidebar Component
//!
//! Title, the "Quick Topics" shortcuts and the key reference.
//!
//! Also owns the prompt picker: Tab moves focus here, Up/Down walk the
//! topics (and the welcome screen's suggested problems while the
//! conversation is empty), Enter submits the highlighted prompt.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `PickerState` lives in `TuiState`
//! - `Sidebar` is created each frame with borrowed state

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph};

use crate::core::topics::{PhysicsTopic, SUGGESTED_PROBLEMS};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

pub const SIDEBAR_WIDTH: u16 = 28;

const CONTROLS: [(&str, &str); 6] = [
    ("Enter", "send"),
    ("Ctrl+J", "newline"),
    ("Tab", "topics"),
    ("Esc", "back to input"),
    ("Ctrl+L", "clear session"),
    ("Ctrl+C", "quit"),
];

/// Something the picker can submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerEntry {
    Topic(PhysicsTopic),
    /// Index into `SUGGESTED_PROBLEMS`
    Suggestion(usize),
}

impl PickerEntry {
    pub fn prompt(self) -> String {
        match self {
            PickerEntry::Topic(topic) => topic.prompt(),
            PickerEntry::Suggestion(i) => SUGGESTED_PROBLEMS[i].to_string(),
        }
    }
}

/// Events emitted by the picker.
#[derive(Debug, Clone, PartialEq)]
pub enum PickerEvent {
    Choose(String),
    Dismiss,
}

/// Persistent state for the prompt picker.
pub struct PickerState {
    pub selected: usize,
    /// Suggested problems are selectable (conversation empty) (Prop)
    pub include_suggestions: bool,
}

impl Default for PickerState {
    fn default() -> Self {
        Self::new()
    }
}

impl PickerState {
    pub fn new() -> Self {
        Self {
            selected: 0,
            include_suggestions: true,
        }
    }

    fn len(&self) -> usize {
        let suggestions = if self.include_suggestions {
            SUGGESTED_PROBLEMS.len()
        } else {
            0
        };
        PhysicsTopic::ALL.len() + suggestions
    }

    /// The highlighted entry, clamped to what is currently selectable.
    pub fn current(&self) -> PickerEntry {
        let index = self.selected.min(self.len() - 1);
        match PhysicsTopic::ALL.get(index) {
            Some(topic) => PickerEntry::Topic(*topic),
            None => PickerEntry::Suggestion(index - PhysicsTopic::ALL.len()),
        }
    }
}

impl EventHandler for PickerState {
    type Event = PickerEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        self.selected = self.selected.min(self.len() - 1);
        match event {
            TuiEvent::Escape | TuiEvent::FocusPicker => Some(PickerEvent::Dismiss),
            TuiEvent::CursorUp => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            TuiEvent::CursorDown => {
                self.selected = (self.selected + 1).min(self.len() - 1);
                None
            }
            TuiEvent::Submit => Some(PickerEvent::Choose(self.current().prompt())),
            _ => None,
        }
    }
}

/// Transient render wrapper for the sidebar.
pub struct Sidebar<'a> {
    picker: &'a PickerState,
    focused: bool,
}

impl<'a> Sidebar<'a> {
    pub fn new(picker: &'a PickerState, focused: bool) -> Self {
        Self { picker, focused }
    }
}

impl Component for Sidebar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::RIGHT)
            .border_style(Style::default().fg(Color::DarkGray))
            .padding(Padding::horizontal(1));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let topics_height = PhysicsTopic::ALL.len() as u16 + 1;
        let [title_area, topics_area, _, controls_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(topics_height),
            Constraint::Min(0),
            Constraint::Length(CONTROLS.len() as u16 + 1),
        ])
        .areas(inner);

        let title = Paragraph::new(vec![
            Line::from(Span::styled(
                "⚛ PhyQuest",
                Style::default()
                    .fg(Color::LightBlue)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "11th grade physics tutor",
                Style::default().fg(Color::DarkGray),
            )),
        ]);
        frame.render_widget(title, title_area);

        let highlighted = match self.picker.current() {
            PickerEntry::Topic(topic) if self.focused => Some(topic),
            _ => None,
        };
        let items: Vec<ListItem> = PhysicsTopic::ALL
            .iter()
            .map(|topic| {
                let style = if highlighted == Some(*topic) {
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default().fg(Color::Gray)
                };
                ListItem::new(Line::from(Span::styled(format!("• {}", topic.label()), style)))
            })
            .collect();
        let heading_style = if self.focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)
        };
        let list = List::new(items).block(Block::default().title(Span::styled("Quick Topics", heading_style)));
        let mut list_state = ListState::default();
        list_state.select(highlighted.and_then(|t| PhysicsTopic::ALL.iter().position(|x| *x == t)));
        frame.render_stateful_widget(list, topics_area, &mut list_state);

        let mut controls = vec![Line::from(Span::styled(
            "Controls",
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        ))];
        controls.extend(CONTROLS.iter().map(|(key, what)| {
            Line::from(vec![
                Span::styled(format!("{key:<7}"), Style::default().fg(Color::Yellow)),
                Span::styled(*what, Style::default().fg(Color::DarkGray)),
            ])
        }));
        frame.render_widget(Paragraph::new(controls), controls_area);
    }
}
