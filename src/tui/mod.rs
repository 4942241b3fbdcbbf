//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! - **Awaiting a reply**: draws every ~80ms so the spinner moves.
//! - **Idle**: sleeps up to 500ms, only redraws on events or resize.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous redraws.

mod component;
mod components;
mod event;
pub mod markdown;
pub mod math;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::{App, TutorRequest};
use crate::inference::{GeminiProvider, OpenRouterProvider, TutorClient, TutorProvider};
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState, PickerEvent, PickerState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Where keystrokes go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Editing the draft.
    Input,
    /// Choosing a topic or suggested problem. Typing switches back to Input.
    Picker,
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
    pub picker: PickerState,
    pub focus: Focus,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
            picker: PickerState::new(),
            focus: Focus::Input, // Student expects to type immediately
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            DisableMouseCapture,
            DisableBracketedPaste,
            SetCursorStyle::DefaultUserShape
        );
    }
}

/// Build the provider named in the resolved config. The name is already
/// normalized by `config::resolve`.
///
/// A missing key is not fatal: the provider is built with an empty key and
/// the auth failure later surfaces as the connectivity reply.
pub fn build_provider(config: &ResolvedConfig) -> Arc<dyn TutorProvider> {
    let api_key = config.api_key.clone().unwrap_or_default();
    let base_url = Some(config.base_url.clone());
    match config.provider.as_str() {
        "openrouter" => Arc::new(OpenRouterProvider::new(api_key, base_url)),
        _ => Arc::new(GeminiProvider::new(api_key, base_url)),
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let provider = build_provider(&config);
    let tutor = Arc::new(TutorClient::new(provider, config.model_name.clone()));
    let mut app = App::new(tutor);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let mode_guard = TerminalModeGuard::new()
        .inspect_err(|e| warn!("Failed to enable terminal modes: {}", e))
        .ok();

    let result = event_loop(&mut terminal, &mut app, &mut tui);

    drop(mode_guard);
    ratatui::restore();
    info!(
        "PhyQuest exiting after {} messages",
        app.conversation.messages().len()
    );
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    app: &mut App,
    tui: &mut TuiState,
) -> std::io::Result<()> {
    // Replies from background tutor requests
    let (tx, rx) = mpsc::channel();

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        let animating = app.conversation.is_awaiting();
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, app, tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            match handle_event(app, tui, event) {
                Effect::Quit => return Ok(()),
                Effect::SpawnRequest(request) => {
                    spawn_request(app.tutor.clone(), request, tx.clone())
                }
                Effect::None => {}
            }
        }

        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if update(app, action) == Effect::Quit {
                return Ok(());
            }
            tui.input_box.sync(app.conversation.draft());
        }
    }
}

/// Route one terminal event through the focused component into `update()`.
///
/// Returns the effect the caller must perform.
pub fn handle_event(app: &mut App, tui: &mut TuiState, event: TuiEvent) -> Effect {
    let effect = route_event(app, tui, event);
    tui.input_box.sync(app.conversation.draft());
    effect
}

fn route_event(app: &mut App, tui: &mut TuiState, event: TuiEvent) -> Effect {
    // Ctrl+C always quits, modal or not
    if event == TuiEvent::ForceQuit {
        return update(app, Action::Quit);
    }

    if app.confirming_clear {
        return match event {
            TuiEvent::InputChar('y' | 'Y') => {
                let effect = update(app, Action::ConfirmClear);
                tui.message_list = MessageListState::new();
                effect
            }
            TuiEvent::InputChar('n' | 'N') | TuiEvent::Escape => {
                update(app, Action::CancelClear)
            }
            _ => Effect::None,
        };
    }

    match event {
        TuiEvent::RequestClear => update(app, Action::RequestClear),
        TuiEvent::Resize => Effect::None,
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            tui.message_list.handle_event(&event);
            Effect::None
        }
        _ => match tui.focus {
            Focus::Input => input_event(app, tui, event),
            Focus::Picker => picker_event(app, tui, event),
        },
    }
}

fn input_event(app: &mut App, tui: &mut TuiState, event: TuiEvent) -> Effect {
    match event {
        TuiEvent::FocusPicker => {
            tui.focus = Focus::Picker;
            Effect::None
        }
        // Up/Down move within a multi-line draft, otherwise scroll the conversation
        TuiEvent::CursorUp | TuiEvent::CursorDown => {
            let up = event == TuiEvent::CursorUp;
            if !tui.input_box.move_cursor_vertically(up) {
                let scroll = if up {
                    TuiEvent::ScrollUp
                } else {
                    TuiEvent::ScrollDown
                };
                tui.message_list.handle_event(&scroll);
            }
            Effect::None
        }
        _ => match tui.input_box.handle_event(&event) {
            Some(InputEvent::Submit) => update(app, Action::Submit(None)),
            Some(InputEvent::ContentChanged) => {
                update(app, Action::EditDraft(tui.input_box.text().to_string()))
            }
            None => Effect::None,
        },
    }
}

fn picker_event(app: &mut App, tui: &mut TuiState, event: TuiEvent) -> Effect {
    // Typing auto-switches to Input and forwards the keystroke
    if matches!(event, TuiEvent::InputChar(_) | TuiEvent::Paste(_)) {
        tui.focus = Focus::Input;
        return input_event(app, tui, event);
    }

    tui.picker.include_suggestions = app.conversation.is_empty();
    match tui.picker.handle_event(&event) {
        Some(PickerEvent::Choose(prompt)) => {
            tui.focus = Focus::Input;
            update(app, Action::Submit(Some(prompt)))
        }
        Some(PickerEvent::Dismiss) => {
            tui.focus = Focus::Input;
            Effect::None
        }
        None => Effect::None,
    }
}

fn spawn_request(tutor: Arc<TutorClient>, request: TutorRequest, tx: mpsc::Sender<Action>) {
    info!(
        "Spawning tutor request (generation={}, {} messages, provider={})",
        request.generation,
        request.history.len(),
        tutor.provider_name()
    );

    tokio::spawn(async move {
        let started = Instant::now();
        let text = tutor.get_tutor_response(&request.history).await;
        debug!(
            "Tutor request finished in {}ms",
            started.elapsed().as_millis()
        );
        let action = Action::ResponseReceived {
            generation: request.generation,
            text,
        };
        if tx.send(action).is_err() {
            warn!("Failed to deliver tutor reply: receiver dropped");
        }
    });
}
