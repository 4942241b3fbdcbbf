//! # Actions
//!
//! Everything that can happen in PhyQuest becomes an `Action`.
//! User presses Enter? That's `Action::Submit(None)`.
//! Tutor responds? That's `Action::ResponseReceived { .. }`.
//!
//! The `update()` function takes the current state and an action,
//! mutates the state, and returns an `Effect` describing any I/O the
//! caller must perform. No side effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::debug;

use crate::core::state::{App, TutorRequest};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Replace the draft input text.
    EditDraft(String),
    /// Submit a predefined prompt, or the draft when `None`.
    Submit(Option<String>),
    /// The tutor answered the request tagged `generation`.
    ResponseReceived { generation: u64, text: String },
    /// Ask the user to confirm clearing the session.
    RequestClear,
    ConfirmClear,
    CancelClear,
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// Send this request to the tutor and feed the reply back as
    /// `Action::ResponseReceived`.
    SpawnRequest(TutorRequest),
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    debug!("update: {:?}", action);
    match action {
        Action::EditDraft(text) => {
            app.conversation.set_draft(text);
            Effect::None
        }
        Action::Submit(custom) => {
            let request = match custom {
                Some(text) => app.conversation.submit(&text),
                None => app.conversation.submit_draft(),
            };
            match request {
                Some(request) => {
                    app.status_message = String::from("Thinking...");
                    Effect::SpawnRequest(request)
                }
                None => Effect::None,
            }
        }
        Action::ResponseReceived { generation, text } => {
            app.conversation.complete(generation, text);
            app.status_message = String::new();
            Effect::None
        }
        Action::RequestClear => {
            app.confirming_clear = true;
            Effect::None
        }
        Action::ConfirmClear => {
            if app.confirming_clear {
                app.conversation.clear();
                app.confirming_clear = false;
                app.status_message = String::from("Session cleared");
            }
            Effect::None
        }
        Action::CancelClear => {
            app.confirming_clear = false;
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}
