//! # Application State
//!
//! Core business state for PhyQuest. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── tutor: Arc<TutorClient>        // remote tutoring client
//! ├── conversation: Conversation
//! │   ├── messages: Vec<Message>     // ordered history
//! │   ├── awaiting: bool             // Idle / Awaiting
//! │   ├── draft: String              // current input text
//! │   └── generation: u64            // bumped by clear()
//! ├── confirming_clear: bool         // clear() awaits a y/n answer
//! └── status_message: String         // status bar text
//! ```
//!
//! ## Submission state machine
//!
//! ```text
//!            submit(text)  [text non-blank, Idle]
//!   Idle ────────────────────────────────────────► Awaiting
//!    ▲                                                 │
//!    └──────────── complete(generation, reply) ────────┘
//! ```
//!
//! `submit` while Awaiting, or with blank text, changes nothing.
//! `clear` is allowed in both states and leaves the flag alone. A reply whose
//! generation predates the last `clear` is dropped, but still ends the wait.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::core::message::{Message, MessageId, Role};
use crate::inference::TutorClient;

/// A request the shell must send to the tutor. The history is a snapshot
/// that already ends with the just-submitted user message.
#[derive(Debug, Clone, PartialEq)]
pub struct TutorRequest {
    pub generation: u64,
    pub history: Vec<Message>,
}

#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<Message>,
    awaiting: bool,
    draft: String,
    generation: u64,
    next_id: u64,
    last_timestamp: Option<DateTime<Utc>>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_awaiting(&self) -> bool {
        self.awaiting
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, draft: String) {
        self.draft = draft;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Starts a turn. Appends the user message verbatim, clears the draft and
    /// enters Awaiting. Returns `None` (and changes nothing) when `text` is
    /// blank or a request is already in flight.
    pub fn submit(&mut self, text: &str) -> Option<TutorRequest> {
        if self.awaiting {
            debug!("Submit ignored: a response is still pending");
            return None;
        }
        if text.trim().is_empty() {
            debug!("Submit ignored: blank input");
            return None;
        }

        self.push(Role::User, text.to_string());
        self.draft.clear();
        self.awaiting = true;
        info!(
            "User turn appended (messages={}, generation={})",
            self.messages.len(),
            self.generation
        );

        Some(TutorRequest {
            generation: self.generation,
            history: self.messages.clone(),
        })
    }

    /// Submits the current draft.
    pub fn submit_draft(&mut self) -> Option<TutorRequest> {
        let text = self.draft.clone();
        self.submit(&text)
    }

    /// Ends the wait for the request tagged `generation`. Appends the reply
    /// unless a `clear` happened since the request was issued.
    ///
    /// Returns true if the reply was appended.
    pub fn complete(&mut self, generation: u64, reply: String) -> bool {
        self.awaiting = false;
        if generation != self.generation {
            info!(
                "Dropping stale reply (request generation {}, current {})",
                generation, self.generation
            );
            return false;
        }
        self.push(Role::Assistant, reply);
        true
    }

    /// Empties the history. Does not touch the awaiting flag.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.generation += 1;
        info!("Conversation cleared (generation={})", self.generation);
    }

    fn push(&mut self, role: Role, content: String) {
        self.next_id += 1;
        let now = Utc::now();
        // Timestamps never go backwards, even if the wall clock does.
        let timestamp = match self.last_timestamp {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last_timestamp = Some(timestamp);
        self.messages
            .push(Message::new(MessageId(self.next_id), role, content, timestamp));
    }
}

pub struct App {
    pub tutor: Arc<TutorClient>,
    pub conversation: Conversation,
    /// True while the clear confirmation prompt is showing.
    pub confirming_clear: bool,
    pub status_message: String,
}

impl App {
    pub fn new(tutor: Arc<TutorClient>) -> Self {
        Self {
            tutor,
            conversation: Conversation::new(),
            confirming_clear: false,
            status_message: String::from("Welcome to PhyQuest!"),
        }
    }

    pub fn model_name(&self) -> &str {
        self.tutor.model()
    }
}
