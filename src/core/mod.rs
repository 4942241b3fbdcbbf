//! # Core Application Logic
//!
//! This module contains PhyQuest's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Message (data)       │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No UI. No network.     │
//!                    └───────────┬─────────────┘
//!                                │
//!                    ┌───────────┴───────────┐
//!                    ▼                       ▼
//!             ┌────────────┐          ┌────────────┐
//!             │    TUI     │          │ inference  │
//!             │  Adapter   │          │  (tutor)   │
//!             │ (ratatui)  │          │            │
//!             └────────────┘          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`message`]: The `Message` model, one conversation turn
//! - [`state`]: `Conversation` (the submission state machine) and `App`
//! - [`action`]: The `Action` enum and `update()` reducer
//! - [`topics`]: Predefined prompts
//! - [`config`]: Layered configuration

pub mod action;
pub mod config;
pub mod message;
pub mod state;
pub mod topics;
