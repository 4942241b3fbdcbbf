//! # TUI Components
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: model name, status, "↓ New" marker
//! - `MessageCard`: one conversation turn
//! - `LandingPage`: welcome text and suggested problems
//! - `ConfirmClear`: the y/n modal
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `InputBox`: the draft editor
//! - `MessageList`: scrollable conversation with layout caching
//! - `Sidebar` + `PickerState`: quick topics and the prompt picker
//!
//! Components receive external data as props (struct fields or
//! constructor arguments), never by reaching into `App`.
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs
//! ├── sidebar.rs       (topics, controls, picker state)
//! ├── landing.rs
//! ├── message.rs       (single message card)
//! ├── message_list.rs  (scrollable container)
//! ├── input_box.rs
//! └── confirm_clear.rs
//! ```

pub mod confirm_clear;
pub mod input_box;
pub mod landing;
pub mod message;
pub mod message_list;
pub mod sidebar;
pub mod title_bar;

pub use confirm_clear::ConfirmClear;
pub use input_box::{InputBox, InputEvent};
pub use landing::LandingPage;
pub use message_list::{MessageList, MessageListState};
pub use sidebar::{PickerEntry, PickerEvent, PickerState, SIDEBAR_WIDTH, Sidebar};
pub use title_bar::TitleBar;
