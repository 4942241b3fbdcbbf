use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a message within a session. Allocated by the conversation,
/// strictly increasing, never reused.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two participants of a tutoring session. The system instruction is
/// sent out-of-band with every request and is never stored as a message.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Short label used by the presentation layer.
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "you",
            Role::Assistant => "phyquest",
        }
    }
}

/// One turn of the conversation. `content` is Markdown that may contain
/// `$...$` and `$$...$$` math.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(id: MessageId, role: Role, content: String, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            role,
            content,
            timestamp,
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}
