//! Turn and message domain types.
//!
//! A [`Turn`] is what the transcript stores and the exporter renders.
//! A [`ChatMessage`] is the `{role, content}` pair that goes over the wire
//! to the completion service.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Timestamp format used for turn annotations and the export line.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Unique identifier for one interactive session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role of a turn's author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The model (or a synthesized stand-in for it)
    Assistant,
    /// Instruction text, or a local notice kept in the transcript only
    System,
}

impl Role {
    /// Whether turns of this role are eligible for the context window.
    pub fn is_conversational(self) -> bool {
        matches!(self, Role::User | Role::Assistant)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One conversational unit in a transcript.
///
/// Content is kept verbatim: code blocks, indentation and blank lines all
/// survive display and export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Who produced this turn
    pub role: Role,

    /// The text content
    pub content: String,

    /// Local timestamp in [`TIMESTAMP_FORMAT`], empty when the turn has none
    #[serde(default)]
    pub created_at: String,
}

impl Turn {
    /// A user turn stamped with the current local time.
    pub fn user(content: impl Into<String>) -> Self {
        Self::stamped(Role::User, content)
    }

    /// An assistant turn stamped with the current local time.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::stamped(Role::Assistant, content)
    }

    /// An unstamped assistant turn, used for the session greeting.
    pub fn greeting(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            created_at: String::new(),
        }
    }

    /// A turn with an explicit timestamp.
    pub fn at(role: Role, content: impl Into<String>, at: NaiveDateTime) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: format_timestamp(at),
        }
    }

    fn stamped(role: Role, content: impl Into<String>) -> Self {
        Self::at(role, content, Local::now().naive_local())
    }

    pub fn has_timestamp(&self) -> bool {
        !self.created_at.is_empty()
    }
}

/// Format a timestamp the way turns and exports display it.
pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// A `{role, content}` pair sent to the completion service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }
}

impl From<&Turn> for ChatMessage {
    fn from(turn: &Turn) -> Self {
        Self::new(turn.role, turn.content.clone())
    }
}
