use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use crate::brain::LanguageTag;

/// Represents the generation parameters sent with every model call.
#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct ModelConfig {
    /// Controls the creativity of the model's responses. Value between 0.0 and 2.0.
    #[validate(range(min = 0.0, max = 2.0))]
    pub temperature: f32,
    /// Upper bound on generated tokens per response.
    #[validate(range(min = 1, max = 8192))]
    pub max_tokens: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 512,
        }
    }
}

/// The author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "User"),
            Role::Assistant => write!(f, "Assistant"),
        }
    }
}

/// Represents a single message within a chat session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The role of the message sender.
    pub role: Role,
    /// The text content of the message.
    pub content: String,
    /// Unix timestamp of when the message was created.
    pub created_at: i64,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: Utc::now().timestamp(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// The answer returned to the chat caller for one user turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    /// The session the turn belongs to (generated when the caller had none).
    pub session_id: String,
    /// Language detected for the user's message.
    pub language: LanguageTag,
    /// Cleaned assistant response.
    pub text: String,
    /// Possible hallucinations found in the response.
    #[serde(default)]
    pub warnings: Vec<String>,
}
