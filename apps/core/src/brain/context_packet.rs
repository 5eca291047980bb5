//! Context Packet - Output structures for Brain analysis.
//!
//! Contains the language decision for an inbound message and the diagnostics
//! gathered while cleaning an outbound response.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// Detected language of a chat message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LanguageTag {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "hi")]
    Hindi,
    #[serde(rename = "hinglish")]
    Hinglish,
}

impl LanguageTag {
    /// Tie-break order when a message matches several greeting sets.
    pub const PRIORITY: [LanguageTag; 3] =
        [LanguageTag::Hinglish, LanguageTag::Hindi, LanguageTag::English];

    /// Returns the language code
    pub fn code(&self) -> &'static str {
        match self {
            LanguageTag::English => "en",
            LanguageTag::Hindi => "hi",
            LanguageTag::Hinglish => "hinglish",
        }
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for LanguageTag {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(LanguageTag::English),
            "hi" | "hindi" => Ok(LanguageTag::Hindi),
            "hinglish" => Ok(LanguageTag::Hinglish),
            other => Err(AppError::Validation(format!("Unknown language tag: {}", other))),
        }
    }
}

/// Which rule of the classifier produced the language tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionPath {
    /// Empty or absent input
    Empty,
    /// Whole message matched a greeting phrase
    GreetingPhrase,
    /// Every significant word is a greeting word
    GreetingWords,
    /// Script and marker-word detection on the message content
    Script,
}

/// Complete context packet from Brain analysis of an inbound message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextPacket {
    /// Original user query
    pub query: String,

    /// Detected language
    pub language: LanguageTag,

    /// Rule that decided the language
    pub path: DetectionPath,

    /// Text the script detection ran on (greetings trimmed)
    pub detection_text: String,

    /// System prompt selected for the detected language
    pub system_prompt: String,

    /// Processing time in microseconds
    pub processing_time_us: u64,

    /// Timestamp of analysis
    pub timestamp: DateTime<Utc>,
}

impl ContextPacket {
    /// Create a new empty context packet
    pub fn new(query: String) -> Self {
        Self {
            query,
            language: LanguageTag::English,
            path: DetectionPath::Empty,
            detection_text: String::new(),
            system_prompt: String::new(),
            processing_time_us: 0,
            timestamp: Utc::now(),
        }
    }

    /// Whether the message was nothing but a greeting
    pub fn is_greeting_only(&self) -> bool {
        matches!(
            self.path,
            DetectionPath::GreetingPhrase | DetectionPath::GreetingWords
        )
    }

    /// Get a summary for logging
    pub fn summary(&self) -> String {
        format!(
            "Language: {} via {:?}, Greeting only: {}, Took: {}us",
            self.language,
            self.path,
            if self.is_greeting_only() { "yes" } else { "no" },
            self.processing_time_us
        )
    }
}

/// A model response after leakage scrubbing and repetition removal
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleanedResponse {
    /// Final user-facing text
    pub text: String,
    /// Number of sentences dropped as near-duplicates
    pub duplicates_removed: usize,
    /// Occurrence count per dropped (normalized) sentence
    pub duplicate_counts: HashMap<String, usize>,
    /// Possible hallucinations spotted in the text
    pub warnings: Vec<String>,
}
