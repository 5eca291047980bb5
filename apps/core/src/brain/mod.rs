//! # Brain Module
//!
//! Fast, non-LLM text analysis for AgriBot.
//! Classifies user input BEFORE calling the LLM and cleans its output AFTER.
//!
//! ## Components
//! - `lexicon`: Greeting phrases per language and romanized Hindi markers
//! - `language`: English / Hindi / Hinglish classification
//! - `scrubber`: Removal of leaked instructions and meta-commentary
//! - `repetition`: Near-duplicate sentence removal (Jaccard similarity)
//! - `hallucination`: Warnings for invented prices and dates
//! - `prompts`: System and user prompt templates per language
//! - `context_packet`: Output data structures
//! - `analyzer`: Main orchestrator

pub mod analyzer;
pub mod context_packet;
pub mod hallucination;
pub mod language;
pub mod lexicon;
pub mod prompts;
pub mod repetition;
pub mod scrubber;

// Re-export main types for convenience
pub use analyzer::BrainAnalyzer;
pub use context_packet::{CleanedResponse, ContextPacket, DetectionPath, LanguageTag};
pub use hallucination::{HallucinationGuard, HallucinationReport};
pub use language::{classify_language, Classification, LanguageClassifier};
pub use lexicon::GreetingLexicon;
pub use prompts::{DefaultPrompts, PromptProvider};
pub use repetition::{reduce_repetition, RepetitionConfig, RepetitionReducer, RepetitionReport};
pub use scrubber::{scrub_instructions, InstructionScrubber};
