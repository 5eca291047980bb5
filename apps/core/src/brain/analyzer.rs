//! Brain Analyzer - Main orchestrator for the Brain module.
//!
//! Runs on both sides of a model call:
//! 1. Inbound: language classification and prompt selection
//! 2. Outbound: leakage scrubbing, repetition removal and hallucination checks

use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use super::context_packet::{CleanedResponse, ContextPacket};
use super::hallucination::HallucinationGuard;
use super::language::LanguageClassifier;
use super::prompts::{DefaultPrompts, PromptProvider};
use super::repetition::{RepetitionConfig, RepetitionReducer};
use super::scrubber::InstructionScrubber;

/// Main Brain analyzer that orchestrates all analysis components
pub struct BrainAnalyzer {
    classifier: LanguageClassifier,
    scrubber: InstructionScrubber,
    reducer: RepetitionReducer,
    guard: HallucinationGuard,
    prompts: Arc<dyn PromptProvider>,
}

impl Default for BrainAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl BrainAnalyzer {
    /// Create a new Brain analyzer with default settings
    pub fn new() -> Self {
        Self::with_config(RepetitionConfig::default())
    }

    /// Create a Brain analyzer with custom repetition thresholds
    pub fn with_config(config: RepetitionConfig) -> Self {
        Self {
            classifier: LanguageClassifier::new(),
            scrubber: InstructionScrubber::new(),
            reducer: RepetitionReducer::with_config(config),
            guard: HallucinationGuard::new(),
            prompts: Arc::new(DefaultPrompts),
        }
    }

    /// Replace the prompt templates
    pub fn with_prompts(mut self, prompts: Arc<dyn PromptProvider>) -> Self {
        self.prompts = prompts;
        self
    }

    /// Analyze a user message and produce a context packet
    pub fn analyze(&self, query: &str) -> ContextPacket {
        let start = Instant::now();

        let mut packet = ContextPacket::new(query.to_string());

        let classification = self.classifier.classify_detailed(query);
        packet.language = classification.language;
        packet.path = classification.path;
        packet.detection_text = classification.detection_text;
        packet.system_prompt = self.prompts.system_prompt(packet.language);

        packet.processing_time_us = start.elapsed().as_micros() as u64;
        packet.timestamp = Utc::now();

        debug!("{}", packet.summary());
        packet
    }

    /// User turn for the model, built from an analyzed message
    pub fn user_prompt(&self, packet: &ContextPacket) -> String {
        self.prompts
            .user_prompt(&packet.query, packet.language, packet.is_greeting_only())
    }

    /// Clean a raw model response: scrub, then dedupe, then check
    pub fn clean_response(&self, raw: &str) -> CleanedResponse {
        let scrubbed = self.scrubber.scrub(raw);
        let report = self.reducer.reduce_with_report(&scrubbed);
        let hallucination = self.guard.check(&report.text);

        for warning in &hallucination.warnings {
            warn!("Possible hallucination: {}", warning);
        }

        CleanedResponse {
            text: report.text,
            duplicates_removed: report.dropped,
            duplicate_counts: report.duplicate_counts,
            warnings: hallucination.warnings,
        }
    }
}
