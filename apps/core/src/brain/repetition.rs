//! Repetition Reduction for generated responses.
//!
//! Greedy near-duplicate sentence filter: a sentence is dropped when its word
//! set is too similar (Jaccard) to a sentence already kept.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;
use validator::Validate;

/// Tunable thresholds for duplicate detection
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RepetitionConfig {
    /// Similarity above which a sentence counts as a duplicate
    #[validate(range(min = 0.0, max = 1.0))]
    pub similarity_threshold: f32,
    /// Fragments this short or shorter are treated as noise
    pub min_fragment_chars: usize,
    /// Sentences shorter than this are kept without comparison
    pub min_compare_chars: usize,
}

impl Default for RepetitionConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.75,
            min_fragment_chars: 10,
            min_compare_chars: 15,
        }
    }
}

/// Outcome of one reduction pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepetitionReport {
    /// Cleaned text
    pub text: String,
    /// Sentences kept
    pub kept: usize,
    /// Sentences dropped as duplicates
    pub dropped: usize,
    /// Occurrences per dropped (normalized) sentence
    pub duplicate_counts: HashMap<String, usize>,
}

/// A sentence candidate, alive for one pass only
struct SentenceUnit<'a> {
    text: &'a str,
    normalized: String,
    words: HashSet<String>,
}

impl<'a> SentenceUnit<'a> {
    fn new(text: &'a str) -> Self {
        let normalized = text
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        let words = normalized.split(' ').map(str::to_string).collect();
        Self {
            text,
            normalized,
            words,
        }
    }

    fn similarity(&self, other: &SentenceUnit<'_>) -> f32 {
        jaccard(&self.words, &other.words)
    }
}

/// Intersection over union of two word sets; 0.0 when both are empty
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f32 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f32 / union as f32
}

/// Near-duplicate sentence remover
pub struct RepetitionReducer {
    config: RepetitionConfig,
}

impl Default for RepetitionReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl RepetitionReducer {
    /// Create a reducer with the default thresholds
    pub fn new() -> Self {
        Self::with_config(RepetitionConfig::default())
    }

    /// Create a reducer with custom thresholds
    pub fn with_config(config: RepetitionConfig) -> Self {
        Self { config }
    }

    /// Remove near-duplicate sentences
    pub fn reduce(&self, text: &str) -> String {
        self.reduce_with_report(text).text
    }

    /// Remove near-duplicate sentences and report what was dropped
    pub fn reduce_with_report(&self, text: &str) -> RepetitionReport {
        let sentences: Vec<&str> = text
            .split(['.', '!', '?', '\n'])
            .map(str::trim)
            .filter(|s| s.chars().count() > self.config.min_fragment_chars)
            .collect();

        if sentences.len() < 2 {
            return RepetitionReport {
                text: text.to_string(),
                kept: sentences.len(),
                dropped: 0,
                duplicate_counts: HashMap::new(),
            };
        }

        let mut units = sentences.into_iter().map(SentenceUnit::new);
        let mut kept: Vec<&str> = Vec::new();
        let mut remembered: Vec<SentenceUnit<'_>> = Vec::new();
        let mut duplicate_counts: HashMap<String, usize> = HashMap::new();
        let mut dropped = 0;

        if let Some(first) = units.next() {
            kept.push(first.text);
            remembered.push(first);
        }

        for unit in units {
            if unit.normalized.chars().count() < self.config.min_compare_chars {
                kept.push(unit.text);
                continue;
            }

            let best = remembered
                .iter()
                .map(|seen| unit.similarity(seen))
                .fold(0.0_f32, f32::max);

            if best > self.config.similarity_threshold {
                dropped += 1;
                *duplicate_counts.entry(unit.normalized).or_insert(0) += 1;
            } else {
                kept.push(unit.text);
                remembered.push(unit);
            }
        }

        if dropped > 0 {
            debug!(dropped, kept = kept.len(), ?duplicate_counts, "Removed repeated sentences");
        }

        let mut joined = kept.join(". ");
        if !joined.ends_with(['.', '!', '?']) {
            joined.push('.');
        }

        RepetitionReport {
            text: joined,
            kept: kept.len(),
            dropped,
            duplicate_counts,
        }
    }
}

/// Remove near-duplicate sentences with the default thresholds
pub fn reduce_repetition(generated_text: &str) -> String {
    RepetitionReducer::new().reduce(generated_text)
}
