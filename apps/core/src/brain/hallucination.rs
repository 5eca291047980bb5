//! Hallucination Guard.
//!
//! Flags specific rupee prices and calendar dates that the model was told not
//! to invent. Only reports; the response text is never altered.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

const MONTHS: &str =
    "January|February|March|April|May|June|July|August|September|October|November|December";

static PRICE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"₹\s*\d{1,3}(?:,\d{3})*(?:\s*-\s*₹\s*\d{1,3}(?:,\d{3})*)?")
        .expect("Invalid regex: rupee price")
});

static DATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(&format!(r"(?i)\b(?:{})\s+\d{{1,2}}\b", MONTHS))
            .expect("Invalid regex: month-day date"),
        Regex::new(&format!(r"(?i)\b\d{{1,2}}\s+(?:{})\b", MONTHS))
            .expect("Invalid regex: day-month date"),
    ]
});

/// Words that mark a price as illustrative
const PRICE_HEDGES: &[&str] = &["example", "general", "typically"];

/// Words that mark a date as illustrative
const DATE_HEDGES: &[&str] = &["example", "typically"];

pub const PRICE_WARNING: &str =
    "Response contains specific prices - ensure they are labeled as examples or general ranges";
pub const DATE_WARNING: &str = "Response contains specific dates - ensure they are contextual";

/// Result of a hallucination check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HallucinationReport {
    pub is_valid: bool,
    pub warnings: Vec<String>,
}

/// Checks generated text for unhedged prices and dates
#[derive(Default)]
pub struct HallucinationGuard;

impl HallucinationGuard {
    pub fn new() -> Self {
        Self
    }

    pub fn check(&self, text: &str) -> HallucinationReport {
        let lower = text.to_lowercase();
        let hedged = |hedges: &[&str]| hedges.iter().any(|h| lower.contains(h));
        let mut warnings = Vec::new();

        if PRICE_PATTERN.is_match(text) && !hedged(PRICE_HEDGES) {
            warnings.push(PRICE_WARNING.to_string());
        }

        if DATE_PATTERNS.iter().any(|p| p.is_match(text)) && !hedged(DATE_HEDGES) {
            warnings.push(DATE_WARNING.to_string());
        }

        HallucinationReport {
            is_valid: warnings.is_empty(),
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unhedged_price_flagged() {
        let report = HallucinationGuard::new().check("Wheat sells for ₹1,500 - ₹2,000 per quintal.");
        assert!(!report.is_valid);
        assert_eq!(report.warnings, vec![PRICE_WARNING.to_string()]);
    }

    #[test]
    fn test_hedged_price_allowed() {
        let report = HallucinationGuard::new()
            .check("Example prices: wheat typically sells around ₹2,000 per quintal.");
        assert!(report.is_valid);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_specific_dates_flagged() {
        let guard = HallucinationGuard::new();

        assert!(!guard.check("Sow before March 15 for best yield.").is_valid);
        assert!(!guard.check("The mandi opens on 3 july.").is_valid);
        assert!(guard.check("Sowing is typically done by March 15.").is_valid);
    }

    #[test]
    fn test_clean_text() {
        let report = HallucinationGuard::new()
            .check("Check the Market Updates page for current prices in your area.");
        assert_eq!(
            report,
            HallucinationReport {
                is_valid: true,
                warnings: vec![]
            }
        );
    }
}
