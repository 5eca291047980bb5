//! Instruction-Leakage Scrubbing for generated responses.
//!
//! Removes parenthetical meta-commentary and prompt scaffolding that a model
//! sometimes echoes back ("(Please respond in Hindi)", "CRITICAL LANGUAGE
//! MATCHING:") and then normalizes the whitespace and periods left behind.

use regex::Regex;
use std::sync::LazyLock;
use tracing::trace;

// NOTE: expect() on static regexes only fails on a typo in the pattern itself
static TARGETED_PARENTHETICALS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)\(\s*(?:please\s+)?(?:respond|reply|answer|write|speak)\s+(?:only\s+)?in\s+[^()]*\)")
            .expect("Invalid regex: respond-in parenthetical"),
        Regex::new(r"(?i)\(\s*(?:note|translation|translated|language|in\s+(?:hindi|english|hinglish)|hindi|english|hinglish)\b[^()]*\)")
            .expect("Invalid regex: language note parenthetical"),
        Regex::new(r"(?i)\(\s*(?:as\s+per|following|according\s+to|based\s+on)\s+(?:the\s+|your\s+|my\s+)?(?:instructions?|guidelines?|rules?|system\s+prompt)[^()]*\)")
            .expect("Invalid regex: as-per-instructions parenthetical"),
        Regex::new(r"(?i)\(\s*(?:mix(?:ing)?\s+hindi\s+and\s+english|using\s+hinglish)[^()]*\)")
            .expect("Invalid regex: mixing parenthetical"),
    ]
});

static LEAKED_PHRASES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)critical\s+language\s+(?:matching|restrictions?)\s*:?")
            .expect("Invalid regex: critical language header"),
        Regex::new(r"(?i)think\s+step\s+by\s+step\s+and\s+provide\s+a\s+helpful,?\s+detailed\s+response\s+in\s+the\s+matching\s+language\s+style\s*:?")
            .expect("Invalid regex: step-by-step reminder"),
        Regex::new(r"(?i)\bthe\s+user\s+only\s+greeted\s+you\b\.?")
            .expect("Invalid regex: greeting note"),
        Regex::new(r"(?i)\bgreet\s+them\s+back\s+briefly\b[^.\n]*\.?")
            .expect("Invalid regex: greet-back note"),
        Regex::new(r"(?i)\b(?:i\s+will|i'll|let\s+me)\s+(?:respond|reply|answer)\s+in\s+(?:hindi|english|hinglish)\b[^.!?\n]*[.!?:]?")
            .expect("Invalid regex: announced response language"),
        Regex::new(r"(?i)\b(?:responding|replying)\s+in\s+(?:hindi|english|hinglish)(?:\s+as\s+(?:requested|instructed))?\s*[.:!]?")
            .expect("Invalid regex: responding-in phrase"),
        Regex::new(r"(?i)\b(?:detected\s+)?language\s+style\s*:\s*(?:pure\s+)?(?:hindi|english|hinglish|en|hi)\b\.?")
            .expect("Invalid regex: language style label"),
        Regex::new(r"(?im)^[ \t]*(?:assistant|agribot)[ \t]*:[ \t]*")
            .expect("Invalid regex: role prefix"),
    ]
});

static ANY_PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^()]*\)").expect("Invalid regex: parenthetical span"));

static HORIZONTAL_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\S\n]+").expect("Invalid regex: horizontal whitespace"));

static TRAILING_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" +\n").expect("Invalid regex: trailing space"));

static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("Invalid regex: blank lines"));

static REPEATED_PERIODS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.{2,}").expect("Invalid regex: repeated periods"));

static SPACE_BEFORE_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" +([.,])").expect("Invalid regex: space before punctuation"));

/// Pattern-based remover of leaked instructions
pub struct InstructionScrubber {
    targeted: &'static [Regex],
    leaked: &'static [Regex],
}

impl Default for InstructionScrubber {
    fn default() -> Self {
        Self::new()
    }
}

impl InstructionScrubber {
    /// Create a scrubber over the built-in pattern tables
    pub fn new() -> Self {
        Self {
            targeted: TARGETED_PARENTHETICALS.as_slice(),
            leaked: LEAKED_PHRASES.as_slice(),
        }
    }

    /// Scrub until the text stops changing, so a second call is a no-op
    pub fn scrub(&self, text: &str) -> String {
        // Terminates: a pass that changes the text either shortens it or only
        // rewrites whitespace runs to single spaces
        let mut current = text.to_string();
        let mut passes = 1;
        loop {
            let next = self.scrub_once(&current);
            if next == current {
                break;
            }
            current = next;
            passes += 1;
        }
        trace!(passes, "Scrub reached a fixed point");
        current
    }

    fn scrub_once(&self, text: &str) -> String {
        let mut out = text.to_string();

        for pattern in self.targeted.iter().chain(self.leaked) {
            if pattern.is_match(&out) {
                trace!(pattern = pattern.as_str(), "Removing leaked instruction");
                out = pattern.replace_all(&out, "").into_owned();
            }
        }

        // Innermost spans first; nested parentheses need several rounds
        while ANY_PARENTHETICAL.is_match(&out) {
            out = ANY_PARENTHETICAL.replace_all(&out, "").into_owned();
        }

        normalize(&out)
    }
}

fn normalize(text: &str) -> String {
    let out = HORIZONTAL_SPACE.replace_all(text, " ");
    let out = TRAILING_SPACE.replace_all(&out, "\n");
    let out = BLANK_LINES.replace_all(&out, "\n\n");
    let out = REPEATED_PERIODS.replace_all(&out, ".");
    let out = SPACE_BEFORE_PUNCT.replace_all(&out, "$1");
    out.trim().to_string()
}

/// Strip leaked instructions from generated text
pub fn scrub_instructions(generated_text: &str) -> String {
    InstructionScrubber::new().scrub(generated_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_language_instruction() {
        let result = scrub_instructions("(Please respond in Hindi) Wheat grows best in loamy soil.");
        assert_eq!(result, "Wheat grows best in loamy soil.");
    }

    #[test]
    fn test_removes_leaked_prompt_header() {
        let result = scrub_instructions(
            "CRITICAL LANGUAGE MATCHING: Corn ek important crop hai. Iski farming ke liye proper soil chahiye.",
        );
        assert_eq!(
            result,
            "Corn ek important crop hai. Iski farming ke liye proper soil chahiye."
        );
    }

    #[test]
    fn test_removes_announced_language() {
        let result = scrub_instructions("I will respond in Hinglish as instructed. Rice ko paani chahiye.");
        assert_eq!(result, "Rice ko paani chahiye.");
    }

    #[test]
    fn test_catch_all_removes_remaining_parentheticals() {
        let result = scrub_instructions("Wheat needs nitrogen (N), phosphorus (P) and potassium (K).");
        assert_eq!(result, "Wheat needs nitrogen, phosphorus and potassium.");
    }

    #[test]
    fn test_nested_parentheticals() {
        let result = scrub_instructions("(note (internal) hidden) Sow after the first rain.");
        assert_eq!(result, "Sow after the first rain.");
    }

    #[test]
    fn test_whitespace_and_periods_normalized() {
        let result = scrub_instructions("Water   daily .. \n\n\n\nMulch  helps...");
        assert_eq!(result, "Water daily.\n\nMulch helps.");
    }

    #[test]
    fn test_keeps_markdown_lines() {
        let text = "## Tips\n- Use **compost**\n- Rotate crops";
        assert_eq!(scrub_instructions(text), text);
    }

    #[test]
    fn test_no_match_is_noop() {
        assert_eq!(scrub_instructions("Tomatoes like sun."), "Tomatoes like sun.");
        assert_eq!(scrub_instructions(""), "");
    }

    #[test]
    fn test_deeply_nested_header_is_fully_removed() {
        let mut header = String::new();
        for _ in 0..10 {
            header = format!("CRITICAL LANGUAGE MAT{}CHING:", header);
        }
        let input = format!("{} Wheat grows well.", header);

        let once = scrub_instructions(&input);
        assert_eq!(once, "Wheat grows well.");
        assert_eq!(scrub_instructions(&once), once);
    }

    #[test]
    fn test_removes_echoed_greeting_note() {
        let result = scrub_instructions(
            "The user only greeted you. Greet them back briefly in the same language and ask how you can help with their farm. Namaste!",
        );
        assert_eq!(result, "Namaste!");
    }

    #[test]
    fn test_idempotent() {
        let mut nested = String::new();
        for _ in 0..10 {
            nested = format!("CRITICAL LANGUAGE MAT{}CHING:", nested);
        }
        nested.push_str(" Wheat grows well.");

        let inputs = [
            "(Please respond in Hindi) Wheat grows best in loamy soil.",
            "a. (x). b",
            "((deep) nesting) text (note: this) here .  .",
            "think step by (x) step and provide a helpful, detailed response in the matching language style: ok",
            "Assistant: Hello (Translation: hi)\n\n\n\nBye ...",
            nested.as_str(),
        ];
        for input in inputs {
            let once = scrub_instructions(input);
            assert_eq!(scrub_instructions(&once), once, "not idempotent for '{}'", input);
        }
    }
}
