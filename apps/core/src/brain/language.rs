//! Language Classification for chat messages.
//!
//! Decides whether a message is English, Hindi or Hinglish. Short messages are
//! first checked against the greeting lexicon; everything else goes through
//! script detection on the message content with greetings trimmed off.
//! Pure function of the input and the static lexicon.

use tracing::debug;

use super::context_packet::{DetectionPath, LanguageTag};
use super::lexicon::GreetingLexicon;

/// Messages with at most this many words are checked as possible greetings
const MAX_GREETING_WORDS: usize = 4;

/// Words this short are ignored when matching single greeting words
const MIN_GREETING_WORD_CHARS: usize = 3;

/// Outcome of a classification, with the rule that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub language: LanguageTag,
    pub path: DetectionPath,
    /// Text the script detection ran on; empty for greeting paths
    pub detection_text: String,
}

impl Classification {
    fn new(language: LanguageTag, path: DetectionPath, detection_text: String) -> Self {
        Self {
            language,
            path,
            detection_text,
        }
    }
}

/// Rule-based English / Hindi / Hinglish classifier
pub struct LanguageClassifier {
    lexicon: &'static GreetingLexicon,
}

impl Default for LanguageClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageClassifier {
    /// Create a classifier over the shared greeting lexicon
    pub fn new() -> Self {
        Self {
            lexicon: GreetingLexicon::global(),
        }
    }

    /// Classify a message, returning only the language tag
    pub fn classify(&self, text: &str) -> LanguageTag {
        self.classify_detailed(text).language
    }

    /// Classify a message and report which rule decided it
    pub fn classify_detailed(&self, text: &str) -> Classification {
        if text.trim().is_empty() {
            return Classification::new(LanguageTag::English, DetectionPath::Empty, String::new());
        }

        let cleaned = strip_punctuation(text);
        let words: Vec<&str> = cleaned.split_whitespace().collect();

        if !words.is_empty() && words.len() <= MAX_GREETING_WORDS {
            if let Some(result) = self.classify_greeting(&words) {
                debug!(language = %result.language, path = ?result.path, "Greeting-only message");
                return result;
            }
        }

        let content = self.trim_greetings(&words);
        let detection_text = if content.is_empty() {
            text.to_string()
        } else {
            content.join(" ")
        };

        // Greeting words such as "kya" or "hai" still count as Hindi markers
        let language = self.detect_script(&detection_text, &words);
        debug!(%language, detection_text = %detection_text, "Script detection");

        Classification::new(language, DetectionPath::Script, detection_text)
    }

    /// Greeting phrase match, then per-word greeting match
    fn classify_greeting(&self, words: &[&str]) -> Option<Classification> {
        let phrase = words.join(" ");
        if let Some(language) = self.lexicon.phrase_language(&phrase) {
            return Some(Classification::new(
                language,
                DetectionPath::GreetingPhrase,
                String::new(),
            ));
        }

        let significant: Vec<&str> = words
            .iter()
            .copied()
            .filter(|w| w.chars().count() >= MIN_GREETING_WORD_CHARS)
            .collect();
        if significant.is_empty() {
            return None;
        }

        // Every significant word must be a greeting, in any language
        let matched: Vec<LanguageTag> = significant
            .iter()
            .map(|w| self.lexicon.phrase_language(w))
            .collect::<Option<Vec<_>>>()?;

        LanguageTag::PRIORITY
            .into_iter()
            .find(|lang| matched.contains(lang))
            .map(|language| {
                Classification::new(language, DetectionPath::GreetingWords, String::new())
            })
    }

    /// Drop greeting words from both ends of the message
    fn trim_greetings<'a>(&self, words: &'a [&'a str]) -> &'a [&'a str] {
        let is_content = |w: &&str| !self.lexicon.is_greeting_word(w);
        match (words.iter().position(is_content), words.iter().rposition(is_content)) {
            (Some(start), Some(end)) => &words[start..=end],
            _ => &[],
        }
    }

    /// Script of `text` decides; Latin-only text falls back to the marker words of the whole message
    fn detect_script(&self, text: &str, words: &[&str]) -> LanguageTag {
        let has_devanagari = text.chars().any(is_devanagari);
        let has_latin = text.chars().any(|c| c.is_ascii_alphabetic());

        match (has_devanagari, has_latin) {
            (true, true) => LanguageTag::Hinglish,
            (true, false) => LanguageTag::Hindi,
            (false, true) if self.lexicon.marks_hinglish(words) => LanguageTag::Hinglish,
            _ => LanguageTag::English,
        }
    }
}

/// True for code points in the Devanagari block (U+0900–U+097F)
pub fn is_devanagari(c: char) -> bool {
    ('\u{0900}'..='\u{097F}').contains(&c)
}

/// Lowercase and delete punctuation, keeping letters, digits, marks and spaces
fn strip_punctuation(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|&c| {
            let danda = matches!(c, '\u{0964}' | '\u{0965}');
            c.is_alphanumeric() || c == '_' || c.is_whitespace() || (is_devanagari(c) && !danda)
        })
        .collect()
}

/// Classify a chat message; absent or empty input is English
pub fn classify_language<'a>(message: impl Into<Option<&'a str>>) -> LanguageTag {
    match message.into() {
        Some(text) => LanguageClassifier::new().classify(text),
        None => LanguageTag::English,
    }
}
