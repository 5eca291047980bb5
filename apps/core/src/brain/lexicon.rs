//! Greeting Lexicon.
//!
//! Frozen greeting and farewell phrases for English, transliterated Hindi and
//! Hinglish, plus the romanized Hindi function words that mark Latin-script
//! text as Hinglish. The three greeting sets are disjoint.

use std::collections::HashSet;
use std::sync::LazyLock;

use super::context_packet::LanguageTag;

/// English greetings and farewells
const GREETINGS_EN: &[&str] = &[
    "hello",
    "hi",
    "hey",
    "hiya",
    "howdy",
    "greetings",
    "good morning",
    "good afternoon",
    "good evening",
    "good night",
    "good day",
    "how are you",
    "how are you doing",
    "whats up",
    "nice to meet you",
    "bye",
    "goodbye",
    "see you",
    "see you later",
    "take care",
    "thanks",
    "thank you",
    "thank you so much",
];

/// Hindi greetings, transliterated and in Devanagari
const GREETINGS_HI: &[&str] = &[
    "namaste",
    "namaskar",
    "namaskaar",
    "pranam",
    "pranaam",
    "ram ram",
    "radhe radhe",
    "jai shri ram",
    "jai shri krishna",
    "suprabhat",
    "shubh prabhat",
    "shubh sandhya",
    "shubh ratri",
    "dhanyavad",
    "dhanyawad",
    "shukriya",
    "alvida",
    "phir milenge",
    "aap kaise hain",
    "नमस्ते",
    "नमस्कार",
    "प्रणाम",
    "राम राम",
    "शुभ प्रभात",
    "शुभ रात्रि",
    "धन्यवाद",
    "अलविदा",
];

/// Hinglish greetings mixing English and Hindi words
const GREETINGS_HINGLISH: &[&str] = &[
    "hi bhai",
    "hey bhai",
    "hello bhai",
    "hello ji",
    "hi ji",
    "hello sir ji",
    "good morning ji",
    "good morning bhai",
    "thanks bhai",
    "thank you ji",
    "bye bhai",
    "ok ji",
    "kya haal hai",
    "kya haal",
    "kaise ho",
    "kaise ho bhai",
    "kya chal raha hai",
    "sab badhiya",
    "bhai",
    "bhaiya",
    "ji",
    "haan ji",
];

/// Hindi words written in Latin script that do not occur in English text
const ROMANIZED_HINDI_MARKERS: &[&str] = &[
    "mein", "hai", "hain", "kya", "kyu", "kyun", "kyon", "kaise", "kaisa", "kaisi", "kahan",
    "kaun", "konsa", "kaunsa", "kitna", "kitni", "kitne", "batao", "bataye", "bataiye", "btao",
    "karein", "karna", "karo", "liye", "nahi", "nahin", "haan", "chahiye", "wala", "wali",
    "baare", "mujhe", "accha", "acha", "theek", "sakta", "sakte", "hota", "hoti", "hote", "raha",
    "rahi", "rahe", "khet", "fasal", "beej", "khad", "paani", "mitti", "kisan", "mandi", "bhav",
    "ugaye", "ugana", "ugayein", "boyein", "boye", "buvai", "sinchai", "kheti",
];

/// Short Hindi words that collide with English words, names or abbreviations.
/// One alone is not enough to call a message Hinglish.
const WEAK_HINDI_MARKERS: &[&str] = &[
    "ke", "ki", "ka", "ko", "se", "hum", "tum", "aap", "woh", "yeh", "tha", "thi", "kab", "aur",
    "bhi", "kare", "karen", "gaya",
];

/// Weak markers needed when no strong marker is present
const MIN_WEAK_MARKERS: usize = 2;

/// The process-wide lexicon, built on first use
static LEXICON: LazyLock<GreetingLexicon> = LazyLock::new(GreetingLexicon::new);

/// Membership tables for greeting phrases and marker words
pub struct GreetingLexicon {
    english: HashSet<&'static str>,
    hindi: HashSet<&'static str>,
    hinglish: HashSet<&'static str>,
    /// Every word that appears inside any greeting phrase
    components: HashSet<&'static str>,
    hindi_markers: HashSet<&'static str>,
    weak_hindi_markers: HashSet<&'static str>,
}

impl GreetingLexicon {
    fn new() -> Self {
        let english: HashSet<&'static str> = GREETINGS_EN.iter().copied().collect();
        let hindi: HashSet<&'static str> = GREETINGS_HI.iter().copied().collect();
        let hinglish: HashSet<&'static str> = GREETINGS_HINGLISH.iter().copied().collect();

        let components = GREETINGS_EN
            .iter()
            .chain(GREETINGS_HI)
            .chain(GREETINGS_HINGLISH)
            .copied()
            .flat_map(str::split_whitespace)
            .collect();

        Self {
            english,
            hindi,
            hinglish,
            components,
            hindi_markers: ROMANIZED_HINDI_MARKERS.iter().copied().collect(),
            weak_hindi_markers: WEAK_HINDI_MARKERS.iter().copied().collect(),
        }
    }

    /// Shared instance
    pub fn global() -> &'static GreetingLexicon {
        &LEXICON
    }

    /// Greeting set of one language
    pub fn set(&self, language: LanguageTag) -> &HashSet<&'static str> {
        match language {
            LanguageTag::English => &self.english,
            LanguageTag::Hindi => &self.hindi,
            LanguageTag::Hinglish => &self.hinglish,
        }
    }

    /// First language in priority order whose set holds `phrase` exactly
    pub fn phrase_language(&self, phrase: &str) -> Option<LanguageTag> {
        LanguageTag::PRIORITY
            .into_iter()
            .find(|lang| self.set(*lang).contains(phrase))
    }

    /// True if `word` is a greeting entry or a word inside one
    pub fn is_greeting_word(&self, word: &str) -> bool {
        self.components.contains(word) || self.phrase_language(word).is_some()
    }

    /// True if `word` is an unambiguous romanized Hindi word
    pub fn is_hindi_marker(&self, word: &str) -> bool {
        self.hindi_markers.contains(word)
    }

    /// True if `word` is a short Hindi word that English also uses
    pub fn is_weak_hindi_marker(&self, word: &str) -> bool {
        self.weak_hindi_markers.contains(word)
    }

    /// Latin-script words read as Hinglish: one strong marker, or two distinct weak ones
    pub fn marks_hinglish(&self, words: &[&str]) -> bool {
        if words.iter().any(|w| self.is_hindi_marker(w)) {
            return true;
        }
        let weak: HashSet<&str> = words
            .iter()
            .copied()
            .filter(|w| self.is_weak_hindi_marker(w))
            .collect();
        weak.len() >= MIN_WEAK_MARKERS
    }
}
