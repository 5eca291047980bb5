//! Prompt Templates keyed by detected language.

use super::context_packet::LanguageTag;

/// Base instructions for the farming assistant, shared by every language
const BASE_SYSTEM_PROMPT: &str = "You are AgriBot, a farming assistant for an agricultural marketplace. \
You help farmers with crop information, farming techniques, market prices, buying and selling crops, \
and agricultural best practices.

Language rules:
- Only ever answer in Hindi, English or Hinglish (Hindi and English mixed).
- Match the language style of the user's question.
- For any other language, answer in English.

Accuracy rules:
- Never invent specific prices, dates, crop varieties, locations or seller names.
- For current market prices, point the user to the Market Updates page.
- Say \"I don't have current data on this\" instead of guessing.
- Use words like \"typically\" and \"generally\" for general agricultural knowledge.

Answering:
- Give detailed, practical answers to farming questions; never refuse them.
- Use Markdown: headers, **bold**, numbered steps, bullet lists and tables for comparisons.
- Selling crops happens on the Sell Crops page, buying on the Buy Crops page.
- Be friendly and encouraging; emojis like 🌱 🌾 are welcome.";

const ENGLISH_INSTRUCTION: &str =
    "The user is writing in English. Respond in clear, simple English.";

const HINDI_INSTRUCTION: &str = "The user is writing in Hindi. Respond in Hindi using Devanagari \
script; technical farming terms may stay in English.";

const HINGLISH_INSTRUCTION: &str = "The user is writing in Hinglish. Respond in Hinglish: use English \
for technical farming terms (corn, wheat, soil, irrigation, fertilizer) and Hindi for the \
conversational parts (ke baare mein, kaise, kya, hai). Example: \"Corn ek important crop hai. \
Iski farming ke liye proper soil preparation chahiye.\"";

const GREETING_NOTE: &str =
    "The user only greeted you. Greet them back briefly in the same language and ask how you can help with their farm.";

/// Closing reminder appended to every user turn
const USER_REMINDER: &str =
    "Think step by step and provide a helpful, detailed response in the matching language style:";

/// Source of the instructions sent alongside a user message
pub trait PromptProvider: Send + Sync {
    /// Full system prompt for a detected language
    fn system_prompt(&self, language: LanguageTag) -> String;

    /// User turn as sent to the model
    fn user_prompt(&self, message: &str, language: LanguageTag, greeting_only: bool) -> String;
}

/// Built-in AgriBot prompts
#[derive(Debug, Clone, Default)]
pub struct DefaultPrompts;

impl DefaultPrompts {
    /// Language-specific instruction appended to the base prompt
    pub fn language_instruction(language: LanguageTag) -> &'static str {
        match language {
            LanguageTag::English => ENGLISH_INSTRUCTION,
            LanguageTag::Hindi => HINDI_INSTRUCTION,
            LanguageTag::Hinglish => HINGLISH_INSTRUCTION,
        }
    }
}

impl PromptProvider for DefaultPrompts {
    fn system_prompt(&self, language: LanguageTag) -> String {
        format!(
            "{}\n\n{}",
            BASE_SYSTEM_PROMPT,
            Self::language_instruction(language)
        )
    }

    fn user_prompt(&self, message: &str, language: LanguageTag, greeting_only: bool) -> String {
        let mut parts = vec![message.trim().to_string()];
        if greeting_only {
            parts.push(GREETING_NOTE.to_string());
        }
        parts.push(format!("Detected language style: {}.", language));
        parts.push(USER_REMINDER.to_string());
        parts.join("\n\n")
    }
}
