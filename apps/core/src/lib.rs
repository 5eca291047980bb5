//! AgriBot core: language routing and response hygiene for the farming chat assistant.
//!
//! The [`brain`] module holds the pure text functions (language classification,
//! instruction scrubbing, repetition removal). The [`actors`] module wires them
//! around a text-generation backend and a session store.

pub mod actors;
pub mod brain;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod telemetry;

pub use brain::{classify_language, reduce_repetition, scrub_instructions, LanguageTag};
pub use config::AppConfig;
pub use error::AppError;

#[cfg(test)]
mod tests;
