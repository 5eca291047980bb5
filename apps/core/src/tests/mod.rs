//! Test Module
//!
//! Cross-module tests for the AgriBot core.
//!
//! ## Test Categories
//! - `brain_tests`: Language classification, scrubbing and repetition removal end to end
//! - `session_tests`: History caps and LRU eviction of the session store
//! - `supervisor_tests`: Chat turns through the supervisor actor

pub mod session_tests;
pub mod supervisor_tests;
