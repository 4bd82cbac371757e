//! Insight provider implementations

pub mod gemini_provider;
#[cfg(test)]
pub mod scripted;

pub use gemini_provider::{GeminiConfig, GeminiProvider};
