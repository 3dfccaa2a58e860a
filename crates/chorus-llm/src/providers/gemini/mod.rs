//! Gemini - Google generateContent adapter

/// Adapter implementation
pub mod provider;
/// API types and configuration
pub mod types;

#[cfg(test)]
mod tests;

pub use provider::GeminiAdapter;
pub use types::{GeminiConfig, DEFAULT_MODEL, MODELS};
