//! Anthropic - Claude messages API adapter
//!
//! This module implements the Claude adapter using reqwest.

/// Adapter implementation
pub mod provider;
/// API types and configuration
pub mod types;


pub use provider::AnthropicAdapter;
pub use types::{AnthropicConfig, DEFAULT_MODEL, MODELS};
