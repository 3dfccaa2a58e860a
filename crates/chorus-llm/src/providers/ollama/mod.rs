//! Ollama - local daemon adapter
//!
//! No credential. Reachability is the configuration check: `/api/tags` must
//! answer 200 within the liveness timeout.

/// Adapter implementation
pub mod provider;
/// API types and configuration
pub mod types;


pub use provider::OllamaAdapter;
pub use types::{OllamaConfig, DEFAULT_BASE_URL, DEFAULT_MODEL, SUGGESTED_MODELS};
