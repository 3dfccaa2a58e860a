//! Token estimation
//!
//! Two explicit paths: models with a known BPE encoding are counted exactly
//! with tiktoken, everything else is approximated at four characters per
//! token. The estimate only feeds the informational cost display.

use std::sync::LazyLock;
use tiktoken_rs::{cl100k_base, o200k_base, CoreBPE};

/// Characters per token for the ratio approximation
pub const CHARS_PER_TOKEN: usize = 4;

// `None` when the encoding failed to load; callers then use the ratio path.
static CL100K: LazyLock<Option<CoreBPE>> = LazyLock::new(|| cl100k_base().ok());
static O200K: LazyLock<Option<CoreBPE>> = LazyLock::new(|| o200k_base().ok());

/// Exact encodings available for a model family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// GPT-3.5 / GPT-4 / GPT-4 Turbo
    Cl100kBase,
    /// GPT-4o and later
    O200kBase,
}

impl Encoding {
    /// Encoding for a model, if its family has an exact tokenizer
    #[must_use]
    pub fn for_model(model: &str) -> Option<Self> {
        let model = model.to_ascii_lowercase();
        if !model.starts_with("gpt") {
            return None;
        }
        if model.starts_with("gpt-4o") || model.starts_with("gpt-4.1") || model.starts_with("gpt-5")
        {
            Some(Self::O200kBase)
        } else {
            Some(Self::Cl100kBase)
        }
    }

    fn bpe(self) -> Option<&'static CoreBPE> {
        match self {
            Self::Cl100kBase => CL100K.as_ref(),
            Self::O200kBase => O200K.as_ref(),
        }
    }
}

/// Load the exact encoding for `model` now rather than on first use.
///
/// Building a BPE table takes long enough to stall an async worker, so
/// callers that estimate inside a hot path load it up front. No-op for
/// models on the ratio path.
pub fn preload(model: &str) {
    if let Some(encoding) = Encoding::for_model(model) {
        let _ = encoding.bpe();
    }
}

/// Approximate token count from character length
#[must_use]
pub fn approximate_tokens(text: &str) -> u64 {
    (text.chars().count() / CHARS_PER_TOKEN) as u64
}

/// Estimate the token count of `text` for `model`.
///
/// Never fails: models without an exact tokenizer, or whose encoding could
/// not be loaded, use [`approximate_tokens`].
#[must_use]
pub fn estimate_tokens(text: &str, model: &str) -> u64 {
    match Encoding::for_model(model).and_then(Encoding::bpe) {
        Some(bpe) => bpe.encode_with_special_tokens(text).len() as u64,
        None => approximate_tokens(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_selection() {
        assert_eq!(Encoding::for_model("gpt-4o-mini"), Some(Encoding::O200kBase));
        assert_eq!(Encoding::for_model("gpt-4o"), Some(Encoding::O200kBase));
        assert_eq!(Encoding::for_model("gpt-4-turbo"), Some(Encoding::Cl100kBase));
        assert_eq!(Encoding::for_model("gpt-3.5-turbo"), Some(Encoding::Cl100kBase));
        assert_eq!(Encoding::for_model("claude-3-5-sonnet-20241022"), None);
        assert_eq!(Encoding::for_model("llama3.2"), None);
    }

    #[test]
    fn test_ratio_path_for_other_families() {
        let text = "a".repeat(400);
        assert_eq!(estimate_tokens(&text, "claude-3-5-haiku-20241022"), 100);
        assert_eq!(estimate_tokens(&text, "gemini-1.5-pro"), 100);
        assert_eq!(estimate_tokens("abc", "llama3.2"), 0);
    }

    #[test]
    fn test_ratio_counts_chars_not_bytes() {
        // 8 chars, 16 bytes
        assert_eq!(approximate_tokens("éééééééé"), 2);
    }

    #[test]
    fn test_preload_then_estimate_is_fast() {
        preload("gpt-4o-mini");
        preload("llama3.2");

        let start = std::time::Instant::now();
        assert!(estimate_tokens("hello", "gpt-4o-mini") > 0);
        assert!(start.elapsed() < std::time::Duration::from_millis(100));
    }

    #[test]
    fn test_exact_path_for_gpt() {
        let tokens = estimate_tokens("Hello, world!", "gpt-4o-mini");
        assert!(tokens > 0);
        assert!(tokens < 10);

        assert_eq!(estimate_tokens("", "gpt-3.5-turbo"), 0);
    }
}
