//! Common utilities for vendor adapters
//!
//! Key masking and error sanitizing shared by every adapter.

/// Keys this short are hidden entirely
const SHORT_KEY_LEN: usize = 8;

/// Characters kept visible at each end of a longer key
const VISIBLE_EDGE: usize = 4;

/// Longest vendor message kept in a failure reason
const MAX_ERROR_LEN: usize = 300;

/// Message fragments and the generic reason that replaces the whole message.
/// The first matching group wins.
const REDACTIONS: &[(&[&str], &str)] = &[
    (
        &[
            "api key",
            "api_key",
            "apikey",
            "x-api-key",
            "invalid key",
            "unauthorized",
            "authentication",
            "permission denied",
        ],
        "API authentication error. Please check your API key configuration.",
    ),
    (
        &["rate limit", "quota", "overloaded", "too many requests"],
        "API rate limit exceeded. Please try again later.",
    ),
    (
        &["internal", "server error"],
        "API server error. Please try again later.",
    ),
];

/// Hide a credential for display: `sk-1...ghij`, or `****` for short keys.
///
/// ```
/// use chorus_llm::util::mask_api_key;
/// assert_eq!(mask_api_key("sk-ant-0123456789"), "sk-a...6789");
/// assert_eq!(mask_api_key("tiny"), "****");
/// ```
#[must_use]
pub fn mask_api_key(key: &str) -> String {
    match (key.get(..VISIBLE_EDGE), key.len().checked_sub(VISIBLE_EDGE)) {
        (Some(head), Some(tail_start)) if key.len() > SHORT_KEY_LEN && key.is_ascii() => {
            format!("{head}...{}", &key[tail_start..])
        }
        _ => "****".to_string(),
    }
}

/// Truncate to at most `max_bytes`, backing off to a char boundary
#[must_use]
pub fn truncate_safe(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Sanitize a vendor error message before it is embedded in a failure reason
///
/// Authentication, rate-limit and server-side failures collapse to generic
/// messages so that echoed keys or headers never reach the caller. Anything
/// else is kept for diagnostics, truncated to 300 bytes.
#[must_use]
pub fn sanitize_api_error(error: &str) -> String {
    let lower = error.to_lowercase();

    if let Some((_, generic)) = REDACTIONS
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| lower.contains(n)))
    {
        return (*generic).to_string();
    }

    if error.len() > MAX_ERROR_LEN {
        format!("{}...(truncated)", truncate_safe(error, MAX_ERROR_LEN))
    } else {
        error.to_string()
    }
}
