//! Adapter - uniform chat surface over vendor APIs
//!
//! Every vendor is reached through [`ChatAdapter`]: one `chat` call that
//! always produces a [`ChatOutcome`], and one `is_configured` check that
//! gates whether the adapter is attempted at all.
//!
//! # Module Structure
//!
//! - `outcome`: Tagged success/failure result and its sentinel string form
//! - `mock`: Scripted adapter for tests

mod mock;
mod outcome;

pub use mock::MockAdapter;
pub use outcome::{ChatOutcome, FAILURE_SENTINEL};

use crate::vendor::Vendor;

/// Trait for vendor adapters
///
/// Implementations must not panic or propagate faults out of `chat`:
/// transport, authentication and vendor-side errors are reported as
/// [`ChatOutcome::Failure`].
#[async_trait::async_trait]
pub trait ChatAdapter: Send + Sync {
    /// Vendor this adapter talks to
    fn vendor(&self) -> Vendor;

    /// Model identifier sent with every request
    fn model(&self) -> &str;

    /// Whether the adapter has enough credential / reachability to be attempted.
    ///
    /// Remote vendors only check for a credential. The local daemon performs a
    /// short liveness check and fails closed.
    async fn is_configured(&self) -> bool;

    /// Send one prompt, single attempt, no retries
    async fn chat(&self, prompt: &str) -> ChatOutcome;
}
