//! Chorus Core - dispatch and session accounting
//!
//! This crate ties the vendor adapters together:
//! - Dispatch: fan one prompt out to every configured-and-reachable adapter
//! - Session: explicit per-user context holding the usage ledger,
//!   transcript and interaction log
//! - Transcript: in-memory conversation history with Markdown/JSON export

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod dispatch;
pub mod error;
pub mod session;
pub mod transcript;

pub use dispatch::{DispatchConfig, DispatchReport, DispatchResult, Dispatcher};
pub use error::{format_error_for_cli, Error, Result, UserFriendlyError};
pub use session::{Interaction, Session, SessionStats};
pub use transcript::{Transcript, TranscriptEntry};
