//! # Chatscrub
//!
//! A Rust library that turns Telegram chat exports into cleaned text
//! optimized for LLM analysis and vector embedding.
//!
//! ## Overview
//!
//! The pipeline has two stages:
//!
//! 1. **Parse** — [`parser::parse_file`] / [`parser::parse_bytes`] convert a
//!    raw export document into a [`ChatInfo`] of normalized [`Message`]
//!    records, recovering from legacy encodings and skipping malformed
//!    records instead of failing the whole file.
//! 2. **Clean** — a [`Cleaner`] renders the chat as text using one of three
//!    strategies ([`Approach`]), each at three fidelity levels ([`Level`]):
//!    - **privacy** — pseudonymizes stable user ids (session-scoped SHA-256
//!      mapping) while keeping content analyzable;
//!    - **size** — minimizes output bytes, dropping noise and collapsing
//!      metadata into compact tags;
//!    - **context** — reconstructs reply chains and threaded trees from the
//!      flat message list.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chatscrub::{clean, parser, Approach, Level};
//!
//! fn main() -> chatscrub::Result<()> {
//!     let chat = parser::parse_file("telegram_export.json")?;
//!     let text = clean(&chat, Approach::Privacy, Level::Two);
//!     println!("{text}");
//!     Ok(())
//! }
//! ```
//!
//! Selection by raw strings (for callers wired to configuration) validates
//! before any data is touched:
//!
//! ```rust
//! use chatscrub::Cleaner;
//!
//! assert!(Cleaner::from_parts("privacy", 2).is_ok());
//! assert!(Cleaner::from_parts("privacy", 7).is_err());
//! ```
//!
//! ## Module Structure
//!
//! - [`parser`] — export parsing ([`parser::parse_file`],
//!   [`parser::parse_bytes`], [`parser::parse_str`])
//! - [`clean`](mod@clean) — the strategy engine ([`Cleaner`], [`Approach`],
//!   [`Level`], the strategy types)
//! - [`message`] — the normalized model ([`Message`], [`MessageKind`],
//!   [`TextEntity`], [`Reaction`])
//! - [`chat`] — [`ChatInfo`], one parsed export
//! - [`error`] — [`ChatscrubError`] and [`Result`]
//!
//! Output formatting, storage, and LLM analysis are downstream consumers
//! outside this crate.

pub mod chat;
pub mod clean;
mod encoding;
pub mod error;
pub mod message;
pub mod parser;

// Re-export the main types at the crate root for convenience
pub use chat::ChatInfo;
pub use clean::{clean, Approach, Cleaner, ContextCleaner, Level, PrivacyCleaner, SizeCleaner};
pub use error::{ChatscrubError, Result};
pub use message::{Message, MessageKind, Reaction, ReactionActor, TextEntity};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use chatscrub::prelude::*;
/// ```
pub mod prelude {
    pub use crate::chat::ChatInfo;
    pub use crate::clean::{clean, Approach, Cleaner, Level};
    pub use crate::error::{ChatscrubError, Result};
    pub use crate::message::{Message, MessageKind, Reaction, TextEntity};
    pub use crate::parser::{parse_bytes, parse_file, parse_str};
}
