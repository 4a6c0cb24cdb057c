//! Cleaning strategy engine.
//!
//! Three interchangeable strategies turn a parsed [`ChatInfo`] into cleaned
//! text, each parameterized by a fidelity [`Level`]:
//!
//! - [`PrivacyCleaner`] — protects participant identity while preserving
//!   analyzable content (pseudonymized ids at levels 1–2);
//! - [`SizeCleaner`] — minimizes output bytes while keeping signal;
//! - [`ContextCleaner`] — preserves conversational structure (reply chains
//!   and threaded trees).
//!
//! # Example
//!
//! ```
//! use chatscrub::{clean, Approach, ChatInfo, Level, Message, MessageKind};
//!
//! let chat = ChatInfo::new(
//!     "Demo",
//!     "personal_chat",
//!     "1",
//!     vec![Message::new(1, MessageKind::Message)
//!         .with_from_user("Alice")
//!         .with_text("hi")],
//!     "demo.json",
//! );
//! let output = clean(&chat, Approach::Privacy, Level::One);
//! assert!(output.contains("Alice: hi"));
//! ```
//!
//! Selection by raw strings goes through [`Cleaner::from_parts`], which
//! validates approach and level before any data is touched.

mod context;
mod format;
mod privacy;
mod replies;
mod size;

pub use context::ContextCleaner;
pub use privacy::PrivacyCleaner;
pub use size::SizeCleaner;

use serde::{Deserialize, Serialize};

use crate::error::{ChatscrubError, Result};
use crate::ChatInfo;

/// The three cleaning strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Approach {
    Privacy,
    Size,
    Context,
}

impl Approach {
    /// All valid approach names.
    pub fn all_names() -> &'static [&'static str] {
        &["privacy", "size", "context"]
    }
}

impl std::fmt::Display for Approach {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Approach::Privacy => write!(f, "privacy"),
            Approach::Size => write!(f, "size"),
            Approach::Context => write!(f, "context"),
        }
    }
}

impl std::str::FromStr for Approach {
    type Err = ChatscrubError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "privacy" => Ok(Approach::Privacy),
            "size" => Ok(Approach::Size),
            "context" => Ok(Approach::Context),
            _ => Err(ChatscrubError::unknown_approach(s)),
        }
    }
}

/// Cleaning fidelity, 1 through 3. Higher levels include more structure and
/// metadata; what each level adds is strategy-specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    One,
    Two,
    Three,
}

impl Level {
    pub fn as_u8(self) -> u8 {
        match self {
            Level::One => 1,
            Level::Two => 2,
            Level::Three => 3,
        }
    }
}

impl TryFrom<u8> for Level {
    type Error = ChatscrubError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Level::One),
            2 => Ok(Level::Two),
            3 => Ok(Level::Three),
            _ => Err(ChatscrubError::invalid_level(value)),
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

impl std::str::FromStr for Level {
    type Err = ChatscrubError;

    fn from_str(s: &str) -> Result<Self> {
        let value: u8 = s
            .trim()
            .parse()
            .map_err(|_| ChatscrubError::invalid_level(0))?;
        Level::try_from(value)
    }
}

/// A configured cleaning strategy instance.
///
/// A closed set of variants behind one `clean` entry point; the external
/// selection contract stays "approach name + level" via [`Cleaner::from_parts`].
/// The privacy variant owns its session-scoped anonymization map, so `clean`
/// takes `&mut self`; instances are cheap and meant to live for one pass.
#[derive(Debug)]
pub enum Cleaner {
    Privacy(PrivacyCleaner),
    Size(SizeCleaner),
    Context(ContextCleaner),
}

impl Cleaner {
    /// Creates a cleaner from already-validated selection parameters.
    pub fn new(approach: Approach, level: Level) -> Self {
        match approach {
            Approach::Privacy => Cleaner::Privacy(PrivacyCleaner::new(level)),
            Approach::Size => Cleaner::Size(SizeCleaner::new(level)),
            Approach::Context => Cleaner::Context(ContextCleaner::new(level)),
        }
    }

    /// Creates a cleaner from raw selection parameters.
    ///
    /// Fails fast on an unknown approach name or out-of-range level, before
    /// any chat data is processed.
    pub fn from_parts(approach: &str, level: u8) -> Result<Self> {
        let approach: Approach = approach.parse()?;
        let level = Level::try_from(level)?;
        Ok(Self::new(approach, level))
    }

    pub fn approach(&self) -> Approach {
        match self {
            Cleaner::Privacy(_) => Approach::Privacy,
            Cleaner::Size(_) => Approach::Size,
            Cleaner::Context(_) => Approach::Context,
        }
    }

    pub fn level(&self) -> Level {
        match self {
            Cleaner::Privacy(c) => c.level(),
            Cleaner::Size(c) => c.level(),
            Cleaner::Context(c) => c.level(),
        }
    }

    /// Produces the cleaned text representation of one chat.
    pub fn clean(&mut self, chat: &ChatInfo) -> String {
        match self {
            Cleaner::Privacy(c) => c.clean(chat),
            Cleaner::Size(c) => c.clean(chat),
            Cleaner::Context(c) => c.clean(chat),
        }
    }
}

/// One-shot convenience: clean `chat` with a fresh strategy instance.
pub fn clean(chat: &ChatInfo, approach: Approach, level: Level) -> String {
    Cleaner::new(approach, level).clean(chat)
}
