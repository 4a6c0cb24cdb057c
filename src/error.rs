//! Unified error types for chatscrub.
//!
//! One [`ChatscrubError`] enum covers every failure the library can surface.
//!
//! # Error Handling Philosophy
//!
//! - **Fatal/structural** problems (missing file, empty file, invalid JSON,
//!   missing required export fields) are typed variants propagated to the
//!   caller; processing halts for that file.
//! - **Degraded/local** problems (one bad timestamp, one malformed entity,
//!   one unsupported record) never appear here — the parser skips the unit
//!   and logs a warning instead.
//! - **Configuration** problems (unknown approach, out-of-range level) are
//!   raised by the strategy factory before any data is touched.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for chatscrub operations.
pub type Result<T> = std::result::Result<T, ChatscrubError>;

/// The error type for all chatscrub operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatscrubError {
    /// An I/O error occurred, typically a missing or unreadable input file.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The decoded export text is not parseable JSON.
    #[error("Failed to parse Telegram export{}: {source}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    Parse {
        #[source]
        source: serde_json::Error,
        /// The file path, if available.
        path: Option<PathBuf>,
    },

    /// The JSON is valid but does not have the shape of a Telegram export.
    ///
    /// Raised when the top-level `name`, `type`, `id`, or `messages` fields
    /// are missing, or when `messages` is empty or its first entry has no id.
    #[error("Invalid Telegram export format: {message}")]
    InvalidFormat {
        /// Description of what's wrong.
        message: String,
    },

    /// The input was empty.
    #[error("Empty export: {origin}")]
    EmptyExport {
        /// Provenance of the empty input.
        origin: String,
    },

    /// The cleaning approach name is not one of privacy, size, context.
    #[error("Unknown cleaning approach: '{input}'. Expected one of: privacy, size, context")]
    UnknownApproach {
        /// The rejected approach name.
        input: String,
    },

    /// The cleaning level is outside 1..=3.
    #[error("Invalid cleaning level: {input}. Must be 1, 2, or 3")]
    InvalidLevel {
        /// The rejected level.
        input: u8,
    },
}

impl From<serde_json::Error> for ChatscrubError {
    fn from(err: serde_json::Error) -> Self {
        ChatscrubError::Parse {
            source: err,
            path: None,
        }
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatscrubError {
    /// Creates a parse error with an optional file path for context.
    pub fn parse(source: serde_json::Error, path: Option<PathBuf>) -> Self {
        ChatscrubError::Parse { source, path }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        ChatscrubError::InvalidFormat {
            message: message.into(),
        }
    }

    /// Creates an empty export error.
    pub fn empty_export(origin: impl Into<String>) -> Self {
        ChatscrubError::EmptyExport {
            origin: origin.into(),
        }
    }

    /// Creates an unknown approach error.
    pub fn unknown_approach(input: impl Into<String>) -> Self {
        ChatscrubError::UnknownApproach {
            input: input.into(),
        }
    }

    /// Creates an invalid level error.
    pub fn invalid_level(input: u8) -> Self {
        ChatscrubError::InvalidLevel { input }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatscrubError::Io(_))
    }

    /// Returns `true` if this is a JSON parse error.
    pub fn is_parse(&self) -> bool {
        matches!(self, ChatscrubError::Parse { .. })
    }

    /// Returns `true` if this is an invalid format or empty export error.
    pub fn is_invalid_format(&self) -> bool {
        matches!(
            self,
            ChatscrubError::InvalidFormat { .. } | ChatscrubError::EmptyExport { .. }
        )
    }

    /// Returns `true` if this is a configuration error (approach or level).
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            ChatscrubError::UnknownApproach { .. } | ChatscrubError::InvalidLevel { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err = ChatscrubError::from(io_err);
        let display = err.to_string();
        assert!(display.contains("IO error"));
        assert!(display.contains("file not found"));
    }

    #[test]
    fn test_parse_error_with_path() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err = ChatscrubError::parse(json_err, Some(PathBuf::from("/path/to/export.json")));
        let display = err.to_string();
        assert!(display.contains("Telegram export"));
        assert!(display.contains("/path/to/export.json"));
    }

    #[test]
    fn test_parse_error_without_path() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ChatscrubError::from(json_err);
        assert!(err.is_parse());
        assert!(!err.to_string().contains("file:"));
    }

    #[test]
    fn test_invalid_format_display() {
        let err = ChatscrubError::invalid_format("missing 'messages' array");
        assert!(err.to_string().contains("missing 'messages' array"));
        assert!(err.is_invalid_format());
    }

    #[test]
    fn test_config_errors() {
        let err = ChatscrubError::unknown_approach("compression");
        assert!(err.is_config());
        assert!(err.to_string().contains("compression"));
        assert!(err.to_string().contains("privacy, size, context"));

        let err = ChatscrubError::invalid_level(4);
        assert!(err.is_config());
        assert!(err.to_string().contains("4"));
        assert!(err.to_string().contains("1, 2, or 3"));
    }

    #[test]
    fn test_empty_export_display() {
        let err = ChatscrubError::empty_export("chat.json");
        assert!(err.is_invalid_format());
        assert!(err.to_string().contains("chat.json"));
    }

    #[test]
    fn test_empty_export_carries_no_error_source() {
        use std::error::Error;
        // The provenance string is plain context, not a wrapped error.
        let err = ChatscrubError::empty_export("input.json");
        assert!(err.source().is_none());
        assert!(err.to_string().contains("input.json"));
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error;
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err = ChatscrubError::from(io_err);
        assert!(err.source().is_some());

        let json_err = serde_json::from_str::<serde_json::Value>("nope").unwrap_err();
        let err = ChatscrubError::parse(json_err, None);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_is_methods_are_exclusive() {
        let io_err = ChatscrubError::Io(io::Error::new(io::ErrorKind::NotFound, ""));
        assert!(io_err.is_io());
        assert!(!io_err.is_parse());
        assert!(!io_err.is_invalid_format());
        assert!(!io_err.is_config());
    }
}
