//! Error types for journal operations.
//!
//! Writers surface these synchronously from each append. Readers never return
//! them directly: a fatal decode condition becomes the terminal
//! [`ReadItem::Error`](crate::ReadItem::Error) of the item sequence.

use thiserror::Error;

/// All journal errors.
#[derive(Debug, Error)]
pub enum JournalError {
    /// Payload could not be serialized or deserialized
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Value passed to the writer is not the Rust type registered for the tag
    #[error("type mismatch: {object_type} expects {expected}, got {actual}")]
    TypeMismatch {
        /// Registered name of the object kind
        object_type: &'static str,
        /// Rust type registered for the kind
        expected: &'static str,
        /// Rust type that was supplied
        actual: &'static str,
    },

    /// Stream ended inside a frame field
    #[error("framing error: {field} needs {needed} bytes, only {available} available")]
    Framing {
        /// Frame field being read
        field: &'static str,
        /// Bytes the field requires
        needed: u64,
        /// Bytes actually read before end-of-stream
        available: u64,
    },

    /// Length field exceeds the configured limit
    #[error("framing error: {field} length {length} exceeds limit {limit}")]
    LengthLimit {
        /// Length field that overflowed
        field: &'static str,
        /// Declared or requested length
        length: u64,
        /// Configured maximum
        limit: u64,
    },

    /// Object type tag is not registered
    #[error("unknown object type tag: {0}")]
    UnknownType(i64),

    /// Action tag outside the defined set
    #[error("unknown action tag: {0}")]
    UnknownAction(u32),

    /// Timestamp bytes are not a valid binary time encoding
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Sink or source failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Writer refused an append after an earlier sink failure
    #[error("writer poisoned by an earlier write failure")]
    Poisoned,
}

/// Result type for journal operations.
pub type Result<T> = std::result::Result<T, JournalError>;

impl JournalError {
    /// Create a serialization error from any displayable cause.
    pub fn serialization(msg: impl std::fmt::Display) -> Self {
        JournalError::Serialization(msg.to_string())
    }

    /// Check if this is a payload (de)serialization failure.
    ///
    /// Includes writer-side type mismatches.
    pub fn is_serialization(&self) -> bool {
        matches!(
            self,
            JournalError::Serialization(_) | JournalError::TypeMismatch { .. }
        )
    }

    /// Check if this is a framing failure (truncation or oversized length field).
    pub fn is_framing(&self) -> bool {
        matches!(
            self,
            JournalError::Framing { .. } | JournalError::LengthLimit { .. }
        )
    }

    /// Check if this is an unregistered object type.
    pub fn is_unknown_type(&self) -> bool {
        matches!(self, JournalError::UnknownType(_))
    }

    /// Check if this is an unknown action tag.
    pub fn is_unknown_action(&self) -> bool {
        matches!(self, JournalError::UnknownAction(_))
    }

    /// Check if this is an I/O failure.
    ///
    /// A poisoned writer counts: its sink already failed once.
    pub fn is_io(&self) -> bool {
        matches!(self, JournalError::Io(_) | JournalError::Poisoned)
    }
}

impl From<serde_json::Error> for JournalError {
    fn from(e: serde_json::Error) -> Self {
        JournalError::Serialization(e.to_string())
    }
}
