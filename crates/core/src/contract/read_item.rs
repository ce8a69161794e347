//! Decoded journal items
//!
//! A reader yields a finite sequence of [`ReadItem`]s. At most one item is
//! an `Error`, and when present it is always the last one.

use crate::error::JournalError;
use crate::registry::Object;
use crate::timestamp::Timestamp;
use crate::types::ObjectType;

/// Create or Modify record
#[derive(Debug)]
pub struct ObjectRecord {
    /// Object type tag from the frame
    pub object_type: ObjectType,
    /// Wall-clock time the frame was written
    pub timestamp: Timestamp,
    /// Decoded object, downcastable to the registered type
    pub object: Object,
}

/// Delete record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRecord {
    /// Object type tag from the frame
    pub object_type: ObjectType,
    /// Wall-clock time the frame was written
    pub timestamp: Timestamp,
    /// Key of the deleted object
    pub key: String,
}

/// Version record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRecord {
    /// Wall-clock time the frame was written
    pub timestamp: Timestamp,
    /// Semantic version text
    pub version: String,
}

/// Discriminant of a [`ReadItem`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// Object created
    Create,
    /// Object modified
    Modify,
    /// Object deleted
    Delete,
    /// Schema/API version marker
    Version,
    /// Terminal decode failure
    Error,
}

impl ItemKind {
    /// Lowercase name
    pub const fn name(&self) -> &'static str {
        match self {
            ItemKind::Create => "create",
            ItemKind::Modify => "modify",
            ItemKind::Delete => "delete",
            ItemKind::Version => "version",
            ItemKind::Error => "error",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One item decoded from a journal
#[derive(Debug)]
pub enum ReadItem {
    /// Object created
    Create(ObjectRecord),
    /// Object modified
    Modify(ObjectRecord),
    /// Object deleted
    Delete(DeleteRecord),
    /// Version marker
    Version(VersionRecord),
    /// Terminal failure; nothing follows it
    Error(JournalError),
}

impl ReadItem {
    /// Discriminant of this item
    pub fn kind(&self) -> ItemKind {
        match self {
            ReadItem::Create(_) => ItemKind::Create,
            ReadItem::Modify(_) => ItemKind::Modify,
            ReadItem::Delete(_) => ItemKind::Delete,
            ReadItem::Version(_) => ItemKind::Version,
            ReadItem::Error(_) => ItemKind::Error,
        }
    }

    /// Check if this is the terminal error
    pub fn is_error(&self) -> bool {
        matches!(self, ReadItem::Error(_))
    }

    /// Frame timestamp (None for errors)
    pub fn timestamp(&self) -> Option<Timestamp> {
        match self {
            ReadItem::Create(r) | ReadItem::Modify(r) => Some(r.timestamp),
            ReadItem::Delete(r) => Some(r.timestamp),
            ReadItem::Version(r) => Some(r.timestamp),
            ReadItem::Error(_) => None,
        }
    }

    /// Object type tag (Create, Modify and Delete only)
    pub fn object_type(&self) -> Option<ObjectType> {
        match self {
            ReadItem::Create(r) | ReadItem::Modify(r) => Some(r.object_type),
            ReadItem::Delete(r) => Some(r.object_type),
            ReadItem::Version(_) | ReadItem::Error(_) => None,
        }
    }

    /// Borrow the error, if this is the terminal error
    pub fn error(&self) -> Option<&JournalError> {
        match self {
            ReadItem::Error(e) => Some(e),
            _ => None,
        }
    }

    /// Convert into a `Result`, moving the error out
    pub fn into_result(self) -> Result<ReadItem, JournalError> {
        match self {
            ReadItem::Error(e) => Err(e),
            item => Ok(item),
        }
    }
}
