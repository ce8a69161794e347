//! Journal contract
//!
//! - [`JournalWriter`]: Create, Modify, Delete, Version
//! - [`JournalReader`]: lazy sequence of [`ReadItem`]

pub mod journal;
pub mod read_item;

pub use journal::{JournalReader, JournalWriter};
pub use read_item::{DeleteRecord, ItemKind, ObjectRecord, ReadItem, VersionRecord};
