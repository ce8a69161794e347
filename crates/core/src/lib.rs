//! Core types for ctljournal
//!
//! This crate defines everything a journal caller programs against:
//! - Error types ([`JournalError`])
//! - Object type tags ([`ObjectType`]) and frame [`Timestamp`]s
//! - The [`TypeRegistry`] mapping tags to payload codecs
//! - Standard control-plane object kinds
//! - The journal contract: [`JournalWriter`], [`JournalReader`], [`ReadItem`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod contract;
pub mod error;
pub mod objects;
pub mod registry;
pub mod timestamp;
pub mod types;

pub use contract::{
    DeleteRecord, ItemKind, JournalReader, JournalWriter, ObjectRecord, ReadItem, VersionRecord,
};
pub use error::{JournalError, Result};
pub use registry::{Kind, Object, ObjectValue, TypeRegistry};
pub use timestamp::Timestamp;
pub use types::ObjectType;
