//! # ctljournal
//!
//! Append-only binary journal for control-plane object lifecycle events.
//!
//! A control-plane API records every Create, Modify and Delete of its
//! configuration objects (zones, proxies, domains, routes, clusters, shared
//! rules, listeners), plus Version markers, as self-delimiting frames in a
//! byte stream. Any reader can later replay the stream into typed items.
//!
//! ## Quick Start
//!
//! ```
//! use std::io::Cursor;
//! use std::sync::Arc;
//! use ctljournal::prelude::*;
//! use ctljournal::objects::Cluster;
//!
//! let registry = Arc::new(TypeRegistry::control_plane());
//!
//! let mut writer = FrameWriter::new(Vec::new(), registry.clone());
//! writer.version("1.0.0")?;
//! writer.create(ObjectType::CLUSTER, &Cluster::default())?;
//!
//! let reader = FrameReader::new(Cursor::new(writer.into_inner()), registry);
//! let records = reader.read_to_end()?;
//! assert_eq!(records.len(), 2);
//! # Ok::<(), ctljournal::JournalError>(())
//! ```
//!
//! ## Reading
//!
//! Readers are lazy and finite. A clean end-of-stream simply ends the
//! sequence; any failure becomes exactly one trailing [`ReadItem::Error`].
//!
//! - [`FrameReader`] - decodes on the caller's thread, one frame per `next()`
//! - [`ChannelReader`] - decodes on a background thread with rendezvous handoff
//!
//! ## Writing
//!
//! - [`FrameWriter`] - single-owner writer over any `std::io::Write`
//! - [`SharedWriter`] - cloneable handle serializing appends from many threads
//! - [`MemoryJournal`] - in-memory journal with snapshot readers

#![warn(missing_docs)]

pub mod prelude;

// Re-export the contract and registry
pub use ctljournal_core::{
    objects, DeleteRecord, ItemKind, JournalError, JournalReader, JournalWriter, Kind, Object,
    ObjectRecord, ObjectType, ObjectValue, ReadItem, Result, Timestamp, TypeRegistry,
    VersionRecord,
};

// Re-export the binary journal
pub use ctljournal_durability::{
    ActionTag, ChannelReader, FrameReader, FrameWriter, JournalOptions, MemoryJournal,
    SharedWriter,
};
