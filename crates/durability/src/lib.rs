//! Durability layer for ctljournal
//!
//! This crate implements the binary journal behind the core contract:
//! - Frame format: action tag, object type tag, timestamp, payload
//! - FrameWriter: one synchronously flushed frame per append
//! - FrameReader: pull-based decoding state machine
//! - ChannelReader: background decoding with rendezvous handoff
//! - MemoryJournal and SharedWriter conveniences

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod channel;
pub mod format;
pub mod memory;
pub mod options;
pub mod reader;
pub mod shared;
pub mod writer;

pub use channel::ChannelReader;
pub use format::{ActionTag, FRAME_OVERHEAD};
pub use memory::MemoryJournal;
pub use options::JournalOptions;
pub use reader::FrameReader;
pub use shared::SharedWriter;
pub use writer::FrameWriter;
