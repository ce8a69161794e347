//! Record encoder
//!
//! [`FrameWriter`] appends one frame per [`JournalWriter`] call to any
//! `std::io::Write` sink. Each frame is assembled in memory, issued with a
//! single `write_all` and then flushed. That narrows the window for a torn
//! tail but does not close it: a sink failure partway through still leaves a
//! partial frame behind, and the writer refuses further appends from then on.
//!
//! Writers are single-owner. Concurrent appends through one sink must be
//! serialized by the caller, e.g. with [`SharedWriter`](crate::SharedWriter).

use std::any::Any;
use std::io::Write;
use std::sync::Arc;

use ctljournal_core::timestamp::TIMESTAMP_V1_LEN;
use ctljournal_core::{JournalError, JournalWriter, ObjectType, Result, Timestamp, TypeRegistry};
use serde::Serialize;
use tracing::{debug, error};

use crate::format::{encode_frame, ActionTag};
use crate::options::JournalOptions;

/// Record encoder over a byte sink
pub struct FrameWriter<W: Write> {
    sink: W,
    registry: Arc<TypeRegistry>,
    options: JournalOptions,
    clock: fn() -> Timestamp,
    frame: Vec<u8>,
    frames_written: u64,
    bytes_written: u64,
    poisoned: bool,
}

impl<W: Write> FrameWriter<W> {
    /// Create a writer appending to `sink`
    pub fn new(sink: W, registry: Arc<TypeRegistry>) -> Self {
        FrameWriter {
            sink,
            registry,
            options: JournalOptions::default(),
            clock: Timestamp::now,
            frame: Vec::new(),
            frames_written: 0,
            bytes_written: 0,
            poisoned: false,
        }
    }

    /// Replace the size limits
    pub fn with_options(mut self, options: JournalOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the timestamp source
    pub fn with_clock(mut self, clock: fn() -> Timestamp) -> Self {
        self.clock = clock;
        self
    }

    /// Frames successfully appended by this writer
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Bytes successfully appended by this writer
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Check whether an earlier sink failure disabled this writer
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Registry used to serialize payloads
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// Borrow the sink
    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Take the sink back
    pub fn into_inner(self) -> W {
        self.sink
    }

    fn append_object<T>(
        &mut self,
        action: ActionTag,
        object_type: ObjectType,
        object: &T,
    ) -> Result<()>
    where
        T: Serialize + Any,
    {
        let kind = self.registry.resolve(object_type)?;
        let payload = self.registry.encode(kind, object)?;
        self.append(action, object_type, &payload)
    }

    fn append(&mut self, action: ActionTag, object_type: ObjectType, payload: &[u8]) -> Result<()> {
        if self.poisoned {
            return Err(JournalError::Poisoned);
        }
        if payload.len() as u64 > self.options.max_payload_len as u64 {
            return Err(JournalError::LengthLimit {
                field: "payload",
                length: payload.len() as u64,
                limit: self.options.max_payload_len as u64,
            });
        }
        if !self.options.admits_timestamps() {
            return Err(JournalError::LengthLimit {
                field: "timestamp",
                length: TIMESTAMP_V1_LEN as u64,
                limit: self.options.max_timestamp_len as u64,
            });
        }
        let timestamp = (self.clock)().to_binary();

        self.frame.clear();
        encode_frame(&mut self.frame, action, object_type, &timestamp, payload)?;

        if let Err(e) = self.sink.write_all(&self.frame).and_then(|_| self.sink.flush()) {
            self.poisoned = true;
            error!(
                "Journal append failed after {} frames ({} {}): {}",
                self.frames_written, action, object_type, e
            );
            return Err(e.into());
        }

        self.frames_written += 1;
        self.bytes_written += self.frame.len() as u64;
        debug!(
            "Appended {} frame: object_type={} payload={}B frame={}B",
            action,
            object_type,
            payload.len(),
            self.frame.len()
        );
        Ok(())
    }
}

impl<W: Write> JournalWriter for FrameWriter<W> {
    fn create<T: Serialize + Any>(&mut self, object_type: ObjectType, object: &T) -> Result<()> {
        self.append_object(ActionTag::Create, object_type, object)
    }

    fn modify<T: Serialize + Any>(&mut self, object_type: ObjectType, object: &T) -> Result<()> {
        self.append_object(ActionTag::Modify, object_type, object)
    }

    fn delete(&mut self, object_type: ObjectType, key: &str) -> Result<()> {
        self.registry.resolve(object_type)?;
        let payload = self.registry.encode_key(key)?;
        self.append(ActionTag::Delete, object_type, &payload)
    }

    fn version(&mut self, sem_ver: &str) -> Result<()> {
        self.append(ActionTag::Version, ObjectType::NONE, sem_ver.as_bytes())
    }
}

impl<W: Write> std::fmt::Debug for FrameWriter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameWriter")
            .field("options", &self.options)
            .field("frames_written", &self.frames_written)
            .field("bytes_written", &self.bytes_written)
            .field("poisoned", &self.poisoned)
            .finish()
    }
}
