//! Record decoder
//!
//! [`FrameReader`] is a pull-based state machine over one byte source. Each
//! call to `next()` advances through
//!
//! ```text
//! ReadActionTag -> ReadObjectTypeTag -> ReadTimestampLength -> ReadTimestamp
//!     -> ReadPayloadLength -> ReadPayload -> Emit -> ReadActionTag ...
//! ```
//!
//! until one item is ready, so nothing past the current frame is read.
//!
//! ## Termination
//!
//! - End-of-stream before the first byte of a frame ends the sequence cleanly.
//! - End-of-stream or a read failure inside a frame yields one `Error` item.
//! - A frame that fails to decode yields one `Error` item.
//!
//! After an `Error` item the reader is exhausted; it never yields a second
//! error and never resumes.
//!
//! ## Bounds
//!
//! Length fields are checked against [`JournalOptions`] before any buffer is
//! reserved, and variable-size fields are filled incrementally, so a corrupt
//! length never allocates more than the source actually delivers.

use std::io::{ErrorKind, Read};
use std::iter::FusedIterator;
use std::sync::Arc;

use byteorder::{BigEndian, ByteOrder};
use ctljournal_core::{
    DeleteRecord, JournalError, JournalReader, ObjectRecord, ObjectType, ReadItem, Result,
    Timestamp, TypeRegistry, VersionRecord,
};
use tracing::{debug, trace, warn};

use crate::format::{ActionTag, ACTION_TAG_LEN, LENGTH_PREFIX_LEN, OBJECT_TYPE_LEN};
use crate::options::JournalOptions;

/// Frame fields read so far
#[derive(Debug)]
struct RawFrame {
    action: u32,
    object_type: i64,
    timestamp: Vec<u8>,
    payload: Vec<u8>,
}

#[derive(Debug)]
enum DecodeState {
    ReadActionTag,
    ReadObjectTypeTag {
        action: u32,
    },
    ReadTimestampLength {
        action: u32,
        object_type: i64,
    },
    ReadTimestamp {
        action: u32,
        object_type: i64,
        len: u32,
    },
    ReadPayloadLength {
        action: u32,
        object_type: i64,
        timestamp: Vec<u8>,
    },
    ReadPayload {
        action: u32,
        object_type: i64,
        timestamp: Vec<u8>,
        len: u32,
    },
    Emit(RawFrame),
    Done,
}

enum Step {
    Next(DecodeState),
    Item(ReadItem),
    End,
}

/// Record decoder over a byte source
pub struct FrameReader<R: Read> {
    source: R,
    registry: Arc<TypeRegistry>,
    options: JournalOptions,
    state: DecodeState,
    offset: u64,
    frame_start: u64,
    frames_read: u64,
}

impl<R: Read> FrameReader<R> {
    /// Create a reader positioned at the start of a frame
    pub fn new(source: R, registry: Arc<TypeRegistry>) -> Self {
        FrameReader {
            source,
            registry,
            options: JournalOptions::default(),
            state: DecodeState::ReadActionTag,
            offset: 0,
            frame_start: 0,
            frames_read: 0,
        }
    }

    /// Replace the size limits
    pub fn with_options(mut self, options: JournalOptions) -> Self {
        self.options = options;
        self
    }

    /// Bytes consumed from the source
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Frames decoded into records
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    /// Check whether the sequence has ended
    pub fn is_done(&self) -> bool {
        matches!(self.state, DecodeState::Done)
    }

    /// Take the source back
    pub fn into_inner(self) -> R {
        self.source
    }

    /// Fill `buf` from the source, stopping early only at end-of-stream
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.source.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        self.offset += filled as u64;
        Ok(filled)
    }

    fn read_fixed<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        let n = self.fill(&mut buf)?;
        if n < N {
            return Err(JournalError::Framing {
                field,
                needed: N as u64,
                available: n as u64,
            });
        }
        Ok(buf)
    }

    fn read_variable(&mut self, field: &'static str, len: u32) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let n = self
            .source
            .by_ref()
            .take(len as u64)
            .read_to_end(&mut buf)?;
        self.offset += n as u64;
        if n < len as usize {
            return Err(JournalError::Framing {
                field,
                needed: len as u64,
                available: n as u64,
            });
        }
        Ok(buf)
    }

    fn check_len(&self, field: &'static str, len: u32, limit: u32) -> Result<()> {
        if len > limit {
            return Err(JournalError::LengthLimit {
                field,
                length: len as u64,
                limit: limit as u64,
            });
        }
        Ok(())
    }

    fn advance(&mut self, state: DecodeState) -> Result<Step> {
        let next = match state {
            DecodeState::ReadActionTag => {
                self.frame_start = self.offset;
                let mut buf = [0u8; ACTION_TAG_LEN];
                match self.fill(&mut buf)? {
                    0 => return Ok(Step::End),
                    n if n < ACTION_TAG_LEN => {
                        return Err(JournalError::Framing {
                            field: "action tag",
                            needed: ACTION_TAG_LEN as u64,
                            available: n as u64,
                        })
                    }
                    _ => DecodeState::ReadObjectTypeTag {
                        action: BigEndian::read_u32(&buf),
                    },
                }
            }
            DecodeState::ReadObjectTypeTag { action } => {
                let buf = self.read_fixed::<OBJECT_TYPE_LEN>("object type tag")?;
                DecodeState::ReadTimestampLength {
                    action,
                    object_type: BigEndian::read_i64(&buf),
                }
            }
            DecodeState::ReadTimestampLength {
                action,
                object_type,
            } => {
                let buf = self.read_fixed::<LENGTH_PREFIX_LEN>("timestamp length")?;
                let len = BigEndian::read_u32(&buf);
                self.check_len("timestamp", len, self.options.max_timestamp_len)?;
                DecodeState::ReadTimestamp {
                    action,
                    object_type,
                    len,
                }
            }
            DecodeState::ReadTimestamp {
                action,
                object_type,
                len,
            } => DecodeState::ReadPayloadLength {
                action,
                object_type,
                timestamp: self.read_variable("timestamp", len)?,
            },
            DecodeState::ReadPayloadLength {
                action,
                object_type,
                timestamp,
            } => {
                let buf = self.read_fixed::<LENGTH_PREFIX_LEN>("payload length")?;
                let len = BigEndian::read_u32(&buf);
                self.check_len("payload", len, self.options.max_payload_len)?;
                DecodeState::ReadPayload {
                    action,
                    object_type,
                    timestamp,
                    len,
                }
            }
            DecodeState::ReadPayload {
                action,
                object_type,
                timestamp,
                len,
            } => DecodeState::Emit(RawFrame {
                action,
                object_type,
                timestamp,
                payload: self.read_variable("payload", len)?,
            }),
            DecodeState::Emit(frame) => return self.build_item(frame).map(Step::Item),
            DecodeState::Done => return Ok(Step::End),
        };
        Ok(Step::Next(next))
    }

    fn build_item(&self, frame: RawFrame) -> Result<ReadItem> {
        let action =
            ActionTag::from_u32(frame.action).ok_or(JournalError::UnknownAction(frame.action))?;
        let timestamp = Timestamp::from_binary(&frame.timestamp)?;
        let object_type = ObjectType::from_id(frame.object_type);

        let item = match action {
            ActionTag::Create | ActionTag::Modify => {
                let kind = self.registry.resolve(object_type)?;
                let record = ObjectRecord {
                    object_type,
                    timestamp,
                    object: self.registry.decode(kind, &frame.payload)?,
                };
                if action == ActionTag::Create {
                    ReadItem::Create(record)
                } else {
                    ReadItem::Modify(record)
                }
            }
            ActionTag::Delete => {
                self.registry.resolve(object_type)?;
                ReadItem::Delete(DeleteRecord {
                    object_type,
                    timestamp,
                    key: self.registry.decode_key(&frame.payload)?,
                })
            }
            ActionTag::Version => {
                let version = String::from_utf8(frame.payload)
                    .map_err(|e| JournalError::serialization(format!("version text: {}", e)))?;
                ReadItem::Version(VersionRecord { timestamp, version })
            }
        };
        trace!(
            "Decoded {} frame at offset {}: object_type={}",
            action,
            self.frame_start,
            object_type
        );
        Ok(item)
    }
}

impl<R: Read> Iterator for FrameReader<R> {
    type Item = ReadItem;

    fn next(&mut self) -> Option<ReadItem> {
        if self.is_done() {
            return None;
        }
        loop {
            let state = std::mem::replace(&mut self.state, DecodeState::Done);
            match self.advance(state) {
                Ok(Step::Next(next)) => self.state = next,
                Ok(Step::Item(item)) => {
                    self.frames_read += 1;
                    self.state = DecodeState::ReadActionTag;
                    return Some(item);
                }
                Ok(Step::End) => {
                    debug!(
                        "Journal ended cleanly after {} frames ({} bytes)",
                        self.frames_read, self.offset
                    );
                    return None;
                }
                Err(e) => {
                    warn!(
                        "Journal decode stopped at frame {} (offset {}): {}",
                        self.frames_read, self.frame_start, e
                    );
                    return Some(ReadItem::Error(e));
                }
            }
        }
    }
}

impl<R: Read> FusedIterator for FrameReader<R> {}

impl<R: Read> JournalReader for FrameReader<R> {}

impl<R: Read> std::fmt::Debug for FrameReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameReader")
            .field("options", &self.options)
            .field("offset", &self.offset)
            .field("frames_read", &self.frames_read)
            .field("done", &self.is_done())
            .finish()
    }
}
