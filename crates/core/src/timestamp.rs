//! Frame timestamps and their binary time encoding
//!
//! Layout (version 1, 15 bytes, big-endian):
//!
//! ```text
//! version:u8 = 1 | seconds since 0001-01-01T00:00:00Z: i64 | nanos: i32 | offset minutes: i16
//! ```
//!
//! An offset of `-1` marks UTC; any other offset is accepted on decode and
//! discarded. Version 2 appends one byte of offset seconds and is accepted on
//! decode. Decoded instants are always normalized to UTC. Leap seconds are
//! written as the last nanosecond of the preceding second.

use byteorder::{BigEndian, ByteOrder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{JournalError, Result};

const ENCODING_V1: u8 = 1;
const ENCODING_V2: u8 = 2;

/// Encoded length of a version-1 timestamp
pub const TIMESTAMP_V1_LEN: usize = 15;
const TIMESTAMP_V2_LEN: usize = 16;

/// Seconds from 0001-01-01T00:00:00Z to the Unix epoch
const UNIX_TO_ABSOLUTE: i64 = 62_135_596_800;

const UTC_OFFSET_MARKER: i16 = -1;

const MAX_NANOS: u32 = 999_999_999;

/// UTC wall-clock instant recorded in each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current UTC wall-clock time
    pub fn now() -> Self {
        Timestamp(Utc::now())
    }

    /// Build from Unix seconds and sub-second nanoseconds
    ///
    /// Returns `None` when the instant is out of range.
    pub fn from_unix(secs: i64, nanos: u32) -> Option<Self> {
        DateTime::from_timestamp(secs, nanos).map(Timestamp)
    }

    /// Encode with the version-1 binary time layout
    pub fn to_binary(&self) -> [u8; TIMESTAMP_V1_LEN] {
        let mut buf = [0u8; TIMESTAMP_V1_LEN];
        buf[0] = ENCODING_V1;
        BigEndian::write_i64(&mut buf[1..9], self.0.timestamp() + UNIX_TO_ABSOLUTE);
        // chrono represents a leap second as nanos >= 1e9; fold it into the last nanosecond.
        let nanos = self.0.timestamp_subsec_nanos().min(MAX_NANOS);
        BigEndian::write_i32(&mut buf[9..13], nanos as i32);
        BigEndian::write_i16(&mut buf[13..15], UTC_OFFSET_MARKER);
        buf
    }

    /// Decode a version-1 or version-2 binary time encoding
    pub fn from_binary(buf: &[u8]) -> Result<Self> {
        let Some((&version, _)) = buf.split_first() else {
            return Err(JournalError::InvalidTimestamp("no data".into()));
        };
        let expected = match version {
            ENCODING_V1 => TIMESTAMP_V1_LEN,
            ENCODING_V2 => TIMESTAMP_V2_LEN,
            other => {
                return Err(JournalError::InvalidTimestamp(format!(
                    "unsupported version {}",
                    other
                )))
            }
        };
        if buf.len() != expected {
            return Err(JournalError::InvalidTimestamp(format!(
                "version {} needs {} bytes, got {}",
                version,
                expected,
                buf.len()
            )));
        }

        let absolute = BigEndian::read_i64(&buf[1..9]);
        let nanos = BigEndian::read_i32(&buf[9..13]);
        if !(0..1_000_000_000).contains(&nanos) {
            return Err(JournalError::InvalidTimestamp(format!(
                "nanoseconds out of range: {}",
                nanos
            )));
        }

        // Seconds are absolute; the zone offset only affects presentation.
        absolute
            .checked_sub(UNIX_TO_ABSOLUTE)
            .and_then(|secs| Timestamp::from_unix(secs, nanos as u32))
            .ok_or_else(|| {
                JournalError::InvalidTimestamp(format!("seconds out of range: {}", absolute))
            })
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Timestamp(dt)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
