//! On-disk frame format
//!
//! A journal is the concatenation of frames in append order, with no header,
//! footer or separators. All integers are big-endian.
//!
//! ```text
//! +-------------+-----------------+---------------+-----------+-------------+---------+
//! | action: u32 | object_type: i64| ts_len: u32   | timestamp | payload_len | payload |
//! |   4 bytes   |     8 bytes     |   4 bytes     |  ts_len   |  u32 (4)    |   len   |
//! +-------------+-----------------+---------------+-----------+-------------+---------+
//! ```
//!
//! Payloads are UTF-8 JSON for Create/Modify/Delete and raw UTF-8 text for
//! Version. There is no checksum: a frame is only as trustworthy as its sink.

use byteorder::{BigEndian, WriteBytesExt};
use ctljournal_core::{JournalError, ObjectType, Result};

/// Size of the action tag field
pub const ACTION_TAG_LEN: usize = 4;
/// Size of the object type tag field
pub const OBJECT_TYPE_LEN: usize = 8;
/// Size of each length prefix
pub const LENGTH_PREFIX_LEN: usize = 4;
/// Fixed bytes in every frame (everything except timestamp and payload)
pub const FRAME_OVERHEAD: usize = ACTION_TAG_LEN + OBJECT_TYPE_LEN + 2 * LENGTH_PREFIX_LEN;

/// Action recorded by a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ActionTag {
    /// Object created
    Create = 1,
    /// Object modified
    Modify = 2,
    /// Object deleted
    Delete = 3,
    /// Version marker
    Version = 4,
}

impl ActionTag {
    /// All actions in tag order
    pub const ALL: [ActionTag; 4] = [
        ActionTag::Create,
        ActionTag::Modify,
        ActionTag::Delete,
        ActionTag::Version,
    ];

    /// Parse a wire tag
    pub fn from_u32(tag: u32) -> Option<Self> {
        match tag {
            1 => Some(ActionTag::Create),
            2 => Some(ActionTag::Modify),
            3 => Some(ActionTag::Delete),
            4 => Some(ActionTag::Version),
            _ => None,
        }
    }

    /// Wire tag
    pub const fn as_u32(&self) -> u32 {
        *self as u32
    }

    /// Lowercase name for logs
    pub const fn name(&self) -> &'static str {
        match self {
            ActionTag::Create => "create",
            ActionTag::Modify => "modify",
            ActionTag::Delete => "delete",
            ActionTag::Version => "version",
        }
    }
}

impl std::fmt::Display for ActionTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Total encoded size of a frame
pub fn frame_len(timestamp_len: usize, payload_len: usize) -> usize {
    FRAME_OVERHEAD + timestamp_len + payload_len
}

fn length_prefix(field: &'static str, len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| JournalError::LengthLimit {
        field,
        length: len as u64,
        limit: u32::MAX as u64,
    })
}

/// Append one encoded frame to `out`
pub fn encode_frame(
    out: &mut Vec<u8>,
    action: ActionTag,
    object_type: ObjectType,
    timestamp: &[u8],
    payload: &[u8],
) -> Result<()> {
    let timestamp_len = length_prefix("timestamp", timestamp.len())?;
    let payload_len = length_prefix("payload", payload.len())?;

    out.reserve(frame_len(timestamp.len(), payload.len()));
    out.write_u32::<BigEndian>(action.as_u32())?;
    out.write_i64::<BigEndian>(object_type.id())?;
    out.write_u32::<BigEndian>(timestamp_len)?;
    out.extend_from_slice(timestamp);
    out.write_u32::<BigEndian>(payload_len)?;
    out.extend_from_slice(payload);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_tags() {
        for action in ActionTag::ALL {
            assert_eq!(ActionTag::from_u32(action.as_u32()), Some(action));
        }
        assert_eq!(ActionTag::Create.as_u32(), 1);
        assert_eq!(ActionTag::Version.as_u32(), 4);
        assert_eq!(ActionTag::from_u32(0), None);
        assert_eq!(ActionTag::from_u32(5), None);
    }

    #[test]
    fn test_encode_frame_layout() {
        let mut out = Vec::new();
        encode_frame(
            &mut out,
            ActionTag::Delete,
            ObjectType::ROUTE,
            &[0xAA, 0xBB],
            b"\"r1\"",
        )
        .unwrap();

        assert_eq!(out.len(), frame_len(2, 4));
        assert_eq!(&out[0..4], &[0, 0, 0, 3]);
        assert_eq!(&out[4..12], &[0, 0, 0, 0, 0, 0, 0, 4]);
        assert_eq!(&out[12..16], &[0, 0, 0, 2]);
        assert_eq!(&out[16..18], &[0xAA, 0xBB]);
        assert_eq!(&out[18..22], &[0, 0, 0, 4]);
        assert_eq!(&out[22..], b"\"r1\"");
    }

    #[test]
    fn test_negative_object_type() {
        let mut out = Vec::new();
        encode_frame(&mut out, ActionTag::Create, ObjectType::from_id(-1), &[], b"{}").unwrap();
        assert_eq!(&out[4..12], &[0xFF; 8]);
    }

    #[test]
    fn test_encode_appends() {
        let mut out = vec![0x42];
        encode_frame(&mut out, ActionTag::Version, ObjectType::NONE, &[], b"1.0.0").unwrap();
        assert_eq!(out[0], 0x42);
        assert_eq!(out.len(), 1 + frame_len(0, 5));
    }
}
