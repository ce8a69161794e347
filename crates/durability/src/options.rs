//! Journal limits shared by writers and readers.
//!
//! Writers refuse to emit anything a reader with the same options would
//! reject, and readers check every length field before allocating for it.

use ctljournal_core::timestamp::TIMESTAMP_V1_LEN;

/// Frame size limits
///
/// # Presets
///
/// | Preset | Timestamp | Payload |
/// |--------|-----------|---------|
/// | default | 64 B | 64 MiB |
/// | strict | 16 B | 1 MiB |
/// | permissive | 256 B | 4 GiB - 1 |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JournalOptions {
    /// Largest accepted timestamp length field
    pub max_timestamp_len: u32,
    /// Largest accepted payload length field
    pub max_payload_len: u32,
}

impl Default for JournalOptions {
    fn default() -> Self {
        JournalOptions {
            max_timestamp_len: 64,
            max_payload_len: 64 * 1024 * 1024,
        }
    }
}

impl JournalOptions {
    /// Tight limits for journals of small configuration objects
    pub fn strict() -> Self {
        JournalOptions {
            max_timestamp_len: 16,
            max_payload_len: 1024 * 1024,
        }
    }

    /// Only the limits the wire format itself imposes
    pub fn permissive() -> Self {
        JournalOptions {
            max_timestamp_len: 256,
            max_payload_len: u32::MAX,
        }
    }

    /// Override the payload limit
    pub fn with_max_payload_len(mut self, max_payload_len: u32) -> Self {
        self.max_payload_len = max_payload_len;
        self
    }

    /// Check that frames written by this crate fit the timestamp limit
    pub fn admits_timestamps(&self) -> bool {
        self.max_timestamp_len as usize >= TIMESTAMP_V1_LEN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_admit_timestamps() {
        assert!(JournalOptions::default().admits_timestamps());
        assert!(JournalOptions::strict().admits_timestamps());
        assert!(JournalOptions::permissive().admits_timestamps());
    }

    #[test]
    fn test_with_max_payload_len() {
        let options = JournalOptions::strict().with_max_payload_len(10);
        assert_eq!(options.max_payload_len, 10);
        assert_eq!(options.max_timestamp_len, 16);
    }

    #[test]
    fn test_tiny_timestamp_limit() {
        let options = JournalOptions {
            max_timestamp_len: 8,
            ..Default::default()
        };
        assert!(!options.admits_timestamps());
    }
}
