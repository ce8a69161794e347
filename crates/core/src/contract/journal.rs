//! Journal write and read traits
//!
//! Callers program against these; the frame layout behind them is an
//! implementation detail of the durability crate.

use std::any::Any;

use serde::Serialize;

use crate::contract::read_item::ReadItem;
use crate::error::{JournalError, Result};
use crate::types::ObjectType;

/// Write side of a journal
///
/// Every call appends exactly one record. An error leaves the tail of the
/// underlying sink in an unspecified state; the handle must not be used for
/// further appends until the caller has repaired or replaced the sink.
pub trait JournalWriter {
    /// Record creation of `object`
    fn create<T: Serialize + Any>(&mut self, object_type: ObjectType, object: &T) -> Result<()>;

    /// Record modification of `object`
    fn modify<T: Serialize + Any>(&mut self, object_type: ObjectType, object: &T) -> Result<()>;

    /// Record deletion of the object identified by `key`
    fn delete(&mut self, object_type: ObjectType, key: &str) -> Result<()>;

    /// Record a version marker
    fn version(&mut self, sem_ver: &str) -> Result<()>;
}

/// Read side of a journal
///
/// A lazy, finite, non-restartable sequence of items. Iteration ends at a
/// clean end-of-stream or right after the first `Error` item.
pub trait JournalReader: Iterator<Item = ReadItem> {
    /// Collect all remaining records, failing on the terminal error
    fn read_to_end(self) -> Result<Vec<ReadItem>>
    where
        Self: Sized,
    {
        let mut records = Vec::new();
        for item in self {
            match item {
                ReadItem::Error(e) => return Err(e),
                record => records.push(record),
            }
        }
        Ok(records)
    }

    /// Collect all remaining records, splitting off the terminal error
    fn drain(self) -> (Vec<ReadItem>, Option<JournalError>)
    where
        Self: Sized,
    {
        let mut records = Vec::new();
        for item in self {
            match item {
                ReadItem::Error(e) => return (records, Some(e)),
                record => records.push(record),
            }
        }
        (records, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::read_item::VersionRecord;
    use crate::timestamp::Timestamp;

    struct Fixed(std::vec::IntoIter<ReadItem>);

    impl Iterator for Fixed {
        type Item = ReadItem;

        fn next(&mut self) -> Option<ReadItem> {
            self.0.next()
        }
    }

    impl JournalReader for Fixed {}

    fn version(v: &str) -> ReadItem {
        ReadItem::Version(VersionRecord {
            timestamp: Timestamp::now(),
            version: v.into(),
        })
    }

    #[test]
    fn test_read_to_end_ok() {
        let reader = Fixed(vec![version("1.0.0"), version("1.1.0")].into_iter());
        assert_eq!(reader.read_to_end().unwrap().len(), 2);
    }

    #[test]
    fn test_drain_splits_error() {
        let reader = Fixed(
            vec![version("1.0.0"), ReadItem::Error(JournalError::UnknownAction(0))].into_iter(),
        );
        let (records, err) = reader.drain();
        assert_eq!(records.len(), 1);
        assert!(err.unwrap().is_unknown_action());
    }
}
