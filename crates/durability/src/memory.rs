//! In-memory journal
//!
//! Useful for tests and for staging a batch of records before shipping the
//! bytes elsewhere. Readers decode a snapshot of the buffer taken when they
//! are opened.

use std::any::Any;
use std::io::Cursor;
use std::sync::Arc;

use ctljournal_core::{JournalWriter, ObjectType, Result, TypeRegistry};
use serde::Serialize;

use crate::options::JournalOptions;
use crate::reader::FrameReader;
use crate::writer::FrameWriter;

/// Journal backed by a `Vec<u8>`
#[derive(Debug)]
pub struct MemoryJournal {
    writer: FrameWriter<Vec<u8>>,
    options: JournalOptions,
}

impl MemoryJournal {
    /// Empty journal using `registry` for payloads
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        MemoryJournal {
            writer: FrameWriter::new(Vec::new(), registry),
            options: JournalOptions::default(),
        }
    }

    /// Replace the size limits for both appends and reads
    pub fn with_options(mut self, options: JournalOptions) -> Self {
        self.writer = self.writer.with_options(options);
        self.options = options;
        self
    }

    /// Open a reader over everything appended so far
    pub fn reader(&self) -> FrameReader<Cursor<Vec<u8>>> {
        FrameReader::new(
            Cursor::new(self.writer.get_ref().clone()),
            self.writer.registry().clone(),
        )
        .with_options(self.options)
    }

    /// Encoded journal bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.writer.get_ref()
    }

    /// Number of frames appended
    pub fn frames(&self) -> u64 {
        self.writer.frames_written()
    }

    /// Encoded size in bytes
    pub fn len(&self) -> usize {
        self.writer.get_ref().len()
    }

    /// Check if nothing has been appended
    pub fn is_empty(&self) -> bool {
        self.writer.get_ref().is_empty()
    }

    /// Take the encoded bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

impl JournalWriter for MemoryJournal {
    fn create<T: Serialize + Any>(&mut self, object_type: ObjectType, object: &T) -> Result<()> {
        self.writer.create(object_type, object)
    }

    fn modify<T: Serialize + Any>(&mut self, object_type: ObjectType, object: &T) -> Result<()> {
        self.writer.modify(object_type, object)
    }

    fn delete(&mut self, object_type: ObjectType, key: &str) -> Result<()> {
        self.writer.delete(object_type, key)
    }

    fn version(&mut self, sem_ver: &str) -> Result<()> {
        self.writer.version(sem_ver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctljournal_core::objects::Domain;
    use ctljournal_core::{JournalReader, ReadItem};

    #[test]
    fn test_reader_sees_snapshot() {
        let mut journal = MemoryJournal::new(Arc::new(TypeRegistry::control_plane()));
        assert!(journal.is_empty());

        journal.version("1.0.0").unwrap();
        let reader = journal.reader();
        journal
            .create(ObjectType::DOMAIN, &Domain::default())
            .unwrap();

        assert_eq!(reader.count(), 1);
        assert_eq!(journal.reader().count(), 2);
        assert_eq!(journal.frames(), 2);
    }

    #[test]
    fn test_readers_restart_from_beginning() {
        let mut journal = MemoryJournal::new(Arc::new(TypeRegistry::control_plane()));
        journal.delete(ObjectType::DOMAIN, "d1").unwrap();

        for _ in 0..2 {
            let records = journal.reader().read_to_end().unwrap();
            match &records[..] {
                [ReadItem::Delete(d)] => assert_eq!(d.key, "d1"),
                other => panic!("Expected one Delete, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_options_apply_to_reads() {
        let journal = MemoryJournal::new(Arc::new(TypeRegistry::control_plane()))
            .with_options(JournalOptions::strict());
        assert_eq!(journal.reader().count(), 0);
        assert_eq!(journal.len(), 0);
        assert!(journal.into_bytes().is_empty());
    }
}
