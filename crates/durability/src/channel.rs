//! Background decoding with rendezvous handoff
//!
//! [`ChannelReader`] runs a [`FrameReader`] on its own thread and hands each
//! item over a zero-capacity channel. The decoder blocks until the consumer
//! takes the item, so a slow consumer throttles decoding and an idle one
//! halts it. Dropping the consumer makes the next handoff fail, which stops
//! the decode thread after the frame in flight.

use std::io::Read;
use std::iter::FusedIterator;
use std::thread;

use crossbeam::channel::{bounded, Receiver};
use ctljournal_core::{JournalReader, ReadItem, Result};
use tracing::debug;

use crate::reader::FrameReader;

/// Item sequence produced by a background decode thread
pub struct ChannelReader {
    rx: Receiver<ReadItem>,
}

impl ChannelReader {
    /// Start decoding `reader` on a new thread
    pub fn spawn<R>(reader: FrameReader<R>) -> Result<Self>
    where
        R: Read + Send + 'static,
    {
        let (tx, rx) = bounded::<ReadItem>(0);

        thread::Builder::new()
            .name("ctljournal-decode".to_string())
            .spawn(move || {
                for item in reader {
                    if tx.send(item).is_err() {
                        debug!("Journal consumer dropped, stopping decode thread");
                        return;
                    }
                }
            })?;

        Ok(ChannelReader { rx })
    }
}

impl Iterator for ChannelReader {
    type Item = ReadItem;

    fn next(&mut self) -> Option<ReadItem> {
        // Disconnect means the decode thread finished.
        self.rx.recv().ok()
    }
}

impl FusedIterator for ChannelReader {}

impl JournalReader for ChannelReader {}

impl std::fmt::Debug for ChannelReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelReader").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::FrameWriter;
    use ctljournal_core::objects::Zone;
    use ctljournal_core::{ItemKind, JournalWriter, ObjectType, TypeRegistry};
    use std::io::{self, Cursor};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn journal(frames: usize) -> Vec<u8> {
        let mut w = FrameWriter::new(Vec::new(), Arc::new(TypeRegistry::control_plane()));
        for i in 0..frames {
            let zone = Zone {
                zone_key: format!("z{}", i),
                name: "default".into(),
            };
            w.create(ObjectType::ZONE, &zone).unwrap();
        }
        w.into_inner()
    }

    /// Source that counts read calls
    struct Counting {
        inner: Cursor<Vec<u8>>,
        reads: Arc<AtomicUsize>,
    }

    impl Read for Counting {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.read(buf)
        }
    }

    #[test]
    fn test_matches_synchronous_reader() {
        let bytes = journal(5);
        let registry = Arc::new(TypeRegistry::control_plane());

        let sync: Vec<ItemKind> = FrameReader::new(Cursor::new(bytes.clone()), registry.clone())
            .map(|item| item.kind())
            .collect();
        let background: Vec<ItemKind> =
            ChannelReader::spawn(FrameReader::new(Cursor::new(bytes), registry))
                .unwrap()
                .map(|item| item.kind())
                .collect();

        assert_eq!(sync, background);
        assert_eq!(background.len(), 5);
    }

    #[test]
    fn test_terminal_error_forwarded() {
        let mut bytes = journal(2);
        bytes.truncate(bytes.len() - 1);
        let reader = FrameReader::new(Cursor::new(bytes), Arc::new(TypeRegistry::control_plane()));

        let (records, err) = ChannelReader::spawn(reader).unwrap().drain();
        assert_eq!(records.len(), 1);
        assert!(err.unwrap().is_framing());
    }

    #[test]
    fn test_idle_consumer_halts_decoding() {
        let reads = Arc::new(AtomicUsize::new(0));
        let source = Counting {
            inner: Cursor::new(journal(50)),
            reads: reads.clone(),
        };
        let reader = FrameReader::new(source, Arc::new(TypeRegistry::control_plane()));

        let mut items = ChannelReader::spawn(reader).unwrap();
        assert!(items.next().is_some());
        thread::sleep(Duration::from_millis(50));
        let after_first = reads.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(50));

        // At most the frame waiting in the handoff has been read.
        assert_eq!(reads.load(Ordering::SeqCst), after_first);
        assert!(after_first < 50);
        drop(items);
    }
}
