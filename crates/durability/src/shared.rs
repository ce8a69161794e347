//! Writer shared across threads
//!
//! A [`FrameWriter`] must not be driven from several threads at once or
//! frames interleave. [`SharedWriter`] serializes appends behind a mutex so
//! each frame reaches the sink whole.

use std::any::Any;
use std::io::Write;
use std::sync::Arc;

use ctljournal_core::{JournalWriter, ObjectType, Result};
use parking_lot::Mutex;
use serde::Serialize;

use crate::writer::FrameWriter;

/// Cloneable handle serializing appends to one [`FrameWriter`]
pub struct SharedWriter<W: Write> {
    inner: Arc<Mutex<FrameWriter<W>>>,
}

impl<W: Write> SharedWriter<W> {
    /// Wrap a writer
    pub fn new(writer: FrameWriter<W>) -> Self {
        SharedWriter {
            inner: Arc::new(Mutex::new(writer)),
        }
    }

    /// Frames appended through all handles
    pub fn frames_written(&self) -> u64 {
        self.inner.lock().frames_written()
    }

    /// Run `f` with exclusive access to the writer
    pub fn with_writer<T>(&self, f: impl FnOnce(&mut FrameWriter<W>) -> T) -> T {
        f(&mut self.inner.lock())
    }

    /// Recover the writer if this is the last handle
    pub fn try_unwrap(self) -> std::result::Result<FrameWriter<W>, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| SharedWriter { inner })
    }
}

impl<W: Write> Clone for SharedWriter<W> {
    fn clone(&self) -> Self {
        SharedWriter {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<W: Write> JournalWriter for SharedWriter<W> {
    fn create<T: Serialize + Any>(&mut self, object_type: ObjectType, object: &T) -> Result<()> {
        self.inner.lock().create(object_type, object)
    }

    fn modify<T: Serialize + Any>(&mut self, object_type: ObjectType, object: &T) -> Result<()> {
        self.inner.lock().modify(object_type, object)
    }

    fn delete(&mut self, object_type: ObjectType, key: &str) -> Result<()> {
        self.inner.lock().delete(object_type, key)
    }

    fn version(&mut self, sem_ver: &str) -> Result<()> {
        self.inner.lock().version(sem_ver)
    }
}

impl<W: Write> std::fmt::Debug for SharedWriter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedWriter")
            .field("handles", &Arc::strong_count(&self.inner))
            .finish()
    }
}
