//! Convenient imports for ctljournal.
//!
//! ```
//! use ctljournal::prelude::*;
//!
//! let journal = MemoryJournal::new(std::sync::Arc::new(TypeRegistry::control_plane()));
//! assert!(journal.is_empty());
//! ```

// Contract
pub use crate::{ItemKind, JournalReader, JournalWriter, ReadItem};

// Error handling
pub use crate::{JournalError, Result};

// Registry and tags
pub use crate::{ObjectType, Timestamp, TypeRegistry};

// Writers and readers
pub use crate::{ChannelReader, FrameReader, FrameWriter, JournalOptions, MemoryJournal, SharedWriter};
