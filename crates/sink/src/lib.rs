//! Entry sinks for callorder
//!
//! A sink answers two questions for the recorder: is recording switched on
//! right now, and where does an entry go once it is built.
//!
//! - [`DirectorySink`]: one file per entry in a log directory; recording is on
//!   while the directory and its marker file both exist
//! - [`MemorySink`]: entries kept in memory behind a toggle, for in-process
//!   assertions
//!
//! ## Sequence Numbers
//!
//! Every persisted entry gets the next sequence number, starting at 0. The
//! number is taken and incremented in one step, so entries are numbered in
//! the order they were persisted.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod directory;
mod memory;
mod options;

pub use directory::DirectorySink;
pub use memory::MemorySink;
pub use options::SinkOptions;

use callorder_core::{CallEntry, Result};

/// Destination for recorded entries.
pub trait Sink: Send + Sync {
    /// Whether entries should be recorded right now.
    ///
    /// Re-evaluated on every call.
    fn is_active(&self) -> bool;

    /// Persist one entry and return the sequence number it was stored under.
    fn persist(&self, entry: &CallEntry) -> Result<u64>;

    /// Sequence number the next persisted entry will get
    fn sequence(&self) -> u64;
}
