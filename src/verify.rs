//! Reading a recorded log back
//!
//! [`CallLog`] loads the entry files of a log directory in sequence order and
//! compares the recorded method names against an expected sequence.

use std::fs;

use callorder_core::{CallEntry, Error, Result};
use callorder_sink::{DirectorySink, MemorySink, SinkOptions};
use callorder_wire::decode_entry;
use tracing::debug;

/// Placeholder for a missing position in an order mismatch
pub const END_OF_LOG: &str = "<end>";

/// Recorded calls in the order they were persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallLog {
    entries: Vec<CallEntry>,
}

impl CallLog {
    /// Log built from entries already in memory
    pub fn from_entries(entries: Vec<CallEntry>) -> Self {
        CallLog { entries }
    }

    /// Everything a [`MemorySink`] holds, without draining it
    pub fn from_memory(sink: &MemorySink) -> Self {
        Self::from_entries(sink.entries())
    }

    /// Decode every entry file of the log directory described by `options`.
    ///
    /// A missing directory is an empty log. A file that does not decode fails
    /// the whole load, naming the file.
    pub fn load(options: &SinkOptions) -> Result<Self> {
        let sink = DirectorySink::new(options.clone());
        let paths = sink.entry_paths()?;

        let mut entries = Vec::with_capacity(paths.len());
        for path in &paths {
            let text = fs::read_to_string(path)?;
            let entry = decode_entry(&text)
                .map_err(|e| Error::Decode(format!("{}: {}", path.display(), e)))?;
            entries.push(entry);
        }

        debug!(dir = %options.log_dir().display(), entries = entries.len(), "loaded call order log");
        Ok(CallLog { entries })
    }

    /// Recorded entries
    pub fn entries(&self) -> &[CallEntry] {
        &self.entries
    }

    /// Qualified method names in recorded order
    pub fn method_names(&self) -> Vec<&str> {
        self.entries.iter().map(CallEntry::method_name).collect()
    }

    /// Number of recorded entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First position where the recorded order departs from `expected`.
    ///
    /// Returns [`Error::OrderMismatch`] describing it, or `None` when the two
    /// sequences are identical. A sequence that runs out first shows
    /// [`END_OF_LOG`] at that position.
    pub fn diff_against(&self, expected: &[&str]) -> Option<Error> {
        let recorded = self.method_names();
        let longest = recorded.len().max(expected.len());

        (0..longest).find_map(|index| {
            let want = expected.get(index).copied();
            let got = recorded.get(index).copied();
            (want != got).then(|| Error::OrderMismatch {
                index,
                expected: want.unwrap_or(END_OF_LOG).to_string(),
                actual: got.unwrap_or(END_OF_LOG).to_string(),
            })
        })
    }

    /// Fail unless the recorded order is exactly `expected`
    pub fn assert_order(&self, expected: &[&str]) -> Result<()> {
        match self.diff_against(expected) {
            Some(mismatch) => Err(mismatch),
            None => Ok(()),
        }
    }
}
