//! In-memory sink

use std::sync::atomic::{AtomicBool, Ordering};

use callorder_core::{CallEntry, Result};
use parking_lot::Mutex;

use crate::Sink;

/// Sink that keeps entries in memory.
///
/// Starts active. [`set_active`](MemorySink::set_active) plays the role of
/// the marker file.
#[derive(Debug)]
pub struct MemorySink {
    active: AtomicBool,
    entries: Mutex<Vec<CallEntry>>,
}

impl MemorySink {
    /// An active, empty sink
    pub fn new() -> Self {
        MemorySink {
            active: AtomicBool::new(true),
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Switch recording on or off
    pub fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::SeqCst);
    }

    /// Copy of the persisted entries, in order
    pub fn entries(&self) -> Vec<CallEntry> {
        self.entries.lock().clone()
    }

    /// Method names of the persisted entries, in order
    pub fn method_names(&self) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .map(|e| e.method_name().to_string())
            .collect()
    }

    /// Take all entries, leaving the sink empty and numbering from 0
    pub fn drain(&self) -> Vec<CallEntry> {
        std::mem::take(&mut *self.entries.lock())
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for MemorySink {
    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    fn persist(&self, entry: &CallEntry) -> Result<u64> {
        let mut entries = self.entries.lock();
        entries.push(entry.clone());
        Ok(entries.len() as u64 - 1)
    }

    fn sequence(&self) -> u64 {
        self.entries.lock().len() as u64
    }
}
