//! Marker-activated log directory sink
//!
//! ## Layout
//!
//! ```text
//! <base>/CallOrderLog/
//!     recording.enabled      marker: recording is on while this exists
//!     00000000.xml           first persisted entry
//!     00000001.xml           second persisted entry
//! ```
//!
//! Activation is checked against the file system on every call, so creating
//! or removing the marker takes effect on the next intercepted call.
//!
//! Entry files are opened with `create_new` and never overwritten. Numbering
//! resumes after the highest entry already in the directory, so several sinks
//! over one directory (one per request) keep a single gap-free sequence. A
//! number is consumed only once its file has been written.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use callorder_core::{CallEntry, Result};
use callorder_wire::encode_entry;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::options::SinkOptions;
use crate::Sink;

/// Sink writing one file per entry into a log directory.
#[derive(Debug)]
pub struct DirectorySink {
    options: SinkOptions,
    /// Next sequence number; held locked across name allocation and write
    sequence: Mutex<u64>,
}

impl DirectorySink {
    /// Sink for the given layout, numbering after the last entry already on
    /// disk (from 0 for an empty or missing directory).
    pub fn new(options: SinkOptions) -> Self {
        let next = next_free_sequence(&options).unwrap_or_else(|e| {
            warn!(dir = %options.log_dir().display(), error = %e, "could not scan log directory");
            0
        });
        DirectorySink {
            options,
            sequence: Mutex::new(next),
        }
    }

    /// Sink with the default layout under `base_path`.
    pub fn open(base_path: impl Into<PathBuf>) -> Self {
        Self::new(SinkOptions::new(base_path))
    }

    /// Layout in use
    pub fn options(&self) -> &SinkOptions {
        &self.options
    }

    /// Log directory path
    pub fn log_dir(&self) -> PathBuf {
        self.options.log_dir()
    }

    /// Create the log directory and marker, switching recording on.
    pub fn enable(&self) -> Result<()> {
        fs::create_dir_all(self.options.log_dir())?;
        let marker = self.options.marker_path();
        if !marker.exists() {
            fs::File::create(&marker)?;
        }
        debug!(marker = %marker.display(), "recording enabled");
        Ok(())
    }

    /// Remove the marker, switching recording off. Entry files are kept.
    pub fn disable(&self) -> Result<()> {
        let marker = self.options.marker_path();
        match fs::remove_file(&marker) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        debug!(marker = %marker.display(), "recording disabled");
        Ok(())
    }

    /// Entry files currently in the log directory, in sequence order.
    ///
    /// A missing log directory yields an empty list.
    pub fn entry_paths(&self) -> Result<Vec<PathBuf>> {
        list_entry_files(&self.options)
    }

    /// Delete every entry file and restart numbering at 0.
    pub fn clear(&self) -> Result<usize> {
        let mut sequence = self.sequence.lock();
        let paths = self.entry_paths()?;
        for path in &paths {
            fs::remove_file(path)?;
        }
        *sequence = 0;
        debug!(removed = paths.len(), "cleared call order log");
        Ok(paths.len())
    }
}

impl Sink for DirectorySink {
    fn is_active(&self) -> bool {
        self.options.log_dir().is_dir() && self.options.marker_path().is_file()
    }

    fn persist(&self, entry: &CallEntry) -> Result<u64> {
        let text = encode_entry(entry)?;
        let mut sequence = self.sequence.lock();

        let (number, mut file) = match self.create_entry_file(*sequence) {
            Ok(file) => (*sequence, file),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                // Another sink over the same directory got there first.
                let next = next_free_sequence(&self.options)?.max(*sequence + 1);
                debug!(taken = *sequence, next, "entry number in use, resuming after it");
                (next, self.create_entry_file(next)?)
            }
            Err(e) => return Err(e.into()),
        };

        let path = self.options.entry_path(number);
        if let Err(e) = file.write_all(text.as_bytes()) {
            drop(file);
            if let Err(cleanup) = fs::remove_file(&path) {
                warn!(path = %path.display(), error = %cleanup, "could not remove partial entry file");
            }
            return Err(e.into());
        }
        *sequence = number + 1;

        debug!(
            sequence = number,
            method = entry.method_name(),
            path = %path.display(),
            "persisted call entry"
        );
        Ok(number)
    }

    fn sequence(&self) -> u64 {
        *self.sequence.lock()
    }
}

impl DirectorySink {
    fn create_entry_file(&self, number: u64) -> io::Result<File> {
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.options.entry_path(number))
    }
}

/// One past the highest entry number on disk; 0 when there is none.
pub(crate) fn next_free_sequence(options: &SinkOptions) -> Result<u64> {
    Ok(list_entry_files(options)?
        .iter()
        .filter_map(|path| options.parse_sequence(path))
        .max()
        .map_or(0, |highest| highest + 1))
}

/// Entry files under a layout's log directory, sorted by file name.
pub(crate) fn list_entry_files(options: &SinkOptions) -> Result<Vec<PathBuf>> {
    let dir = options.log_dir();
    let read = match fs::read_dir(&dir) {
        Ok(read) => read,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut paths = Vec::new();
    for item in read {
        let path = item?.path();
        if path.is_file() && options.parse_sequence(&path).is_some() {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| file_name(a).cmp(file_name(b)));
    Ok(paths)
}

fn file_name(path: &Path) -> &std::ffi::OsStr {
    path.file_name().unwrap_or_default()
}
