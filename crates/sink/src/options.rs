//! Sink options
//!
//! Where the log directory lives and how its files are named.
//!
//! ```ignore
//! use callorder_sink::SinkOptions;
//!
//! let opts = SinkOptions::new("/tmp/run-42").sequence_width(6);
//! assert_eq!(opts.entry_file_name(7), "000007.xml");
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default log directory name under the base path
pub const DEFAULT_DIRECTORY_NAME: &str = "CallOrderLog";

/// Default marker file name inside the log directory
pub const DEFAULT_MARKER_NAME: &str = "recording.enabled";

/// Default entry file extension
pub const DEFAULT_EXTENSION: &str = "xml";

/// Default zero-padded width of entry file names
pub const DEFAULT_SEQUENCE_WIDTH: usize = 8;

/// Layout of a log directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SinkOptions {
    /// Host-determined base path
    pub base_path: PathBuf,
    /// Log directory name under `base_path`
    pub directory_name: String,
    /// Marker file name inside the log directory
    pub marker_name: String,
    /// Entry file extension (without the dot)
    pub extension: String,
    /// Zero-padded width of the sequence part of entry file names
    pub sequence_width: usize,
}

impl SinkOptions {
    /// Default layout under `base_path`
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        SinkOptions {
            base_path: base_path.into(),
            ..Default::default()
        }
    }

    /// Set the log directory name
    pub fn directory_name(mut self, name: impl Into<String>) -> Self {
        self.directory_name = name.into();
        self
    }

    /// Set the marker file name
    pub fn marker_name(mut self, name: impl Into<String>) -> Self {
        self.marker_name = name.into();
        self
    }

    /// Set the entry file extension
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Set the sequence width
    pub fn sequence_width(mut self, width: usize) -> Self {
        self.sequence_width = width;
        self
    }

    /// `<base_path>/<directory_name>`
    pub fn log_dir(&self) -> PathBuf {
        self.base_path.join(&self.directory_name)
    }

    /// `<base_path>/<directory_name>/<marker_name>`
    pub fn marker_path(&self) -> PathBuf {
        self.log_dir().join(&self.marker_name)
    }

    /// File name for entry `sequence`, e.g. `00000003.xml`
    pub fn entry_file_name(&self, sequence: u64) -> String {
        format!(
            "{:0width$}.{}",
            sequence,
            self.extension,
            width = self.sequence_width
        )
    }

    /// Full path for entry `sequence`
    pub fn entry_path(&self, sequence: u64) -> PathBuf {
        self.log_dir().join(self.entry_file_name(sequence))
    }

    /// Sequence number of an entry file, or `None` for any other file.
    pub fn parse_sequence(&self, path: &Path) -> Option<u64> {
        let name = path.file_name()?.to_str()?;
        let stem = name.strip_suffix(&self.extension)?.strip_suffix('.')?;
        if stem.len() < self.sequence_width || !stem.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        stem.parse().ok()
    }
}

impl Default for SinkOptions {
    fn default() -> Self {
        SinkOptions {
            base_path: PathBuf::from("."),
            directory_name: DEFAULT_DIRECTORY_NAME.to_string(),
            marker_name: DEFAULT_MARKER_NAME.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
            sequence_width: DEFAULT_SEQUENCE_WIDTH,
        }
    }
}
