//! Recording configuration
//!
//! Every field has a default, so an empty file is a valid configuration.
//!
//! ```toml
//! enabled = true
//! persist_failure = "ignore"
//! capture_stack = "never"
//!
//! [sink]
//! base_path = "target/call-order"
//! sequence_width = 6
//! ```

use std::path::Path;

use callorder_core::{Error, Result, StackCapture};
use callorder_sink::SinkOptions;
use serde::Deserialize;

/// What happens when an entry cannot be written.
///
/// The sink can stop being writable between the activity check and the write
/// (the marker or directory removed mid-call, a full disk).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistFailurePolicy {
    /// Fail the intercepted call with the write error
    #[default]
    Propagate,
    /// Log a warning and let the intercepted call proceed
    Ignore,
}

impl PersistFailurePolicy {
    /// Whether write errors reach the caller
    pub fn propagates(&self) -> bool {
        matches!(self, PersistFailurePolicy::Propagate)
    }
}

/// Recording configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RecordingConfig {
    /// Master switch; when false nothing is recorded whatever the sink says
    pub enabled: bool,
    /// Log directory layout
    pub sink: SinkOptions,
    /// Handling of write failures
    pub persist_failure: PersistFailurePolicy,
    /// Stack capture for new entries
    pub capture_stack: StackCapture,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        RecordingConfig {
            enabled: true,
            sink: SinkOptions::default(),
            persist_failure: PersistFailurePolicy::default(),
            capture_stack: StackCapture::default(),
        }
    }
}

impl RecordingConfig {
    /// Default configuration writing under `base_path`
    pub fn new(base_path: impl Into<std::path::PathBuf>) -> Self {
        RecordingConfig {
            sink: SinkOptions::new(base_path),
            ..Default::default()
        }
    }

    /// Parse a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    /// Read and parse a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// Set the master switch
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the write failure policy
    pub fn persist_failure(mut self, policy: PersistFailurePolicy) -> Self {
        self.persist_failure = policy;
        self
    }

    /// Set stack capture
    pub fn capture_stack(mut self, capture: StackCapture) -> Self {
        self.capture_stack = capture;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_empty_document_is_default() {
        let config = RecordingConfig::from_toml_str("").unwrap();
        assert_eq!(config, RecordingConfig::default());
        assert!(config.enabled);
        assert!(config.persist_failure.propagates());
    }

    #[test]
    fn test_full_document() {
        let config = RecordingConfig::from_toml_str(
            r#"
            enabled = false
            persist_failure = "ignore"
            capture_stack = "never"

            [sink]
            base_path = "target/call-order"
            marker_name = "on"
            sequence_width = 6
            "#,
        )
        .unwrap();

        assert!(!config.enabled);
        assert_eq!(config.persist_failure, PersistFailurePolicy::Ignore);
        assert_eq!(config.capture_stack, StackCapture::Never);
        assert_eq!(config.sink.base_path, PathBuf::from("target/call-order"));
        assert_eq!(config.sink.marker_name, "on");
        assert_eq!(config.sink.directory_name, "CallOrderLog");
        assert_eq!(config.sink.sequence_width, 6);
    }

    #[test]
    fn test_unknown_policy_is_config_error() {
        let err = RecordingConfig::from_toml_str(r#"persist_failure = "retry""#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_from_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("callorder.toml");
        std::fs::write(&path, "capture_stack = \"always\"\n").unwrap();
        let config = RecordingConfig::from_file(&path).unwrap();
        assert_eq!(config.capture_stack, StackCapture::Always);

        let missing = RecordingConfig::from_file(temp.path().join("nope.toml")).unwrap_err();
        assert!(matches!(missing, Error::Config(_)));
    }

    #[test]
    fn test_builder() {
        let config = RecordingConfig::new("/tmp/x")
            .enabled(false)
            .persist_failure(PersistFailurePolicy::Ignore)
            .capture_stack(StackCapture::Never);
        assert_eq!(config.sink.base_path, PathBuf::from("/tmp/x"));
        assert!(!config.enabled);
    }
}
