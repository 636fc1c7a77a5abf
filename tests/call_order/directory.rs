//! Log Directory Tests
//!
//! Marker toggling, entry file naming and write failures against a real
//! directory.

use std::fs;

use crate::*;

// =============================================================================
// MARKER
// =============================================================================

#[test]
fn test_marker_toggles_recording_between_calls() {
    let fx = directory_fixture();
    let store = fx.instr.wrap(Store::default());

    store.save_changes().unwrap();
    fx.control().disable().unwrap();
    store.clear_changes().unwrap();
    assert!(!fx.instr.is_recording());
    fx.control().enable().unwrap();
    store.save_changes().unwrap();

    fx.log()
        .assert_order(&["UpdateProvider.save_changes", "UpdateProvider.save_changes"])
        .unwrap();
    let names: Vec<String> = fx
        .control()
        .entry_paths()
        .unwrap()
        .iter()
        .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect();
    assert_eq!(
        names,
        [fx.config.sink.entry_file_name(0), fx.config.sink.entry_file_name(1)]
    );
}

#[test]
fn test_removed_directory_means_inactive() {
    let fx = directory_fixture();
    let store = fx.instr.wrap(Store::default());

    fs::remove_dir_all(fx.config.sink.log_dir()).unwrap();
    store.save_changes().unwrap();

    assert!(fx.log().is_empty());
    assert_eq!(fx.instr.depth(), 0);
}

// =============================================================================
// ENTRY FILES
// =============================================================================

#[test]
fn test_file_names_sort_in_call_order() {
    let fx = directory_fixture();
    let store = fx.instr.wrap(Store::default());
    let resource = customer(1);

    for i in 0..12 {
        store
            .set_value(&resource, &format!("P{}", i), &Value::Int(i))
            .unwrap();
    }

    let log = fx.log();
    assert_eq!(log.len(), 12);
    for (i, entry) in log.entries().iter().enumerate() {
        assert_eq!(entry.argument("property_name"), Some(format!("P{}", i).as_str()));
    }
}

#[test]
fn test_entry_file_is_self_describing() {
    let fx = directory_fixture();
    let store = fx.instr.wrap(Store::default());
    store
        .set_value(&customer(1), "City", &Value::from("Berlin"))
        .unwrap();

    let text = fs::read_to_string(fx.config.sink.entry_path(0)).unwrap();
    assert!(text.contains("<UpdateProvider.set_value>"));
    // base64("Berlin")
    assert!(text.contains("<property_value>QmVybGlu</property_value>"));

    let entry = decode_entry(&text).unwrap();
    assert_eq!(entry.argument("property_value"), Some("Berlin"));
}

#[test]
fn test_request_contexts_share_entry_numbering() {
    let fx = directory_fixture();
    let first = Instrumentation::from_config(&fx.config).unwrap();
    let second = Instrumentation::from_config(&fx.config).unwrap();

    first.wrap(Store::default()).save_changes().unwrap();
    second.wrap(Store::default()).clear_changes().unwrap();
    first.wrap(Store::default()).save_changes().unwrap();

    // A context opened after the others picks up where the directory ends.
    let late = Instrumentation::from_config(&fx.config).unwrap();
    late.wrap(Store::default()).clear_changes().unwrap();

    let log = fx.log();
    assert_eq!(log.len(), 4);
    log.assert_order(&[
        "UpdateProvider.save_changes",
        "UpdateProvider.clear_changes",
        "UpdateProvider.save_changes",
        "UpdateProvider.clear_changes",
    ])
    .unwrap();
    for number in 0..4 {
        assert!(fx.config.sink.entry_path(number).exists());
    }
    assert_eq!(late.recorder().sink().sequence(), 4);
}

#[test]
fn test_stack_trace_is_written_when_captured() {
    let temp = TempDir::new().unwrap();
    let config = RecordingConfig::new(temp.path()).capture_stack(StackCapture::Always);
    DirectorySink::new(config.sink.clone()).enable().unwrap();
    let instr = Instrumentation::from_config(&config).unwrap();

    instr.wrap(Store::default()).save_changes().unwrap();

    let log = CallLog::load(&config.sink).unwrap();
    assert!(!log.entries()[0].stack_trace().is_empty());
}

// =============================================================================
// WRITE FAILURES
// =============================================================================

/// Sink whose activity check always passes, standing in for a directory
/// removed between the check and the write
struct StaleCheck {
    inner: DirectorySink,
}

impl Sink for StaleCheck {
    fn is_active(&self) -> bool {
        true
    }

    fn persist(&self, entry: &CallEntry) -> Result<u64> {
        self.inner.persist(entry)
    }

    fn sequence(&self) -> u64 {
        self.inner.sequence()
    }
}

fn stale_fixture(policy: PersistFailurePolicy) -> (TempDir, RecordingConfig, Instrumentation) {
    let temp = TempDir::new().unwrap();
    let config = RecordingConfig::new(temp.path())
        .capture_stack(StackCapture::Never)
        .persist_failure(policy);
    let inner = DirectorySink::new(config.sink.clone());
    let instr = Instrumentation::with_sink(Arc::new(StaleCheck { inner }), &config).unwrap();
    (temp, config, instr)
}

#[test]
fn test_write_failure_fails_call_by_default() {
    let (_temp, _config, instr) = stale_fixture(PersistFailurePolicy::Propagate);
    let hooks = instr.wrap(Hooks::default());
    let args = HandleExceptionArgs::new("IOException", "disk full", 500);

    let err = hooks.handle_exception(&args).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert_eq!(hooks.inner().map(|h| h.calls.get()), Some(0));
    assert_eq!(instr.depth(), 0);
}

#[test]
fn test_write_failure_ignored_when_configured() {
    let (_temp, _config, instr) = stale_fixture(PersistFailurePolicy::Ignore);
    let hooks = instr.wrap(Hooks::default());
    let args = HandleExceptionArgs::new("IOException", "disk full", 500);

    hooks.handle_exception(&args).unwrap();
    assert_eq!(hooks.inner().map(|h| h.calls.get()), Some(1));
    assert_eq!(instr.depth(), 0);
}

#[test]
fn test_ignored_write_failure_leaves_number_free() {
    let (_temp, config, instr) = stale_fixture(PersistFailurePolicy::Ignore);
    let store = instr.wrap(Store::default());

    store.save_changes().unwrap();
    assert_eq!(instr.recorder().sink().sequence(), 0);

    DirectorySink::new(config.sink.clone()).enable().unwrap();
    store.clear_changes().unwrap();

    let text = fs::read_to_string(config.sink.entry_path(0)).unwrap();
    assert!(text.contains("<UpdateProvider.clear_changes>"));
    assert!(!config.sink.entry_path(1).exists());
    assert_eq!(instr.recorder().sink().sequence(), 1);
    CallLog::load(&config.sink)
        .unwrap()
        .assert_order(&["UpdateProvider.clear_changes"])
        .unwrap();
}
