//! Call recorder
//!
//! ## States
//!
//! | State | Depth | `enter` does |
//! |-------|-------|--------------|
//! | Idle | 0 | count, and persist when active |
//! | Nested | n > 0 | count only |
//!
//! The recorder belongs to one logical request. Proxies share it through an
//! `Arc`, so depth is per request rather than per process.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use callorder_core::{CallEntry, Result, StackCapture};
use callorder_sink::{DirectorySink, Sink};
use tracing::{debug, trace, warn};

use crate::config::{PersistFailurePolicy, RecordingConfig};

/// Depth-gated recorder for one logical request.
pub struct CallRecorder {
    depth: AtomicUsize,
    sink: Arc<dyn Sink>,
    enabled: bool,
    policy: PersistFailurePolicy,
    capture: StackCapture,
}

impl std::fmt::Debug for CallRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallRecorder")
            .field("depth", &self.depth())
            .field("enabled", &self.enabled)
            .field("policy", &self.policy)
            .field("capture", &self.capture)
            .finish_non_exhaustive()
    }
}

impl CallRecorder {
    /// Recorder over `sink` with the default configuration.
    pub fn new(sink: Arc<dyn Sink>) -> Self {
        Self::with_config(sink, &RecordingConfig::default())
    }

    /// Recorder over `sink`, taking switch, policy and stack capture from
    /// `config`. The sink options in `config` are not used.
    pub fn with_config(sink: Arc<dyn Sink>, config: &RecordingConfig) -> Self {
        CallRecorder {
            depth: AtomicUsize::new(0),
            sink,
            enabled: config.enabled,
            policy: config.persist_failure,
            capture: config.capture_stack,
        }
    }

    /// Recorder over a [`DirectorySink`] laid out by `config.sink`.
    pub fn from_config(config: &RecordingConfig) -> Self {
        let sink = Arc::new(DirectorySink::new(config.sink.clone()));
        Self::with_config(sink, config)
    }

    /// Current nesting depth
    pub fn depth(&self) -> usize {
        self.depth.load(Ordering::SeqCst)
    }

    /// Whether a top-level call made now would be persisted
    pub fn is_active(&self) -> bool {
        self.enabled && self.sink.is_active()
    }

    /// Sink entries go to
    pub fn sink(&self) -> &Arc<dyn Sink> {
        &self.sink
    }

    /// Write failure policy
    pub fn policy(&self) -> PersistFailurePolicy {
        self.policy
    }

    /// Record entry into an intercepted call.
    ///
    /// Depth is incremented before anything else and the returned guard
    /// decrements it when dropped. `build` runs only when this is a top-level
    /// call and recording is active; it receives the stack capture setting.
    ///
    /// # Errors
    ///
    /// Errors from `build` are returned as is. Errors from the sink are
    /// returned under [`PersistFailurePolicy::Propagate`] and logged under
    /// [`PersistFailurePolicy::Ignore`]. Depth is restored in every case.
    pub fn enter<F>(&self, method: &str, build: F) -> Result<CallGuard<'_>>
    where
        F: FnOnce(StackCapture) -> Result<CallEntry>,
    {
        let prior = self.depth.fetch_add(1, Ordering::SeqCst);
        let guard = CallGuard { recorder: self };
        trace!(method, depth = prior + 1, "enter");

        if prior != 0 {
            return Ok(guard);
        }
        if !self.is_active() {
            debug!(method, "recording inactive, call not persisted");
            return Ok(guard);
        }

        let entry = build(self.capture)?;
        match self.sink.persist(&entry) {
            Ok(sequence) => {
                debug!(method, sequence, "recorded top-level call");
                Ok(guard)
            }
            Err(e) if e.is_persistence() && !self.policy.propagates() => {
                warn!(method, error = %e, "failed to persist call entry");
                Ok(guard)
            }
            Err(e) => Err(e),
        }
    }

    fn exit(&self) {
        let prior = self.depth.fetch_sub(1, Ordering::SeqCst);
        trace!(depth = prior.saturating_sub(1), "exit");
    }
}

/// Scope of one intercepted call. Dropping it leaves the call.
#[must_use = "the call is left as soon as the guard is dropped"]
#[derive(Debug)]
pub struct CallGuard<'a> {
    recorder: &'a CallRecorder,
}

impl CallGuard<'_> {
    /// Depth while this guard is held
    pub fn depth(&self) -> usize {
        self.recorder.depth()
    }
}

impl Drop for CallGuard<'_> {
    fn drop(&mut self) {
        self.recorder.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use callorder_core::Error;
    use callorder_sink::MemorySink;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    fn entry(method: &str) -> impl FnOnce(StackCapture) -> Result<CallEntry> + '_ {
        move |capture| Ok(CallEntry::from_parts(method, vec![], capture.capture()))
    }

    fn memory() -> (Arc<MemorySink>, CallRecorder) {
        let sink = Arc::new(MemorySink::new());
        let recorder = CallRecorder::with_config(
            sink.clone(),
            &RecordingConfig::default().capture_stack(StackCapture::Never),
        );
        (sink, recorder)
    }

    /// Sink that is active but cannot write
    struct BrokenSink;

    impl Sink for BrokenSink {
        fn is_active(&self) -> bool {
            true
        }
        fn persist(&self, _entry: &CallEntry) -> Result<u64> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "marker vanished").into())
        }
        fn sequence(&self) -> u64 {
            0
        }
    }

    #[test]
    fn test_top_level_call_is_persisted() {
        let (sink, recorder) = memory();
        {
            let guard = recorder.enter("A.top", entry("A.top")).unwrap();
            assert_eq!(guard.depth(), 1);
        }
        assert_eq!(recorder.depth(), 0);
        assert_eq!(sink.method_names(), ["A.top"]);
        assert_eq!(sink.sequence(), 1);
    }

    #[test]
    fn test_nested_calls_are_counted_not_persisted() {
        let (sink, recorder) = memory();
        let outer = recorder.enter("A.outer", entry("A.outer")).unwrap();
        {
            let _inner = recorder.enter("A.inner", entry("A.inner")).unwrap();
            let _deeper = recorder.enter("B.deeper", entry("B.deeper")).unwrap();
            assert_eq!(recorder.depth(), 3);
        }
        assert_eq!(recorder.depth(), 1);
        drop(outer);

        assert_eq!(recorder.depth(), 0);
        assert_eq!(sink.method_names(), ["A.outer"]);
    }

    #[test]
    fn test_builder_not_run_when_nested_or_inactive() {
        let (sink, recorder) = memory();
        let _outer = recorder.enter("A.outer", entry("A.outer")).unwrap();
        let _inner = recorder
            .enter("A.inner", |_| panic!("nested entries are never built"))
            .unwrap();
        drop(_inner);
        drop(_outer);

        sink.set_active(false);
        let _guard = recorder
            .enter("A.off", |_| panic!("inactive entries are never built"))
            .unwrap();
    }

    #[test]
    fn test_disabled_config_records_nothing() {
        let sink = Arc::new(MemorySink::new());
        let recorder =
            CallRecorder::with_config(sink.clone(), &RecordingConfig::default().enabled(false));
        assert!(!recorder.is_active());
        drop(recorder.enter("A.b", entry("A.b")).unwrap());
        assert_eq!(sink.sequence(), 0);
    }

    #[test]
    fn test_toggle_between_calls() {
        let (sink, recorder) = memory();
        drop(recorder.enter("A.first", entry("A.first")).unwrap());
        sink.set_active(false);
        drop(recorder.enter("A.second", entry("A.second")).unwrap());

        assert_eq!(sink.method_names(), ["A.first"]);
        assert_eq!(sink.sequence(), 1);
    }

    #[test]
    fn test_build_error_restores_depth() {
        let (sink, recorder) = memory();
        let err = recorder
            .enter("A.bad", |_| {
                Err(Error::ArgumentCountMismatch {
                    method: "A.bad".into(),
                    declared: 1,
                    supplied: 2,
                })
            })
            .unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(recorder.depth(), 0);
        assert_eq!(sink.sequence(), 0);
    }

    #[test]
    fn test_panic_inside_call_restores_depth() {
        let (_sink, recorder) = memory();
        let result = catch_unwind(AssertUnwindSafe(|| {
            let _outer = recorder.enter("A.outer", entry("A.outer")).unwrap();
            let _inner = recorder.enter("A.inner", entry("A.inner")).unwrap();
            panic!("provider blew up");
        }));
        assert!(result.is_err());
        assert_eq!(recorder.depth(), 0);
    }

    #[test]
    fn test_persist_failure_propagates_by_default() {
        let recorder = CallRecorder::new(Arc::new(BrokenSink));
        let err = recorder.enter("A.b", entry("A.b")).unwrap_err();
        assert!(err.is_persistence());
        assert_eq!(recorder.depth(), 0);
    }

    #[test]
    fn test_persist_failure_ignored_when_configured() {
        let recorder = CallRecorder::with_config(
            Arc::new(BrokenSink),
            &RecordingConfig::default().persist_failure(PersistFailurePolicy::Ignore),
        );
        let guard = recorder.enter("A.b", entry("A.b")).unwrap();
        assert_eq!(guard.depth(), 1);
        drop(guard);
        assert_eq!(recorder.depth(), 0);
    }

    #[test]
    fn test_fatal_error_propagates_even_when_ignoring() {
        let recorder = CallRecorder::with_config(
            Arc::new(MemorySink::new()),
            &RecordingConfig::default().persist_failure(PersistFailurePolicy::Ignore),
        );
        let err = recorder
            .enter("A.b", |_| {
                Err(Error::UnknownOperation {
                    capability: "A".into(),
                    operation: "b".into(),
                })
            })
            .unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_from_config_uses_directory_sink() {
        let temp = tempfile::tempdir().unwrap();
        let config = RecordingConfig::new(temp.path()).capture_stack(StackCapture::Never);
        let recorder = CallRecorder::from_config(&config);
        assert!(!recorder.is_active());

        DirectorySink::new(config.sink.clone()).enable().unwrap();
        assert!(recorder.is_active());
        drop(recorder.enter("A.b", entry("A.b")).unwrap());
        assert!(config.sink.entry_path(0).is_file());
    }
}
