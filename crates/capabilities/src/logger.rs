//! Shared logging routine behind every typed capability logger

use std::sync::Arc;

use callorder_core::entry::check_argument_count;
use callorder_core::metadata::{HandleExceptionArgs, OperationContext};
use callorder_core::{CallEntry, CapabilityDescriptor, OperationDescriptor, Result, Value};
use callorder_recorder::{CallGuard, CallRecorder};
use tracing::error;

/// Logger for one capability family, bound to one recorder.
///
/// Holds no per-call state. Cloning shares the recorder.
#[derive(Debug, Clone)]
pub struct CapabilityLogger {
    recorder: Arc<CallRecorder>,
    descriptor: &'static CapabilityDescriptor,
}

impl CapabilityLogger {
    /// Bind `descriptor` to `recorder`.
    ///
    /// # Errors
    ///
    /// `Error::InvalidDescriptor` if the operation table is malformed.
    pub fn new(recorder: Arc<CallRecorder>, descriptor: &'static CapabilityDescriptor) -> Result<Self> {
        descriptor.validate()?;
        Ok(CapabilityLogger {
            recorder,
            descriptor,
        })
    }

    /// Operation table
    pub fn descriptor(&self) -> &'static CapabilityDescriptor {
        self.descriptor
    }

    /// Recorder calls are reported to
    pub fn recorder(&self) -> &Arc<CallRecorder> {
        &self.recorder
    }

    /// Resolve a declared operation by name.
    ///
    /// # Errors
    ///
    /// `Error::UnknownOperation` if the table does not declare it.
    pub fn operation(&self, name: &str) -> Result<&'static OperationDescriptor> {
        self.descriptor.operation(name)
    }

    /// Report a call of `operation` with `values` in declared parameter order.
    ///
    /// The operation must be declared by this logger's table and `values`
    /// must not outnumber its parameters. Both are checked on every call,
    /// nested or not, before the recorder is entered.
    pub fn log(&self, operation: &OperationDescriptor, values: Vec<Value>) -> Result<CallGuard<'_>> {
        let declared = self.operation(operation.name)?;
        let method = self.descriptor.qualified_name(declared);
        if let Err(e) = check_argument_count(&method, declared, values.len()) {
            error!(method = %method, error = %e, "logger out of sync with operation table");
            return Err(e);
        }

        let descriptor = self.descriptor;
        self.recorder.enter(&method, move |capture| {
            CallEntry::for_operation(descriptor, declared, &values, capture)
        })
    }
}

/// Parameter names an [`OperationContext`] expands into
pub const OPERATION_CONTEXT_PARAMS: [&str; 3] = [
    "operation_context.absolute_request_uri",
    "operation_context.absolute_service_uri",
    "operation_context.request_method",
];

/// Values for [`OPERATION_CONTEXT_PARAMS`], in the same order
pub(crate) fn context_values(context: &OperationContext) -> [Value; 3] {
    [
        context.absolute_request_uri.as_str().into(),
        context.absolute_service_uri.as_str().into(),
        context.request_method.as_str().into(),
    ]
}

/// Parameter names a [`HandleExceptionArgs`] expands into
pub const EXCEPTION_PARAMS: [&str; 6] = [
    "exception.type",
    "exception.message",
    "exception.response_status_code",
    "exception.use_verbose_errors",
    "exception.response_content_type",
    "exception.response_written",
];

/// Values for [`EXCEPTION_PARAMS`], in the same order
pub(crate) fn exception_values(args: &HandleExceptionArgs) -> [Value; 6] {
    [
        args.exception_type.as_str().into(),
        args.message.as_str().into(),
        args.response_status_code.into(),
        args.use_verbose_errors.into(),
        args.response_content_type.as_deref().into(),
        args.response_written.into(),
    ]
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use callorder_core::StackCapture;
    use callorder_recorder::RecordingConfig;
    use callorder_sink::MemorySink;

    /// Recorder over an active in-memory sink without stack capture
    pub fn recorder() -> (Arc<MemorySink>, Arc<CallRecorder>) {
        let sink = Arc::new(MemorySink::new());
        let recorder = CallRecorder::with_config(
            sink.clone(),
            &RecordingConfig::default().capture_stack(StackCapture::Never),
        );
        (sink, Arc::new(recorder))
    }

    /// Argument pairs of the only recorded entry
    pub fn only_entry(sink: &MemorySink) -> CallEntry {
        let mut entries = sink.drain();
        assert_eq!(entries.len(), 1, "expected exactly one entry");
        entries.remove(0)
    }

    /// Argument pairs as borrowed strings
    pub fn pairs(entry: &CallEntry) -> Vec<(&str, &str)> {
        entry
            .arguments()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}
