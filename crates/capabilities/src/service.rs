//! Service-level hooks
//!
//! Request and changeset lifecycle notifications plus exception handling.
//! Every hook takes a structured argument bundle, expanded into named slots:
//!
//! | Bundle | Slots |
//! |--------|-------|
//! | `ProcessRequestArgs` | `request.uri`, `request.is_batch_operation`, `operation_context.*` |
//! | `ChangesetArgs` | `changeset.index`, `changeset.operation_count`, `operation_context.*` |
//! | `HandleExceptionArgs` | `exception.*` |

use std::sync::Arc;

use callorder_core::metadata::{ChangesetArgs, HandleExceptionArgs, ProcessRequestArgs};
use callorder_core::{CapabilityDescriptor, OperationDescriptor, Result, Value};
use callorder_recorder::{CallGuard, CallRecorder};

use crate::logger::{context_values, exception_values, CapabilityLogger};

/// Provider-side lifecycle hooks.
pub trait ServiceHooks {
    /// First notification for an incoming request
    fn on_start_processing_request(&self, args: &ProcessRequestArgs) -> Result<()>;
    /// Request is about to be processed
    fn processing_request(&self, args: &ProcessRequestArgs) -> Result<()>;
    /// Request has been processed
    fn processed_request(&self, args: &ProcessRequestArgs) -> Result<()>;
    /// Changeset within a batch is about to be processed
    fn processing_changeset(&self, args: &ChangesetArgs) -> Result<()>;
    /// Changeset within a batch has been processed
    fn processed_changeset(&self, args: &ChangesetArgs) -> Result<()>;
    /// Processing failed
    fn handle_exception(&self, args: &HandleExceptionArgs) -> Result<()>;
}

/// Operation declarations
pub mod ops {
    use super::OperationDescriptor;

    const REQUEST: &[&str] = &[
        "request.uri",
        "request.is_batch_operation",
        "operation_context.absolute_request_uri",
        "operation_context.absolute_service_uri",
        "operation_context.request_method",
    ];
    const CHANGESET: &[&str] = &[
        "changeset.index",
        "changeset.operation_count",
        "operation_context.absolute_request_uri",
        "operation_context.absolute_service_uri",
        "operation_context.request_method",
    ];

    /// `on_start_processing_request`
    pub const ON_START_PROCESSING_REQUEST: OperationDescriptor =
        OperationDescriptor::new("on_start_processing_request", REQUEST);
    /// `processing_request`
    pub const PROCESSING_REQUEST: OperationDescriptor = OperationDescriptor::new("processing_request", REQUEST);
    /// `processed_request`
    pub const PROCESSED_REQUEST: OperationDescriptor = OperationDescriptor::new("processed_request", REQUEST);
    /// `processing_changeset`
    pub const PROCESSING_CHANGESET: OperationDescriptor =
        OperationDescriptor::new("processing_changeset", CHANGESET);
    /// `processed_changeset`
    pub const PROCESSED_CHANGESET: OperationDescriptor = OperationDescriptor::new("processed_changeset", CHANGESET);
    /// `handle_exception`
    pub const HANDLE_EXCEPTION: OperationDescriptor = OperationDescriptor::new(
        "handle_exception",
        &[
            "exception.type",
            "exception.message",
            "exception.response_status_code",
            "exception.use_verbose_errors",
            "exception.response_content_type",
            "exception.response_written",
        ],
    );
}

/// `ServiceHooks` operation table
pub static SERVICE_HOOKS: CapabilityDescriptor = CapabilityDescriptor::new(
    "ServiceHooks",
    &[
        ops::ON_START_PROCESSING_REQUEST,
        ops::PROCESSING_REQUEST,
        ops::PROCESSED_REQUEST,
        ops::PROCESSING_CHANGESET,
        ops::PROCESSED_CHANGESET,
        ops::HANDLE_EXCEPTION,
    ],
);

/// Logger for [`ServiceHooks`] calls.
#[derive(Debug, Clone)]
pub struct ServiceLogger {
    logger: CapabilityLogger,
}

impl ServiceLogger {
    /// Bind to `recorder`
    pub fn new(recorder: Arc<CallRecorder>) -> Result<Self> {
        Ok(ServiceLogger {
            logger: CapabilityLogger::new(recorder, &SERVICE_HOOKS)?,
        })
    }

    /// Log `ServiceHooks.on_start_processing_request`
    pub fn on_start_processing_request(&self, args: &ProcessRequestArgs) -> Result<CallGuard<'_>> {
        self.logger
            .log(&ops::ON_START_PROCESSING_REQUEST, request_values(args))
    }

    /// Log `ServiceHooks.processing_request`
    pub fn processing_request(&self, args: &ProcessRequestArgs) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::PROCESSING_REQUEST, request_values(args))
    }

    /// Log `ServiceHooks.processed_request`
    pub fn processed_request(&self, args: &ProcessRequestArgs) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::PROCESSED_REQUEST, request_values(args))
    }

    /// Log `ServiceHooks.processing_changeset`
    pub fn processing_changeset(&self, args: &ChangesetArgs) -> Result<CallGuard<'_>> {
        self.logger
            .log(&ops::PROCESSING_CHANGESET, changeset_values(args))
    }

    /// Log `ServiceHooks.processed_changeset`
    pub fn processed_changeset(&self, args: &ChangesetArgs) -> Result<CallGuard<'_>> {
        self.logger
            .log(&ops::PROCESSED_CHANGESET, changeset_values(args))
    }

    /// Log `ServiceHooks.handle_exception`
    pub fn handle_exception(&self, args: &HandleExceptionArgs) -> Result<CallGuard<'_>> {
        self.logger
            .log(&ops::HANDLE_EXCEPTION, exception_values(args).into())
    }
}

fn request_values(args: &ProcessRequestArgs) -> Vec<Value> {
    let mut values = vec![
        args.request_uri.as_str().into(),
        args.is_batch_operation.into(),
    ];
    values.extend(context_values(&args.operation_context));
    values
}

fn changeset_values(args: &ChangesetArgs) -> Vec<Value> {
    let mut values = vec![args.index.into(), args.operation_count.into()];
    values.extend(context_values(&args.operation_context));
    values
}
