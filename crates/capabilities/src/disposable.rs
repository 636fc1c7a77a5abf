//! Disposal protocol

use std::sync::Arc;

use callorder_core::{CapabilityDescriptor, OperationDescriptor, Result};
use callorder_recorder::{CallGuard, CallRecorder};

use crate::logger::CapabilityLogger;

/// Explicit release of provider resources.
///
/// Called at most once by a proxy; a provider that is disposed twice by
/// other means should treat the second call as a no-op.
pub trait Dispose {
    /// Release resources held by the provider
    fn dispose(&mut self) -> Result<()>;
}

/// Operation declarations
pub mod ops {
    use super::OperationDescriptor;

    /// `dispose`
    pub const DISPOSE: OperationDescriptor = OperationDescriptor::new("dispose", &[]);
}

/// `Disposable` operation table
pub static DISPOSABLE: CapabilityDescriptor = CapabilityDescriptor::new("Disposable", &[ops::DISPOSE]);

/// Logger for [`Dispose`] calls.
#[derive(Debug, Clone)]
pub struct DisposeLogger {
    logger: CapabilityLogger,
}

impl DisposeLogger {
    /// Bind to `recorder`
    pub fn new(recorder: Arc<CallRecorder>) -> Result<Self> {
        Ok(DisposeLogger {
            logger: CapabilityLogger::new(recorder, &DISPOSABLE)?,
        })
    }

    /// Log `Disposable.dispose`
    pub fn dispose(&self) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::DISPOSE, vec![])
    }
}
