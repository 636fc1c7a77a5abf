//! Paging capability

use std::sync::Arc;

use callorder_core::metadata::{ResourceQuery, ResourceType};
use callorder_core::{CapabilityDescriptor, OperationDescriptor, Result, Value};
use callorder_recorder::{CallGuard, CallRecorder};

use crate::logger::CapabilityLogger;

/// Provider-side server-driven paging.
pub trait PagingProvider {
    /// Position `query` after the page the client's continuation token names.
    fn set_continuation_token(
        &self,
        query: &ResourceQuery,
        resource_type: &ResourceType,
        continuation_token: &[Value],
    ) -> Result<()>;

    /// Token for the page following the one just enumerated, empty when it
    /// was the last.
    fn get_continuation_token(&self, enumerator: &ResourceQuery) -> Result<Vec<Value>>;
}

/// Operation declarations
pub mod ops {
    use super::OperationDescriptor;

    /// `set_continuation_token`
    pub const SET_CONTINUATION_TOKEN: OperationDescriptor = OperationDescriptor::new(
        "set_continuation_token",
        &["query", "resource_type", "continuation_token"],
    );
    /// `get_continuation_token`
    pub const GET_CONTINUATION_TOKEN: OperationDescriptor =
        OperationDescriptor::new("get_continuation_token", &["enumerator"]);
}

/// `PagingProvider` operation table
pub static PAGING_PROVIDER: CapabilityDescriptor = CapabilityDescriptor::new(
    "PagingProvider",
    &[ops::SET_CONTINUATION_TOKEN, ops::GET_CONTINUATION_TOKEN],
);

/// Logger for [`PagingProvider`] calls.
#[derive(Debug, Clone)]
pub struct PagingLogger {
    logger: CapabilityLogger,
}

impl PagingLogger {
    /// Bind to `recorder`
    pub fn new(recorder: Arc<CallRecorder>) -> Result<Self> {
        Ok(PagingLogger {
            logger: CapabilityLogger::new(recorder, &PAGING_PROVIDER)?,
        })
    }

    /// The token is recorded by shape, `object[N]`.
    pub fn set_continuation_token(
        &self,
        query: &ResourceQuery,
        resource_type: &ResourceType,
        continuation_token: &[Value],
    ) -> Result<CallGuard<'_>> {
        self.logger.log(
            &ops::SET_CONTINUATION_TOKEN,
            vec![
                query.expression.as_str().into(),
                resource_type.full_name.as_str().into(),
                continuation_token.into(),
            ],
        )
    }

    /// Log `PagingProvider.get_continuation_token`
    pub fn get_continuation_token(&self, enumerator: &ResourceQuery) -> Result<CallGuard<'_>> {
        self.logger.log(
            &ops::GET_CONTINUATION_TOKEN,
            vec![enumerator.expression.as_str().into()],
        )
    }
}
