//! Capability traits and loggers for callorder
//!
//! Each capability family a provider can implement lives in its own module
//! and carries three things:
//!
//! - the trait itself (`UpdateProvider`, `StreamProvider`, ...)
//! - a static operation table (`UPDATE_PROVIDER`, `STREAM_PROVIDER`, ...)
//!   declaring every operation and the names its arguments are recorded under
//! - a typed logger with one method per operation, returning the recorder's
//!   [`CallGuard`](callorder_recorder::CallGuard) for the call
//!
//! | Module | Tables |
//! |--------|--------|
//! | [`update`] | `UpdateProvider` |
//! | [`metadata`] | `MetadataProvider` |
//! | [`query`] | `QueryProvider` |
//! | [`stream`] | `StreamProvider`, `DataStream` |
//! | [`host`] | `HostProvider` |
//! | [`paging`] | `PagingProvider` |
//! | [`service`] | `ServiceHooks` |
//! | [`disposable`] | `Disposable` |

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod disposable;
pub mod host;
pub mod logger;
pub mod metadata;
pub mod paging;
pub mod query;
pub mod service;
pub mod stream;
pub mod update;

use std::sync::Arc;

use callorder_core::{CapabilityDescriptor, Result};
use callorder_recorder::CallRecorder;

pub use disposable::{Dispose, DisposeLogger};
pub use host::{HostLogger, HostProvider};
pub use logger::CapabilityLogger;
pub use metadata::{MetadataLogger, MetadataProvider};
pub use paging::{PagingLogger, PagingProvider};
pub use query::{QueryLogger, QueryProvider};
pub use service::{ServiceHooks, ServiceLogger};
pub use stream::{DataStream, DataStreamLogger, StreamLogger, StreamProvider};
pub use update::{UpdateLogger, UpdateProvider};

/// Every operation table, in module order
pub fn descriptors() -> [&'static CapabilityDescriptor; 9] {
    [
        &update::UPDATE_PROVIDER,
        &metadata::METADATA_PROVIDER,
        &query::QUERY_PROVIDER,
        &stream::STREAM_PROVIDER,
        &stream::DATA_STREAM,
        &host::HOST_PROVIDER,
        &paging::PAGING_PROVIDER,
        &service::SERVICE_HOOKS,
        &disposable::DISPOSABLE,
    ]
}

/// One logger per capability, all bound to the same recorder.
#[derive(Debug, Clone)]
pub struct Loggers {
    /// `UpdateProvider`
    pub update: UpdateLogger,
    /// `MetadataProvider`
    pub metadata: MetadataLogger,
    /// `QueryProvider`
    pub query: QueryLogger,
    /// `StreamProvider`
    pub stream: StreamLogger,
    /// `DataStream`
    pub data_stream: DataStreamLogger,
    /// `HostProvider`
    pub host: HostLogger,
    /// `PagingProvider`
    pub paging: PagingLogger,
    /// `ServiceHooks`
    pub service: ServiceLogger,
    /// `Disposable`
    pub disposable: DisposeLogger,
}

impl Loggers {
    /// Build every logger over `recorder`, validating every table.
    pub fn new(recorder: Arc<CallRecorder>) -> Result<Self> {
        Ok(Loggers {
            update: UpdateLogger::new(recorder.clone())?,
            metadata: MetadataLogger::new(recorder.clone())?,
            query: QueryLogger::new(recorder.clone())?,
            stream: StreamLogger::new(recorder.clone())?,
            data_stream: DataStreamLogger::new(recorder.clone())?,
            host: HostLogger::new(recorder.clone())?,
            paging: PagingLogger::new(recorder.clone())?,
            service: ServiceLogger::new(recorder.clone())?,
            disposable: DisposeLogger::new(recorder)?,
        })
    }
}
