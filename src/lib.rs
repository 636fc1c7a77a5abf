//! # callorder
//!
//! Call-order instrumentation for provider capability interfaces.
//!
//! A host that drives pluggable providers (update, metadata, query, stream,
//! host, paging, service hooks) wraps each provider in a [`Proxy`]. While
//! recording is switched on, every top-level call the host makes is written
//! to a log directory as one entry file, numbered in call order. Calls a
//! provider makes into another proxied provider during that call are not
//! recorded.
//!
//! ## Quick Start
//!
//! ```ignore
//! use callorder::prelude::*;
//!
//! let config = RecordingConfig::new("./workspace");
//! DirectorySink::new(config.sink.clone()).enable()?;
//!
//! let instr = Instrumentation::from_config(&config)?;
//! let update = instr.wrap(MyUpdateProvider::default());
//! update.save_changes()?;
//!
//! CallLog::load(&config.sink)?.assert_order(&["UpdateProvider.save_changes"])?;
//! ```
//!
//! ## Layers
//!
//! - [`Value`], [`canonicalize`], [`CallEntry`]: what a call looks like once recorded
//! - [`encode_entry`] / [`decode_entry`]: the entry file format
//! - [`DirectorySink`], [`MemorySink`]: where entries go
//! - [`CallRecorder`]: depth gate deciding which calls are recorded
//! - [`capabilities`]: the capability traits and their loggers
//! - [`Instrumentation`], [`Proxy`], [`LoggedStream`]: provider wrapping
//! - [`CallLog`]: reading a recorded log back for verification

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod prelude;
pub mod verify;

pub use callorder_capabilities as capabilities;
pub use callorder_core::metadata;

pub use callorder_capabilities::{
    DataStream, Dispose, HostProvider, Loggers, MetadataProvider, PagingProvider, QueryProvider,
    ServiceHooks, StreamProvider, UpdateProvider,
};
pub use callorder_core::{
    buffer_shape, canonicalize, CallEntry, CapabilityDescriptor, Error, OperationDescriptor,
    ResourceRef, Result, StackCapture, TypeInfo, Value, NULL_TEXT,
};
pub use callorder_proxy::{Instrumentation, LoggedStream, Proxy};
pub use callorder_recorder::{CallGuard, CallRecorder, PersistFailurePolicy, RecordingConfig};
pub use callorder_sink::{DirectorySink, MemorySink, Sink, SinkOptions};
pub use callorder_wire::{decode_entry, encode_entry};
pub use verify::CallLog;
