//! Convenient imports for callorder.
//!
//! ```ignore
//! use callorder::prelude::*;
//!
//! let instr = Instrumentation::from_config(&RecordingConfig::new("./workspace"))?;
//! ```

// Wrapping
pub use crate::{Instrumentation, LoggedStream, Proxy};

// Error handling
pub use crate::{Error, Result};

// Recording
pub use crate::{CallRecorder, PersistFailurePolicy, RecordingConfig, StackCapture};

// Sinks and verification
pub use crate::{CallLog, DirectorySink, MemorySink, Sink, SinkOptions};

// Capabilities
pub use crate::{
    DataStream, Dispose, HostProvider, MetadataProvider, PagingProvider, QueryProvider,
    ServiceHooks, StreamProvider, UpdateProvider,
};

// Values
pub use crate::{CallEntry, ResourceRef, TypeInfo, Value};
