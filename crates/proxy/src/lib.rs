//! Provider proxies for callorder
//!
//! [`Instrumentation`] is the per-request context: one recorder plus one
//! logger per capability. Every provider the host will call during the
//! request is wrapped through it:
//!
//! ```ignore
//! let instr = Instrumentation::from_config(&RecordingConfig::new(workspace))?;
//! let update = instr.wrap(MyUpdateProvider::default());
//! let streams = instr.wrap_disposable(MyStreamProvider::open()?);
//!
//! update.set_value(&order, "ShipCity", &"Lyon".into())?;   // recorded
//! ```
//!
//! A [`Proxy<P>`] implements every capability trait `P` implements. Each call
//! is reported to the matching logger, forwarded to `P`, and left when the
//! logger's guard drops, whatever way the call returns. Streams returned by
//! a proxied call come back wrapped in a [`LoggedStream`].

#![warn(missing_docs)]
#![warn(clippy::all)]

mod forward;
mod proxy;
mod stream;

pub use proxy::Proxy;
pub use stream::LoggedStream;

use std::sync::Arc;

use callorder_capabilities::{DataStream, Dispose, Loggers};
use callorder_core::Result;
use callorder_recorder::{CallRecorder, RecordingConfig};
use callorder_sink::Sink;

/// Recording context for one logical request.
///
/// Cheap to clone; clones share the recorder, so calls through any proxy
/// created from any clone nest with each other.
#[derive(Debug, Clone)]
pub struct Instrumentation {
    recorder: Arc<CallRecorder>,
    loggers: Arc<Loggers>,
}

impl Instrumentation {
    /// Context over an existing recorder.
    pub fn new(recorder: Arc<CallRecorder>) -> Result<Self> {
        let loggers = Loggers::new(recorder.clone())?;
        Ok(Instrumentation {
            recorder,
            loggers: Arc::new(loggers),
        })
    }

    /// Context recording into the log directory described by `config`.
    pub fn from_config(config: &RecordingConfig) -> Result<Self> {
        Self::new(Arc::new(CallRecorder::from_config(config)))
    }

    /// Context recording into `sink`.
    pub fn with_sink(sink: Arc<dyn Sink>, config: &RecordingConfig) -> Result<Self> {
        Self::new(Arc::new(CallRecorder::with_config(sink, config)))
    }

    /// Wrap a provider. The proxy owns it from here on.
    ///
    /// [`Proxy::dispose`] on the result only releases the provider. A
    /// provider implementing [`Dispose`] must go through
    /// [`wrap_disposable`](Self::wrap_disposable) to have its own
    /// `dispose` run.
    pub fn wrap<P>(&self, provider: P) -> Proxy<P> {
        Proxy::new(provider, self.loggers.clone(), None)
    }

    /// Wrap a provider that needs explicit disposal; [`Proxy::dispose`] will
    /// call its [`Dispose::dispose`].
    pub fn wrap_disposable<P: Dispose>(&self, provider: P) -> Proxy<P> {
        Proxy::new(provider, self.loggers.clone(), Some(<P as Dispose>::dispose))
    }

    /// Wrap a stream obtained outside any proxy.
    pub fn wrap_stream<S: DataStream>(&self, stream: S) -> LoggedStream<S> {
        LoggedStream::new(stream, self.loggers.data_stream.clone())
    }

    /// Recorder shared by every proxy of this context
    pub fn recorder(&self) -> &Arc<CallRecorder> {
        &self.recorder
    }

    /// Current nesting depth
    pub fn depth(&self) -> usize {
        self.recorder.depth()
    }

    /// Whether a top-level call made now would be recorded
    pub fn is_recording(&self) -> bool {
        self.recorder.is_active()
    }
}
