//! The generic proxy and its disposal protocol

use std::sync::Arc;

use callorder_capabilities::disposable::DISPOSABLE;
use callorder_capabilities::{Dispose, Loggers};
use callorder_core::{CapabilityDescriptor, Error, Result};
use tracing::debug;

/// A provider wrapped for call recording.
///
/// Implements each capability trait the wrapped provider implements. After
/// [`dispose`](Proxy::dispose) the provider is released and every call
/// fails with [`Error::Disposed`].
pub struct Proxy<P> {
    inner: Option<P>,
    pub(crate) loggers: Arc<Loggers>,
    dispose_hook: Option<fn(&mut P) -> Result<()>>,
}

impl<P> Proxy<P> {
    pub(crate) fn new(inner: P, loggers: Arc<Loggers>, dispose_hook: Option<fn(&mut P) -> Result<()>>) -> Self {
        Proxy {
            inner: Some(inner),
            loggers,
            dispose_hook,
        }
    }

    /// The wrapped provider, for calls that must not be recorded.
    pub fn inner(&self) -> Option<&P> {
        self.inner.as_ref()
    }

    /// Whether the provider has been released
    pub fn is_disposed(&self) -> bool {
        self.inner.is_none()
    }

    /// The wrapped provider, or `Error::Disposed` naming `capability`.
    pub(crate) fn target(&self, capability: &CapabilityDescriptor) -> Result<&P> {
        self.inner.as_ref().ok_or_else(|| Error::Disposed {
            capability: capability.name.to_string(),
        })
    }

    /// Log `Disposable.dispose`, dispose the provider if it was wrapped as
    /// disposable, and release it.
    ///
    /// Disposing twice is a no-op and records nothing the second time. The
    /// provider is released even if its own dispose fails.
    pub fn dispose(&mut self) -> Result<()> {
        if self.inner.is_none() {
            return Ok(());
        }
        let _call = self.loggers.disposable.dispose()?;
        let Some(mut inner) = self.inner.take() else {
            return Ok(());
        };
        match self.dispose_hook {
            Some(hook) => {
                debug!(capability = DISPOSABLE.name, "disposing wrapped provider");
                hook(&mut inner)
            }
            None => {
                debug!(capability = DISPOSABLE.name, "released without dispose hook");
                Ok(())
            }
        }
    }
}

impl<P> Dispose for Proxy<P> {
    fn dispose(&mut self) -> Result<()> {
        Proxy::dispose(self)
    }
}

impl<P: std::fmt::Debug> std::fmt::Debug for Proxy<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Proxy")
            .field("inner", &self.inner)
            .field("disposable", &self.dispose_hook.is_some())
            .finish()
    }
}
