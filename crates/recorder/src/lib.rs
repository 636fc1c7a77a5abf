//! Depth-gated call recorder for callorder
//!
//! The recorder sees every intercepted call and persists only the top-level
//! ones: calls the host makes directly against a provider, not the calls a
//! provider makes into itself or other capabilities while serving them.
//!
//! ## Call Protocol
//!
//! ```text
//! 1. guard = recorder.enter(method, build)   depth += 1
//! 2.   if depth was 0 and recording active: build entry, persist it
//! 3. call the real provider
//! 4. drop(guard)                             depth -= 1
//! ```
//!
//! Step 4 happens on every exit path because it is the guard's `Drop`:
//! returning early with an error, or unwinding from a panic, both release it.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod recorder;

pub use config::{PersistFailurePolicy, RecordingConfig};
pub use recorder::{CallGuard, CallRecorder};
