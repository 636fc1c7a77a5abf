//! Call entries
//!
//! A [`CallEntry`] is one recorded call: the qualified method name, the
//! ordered (name, canonical value) argument pairs, and the stack text captured
//! when the entry was built. Entries are built at interception time, written
//! once, and dropped.

use std::backtrace::Backtrace;

use serde::{Deserialize, Serialize};

use crate::canonical::canonicalize;
use crate::descriptor::{CapabilityDescriptor, OperationDescriptor};
use crate::error::{Error, Result};
use crate::value::Value;

/// How stack text is captured for new entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StackCapture {
    /// Follow `RUST_BACKTRACE` / `RUST_LIB_BACKTRACE`
    #[default]
    Environment,
    /// Always capture, regardless of environment
    Always,
    /// Record an empty stack
    Never,
}

impl StackCapture {
    /// Capture the current stack as opaque text.
    pub fn capture(self) -> String {
        match self {
            StackCapture::Environment => Backtrace::capture().to_string(),
            StackCapture::Always => Backtrace::force_capture().to_string(),
            StackCapture::Never => String::new(),
        }
    }
}

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallEntry {
    method_name: String,
    arguments: Vec<(String, String)>,
    stack_trace: String,
}

impl CallEntry {
    /// Build an entry from raw (name, value) pairs.
    ///
    /// Names are taken as given; duplicates are kept in order. The stack is
    /// captured according to the environment.
    pub fn new<M, I, K, V>(method_name: M, arguments: I) -> Self
    where
        M: Into<String>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        CallEntry {
            method_name: method_name.into(),
            arguments: arguments
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            stack_trace: StackCapture::Environment.capture(),
        }
    }

    /// Build an entry for a declared operation.
    ///
    /// Values are canonicalized and paired with the operation's declared
    /// parameter names, in order. Supplying fewer values than declared is
    /// allowed; supplying more is not.
    ///
    /// # Errors
    ///
    /// `Error::ArgumentCountMismatch` if `values` is longer than the declared
    /// parameter list.
    pub fn for_operation(
        capability: &CapabilityDescriptor,
        operation: &OperationDescriptor,
        values: &[Value],
        capture: StackCapture,
    ) -> Result<Self> {
        let method_name = capability.qualified_name(operation);
        check_argument_count(&method_name, operation, values.len())?;

        let arguments = operation
            .params
            .iter()
            .zip(values)
            .map(|(name, value)| (name.to_string(), canonicalize(value)))
            .collect();

        Ok(CallEntry {
            method_name,
            arguments,
            stack_trace: capture.capture(),
        })
    }

    /// Reassemble an entry from already-canonical parts (used by decoders).
    pub fn from_parts(
        method_name: impl Into<String>,
        arguments: Vec<(String, String)>,
        stack_trace: impl Into<String>,
    ) -> Self {
        CallEntry {
            method_name: method_name.into(),
            arguments,
            stack_trace: stack_trace.into(),
        }
    }

    /// Replace the captured stack text.
    pub fn with_stack_trace(mut self, stack_trace: impl Into<String>) -> Self {
        self.stack_trace = stack_trace.into();
        self
    }

    /// Qualified method name
    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    /// Ordered (name, canonical value) pairs
    pub fn arguments(&self) -> &[(String, String)] {
        &self.arguments
    }

    /// First argument value recorded under `name`
    pub fn argument(&self, name: &str) -> Option<&str> {
        self.arguments
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Captured stack text
    pub fn stack_trace(&self) -> &str {
        &self.stack_trace
    }
}

/// Reject more values than an operation declares.
pub fn check_argument_count(
    method_name: &str,
    operation: &OperationDescriptor,
    supplied: usize,
) -> Result<()> {
    if supplied > operation.arity() {
        return Err(Error::ArgumentCountMismatch {
            method: method_name.to_string(),
            declared: operation.arity(),
            supplied,
        });
    }
    Ok(())
}
