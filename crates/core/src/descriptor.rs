//! Static capability descriptors
//!
//! Each capability family declares its operations once, as a table of
//! [`OperationDescriptor`]s: the operation name and the parameter names under
//! which its arguments are recorded. Loggers resolve operations against this
//! table instead of discovering them at runtime, so a logger and the trait it
//! instruments cannot silently drift apart.
//!
//! ## Qualified Names
//!
//! Entries are keyed by `"<Capability>.<operation>"`, e.g.
//! `"UpdateProvider.set_value"`.

use crate::error::{Error, Result};

/// One operation of a capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationDescriptor {
    /// Operation name as recorded (matches the trait method name)
    pub name: &'static str,
    /// Declared parameter names, in call order
    pub params: &'static [&'static str],
}

impl OperationDescriptor {
    /// Declare an operation.
    pub const fn new(name: &'static str, params: &'static [&'static str]) -> Self {
        OperationDescriptor { name, params }
    }

    /// Number of declared parameters
    pub const fn arity(&self) -> usize {
        self.params.len()
    }
}

/// Operation table for one capability family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityDescriptor {
    /// Capability name (first half of qualified method names)
    pub name: &'static str,
    /// Declared operations
    pub operations: &'static [OperationDescriptor],
}

impl CapabilityDescriptor {
    /// Declare a capability.
    pub const fn new(name: &'static str, operations: &'static [OperationDescriptor]) -> Self {
        CapabilityDescriptor { name, operations }
    }

    /// Look up a declared operation by name.
    ///
    /// # Errors
    ///
    /// `Error::UnknownOperation` if the table has no such operation.
    pub fn operation(&self, name: &str) -> Result<&OperationDescriptor> {
        self.operations
            .iter()
            .find(|op| op.name == name)
            .ok_or_else(|| Error::UnknownOperation {
                capability: self.name.to_string(),
                operation: name.to_string(),
            })
    }

    /// `"<Capability>.<operation>"`
    pub fn qualified_name(&self, operation: &OperationDescriptor) -> String {
        format!("{}.{}", self.name, operation.name)
    }

    /// Check the table is well formed.
    ///
    /// A table must declare at least one operation, operation names must be
    /// unique, and parameter names must be unique within an operation (they
    /// become element names in the entry format).
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(self.invalid("capability name is empty"));
        }
        if self.operations.is_empty() {
            return Err(self.invalid("no operations declared"));
        }
        for (idx, op) in self.operations.iter().enumerate() {
            if op.name.is_empty() {
                return Err(self.invalid(format!("operation #{} has an empty name", idx)));
            }
            if self.operations[..idx].iter().any(|prev| prev.name == op.name) {
                return Err(self.invalid(format!("operation {} declared twice", op.name)));
            }
            for (pidx, param) in op.params.iter().enumerate() {
                if param.is_empty() {
                    return Err(self.invalid(format!("{} has an empty parameter name", op.name)));
                }
                if op.params[..pidx].contains(param) {
                    return Err(self.invalid(format!(
                        "{} declares parameter {} twice",
                        op.name, param
                    )));
                }
            }
        }
        Ok(())
    }

    fn invalid(&self, reason: impl Into<String>) -> Error {
        Error::InvalidDescriptor {
            capability: self.name.to_string(),
            reason: reason.into(),
        }
    }
}
