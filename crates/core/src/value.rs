//! Argument values for intercepted calls
//!
//! Every argument a capability logger sees is first lifted into a [`Value`].
//! The enum is deliberately small: scalars, binary data, the three date/time
//! shapes a host can hand a provider, arrays, and opaque provider objects.
//!
//! ## Provider Objects
//!
//! Providers hand out resources the host never looks inside. Those travel as
//! [`ResourceRef`] tokens: an id chosen by the provider plus the [`TypeInfo`]
//! of the object. Generated or proxy types (change-tracking wrappers, lazy
//! loading shims) mark themselves with [`TypeInfo::generated_from`] so that the
//! canonical form reports the logical type rather than the runtime one.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Runtime type description of a provider object.
///
/// A type is either *logical* (declared by the provider's model) or
/// *generated* (a runtime subclass/proxy of some base type). Only logical
/// types ever show up in recorded entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    name: String,
    generated: bool,
    base: Option<Arc<TypeInfo>>,
}

impl TypeInfo {
    /// A logical type with no base type.
    pub fn new(name: impl Into<String>) -> Self {
        TypeInfo {
            name: name.into(),
            generated: false,
            base: None,
        }
    }

    /// The logical type of a Rust type, named by `std::any::type_name`.
    pub fn of<T: ?Sized>() -> Self {
        TypeInfo::new(std::any::type_name::<T>())
    }

    /// A generated (proxy) type wrapping `base`.
    pub fn generated_from(name: impl Into<String>, base: TypeInfo) -> Self {
        TypeInfo {
            name: name.into(),
            generated: true,
            base: Some(Arc::new(base)),
        }
    }

    /// Attach a base type to a logical type.
    pub fn with_base(mut self, base: TypeInfo) -> Self {
        self.base = Some(Arc::new(base));
        self
    }

    /// Full type name as given at construction
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is a generated/proxy type
    pub fn is_generated(&self) -> bool {
        self.generated
    }

    /// Base type, if any
    pub fn base(&self) -> Option<&TypeInfo> {
        self.base.as_deref()
    }

    /// Walk past generated types to the first logical one.
    ///
    /// A generated type without a base resolves to itself; there is nothing
    /// more basic to report.
    pub fn logical(&self) -> &TypeInfo {
        let mut current = self;
        while current.generated {
            match current.base.as_deref() {
                Some(base) => current = base,
                None => break,
            }
        }
        current
    }

    /// Display name: last path segment without generic arguments.
    ///
    /// `alloc::vec::Vec<u8>` displays as `Vec`, `Northwind.Customer` as
    /// `Customer`, and ``List`1`` as `List`.
    pub fn display_name(&self) -> &str {
        let name = self.name.as_str();
        let end = name.find(['<', '`']).unwrap_or(name.len());
        let trimmed = &name[..end];
        let after_path = match trimmed.rfind("::") {
            Some(idx) => &trimmed[idx + 2..],
            None => trimmed,
        };
        match after_path.rfind('.') {
            Some(idx) => &after_path[idx + 1..],
            None => after_path,
        }
    }
}

/// Opaque handle to a provider-owned object.
///
/// Equality is by id and type; the host compares handles, never contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceRef {
    id: u64,
    type_info: Arc<TypeInfo>,
}

impl ResourceRef {
    /// Create a handle for object `id` of the given type.
    pub fn new(id: u64, type_info: TypeInfo) -> Self {
        ResourceRef {
            id,
            type_info: Arc::new(type_info),
        }
    }

    /// Provider-chosen identifier
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Runtime type of the referenced object
    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }
}

/// A typed argument value.
///
/// ## Date/Time Variants
///
/// - `Timestamp`: an instant in UTC
/// - `DateTimeOffset`: a local time with an explicit offset
/// - `LocalDateTime`: a wall-clock time with no zone information
///
/// They canonicalize differently (`Z`, `+hh:mm`, no suffix), so they are kept
/// apart rather than normalized to one representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absence of a value
    Null,
    /// Boolean
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Unsigned integer (sizes, counts, offsets)
    UInt(u64),
    /// IEEE-754 double
    Float(f64),
    /// UTF-8 text
    String(String),
    /// Binary data
    Bytes(Vec<u8>),
    /// GUID / UUID
    Guid(Uuid),
    /// Instant in UTC
    Timestamp(DateTime<Utc>),
    /// Local time with offset
    DateTimeOffset(DateTime<FixedOffset>),
    /// Wall-clock time without zone
    LocalDateTime(NaiveDateTime),
    /// Ordered sequence of values
    Array(Vec<Value>),
    /// Provider-owned object
    Object(ResourceRef),
}

impl Value {
    /// Returns the variant name (for diagnostics)
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::UInt(_) => "UInt",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Bytes(_) => "Bytes",
            Value::Guid(_) => "Guid",
            Value::Timestamp(_) => "Timestamp",
            Value::DateTimeOffset(_) => "DateTimeOffset",
            Value::LocalDateTime(_) => "LocalDateTime",
            Value::Array(_) => "Array",
            Value::Object(_) => "Object",
        }
    }

    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Try to get as string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as a provider object handle
    pub fn as_resource(&self) -> Option<&ResourceRef> {
        match self {
            Value::Object(r) => Some(r),
            _ => None,
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<u16> for Value {
    fn from(u: u16) -> Self {
        Value::UInt(u64::from(u))
    }
}

impl From<u32> for Value {
    fn from(u: u32) -> Self {
        Value::UInt(u64::from(u))
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Value::UInt(u)
    }
}

impl From<usize> for Value {
    fn from(u: usize) -> Self {
        Value::UInt(u as u64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<Uuid> for Value {
    fn from(g: Uuid) -> Self {
        Value::Guid(g)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Timestamp(t)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(t: DateTime<FixedOffset>) -> Self {
        Value::DateTimeOffset(t)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(t: NaiveDateTime) -> Self {
        Value::LocalDateTime(t)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::Array(values)
    }
}

impl From<&[Value]> for Value {
    fn from(values: &[Value]) -> Self {
        Value::Array(values.to_vec())
    }
}

impl From<ResourceRef> for Value {
    fn from(r: ResourceRef) -> Self {
        Value::Object(r)
    }
}

impl From<&ResourceRef> for Value {
    fn from(r: &ResourceRef) -> Self {
        Value::Object(r.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}
