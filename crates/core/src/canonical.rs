//! Canonical text form of argument values
//!
//! Recorded entries are compared with plain string equality, so every value
//! must render the same way on every machine and in every run.
//!
//! | Value | Canonical text |
//! |-------|----------------|
//! | Null | `null` |
//! | Bytes | standard base64 |
//! | Timestamp | `2009-06-15T13:45:30.0000000Z` |
//! | DateTimeOffset | `2009-06-15T13:45:30.0000000-07:00` |
//! | LocalDateTime | `2009-06-15T13:45:30.0000000` |
//! | scalars, String, Guid | `Display` output |
//! | Array | `object[N]` |
//! | Object | display name of the logical type |
//!
//! Formatting goes through `chrono` and `core::fmt`, neither of which consults
//! a process or thread locale, so no locale has to be pinned around the
//! date/time cases.
//!
//! Canonicalization never fails: anything without a textual form degrades to
//! a type name.

use base64::Engine;
use chrono::{DateTime, NaiveDateTime, TimeZone, Timelike};

use crate::value::Value;

/// Canonical text for [`Value::Null`]
pub const NULL_TEXT: &str = "null";

/// Convert a value to its canonical text.
pub fn canonicalize(value: &Value) -> String {
    match value {
        Value::Null => NULL_TEXT.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::UInt(u) => u.to_string(),
        Value::Float(f) => f.to_string(),
        Value::String(s) => s.clone(),
        Value::Bytes(b) => encode_base64(b),
        Value::Guid(g) => g.hyphenated().to_string(),
        Value::Timestamp(t) => format_round_trip(t, "Z"),
        Value::DateTimeOffset(t) => {
            let offset = t.format("%:z").to_string();
            format_round_trip(t, &offset)
        }
        Value::LocalDateTime(t) => format_naive_round_trip(t),
        Value::Array(items) => format!("object[{}]", items.len()),
        Value::Object(resource) => resource.type_info().logical().display_name().to_string(),
    }
}

/// Shape of a buffer that is logged by size rather than by contents.
///
/// Read buffers arrive uninitialized; their contents carry no information
/// about the call, only their length does.
pub fn buffer_shape(len: usize) -> String {
    format!("byte[{}]", len)
}

/// Standard base64 with padding
pub(crate) fn encode_base64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

fn format_round_trip<Tz: TimeZone>(t: &DateTime<Tz>, suffix: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{}.{:07}{}",
        t.format("%Y-%m-%dT%H:%M:%S"),
        ticks_of_second(t.nanosecond()),
        suffix
    )
}

fn format_naive_round_trip(t: &NaiveDateTime) -> String {
    format!(
        "{}.{:07}",
        t.format("%Y-%m-%dT%H:%M:%S"),
        ticks_of_second(t.nanosecond())
    )
}

/// 100ns ticks within the second; a leap second folds back into range.
fn ticks_of_second(nanos: u32) -> u32 {
    (nanos % 1_000_000_000) / 100
}
