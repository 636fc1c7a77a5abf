//! Entry encoding
//!
//! Writes the element tree for one entry. Element names are checked, argument
//! bodies are base64, and stack text is escaped so that `<`, `&` and carriage
//! returns survive a round trip.

use base64::Engine;
use callorder_core::CallEntry;
use thiserror::Error;

/// Name of the element holding the arguments
pub const ARGUMENTS_NODE: &str = "arguments";

/// Name of the element holding the stack text
pub const STACK_NODE: &str = "stack";

pub(crate) const DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

/// Encode error types
#[derive(Debug, Error, PartialEq)]
pub enum EncodeError {
    /// Method or argument name is not usable as an element name
    #[error("Invalid element name: {0:?}")]
    InvalidName(String),
}

/// Whether `name` can be used as an element name.
///
/// Starts with a letter or `_`, continues with letters, digits, `_`, `-` or
/// `.`. Colons are rejected.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Encode an entry to its text form
pub fn encode_entry(entry: &CallEntry) -> Result<String, EncodeError> {
    let root = checked_name(entry.method_name())?;

    let mut out = String::with_capacity(256 + entry.stack_trace().len());
    out.push_str(DECLARATION);
    out.push('\n');
    open_tag(&mut out, root);
    out.push('\n');

    out.push_str("  ");
    if entry.arguments().is_empty() {
        out.push_str("<arguments />\n");
    } else {
        open_tag(&mut out, ARGUMENTS_NODE);
        out.push('\n');
        for (name, value) in entry.arguments() {
            let name = checked_name(name)?;
            out.push_str("    ");
            open_tag(&mut out, name);
            out.push_str(&base64::engine::general_purpose::STANDARD.encode(value.as_bytes()));
            close_tag(&mut out, name);
            out.push('\n');
        }
        out.push_str("  ");
        close_tag(&mut out, ARGUMENTS_NODE);
        out.push('\n');
    }

    out.push_str("  ");
    open_tag(&mut out, STACK_NODE);
    escape_text(entry.stack_trace(), &mut out);
    close_tag(&mut out, STACK_NODE);
    out.push('\n');

    close_tag(&mut out, root);
    out.push('\n');
    Ok(out)
}

fn checked_name(name: &str) -> Result<&str, EncodeError> {
    if is_valid_name(name) {
        Ok(name)
    } else {
        Err(EncodeError::InvalidName(name.to_string()))
    }
}

fn open_tag(out: &mut String, name: &str) {
    out.push('<');
    out.push_str(name);
    out.push('>');
}

fn close_tag(out: &mut String, name: &str) {
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

/// Escape character data
fn escape_text(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#13;"),
            c => out.push(c),
        }
    }
}
