//! Entry decoding
//!
//! A small recursive reader for exactly the shape [`encode_entry`] writes:
//! optional declaration, root element, `arguments` with one child per
//! argument, `stack` with escaped text. Whitespace between elements is
//! ignored; whitespace inside `stack` is preserved.
//!
//! [`encode_entry`]: crate::encode_entry

use base64::Engine;
use callorder_core::CallEntry;
use thiserror::Error;

use crate::encode::{ARGUMENTS_NODE, STACK_NODE};

/// Decode error types
#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    /// Unexpected end of input
    #[error("Unexpected end of input")]
    UnexpectedEnd,

    /// Unexpected character
    #[error("Unexpected character {found:?} at offset {offset}")]
    UnexpectedChar {
        /// Character found
        found: char,
        /// Byte offset
        offset: usize,
    },

    /// Closing tag does not match the open element
    #[error("Mismatched closing tag: expected </{expected}>, found </{found}>")]
    MismatchedTag {
        /// Open element
        expected: String,
        /// Closing tag found
        found: String,
    },

    /// Required element missing
    #[error("Missing <{0}> element")]
    MissingElement(&'static str),

    /// Element not allowed at this position
    #[error("Unexpected element <{0}>")]
    UnexpectedElement(String),

    /// Argument body is not valid base64
    #[error("Invalid base64 in argument {name}: {reason}")]
    InvalidBase64 {
        /// Argument name
        name: String,
        /// Decoder message
        reason: String,
    },

    /// Argument body does not decode to UTF-8
    #[error("Argument {0} is not valid UTF-8")]
    InvalidUtf8(String),

    /// Unknown or malformed `&...;` reference
    #[error("Invalid character reference: &{0};")]
    InvalidReference(String),

    /// Content after the root element
    #[error("Trailing content after root element")]
    TrailingContent,
}

/// Decode an entry from its text form
pub fn decode_entry(text: &str) -> Result<CallEntry, DecodeError> {
    let mut parser = EntryParser::new(text);
    parser.skip_whitespace();
    parser.skip_declaration()?;
    parser.skip_whitespace();

    let root = parser.parse_open_tag()?;
    if root.self_closing {
        return Err(DecodeError::MissingElement(ARGUMENTS_NODE));
    }

    let mut arguments = None;
    let mut stack = None;
    loop {
        parser.skip_whitespace();
        if parser.at_close_tag() {
            parser.parse_close_tag(root.name)?;
            break;
        }
        let child = parser.parse_open_tag()?;
        match child.name {
            ARGUMENTS_NODE if arguments.is_none() => {
                arguments = Some(if child.self_closing {
                    Vec::new()
                } else {
                    parser.parse_arguments()?
                });
            }
            STACK_NODE if stack.is_none() => {
                stack = Some(if child.self_closing {
                    String::new()
                } else {
                    let text = parser.parse_text()?;
                    parser.parse_close_tag(STACK_NODE)?;
                    text
                });
            }
            other => return Err(DecodeError::UnexpectedElement(other.to_string())),
        }
    }

    parser.skip_whitespace();
    if parser.peek().is_some() {
        return Err(DecodeError::TrailingContent);
    }

    let arguments = arguments.ok_or(DecodeError::MissingElement(ARGUMENTS_NODE))?;
    let stack = stack.ok_or(DecodeError::MissingElement(STACK_NODE))?;
    Ok(CallEntry::from_parts(root.name, arguments, stack))
}

struct OpenTag<'a> {
    name: &'a str,
    self_closing: bool,
}

struct EntryParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> EntryParser<'a> {
    fn new(input: &'a str) -> Self {
        EntryParser { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), DecodeError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.advance();
                Ok(())
            }
            Some(c) => Err(self.unexpected(c)),
            None => Err(DecodeError::UnexpectedEnd),
        }
    }

    fn unexpected(&self, found: char) -> DecodeError {
        DecodeError::UnexpectedChar {
            found,
            offset: self.pos,
        }
    }

    fn skip_declaration(&mut self) -> Result<(), DecodeError> {
        if self.rest().starts_with("<?") {
            let end = self.rest().find("?>").ok_or(DecodeError::UnexpectedEnd)?;
            self.pos += end + 2;
        }
        Ok(())
    }

    fn at_close_tag(&self) -> bool {
        self.rest().starts_with("</")
    }

    fn parse_name(&mut self) -> Result<&'a str, DecodeError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_whitespace() || c == '/' || c == '>' || c == '<' {
                break;
            }
            self.advance();
        }
        if self.pos == start {
            return match self.peek() {
                Some(c) => Err(self.unexpected(c)),
                None => Err(DecodeError::UnexpectedEnd),
            };
        }
        Ok(&self.input[start..self.pos])
    }

    fn parse_open_tag(&mut self) -> Result<OpenTag<'a>, DecodeError> {
        self.expect('<')?;
        let name = self.parse_name()?;
        self.skip_whitespace();
        match self.peek() {
            Some('/') => {
                self.advance();
                self.expect('>')?;
                Ok(OpenTag {
                    name,
                    self_closing: true,
                })
            }
            Some('>') => {
                self.advance();
                Ok(OpenTag {
                    name,
                    self_closing: false,
                })
            }
            Some(c) => Err(self.unexpected(c)),
            None => Err(DecodeError::UnexpectedEnd),
        }
    }

    fn parse_close_tag(&mut self, expected: &str) -> Result<(), DecodeError> {
        self.expect('<')?;
        self.expect('/')?;
        let name = self.parse_name()?;
        self.skip_whitespace();
        self.expect('>')?;
        if name != expected {
            return Err(DecodeError::MismatchedTag {
                expected: expected.to_string(),
                found: name.to_string(),
            });
        }
        Ok(())
    }

    /// Children of `<arguments>` up to and including `</arguments>`
    fn parse_arguments(&mut self) -> Result<Vec<(String, String)>, DecodeError> {
        let mut arguments = Vec::new();
        loop {
            self.skip_whitespace();
            if self.at_close_tag() {
                self.parse_close_tag(ARGUMENTS_NODE)?;
                return Ok(arguments);
            }
            let tag = self.parse_open_tag()?;
            let body = if tag.self_closing {
                String::new()
            } else {
                let body = self.parse_text()?;
                self.parse_close_tag(tag.name)?;
                body
            };
            let value = decode_argument(tag.name, body.trim())?;
            arguments.push((tag.name.to_string(), value));
        }
    }

    /// Character data up to the next `<`, with references resolved
    fn parse_text(&mut self) -> Result<String, DecodeError> {
        let end = self.rest().find('<').ok_or(DecodeError::UnexpectedEnd)?;
        let raw = &self.rest()[..end];
        self.pos += end;
        unescape_text(raw)
    }
}

fn decode_argument(name: &str, body: &str) -> Result<String, DecodeError> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(body)
        .map_err(|e| DecodeError::InvalidBase64 {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
    String::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8(name.to_string()))
}

fn unescape_text(raw: &str) -> Result<String, DecodeError> {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let semi = after
            .find(';')
            .ok_or_else(|| DecodeError::InvalidReference(after.to_string()))?;
        let reference = &after[..semi];
        out.push(resolve_reference(reference)?);
        rest = &after[semi + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

fn resolve_reference(reference: &str) -> Result<char, DecodeError> {
    let invalid = || DecodeError::InvalidReference(reference.to_string());
    match reference {
        "amp" => Ok('&'),
        "lt" => Ok('<'),
        "gt" => Ok('>'),
        "quot" => Ok('"'),
        "apos" => Ok('\''),
        _ => {
            let code = if let Some(hex) = reference
                .strip_prefix("#x")
                .or_else(|| reference.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).map_err(|_| invalid())?
            } else if let Some(dec) = reference.strip_prefix('#') {
                dec.parse::<u32>().map_err(|_| invalid())?
            } else {
                return Err(invalid());
            };
            char::from_u32(code).ok_or_else(invalid)
        }
    }
}
