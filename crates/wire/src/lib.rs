//! Entry text format for callorder
//!
//! One [`CallEntry`] per document. The root element is named after the
//! qualified method; argument values are base64 of their UTF-8 canonical text,
//! so no argument ever needs escaping. Only the stack text is escaped.
//!
//! ```text
//! <?xml version="1.0" encoding="utf-8"?>
//! <UpdateProvider.set_value>
//!   <arguments>
//!     <target_resource>Q3VzdG9tZXI=</target_resource>
//!     <property_name>TmFtZQ==</property_name>
//!     <property_value>QWxmcmVkcw==</property_value>
//!   </arguments>
//!   <stack>   0: callorder_recorder::recorder::CallRecorder::enter ...</stack>
//! </UpdateProvider.set_value>
//! ```
//!
//! ## Examples
//!
//! ```
//! use callorder_core::CallEntry;
//! use callorder_wire::{decode_entry, encode_entry};
//!
//! let entry = CallEntry::new("QueryProvider.get_resource_type", [("target", "Customer")])
//!     .with_stack_trace("frame 0");
//! let text = encode_entry(&entry).unwrap();
//! assert_eq!(decode_entry(&text).unwrap(), entry);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod decode;
mod encode;

pub use decode::{decode_entry, DecodeError};
pub use encode::{encode_entry, is_valid_name, EncodeError, ARGUMENTS_NODE, STACK_NODE};

use callorder_core::CallEntry;

impl From<DecodeError> for callorder_core::Error {
    fn from(e: DecodeError) -> Self {
        callorder_core::Error::Decode(e.to_string())
    }
}

impl From<EncodeError> for callorder_core::Error {
    fn from(e: EncodeError) -> Self {
        callorder_core::Error::Encode(e.to_string())
    }
}

/// Encode to bytes ready for a file write
pub fn encode_entry_bytes(entry: &CallEntry) -> Result<Vec<u8>, EncodeError> {
    encode_entry(entry).map(String::into_bytes)
}
