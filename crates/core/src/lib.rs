//! Core types for callorder
//!
//! This crate holds the pieces every other callorder crate agrees on:
//!
//! - [`Value`]: the typed argument model handed to capability loggers
//! - [`canonicalize`]: locale-independent text form of a [`Value`]
//! - [`CallEntry`]: one recorded call (method, ordered arguments, stack text)
//! - [`CapabilityDescriptor`]: static operation tables for each capability
//! - [`metadata`]: the resource/metadata shapes exchanged with providers
//! - [`Error`]: the error type shared across the workspace

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod canonical;
pub mod descriptor;
pub mod entry;
pub mod error;
pub mod metadata;
pub mod value;

pub use canonical::{buffer_shape, canonicalize, NULL_TEXT};
pub use descriptor::{CapabilityDescriptor, OperationDescriptor};
pub use entry::{CallEntry, StackCapture};
pub use error::{Error, Result};
pub use value::{ResourceRef, TypeInfo, Value};
