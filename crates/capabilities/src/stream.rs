//! Stream capability
//!
//! Two tables live here: `StreamProvider`, which hands out streams for
//! media resources, and `DataStream`, the operations on a stream once handed
//! out. A proxied provider wraps every stream it returns, so calls on the
//! stream are logged under `DataStream.*`.
//!
//! Read and write buffers are logged asymmetrically: a read buffer is
//! recorded by shape (`byte[len]`), since its contents are whatever the
//! caller allocated; a write records the bytes actually written, base64.

use std::sync::Arc;

use callorder_core::metadata::OperationContext;
use callorder_core::{buffer_shape, CapabilityDescriptor, OperationDescriptor, ResourceRef, Result, Value};
use callorder_recorder::{CallGuard, CallRecorder};

use crate::logger::{context_values, CapabilityLogger};

/// A readable and/or writable byte stream.
///
/// `offset` and `count` select the part of `buffer` a call works on.
pub trait DataStream {
    /// Read up to `count` bytes into `buffer[offset..]`, returning how many
    /// were read. Zero means end of stream.
    fn read(&mut self, buffer: &mut [u8], offset: usize, count: usize) -> Result<usize>;
    /// Write `buffer[offset..offset + count]`.
    fn write(&mut self, buffer: &[u8], offset: usize, count: usize) -> Result<()>;
    /// Flush buffered writes.
    fn flush(&mut self) -> Result<()>;
    /// Close the stream. Further calls are the stream's own business.
    fn close(&mut self) -> Result<()>;
}

impl<S: DataStream + ?Sized> DataStream for Box<S> {
    fn read(&mut self, buffer: &mut [u8], offset: usize, count: usize) -> Result<usize> {
        (**self).read(buffer, offset, count)
    }

    fn write(&mut self, buffer: &[u8], offset: usize, count: usize) -> Result<()> {
        (**self).write(buffer, offset, count)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

/// Provider-side media resource streams.
pub trait StreamProvider {
    /// Preferred buffer size for stream copies
    fn stream_buffer_size(&self) -> Result<usize>;

    /// Stream to read the media resource of `entity` from
    fn get_read_stream(
        &self,
        entity: &ResourceRef,
        etag: Option<&str>,
        check_etag_for_equality: Option<bool>,
        operation_context: &OperationContext,
    ) -> Result<Box<dyn DataStream>>;

    /// Stream to write the media resource of `entity` to
    fn get_write_stream(
        &self,
        entity: &ResourceRef,
        etag: Option<&str>,
        check_etag_for_equality: Option<bool>,
        operation_context: &OperationContext,
    ) -> Result<Box<dyn DataStream>>;

    /// Delete the media resource of `entity`
    fn delete_stream(&self, entity: &ResourceRef, operation_context: &OperationContext) -> Result<()>;

    /// Content type of the media resource
    fn get_stream_content_type(&self, entity: &ResourceRef, operation_context: &OperationContext) -> Result<String>;

    /// URI the media resource can be read from directly, if any
    fn get_read_stream_uri(
        &self,
        entity: &ResourceRef,
        operation_context: &OperationContext,
    ) -> Result<Option<String>>;

    /// ETag of the media resource, if any
    fn get_stream_etag(&self, entity: &ResourceRef, operation_context: &OperationContext) -> Result<Option<String>>;

    /// Full type name for a media resource posted to `entity_set_name`
    fn resolve_type(&self, entity_set_name: &str, operation_context: &OperationContext) -> Result<String>;
}

/// Operation declarations
pub mod ops {
    use super::OperationDescriptor;

    /// `stream_buffer_size`
    pub const STREAM_BUFFER_SIZE: OperationDescriptor = OperationDescriptor::new("stream_buffer_size", &[]);
    /// `get_read_stream`
    pub const GET_READ_STREAM: OperationDescriptor = OperationDescriptor::new(
        "get_read_stream",
        &[
            "entity",
            "etag",
            "check_etag_for_equality",
            "operation_context.absolute_request_uri",
            "operation_context.absolute_service_uri",
            "operation_context.request_method",
        ],
    );
    /// `get_write_stream`
    pub const GET_WRITE_STREAM: OperationDescriptor = OperationDescriptor::new(
        "get_write_stream",
        &[
            "entity",
            "etag",
            "check_etag_for_equality",
            "operation_context.absolute_request_uri",
            "operation_context.absolute_service_uri",
            "operation_context.request_method",
        ],
    );
    /// `delete_stream`
    pub const DELETE_STREAM: OperationDescriptor = OperationDescriptor::new(
        "delete_stream",
        &[
            "entity",
            "operation_context.absolute_request_uri",
            "operation_context.absolute_service_uri",
            "operation_context.request_method",
        ],
    );
    /// `get_stream_content_type`
    pub const GET_STREAM_CONTENT_TYPE: OperationDescriptor = OperationDescriptor::new(
        "get_stream_content_type",
        &[
            "entity",
            "operation_context.absolute_request_uri",
            "operation_context.absolute_service_uri",
            "operation_context.request_method",
        ],
    );
    /// `get_read_stream_uri`
    pub const GET_READ_STREAM_URI: OperationDescriptor = OperationDescriptor::new(
        "get_read_stream_uri",
        &[
            "entity",
            "operation_context.absolute_request_uri",
            "operation_context.absolute_service_uri",
            "operation_context.request_method",
        ],
    );
    /// `get_stream_etag`
    pub const GET_STREAM_ETAG: OperationDescriptor = OperationDescriptor::new(
        "get_stream_etag",
        &[
            "entity",
            "operation_context.absolute_request_uri",
            "operation_context.absolute_service_uri",
            "operation_context.request_method",
        ],
    );
    /// `resolve_type`
    pub const RESOLVE_TYPE: OperationDescriptor = OperationDescriptor::new(
        "resolve_type",
        &[
            "entity_set_name",
            "operation_context.absolute_request_uri",
            "operation_context.absolute_service_uri",
            "operation_context.request_method",
        ],
    );

    /// `read`
    pub const READ: OperationDescriptor = OperationDescriptor::new("read", &["buffer", "offset", "count"]);
    /// `write`
    pub const WRITE: OperationDescriptor = OperationDescriptor::new("write", &["buffer", "offset", "count"]);
    /// `flush`
    pub const FLUSH: OperationDescriptor = OperationDescriptor::new("flush", &[]);
    /// `close`
    pub const CLOSE: OperationDescriptor = OperationDescriptor::new("close", &[]);
    /// `dispose`
    pub const DISPOSE: OperationDescriptor = OperationDescriptor::new("dispose", &[]);
}

/// `StreamProvider` operation table
pub static STREAM_PROVIDER: CapabilityDescriptor = CapabilityDescriptor::new(
    "StreamProvider",
    &[
        ops::STREAM_BUFFER_SIZE,
        ops::GET_READ_STREAM,
        ops::GET_WRITE_STREAM,
        ops::DELETE_STREAM,
        ops::GET_STREAM_CONTENT_TYPE,
        ops::GET_READ_STREAM_URI,
        ops::GET_STREAM_ETAG,
        ops::RESOLVE_TYPE,
    ],
);

/// `DataStream` operation table
pub static DATA_STREAM: CapabilityDescriptor = CapabilityDescriptor::new(
    "DataStream",
    &[ops::READ, ops::WRITE, ops::FLUSH, ops::CLOSE, ops::DISPOSE],
);

/// Logger for [`StreamProvider`] calls.
#[derive(Debug, Clone)]
pub struct StreamLogger {
    logger: CapabilityLogger,
}

impl StreamLogger {
    /// Bind to `recorder`
    pub fn new(recorder: Arc<CallRecorder>) -> Result<Self> {
        Ok(StreamLogger {
            logger: CapabilityLogger::new(recorder, &STREAM_PROVIDER)?,
        })
    }

    /// Log `StreamProvider.stream_buffer_size`
    pub fn stream_buffer_size(&self) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::STREAM_BUFFER_SIZE, vec![])
    }

    /// Log `StreamProvider.get_read_stream`
    pub fn get_read_stream(
        &self,
        entity: &ResourceRef,
        etag: Option<&str>,
        check_etag_for_equality: Option<bool>,
        operation_context: &OperationContext,
    ) -> Result<CallGuard<'_>> {
        self.logger.log(
            &ops::GET_READ_STREAM,
            stream_request(entity, etag, check_etag_for_equality, operation_context),
        )
    }

    /// Log `StreamProvider.get_write_stream`
    pub fn get_write_stream(
        &self,
        entity: &ResourceRef,
        etag: Option<&str>,
        check_etag_for_equality: Option<bool>,
        operation_context: &OperationContext,
    ) -> Result<CallGuard<'_>> {
        self.logger.log(
            &ops::GET_WRITE_STREAM,
            stream_request(entity, etag, check_etag_for_equality, operation_context),
        )
    }

    /// Log `StreamProvider.delete_stream`
    pub fn delete_stream(&self, entity: &ResourceRef, operation_context: &OperationContext) -> Result<CallGuard<'_>> {
        self.logger
            .log(&ops::DELETE_STREAM, with_context(entity.into(), operation_context))
    }

    /// Log `StreamProvider.get_stream_content_type`
    pub fn get_stream_content_type(
        &self,
        entity: &ResourceRef,
        operation_context: &OperationContext,
    ) -> Result<CallGuard<'_>> {
        self.logger
            .log(&ops::GET_STREAM_CONTENT_TYPE, with_context(entity.into(), operation_context))
    }

    /// Log `StreamProvider.get_read_stream_uri`
    pub fn get_read_stream_uri(
        &self,
        entity: &ResourceRef,
        operation_context: &OperationContext,
    ) -> Result<CallGuard<'_>> {
        self.logger
            .log(&ops::GET_READ_STREAM_URI, with_context(entity.into(), operation_context))
    }

    /// Log `StreamProvider.get_stream_etag`
    pub fn get_stream_etag(
        &self,
        entity: &ResourceRef,
        operation_context: &OperationContext,
    ) -> Result<CallGuard<'_>> {
        self.logger
            .log(&ops::GET_STREAM_ETAG, with_context(entity.into(), operation_context))
    }

    /// Log `StreamProvider.resolve_type`
    pub fn resolve_type(&self, entity_set_name: &str, operation_context: &OperationContext) -> Result<CallGuard<'_>> {
        self.logger
            .log(&ops::RESOLVE_TYPE, with_context(entity_set_name.into(), operation_context))
    }
}

/// Logger for [`DataStream`] calls.
#[derive(Debug, Clone)]
pub struct DataStreamLogger {
    logger: CapabilityLogger,
}

impl DataStreamLogger {
    /// Bind to `recorder`
    pub fn new(recorder: Arc<CallRecorder>) -> Result<Self> {
        Ok(DataStreamLogger {
            logger: CapabilityLogger::new(recorder, &DATA_STREAM)?,
        })
    }

    /// Records the buffer as `byte[len]`.
    pub fn read(&self, buffer: &[u8], offset: usize, count: usize) -> Result<CallGuard<'_>> {
        self.logger.log(
            &ops::READ,
            vec![buffer_shape(buffer.len()).into(), offset.into(), count.into()],
        )
    }

    /// Records the bytes selected by `offset` and `count`, clamped to the
    /// buffer.
    pub fn write(&self, buffer: &[u8], offset: usize, count: usize) -> Result<CallGuard<'_>> {
        let start = offset.min(buffer.len());
        let end = start.saturating_add(count).min(buffer.len());
        self.logger.log(
            &ops::WRITE,
            vec![Value::Bytes(buffer[start..end].to_vec()), offset.into(), count.into()],
        )
    }

    /// `DataStream.flush`
    pub fn flush(&self) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::FLUSH, vec![])
    }

    /// `DataStream.close`
    pub fn close(&self) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::CLOSE, vec![])
    }

    /// `DataStream.dispose`
    pub fn dispose(&self) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::DISPOSE, vec![])
    }
}

fn stream_request(
    entity: &ResourceRef,
    etag: Option<&str>,
    check_etag_for_equality: Option<bool>,
    operation_context: &OperationContext,
) -> Vec<Value> {
    let mut values = vec![entity.into(), etag.into(), check_etag_for_equality.into()];
    values.extend(context_values(operation_context));
    values
}

fn with_context(first: Value, operation_context: &OperationContext) -> Vec<Value> {
    let mut values = vec![first];
    values.extend(context_values(operation_context));
    values
}
