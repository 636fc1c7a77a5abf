//! Stream-returning capabilities and the logged stream wrapper
//!
//! Streams handed out by a proxied `StreamProvider` or `HostProvider` are
//! returned inside a [`LoggedStream`], so the host's later reads, writes,
//! flushes, closes and the final drop are recorded under `DataStream.*`.

use std::io;

use callorder_capabilities::host::HOST_PROVIDER;
use callorder_capabilities::stream::{DATA_STREAM, STREAM_PROVIDER};
use callorder_capabilities::{DataStream, DataStreamLogger, HostProvider, StreamProvider};
use callorder_core::metadata::{HandleExceptionArgs, OperationContext};
use callorder_core::{Error, ResourceRef, Result};
use tracing::warn;

use crate::proxy::Proxy;

/// A stream whose calls are recorded.
///
/// Dropping the stream records `DataStream.dispose` and then drops the
/// wrapped stream inside that call.
pub struct LoggedStream<S: DataStream> {
    inner: Option<S>,
    logger: DataStreamLogger,
}

impl<S: DataStream> LoggedStream<S> {
    pub(crate) fn new(inner: S, logger: DataStreamLogger) -> Self {
        LoggedStream {
            inner: Some(inner),
            logger,
        }
    }

    /// Record `DataStream.dispose` and release the wrapped stream.
    ///
    /// Later calls fail with [`Error::Disposed`] and are not recorded;
    /// disposing again does nothing.
    pub fn dispose(&mut self) -> Result<()> {
        if self.inner.is_none() {
            return Ok(());
        }
        let _call = self.logger.dispose()?;
        drop(self.inner.take());
        Ok(())
    }
}

fn open<S>(inner: &mut Option<S>) -> Result<&mut S> {
    inner.as_mut().ok_or_else(|| Error::Disposed {
        capability: DATA_STREAM.name.to_string(),
    })
}

impl<S: DataStream> DataStream for LoggedStream<S> {
    fn read(&mut self, buffer: &mut [u8], offset: usize, count: usize) -> Result<usize> {
        let inner = open(&mut self.inner)?;
        let _call = self.logger.read(buffer, offset, count)?;
        inner.read(buffer, offset, count)
    }

    fn write(&mut self, buffer: &[u8], offset: usize, count: usize) -> Result<()> {
        let inner = open(&mut self.inner)?;
        let _call = self.logger.write(buffer, offset, count)?;
        inner.write(buffer, offset, count)
    }

    fn flush(&mut self) -> Result<()> {
        let inner = open(&mut self.inner)?;
        let _call = self.logger.flush()?;
        inner.flush()
    }

    fn close(&mut self) -> Result<()> {
        let inner = open(&mut self.inner)?;
        let _call = self.logger.close()?;
        inner.close()
    }
}

impl<S: DataStream> Drop for LoggedStream<S> {
    fn drop(&mut self) {
        if let Err(e) = self.dispose() {
            warn!(error = %e, "failed to record stream disposal");
        }
    }
}

impl<S: DataStream> io::Read for LoggedStream<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = buf.len();
        DataStream::read(self, buf, 0, len).map_err(into_io)
    }
}

impl<S: DataStream> io::Write for LoggedStream<S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        DataStream::write(self, buf, 0, buf.len()).map_err(into_io)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        DataStream::flush(self).map_err(into_io)
    }
}

fn into_io(e: Error) -> io::Error {
    match e {
        Error::Io(io) => io,
        other => io::Error::new(io::ErrorKind::Other, other),
    }
}

impl<S: DataStream> std::fmt::Debug for LoggedStream<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggedStream")
            .field("disposed", &self.inner.is_none())
            .finish_non_exhaustive()
    }
}

impl<P> Proxy<P> {
    fn logged(&self, stream: Box<dyn DataStream>) -> Box<dyn DataStream> {
        Box::new(LoggedStream::new(stream, self.loggers.data_stream.clone()))
    }
}

// ============================================================================
// Stream provider
// ============================================================================

impl<P: StreamProvider> StreamProvider for Proxy<P> {
    fn stream_buffer_size(&self) -> Result<usize> {
        let inner = self.target(&STREAM_PROVIDER)?;
        let _call = self.loggers.stream.stream_buffer_size()?;
        inner.stream_buffer_size()
    }

    fn get_read_stream(
        &self,
        entity: &ResourceRef,
        etag: Option<&str>,
        check_etag_for_equality: Option<bool>,
        operation_context: &OperationContext,
    ) -> Result<Box<dyn DataStream>> {
        let inner = self.target(&STREAM_PROVIDER)?;
        let _call = self
            .loggers
            .stream
            .get_read_stream(entity, etag, check_etag_for_equality, operation_context)?;
        let stream = inner.get_read_stream(entity, etag, check_etag_for_equality, operation_context)?;
        Ok(self.logged(stream))
    }

    fn get_write_stream(
        &self,
        entity: &ResourceRef,
        etag: Option<&str>,
        check_etag_for_equality: Option<bool>,
        operation_context: &OperationContext,
    ) -> Result<Box<dyn DataStream>> {
        let inner = self.target(&STREAM_PROVIDER)?;
        let _call = self
            .loggers
            .stream
            .get_write_stream(entity, etag, check_etag_for_equality, operation_context)?;
        let stream = inner.get_write_stream(entity, etag, check_etag_for_equality, operation_context)?;
        Ok(self.logged(stream))
    }

    fn delete_stream(&self, entity: &ResourceRef, operation_context: &OperationContext) -> Result<()> {
        let inner = self.target(&STREAM_PROVIDER)?;
        let _call = self.loggers.stream.delete_stream(entity, operation_context)?;
        inner.delete_stream(entity, operation_context)
    }

    fn get_stream_content_type(&self, entity: &ResourceRef, operation_context: &OperationContext) -> Result<String> {
        let inner = self.target(&STREAM_PROVIDER)?;
        let _call = self
            .loggers
            .stream
            .get_stream_content_type(entity, operation_context)?;
        inner.get_stream_content_type(entity, operation_context)
    }

    fn get_read_stream_uri(
        &self,
        entity: &ResourceRef,
        operation_context: &OperationContext,
    ) -> Result<Option<String>> {
        let inner = self.target(&STREAM_PROVIDER)?;
        let _call = self.loggers.stream.get_read_stream_uri(entity, operation_context)?;
        inner.get_read_stream_uri(entity, operation_context)
    }

    fn get_stream_etag(&self, entity: &ResourceRef, operation_context: &OperationContext) -> Result<Option<String>> {
        let inner = self.target(&STREAM_PROVIDER)?;
        let _call = self.loggers.stream.get_stream_etag(entity, operation_context)?;
        inner.get_stream_etag(entity, operation_context)
    }

    fn resolve_type(&self, entity_set_name: &str, operation_context: &OperationContext) -> Result<String> {
        let inner = self.target(&STREAM_PROVIDER)?;
        let _call = self.loggers.stream.resolve_type(entity_set_name, operation_context)?;
        inner.resolve_type(entity_set_name, operation_context)
    }
}

// ============================================================================
// Host
// ============================================================================

impl<P: HostProvider> HostProvider for Proxy<P> {
    fn absolute_request_uri(&self) -> Result<String> {
        let inner = self.target(&HOST_PROVIDER)?;
        let _call = self.loggers.host.absolute_request_uri()?;
        inner.absolute_request_uri()
    }

    fn absolute_service_uri(&self) -> Result<String> {
        let inner = self.target(&HOST_PROVIDER)?;
        let _call = self.loggers.host.absolute_service_uri()?;
        inner.absolute_service_uri()
    }

    fn request_http_method(&self) -> Result<String> {
        let inner = self.target(&HOST_PROVIDER)?;
        let _call = self.loggers.host.request_http_method()?;
        inner.request_http_method()
    }

    fn request_accept(&self) -> Result<Option<String>> {
        let inner = self.target(&HOST_PROVIDER)?;
        let _call = self.loggers.host.request_accept()?;
        inner.request_accept()
    }

    fn request_accept_charset(&self) -> Result<Option<String>> {
        let inner = self.target(&HOST_PROVIDER)?;
        let _call = self.loggers.host.request_accept_charset()?;
        inner.request_accept_charset()
    }

    fn request_content_type(&self) -> Result<Option<String>> {
        let inner = self.target(&HOST_PROVIDER)?;
        let _call = self.loggers.host.request_content_type()?;
        inner.request_content_type()
    }

    fn request_if_match(&self) -> Result<Option<String>> {
        let inner = self.target(&HOST_PROVIDER)?;
        let _call = self.loggers.host.request_if_match()?;
        inner.request_if_match()
    }

    fn request_if_none_match(&self) -> Result<Option<String>> {
        let inner = self.target(&HOST_PROVIDER)?;
        let _call = self.loggers.host.request_if_none_match()?;
        inner.request_if_none_match()
    }

    fn request_max_version(&self) -> Result<Option<String>> {
        let inner = self.target(&HOST_PROVIDER)?;
        let _call = self.loggers.host.request_max_version()?;
        inner.request_max_version()
    }

    fn request_version(&self) -> Result<Option<String>> {
        let inner = self.target(&HOST_PROVIDER)?;
        let _call = self.loggers.host.request_version()?;
        inner.request_version()
    }

    fn request_stream(&self) -> Result<Box<dyn DataStream>> {
        let inner = self.target(&HOST_PROVIDER)?;
        let _call = self.loggers.host.request_stream()?;
        let stream = inner.request_stream()?;
        Ok(self.logged(stream))
    }

    fn response_stream(&self) -> Result<Box<dyn DataStream>> {
        let inner = self.target(&HOST_PROVIDER)?;
        let _call = self.loggers.host.response_stream()?;
        let stream = inner.response_stream()?;
        Ok(self.logged(stream))
    }

    fn set_response_cache_control(&self, value: &str) -> Result<()> {
        let inner = self.target(&HOST_PROVIDER)?;
        let _call = self.loggers.host.set_response_cache_control(value)?;
        inner.set_response_cache_control(value)
    }

    fn set_response_content_type(&self, value: &str) -> Result<()> {
        let inner = self.target(&HOST_PROVIDER)?;
        let _call = self.loggers.host.set_response_content_type(value)?;
        inner.set_response_content_type(value)
    }

    fn set_response_etag(&self, value: &str) -> Result<()> {
        let inner = self.target(&HOST_PROVIDER)?;
        let _call = self.loggers.host.set_response_etag(value)?;
        inner.set_response_etag(value)
    }

    fn set_response_location(&self, value: &str) -> Result<()> {
        let inner = self.target(&HOST_PROVIDER)?;
        let _call = self.loggers.host.set_response_location(value)?;
        inner.set_response_location(value)
    }

    fn set_response_status_code(&self, value: u16) -> Result<()> {
        let inner = self.target(&HOST_PROVIDER)?;
        let _call = self.loggers.host.set_response_status_code(value)?;
        inner.set_response_status_code(value)
    }

    fn set_response_version(&self, value: &str) -> Result<()> {
        let inner = self.target(&HOST_PROVIDER)?;
        let _call = self.loggers.host.set_response_version(value)?;
        inner.set_response_version(value)
    }

    fn get_query_string_item(&self, item: &str) -> Result<Option<String>> {
        let inner = self.target(&HOST_PROVIDER)?;
        let _call = self.loggers.host.get_query_string_item(item)?;
        inner.get_query_string_item(item)
    }

    fn process_exception(&self, args: &HandleExceptionArgs) -> Result<()> {
        let inner = self.target(&HOST_PROVIDER)?;
        let _call = self.loggers.host.process_exception(args)?;
        inner.process_exception(args)
    }
}
