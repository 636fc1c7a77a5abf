//! Host capability
//!
//! Request and response access through the hosting layer. Request/response
//! streams handed out by a proxied host are wrapped like provider streams.

use std::sync::Arc;

use callorder_core::metadata::HandleExceptionArgs;
use callorder_core::{CapabilityDescriptor, OperationDescriptor, Result};
use callorder_recorder::{CallGuard, CallRecorder};

use crate::logger::{exception_values, CapabilityLogger};
use crate::stream::DataStream;

/// Host-side request/response access.
pub trait HostProvider {
    /// Absolute URI of the request
    fn absolute_request_uri(&self) -> Result<String>;
    /// Absolute URI of the service root
    fn absolute_service_uri(&self) -> Result<String>;
    /// HTTP method of the request
    fn request_http_method(&self) -> Result<String>;
    /// `Accept` header
    fn request_accept(&self) -> Result<Option<String>>;
    /// `Accept-Charset` header
    fn request_accept_charset(&self) -> Result<Option<String>>;
    /// `Content-Type` header
    fn request_content_type(&self) -> Result<Option<String>>;
    /// `If-Match` header
    fn request_if_match(&self) -> Result<Option<String>>;
    /// `If-None-Match` header
    fn request_if_none_match(&self) -> Result<Option<String>>;
    /// Maximum protocol version the client accepts
    fn request_max_version(&self) -> Result<Option<String>>;
    /// Protocol version of the request
    fn request_version(&self) -> Result<Option<String>>;
    /// Request body
    fn request_stream(&self) -> Result<Box<dyn DataStream>>;
    /// Response body
    fn response_stream(&self) -> Result<Box<dyn DataStream>>;
    /// Set `Cache-Control`
    fn set_response_cache_control(&self, value: &str) -> Result<()>;
    /// Set `Content-Type`
    fn set_response_content_type(&self, value: &str) -> Result<()>;
    /// Set `ETag`
    fn set_response_etag(&self, value: &str) -> Result<()>;
    /// Set `Location`
    fn set_response_location(&self, value: &str) -> Result<()>;
    /// Set the status code
    fn set_response_status_code(&self, value: u16) -> Result<()>;
    /// Set the protocol version of the response
    fn set_response_version(&self, value: &str) -> Result<()>;
    /// Query string item named `item`, if present
    fn get_query_string_item(&self, item: &str) -> Result<Option<String>>;
    /// Let the host adjust an error before it is written
    fn process_exception(&self, args: &HandleExceptionArgs) -> Result<()>;
}

/// Operation declarations
pub mod ops {
    use super::OperationDescriptor;

    /// `absolute_request_uri`
    pub const ABSOLUTE_REQUEST_URI: OperationDescriptor = OperationDescriptor::new("absolute_request_uri", &[]);
    /// `absolute_service_uri`
    pub const ABSOLUTE_SERVICE_URI: OperationDescriptor = OperationDescriptor::new("absolute_service_uri", &[]);
    /// `request_http_method`
    pub const REQUEST_HTTP_METHOD: OperationDescriptor = OperationDescriptor::new("request_http_method", &[]);
    /// `request_accept`
    pub const REQUEST_ACCEPT: OperationDescriptor = OperationDescriptor::new("request_accept", &[]);
    /// `request_accept_charset`
    pub const REQUEST_ACCEPT_CHARSET: OperationDescriptor = OperationDescriptor::new("request_accept_charset", &[]);
    /// `request_content_type`
    pub const REQUEST_CONTENT_TYPE: OperationDescriptor = OperationDescriptor::new("request_content_type", &[]);
    /// `request_if_match`
    pub const REQUEST_IF_MATCH: OperationDescriptor = OperationDescriptor::new("request_if_match", &[]);
    /// `request_if_none_match`
    pub const REQUEST_IF_NONE_MATCH: OperationDescriptor = OperationDescriptor::new("request_if_none_match", &[]);
    /// `request_max_version`
    pub const REQUEST_MAX_VERSION: OperationDescriptor = OperationDescriptor::new("request_max_version", &[]);
    /// `request_version`
    pub const REQUEST_VERSION: OperationDescriptor = OperationDescriptor::new("request_version", &[]);
    /// `request_stream`
    pub const REQUEST_STREAM: OperationDescriptor = OperationDescriptor::new("request_stream", &[]);
    /// `response_stream`
    pub const RESPONSE_STREAM: OperationDescriptor = OperationDescriptor::new("response_stream", &[]);
    /// `set_response_cache_control`
    pub const SET_RESPONSE_CACHE_CONTROL: OperationDescriptor =
        OperationDescriptor::new("set_response_cache_control", &["value"]);
    /// `set_response_content_type`
    pub const SET_RESPONSE_CONTENT_TYPE: OperationDescriptor =
        OperationDescriptor::new("set_response_content_type", &["value"]);
    /// `set_response_etag`
    pub const SET_RESPONSE_ETAG: OperationDescriptor = OperationDescriptor::new("set_response_etag", &["value"]);
    /// `set_response_location`
    pub const SET_RESPONSE_LOCATION: OperationDescriptor =
        OperationDescriptor::new("set_response_location", &["value"]);
    /// `set_response_status_code`
    pub const SET_RESPONSE_STATUS_CODE: OperationDescriptor =
        OperationDescriptor::new("set_response_status_code", &["value"]);
    /// `set_response_version`
    pub const SET_RESPONSE_VERSION: OperationDescriptor =
        OperationDescriptor::new("set_response_version", &["value"]);
    /// `get_query_string_item`
    pub const GET_QUERY_STRING_ITEM: OperationDescriptor =
        OperationDescriptor::new("get_query_string_item", &["item"]);
    /// `process_exception`
    pub const PROCESS_EXCEPTION: OperationDescriptor = OperationDescriptor::new(
        "process_exception",
        &[
            "exception.type",
            "exception.message",
            "exception.response_status_code",
            "exception.use_verbose_errors",
            "exception.response_content_type",
            "exception.response_written",
        ],
    );
}

/// `HostProvider` operation table
pub static HOST_PROVIDER: CapabilityDescriptor = CapabilityDescriptor::new(
    "HostProvider",
    &[
        ops::ABSOLUTE_REQUEST_URI,
        ops::ABSOLUTE_SERVICE_URI,
        ops::REQUEST_HTTP_METHOD,
        ops::REQUEST_ACCEPT,
        ops::REQUEST_ACCEPT_CHARSET,
        ops::REQUEST_CONTENT_TYPE,
        ops::REQUEST_IF_MATCH,
        ops::REQUEST_IF_NONE_MATCH,
        ops::REQUEST_MAX_VERSION,
        ops::REQUEST_VERSION,
        ops::REQUEST_STREAM,
        ops::RESPONSE_STREAM,
        ops::SET_RESPONSE_CACHE_CONTROL,
        ops::SET_RESPONSE_CONTENT_TYPE,
        ops::SET_RESPONSE_ETAG,
        ops::SET_RESPONSE_LOCATION,
        ops::SET_RESPONSE_STATUS_CODE,
        ops::SET_RESPONSE_VERSION,
        ops::GET_QUERY_STRING_ITEM,
        ops::PROCESS_EXCEPTION,
    ],
);

/// Logger for [`HostProvider`] calls.
#[derive(Debug, Clone)]
pub struct HostLogger {
    logger: CapabilityLogger,
}

impl HostLogger {
    /// Bind to `recorder`
    pub fn new(recorder: Arc<CallRecorder>) -> Result<Self> {
        Ok(HostLogger {
            logger: CapabilityLogger::new(recorder, &HOST_PROVIDER)?,
        })
    }

    /// `HostProvider.absolute_request_uri`
    pub fn absolute_request_uri(&self) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::ABSOLUTE_REQUEST_URI, vec![])
    }

    /// `HostProvider.absolute_service_uri`
    pub fn absolute_service_uri(&self) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::ABSOLUTE_SERVICE_URI, vec![])
    }

    /// `HostProvider.request_http_method`
    pub fn request_http_method(&self) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::REQUEST_HTTP_METHOD, vec![])
    }

    /// `HostProvider.request_accept`
    pub fn request_accept(&self) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::REQUEST_ACCEPT, vec![])
    }

    /// `HostProvider.request_accept_charset`
    pub fn request_accept_charset(&self) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::REQUEST_ACCEPT_CHARSET, vec![])
    }

    /// `HostProvider.request_content_type`
    pub fn request_content_type(&self) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::REQUEST_CONTENT_TYPE, vec![])
    }

    /// `HostProvider.request_if_match`
    pub fn request_if_match(&self) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::REQUEST_IF_MATCH, vec![])
    }

    /// `HostProvider.request_if_none_match`
    pub fn request_if_none_match(&self) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::REQUEST_IF_NONE_MATCH, vec![])
    }

    /// `HostProvider.request_max_version`
    pub fn request_max_version(&self) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::REQUEST_MAX_VERSION, vec![])
    }

    /// `HostProvider.request_version`
    pub fn request_version(&self) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::REQUEST_VERSION, vec![])
    }

    /// `HostProvider.request_stream`
    pub fn request_stream(&self) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::REQUEST_STREAM, vec![])
    }

    /// `HostProvider.response_stream`
    pub fn response_stream(&self) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::RESPONSE_STREAM, vec![])
    }

    /// `HostProvider.set_response_cache_control`
    pub fn set_response_cache_control(&self, value: &str) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::SET_RESPONSE_CACHE_CONTROL, vec![value.into()])
    }

    /// `HostProvider.set_response_content_type`
    pub fn set_response_content_type(&self, value: &str) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::SET_RESPONSE_CONTENT_TYPE, vec![value.into()])
    }

    /// `HostProvider.set_response_etag`
    pub fn set_response_etag(&self, value: &str) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::SET_RESPONSE_ETAG, vec![value.into()])
    }

    /// `HostProvider.set_response_location`
    pub fn set_response_location(&self, value: &str) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::SET_RESPONSE_LOCATION, vec![value.into()])
    }

    /// `HostProvider.set_response_status_code`
    pub fn set_response_status_code(&self, value: u16) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::SET_RESPONSE_STATUS_CODE, vec![value.into()])
    }

    /// `HostProvider.set_response_version`
    pub fn set_response_version(&self, value: &str) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::SET_RESPONSE_VERSION, vec![value.into()])
    }

    /// `HostProvider.get_query_string_item`
    pub fn get_query_string_item(&self, item: &str) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::GET_QUERY_STRING_ITEM, vec![item.into()])
    }

    /// Expands `args` into `exception.*` slots.
    pub fn process_exception(&self, args: &HandleExceptionArgs) -> Result<CallGuard<'_>> {
        self.logger
            .log(&ops::PROCESS_EXCEPTION, exception_values(args).into())
    }
}
