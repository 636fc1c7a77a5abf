//! Resource metadata and request shapes exchanged with providers
//!
//! These are the host-side descriptions a provider resolves or receives:
//! resource sets and types, properties, service operations, and the request
//! bundles passed to stream and service-level hooks. Loggers record metadata
//! objects by name and expand the request bundles field by field.

/// Kind of a resource type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceTypeKind {
    /// Addressable entity with a key
    EntityType,
    /// Structured value without identity
    ComplexType,
    /// Primitive value type
    Primitive,
}

/// A type in the provider's model.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceType {
    /// Namespace-qualified name
    pub full_name: String,
    /// Kind of type
    pub kind: ResourceTypeKind,
}

impl ResourceType {
    /// An entity type
    pub fn entity(full_name: impl Into<String>) -> Self {
        ResourceType {
            full_name: full_name.into(),
            kind: ResourceTypeKind::EntityType,
        }
    }

    /// A complex type
    pub fn complex(full_name: impl Into<String>) -> Self {
        ResourceType {
            full_name: full_name.into(),
            kind: ResourceTypeKind::ComplexType,
        }
    }
}

/// A named set of entities of one type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceSet {
    /// Set name
    pub name: String,
    /// Full name of the element type
    pub element_type: String,
}

impl ResourceSet {
    /// Create a resource set
    pub fn new(name: impl Into<String>, element_type: impl Into<String>) -> Self {
        ResourceSet {
            name: name.into(),
            element_type: element_type.into(),
        }
    }
}

/// A declared property of a resource type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceProperty {
    /// Property name
    pub name: String,
    /// Whether the property navigates to other resources
    pub is_navigation: bool,
}

impl ResourceProperty {
    /// A primitive/complex property
    pub fn value(name: impl Into<String>) -> Self {
        ResourceProperty {
            name: name.into(),
            is_navigation: false,
        }
    }

    /// A navigation property
    pub fn navigation(name: impl Into<String>) -> Self {
        ResourceProperty {
            name: name.into(),
            is_navigation: true,
        }
    }
}

/// Association between two resource sets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssociationSet {
    /// Association set name
    pub name: String,
}

/// A provider-defined service operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceOperation {
    /// Operation name
    pub name: String,
    /// HTTP method the operation answers to
    pub method: String,
}

/// A query over a resource set.
///
/// Recorded by its expression text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceQuery {
    /// Set the query is rooted at
    pub resource_set: String,
    /// Query expression text
    pub expression: String,
}

impl ResourceQuery {
    /// Query rooted at `resource_set`
    pub fn new(resource_set: impl Into<String>, expression: impl Into<String>) -> Self {
        ResourceQuery {
            resource_set: resource_set.into(),
            expression: expression.into(),
        }
    }
}

/// Per-request context handed to stream and processing hooks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationContext {
    /// Absolute URI of the request
    pub absolute_request_uri: String,
    /// Absolute URI of the service root
    pub absolute_service_uri: String,
    /// HTTP method
    pub request_method: String,
    /// Request headers in arrival order
    pub request_headers: Vec<(String, String)>,
}

impl OperationContext {
    /// Context for a request without headers
    pub fn new(
        request_method: impl Into<String>,
        absolute_request_uri: impl Into<String>,
        absolute_service_uri: impl Into<String>,
    ) -> Self {
        OperationContext {
            absolute_request_uri: absolute_request_uri.into(),
            absolute_service_uri: absolute_service_uri.into(),
            request_method: request_method.into(),
            request_headers: Vec::new(),
        }
    }

    /// First header value named `name` (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.request_headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Arguments of the start-of-request hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRequestArgs {
    /// Request URI
    pub request_uri: String,
    /// Whether the request is a batch
    pub is_batch_operation: bool,
    /// Request context
    pub operation_context: OperationContext,
}

/// Arguments of the changeset hooks inside a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangesetArgs {
    /// Position of the changeset within its batch
    pub index: usize,
    /// Number of operations in the changeset
    pub operation_count: usize,
    /// Request context of the enclosing batch
    pub operation_context: OperationContext,
}

/// Arguments of exception handling hooks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleExceptionArgs {
    /// Type name of the failure
    pub exception_type: String,
    /// Failure message
    pub message: String,
    /// Status code the response will carry
    pub response_status_code: u16,
    /// Whether verbose errors are sent to the client
    pub use_verbose_errors: bool,
    /// Content type of the error response
    pub response_content_type: Option<String>,
    /// Whether part of the response was already written
    pub response_written: bool,
}

impl HandleExceptionArgs {
    /// Arguments for a failure that has not touched the response yet
    pub fn new(
        exception_type: impl Into<String>,
        message: impl Into<String>,
        response_status_code: u16,
    ) -> Self {
        HandleExceptionArgs {
            exception_type: exception_type.into(),
            message: message.into(),
            response_status_code,
            use_verbose_errors: false,
            response_content_type: None,
            response_written: false,
        }
    }
}
