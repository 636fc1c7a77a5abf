//! Metadata capability
//!
//! Model resolution: containers, resource sets, types and service operations.
//! Metadata objects are recorded by name.

use std::sync::Arc;

use callorder_core::metadata::{AssociationSet, ResourceProperty, ResourceSet, ResourceType, ServiceOperation};
use callorder_core::{CapabilityDescriptor, OperationDescriptor, Result};
use callorder_recorder::{CallGuard, CallRecorder};

use crate::logger::CapabilityLogger;

/// Provider-side model description.
pub trait MetadataProvider {
    /// Name of the entity container
    fn container_name(&self) -> Result<String>;
    /// Namespace of the entity container
    fn container_namespace(&self) -> Result<String>;
    /// Every type in the model
    fn types(&self) -> Result<Vec<ResourceType>>;
    /// Every resource set in the model
    fn resource_sets(&self) -> Result<Vec<ResourceSet>>;
    /// Every service operation in the model
    fn service_operations(&self) -> Result<Vec<ServiceOperation>>;
    /// Resource set named `name`, if any
    fn try_resolve_resource_set(&self, name: &str) -> Result<Option<ResourceSet>>;
    /// Association set reached through a navigation property
    fn get_resource_association_set(
        &self,
        resource_set: &ResourceSet,
        resource_type: &ResourceType,
        resource_property: &ResourceProperty,
    ) -> Result<Option<AssociationSet>>;
    /// Type named `name`, if any
    fn try_resolve_resource_type(&self, name: &str) -> Result<Option<ResourceType>>;
    /// Types deriving from `resource_type`
    fn get_derived_types(&self, resource_type: &ResourceType) -> Result<Vec<ResourceType>>;
    /// Whether any type derives from `resource_type`
    fn has_derived_types(&self, resource_type: &ResourceType) -> Result<bool>;
    /// Service operation named `name`, if any
    fn try_resolve_service_operation(&self, name: &str) -> Result<Option<ServiceOperation>>;
}

/// Operation declarations
pub mod ops {
    use super::OperationDescriptor;

    /// `container_name`
    pub const CONTAINER_NAME: OperationDescriptor = OperationDescriptor::new("container_name", &[]);
    /// `container_namespace`
    pub const CONTAINER_NAMESPACE: OperationDescriptor = OperationDescriptor::new("container_namespace", &[]);
    /// `types`
    pub const TYPES: OperationDescriptor = OperationDescriptor::new("types", &[]);
    /// `resource_sets`
    pub const RESOURCE_SETS: OperationDescriptor = OperationDescriptor::new("resource_sets", &[]);
    /// `service_operations`
    pub const SERVICE_OPERATIONS: OperationDescriptor = OperationDescriptor::new("service_operations", &[]);
    /// `try_resolve_resource_set`
    pub const TRY_RESOLVE_RESOURCE_SET: OperationDescriptor =
        OperationDescriptor::new("try_resolve_resource_set", &["name"]);
    /// `get_resource_association_set`
    pub const GET_RESOURCE_ASSOCIATION_SET: OperationDescriptor = OperationDescriptor::new(
        "get_resource_association_set",
        &["resource_set", "resource_type", "resource_property"],
    );
    /// `try_resolve_resource_type`
    pub const TRY_RESOLVE_RESOURCE_TYPE: OperationDescriptor =
        OperationDescriptor::new("try_resolve_resource_type", &["name"]);
    /// `get_derived_types`
    pub const GET_DERIVED_TYPES: OperationDescriptor =
        OperationDescriptor::new("get_derived_types", &["resource_type"]);
    /// `has_derived_types`
    pub const HAS_DERIVED_TYPES: OperationDescriptor =
        OperationDescriptor::new("has_derived_types", &["resource_type"]);
    /// `try_resolve_service_operation`
    pub const TRY_RESOLVE_SERVICE_OPERATION: OperationDescriptor =
        OperationDescriptor::new("try_resolve_service_operation", &["name"]);
}

/// `MetadataProvider` operation table
pub static METADATA_PROVIDER: CapabilityDescriptor = CapabilityDescriptor::new(
    "MetadataProvider",
    &[
        ops::CONTAINER_NAME,
        ops::CONTAINER_NAMESPACE,
        ops::TYPES,
        ops::RESOURCE_SETS,
        ops::SERVICE_OPERATIONS,
        ops::TRY_RESOLVE_RESOURCE_SET,
        ops::GET_RESOURCE_ASSOCIATION_SET,
        ops::TRY_RESOLVE_RESOURCE_TYPE,
        ops::GET_DERIVED_TYPES,
        ops::HAS_DERIVED_TYPES,
        ops::TRY_RESOLVE_SERVICE_OPERATION,
    ],
);

/// Logger for [`MetadataProvider`] calls.
#[derive(Debug, Clone)]
pub struct MetadataLogger {
    logger: CapabilityLogger,
}

impl MetadataLogger {
    /// Bind to `recorder`
    pub fn new(recorder: Arc<CallRecorder>) -> Result<Self> {
        Ok(MetadataLogger {
            logger: CapabilityLogger::new(recorder, &METADATA_PROVIDER)?,
        })
    }

    /// `MetadataProvider.container_name`
    pub fn container_name(&self) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::CONTAINER_NAME, vec![])
    }

    /// `MetadataProvider.container_namespace`
    pub fn container_namespace(&self) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::CONTAINER_NAMESPACE, vec![])
    }

    /// `MetadataProvider.types`
    pub fn types(&self) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::TYPES, vec![])
    }

    /// `MetadataProvider.resource_sets`
    pub fn resource_sets(&self) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::RESOURCE_SETS, vec![])
    }

    /// `MetadataProvider.service_operations`
    pub fn service_operations(&self) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::SERVICE_OPERATIONS, vec![])
    }

    /// `MetadataProvider.try_resolve_resource_set`
    pub fn try_resolve_resource_set(&self, name: &str) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::TRY_RESOLVE_RESOURCE_SET, vec![name.into()])
    }

    /// `MetadataProvider.get_resource_association_set`
    pub fn get_resource_association_set(
        &self,
        resource_set: &ResourceSet,
        resource_type: &ResourceType,
        resource_property: &ResourceProperty,
    ) -> Result<CallGuard<'_>> {
        self.logger.log(
            &ops::GET_RESOURCE_ASSOCIATION_SET,
            vec![
                resource_set.name.as_str().into(),
                resource_type.full_name.as_str().into(),
                resource_property.name.as_str().into(),
            ],
        )
    }

    /// `MetadataProvider.try_resolve_resource_type`
    pub fn try_resolve_resource_type(&self, name: &str) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::TRY_RESOLVE_RESOURCE_TYPE, vec![name.into()])
    }

    /// `MetadataProvider.get_derived_types`
    pub fn get_derived_types(&self, resource_type: &ResourceType) -> Result<CallGuard<'_>> {
        self.logger
            .log(&ops::GET_DERIVED_TYPES, vec![resource_type.full_name.as_str().into()])
    }

    /// `MetadataProvider.has_derived_types`
    pub fn has_derived_types(&self, resource_type: &ResourceType) -> Result<CallGuard<'_>> {
        self.logger
            .log(&ops::HAS_DERIVED_TYPES, vec![resource_type.full_name.as_str().into()])
    }

    /// `MetadataProvider.try_resolve_service_operation`
    pub fn try_resolve_service_operation(&self, name: &str) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::TRY_RESOLVE_SERVICE_OPERATION, vec![name.into()])
    }
}
