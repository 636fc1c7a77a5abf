//! Capability trait implementations for [`Proxy`]
//!
//! Every method has the same shape:
//!
//! ```text
//! let inner = self.target(&TABLE)?;          // Disposed after dispose()
//! let _call = self.loggers.<family>.<op>(..)?; // enter; guard exits on drop
//! inner.<op>(..)                               // forward
//! ```

use callorder_capabilities::metadata::METADATA_PROVIDER;
use callorder_capabilities::paging::PAGING_PROVIDER;
use callorder_capabilities::query::QUERY_PROVIDER;
use callorder_capabilities::service::SERVICE_HOOKS;
use callorder_capabilities::update::UPDATE_PROVIDER;
use callorder_capabilities::{MetadataProvider, PagingProvider, QueryProvider, ServiceHooks, UpdateProvider};
use callorder_core::metadata::{
    AssociationSet, ChangesetArgs, HandleExceptionArgs, ProcessRequestArgs, ResourceProperty, ResourceQuery,
    ResourceSet, ResourceType, ServiceOperation,
};
use callorder_core::{ResourceRef, Result, Value};

use crate::proxy::Proxy;

// ============================================================================
// Update
// ============================================================================

impl<P: UpdateProvider> UpdateProvider for Proxy<P> {
    fn create_resource(&self, container_name: Option<&str>, full_type_name: &str) -> Result<ResourceRef> {
        let inner = self.target(&UPDATE_PROVIDER)?;
        let _call = self.loggers.update.create_resource(container_name, full_type_name)?;
        inner.create_resource(container_name, full_type_name)
    }

    fn get_resource(&self, query: &ResourceQuery, full_type_name: Option<&str>) -> Result<ResourceRef> {
        let inner = self.target(&UPDATE_PROVIDER)?;
        let _call = self.loggers.update.get_resource(query, full_type_name)?;
        inner.get_resource(query, full_type_name)
    }

    fn reset_resource(&self, resource: &ResourceRef) -> Result<ResourceRef> {
        let inner = self.target(&UPDATE_PROVIDER)?;
        let _call = self.loggers.update.reset_resource(resource)?;
        inner.reset_resource(resource)
    }

    fn set_value(&self, target_resource: &ResourceRef, property_name: &str, property_value: &Value) -> Result<()> {
        let inner = self.target(&UPDATE_PROVIDER)?;
        let _call = self
            .loggers
            .update
            .set_value(target_resource, property_name, property_value)?;
        inner.set_value(target_resource, property_name, property_value)
    }

    fn get_value(&self, target_resource: &ResourceRef, property_name: &str) -> Result<Value> {
        let inner = self.target(&UPDATE_PROVIDER)?;
        let _call = self.loggers.update.get_value(target_resource, property_name)?;
        inner.get_value(target_resource, property_name)
    }

    fn set_reference(
        &self,
        target_resource: &ResourceRef,
        property_name: &str,
        property_value: Option<&ResourceRef>,
    ) -> Result<()> {
        let inner = self.target(&UPDATE_PROVIDER)?;
        let _call = self
            .loggers
            .update
            .set_reference(target_resource, property_name, property_value)?;
        inner.set_reference(target_resource, property_name, property_value)
    }

    fn add_reference_to_collection(
        &self,
        target_resource: &ResourceRef,
        property_name: &str,
        resource_to_be_added: &ResourceRef,
    ) -> Result<()> {
        let inner = self.target(&UPDATE_PROVIDER)?;
        let _call = self.loggers.update.add_reference_to_collection(
            target_resource,
            property_name,
            resource_to_be_added,
        )?;
        inner.add_reference_to_collection(target_resource, property_name, resource_to_be_added)
    }

    fn remove_reference_from_collection(
        &self,
        target_resource: &ResourceRef,
        property_name: &str,
        resource_to_be_removed: &ResourceRef,
    ) -> Result<()> {
        let inner = self.target(&UPDATE_PROVIDER)?;
        let _call = self.loggers.update.remove_reference_from_collection(
            target_resource,
            property_name,
            resource_to_be_removed,
        )?;
        inner.remove_reference_from_collection(target_resource, property_name, resource_to_be_removed)
    }

    fn delete_resource(&self, target_resource: &ResourceRef) -> Result<()> {
        let inner = self.target(&UPDATE_PROVIDER)?;
        let _call = self.loggers.update.delete_resource(target_resource)?;
        inner.delete_resource(target_resource)
    }

    fn save_changes(&self) -> Result<()> {
        let inner = self.target(&UPDATE_PROVIDER)?;
        let _call = self.loggers.update.save_changes()?;
        inner.save_changes()
    }

    fn resolve_resource(&self, resource: &ResourceRef) -> Result<Value> {
        let inner = self.target(&UPDATE_PROVIDER)?;
        let _call = self.loggers.update.resolve_resource(resource)?;
        inner.resolve_resource(resource)
    }

    fn clear_changes(&self) -> Result<()> {
        let inner = self.target(&UPDATE_PROVIDER)?;
        let _call = self.loggers.update.clear_changes()?;
        inner.clear_changes()
    }

    fn set_concurrency_values(
        &self,
        resource_cookie: &ResourceRef,
        check_for_equality: Option<bool>,
        concurrency_values: &[(String, Value)],
    ) -> Result<()> {
        let inner = self.target(&UPDATE_PROVIDER)?;
        let _call = self.loggers.update.set_concurrency_values(
            resource_cookie,
            check_for_equality,
            concurrency_values,
        )?;
        inner.set_concurrency_values(resource_cookie, check_for_equality, concurrency_values)
    }
}

// ============================================================================
// Metadata
// ============================================================================

impl<P: MetadataProvider> MetadataProvider for Proxy<P> {
    fn container_name(&self) -> Result<String> {
        let inner = self.target(&METADATA_PROVIDER)?;
        let _call = self.loggers.metadata.container_name()?;
        inner.container_name()
    }

    fn container_namespace(&self) -> Result<String> {
        let inner = self.target(&METADATA_PROVIDER)?;
        let _call = self.loggers.metadata.container_namespace()?;
        inner.container_namespace()
    }

    fn types(&self) -> Result<Vec<ResourceType>> {
        let inner = self.target(&METADATA_PROVIDER)?;
        let _call = self.loggers.metadata.types()?;
        inner.types()
    }

    fn resource_sets(&self) -> Result<Vec<ResourceSet>> {
        let inner = self.target(&METADATA_PROVIDER)?;
        let _call = self.loggers.metadata.resource_sets()?;
        inner.resource_sets()
    }

    fn service_operations(&self) -> Result<Vec<ServiceOperation>> {
        let inner = self.target(&METADATA_PROVIDER)?;
        let _call = self.loggers.metadata.service_operations()?;
        inner.service_operations()
    }

    fn try_resolve_resource_set(&self, name: &str) -> Result<Option<ResourceSet>> {
        let inner = self.target(&METADATA_PROVIDER)?;
        let _call = self.loggers.metadata.try_resolve_resource_set(name)?;
        inner.try_resolve_resource_set(name)
    }

    fn get_resource_association_set(
        &self,
        resource_set: &ResourceSet,
        resource_type: &ResourceType,
        resource_property: &ResourceProperty,
    ) -> Result<Option<AssociationSet>> {
        let inner = self.target(&METADATA_PROVIDER)?;
        let _call = self.loggers.metadata.get_resource_association_set(
            resource_set,
            resource_type,
            resource_property,
        )?;
        inner.get_resource_association_set(resource_set, resource_type, resource_property)
    }

    fn try_resolve_resource_type(&self, name: &str) -> Result<Option<ResourceType>> {
        let inner = self.target(&METADATA_PROVIDER)?;
        let _call = self.loggers.metadata.try_resolve_resource_type(name)?;
        inner.try_resolve_resource_type(name)
    }

    fn get_derived_types(&self, resource_type: &ResourceType) -> Result<Vec<ResourceType>> {
        let inner = self.target(&METADATA_PROVIDER)?;
        let _call = self.loggers.metadata.get_derived_types(resource_type)?;
        inner.get_derived_types(resource_type)
    }

    fn has_derived_types(&self, resource_type: &ResourceType) -> Result<bool> {
        let inner = self.target(&METADATA_PROVIDER)?;
        let _call = self.loggers.metadata.has_derived_types(resource_type)?;
        inner.has_derived_types(resource_type)
    }

    fn try_resolve_service_operation(&self, name: &str) -> Result<Option<ServiceOperation>> {
        let inner = self.target(&METADATA_PROVIDER)?;
        let _call = self.loggers.metadata.try_resolve_service_operation(name)?;
        inner.try_resolve_service_operation(name)
    }
}

// ============================================================================
// Query
// ============================================================================

impl<P: QueryProvider> QueryProvider for Proxy<P> {
    fn current_data_source(&self) -> Result<Value> {
        let inner = self.target(&QUERY_PROVIDER)?;
        let _call = self.loggers.query.current_data_source()?;
        inner.current_data_source()
    }

    fn set_current_data_source(&self, data_source: &Value) -> Result<()> {
        let inner = self.target(&QUERY_PROVIDER)?;
        let _call = self.loggers.query.set_current_data_source(data_source)?;
        inner.set_current_data_source(data_source)
    }

    fn is_null_propagation_required(&self) -> Result<bool> {
        let inner = self.target(&QUERY_PROVIDER)?;
        let _call = self.loggers.query.is_null_propagation_required()?;
        inner.is_null_propagation_required()
    }

    fn get_query_root_for_resource_set(&self, resource_set: &ResourceSet) -> Result<ResourceQuery> {
        let inner = self.target(&QUERY_PROVIDER)?;
        let _call = self.loggers.query.get_query_root_for_resource_set(resource_set)?;
        inner.get_query_root_for_resource_set(resource_set)
    }

    fn get_resource_type(&self, target: &ResourceRef) -> Result<Option<ResourceType>> {
        let inner = self.target(&QUERY_PROVIDER)?;
        let _call = self.loggers.query.get_resource_type(target)?;
        inner.get_resource_type(target)
    }

    fn get_property_value(&self, target: &ResourceRef, resource_property: &ResourceProperty) -> Result<Value> {
        let inner = self.target(&QUERY_PROVIDER)?;
        let _call = self.loggers.query.get_property_value(target, resource_property)?;
        inner.get_property_value(target, resource_property)
    }

    fn get_open_property_value(&self, target: &ResourceRef, property_name: &str) -> Result<Value> {
        let inner = self.target(&QUERY_PROVIDER)?;
        let _call = self.loggers.query.get_open_property_value(target, property_name)?;
        inner.get_open_property_value(target, property_name)
    }

    fn get_open_property_values(&self, target: &ResourceRef) -> Result<Vec<(String, Value)>> {
        let inner = self.target(&QUERY_PROVIDER)?;
        let _call = self.loggers.query.get_open_property_values(target)?;
        inner.get_open_property_values(target)
    }

    fn invoke_service_operation(&self, service_operation: &ServiceOperation, parameters: &[Value]) -> Result<Value> {
        let inner = self.target(&QUERY_PROVIDER)?;
        let _call = self
            .loggers
            .query
            .invoke_service_operation(service_operation, parameters)?;
        inner.invoke_service_operation(service_operation, parameters)
    }
}

// ============================================================================
// Paging
// ============================================================================

impl<P: PagingProvider> PagingProvider for Proxy<P> {
    fn set_continuation_token(
        &self,
        query: &ResourceQuery,
        resource_type: &ResourceType,
        continuation_token: &[Value],
    ) -> Result<()> {
        let inner = self.target(&PAGING_PROVIDER)?;
        let _call = self
            .loggers
            .paging
            .set_continuation_token(query, resource_type, continuation_token)?;
        inner.set_continuation_token(query, resource_type, continuation_token)
    }

    fn get_continuation_token(&self, enumerator: &ResourceQuery) -> Result<Vec<Value>> {
        let inner = self.target(&PAGING_PROVIDER)?;
        let _call = self.loggers.paging.get_continuation_token(enumerator)?;
        inner.get_continuation_token(enumerator)
    }
}

// ============================================================================
// Service hooks
// ============================================================================

impl<P: ServiceHooks> ServiceHooks for Proxy<P> {
    fn on_start_processing_request(&self, args: &ProcessRequestArgs) -> Result<()> {
        let inner = self.target(&SERVICE_HOOKS)?;
        let _call = self.loggers.service.on_start_processing_request(args)?;
        inner.on_start_processing_request(args)
    }

    fn processing_request(&self, args: &ProcessRequestArgs) -> Result<()> {
        let inner = self.target(&SERVICE_HOOKS)?;
        let _call = self.loggers.service.processing_request(args)?;
        inner.processing_request(args)
    }

    fn processed_request(&self, args: &ProcessRequestArgs) -> Result<()> {
        let inner = self.target(&SERVICE_HOOKS)?;
        let _call = self.loggers.service.processed_request(args)?;
        inner.processed_request(args)
    }

    fn processing_changeset(&self, args: &ChangesetArgs) -> Result<()> {
        let inner = self.target(&SERVICE_HOOKS)?;
        let _call = self.loggers.service.processing_changeset(args)?;
        inner.processing_changeset(args)
    }

    fn processed_changeset(&self, args: &ChangesetArgs) -> Result<()> {
        let inner = self.target(&SERVICE_HOOKS)?;
        let _call = self.loggers.service.processed_changeset(args)?;
        inner.processed_changeset(args)
    }

    fn handle_exception(&self, args: &HandleExceptionArgs) -> Result<()> {
        let inner = self.target(&SERVICE_HOOKS)?;
        let _call = self.loggers.service.handle_exception(args)?;
        inner.handle_exception(args)
    }
}
