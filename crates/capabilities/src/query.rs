//! Query capability

use std::sync::Arc;

use callorder_core::metadata::{ResourceProperty, ResourceQuery, ResourceSet, ResourceType, ServiceOperation};
use callorder_core::{CapabilityDescriptor, OperationDescriptor, ResourceRef, Result, Value};
use callorder_recorder::{CallGuard, CallRecorder};

use crate::logger::CapabilityLogger;

/// Provider-side query execution.
pub trait QueryProvider {
    /// Data source queries run against
    fn current_data_source(&self) -> Result<Value>;
    /// Replace the data source
    fn set_current_data_source(&self, data_source: &Value) -> Result<()>;
    /// Whether generated queries must guard against null navigation
    fn is_null_propagation_required(&self) -> Result<bool>;
    /// Root query of a resource set
    fn get_query_root_for_resource_set(&self, resource_set: &ResourceSet) -> Result<ResourceQuery>;
    /// Type of a resource, if the provider knows it
    fn get_resource_type(&self, target: &ResourceRef) -> Result<Option<ResourceType>>;
    /// Value of a declared property
    fn get_property_value(&self, target: &ResourceRef, resource_property: &ResourceProperty) -> Result<Value>;
    /// Value of an open (undeclared) property
    fn get_open_property_value(&self, target: &ResourceRef, property_name: &str) -> Result<Value>;
    /// Every open property of a resource
    fn get_open_property_values(&self, target: &ResourceRef) -> Result<Vec<(String, Value)>>;
    /// Run a service operation
    fn invoke_service_operation(&self, service_operation: &ServiceOperation, parameters: &[Value]) -> Result<Value>;
}

/// Operation declarations
pub mod ops {
    use super::OperationDescriptor;

    /// `current_data_source`
    pub const CURRENT_DATA_SOURCE: OperationDescriptor = OperationDescriptor::new("current_data_source", &[]);
    /// `set_current_data_source`
    pub const SET_CURRENT_DATA_SOURCE: OperationDescriptor =
        OperationDescriptor::new("set_current_data_source", &["data_source"]);
    /// `is_null_propagation_required`
    pub const IS_NULL_PROPAGATION_REQUIRED: OperationDescriptor =
        OperationDescriptor::new("is_null_propagation_required", &[]);
    /// `get_query_root_for_resource_set`
    pub const GET_QUERY_ROOT_FOR_RESOURCE_SET: OperationDescriptor =
        OperationDescriptor::new("get_query_root_for_resource_set", &["resource_set"]);
    /// `get_resource_type`
    pub const GET_RESOURCE_TYPE: OperationDescriptor = OperationDescriptor::new("get_resource_type", &["target"]);
    /// `get_property_value`
    pub const GET_PROPERTY_VALUE: OperationDescriptor =
        OperationDescriptor::new("get_property_value", &["target", "resource_property"]);
    /// `get_open_property_value`
    pub const GET_OPEN_PROPERTY_VALUE: OperationDescriptor =
        OperationDescriptor::new("get_open_property_value", &["target", "property_name"]);
    /// `get_open_property_values`
    pub const GET_OPEN_PROPERTY_VALUES: OperationDescriptor =
        OperationDescriptor::new("get_open_property_values", &["target"]);
    /// `invoke_service_operation`
    pub const INVOKE_SERVICE_OPERATION: OperationDescriptor =
        OperationDescriptor::new("invoke_service_operation", &["service_operation", "parameters"]);
}

/// `QueryProvider` operation table
pub static QUERY_PROVIDER: CapabilityDescriptor = CapabilityDescriptor::new(
    "QueryProvider",
    &[
        ops::CURRENT_DATA_SOURCE,
        ops::SET_CURRENT_DATA_SOURCE,
        ops::IS_NULL_PROPAGATION_REQUIRED,
        ops::GET_QUERY_ROOT_FOR_RESOURCE_SET,
        ops::GET_RESOURCE_TYPE,
        ops::GET_PROPERTY_VALUE,
        ops::GET_OPEN_PROPERTY_VALUE,
        ops::GET_OPEN_PROPERTY_VALUES,
        ops::INVOKE_SERVICE_OPERATION,
    ],
);

/// Logger for [`QueryProvider`] calls.
#[derive(Debug, Clone)]
pub struct QueryLogger {
    logger: CapabilityLogger,
}

impl QueryLogger {
    /// Bind to `recorder`
    pub fn new(recorder: Arc<CallRecorder>) -> Result<Self> {
        Ok(QueryLogger {
            logger: CapabilityLogger::new(recorder, &QUERY_PROVIDER)?,
        })
    }

    /// Log `QueryProvider.current_data_source`
    pub fn current_data_source(&self) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::CURRENT_DATA_SOURCE, vec![])
    }

    /// Log `QueryProvider.set_current_data_source`
    pub fn set_current_data_source(&self, data_source: &Value) -> Result<CallGuard<'_>> {
        self.logger
            .log(&ops::SET_CURRENT_DATA_SOURCE, vec![data_source.clone()])
    }

    /// Log `QueryProvider.is_null_propagation_required`
    pub fn is_null_propagation_required(&self) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::IS_NULL_PROPAGATION_REQUIRED, vec![])
    }

    /// Log `QueryProvider.get_query_root_for_resource_set`
    pub fn get_query_root_for_resource_set(&self, resource_set: &ResourceSet) -> Result<CallGuard<'_>> {
        self.logger.log(
            &ops::GET_QUERY_ROOT_FOR_RESOURCE_SET,
            vec![resource_set.name.as_str().into()],
        )
    }

    /// Log `QueryProvider.get_resource_type`
    pub fn get_resource_type(&self, target: &ResourceRef) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::GET_RESOURCE_TYPE, vec![target.into()])
    }

    /// Log `QueryProvider.get_property_value`
    pub fn get_property_value(
        &self,
        target: &ResourceRef,
        resource_property: &ResourceProperty,
    ) -> Result<CallGuard<'_>> {
        self.logger.log(
            &ops::GET_PROPERTY_VALUE,
            vec![target.into(), resource_property.name.as_str().into()],
        )
    }

    /// Log `QueryProvider.get_open_property_value`
    pub fn get_open_property_value(&self, target: &ResourceRef, property_name: &str) -> Result<CallGuard<'_>> {
        self.logger
            .log(&ops::GET_OPEN_PROPERTY_VALUE, vec![target.into(), property_name.into()])
    }

    /// Log `QueryProvider.get_open_property_values`
    pub fn get_open_property_values(&self, target: &ResourceRef) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::GET_OPEN_PROPERTY_VALUES, vec![target.into()])
    }

    /// Parameters are recorded by shape, `object[N]`.
    pub fn invoke_service_operation(
        &self,
        service_operation: &ServiceOperation,
        parameters: &[Value],
    ) -> Result<CallGuard<'_>> {
        self.logger.log(
            &ops::INVOKE_SERVICE_OPERATION,
            vec![service_operation.name.as_str().into(), parameters.into()],
        )
    }
}
