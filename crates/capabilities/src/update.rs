//! Update capability
//!
//! Resource creation, modification and deletion, plus the change set
//! lifecycle (`save_changes`, `clear_changes`).

use std::sync::Arc;

use callorder_core::metadata::ResourceQuery;
use callorder_core::{canonicalize, CapabilityDescriptor, OperationDescriptor, ResourceRef, Result, Value};
use callorder_recorder::{CallGuard, CallRecorder};

use crate::logger::CapabilityLogger;

/// Provider-side resource updates.
pub trait UpdateProvider {
    /// Create a resource of `full_type_name`, adding it to `container_name`
    /// when given.
    fn create_resource(&self, container_name: Option<&str>, full_type_name: &str) -> Result<ResourceRef>;

    /// Fetch the single resource selected by `query`.
    fn get_resource(&self, query: &ResourceQuery, full_type_name: Option<&str>) -> Result<ResourceRef>;

    /// Reset a resource to its default values.
    fn reset_resource(&self, resource: &ResourceRef) -> Result<ResourceRef>;

    /// Set a property value.
    fn set_value(&self, target_resource: &ResourceRef, property_name: &str, property_value: &Value) -> Result<()>;

    /// Read a property value.
    fn get_value(&self, target_resource: &ResourceRef, property_name: &str) -> Result<Value>;

    /// Set or clear a single-valued reference.
    fn set_reference(
        &self,
        target_resource: &ResourceRef,
        property_name: &str,
        property_value: Option<&ResourceRef>,
    ) -> Result<()>;

    /// Add a resource to a collection-valued reference.
    fn add_reference_to_collection(
        &self,
        target_resource: &ResourceRef,
        property_name: &str,
        resource_to_be_added: &ResourceRef,
    ) -> Result<()>;

    /// Remove a resource from a collection-valued reference.
    fn remove_reference_from_collection(
        &self,
        target_resource: &ResourceRef,
        property_name: &str,
        resource_to_be_removed: &ResourceRef,
    ) -> Result<()>;

    /// Delete a resource.
    fn delete_resource(&self, target_resource: &ResourceRef) -> Result<()>;

    /// Commit pending changes.
    fn save_changes(&self) -> Result<()>;

    /// Turn a resource handle into the value returned to the client.
    fn resolve_resource(&self, resource: &ResourceRef) -> Result<Value>;

    /// Discard pending changes.
    fn clear_changes(&self) -> Result<()>;

    /// Supply concurrency tokens for a resource about to be modified.
    fn set_concurrency_values(
        &self,
        resource_cookie: &ResourceRef,
        check_for_equality: Option<bool>,
        concurrency_values: &[(String, Value)],
    ) -> Result<()>;
}

/// Operation declarations
pub mod ops {
    use super::OperationDescriptor;

    /// `create_resource`
    pub const CREATE_RESOURCE: OperationDescriptor =
        OperationDescriptor::new("create_resource", &["container_name", "full_type_name"]);
    /// `get_resource`
    pub const GET_RESOURCE: OperationDescriptor =
        OperationDescriptor::new("get_resource", &["query", "full_type_name"]);
    /// `reset_resource`
    pub const RESET_RESOURCE: OperationDescriptor = OperationDescriptor::new("reset_resource", &["resource"]);
    /// `set_value`
    pub const SET_VALUE: OperationDescriptor = OperationDescriptor::new(
        "set_value",
        &["target_resource", "property_name", "property_value"],
    );
    /// `get_value`
    pub const GET_VALUE: OperationDescriptor =
        OperationDescriptor::new("get_value", &["target_resource", "property_name"]);
    /// `set_reference`
    pub const SET_REFERENCE: OperationDescriptor = OperationDescriptor::new(
        "set_reference",
        &["target_resource", "property_name", "property_value"],
    );
    /// `add_reference_to_collection`
    pub const ADD_REFERENCE_TO_COLLECTION: OperationDescriptor = OperationDescriptor::new(
        "add_reference_to_collection",
        &["target_resource", "property_name", "resource_to_be_added"],
    );
    /// `remove_reference_from_collection`
    pub const REMOVE_REFERENCE_FROM_COLLECTION: OperationDescriptor = OperationDescriptor::new(
        "remove_reference_from_collection",
        &["target_resource", "property_name", "resource_to_be_removed"],
    );
    /// `delete_resource`
    pub const DELETE_RESOURCE: OperationDescriptor =
        OperationDescriptor::new("delete_resource", &["target_resource"]);
    /// `save_changes`
    pub const SAVE_CHANGES: OperationDescriptor = OperationDescriptor::new("save_changes", &[]);
    /// `resolve_resource`
    pub const RESOLVE_RESOURCE: OperationDescriptor = OperationDescriptor::new("resolve_resource", &["resource"]);
    /// `clear_changes`
    pub const CLEAR_CHANGES: OperationDescriptor = OperationDescriptor::new("clear_changes", &[]);
    /// `set_concurrency_values`
    pub const SET_CONCURRENCY_VALUES: OperationDescriptor = OperationDescriptor::new(
        "set_concurrency_values",
        &["resource_cookie", "check_for_equality", "concurrency_values"],
    );
}

/// `UpdateProvider` operation table
pub static UPDATE_PROVIDER: CapabilityDescriptor = CapabilityDescriptor::new(
    "UpdateProvider",
    &[
        ops::CREATE_RESOURCE,
        ops::GET_RESOURCE,
        ops::RESET_RESOURCE,
        ops::SET_VALUE,
        ops::GET_VALUE,
        ops::SET_REFERENCE,
        ops::ADD_REFERENCE_TO_COLLECTION,
        ops::REMOVE_REFERENCE_FROM_COLLECTION,
        ops::DELETE_RESOURCE,
        ops::SAVE_CHANGES,
        ops::RESOLVE_RESOURCE,
        ops::CLEAR_CHANGES,
        ops::SET_CONCURRENCY_VALUES,
    ],
);

/// Logger for [`UpdateProvider`] calls.
#[derive(Debug, Clone)]
pub struct UpdateLogger {
    logger: CapabilityLogger,
}

impl UpdateLogger {
    /// Bind to `recorder`
    pub fn new(recorder: Arc<CallRecorder>) -> Result<Self> {
        Ok(UpdateLogger {
            logger: CapabilityLogger::new(recorder, &UPDATE_PROVIDER)?,
        })
    }

    /// Log `UpdateProvider.create_resource`
    pub fn create_resource(&self, container_name: Option<&str>, full_type_name: &str) -> Result<CallGuard<'_>> {
        self.logger
            .log(&ops::CREATE_RESOURCE, vec![container_name.into(), full_type_name.into()])
    }

    /// Queries are recorded by their expression text.
    pub fn get_resource(&self, query: &ResourceQuery, full_type_name: Option<&str>) -> Result<CallGuard<'_>> {
        self.logger.log(
            &ops::GET_RESOURCE,
            vec![query.expression.as_str().into(), full_type_name.into()],
        )
    }

    /// Log `UpdateProvider.reset_resource`
    pub fn reset_resource(&self, resource: &ResourceRef) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::RESET_RESOURCE, vec![resource.into()])
    }

    /// Log `UpdateProvider.set_value`
    pub fn set_value(
        &self,
        target_resource: &ResourceRef,
        property_name: &str,
        property_value: &Value,
    ) -> Result<CallGuard<'_>> {
        self.logger.log(
            &ops::SET_VALUE,
            vec![target_resource.into(), property_name.into(), property_value.clone()],
        )
    }

    /// Log `UpdateProvider.get_value`
    pub fn get_value(&self, target_resource: &ResourceRef, property_name: &str) -> Result<CallGuard<'_>> {
        self.logger
            .log(&ops::GET_VALUE, vec![target_resource.into(), property_name.into()])
    }

    /// Log `UpdateProvider.set_reference`
    pub fn set_reference(
        &self,
        target_resource: &ResourceRef,
        property_name: &str,
        property_value: Option<&ResourceRef>,
    ) -> Result<CallGuard<'_>> {
        self.logger.log(
            &ops::SET_REFERENCE,
            vec![target_resource.into(), property_name.into(), property_value.into()],
        )
    }

    /// Log `UpdateProvider.add_reference_to_collection`
    pub fn add_reference_to_collection(
        &self,
        target_resource: &ResourceRef,
        property_name: &str,
        resource_to_be_added: &ResourceRef,
    ) -> Result<CallGuard<'_>> {
        self.logger.log(
            &ops::ADD_REFERENCE_TO_COLLECTION,
            vec![target_resource.into(), property_name.into(), resource_to_be_added.into()],
        )
    }

    /// Log `UpdateProvider.remove_reference_from_collection`
    pub fn remove_reference_from_collection(
        &self,
        target_resource: &ResourceRef,
        property_name: &str,
        resource_to_be_removed: &ResourceRef,
    ) -> Result<CallGuard<'_>> {
        self.logger.log(
            &ops::REMOVE_REFERENCE_FROM_COLLECTION,
            vec![target_resource.into(), property_name.into(), resource_to_be_removed.into()],
        )
    }

    /// Log `UpdateProvider.delete_resource`
    pub fn delete_resource(&self, target_resource: &ResourceRef) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::DELETE_RESOURCE, vec![target_resource.into()])
    }

    /// Log `UpdateProvider.save_changes`
    pub fn save_changes(&self) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::SAVE_CHANGES, vec![])
    }

    /// Log `UpdateProvider.resolve_resource`
    pub fn resolve_resource(&self, resource: &ResourceRef) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::RESOLVE_RESOURCE, vec![resource.into()])
    }

    /// Log `UpdateProvider.clear_changes`
    pub fn clear_changes(&self) -> Result<CallGuard<'_>> {
        self.logger.log(&ops::CLEAR_CHANGES, vec![])
    }

    /// Concurrency values are recorded as one `name=value, ...` slot.
    pub fn set_concurrency_values(
        &self,
        resource_cookie: &ResourceRef,
        check_for_equality: Option<bool>,
        concurrency_values: &[(String, Value)],
    ) -> Result<CallGuard<'_>> {
        self.logger.log(
            &ops::SET_CONCURRENCY_VALUES,
            vec![
                resource_cookie.into(),
                check_for_equality.into(),
                join_pairs(concurrency_values).into(),
            ],
        )
    }
}

fn join_pairs(pairs: &[(String, Value)]) -> String {
    pairs
        .iter()
        .map(|(name, value)| format!("{}={}", name, canonicalize(value)))
        .collect::<Vec<_>>()
        .join(", ")
}
