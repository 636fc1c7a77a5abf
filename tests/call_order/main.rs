//! Call Order Integration Test Suite
//!
//! Drives fake providers through proxies the way a host would and checks what
//! lands in the log directory.
//!
//! ## Key Verification Points
//!
//! 1. Only top-level calls are recorded; nested provider calls are not
//! 2. Nesting depth returns to zero however a call ends
//! 3. Entries are numbered in call order and file names sort in that order
//! 4. The marker file switches recording between calls
//! 5. Streams handed out by proxied providers record their own calls
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test call_order
//! cargo test --test call_order streams::
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use callorder::metadata::{
    AssociationSet, ChangesetArgs, HandleExceptionArgs, OperationContext, ProcessRequestArgs,
    ResourceProperty, ResourceQuery, ResourceSet, ResourceType, ServiceOperation,
};
use callorder::{decode_entry, encode_entry};
use callorder::prelude::*;
use tempfile::TempDir;

// Test modules
pub mod directory;
pub mod dispose;
pub mod nesting;
pub mod recording;
pub mod streams;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

/// Recording into a temporary workspace with the marker in place
pub struct DirFixture {
    pub temp: TempDir,
    pub config: RecordingConfig,
    pub instr: Instrumentation,
}

impl DirFixture {
    /// Control handle over the same log directory
    pub fn control(&self) -> DirectorySink {
        DirectorySink::new(self.config.sink.clone())
    }

    /// Everything recorded so far, read back from disk
    pub fn log(&self) -> CallLog {
        CallLog::load(&self.config.sink).expect("Failed to load call log")
    }
}

/// Create a directory-backed fixture with recording enabled
pub fn directory_fixture() -> DirFixture {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let config = RecordingConfig::new(temp.path()).capture_stack(StackCapture::Never);
    DirectorySink::new(config.sink.clone())
        .enable()
        .expect("Failed to enable recording");
    let instr = Instrumentation::from_config(&config).expect("Failed to build instrumentation");
    DirFixture {
        temp,
        config,
        instr,
    }
}

/// Create an in-memory fixture
pub fn memory_fixture() -> (Arc<MemorySink>, Instrumentation) {
    let sink = Arc::new(MemorySink::new());
    let config = RecordingConfig::default().capture_stack(StackCapture::Never);
    let instr = Instrumentation::with_sink(sink.clone(), &config)
        .expect("Failed to build instrumentation");
    (sink, instr)
}

pub fn customer(id: u64) -> ResourceRef {
    ResourceRef::new(id, TypeInfo::new("Northwind.Customer"))
}

pub fn order(id: u64) -> ResourceRef {
    ResourceRef::new(id, TypeInfo::new("Northwind.Order"))
}

pub fn request_context() -> OperationContext {
    OperationContext::new(
        "GET",
        "http://localhost/service.svc/Customers(1)/$value",
        "http://localhost/service.svc/",
    )
}

// =============================================================================
// FAKE PROVIDERS
// =============================================================================

/// Metadata for a two-type model
#[derive(Default)]
pub struct Model;

impl MetadataProvider for Model {
    fn container_name(&self) -> Result<String> {
        Ok("NorthwindEntities".into())
    }

    fn container_namespace(&self) -> Result<String> {
        Ok("Northwind".into())
    }

    fn types(&self) -> Result<Vec<ResourceType>> {
        Ok(vec![
            ResourceType::entity("Northwind.Customer"),
            ResourceType::entity("Northwind.Order"),
        ])
    }

    fn resource_sets(&self) -> Result<Vec<ResourceSet>> {
        Ok(vec![
            ResourceSet::new("Customers", "Northwind.Customer"),
            ResourceSet::new("Orders", "Northwind.Order"),
        ])
    }

    fn service_operations(&self) -> Result<Vec<ServiceOperation>> {
        Ok(vec![])
    }

    fn try_resolve_resource_set(&self, name: &str) -> Result<Option<ResourceSet>> {
        Ok(self.resource_sets()?.into_iter().find(|s| s.name == name))
    }

    fn get_resource_association_set(
        &self,
        _resource_set: &ResourceSet,
        _resource_type: &ResourceType,
        _resource_property: &ResourceProperty,
    ) -> Result<Option<AssociationSet>> {
        Ok(None)
    }

    fn try_resolve_resource_type(&self, name: &str) -> Result<Option<ResourceType>> {
        Ok(self.types()?.into_iter().find(|t| t.full_name == name))
    }

    fn get_derived_types(&self, _resource_type: &ResourceType) -> Result<Vec<ResourceType>> {
        Ok(vec![])
    }

    fn has_derived_types(&self, _resource_type: &ResourceType) -> Result<bool> {
        Ok(false)
    }

    fn try_resolve_service_operation(&self, _name: &str) -> Result<Option<ServiceOperation>> {
        Ok(None)
    }
}

/// Update provider backed by a property map.
///
/// When built with a proxied [`Model`], `create_resource` and `save_changes`
/// consult it, which makes those calls nest.
#[derive(Default)]
pub struct Store {
    next_id: Cell<u64>,
    values: RefCell<HashMap<(u64, String), Value>>,
    model: Option<Proxy<Model>>,
    pub fail_saves: bool,
}

impl Store {
    pub fn with_model(model: Proxy<Model>) -> Self {
        Store {
            model: Some(model),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Store {
            fail_saves: true,
            ..Default::default()
        }
    }
}

impl UpdateProvider for Store {
    fn create_resource(&self, _container_name: Option<&str>, full_type_name: &str) -> Result<ResourceRef> {
        if let Some(model) = &self.model {
            if model.try_resolve_resource_type(full_type_name)?.is_none() {
                return Err(Error::provider(format!("unknown type {}", full_type_name)));
            }
        }
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        Ok(ResourceRef::new(id, TypeInfo::new(full_type_name)))
    }

    fn get_resource(&self, _query: &ResourceQuery, full_type_name: Option<&str>) -> Result<ResourceRef> {
        Ok(ResourceRef::new(1, TypeInfo::new(full_type_name.unwrap_or("Northwind.Customer"))))
    }

    fn reset_resource(&self, resource: &ResourceRef) -> Result<ResourceRef> {
        self.values.borrow_mut().retain(|(id, _), _| *id != resource.id());
        Ok(resource.clone())
    }

    fn set_value(&self, target_resource: &ResourceRef, property_name: &str, property_value: &Value) -> Result<()> {
        self.values
            .borrow_mut()
            .insert((target_resource.id(), property_name.to_string()), property_value.clone());
        Ok(())
    }

    fn get_value(&self, target_resource: &ResourceRef, property_name: &str) -> Result<Value> {
        Ok(self
            .values
            .borrow()
            .get(&(target_resource.id(), property_name.to_string()))
            .cloned()
            .unwrap_or(Value::Null))
    }

    fn set_reference(
        &self,
        target_resource: &ResourceRef,
        property_name: &str,
        property_value: Option<&ResourceRef>,
    ) -> Result<()> {
        let value = property_value.map(|r| Value::Object(r.clone())).unwrap_or(Value::Null);
        self.set_value(target_resource, property_name, &value)
    }

    fn add_reference_to_collection(
        &self,
        _target_resource: &ResourceRef,
        _property_name: &str,
        _resource_to_be_added: &ResourceRef,
    ) -> Result<()> {
        Ok(())
    }

    fn remove_reference_from_collection(
        &self,
        _target_resource: &ResourceRef,
        _property_name: &str,
        _resource_to_be_removed: &ResourceRef,
    ) -> Result<()> {
        Ok(())
    }

    fn delete_resource(&self, target_resource: &ResourceRef) -> Result<()> {
        self.reset_resource(target_resource).map(|_| ())
    }

    fn save_changes(&self) -> Result<()> {
        if self.fail_saves {
            return Err(Error::provider("save rejected"));
        }
        if let Some(model) = &self.model {
            model.container_name()?;
        }
        Ok(())
    }

    fn resolve_resource(&self, resource: &ResourceRef) -> Result<Value> {
        Ok(Value::Object(resource.clone()))
    }

    fn clear_changes(&self) -> Result<()> {
        self.values.borrow_mut().clear();
        Ok(())
    }

    fn set_concurrency_values(
        &self,
        _resource_cookie: &ResourceRef,
        _check_for_equality: Option<bool>,
        _concurrency_values: &[(String, Value)],
    ) -> Result<()> {
        Ok(())
    }
}

/// Paging provider that panics when asked for a token
pub struct Exploding;

impl PagingProvider for Exploding {
    fn set_continuation_token(
        &self,
        _query: &ResourceQuery,
        _resource_type: &ResourceType,
        _continuation_token: &[Value],
    ) -> Result<()> {
        Ok(())
    }

    fn get_continuation_token(&self, _enumerator: &ResourceQuery) -> Result<Vec<Value>> {
        panic!("enumerator lost");
    }
}

/// Service hooks that accept everything
#[derive(Default)]
pub struct Hooks {
    pub calls: Cell<u32>,
}

impl ServiceHooks for Hooks {
    fn on_start_processing_request(&self, _args: &ProcessRequestArgs) -> Result<()> {
        self.calls.set(self.calls.get() + 1);
        Ok(())
    }

    fn processing_request(&self, _args: &ProcessRequestArgs) -> Result<()> {
        self.calls.set(self.calls.get() + 1);
        Ok(())
    }

    fn processed_request(&self, _args: &ProcessRequestArgs) -> Result<()> {
        self.calls.set(self.calls.get() + 1);
        Ok(())
    }

    fn processing_changeset(&self, _args: &ChangesetArgs) -> Result<()> {
        self.calls.set(self.calls.get() + 1);
        Ok(())
    }

    fn processed_changeset(&self, _args: &ChangesetArgs) -> Result<()> {
        self.calls.set(self.calls.get() + 1);
        Ok(())
    }

    fn handle_exception(&self, _args: &HandleExceptionArgs) -> Result<()> {
        self.calls.set(self.calls.get() + 1);
        Ok(())
    }
}

/// In-memory stream over a byte vector
#[derive(Default)]
pub struct VecStream {
    pub data: Vec<u8>,
    pub pos: usize,
}

impl DataStream for VecStream {
    fn read(&mut self, buffer: &mut [u8], offset: usize, count: usize) -> Result<usize> {
        let n = count.min(self.data.len() - self.pos);
        buffer[offset..offset + n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }

    fn write(&mut self, buffer: &[u8], offset: usize, count: usize) -> Result<()> {
        self.data.extend_from_slice(&buffer[offset..offset + count]);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Media storage handing out in-memory streams; counts disposals
#[derive(Default)]
pub struct Media {
    pub content: Vec<u8>,
    pub disposed: Rc<Cell<u32>>,
}

impl StreamProvider for Media {
    fn stream_buffer_size(&self) -> Result<usize> {
        Ok(64 * 1024)
    }

    fn get_read_stream(
        &self,
        _entity: &ResourceRef,
        _etag: Option<&str>,
        _check_etag_for_equality: Option<bool>,
        _operation_context: &OperationContext,
    ) -> Result<Box<dyn DataStream>> {
        Ok(Box::new(VecStream {
            data: self.content.clone(),
            pos: 0,
        }))
    }

    fn get_write_stream(
        &self,
        _entity: &ResourceRef,
        _etag: Option<&str>,
        _check_etag_for_equality: Option<bool>,
        _operation_context: &OperationContext,
    ) -> Result<Box<dyn DataStream>> {
        Ok(Box::new(VecStream::default()))
    }

    fn delete_stream(&self, _entity: &ResourceRef, _operation_context: &OperationContext) -> Result<()> {
        Ok(())
    }

    fn get_stream_content_type(&self, _entity: &ResourceRef, _operation_context: &OperationContext) -> Result<String> {
        Ok("image/png".into())
    }

    fn get_read_stream_uri(
        &self,
        _entity: &ResourceRef,
        _operation_context: &OperationContext,
    ) -> Result<Option<String>> {
        Ok(None)
    }

    fn get_stream_etag(&self, _entity: &ResourceRef, _operation_context: &OperationContext) -> Result<Option<String>> {
        Ok(Some("W/\"1\"".into()))
    }

    fn resolve_type(&self, _entity_set_name: &str, _operation_context: &OperationContext) -> Result<String> {
        Ok("Northwind.Photo".into())
    }
}

impl Dispose for Media {
    fn dispose(&mut self) -> Result<()> {
        self.disposed.set(self.disposed.get() + 1);
        Ok(())
    }
}
