//! Nesting Tests
//!
//! Calls a provider makes into another proxied provider while handling a
//! call are not recorded, and the depth counter always unwinds.

use std::panic::{self, AssertUnwindSafe};

use crate::*;

#[test]
fn test_nested_calls_are_not_recorded() {
    let (sink, instr) = memory_fixture();
    let model = instr.wrap(Model);
    let store = instr.wrap(Store::with_model(model));

    store.create_resource(Some("Customers"), "Northwind.Customer").unwrap();
    store.save_changes().unwrap();

    assert_eq!(
        sink.method_names(),
        ["UpdateProvider.create_resource", "UpdateProvider.save_changes"]
    );
    assert_eq!(instr.depth(), 0);
}

#[test]
fn test_same_provider_called_directly_is_recorded() {
    let (sink, instr) = memory_fixture();
    let model = instr.wrap(Model);

    model.container_name().unwrap();
    model.try_resolve_resource_type("Northwind.Order").unwrap();

    let entries = sink.drain();
    assert_eq!(entries[0].method_name(), "MetadataProvider.container_name");
    assert!(entries[0].arguments().is_empty());
    assert_eq!(entries[1].argument("name"), Some("Northwind.Order"));
}

#[test]
fn test_nested_failure_unwinds_depth() {
    let (sink, instr) = memory_fixture();
    let store = instr.wrap(Store::with_model(instr.wrap(Model)));

    let err = store.create_resource(None, "Northwind.Missing").unwrap_err();
    assert!(matches!(err, Error::Provider(_)));
    assert_eq!(instr.depth(), 0);
    assert_eq!(sink.method_names(), ["UpdateProvider.create_resource"]);
}

#[test]
fn test_panic_in_provider_unwinds_depth() {
    let (sink, instr) = memory_fixture();
    let pager = instr.wrap(Exploding);

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pager.get_continuation_token(&ResourceQuery::new("Orders", "Orders"))
    }));
    assert!(result.is_err());
    assert_eq!(instr.depth(), 0);

    pager
        .set_continuation_token(
            &ResourceQuery::new("Orders", "Orders"),
            &ResourceType::entity("Northwind.Order"),
            &[Value::Int(10248)],
        )
        .unwrap();
    assert_eq!(
        sink.method_names(),
        [
            "PagingProvider.get_continuation_token",
            "PagingProvider.set_continuation_token",
        ]
    );
}

#[test]
fn test_proxies_from_cloned_context_share_depth() {
    let (sink, instr) = memory_fixture();
    let other = instr.clone();
    let store = instr.wrap(Store::with_model(other.wrap(Model)));

    store.save_changes().unwrap();
    assert_eq!(sink.sequence(), 1);
    assert_eq!(other.depth(), 0);
}

#[test]
fn test_request_lifecycle_order() {
    let (sink, instr) = memory_fixture();
    let hooks = instr.wrap(Hooks::default());
    let store = instr.wrap(Store::default());

    let args = ProcessRequestArgs {
        request_uri: "http://localhost/service.svc/$batch".into(),
        is_batch_operation: true,
        operation_context: request_context(),
    };
    let changeset = ChangesetArgs {
        index: 0,
        operation_count: 1,
        operation_context: request_context(),
    };

    hooks.on_start_processing_request(&args).unwrap();
    hooks.processing_request(&args).unwrap();
    hooks.processing_changeset(&changeset).unwrap();
    store.save_changes().unwrap();
    hooks.processed_changeset(&changeset).unwrap();
    hooks.processed_request(&args).unwrap();

    assert_eq!(hooks.inner().map(|h| h.calls.get()), Some(5));
    CallLog::from_memory(&sink)
        .assert_order(&[
            "ServiceHooks.on_start_processing_request",
            "ServiceHooks.processing_request",
            "ServiceHooks.processing_changeset",
            "UpdateProvider.save_changes",
            "ServiceHooks.processed_changeset",
            "ServiceHooks.processed_request",
        ])
        .unwrap();

    let entries = sink.entries();
    assert_eq!(entries[0].argument("request.is_batch_operation"), Some("true"));
    assert_eq!(entries[2].argument("changeset.operation_count"), Some("1"));
}
