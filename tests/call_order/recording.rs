//! Top-Level Recording Tests
//!
//! One entry per top-level call, with arguments in declaration order.

use crate::*;

// =============================================================================
// ARGUMENTS
// =============================================================================

#[test]
fn test_call_is_forwarded_and_recorded() {
    let (sink, instr) = memory_fixture();
    let store = instr.wrap(Store::default());

    let created = store.create_resource(Some("Customers"), "Northwind.Customer").unwrap();
    assert_eq!(created.id(), 1);

    let entry = sink.drain().remove(0);
    assert_eq!(entry.method_name(), "UpdateProvider.create_resource");
    assert_eq!(
        entry.arguments(),
        &[
            ("container_name".to_string(), "Customers".to_string()),
            ("full_type_name".to_string(), "Northwind.Customer".to_string()),
        ]
    );
}

#[test]
fn test_absent_arguments_record_null() {
    let (sink, instr) = memory_fixture();
    let store = instr.wrap(Store::default());

    store.create_resource(None, "Northwind.Customer").unwrap();
    store.set_reference(&order(7), "Customer", None).unwrap();

    let entries = sink.drain();
    assert_eq!(entries[0].argument("container_name"), Some("null"));
    assert_eq!(entries[1].argument("property_value"), Some("null"));
}

#[test]
fn test_resources_record_their_type_name() {
    let (sink, instr) = memory_fixture();
    let store = instr.wrap(Store::default());

    store
        .set_value(&customer(1), "CompanyName", &Value::from("Alfreds"))
        .unwrap();
    store.add_reference_to_collection(&customer(1), "Orders", &order(10248)).unwrap();

    let entries = sink.drain();
    assert_eq!(entries[0].argument("target_resource"), Some("Customer"));
    assert_eq!(entries[0].argument("property_value"), Some("Alfreds"));
    assert_eq!(entries[1].argument("resource_to_be_added"), Some("Order"));
}

#[test]
fn test_concurrency_values_are_joined() {
    let (sink, instr) = memory_fixture();
    let store = instr.wrap(Store::default());

    store
        .set_concurrency_values(
            &customer(1),
            Some(true),
            &[
                ("Version".to_string(), Value::Int(3)),
                ("ETag".to_string(), Value::Null),
            ],
        )
        .unwrap();

    let entry = sink.drain().remove(0);
    assert_eq!(entry.argument("check_for_equality"), Some("true"));
    assert_eq!(entry.argument("concurrency_values"), Some("Version=3, ETag=null"));
}

// =============================================================================
// SEQUENCING
// =============================================================================

#[test]
fn test_each_top_level_call_advances_sequence_by_one() {
    let (sink, instr) = memory_fixture();
    let store = instr.wrap(Store::default());
    let resource = customer(1);

    for expected in 1..=5u64 {
        store.get_value(&resource, "City").unwrap();
        assert_eq!(sink.sequence(), expected);
    }
}

#[test]
fn test_order_matches_call_order() {
    let (sink, instr) = memory_fixture();
    let store = instr.wrap(Store::default());

    let resource = store.create_resource(Some("Customers"), "Northwind.Customer").unwrap();
    store.set_value(&resource, "City", &Value::from("Berlin")).unwrap();
    store.save_changes().unwrap();
    store.resolve_resource(&resource).unwrap();

    CallLog::from_memory(&sink)
        .assert_order(&[
            "UpdateProvider.create_resource",
            "UpdateProvider.set_value",
            "UpdateProvider.save_changes",
            "UpdateProvider.resolve_resource",
        ])
        .unwrap();
}

// =============================================================================
// PROVIDER FAILURES
// =============================================================================

#[test]
fn test_provider_error_passes_through_and_call_stays_recorded() {
    let (sink, instr) = memory_fixture();
    let store = instr.wrap(Store::failing());

    let err = store.save_changes().unwrap_err();
    assert!(matches!(err, Error::Provider(ref m) if m == "save rejected"));
    assert_eq!(sink.method_names(), ["UpdateProvider.save_changes"]);
    assert_eq!(instr.depth(), 0);

    store.clear_changes().unwrap();
    assert_eq!(sink.sequence(), 2);
}

#[test]
fn test_inactive_sink_records_nothing() {
    let (sink, instr) = memory_fixture();
    sink.set_active(false);
    let store = instr.wrap(Store::default());

    store.save_changes().unwrap();
    assert!(!instr.is_recording());
    assert_eq!(sink.sequence(), 0);

    sink.set_active(true);
    store.save_changes().unwrap();
    assert_eq!(sink.method_names(), ["UpdateProvider.save_changes"]);
}

#[test]
fn test_disabled_config_records_nothing() {
    let sink = Arc::new(MemorySink::new());
    let config = RecordingConfig::default().enabled(false);
    let instr = Instrumentation::with_sink(sink.clone(), &config).unwrap();
    let store = instr.wrap(Store::default());

    store.save_changes().unwrap();
    assert!(sink.entries().is_empty());
}

// =============================================================================
// ENTRY TEXT
// =============================================================================

mod entry_text {
    use crate::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_recorded_entries_decode_to_themselves(
            property_name in any::<String>(),
            property_value in any::<String>(),
        ) {
            let (sink, instr) = memory_fixture();
            let store = instr.wrap(Store::default());
            store
                .set_value(&customer(7), &property_name, &Value::from(property_value.clone()))
                .unwrap();

            let entry = sink.drain().remove(0);
            prop_assert_eq!(entry.argument("property_value"), Some(property_value.as_str()));
            let text = encode_entry(&entry).unwrap();
            prop_assert_eq!(decode_entry(&text).unwrap(), entry);
        }
    }
}
