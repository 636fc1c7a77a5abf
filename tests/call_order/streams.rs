//! Stream Tests
//!
//! Streams returned by a proxied provider come back wrapped and record their
//! own reads, writes and disposal.

use crate::*;

fn media(content: &[u8]) -> Media {
    Media {
        content: content.to_vec(),
        ..Default::default()
    }
}

#[test]
fn test_read_stream_records_buffer_shape() {
    let (sink, instr) = memory_fixture();
    let provider = instr.wrap(media(b"PNG..."));

    let mut stream = provider
        .get_read_stream(&customer(1), None, None, &request_context())
        .unwrap();
    let mut buffer = [0u8; 10];
    let n = stream.read(&mut buffer, 0, 10).unwrap();
    assert_eq!(&buffer[..n], b"PNG...");
    drop(stream);

    let entries = sink.drain();
    let names: Vec<&str> = entries.iter().map(|e| e.method_name()).collect();
    assert_eq!(
        names,
        [
            "StreamProvider.get_read_stream",
            "DataStream.read",
            "DataStream.dispose",
        ]
    );
    assert_eq!(entries[0].argument("etag"), Some("null"));
    assert_eq!(entries[0].argument("check_etag_for_equality"), Some("null"));
    assert_eq!(entries[1].argument("buffer"), Some("byte[10]"));
    assert_eq!(entries[1].argument("count"), Some("10"));
}

#[test]
fn test_write_stream_records_written_bytes() {
    let (sink, instr) = memory_fixture();
    let provider = instr.wrap(media(b""));

    let mut stream = provider
        .get_write_stream(&customer(1), Some("W/\"1\""), Some(true), &request_context())
        .unwrap();
    stream.write(b"abc", 0, 3).unwrap();
    stream.flush().unwrap();
    stream.close().unwrap();
    drop(stream);

    let log = CallLog::from_memory(&sink);
    log.assert_order(&[
        "StreamProvider.get_write_stream",
        "DataStream.write",
        "DataStream.flush",
        "DataStream.close",
        "DataStream.dispose",
    ])
    .unwrap();
    assert_eq!(log.entries()[1].argument("buffer"), Some("YWJj"));
    assert_eq!(log.entries()[0].argument("etag"), Some("W/\"1\""));
}

#[test]
fn test_stream_calls_inside_provider_call_are_not_recorded() {
    let (sink, instr) = memory_fixture();
    let provider = instr.wrap(media(b"0123456789"));
    let store = instr.wrap(Store::default());

    let mut stream = provider
        .get_read_stream(&customer(1), None, None, &request_context())
        .unwrap();

    // Hold a call open so the stream read nests inside it.
    let recorder = instr.recorder().clone();
    let outer = recorder
        .enter("Host.copy", |_| Ok(CallEntry::new("Host.copy", Vec::<(String, String)>::new())))
        .unwrap();
    let mut buffer = [0u8; 4];
    stream.read(&mut buffer, 0, 4).unwrap();
    drop(outer);

    store.save_changes().unwrap();
    drop(stream);

    assert_eq!(
        sink.method_names(),
        [
            "StreamProvider.get_read_stream",
            "Host.copy",
            "UpdateProvider.save_changes",
            "DataStream.dispose",
        ]
    );
}

#[test]
fn test_scalar_stream_operations() {
    let (sink, instr) = memory_fixture();
    let provider = instr.wrap(media(b""));
    let ctx = request_context();

    assert_eq!(provider.stream_buffer_size().unwrap(), 64 * 1024);
    assert_eq!(provider.get_stream_content_type(&customer(1), &ctx).unwrap(), "image/png");
    assert_eq!(provider.resolve_type("Photos", &ctx).unwrap(), "Northwind.Photo");

    let entries = sink.drain();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[2].argument("entity_set_name"), Some("Photos"));
    assert_eq!(
        entries[2].argument("operation_context.request_method"),
        Some("GET")
    );
}

#[test]
fn test_streams_outlive_disposed_provider() {
    let (sink, instr) = memory_fixture();
    let mut provider = instr.wrap_disposable(media(b"xyz"));

    let mut stream = provider
        .get_read_stream(&customer(1), None, None, &request_context())
        .unwrap();
    provider.dispose().unwrap();

    let mut buffer = [0u8; 3];
    assert_eq!(stream.read(&mut buffer, 0, 3).unwrap(), 3);
    drop(stream);

    assert_eq!(
        sink.method_names(),
        [
            "StreamProvider.get_read_stream",
            "Disposable.dispose",
            "DataStream.read",
            "DataStream.dispose",
        ]
    );
}
