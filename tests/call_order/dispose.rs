//! Dispose Tests
//!
//! Disposing a proxy records `Disposable.dispose`, releases the provider and
//! turns every later call into an error.

use crate::*;

#[test]
fn test_dispose_is_recorded_and_forwarded() {
    let fx = directory_fixture();
    let disposed = Rc::new(Cell::new(0));
    let mut provider = fx.instr.wrap_disposable(Media {
        disposed: disposed.clone(),
        ..Default::default()
    });

    provider.stream_buffer_size().unwrap();
    provider.dispose().unwrap();

    assert_eq!(disposed.get(), 1);
    fx.log()
        .assert_order(&["StreamProvider.stream_buffer_size", "Disposable.dispose"])
        .unwrap();
}

#[test]
fn test_calls_after_dispose_fail_unrecorded() {
    let (sink, instr) = memory_fixture();
    let mut provider = instr.wrap_disposable(Media::default());
    provider.dispose().unwrap();

    let err = provider.get_stream_etag(&customer(1), &request_context()).unwrap_err();
    assert!(matches!(err, Error::Disposed { ref capability } if capability == "StreamProvider"));
    assert_eq!(sink.method_names(), ["Disposable.dispose"]);
}

#[test]
fn test_second_dispose_is_a_no_op() {
    let (sink, instr) = memory_fixture();
    let disposed = Rc::new(Cell::new(0));
    let mut provider = instr.wrap_disposable(Media {
        disposed: disposed.clone(),
        ..Default::default()
    });

    provider.dispose().unwrap();
    provider.dispose().unwrap();

    assert_eq!(disposed.get(), 1);
    assert_eq!(sink.sequence(), 1);
}

#[test]
fn test_dispose_while_not_recording_still_releases() {
    let (sink, instr) = memory_fixture();
    sink.set_active(false);
    let disposed = Rc::new(Cell::new(0));
    let mut provider = instr.wrap_disposable(Media {
        disposed: disposed.clone(),
        ..Default::default()
    });

    provider.dispose().unwrap();
    assert_eq!(disposed.get(), 1);
    assert!(provider.is_disposed());
    assert!(sink.entries().is_empty());
}

#[test]
fn test_dispose_through_trait_object() {
    let (sink, instr) = memory_fixture();
    let mut providers: Vec<Box<dyn Dispose>> = vec![
        Box::new(instr.wrap(Model)),
        Box::new(instr.wrap_disposable(Media::default())),
    ];
    for provider in providers.iter_mut() {
        provider.dispose().unwrap();
    }
    assert_eq!(sink.method_names(), ["Disposable.dispose", "Disposable.dispose"]);
}
