use faultcap::{Fault, capture};
use faultcap_test_utils::serde_utils::assert_serialize_roundtrip;
use std::thread;
use test_strategy::proptest;

#[proptest]
fn proptest_serialize_roundtrip(fault: Fault) {
    assert_serialize_roundtrip(&fault);
}

#[test]
fn captured_fault_roundtrip() {
    let fault = thread::Builder::new()
        .name("serde-worker".to_owned())
        .spawn(|| capture(|| panic!("with diagnostics")))
        .expect("spawned thread")
        .join()
        .expect("capture does not let the panic escape")
        .expect("work panicked");
    assert!(fault.location().is_some());
    assert_serialize_roundtrip(&fault);
}

#[test]
fn opaque_payload_is_not_serialized() {
    let fault = capture(|| std::panic::panic_any(9_u8)).expect("panicked");
    let json = serde_json::to_value(&fault).unwrap();
    assert_eq!(json["reason"], "Box<dyn Any>");
    assert!(json.get("payload").is_none());
    assert_serialize_roundtrip(&fault);
}
