//! Serde-related test utilities.

use crate::fault_props::assert_same_fault;
use faultcap::Fault;

pub fn assert_serialize_roundtrip(fault: &Fault) {
    let serialized = serde_json::to_string(fault).unwrap();
    let deserialized: Fault = serde_json::from_str(&serialized).unwrap();
    assert_same_fault(&deserialized, fault);
    assert_eq!(deserialized.location(), fault.location(), "locations match");
    assert_eq!(
        deserialized.thread_name(),
        fault.thread_name(),
        "thread names match"
    );
    assert_eq!(deserialized.backtrace(), fault.backtrace(), "backtraces match");

    // Serializing again must produce the same text, since the payload is the
    // only thing left out.
    let reserialized = serde_json::to_string(&deserialized).unwrap();
    assert_eq!(serialized, reserialized, "serialization is stable");
}
