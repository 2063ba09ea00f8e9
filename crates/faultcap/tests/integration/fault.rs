use expectorate::assert_contents;
use faultcap::{Fault, FaultLocation, PANIC_NAME, capture};
use faultcap_test_utils::{
    fault_props::{assert_different_faults, assert_same_fault},
    unwind::{PanicKind, catch_payload},
};
use std::thread;
use test_strategy::proptest;

#[proptest]
fn proptest_raised_fault_is_captured_verbatim(fault: Fault) {
    let captured =
        capture(|| fault.clone_detached().raise()).expect("raise panics");
    assert_same_fault(&captured, &fault);
    assert_eq!(captured.location().map(|l| l.file()), Some(file!()));
}

#[proptest]
fn proptest_payload_translation(kind: PanicKind) {
    // Translating a raw payload and capturing at a boundary agree.
    let payload = catch_payload(|| kind.trigger()).expect("trigger panics");
    let translated = Fault::from_payload(payload);
    let captured = capture(|| kind.trigger()).expect("trigger panics");
    assert_same_fault(&translated, &kind.expected_fault());
    assert_same_fault(&captured, &translated);
}

#[test]
fn custom_faults_are_not_plain_panics() {
    let fault = capture(|| Fault::new("Overflow", "counter wrapped").raise())
        .expect("raise panics");
    assert!(!fault.is_panic());
    assert_eq!(fault.name(), "Overflow");

    let fault = capture(|| panic!("plain")).expect("work panicked");
    assert!(fault.is_panic());
    assert_eq!(fault.name(), PANIC_NAME);
}

#[test]
fn user_info_distinguishes_faults() {
    let a = Fault::new("Timeout", "no reply").with_user_info("peer", "db-1");
    let b = Fault::new("Timeout", "no reply").with_user_info("peer", "db-2");
    assert_different_faults(&a, &b);
    assert_different_faults(&a, &Fault::new("Timeout", "no reply"));

    let overwritten =
        Fault::new("Timeout", "no reply").with_user_info("peer", "db-2");
    let overwritten = overwritten.with_user_info("peer", "db-1");
    assert_same_fault(&overwritten, &a);
}

#[test]
fn resume_message_panic() {
    let resumed = capture(|| {
        let inner = capture(|| panic!("first attempt")).expect("panicked");
        inner.resume();
    })
    .expect("resume panics");
    assert_eq!(resumed.reason(), "first attempt");

    // Code outside this crate sees the original message payload.
    let payload = catch_payload(|| {
        capture(|| panic!("first attempt")).expect("panicked").resume()
    })
    .expect("resume panics");
    assert_eq!(
        payload.downcast_ref::<String>().map(String::as_str),
        Some("first attempt")
    );
}

#[test]
fn resume_keeps_raised_fault_and_location() {
    let original_line = line!() + 2;
    let inner = capture(|| {
        Fault::new("Conflict", "stale version").with_user_info("v", "3").raise()
    })
    .expect("raise panics");

    let resumed = capture(|| inner.resume()).expect("resume panics");
    assert_same_fault(
        &resumed,
        &Fault::new("Conflict", "stale version").with_user_info("v", "3"),
    );
    assert_eq!(resumed.location().map(|l| l.line()), Some(original_line));
}

#[test]
fn resume_opaque_payload() {
    let fault = capture(|| std::panic::panic_any(vec!['a', 'b']))
        .expect("panic_any panics");
    assert_eq!(fault.payload_ref::<Vec<char>>(), Some(&vec!['a', 'b']));

    let payload = catch_payload(|| fault.resume()).expect("resume panics");
    assert_eq!(payload.downcast_ref::<Vec<char>>(), Some(&vec!['a', 'b']));
}

#[test]
fn clone_detached_drops_only_the_payload() {
    let fault = capture(|| std::panic::panic_any(5_i32)).expect("panicked");
    let copy = fault.clone_detached();
    assert_same_fault(&copy, &fault);
    assert_eq!(copy.location(), fault.location());
    assert_eq!(copy.thread_name(), fault.thread_name());
    assert_eq!(copy.payload_ref::<i32>(), None);
}

#[test]
fn error_trait_object() {
    let fault = capture(|| panic!("as error")).expect("panicked");
    let error: Box<dyn std::error::Error + Send> = Box::new(fault);
    assert_eq!(error.to_string(), "panic: as error");
    assert!(error.source().is_none());
}

#[test]
fn report_fixture() {
    let fault = Fault::new("ReplicationLag", "follower is 42 writes behind")
        .with_user_info("follower", "db-2")
        .with_user_info("lag", "42")
        .with_location(FaultLocation::new("src/replica.rs", 88, 13));

    // Capture on a named thread so the report includes the thread line. The
    // preset location is kept.
    let captured = thread::Builder::new()
        .name("replica-sync".to_owned())
        .spawn(move || capture(|| fault.raise()))
        .expect("spawned thread")
        .join()
        .expect("capture does not let the panic escape")
        .expect("raise panics");

    assert_contents(
        "tests/output/fault_report.txt",
        &captured.report().to_string(),
    );
}
