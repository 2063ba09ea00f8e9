use faultcap::{
    CaptureOptions, Fault, PANIC_NAME, capture_result, errors::CaptureError,
};
use faultcap_test_utils::fault_props::assert_same_fault;
use std::{error::Error, fmt, io};

#[derive(Debug, PartialEq)]
struct Rejected(u32);

impl fmt::Display for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rejected with code {}", self.0)
    }
}

impl Error for Rejected {}

fn check(code: u32) -> Result<&'static str, Rejected> {
    match code {
        0 => Ok("accepted"),
        1..=99 => Err(Rejected(code)),
        _ => panic!("code {code} out of range"),
    }
}

#[test]
fn value_passes_through() {
    let result = capture_result(|| check(0));
    assert_eq!(result.expect("no error"), "accepted");
}

#[test]
fn returned_error_is_failed() {
    let error = capture_result(|| check(7)).expect_err("work failed");
    assert_eq!(error.failure(), Some(&Rejected(7)));
    assert!(error.fault().is_none());
    assert_eq!(error.to_string(), "work returned an error: rejected with code 7");
    let source = error.source().expect("source is the returned error");
    assert_eq!(source.to_string(), "rejected with code 7");
}

#[test]
fn panic_is_fault() {
    let error = capture_result(|| check(512)).expect_err("work panicked");
    assert!(error.failure().is_none());
    assert_eq!(
        error.to_string(),
        "work raised a fault: panic: code 512 out of range"
    );
    let source = error.source().expect("source is the fault");
    assert_eq!(source.to_string(), "panic: code 512 out of range");

    let fault = error.into_fault().expect("work panicked");
    assert_same_fault(&fault, &Fault::new(PANIC_NAME, "code 512 out of range"));
}

#[test]
fn map_failed_leaves_faults_alone() {
    let error = capture_result(|| check(9))
        .expect_err("work failed")
        .map_failed(|rejected| io::Error::other(rejected.to_string()));
    assert_eq!(
        error.failure().map(|e| e.kind()),
        Some(io::ErrorKind::Other)
    );

    let error = capture_result(|| check(100))
        .expect_err("work panicked")
        .map_failed(|rejected| io::Error::other(rejected.to_string()));
    assert!(error.fault().is_some());
}

#[test]
fn from_fault() {
    let error: CaptureError<Rejected> = Fault::new("Custom", "converted").into();
    assert_eq!(error.fault().map(Fault::name), Some("Custom"));
}

#[test]
fn options_are_applied() {
    let options = CaptureOptions::new()
        .with_backtrace(faultcap::BacktraceCapture::Force);
    let error = options
        .capture_result(|| check(1000))
        .expect_err("work panicked");
    let fault = error.fault().expect("work panicked");
    assert!(fault.backtrace().is_some());
}
