// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::{
    errors::CaptureError,
    fault::Fault,
    hook::{self, BoundaryGuard},
    options::{CaptureOptions, Report},
};
use std::{
    panic::{self, AssertUnwindSafe},
    thread,
};

/// Runs `work` and returns the fault it raised, if any.
///
/// `work` runs exactly once, on the calling thread, before `capture` returns.
/// If it completes normally the result is `None`. If it panics, unwinding
/// stops here and the panic is returned as a [`Fault`]. Either way, no panic
/// is in flight once `capture` returns.
///
/// `work` doesn't have to be [`UnwindSafe`](std::panic::UnwindSafe). Whatever
/// state it mutated before panicking stays mutated, exactly as it would be
/// without the capture.
///
/// Panics raised on other threads that `work` spawns are not captured. If the
/// program is built with `panic = "abort"`, there is nothing to capture and
/// the process aborts.
///
/// This uses the default [`CaptureOptions`]: panics are reported by the
/// previously installed panic hook as usual, and no backtrace is recorded.
///
/// # Examples
///
/// ```
/// use faultcap::capture;
///
/// assert!(capture(|| {}).is_none());
///
/// let fault = capture(|| {
///     let v: Vec<u32> = Vec::new();
///     let _value = v[3];
/// })
/// .unwrap();
/// assert!(fault.reason().starts_with("index out of bounds"));
/// ```
pub fn capture<F>(work: F) -> Option<Fault>
where
    F: FnOnce(),
{
    CaptureOptions::new().capture(work)
}

/// Runs `work` and returns its value, or the fault it raised.
///
/// This is [`capture`] for units of work that produce a value.
///
/// ```
/// use faultcap::try_capture;
///
/// assert_eq!(try_capture(|| "7".parse::<u32>().unwrap()), Ok(7));
///
/// let fault = try_capture(|| "x".parse::<u32>().unwrap()).unwrap_err();
/// assert!(fault.reason().contains("invalid digit"));
/// ```
pub fn try_capture<T, F>(work: F) -> Result<T, Fault>
where
    F: FnOnce() -> T,
{
    CaptureOptions::new().try_capture(work)
}

/// Runs fallible `work`, flattening the error it returns and the fault it
/// raises into a single `Result`.
///
/// ```
/// use faultcap::{capture_result, errors::CaptureError};
///
/// let ok: Result<u8, CaptureError<std::num::ParseIntError>> =
///     capture_result(|| "12".parse::<u8>());
/// assert_eq!(ok.unwrap(), 12);
///
/// let failed = capture_result(|| "-1".parse::<u8>()).unwrap_err();
/// assert!(failed.failure().is_some());
///
/// let faulted = capture_result(|| -> Result<u8, std::num::ParseIntError> {
///     panic!("parser exploded")
/// })
/// .unwrap_err();
/// assert_eq!(faulted.fault().map(|f| f.reason()), Some("parser exploded"));
/// ```
pub fn capture_result<T, E, F>(work: F) -> Result<T, CaptureError<E>>
where
    F: FnOnce() -> Result<T, E>,
{
    CaptureOptions::new().capture_result(work)
}

impl CaptureOptions {
    /// Runs `work` with these options and returns the fault it raised, if
    /// any.
    ///
    /// See [`capture`](crate::capture).
    pub fn capture<F>(&self, work: F) -> Option<Fault>
    where
        F: FnOnce(),
    {
        self.try_capture(work).err()
    }

    /// Runs `work` with these options and returns its value, or the fault it
    /// raised.
    ///
    /// See [`try_capture`](crate::try_capture).
    pub fn try_capture<T, F>(&self, work: F) -> Result<T, Fault>
    where
        F: FnOnce() -> T,
    {
        hook::ensure_installed();
        let boundary = BoundaryGuard::enter(*self);
        // The caller sees any state work left behind, which is what capture
        // promises, so unwind safety is not required of work.
        let result = panic::catch_unwind(AssertUnwindSafe(work));
        let record = boundary.take_record();
        drop(boundary);

        result.map_err(|payload| {
            let record = record.matching(&*payload);
            let fault = Fault::from_payload(payload)
                .with_diagnostics(record, current_thread_name());
            match fault.location() {
                Some(location) => {
                    log::debug!(
                        target: "faultcap",
                        "captured fault at {location}: {fault}"
                    );
                }
                None => {
                    log::debug!(target: "faultcap", "captured fault: {fault}");
                }
            }
            fault
        })
    }

    /// Runs fallible `work` with these options.
    ///
    /// See [`capture_result`](crate::capture_result).
    pub fn capture_result<T, E, F>(&self, work: F) -> Result<T, CaptureError<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        match self.try_capture(work) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(error)) => Err(CaptureError::Failed(error)),
            Err(fault) => Err(CaptureError::Fault(fault)),
        }
    }
}

/// Returns the name of the calling thread.
///
/// `thread::current` panics once the thread's local data has been destroyed,
/// as it is when a capture runs inside a thread-local destructor. No name is
/// recorded in that case.
fn current_thread_name() -> Option<String> {
    let _silent =
        BoundaryGuard::enter(CaptureOptions::new().with_report(Report::Silent));
    panic::catch_unwind(|| thread::current().name().map(str::to_owned))
        .ok()
        .flatten()
}
