// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/// Configuration for a capture boundary.
///
/// The free functions [`capture`](crate::capture),
/// [`try_capture`](crate::try_capture) and
/// [`capture_result`](crate::capture_result) use the default options. Build a
/// `CaptureOptions` to change how panics are reported and whether a backtrace
/// is recorded:
///
/// ```
/// use faultcap::{BacktraceCapture, CaptureOptions, Report};
///
/// let options = CaptureOptions::new()
///     .with_report(Report::Silent)
///     .with_backtrace(BacktraceCapture::Force);
///
/// let fault = options.capture(|| panic!("boom")).unwrap();
/// assert!(fault.backtrace().is_some());
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CaptureOptions {
    report: Report,
    backtrace: BacktraceCapture,
}

impl CaptureOptions {
    /// Creates the default options: [`Report::Forward`] and
    /// [`BacktraceCapture::Disabled`].
    #[inline]
    pub const fn new() -> Self {
        Self { report: Report::Forward, backtrace: BacktraceCapture::Disabled }
    }

    /// Sets the reporting policy.
    #[inline]
    pub const fn with_report(mut self, report: Report) -> Self {
        self.report = report;
        self
    }

    /// Sets the backtrace policy.
    #[inline]
    pub const fn with_backtrace(mut self, backtrace: BacktraceCapture) -> Self {
        self.backtrace = backtrace;
        self
    }

    /// Returns the reporting policy.
    #[inline]
    pub const fn report(&self) -> Report {
        self.report
    }

    /// Returns the backtrace policy.
    #[inline]
    pub const fn backtrace(&self) -> BacktraceCapture {
        self.backtrace
    }
}

/// Whether panics raised inside a boundary are also passed on to the panic
/// hook that was installed before this crate's.
///
/// With the standard hook, forwarding means the familiar `thread '...'
/// panicked at ...` message is printed to stderr.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Report {
    /// The previous panic hook runs, exactly as it would without the
    /// boundary.
    #[default]
    Forward,

    /// The previous panic hook does not run for any panic raised on the
    /// calling thread while the work runs.
    ///
    /// The hook runs before unwinding starts, so it can't tell whether a panic
    /// will reach the boundary. This also silences panics that the work
    /// catches and handles itself.
    Silent,
}

/// Whether a backtrace is recorded when a panic is captured.
///
/// The backtrace is taken inside the panic hook, before unwinding, so it shows
/// the frames that led to the panic.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum BacktraceCapture {
    /// No backtrace is recorded.
    #[default]
    Disabled,

    /// Record a backtrace if `RUST_BACKTRACE` or `RUST_LIB_BACKTRACE` ask for
    /// one, as [`Backtrace::capture`](std::backtrace::Backtrace::capture)
    /// does.
    Env,

    /// Always record a backtrace.
    Force,
}
