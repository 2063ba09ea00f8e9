// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The panic hook bridge.
//!
//! `catch_unwind` only sees the payload of a panic. The location and the
//! backtrace are available to the panic hook alone, and the hook is also what
//! prints the panic message. This module installs a hook (once per process)
//! that checks whether the panicking thread is inside a capture boundary. If
//! it is, the hook records diagnostics for the innermost boundary and lets the
//! boundary's [`Report`] policy decide whether the previous hook runs.
//! Otherwise the previous hook runs unchanged.

use crate::{
    fault::{Fault, FaultLocation},
    options::{BacktraceCapture, CaptureOptions, Report},
};
use std::{
    any::{Any, TypeId},
    backtrace::{Backtrace, BacktraceStatus},
    cell::RefCell,
    panic::{self, PanicHookInfo},
    sync::Once,
    thread,
};

static INSTALL: Once = Once::new();

thread_local! {
    static BOUNDARIES: RefCell<Vec<Boundary>> = const { RefCell::new(Vec::new()) };
}

struct Boundary {
    options: CaptureOptions,
    record: Option<PanicRecord>,
}

/// Diagnostics recorded by the hook for one panic.
#[derive(Debug, Default)]
pub(crate) struct PanicRecord {
    pub(crate) location: Option<FaultLocation>,
    pub(crate) backtrace: Option<String>,
    pub(crate) payload: Option<PayloadFingerprint>,
}

impl PanicRecord {
    /// Keeps the record only if it was made for the panic that carried
    /// `payload`.
    ///
    /// The last panic the hook saw is not necessarily the one that reached the
    /// boundary: the work may have caught a panic itself and then unwound
    /// with a different payload through `resume_unwind`, which skips the hook.
    /// The payload box is reallocated between the hook and `catch_unwind`, so
    /// this compares contents. A later panic with an identical message still
    /// matches.
    pub(crate) fn matching(self, payload: &(dyn Any + Send)) -> Self {
        let matches = self.payload.as_ref().is_some_and(|fingerprint| {
            *fingerprint == PayloadFingerprint::of(payload)
        });
        if matches { self } else { Self::default() }
    }
}

/// What identifies a panic payload across the hook and `catch_unwind`.
#[derive(Debug, PartialEq)]
pub(crate) enum PayloadFingerprint {
    Message(String),
    Fault { name: String, reason: String },
    Other(TypeId),
}

impl PayloadFingerprint {
    pub(crate) fn of(payload: &(dyn Any + Send)) -> Self {
        if let Some(fault) = payload.downcast_ref::<Fault>() {
            Self::Fault {
                name: fault.name().to_owned(),
                reason: fault.reason().to_owned(),
            }
        } else if let Some(message) = payload.downcast_ref::<String>() {
            Self::Message(message.clone())
        } else if let Some(message) = payload.downcast_ref::<&'static str>() {
            Self::Message((*message).to_owned())
        } else {
            Self::Other((*payload).type_id())
        }
    }
}

/// Installs the hook if it isn't installed yet.
pub(crate) fn ensure_installed() {
    // take_hook and set_hook panic on a panicking thread. Skipping the install
    // only costs diagnostics; a later boundary installs it.
    if thread::panicking() {
        return;
    }

    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| match record_panic(info) {
            Some(Report::Silent) => {}
            Some(Report::Forward) | None => previous(info),
        }));
        log::trace!(target: "faultcap", "installed capture panic hook");
    });
}

/// Records diagnostics into the innermost boundary of the current thread.
///
/// Returns the boundary's report policy, or `None` if the thread is not inside
/// a boundary.
fn record_panic(info: &PanicHookInfo<'_>) -> Option<Report> {
    BOUNDARIES
        .try_with(|boundaries| {
            let mut boundaries = boundaries.try_borrow_mut().ok()?;
            let boundary = boundaries.last_mut()?;
            let backtrace = match boundary.options.backtrace() {
                BacktraceCapture::Disabled => None,
                BacktraceCapture::Env => {
                    let backtrace = Backtrace::capture();
                    (backtrace.status() == BacktraceStatus::Captured)
                        .then(|| backtrace.to_string())
                }
                BacktraceCapture::Force => {
                    Some(Backtrace::force_capture().to_string())
                }
            };
            boundary.record = Some(PanicRecord {
                location: info.location().map(FaultLocation::from_std),
                backtrace,
                payload: Some(PayloadFingerprint::of(info.payload())),
            });
            Some(boundary.options.report())
        })
        .ok()
        .flatten()
}

/// An active capture boundary on the current thread.
///
/// Boundaries nest: each guard owns one slot of the thread-local stack and
/// pops it (and everything above it) when dropped.
pub(crate) struct BoundaryGuard {
    // Stack length after this boundary was pushed. Zero if the thread-local
    // was unavailable, in which case the guard does nothing.
    depth: usize,
}

impl BoundaryGuard {
    pub(crate) fn enter(options: CaptureOptions) -> Self {
        let depth = BOUNDARIES
            .try_with(|boundaries| {
                let mut boundaries = boundaries.borrow_mut();
                boundaries.push(Boundary { options, record: None });
                boundaries.len()
            })
            .unwrap_or(0);
        Self { depth }
    }

    /// Takes whatever the hook recorded for this boundary.
    pub(crate) fn take_record(&self) -> PanicRecord {
        if self.depth == 0 {
            return PanicRecord::default();
        }
        BOUNDARIES
            .try_with(|boundaries| {
                boundaries
                    .borrow_mut()
                    .get_mut(self.depth - 1)
                    .and_then(|boundary| boundary.record.take())
            })
            .ok()
            .flatten()
            .unwrap_or_default()
    }
}

impl Drop for BoundaryGuard {
    fn drop(&mut self) {
        if self.depth == 0 {
            return;
        }
        let _ = BOUNDARIES.try_with(|boundaries| {
            boundaries.borrow_mut().truncate(self.depth - 1);
        });
    }
}
