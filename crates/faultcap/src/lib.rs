// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Run a closure and get any panic it raises back as a value.
//!
//! # Motivation
//!
//! A panic is a control-flow signal: once raised, it unwinds the stack until
//! something catches it or the thread dies. Sometimes the code that runs a
//! piece of work only wants to *know* that the work failed, so it can log the
//! failure, turn it into an error, or carry on with the next item.
//!
//! [`std::panic::catch_unwind`] does the catching, but hands back an opaque
//! `Box<dyn Any + Send>` and needs the closure to be [`UnwindSafe`]. Where the
//! panic started is only known to the panic hook. This crate wraps it into a
//! capture boundary that returns a [`Fault`]: a plain value with a name, a
//! reason, structured user info and the location the panic started at.
//!
//! ```
//! use faultcap::capture;
//!
//! // Normal completion produces no fault.
//! assert!(capture(|| {}).is_none());
//!
//! // A panic is converted into a fault.
//! let fault = capture(|| panic!("disk on fire")).expect("work panicked");
//! assert_eq!(fault.reason(), "disk on fire");
//! assert!(fault.is_panic());
//! ```
//!
//! Side effects performed by the work before it panics stay visible:
//!
//! ```
//! let mut processed = 0;
//! let fault = faultcap::capture(|| {
//!     processed += 3;
//!     panic!("stopped after three");
//! });
//! assert_eq!(processed, 3);
//! assert!(fault.is_some());
//! ```
//!
//! # Raising structured faults
//!
//! [`Fault::raise`] panics with the fault itself as payload. Capturing it gives
//! back an equal value, user info included:
//!
//! ```
//! use faultcap::{Fault, capture};
//!
//! let raised = Fault::new("QuotaExceeded", "too many writes")
//!     .with_user_info("limit", "100");
//! let captured = capture(|| raised.clone_detached().raise()).unwrap();
//!
//! assert_eq!(captured, raised);
//! assert_eq!(captured.user_info().get("limit").map(String::as_str), Some("100"));
//! ```
//!
//! # Values and errors
//!
//! [`try_capture`] returns the work's value, and [`capture_result`] flattens a
//! fallible unit of work and its faults into one `Result`:
//!
//! ```
//! use faultcap::{capture_result, errors::CaptureError, try_capture};
//!
//! assert_eq!(try_capture(|| 6 * 7).unwrap(), 42);
//!
//! let result: Result<u8, _> = capture_result(|| "300".parse::<u8>());
//! assert!(matches!(result, Err(CaptureError::Failed(_))));
//! ```
//!
//! # Threads
//!
//! Only panics raised on the calling thread, inside the work, are captured.
//! Panics on threads the work spawns follow their normal path; use
//! [`Fault::from_payload`] to translate the payload returned by
//! [`JoinHandle::join`](std::thread::JoinHandle::join).
//!
//! # Optional features
//!
//! - `serde`: `Serialize` and `Deserialize` for [`Fault`] and
//!   [`FaultLocation`]. The original panic payload is not serialized.
//! - `proptest`: a proptest `Arbitrary` impl for [`Fault`].
//!
//! [`UnwindSafe`]: std::panic::UnwindSafe

#![cfg_attr(doc_cfg, feature(doc_cfg))]
#![warn(missing_docs)]

mod capture;
pub mod errors;
mod fault;
mod hook;
mod options;
#[cfg(feature = "proptest")]
mod proptest_impls;
#[cfg(feature = "serde")]
mod serde_impls;
mod support;

pub use capture::{capture, capture_result, try_capture};
pub use fault::{Fault, FaultLocation, FaultReport, PANIC_NAME};
pub use options::{BacktraceCapture, CaptureOptions, Report};
