// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::{
    hook::PanicRecord,
    support::fmt_utils::{Indented, OpaquePayload},
};
use std::{any::Any, collections::BTreeMap, fmt, mem, panic};

/// The name given to faults produced by plain panics (`panic!`, `unwrap`,
/// index out of bounds and so on).
pub const PANIC_NAME: &str = "panic";

// What the standard panic hook prints for payloads that aren't strings.
const OPAQUE_REASON: &str = "Box<dyn Any>";

/// A panic, captured and turned into a value.
///
/// A fault has a name, a reason and a map of user info, plus diagnostics
/// recorded when the panic was captured: the location it started at, the
/// name of the panicking thread and, if requested, a backtrace.
///
/// Faults compare equal if their name, reason and user info are equal. The
/// diagnostics are not part of the comparison.
///
/// # Payload translation
///
/// When a panic is captured, its payload is translated as follows:
///
/// * a `Fault` (raised with [`Fault::raise`]) is returned as-is;
/// * a `&'static str` or `String` message becomes a fault named
///   [`PANIC_NAME`] with the message as its reason;
/// * anything else becomes a fault named [`PANIC_NAME`] with the reason
///   `Box<dyn Any>`. The payload is kept and can be inspected with
///   [`payload_ref`](Self::payload_ref).
pub struct Fault {
    pub(crate) name: String,
    pub(crate) reason: String,
    pub(crate) user_info: BTreeMap<String, String>,
    pub(crate) location: Option<FaultLocation>,
    pub(crate) thread: Option<String>,
    pub(crate) backtrace: Option<String>,
    pub(crate) origin: Origin,
}

/// The kind of payload a fault was translated from. Determines what
/// [`Fault::resume`] unwinds with.
pub(crate) enum Origin {
    Raised,
    Message,
    Opaque(Box<dyn Any + Send>),
}

impl Fault {
    /// Creates a new fault with the given name and reason, and no user info.
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
            user_info: BTreeMap::new(),
            location: None,
            thread: None,
            backtrace: None,
            origin: Origin::Raised,
        }
    }

    /// Attaches a user info entry, replacing any previous value for `key`.
    pub fn with_user_info(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.user_info.insert(key.into(), value.into());
        self
    }

    /// Sets the location the fault is reported at.
    ///
    /// Captured faults get the panic location automatically; this is for
    /// faults built by hand.
    pub fn with_location(mut self, location: FaultLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Translates a panic payload into a fault.
    ///
    /// This applies the same rules as a capture boundary, and is useful for
    /// payloads obtained some other way, such as from
    /// [`JoinHandle::join`](std::thread::JoinHandle::join):
    ///
    /// ```
    /// use faultcap::Fault;
    ///
    /// let handle = std::thread::spawn(|| panic!("worker died"));
    /// let payload = handle.join().unwrap_err();
    /// let fault = Fault::from_payload(payload);
    /// assert_eq!(fault.reason(), "worker died");
    /// ```
    pub fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let payload = match payload.downcast::<Fault>() {
            Ok(fault) => return *fault,
            Err(payload) => payload,
        };
        let payload = match payload.downcast::<String>() {
            Ok(message) => return Self::message(*message),
            Err(payload) => payload,
        };
        match payload.downcast::<&'static str>() {
            Ok(message) => Self::message((*message).to_owned()),
            Err(payload) => Self {
                origin: Origin::Opaque(payload),
                ..Self::new(PANIC_NAME, OPAQUE_REASON)
            },
        }
    }

    fn message(reason: String) -> Self {
        Self { origin: Origin::Message, ..Self::new(PANIC_NAME, reason) }
    }

    /// Fills in the diagnostics that aren't set yet.
    pub(crate) fn with_diagnostics(
        mut self,
        record: PanicRecord,
        thread: Option<String>,
    ) -> Self {
        if self.location.is_none() {
            self.location = record.location;
        }
        if self.backtrace.is_none() {
            self.backtrace = record.backtrace;
        }
        if self.thread.is_none() {
            self.thread = thread;
        }
        self
    }

    /// Returns the name of the fault.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the reason for the fault.
    #[inline]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Returns the user info attached to the fault.
    #[inline]
    pub fn user_info(&self) -> &BTreeMap<String, String> {
        &self.user_info
    }

    /// Returns the location the panic started at, if known.
    #[inline]
    pub fn location(&self) -> Option<&FaultLocation> {
        self.location.as_ref()
    }

    /// Returns the name of the thread that panicked, if it had one.
    #[inline]
    pub fn thread_name(&self) -> Option<&str> {
        self.thread.as_deref()
    }

    /// Returns the backtrace recorded for the panic, if one was requested
    /// through [`BacktraceCapture`](crate::BacktraceCapture).
    #[inline]
    pub fn backtrace(&self) -> Option<&str> {
        self.backtrace.as_deref()
    }

    /// Returns true if this fault came from a plain panic rather than from
    /// [`Fault::raise`] with a custom name.
    #[inline]
    pub fn is_panic(&self) -> bool {
        self.name == PANIC_NAME
    }

    /// Returns the original payload if it was not a string or a fault, and is
    /// of type `T`.
    ///
    /// ```
    /// use faultcap::capture;
    ///
    /// let fault = capture(|| std::panic::panic_any(17_u32)).unwrap();
    /// assert_eq!(fault.reason(), "Box<dyn Any>");
    /// assert_eq!(fault.payload_ref::<u32>(), Some(&17));
    /// ```
    pub fn payload_ref<T: Any>(&self) -> Option<&T> {
        match &self.origin {
            Origin::Opaque(payload) => payload.downcast_ref(),
            Origin::Raised | Origin::Message => None,
        }
    }

    /// Returns a copy of this fault without the original payload.
    ///
    /// Faults aren't `Clone` since an opaque payload can't be cloned. The copy
    /// keeps every other field, and [`resume`](Self::resume)s with the copy
    /// itself as payload if the original payload was opaque.
    pub fn clone_detached(&self) -> Self {
        Self {
            name: self.name.clone(),
            reason: self.reason.clone(),
            user_info: self.user_info.clone(),
            location: self.location.clone(),
            thread: self.thread.clone(),
            backtrace: self.backtrace.clone(),
            origin: match self.origin {
                Origin::Message => Origin::Message,
                Origin::Raised | Origin::Opaque(_) => Origin::Raised,
            },
        }
    }

    /// Converts the fault into the payload [`resume`](Self::resume) unwinds
    /// with.
    ///
    /// That is the message `String` for plain panics with a message, the
    /// original payload for opaque panics, and the fault itself otherwise.
    pub fn into_payload(mut self) -> Box<dyn Any + Send> {
        match mem::replace(&mut self.origin, Origin::Raised) {
            Origin::Raised => Box::new(self),
            Origin::Message => Box::new(self.reason),
            Origin::Opaque(payload) => payload,
        }
    }

    /// Panics with this fault as the payload.
    ///
    /// The panic hook sees the caller of `raise` as the panic location. A
    /// capture boundary returns a fault equal to `self`.
    #[track_caller]
    pub fn raise(self) -> ! {
        panic::panic_any(self)
    }

    /// Continues unwinding with this fault's payload.
    ///
    /// This uses [`resume_unwind`](std::panic::resume_unwind), so the panic
    /// hook doesn't run a second time. Callers outside this crate catching the
    /// panic see the payload the fault was captured from; see
    /// [`into_payload`](Self::into_payload).
    pub fn resume(self) -> ! {
        panic::resume_unwind(self.into_payload())
    }

    /// Returns a multi-line [`Display`](fmt::Display) adapter listing every
    /// field of the fault.
    ///
    /// ```
    /// use faultcap::Fault;
    ///
    /// let fault = Fault::new("Timeout", "no reply").with_user_info("peer", "db-1");
    /// assert_eq!(
    ///     fault.report().to_string(),
    ///     "fault: Timeout\nreason: no reply\nuser info:\n  peer: db-1\n",
    /// );
    /// ```
    pub fn report(&self) -> FaultReport<'_> {
        FaultReport { fault: self }
    }
}

impl PartialEq for Fault {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.reason == other.reason
            && self.user_info == other.user_info
    }
}

impl Eq for Fault {}

impl fmt::Debug for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let payload = match self.origin {
            Origin::Opaque(_) => Some(OpaquePayload),
            Origin::Raised | Origin::Message => None,
        };
        f.debug_struct("Fault")
            .field("name", &self.name)
            .field("reason", &self.reason)
            .field("user_info", &self.user_info)
            .field("location", &self.location)
            .field("thread", &self.thread)
            .field("backtrace", &self.backtrace)
            .field("payload", &payload)
            .finish()
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.reason)
    }
}

impl core::error::Error for Fault {}

/// A multi-line rendering of a [`Fault`], returned by [`Fault::report`].
///
/// Lines for absent diagnostics and empty user info are left out.
pub struct FaultReport<'a> {
    fault: &'a Fault,
}

impl fmt::Display for FaultReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fault = self.fault;
        writeln!(f, "fault: {}", fault.name)?;
        writeln!(f, "reason: {}", fault.reason)?;
        if let Some(location) = &fault.location {
            writeln!(f, "location: {location}")?;
        }
        if let Some(thread) = &fault.thread {
            writeln!(f, "thread: {thread}")?;
        }
        if !fault.user_info.is_empty() {
            writeln!(f, "user info:")?;
            for (key, value) in &fault.user_info {
                writeln!(f, "  {key}: {value}")?;
            }
        }
        if let Some(backtrace) = &fault.backtrace {
            writeln!(f, "backtrace:")?;
            write!(f, "{}", Indented(backtrace))?;
        }
        Ok(())
    }
}

impl fmt::Debug for FaultReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// The source location a panic started at.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FaultLocation {
    file: String,
    line: u32,
    column: u32,
}

impl FaultLocation {
    /// Creates a new location.
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self { file: file.into(), line, column }
    }

    pub(crate) fn from_std(location: &panic::Location<'_>) -> Self {
        Self::new(location.file(), location.line(), location.column())
    }

    /// Returns the source file.
    #[inline]
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Returns the line number, starting at 1.
    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Returns the column number, starting at 1.
    #[inline]
    pub fn column(&self) -> u32 {
        self.column
    }
}

impl fmt::Display for FaultLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}
