//! Error types for this crate.

use crate::fault::Fault;
use core::fmt;

/// The error returned by [`capture_result`](crate::capture_result): either
/// the unit of work returned an error, or it raised a fault.
#[derive(Debug)]
pub enum CaptureError<E> {
    /// The unit of work panicked.
    Fault(Fault),

    /// The unit of work returned an error.
    Failed(E),
}

impl<E> CaptureError<E> {
    /// Returns the fault, if the unit of work panicked.
    #[inline]
    pub fn fault(&self) -> Option<&Fault> {
        match self {
            Self::Fault(fault) => Some(fault),
            Self::Failed(_) => None,
        }
    }

    /// Returns the error, if the unit of work returned one.
    #[inline]
    pub fn failure(&self) -> Option<&E> {
        match self {
            Self::Fault(_) => None,
            Self::Failed(error) => Some(error),
        }
    }

    /// Converts self into the fault, if the unit of work panicked.
    pub fn into_fault(self) -> Option<Fault> {
        match self {
            Self::Fault(fault) => Some(fault),
            Self::Failed(_) => None,
        }
    }

    /// Maps the error returned by the unit of work, leaving faults untouched.
    pub fn map_failed<E2, F>(self, f: F) -> CaptureError<E2>
    where
        F: FnOnce(E) -> E2,
    {
        match self {
            Self::Fault(fault) => CaptureError::Fault(fault),
            Self::Failed(error) => CaptureError::Failed(f(error)),
        }
    }
}

impl<E> From<Fault> for CaptureError<E> {
    fn from(fault: Fault) -> Self {
        Self::Fault(fault)
    }
}

impl<E: fmt::Display> fmt::Display for CaptureError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Fault(fault) => write!(f, "work raised a fault: {fault}"),
            Self::Failed(error) => write!(f, "work returned an error: {error}"),
        }
    }
}

impl<E> core::error::Error for CaptureError<E>
where
    E: core::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Fault(fault) => Some(fault),
            Self::Failed(error) => Some(error),
        }
    }
}
