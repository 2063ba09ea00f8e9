// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use faultcap::{Fault, PANIC_NAME};
use proptest::collection::btree_map;
use std::{any::Any, collections::BTreeMap, panic::AssertUnwindSafe};
use test_strategy::Arbitrary;

pub const STATIC_REASON: &str = "static test panic";

/// The ways a unit of work can panic, one per payload kind.
#[derive(Clone, Debug, Arbitrary)]
pub enum PanicKind {
    /// `panic!` with a string literal, giving a `&'static str` payload.
    Static,
    /// `panic!` with format arguments, giving a `String` payload.
    Formatted(String),
    /// `Fault::raise`, giving a `Fault` payload.
    Raised {
        #[strategy("[A-Z][A-Za-z]{0,11}")]
        name: String,
        reason: String,
        #[strategy(btree_map("[a-z]{1,6}", "[ -~]{0,12}", 0..3))]
        user_info: BTreeMap<String, String>,
    },
    /// `panic_any` with a value that is neither a string nor a fault.
    Opaque(u32),
}

impl PanicKind {
    pub fn trigger(&self) -> ! {
        match self {
            Self::Static => panic!("static test panic"),
            Self::Formatted(message) => panic!("{message}"),
            Self::Raised { .. } => self.expected_fault().raise(),
            Self::Opaque(value) => std::panic::panic_any(*value),
        }
    }

    /// The fault a capture boundary should return for this panic.
    pub fn expected_fault(&self) -> Fault {
        match self {
            Self::Static => Fault::new(PANIC_NAME, STATIC_REASON),
            Self::Formatted(message) => Fault::new(PANIC_NAME, message.clone()),
            Self::Raised { name, reason, user_info } => user_info.iter().fold(
                Fault::new(name.clone(), reason.clone()),
                |fault, (key, value)| {
                    fault.with_user_info(key.clone(), value.clone())
                },
            ),
            Self::Opaque(_) => Fault::new(PANIC_NAME, "Box<dyn Any>"),
        }
    }
}

/// Runs `f` under plain `catch_unwind` and returns the raw payload if it
/// panicked.
pub fn catch_payload(f: impl FnOnce()) -> Option<Box<dyn Any + Send>> {
    std::panic::catch_unwind(AssertUnwindSafe(f)).err()
}
