// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use faultcap::Fault;

/// Assert that a captured fault is the expected one.
///
/// Checks the fields one by one first, so a failure names the field that
/// differs, then checks that equality holds in both directions.
pub fn assert_same_fault(actual: &Fault, expected: &Fault) {
    assert_eq!(actual.name(), expected.name(), "fault names match");
    assert_eq!(actual.reason(), expected.reason(), "fault reasons match");
    assert_eq!(
        actual.user_info(),
        expected.user_info(),
        "fault user info matches"
    );
    assert_eq!(actual, expected, "actual == expected");
    assert_eq!(expected, actual, "expected == actual");
}

/// Assert that two faults are different, in both directions.
pub fn assert_different_faults(a: &Fault, b: &Fault) {
    assert_eq!(a, a, "a == a");
    assert_eq!(b, b, "b == b");
    assert_ne!(a, b, "a != b");
    assert_ne!(b, a, "b != a");
}
