// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;

/// Debug stand-in for a panic payload that can't be printed.
pub(crate) struct OpaquePayload;

impl fmt::Debug for OpaquePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // No quotes, matching what the standard panic hook prints.
        f.write_str("Box<dyn Any>")
    }
}

/// Displays every line of a multi-line string indented by two spaces, each
/// followed by a newline.
pub(crate) struct Indented<'a>(pub(crate) &'a str);

impl fmt::Display for Indented<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.0.lines() {
            writeln!(f, "  {line}")?;
        }
        Ok(())
    }
}
