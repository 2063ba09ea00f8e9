// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::fault::{Fault, FaultLocation, Origin};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

#[derive(Serialize)]
#[serde(rename = "Fault")]
struct FaultRef<'a> {
    name: &'a str,
    reason: &'a str,
    #[serde(skip_serializing_if = "is_empty")]
    user_info: &'a BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<&'a FaultLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thread: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    backtrace: Option<&'a str>,
}

fn is_empty(map: &&BTreeMap<String, String>) -> bool {
    map.is_empty()
}

#[derive(Deserialize)]
#[serde(rename = "Fault")]
struct FaultOwned {
    name: String,
    reason: String,
    #[serde(default)]
    user_info: BTreeMap<String, String>,
    #[serde(default)]
    location: Option<FaultLocation>,
    #[serde(default)]
    thread: Option<String>,
    #[serde(default)]
    backtrace: Option<String>,
}

/// A `Fault` serializes as a struct of its name, reason, user info and
/// diagnostics. Empty user info and absent diagnostics are omitted.
///
/// The original panic payload is not serialized.
#[cfg_attr(doc_cfg, doc(cfg(feature = "serde")))]
impl Serialize for Fault {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        FaultRef {
            name: &self.name,
            reason: &self.reason,
            user_info: &self.user_info,
            location: self.location.as_ref(),
            thread: self.thread.as_deref(),
            backtrace: self.backtrace.as_deref(),
        }
        .serialize(serializer)
    }
}

/// A deserialized `Fault` behaves like one built with [`Fault::new`]: if
/// resumed, it unwinds with itself as the payload.
#[cfg_attr(doc_cfg, doc(cfg(feature = "serde")))]
impl<'de> Deserialize<'de> for Fault {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let owned = FaultOwned::deserialize(deserializer)?;
        Ok(Fault {
            name: owned.name,
            reason: owned.reason,
            user_info: owned.user_info,
            location: owned.location,
            thread: owned.thread,
            backtrace: owned.backtrace,
            origin: Origin::Raised,
        })
    }
}
