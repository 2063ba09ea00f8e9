// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::fault::Fault;
use proptest::{
    arbitrary::{any, Arbitrary},
    collection::btree_map,
    strategy::{BoxedStrategy, Strategy},
};

/// Generates faults with a short identifier-like name, an arbitrary reason
/// and up to four user info entries. Diagnostics are left empty.
#[cfg_attr(doc_cfg, doc(cfg(feature = "proptest")))]
impl Arbitrary for Fault {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        (
            "[A-Z][A-Za-z0-9]{0,15}",
            any::<String>(),
            btree_map("[a-z_]{1,8}", any::<String>(), 0..4),
        )
            .prop_map(|(name, reason, user_info)| {
                let mut fault = Fault::new(name, reason);
                fault.user_info = user_info;
                fault
            })
            .boxed()
    }
}
