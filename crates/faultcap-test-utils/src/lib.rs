pub mod fault_props;
#[cfg(feature = "serde")]
pub mod serde_utils;
pub mod test_work;
pub mod unwind;
