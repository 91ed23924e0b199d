#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// image blurring module.
pub mod blur;

/// module containing parallization utilities.
pub mod parallel;
