//! Small shared building blocks for the `refstr` crates.
//!
//! - [`hash`]: hash containers with a fixed, deterministic hashing state.
//! - [`vec`]: small-vector containers used when building short node lists.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Modules

pub mod hash;
pub mod vec;
