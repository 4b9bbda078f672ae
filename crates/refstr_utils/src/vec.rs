//! Re-exports [`fastvec`]'s containers.
//!
//! Paths are usually a handful of nodes long, so they are assembled on the
//! stack and only moved to the heap once complete.

pub use fastvec::{FastVec, fast_vec};
