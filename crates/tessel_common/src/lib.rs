//! Shared foundational types used across the tessel fabric canonicalizer.
//!
//! This crate provides grid coordinates and device extents, structural content
//! hashing, and the common internal-error result type.

#![warn(missing_docs)]

pub mod coord;
pub mod hash;
pub mod result;

pub use coord::{Coord, GridRange};
pub use hash::{ContentHash, ContentHasher};
pub use result::{InternalError, TesselResult};
