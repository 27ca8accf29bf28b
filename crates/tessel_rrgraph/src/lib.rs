//! Read-only view of the routing-resource graph consumed by the canonicalizer.
//!
//! The graph is produced upstream (by the router's graph builder or loaded from
//! a JSON dump) and is never mutated by the canonicalization pass. It exposes
//! per-node type, direction, track index, cost index, pin side, and the list of
//! driving nodes with the switch used by each, plus lookups by
//! (type, coordinate, side).
//!
//! [`synth::UniformFabric`] generates regular fabrics for tests and demos.

#![warn(missing_docs)]

pub mod error;
pub mod graph;
pub mod ids;
pub mod loader;
pub mod synth;
pub mod types;

pub use error::GraphError;
pub use graph::{Driver, IndexedData, RrGraph, RrNode, Segment, Switch};
pub use ids::{RrNodeId, SegmentId, SwitchId};
pub use loader::{from_json_str, load_graph};
pub use types::{Direction, RrNodeType, Side};
