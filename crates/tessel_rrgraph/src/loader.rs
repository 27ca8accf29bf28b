//! JSON loading of routing-resource graphs.
//!
//! The on-disk form is the serde representation of [`RrGraph`]: the fabric
//! extents, the segment, switch, and cost-index tables, and the node table with
//! each node's drivers. Lookup indices are rebuilt after validation.

use crate::error::GraphError;
use crate::graph::RrGraph;
use std::path::Path;

/// Loads and validates a JSON routing-resource graph from `path`.
pub fn load_graph(path: &Path) -> Result<RrGraph, GraphError> {
    let content = std::fs::read_to_string(path)?;
    from_json_str(&content)
}

/// Parses and validates a JSON routing-resource graph from a string.
pub fn from_json_str(content: &str) -> Result<RrGraph, GraphError> {
    let mut graph: RrGraph =
        serde_json::from_str(content).map_err(|e| GraphError::Parse(e.to_string()))?;
    validate(&graph)?;
    graph.rebuild_indices();
    Ok(graph)
}

/// Checks that node IDs are positional, every span lies inside the fabric and
/// its I/O ring, and every driver reference resolves.
fn validate(graph: &RrGraph) -> Result<(), GraphError> {
    let num_nodes = graph.nodes.len();
    let num_switches = graph.switches.len();
    for (position, node) in graph.nodes.iter().enumerate() {
        if node.id.index() != position {
            return Err(GraphError::NodeIdMismatch {
                position,
                id: node.id.as_raw(),
            });
        }
        if node.xlow > node.xhigh || node.ylow > node.yhigh {
            return Err(GraphError::InvertedSpan {
                node: node.id.as_raw(),
                xlow: node.xlow,
                ylow: node.ylow,
                xhigh: node.xhigh,
                yhigh: node.yhigh,
            });
        }
        if node.xhigh > graph.nx + 1 || node.yhigh > graph.ny + 1 {
            return Err(GraphError::NodeOutOfGrid {
                node: node.id.as_raw(),
                xlow: node.xlow,
                ylow: node.ylow,
                xhigh: node.xhigh,
                yhigh: node.yhigh,
                nx: graph.nx,
                ny: graph.ny,
            });
        }
        if node.node_type.is_pin() && node.side.is_none() {
            return Err(GraphError::MissingPinSide {
                node: node.id.as_raw(),
                node_type: node.node_type,
            });
        }
        for driver in &node.drivers {
            if driver.node.index() >= num_nodes {
                return Err(GraphError::DanglingDriver {
                    node: node.id.as_raw(),
                    driver: driver.node.as_raw(),
                });
            }
            if driver.switch.index() >= num_switches {
                return Err(GraphError::UnknownSwitch {
                    node: node.id.as_raw(),
                    switch: driver.switch.as_raw(),
                    num_switches,
                });
            }
        }
    }
    Ok(())
}
