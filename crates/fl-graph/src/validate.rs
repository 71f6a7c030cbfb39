//! Graph validation logic.

use std::collections::HashSet;

use fl_core::ensure_finite;

use crate::error::{GraphError, GraphResult};
use crate::graph::{EdgeSpec, NodeSpec};

/// Validate node and edge specs: ids are unique, edges reference known
/// nodes, and every duration and capacity is usable.
pub(crate) fn validate_specs(nodes: &[NodeSpec], edges: &[EdgeSpec]) -> GraphResult<()> {
    let mut node_ids = HashSet::with_capacity(nodes.len());
    for node in nodes {
        if !node_ids.insert(&node.id) {
            return Err(GraphError::DuplicateNode {
                node: node.id.clone(),
            });
        }

        let value = node.cycle_time_s;
        if ensure_finite(value, "cycle time").is_err() || value < 0.0 {
            return Err(GraphError::InvalidCycleTime {
                node: node.id.clone(),
                value,
            });
        }

        if node.max_capacity == 0 {
            return Err(GraphError::InvalidCapacity {
                node: node.id.clone(),
            });
        }
    }

    let mut edge_ids = HashSet::with_capacity(edges.len());
    for edge in edges {
        if !edge_ids.insert(&edge.id) {
            return Err(GraphError::DuplicateEdge {
                edge: edge.id.clone(),
            });
        }

        // Check that both endpoints reference a declared node
        for endpoint in [&edge.source, &edge.target] {
            if !node_ids.contains(endpoint) {
                return Err(GraphError::UnknownNodeRef {
                    edge: edge.id.clone(),
                    node: endpoint.clone(),
                });
            }
        }

        let value = edge.transit_time_s;
        if ensure_finite(value, "transit time").is_err() || value < 0.0 {
            return Err(GraphError::InvalidTransitTime {
                edge: edge.id.clone(),
                value,
            });
        }
    }

    Ok(())
}
