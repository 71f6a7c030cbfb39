//! Stable indexing of nodes by declaration order.
//!
//! The node array order handed over by the editing surface is significant:
//! start nodes, cycle entries and bottleneck tie-breaks all follow it.

use std::collections::HashMap;

use fl_core::NodeId;

use crate::error::{GraphError, GraphResult};
use crate::graph::NodeSpec;

/// Mapping from node id to its declaration position.
#[derive(Debug, Clone, Default)]
pub struct NodeIndex {
    positions: HashMap<NodeId, usize>,
}

impl NodeIndex {
    /// Build an index from the node array. Later duplicates keep the first position.
    pub fn from_nodes(nodes: &[NodeSpec]) -> Self {
        let mut positions = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            positions.entry(node.id.clone()).or_insert(i);
        }
        Self { positions }
    }

    /// Get the declaration position of a node.
    pub fn position(&self, id: &NodeId) -> GraphResult<usize> {
        self.positions
            .get(id)
            .copied()
            .ok_or_else(|| GraphError::IdNotFound {
                what: "NodeId",
                id: id.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_follow_declaration_order() {
        let nodes = vec![
            NodeSpec::new("b", "B", 1.0),
            NodeSpec::new("a", "A", 1.0),
        ];
        let index = NodeIndex::from_nodes(&nodes);
        assert_eq!(index.position(&"b".into()).unwrap(), 0);
        assert_eq!(index.position(&"a".into()).unwrap(), 1);
        assert!(index.position(&"zz".into()).is_err());
    }
}
