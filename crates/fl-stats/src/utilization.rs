//! Post-run utilization summary.

use fl_core::{NodeId, Real};
use fl_graph::FlowGraph;
use serde::{Deserialize, Serialize};

/// Utilization of one node relative to the bottleneck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeUtilization {
    pub node: NodeId,
    pub adjusted_cycle_time_s: Real,
    /// Percentage in 0..=100; 0 for disconnected nodes.
    pub utilization_pct: u32,
    pub connected: bool,
    pub bottleneck: bool,
}

/// Snapshot produced when a simulation run completes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub bottleneck: Option<NodeId>,
    pub bottleneck_adjusted_cycle_time_s: Real,
    /// One entry per node, in node array order.
    pub nodes: Vec<NodeUtilization>,
}

impl RunSummary {
    pub fn utilization(&self, node: &NodeId) -> Option<u32> {
        self.nodes
            .iter()
            .find(|n| &n.node == node)
            .map(|n| n.utilization_pct)
    }

    pub fn get(&self, node: &NodeId) -> Option<&NodeUtilization> {
        self.nodes.iter().find(|n| &n.node == node)
    }
}

/// Derive per-node utilization from adjusted cycle times.
///
/// The bottleneck is the connected node with the largest adjusted cycle time,
/// first in node array order on ties. Everything else is expressed as a
/// rounded percentage of it, so a node tied with the bottleneck also reports
/// 100%; only `bottleneck` tells them apart.
pub fn summarize(graph: &FlowGraph) -> RunSummary {
    let mut bottleneck: Option<&NodeId> = None;
    let mut max_adjusted: Real = 0.0;
    for node in graph.connected_nodes() {
        let adjusted = node.adjusted_cycle_time();
        if adjusted > max_adjusted {
            max_adjusted = adjusted;
            bottleneck = Some(&node.id);
        }
    }

    let nodes = graph
        .nodes()
        .iter()
        .map(|node| {
            let connected = graph.is_connected(&node.id);
            let adjusted = node.adjusted_cycle_time();
            let utilization_pct = if connected && max_adjusted > 0.0 {
                ((adjusted / max_adjusted) * 100.0).round().min(100.0) as u32
            } else {
                0
            };
            NodeUtilization {
                node: node.id.clone(),
                adjusted_cycle_time_s: adjusted,
                utilization_pct,
                connected,
                bottleneck: bottleneck == Some(&node.id),
            }
        })
        .collect();

    RunSummary {
        bottleneck: bottleneck.cloned(),
        bottleneck_adjusted_cycle_time_s: max_adjusted,
        nodes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fl_graph::{EdgeSpec, NodeSpec, build};

    #[test]
    fn utilization_is_relative_to_bottleneck() {
        let nodes = vec![
            NodeSpec::new("a", "A", 20.0),
            NodeSpec::new("b", "B", 80.0).with_capacity(2),
            NodeSpec::new("c", "C", 30.0),
        ];
        let edges = vec![EdgeSpec::new("e1", "a", "b"), EdgeSpec::new("e2", "b", "c")];
        let summary = summarize(&build(&nodes, &edges).unwrap());

        assert_eq!(summary.bottleneck, Some("b".into()));
        assert_eq!(summary.bottleneck_adjusted_cycle_time_s, 40.0);
        assert_eq!(summary.utilization(&"a".into()), Some(50));
        assert_eq!(summary.utilization(&"b".into()), Some(100));
        assert_eq!(summary.utilization(&"c".into()), Some(75));
    }

    #[test]
    fn disconnected_nodes_are_zero_and_never_bottleneck() {
        let nodes = vec![
            NodeSpec::new("a", "A", 10.0),
            NodeSpec::new("b", "B", 10.0),
            NodeSpec::new("big", "Idle giant", 500.0),
        ];
        let edges = vec![EdgeSpec::new("e1", "a", "b")];
        let summary = summarize(&build(&nodes, &edges).unwrap());

        assert_eq!(summary.bottleneck, Some("a".into()));
        let big = summary.get(&"big".into()).unwrap();
        assert_eq!(big.utilization_pct, 0);
        assert!(!big.connected);
        assert!(!big.bottleneck);
    }

    #[test]
    fn rounding_uses_nearest_percent() {
        let nodes = vec![NodeSpec::new("a", "A", 3.0), NodeSpec::new("b", "B", 1.0)];
        let edges = vec![EdgeSpec::new("e1", "a", "b")];
        let summary = summarize(&build(&nodes, &edges).unwrap());
        // 1/3 = 33.33..%
        assert_eq!(summary.utilization(&"b".into()), Some(33));
    }

    #[test]
    fn all_zero_cycle_times_have_no_bottleneck() {
        let nodes = vec![NodeSpec::new("a", "A", 0.0), NodeSpec::new("b", "B", 0.0)];
        let edges = vec![EdgeSpec::new("e1", "a", "b")];
        let summary = summarize(&build(&nodes, &edges).unwrap());

        assert_eq!(summary.bottleneck, None);
        assert!(summary.nodes.iter().all(|n| n.utilization_pct == 0));
    }
}
