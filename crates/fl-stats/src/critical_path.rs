//! Longest-path analysis from every start node.
//!
//! Path length is the sum of adjusted cycle times along a path plus the
//! transit time of every edge taken. The node with the largest adjusted cycle
//! time seen during the walk is the bottleneck and sets the throughput.

use fl_core::{NodeId, Real, SECONDS_PER_HOUR};
use fl_graph::{FlowGraph, NodeSpec};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Static line statistics derived from topology and node parameters alone.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LiveStats {
    /// Longest accumulated path time over all start nodes (seconds)
    pub total_cycle_time_s: Real,
    /// Units per hour the bottleneck lets through
    pub estimated_throughput_per_hour: u64,
    pub bottleneck: Option<NodeId>,
    pub bottleneck_name: Option<String>,
    /// Adjusted cycle time of the bottleneck (seconds), 0 without one
    pub bottleneck_adjusted_cycle_time_s: Real,
}

impl LiveStats {
    /// True when no path was analyzed.
    pub fn is_empty(&self) -> bool {
        self.bottleneck.is_none() && self.total_cycle_time_s == 0.0
    }
}

/// Running bottleneck candidate. The first node to reach a new maximum keeps
/// it; later equal values do not displace it.
#[derive(Default)]
struct BottleneckTracker<'g> {
    best: Option<&'g NodeSpec>,
    max_adjusted: Real,
}

impl<'g> BottleneckTracker<'g> {
    fn observe(&mut self, node: &'g NodeSpec, adjusted: Real) {
        if adjusted > self.max_adjusted {
            self.max_adjusted = adjusted;
            self.best = Some(node);
        }
    }
}

/// Compute live stats for a classified graph.
///
/// Pure: repeated calls on the same graph return identical results.
pub fn analyze(graph: &FlowGraph) -> LiveStats {
    if graph.is_empty() {
        return LiveStats::default();
    }

    let mut tracker = BottleneckTracker::default();
    let mut total: Real = 0.0;

    for start in graph.start_nodes() {
        let mut path = Vec::new();
        let longest = path_time(graph, start, 0.0, &mut path, &mut tracker);
        total = total.max(longest);
    }

    let bottleneck_adjusted = tracker.max_adjusted;
    let throughput = if bottleneck_adjusted > 0.0 {
        (SECONDS_PER_HOUR / bottleneck_adjusted).floor() as u64
    } else {
        0
    };

    debug!(
        total_cycle_time_s = total,
        throughput_per_hour = throughput,
        bottleneck = ?tracker.best.map(|n| n.id.as_str()),
        "live stats"
    );

    LiveStats {
        total_cycle_time_s: total,
        estimated_throughput_per_hour: throughput,
        bottleneck: tracker.best.map(|n| n.id.clone()),
        bottleneck_name: tracker.best.map(|n| n.display_name().to_owned()),
        bottleneck_adjusted_cycle_time_s: bottleneck_adjusted,
    }
}

/// Longest path time reachable from `node_id`.
///
/// `path` holds the nodes on the current branch only. Revisiting one of them
/// is a true cycle and stops the branch; diamonds are explored in full.
fn path_time<'g>(
    graph: &'g FlowGraph,
    node_id: &'g NodeId,
    accumulated: Real,
    path: &mut Vec<&'g NodeId>,
    tracker: &mut BottleneckTracker<'g>,
) -> Real {
    if path.contains(&node_id) {
        return accumulated;
    }
    let Some(node) = graph.node(node_id) else {
        return accumulated;
    };

    let adjusted = node.adjusted_cycle_time();
    tracker.observe(node, adjusted);
    let new_accumulated = accumulated + adjusted;

    let outgoing = graph.outgoing(node_id);
    if outgoing.is_empty() {
        return new_accumulated;
    }

    path.push(node_id);
    let mut longest = new_accumulated;
    for transit in outgoing {
        let branch = path_time(
            graph,
            &transit.target,
            new_accumulated + transit.transit_time_s,
            path,
            tracker,
        );
        longest = longest.max(branch);
    }
    path.pop();

    longest
}
