//! Incremental graph builder and topology classification.

use std::collections::HashSet;

use fl_core::{EdgeId, NodeId};
use tracing::{debug, warn};

use crate::error::GraphResult;
use crate::graph::{Adjacency, Diagnostic, EdgeSpec, FlowGraph, NodeSpec};
use crate::indexing::NodeIndex;
use crate::validate;

/// Builder for constructing a graph incrementally.
///
/// Use `add_node` and `add_edge` to build up the graph,
/// then call `build()` to validate and freeze it into an immutable `FlowGraph`.
#[derive(Debug, Default, Clone)]
pub struct GraphBuilder {
    nodes: Vec<NodeSpec>,
    edges: Vec<EdgeSpec>,
}

impl GraphBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing node and edge lists.
    pub fn from_parts(nodes: Vec<NodeSpec>, edges: Vec<EdgeSpec>) -> Self {
        Self { nodes, edges }
    }

    /// Add a node and return its ID.
    pub fn add_node(&mut self, node: NodeSpec) -> NodeId {
        let id = node.id.clone();
        self.nodes.push(node);
        id
    }

    /// Add an edge and return its ID.
    pub fn add_edge(&mut self, edge: EdgeSpec) -> EdgeId {
        let id = edge.id.clone();
        self.edges.push(edge);
        id
    }

    /// Rename a node (useful for post-construction adjustments).
    pub fn rename_node(&mut self, node_id: &NodeId, new_name: impl Into<String>) {
        if let Some(node) = self.nodes.iter_mut().find(|n| &n.id == node_id) {
            node.name = new_name.into();
        }
    }

    /// Build and validate the graph, returning an immutable `FlowGraph`.
    ///
    /// This performs validation, builds the ordered adjacency and classifies
    /// start, connected and disconnected nodes.
    pub fn build(self) -> GraphResult<FlowGraph> {
        validate::validate_specs(&self.nodes, &self.edges)?;
        Ok(classify(self.nodes, self.edges))
    }
}

/// Validate and classify a node list and an edge list.
pub fn build(nodes: &[NodeSpec], edges: &[EdgeSpec]) -> GraphResult<FlowGraph> {
    GraphBuilder::from_parts(nodes.to_vec(), edges.to_vec()).build()
}

fn classify(nodes: Vec<NodeSpec>, edges: Vec<EdgeSpec>) -> FlowGraph {
    let index = NodeIndex::from_nodes(&nodes);
    let adjacency = Adjacency::from_edges(&edges);

    let all_targets: HashSet<&NodeId> = edges.iter().map(|e| &e.target).collect();

    let mut start_nodes: Vec<NodeId> = nodes
        .iter()
        .filter(|n| !all_targets.contains(&n.id) && adjacency.has_outgoing(&n.id))
        .map(|n| n.id.clone())
        .collect();

    let mut diagnostics = Vec::new();

    if start_nodes.is_empty() && !nodes.is_empty() {
        // Every node with outputs is also fed by something: enter the cycle
        // at the first such node.
        let entry = nodes
            .iter()
            .find(|n| adjacency.has_outgoing(&n.id) && all_targets.contains(&n.id));
        match entry {
            Some(entry) => {
                warn!(entry = %entry.id, "cyclic flow, using synthetic start node");
                start_nodes.push(entry.id.clone());
                diagnostics.push(Diagnostic::CyclicFlow {
                    entry: entry.id.clone(),
                });
            }
            None => {
                warn!(nodes = nodes.len(), "no starting point in graph");
                diagnostics.push(Diagnostic::NoStartingPoint);
            }
        }
    }

    let connected = reachable_from(&adjacency, &start_nodes);

    if !start_nodes.is_empty() {
        let disconnected: Vec<NodeId> = nodes
            .iter()
            .filter(|n| !connected.contains(&n.id))
            .map(|n| n.id.clone())
            .collect();
        if !disconnected.is_empty() {
            warn!(count = disconnected.len(), "disconnected nodes ignored");
            diagnostics.push(Diagnostic::Disconnected {
                nodes: disconnected,
            });
        }
    }

    debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        starts = start_nodes.len(),
        connected = connected.len(),
        "classified flow graph"
    );

    FlowGraph {
        nodes,
        edges,
        index,
        adjacency,
        start_nodes,
        connected,
        diagnostics,
    }
}

/// Depth-first reachability walk from every start node.
///
/// A single visited set is shared across the walk, so cycles terminate.
fn reachable_from(adjacency: &Adjacency, starts: &[NodeId]) -> HashSet<NodeId> {
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut stack: Vec<&NodeId> = starts.iter().rev().collect();

    while let Some(node) = stack.pop() {
        if !visited.insert(node.clone()) {
            continue;
        }
        for transit in adjacency.outgoing(node).iter().rev() {
            if !visited.contains(&transit.target) {
                stack.push(&transit.target);
            }
        }
    }

    visited
}
