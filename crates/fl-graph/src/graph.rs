//! Core graph data structures.

use std::collections::{HashMap, HashSet};

use fl_core::{EdgeId, NodeId, Real, adjusted_cycle_time};
use serde::{Deserialize, Serialize};

use crate::indexing::NodeIndex;

fn default_capacity() -> u32 {
    1
}

/// A piece of equipment on the factory floor.
///
/// Owned by the editing surface; the engine only ever reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub id: NodeId,
    #[serde(default)]
    pub name: String,
    /// Processing time for one unit, in seconds.
    #[serde(alias = "cycleTime")]
    pub cycle_time_s: Real,
    /// Number of units the node can work on concurrently.
    #[serde(default = "default_capacity", alias = "maxCapacity")]
    pub max_capacity: u32,
}

impl NodeSpec {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>, cycle_time_s: Real) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cycle_time_s,
            max_capacity: 1,
        }
    }

    pub fn with_capacity(mut self, max_capacity: u32) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    /// Cycle time divided by capacity.
    pub fn adjusted_cycle_time(&self) -> Real {
        adjusted_cycle_time(self.cycle_time_s, self.max_capacity)
    }

    /// Name for human-facing messages, falling back to the id.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.id.as_str()
        } else {
            &self.name
        }
    }
}

/// A transit link between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSpec {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    /// Time for a unit to travel the link, in seconds.
    #[serde(default, alias = "transitTime")]
    pub transit_time_s: Real,
}

impl EdgeSpec {
    pub fn new(id: impl Into<EdgeId>, source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            transit_time_s: 0.0,
        }
    }

    pub fn with_transit_time(mut self, transit_time_s: Real) -> Self {
        self.transit_time_s = transit_time_s;
        self
    }
}

/// One outgoing hop in the adjacency map.
#[derive(Debug, Clone, PartialEq)]
pub struct Transit {
    pub edge: EdgeId,
    pub target: NodeId,
    pub transit_time_s: Real,
}

/// Source node -> outgoing transits, in edge declaration order.
///
/// The order is the fan-out order of the simulator.
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    outgoing: HashMap<NodeId, Vec<Transit>>,
}

impl Adjacency {
    pub fn from_edges(edges: &[EdgeSpec]) -> Self {
        let mut outgoing: HashMap<NodeId, Vec<Transit>> = HashMap::new();
        for edge in edges {
            outgoing.entry(edge.source.clone()).or_default().push(Transit {
                edge: edge.id.clone(),
                target: edge.target.clone(),
                transit_time_s: edge.transit_time_s,
            });
        }
        Self { outgoing }
    }

    /// Outgoing transits of a node (empty for sinks and unknown ids).
    pub fn outgoing(&self, node: &NodeId) -> &[Transit] {
        self.outgoing.get(node).map_or(&[], Vec::as_slice)
    }

    pub fn has_outgoing(&self, node: &NodeId) -> bool {
        !self.outgoing(node).is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Warning,
    Error,
}

/// Topology findings produced while classifying a graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// No node lacks an incoming edge; `entry` was picked as a synthetic start.
    CyclicFlow { entry: NodeId },
    /// Neither a clean start nor a cycle entry exists.
    NoStartingPoint,
    /// Nodes unreachable from every start node. They are ignored by analytics.
    Disconnected { nodes: Vec<NodeId> },
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::NoStartingPoint => Severity::Error,
            Diagnostic::CyclicFlow { .. } | Diagnostic::Disconnected { .. } => Severity::Warning,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::CyclicFlow { entry } => write!(
                f,
                "Cyclic flow detected: no node without inputs, starting from {}",
                entry
            ),
            Diagnostic::NoStartingPoint => {
                write!(f, "No starting point: connect at least two nodes with an edge")
            }
            Diagnostic::Disconnected { nodes } => {
                let names: Vec<&str> = nodes.iter().map(NodeId::as_str).collect();
                write!(
                    f,
                    "{} disconnected node(s) ignored: {}",
                    nodes.len(),
                    names.join(", ")
                )
            }
        }
    }
}

/// The graph: a validated, immutable node/edge snapshot with its classification.
///
/// The graph stores:
/// - Nodes and edges in declaration order.
/// - Ordered adjacency from each source.
/// - Start nodes, the reachable ("connected") set and topology diagnostics.
#[derive(Debug, Clone, Default)]
pub struct FlowGraph {
    pub(crate) nodes: Vec<NodeSpec>,
    pub(crate) edges: Vec<EdgeSpec>,
    pub(crate) index: NodeIndex,
    pub(crate) adjacency: Adjacency,
    pub(crate) start_nodes: Vec<NodeId>,
    pub(crate) connected: HashSet<NodeId>,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl FlowGraph {
    /// Return all nodes.
    pub fn nodes(&self) -> &[NodeSpec] {
        &self.nodes
    }

    /// Return all edges.
    pub fn edges(&self) -> &[EdgeSpec] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a node by ID.
    pub fn node(&self, id: &NodeId) -> Option<&NodeSpec> {
        let position = self.index.position(id).ok()?;
        self.nodes.get(position)
    }

    /// Get an edge by ID.
    pub fn edge(&self, id: &EdgeId) -> Option<&EdgeSpec> {
        self.edges.iter().find(|e| &e.id == id)
    }

    pub fn outgoing(&self, id: &NodeId) -> &[Transit] {
        self.adjacency.outgoing(id)
    }

    /// Start nodes in node array order (or the single cycle-entry fallback).
    pub fn start_nodes(&self) -> &[NodeId] {
        &self.start_nodes
    }

    pub fn is_connected(&self, id: &NodeId) -> bool {
        self.connected.contains(id)
    }

    pub fn connected_count(&self) -> usize {
        self.connected.len()
    }

    /// Connected nodes in node array order.
    pub fn connected_nodes(&self) -> impl Iterator<Item = &NodeSpec> + '_ {
        self.nodes.iter().filter(|n| self.connected.contains(&n.id))
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// The synthetic start chosen for a fully cyclic graph, if any.
    pub fn cyclic_entry(&self) -> Option<&NodeId> {
        self.diagnostics.iter().find_map(|d| match d {
            Diagnostic::CyclicFlow { entry } => Some(entry),
            _ => None,
        })
    }
}
