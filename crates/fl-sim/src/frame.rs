//! Per-frame annotations handed to the presentation layer.
//!
//! Annotations are rebuilt from scratch every frame; nothing here is
//! accumulated across frames.

use std::collections::HashMap;

use fl_core::{EdgeId, NodeId, Real};
use fl_graph::FlowGraph;
use fl_stats::RunSummary;
use serde::Serialize;

use crate::token::{Token, TokenState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeAnnotation {
    pub node: NodeId,
    pub active: bool,
    pub progress: Option<Real>,
    /// Set on the final frame of a run only.
    pub utilization: Option<u32>,
    pub bottleneck: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeAnnotation {
    pub edge: EdgeId,
    pub transit_in_progress: bool,
    pub transit_progress: Option<Real>,
}

/// Where a processing unit currently is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitPosition {
    pub node: NodeId,
    pub progress: Real,
}

/// Full annotated node/edge set for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameUpdate {
    pub frame: u64,
    /// One entry per node, in node array order.
    pub nodes: Vec<NodeAnnotation>,
    /// One entry per edge, in edge array order.
    pub edges: Vec<EdgeAnnotation>,
    /// Every processing unit, in token order.
    pub positions: Vec<UnitPosition>,
    pub active_tokens: usize,
}

impl FrameUpdate {
    pub fn node(&self, id: &NodeId) -> Option<&NodeAnnotation> {
        self.nodes.iter().find(|n| &n.node == id)
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&EdgeAnnotation> {
        self.edges.iter().find(|e| &e.edge == id)
    }

    pub fn active_nodes(&self) -> impl Iterator<Item = &NodeId> + '_ {
        self.nodes.iter().filter(|n| n.active).map(|n| &n.node)
    }
}

/// Node and edge activity collected while advancing tokens.
///
/// When several tokens touch the same node or edge, the first one wins.
#[derive(Debug, Default)]
pub(crate) struct FrameMarks {
    nodes: HashMap<NodeId, Real>,
    edges: HashMap<EdgeId, Real>,
}

impl FrameMarks {
    pub(crate) fn from_tokens(tokens: &[Token]) -> Self {
        let mut marks = Self::default();
        for token in tokens {
            marks.mark_token(token);
        }
        marks
    }

    pub(crate) fn mark_node(&mut self, node: &NodeId, progress: Real) {
        self.nodes.entry(node.clone()).or_insert(progress);
    }

    pub(crate) fn mark_edge(&mut self, edge: &EdgeId, progress: Real) {
        self.edges.entry(edge.clone()).or_insert(progress);
    }

    pub(crate) fn mark_token(&mut self, token: &Token) {
        match &token.state {
            TokenState::Processing { node, progress } => self.mark_node(node, *progress),
            TokenState::InTransit { edge, progress, .. } => self.mark_edge(edge, *progress),
        }
    }
}

pub(crate) fn annotate(
    graph: &FlowGraph,
    frame: u64,
    marks: &FrameMarks,
    tokens: &[Token],
) -> FrameUpdate {
    let nodes = graph
        .nodes()
        .iter()
        .map(|n| {
            let progress = marks.nodes.get(&n.id).copied();
            NodeAnnotation {
                node: n.id.clone(),
                active: progress.is_some(),
                progress,
                utilization: None,
                bottleneck: false,
            }
        })
        .collect();

    let edges = graph
        .edges()
        .iter()
        .map(|e| {
            let progress = marks.edges.get(&e.id).copied();
            EdgeAnnotation {
                edge: e.id.clone(),
                transit_in_progress: progress.is_some(),
                transit_progress: progress,
            }
        })
        .collect();

    FrameUpdate {
        frame,
        nodes,
        edges,
        positions: tokens.iter().filter_map(Token::position).collect(),
        active_tokens: tokens.len(),
    }
}

/// Every annotation reset.
pub(crate) fn cleared(graph: &FlowGraph, frame: u64) -> FrameUpdate {
    annotate(graph, frame, &FrameMarks::default(), &[])
}

/// Final frame of a run: nothing active, utilization and bottleneck set.
pub(crate) fn completed(graph: &FlowGraph, frame: u64, summary: &RunSummary) -> FrameUpdate {
    let mut update = cleared(graph, frame);
    for annotation in &mut update.nodes {
        if let Some(stats) = summary.get(&annotation.node) {
            annotation.utilization = Some(stats.utilization_pct);
            annotation.bottleneck = stats.bottleneck;
        }
    }
    update
}
