//! Editable factory line with live stats and run control.

use std::sync::Arc;

use fl_core::{EdgeId, NodeId, Real};
use fl_graph::{Diagnostic, EdgeSpec, FlowGraph, NodeSpec, build};
use fl_sim::{SimObserver, SimOptions, Simulator, TickStatus};
use fl_stats::{LiveStats, analyze};
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::line_file::LineFile;

/// Owner of the node and edge lists.
///
/// Every edit is checked by rebuilding the graph; an edit that would produce
/// an invalid graph is rejected and leaves the session unchanged. Live stats
/// are recomputed after each accepted edit. A running simulation keeps the
/// graph it was started with.
#[derive(Debug)]
pub struct FactorySession {
    nodes: Vec<NodeSpec>,
    edges: Vec<EdgeSpec>,
    graph: Arc<FlowGraph>,
    stats: LiveStats,
    simulator: Simulator,
}

impl Default for FactorySession {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            graph: Arc::new(FlowGraph::default()),
            stats: LiveStats::default(),
            simulator: Simulator::default(),
        }
    }
}

impl FactorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_specs(nodes: Vec<NodeSpec>, edges: Vec<EdgeSpec>) -> AppResult<Self> {
        let mut session = Self::default();
        session.commit(nodes, edges)?;
        Ok(session)
    }

    pub fn from_line_file(line: &LineFile) -> AppResult<Self> {
        let mut session = Self::from_specs(line.nodes.clone(), line.edges.clone())?;
        session.set_options(line.simulation.clone())?;
        Ok(session)
    }

    pub fn nodes(&self) -> &[NodeSpec] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeSpec] {
        &self.edges
    }

    pub fn graph(&self) -> &Arc<FlowGraph> {
        &self.graph
    }

    pub fn live_stats(&self) -> &LiveStats {
        &self.stats
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.graph.diagnostics()
    }

    pub fn simulator(&self) -> &Simulator {
        &self.simulator
    }

    pub fn add_node(&mut self, node: NodeSpec) -> AppResult<()> {
        self.edit(|nodes, _| {
            nodes.push(node);
            Ok(())
        })
    }

    /// Remove a node together with every edge touching it.
    pub fn remove_node(&mut self, id: &NodeId) -> AppResult<NodeSpec> {
        let mut removed = None;
        self.edit(|nodes, edges| {
            let pos = find_node(nodes, id)?;
            removed = Some(nodes.remove(pos));
            edges.retain(|e| &e.source != id && &e.target != id);
            Ok(())
        })?;
        removed.ok_or_else(|| not_found("node", id))
    }

    pub fn add_edge(&mut self, edge: EdgeSpec) -> AppResult<()> {
        self.edit(|_, edges| {
            edges.push(edge);
            Ok(())
        })
    }

    pub fn remove_edge(&mut self, id: &EdgeId) -> AppResult<EdgeSpec> {
        let mut removed = None;
        self.edit(|_, edges| {
            let pos = find_edge(edges, id)?;
            removed = Some(edges.remove(pos));
            Ok(())
        })?;
        removed.ok_or_else(|| not_found("edge", id))
    }

    pub fn set_cycle_time(&mut self, id: &NodeId, cycle_time_s: Real) -> AppResult<()> {
        self.edit(|nodes, _| {
            let pos = find_node(nodes, id)?;
            nodes[pos].cycle_time_s = cycle_time_s;
            Ok(())
        })
    }

    pub fn set_max_capacity(&mut self, id: &NodeId, max_capacity: u32) -> AppResult<()> {
        self.edit(|nodes, _| {
            let pos = find_node(nodes, id)?;
            nodes[pos].max_capacity = max_capacity;
            Ok(())
        })
    }

    /// Update one edge's transit time in place.
    pub fn set_transit_time(&mut self, id: &EdgeId, transit_time_s: Real) -> AppResult<()> {
        self.edit(|_, edges| {
            let pos = find_edge(edges, id)?;
            edges[pos].transit_time_s = transit_time_s;
            Ok(())
        })
    }

    pub fn rename_node(&mut self, id: &NodeId, name: impl Into<String>) -> AppResult<()> {
        let name = name.into();
        self.edit(|nodes, _| {
            let pos = find_node(nodes, id)?;
            nodes[pos].name = name;
            Ok(())
        })
    }

    pub fn options(&self) -> &SimOptions {
        self.simulator.options()
    }

    pub fn set_options(&mut self, options: SimOptions) -> AppResult<()> {
        self.simulator.set_options(options)?;
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.simulator.is_running()
    }

    /// Start (or restart) a run on the current graph.
    pub fn start_simulation(&mut self, observer: &mut dyn SimObserver) -> AppResult<()> {
        self.simulator.start(Arc::clone(&self.graph), observer)?;
        Ok(())
    }

    pub fn tick(
        &mut self,
        timestamp_ms: Real,
        observer: &mut dyn SimObserver,
    ) -> AppResult<TickStatus> {
        Ok(self.simulator.tick(timestamp_ms, observer)?)
    }

    pub fn stop_simulation(&mut self, observer: &mut dyn SimObserver) {
        self.simulator.stop(observer);
    }

    fn edit<F>(&mut self, f: F) -> AppResult<()>
    where
        F: FnOnce(&mut Vec<NodeSpec>, &mut Vec<EdgeSpec>) -> AppResult<()>,
    {
        let mut nodes = self.nodes.clone();
        let mut edges = self.edges.clone();
        f(&mut nodes, &mut edges)?;
        self.commit(nodes, edges)
    }

    fn commit(&mut self, nodes: Vec<NodeSpec>, edges: Vec<EdgeSpec>) -> AppResult<()> {
        let graph = build(&nodes, &edges)?;
        let stats = analyze(&graph);
        debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            throughput = stats.estimated_throughput_per_hour,
            "line updated"
        );
        self.nodes = nodes;
        self.edges = edges;
        self.graph = Arc::new(graph);
        self.stats = stats;
        Ok(())
    }
}

fn find_node(nodes: &[NodeSpec], id: &NodeId) -> AppResult<usize> {
    nodes
        .iter()
        .position(|n| &n.id == id)
        .ok_or_else(|| not_found("node", id))
}

fn find_edge(edges: &[EdgeSpec], id: &EdgeId) -> AppResult<usize> {
    edges
        .iter()
        .position(|e| &e.id == id)
        .ok_or_else(|| not_found("edge", id))
}

fn not_found(what: &'static str, id: &fl_core::Id) -> AppError {
    AppError::NotFound {
        what,
        id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fl_graph::GraphError;

    fn session() -> FactorySession {
        FactorySession::from_specs(
            vec![
                NodeSpec::new("cut", "Cutter", 10.0),
                NodeSpec::new("weld", "Welder", 30.0),
            ],
            vec![EdgeSpec::new("e1", "cut", "weld").with_transit_time(5.0)],
        )
        .unwrap()
    }

    #[test]
    fn stats_follow_every_edit() {
        let mut s = session();
        assert_eq!(s.live_stats().total_cycle_time_s, 45.0);
        assert_eq!(s.live_stats().estimated_throughput_per_hour, 120);

        s.set_max_capacity(&"weld".into(), 3).unwrap();
        assert_eq!(s.live_stats().bottleneck, Some("cut".into()));
        assert_eq!(s.live_stats().estimated_throughput_per_hour, 360);

        s.set_transit_time(&"e1".into(), 0.0).unwrap();
        assert_eq!(s.live_stats().total_cycle_time_s, 20.0);
    }

    #[test]
    fn rejected_edit_leaves_session_unchanged() {
        let mut s = session();
        let err = s.set_cycle_time(&"cut".into(), -1.0).unwrap_err();
        assert!(matches!(
            err,
            AppError::Graph(GraphError::InvalidCycleTime { .. })
        ));
        assert_eq!(s.nodes()[0].cycle_time_s, 10.0);

        let err = s.add_edge(EdgeSpec::new("e2", "weld", "paint")).unwrap_err();
        assert!(matches!(err, AppError::Graph(GraphError::UnknownNodeRef { .. })));
        assert_eq!(s.edges().len(), 1);
    }

    #[test]
    fn remove_node_drops_incident_edges() {
        let mut s = session();
        let removed = s.remove_node(&"weld".into()).unwrap();
        assert_eq!(removed.name, "Welder");
        assert!(s.edges().is_empty());
        assert_eq!(s.diagnostics(), &[Diagnostic::NoStartingPoint]);
        assert!(s.live_stats().is_empty());
    }

    #[test]
    fn unknown_ids_are_reported() {
        let mut s = session();
        assert!(matches!(
            s.remove_edge(&"nope".into()),
            Err(AppError::NotFound { what: "edge", .. })
        ));
        assert!(matches!(
            s.rename_node(&"nope".into(), "x"),
            Err(AppError::NotFound { what: "node", .. })
        ));
    }

    #[test]
    fn rename_changes_bottleneck_name() {
        let mut s = session();
        s.rename_node(&"weld".into(), "Spot welder").unwrap();
        assert_eq!(s.live_stats().bottleneck_name.as_deref(), Some("Spot welder"));
    }
}
