//! User-visible notifications and the observer interface.

use fl_core::NodeId;
use fl_graph::{Diagnostic, FlowGraph};
use serde::Serialize;

use crate::frame::{FrameUpdate, UnitPosition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    SimulationError,
    CyclicFlowDetected,
    DisconnectedNodesWarning,
    UnitComplete,
    SimulationComplete,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::SimulationError => "simulation-error",
            EventKind::CyclicFlowDetected => "cyclic-flow-detected",
            EventKind::DisconnectedNodesWarning => "disconnected-nodes-warning",
            EventKind::UnitComplete => "unit-complete",
            EventKind::SimulationComplete => "simulation-complete",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineEvent {
    pub kind: EventKind,
    pub message: String,
}

impl EngineEvent {
    pub fn new(kind: EventKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Warning event for a topology diagnostic, naming nodes by display name.
    ///
    /// `None` for error diagnostics; those abort the run with a `SimError`
    /// instead.
    pub fn warning(diagnostic: &Diagnostic, graph: &FlowGraph) -> Option<Self> {
        let name = |id: &NodeId| display_name(graph, id);
        let event = match diagnostic {
            Diagnostic::CyclicFlow { entry } => Self::new(
                EventKind::CyclicFlowDetected,
                format!(
                    "Cyclic flow detected: no node without inputs, starting at {}",
                    name(entry)
                ),
            ),
            Diagnostic::NoStartingPoint => return None,
            Diagnostic::Disconnected { nodes } => {
                let names: Vec<String> = nodes.iter().map(|id| name(id)).collect();
                Self::new(
                    EventKind::DisconnectedNodesWarning,
                    format!(
                        "{} disconnected node(s) will be ignored: {}",
                        nodes.len(),
                        names.join(", ")
                    ),
                )
            }
        };
        Some(event)
    }
}

pub(crate) fn display_name(graph: &FlowGraph, id: &NodeId) -> String {
    graph
        .node(id)
        .map_or_else(|| id.to_string(), |n| n.display_name().to_owned())
}

/// Receiver of simulator output. All methods default to doing nothing.
pub trait SimObserver {
    /// Called once per frame with the full annotated node and edge sets.
    fn on_frame_update(&mut self, _frame: &FrameUpdate) {}

    /// Called once per frame with the primary unit, or `None` while it is in
    /// transit or when no unit remains.
    fn on_unit_position_update(&mut self, _position: Option<&UnitPosition>) {}

    fn on_event(&mut self, _event: &EngineEvent) {}
}

impl SimObserver for () {}

/// Observer that keeps everything it is told.
#[derive(Debug, Default, Clone)]
pub struct Recorder {
    pub frames: Vec<FrameUpdate>,
    pub positions: Vec<Option<UnitPosition>>,
    pub events: Vec<EngineEvent>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    pub fn last_frame(&self) -> Option<&FrameUpdate> {
        self.frames.last()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
        self.positions.clear();
        self.events.clear();
    }
}

impl SimObserver for Recorder {
    fn on_frame_update(&mut self, frame: &FrameUpdate) {
        self.frames.push(frame.clone());
    }

    fn on_unit_position_update(&mut self, position: Option<&UnitPosition>) {
        self.positions.push(position.cloned());
    }

    fn on_event(&mut self, event: &EngineEvent) {
        self.events.push(event.clone());
    }
}
