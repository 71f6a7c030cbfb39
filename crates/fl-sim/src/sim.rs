//! Frame-driven simulation runner.

use std::sync::Arc;

use fl_core::{NodeId, Real};
use fl_graph::{Diagnostic, FlowGraph};
use fl_stats::{RunSummary, summarize};
use tracing::{debug, info, trace, warn};

use crate::clock::FrameClock;
use crate::error::{SimError, SimResult};
use crate::events::{EngineEvent, EventKind, SimObserver, display_name};
use crate::frame::{self, FrameMarks};
use crate::options::SimOptions;
use crate::token::{Advance, Token, TokenId, advance};

/// What the frame driver should do after a tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickStatus {
    /// Units remain in flight; schedule another frame.
    Continue,
    /// The last unit completed on this tick.
    Finished(RunSummary),
    /// No run is active.
    Idle,
}

/// State owned by one active run.
#[derive(Debug)]
struct Run {
    graph: Arc<FlowGraph>,
    tokens: Vec<Token>,
    clock: FrameClock,
    next_token: u64,
    units_completed: usize,
}

impl Run {
    fn alloc_token(&mut self) -> TokenId {
        let id = TokenId(self.next_token);
        self.next_token += 1;
        id
    }
}

/// Play-by-play simulator.
///
/// Owns the token list while a run is active. Each tick reads the previous
/// token list and builds a new one; no token ever sees another token's
/// state from the same tick.
#[derive(Debug, Default)]
pub struct Simulator {
    options: SimOptions,
    run: Option<Run>,
    /// Graph of the most recent run, kept so a stop can clear its annotations.
    last_graph: Option<Arc<FlowGraph>>,
    last_summary: Option<RunSummary>,
    frame: u64,
}

impl Simulator {
    pub fn new(options: SimOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &SimOptions {
        &self.options
    }

    /// Replace the options. During a run every field, the frame clamp
    /// included, applies from the next tick.
    pub fn set_options(&mut self, options: SimOptions) -> SimResult<()> {
        options.validate()?;
        if let Some(run) = self.run.as_mut() {
            run.clock.set_max_delta(options.max_frame_delta_s);
        }
        self.options = options;
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    /// Units currently in flight (empty when idle).
    pub fn tokens(&self) -> &[Token] {
        self.run.as_ref().map_or(&[], |r| r.tokens.as_slice())
    }

    /// Units that reached a sink during the current run.
    pub fn units_completed(&self) -> usize {
        self.run.as_ref().map_or(0, |r| r.units_completed)
    }

    /// Utilization snapshot of the last completed run.
    pub fn last_summary(&self) -> Option<&RunSummary> {
        self.last_summary.as_ref()
    }

    /// Begin a run with one unit at every start node.
    ///
    /// Configuration errors abort before anything changes and are reported as
    /// a `simulation-error` event. Topology warnings are reported and the run
    /// proceeds. Starting while a run is active restarts from scratch.
    pub fn start(
        &mut self,
        graph: Arc<FlowGraph>,
        observer: &mut dyn SimObserver,
    ) -> SimResult<()> {
        self.options.validate()?;

        if let Err(err) = check_runnable(&graph) {
            warn!(error = %err, "simulation not started");
            observer.on_event(&EngineEvent::new(EventKind::SimulationError, err.to_string()));
            return Err(err);
        }

        for event in graph
            .diagnostics()
            .iter()
            .filter_map(|d| EngineEvent::warning(d, &graph))
        {
            observer.on_event(&event);
        }

        let tokens: Vec<Token> = graph
            .start_nodes()
            .iter()
            .enumerate()
            .map(|(i, node)| Token::processing(TokenId(i as u64), node.clone()))
            .collect();

        info!(
            units = tokens.len(),
            connected = graph.connected_count(),
            speed = self.options.speed_multiplier,
            "simulation started"
        );

        self.frame = 0;
        self.last_summary = None;
        self.last_graph = Some(Arc::clone(&graph));
        self.run = Some(Run {
            graph,
            next_token: tokens.len() as u64,
            tokens,
            clock: FrameClock::new(self.options.max_frame_delta_s),
            units_completed: 0,
        });
        Ok(())
    }

    /// Advance the run by one frame at `timestamp_ms`.
    ///
    /// The first tick of a run only records the baseline timestamp and
    /// reports the initial annotations.
    pub fn tick(
        &mut self,
        timestamp_ms: Real,
        observer: &mut dyn SimObserver,
    ) -> SimResult<TickStatus> {
        let Some(run) = self.run.as_mut() else {
            return Ok(TickStatus::Idle);
        };

        let Some(delta_s) = run.clock.tick(timestamp_ms) else {
            let marks = FrameMarks::from_tokens(&run.tokens);
            let update = frame::annotate(&run.graph, self.frame, &marks, &run.tokens);
            observer.on_frame_update(&update);
            let primary = run.tokens.first().and_then(Token::position);
            observer.on_unit_position_update(primary.as_ref());
            self.frame += 1;
            return Ok(TickStatus::Continue);
        };

        let step_s = delta_s * self.options.speed_multiplier;
        let previous = std::mem::take(&mut run.tokens);
        let mut next = Vec::with_capacity(previous.len());
        let mut marks = FrameMarks::default();
        let mut completed_at: Vec<NodeId> = Vec::new();

        for token in previous {
            match advance(token, step_s, &run.graph, self.options.min_duration_s) {
                Advance::Processing(token) | Advance::InTransit(token) => {
                    marks.mark_token(&token);
                    next.push(token);
                }
                Advance::Arrived(token) => {
                    debug!(token = token.id.0, node = %token.node(), "unit arrived");
                    marks.mark_token(&token);
                    next.push(token);
                }
                Advance::FannedOut { node, transits } => {
                    debug!(node = %node, branches = transits.len(), "unit finished processing");
                    marks.mark_node(&node, 1.0);
                    for state in transits {
                        let token = Token {
                            id: run.alloc_token(),
                            state,
                        };
                        marks.mark_token(&token);
                        next.push(token);
                    }
                }
                Advance::Completed { node } => {
                    debug!(node = %node, "unit complete");
                    marks.mark_node(&node, 1.0);
                    completed_at.push(node);
                }
            }
        }

        run.units_completed += completed_at.len();
        let frame_no = self.frame;
        self.frame += 1;

        if next.len() > self.options.max_active_tokens {
            let err = SimError::TokenLimitExceeded {
                limit: self.options.max_active_tokens,
            };
            warn!(units = next.len(), "aborting run");
            let graph = Arc::clone(&run.graph);
            self.run = None;
            observer.on_frame_update(&frame::cleared(&graph, frame_no));
            observer.on_unit_position_update(None);
            observer.on_event(&EngineEvent::new(EventKind::SimulationError, err.to_string()));
            return Err(err);
        }

        if next.is_empty() {
            let graph = Arc::clone(&run.graph);
            let units = run.units_completed;
            self.run = None;

            let summary = summarize(&graph);
            observer.on_frame_update(&frame::completed(&graph, frame_no, &summary));
            observer.on_unit_position_update(None);
            emit_unit_complete(observer, &graph, &completed_at);

            let message = match &summary.bottleneck {
                Some(bottleneck) => format!(
                    "Simulation complete. Bottleneck: {} ({:.1}s per unit)",
                    display_name(&graph, bottleneck),
                    summary.bottleneck_adjusted_cycle_time_s
                ),
                None => "Simulation complete".to_string(),
            };
            observer.on_event(&EngineEvent::new(EventKind::SimulationComplete, message));
            info!(frames = self.frame, units, "simulation complete");

            self.last_summary = Some(summary.clone());
            return Ok(TickStatus::Finished(summary));
        }

        let update = frame::annotate(&run.graph, frame_no, &marks, &next);
        trace!(frame = frame_no, units = next.len(), delta_s, "frame");
        observer.on_frame_update(&update);
        let primary = next.first().and_then(Token::position);
        observer.on_unit_position_update(primary.as_ref());
        emit_unit_complete(observer, &run.graph, &completed_at);

        run.tokens = next;
        Ok(TickStatus::Continue)
    }

    /// Cancel any run and clear every annotation.
    pub fn stop(&mut self, observer: &mut dyn SimObserver) {
        if let Some(run) = self.run.take() {
            info!(units = run.tokens.len(), "simulation stopped");
        }
        self.last_summary = None;
        if let Some(graph) = &self.last_graph {
            observer.on_frame_update(&frame::cleared(graph, self.frame));
        }
        observer.on_unit_position_update(None);
    }
}

fn check_runnable(graph: &FlowGraph) -> SimResult<()> {
    if graph.start_nodes().is_empty()
        || graph
            .diagnostics()
            .iter()
            .any(|d| matches!(d, Diagnostic::NoStartingPoint))
    {
        return Err(SimError::NoStartingPoint);
    }
    if graph.connected_count() < 2 {
        return Err(SimError::TooFewConnectedNodes {
            found: graph.connected_count(),
        });
    }
    Ok(())
}

fn emit_unit_complete(observer: &mut dyn SimObserver, graph: &FlowGraph, nodes: &[NodeId]) {
    for node in nodes {
        observer.on_event(&EngineEvent::new(
            EventKind::UnitComplete,
            format!("Unit completed at {}", display_name(graph, node)),
        ));
    }
}
