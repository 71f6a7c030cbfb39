//! Per-unit state machine.
//!
//! A token is processing at a node until its progress reaches 1, then fans
//! out into one transit token per outgoing edge (or completes at a sink).
//! A transit token becomes a processing token at the edge target when its
//! own progress reaches 1.

use fl_core::{EdgeId, NodeId, Real, clamp_unit};
use fl_graph::FlowGraph;

use crate::frame::UnitPosition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub enum TokenState {
    Processing {
        node: NodeId,
        progress: Real,
    },
    InTransit {
        edge: EdgeId,
        from: NodeId,
        to: NodeId,
        transit_time_s: Real,
        progress: Real,
    },
}

/// One simulated unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub id: TokenId,
    pub state: TokenState,
}

impl Token {
    pub fn processing(id: TokenId, node: NodeId) -> Self {
        Self {
            id,
            state: TokenState::Processing {
                node,
                progress: 0.0,
            },
        }
    }

    pub fn is_in_transit(&self) -> bool {
        matches!(self.state, TokenState::InTransit { .. })
    }

    /// Node being processed, or the edge source while in transit.
    pub fn node(&self) -> &NodeId {
        match &self.state {
            TokenState::Processing { node, .. } => node,
            TokenState::InTransit { from, .. } => from,
        }
    }

    /// Position for external tracking; `None` while in transit.
    pub fn position(&self) -> Option<UnitPosition> {
        match &self.state {
            TokenState::Processing { node, progress } => Some(UnitPosition {
                node: node.clone(),
                progress: *progress,
            }),
            TokenState::InTransit { .. } => None,
        }
    }
}

/// Outcome of advancing one token by one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// Still processing at its node.
    Processing(Token),
    /// Still travelling along its edge.
    InTransit(Token),
    /// Reached the edge target; processing there starts from zero next frame.
    Arrived(Token),
    /// Finished at `node`; one fresh transit state per outgoing edge, in edge order.
    FannedOut {
        node: NodeId,
        transits: Vec<TokenState>,
    },
    /// Finished at a node without outgoing edges.
    Completed { node: NodeId },
}

/// Advance a token by `step_s` simulated seconds.
///
/// Pure: the graph is only read, and the outcome depends on nothing but the
/// arguments. Durations below `min_duration_s` are raised to it. A token
/// processing at a node the graph does not know is returned unchanged.
pub fn advance(token: Token, step_s: Real, graph: &FlowGraph, min_duration_s: Real) -> Advance {
    let Token { id, state } = token;
    match state {
        TokenState::InTransit {
            edge,
            from,
            to,
            transit_time_s,
            progress,
        } => {
            let progress = clamp_unit(progress + step_s / transit_time_s.max(min_duration_s));
            if progress >= 1.0 {
                Advance::Arrived(Token::processing(id, to))
            } else {
                Advance::InTransit(Token {
                    id,
                    state: TokenState::InTransit {
                        edge,
                        from,
                        to,
                        transit_time_s,
                        progress,
                    },
                })
            }
        }
        TokenState::Processing { node, progress } => {
            let Some(spec) = graph.node(&node) else {
                return Advance::Processing(Token {
                    id,
                    state: TokenState::Processing { node, progress },
                });
            };
            let duration_s = spec.adjusted_cycle_time().max(min_duration_s);
            let progress = clamp_unit(progress + step_s / duration_s);
            if progress < 1.0 {
                return Advance::Processing(Token {
                    id,
                    state: TokenState::Processing { node, progress },
                });
            }

            let outgoing = graph.outgoing(&node);
            if outgoing.is_empty() {
                return Advance::Completed { node };
            }
            let transits = outgoing
                .iter()
                .map(|t| TokenState::InTransit {
                    edge: t.edge.clone(),
                    from: node.clone(),
                    to: t.target.clone(),
                    transit_time_s: t.transit_time_s,
                    progress: 0.0,
                })
                .collect();
            Advance::FannedOut { node, transits }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fl_graph::{EdgeSpec, NodeSpec, build};

    fn graph() -> FlowGraph {
        let nodes = vec![
            NodeSpec::new("a", "A", 1.0),
            NodeSpec::new("b", "B", 2.0).with_capacity(2),
            NodeSpec::new("c", "C", 0.0),
        ];
        let edges = vec![
            EdgeSpec::new("ab", "a", "b").with_transit_time(2.0),
            EdgeSpec::new("ac", "a", "c"),
        ];
        build(&nodes, &edges).unwrap()
    }

    #[test]
    fn processing_progress_scales_with_capacity() {
        let graph = graph();
        let token = Token::processing(TokenId(0), "b".into());
        // b: 2s / 2 = 1s adjusted
        match advance(token, 0.25, &graph, 0.1) {
            Advance::Processing(t) => {
                assert_eq!(t.position().unwrap().progress, 0.25);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn completion_fans_out_in_edge_order() {
        let graph = graph();
        let token = Token::processing(TokenId(0), "a".into());
        match advance(token, 1.0, &graph, 0.1) {
            Advance::FannedOut { node, transits } => {
                assert_eq!(node.as_str(), "a");
                let edges: Vec<&str> = transits
                    .iter()
                    .map(|s| match s {
                        TokenState::InTransit { edge, .. } => edge.as_str(),
                        TokenState::Processing { .. } => panic!("expected transit"),
                    })
                    .collect();
                assert_eq!(edges, vec!["ab", "ac"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn zero_time_node_uses_duration_floor() {
        let graph = graph();
        let token = Token::processing(TokenId(3), "c".into());
        match advance(token, 0.05, &graph, 0.1) {
            Advance::Processing(t) => assert_eq!(t.position().unwrap().progress, 0.5),
            other => panic!("unexpected {other:?}"),
        }
        let token = Token::processing(TokenId(3), "c".into());
        assert_eq!(
            advance(token, 0.1, &graph, 0.1),
            Advance::Completed { node: "c".into() }
        );
    }

    #[test]
    fn transit_arrival_restarts_processing_at_target() {
        let graph = graph();
        let token = Token {
            id: TokenId(7),
            state: TokenState::InTransit {
                edge: "ab".into(),
                from: "a".into(),
                to: "b".into(),
                transit_time_s: 2.0,
                progress: 0.5,
            },
        };
        assert!(token.is_in_transit());
        assert_eq!(token.node().as_str(), "a");
        assert!(token.position().is_none());

        match advance(token, 1.0, &graph, 0.1) {
            Advance::Arrived(t) => {
                assert_eq!(t.id, TokenId(7));
                assert_eq!(
                    t.state,
                    TokenState::Processing {
                        node: "b".into(),
                        progress: 0.0
                    }
                );
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unknown_node_holds_the_token() {
        let graph = graph();
        let token = Token {
            id: TokenId(4),
            state: TokenState::Processing {
                node: "ghost".into(),
                progress: 0.5,
            },
        };
        assert_eq!(
            advance(token.clone(), 10.0, &graph, 0.1),
            Advance::Processing(token)
        );
    }

    #[test]
    fn progress_is_clamped() {
        let graph = graph();
        let token = Token {
            id: TokenId(1),
            state: TokenState::InTransit {
                edge: "ab".into(),
                from: "a".into(),
                to: "b".into(),
                transit_time_s: 2.0,
                progress: 0.0,
            },
        };
        match advance(token, 0.5, &graph, 0.1) {
            Advance::InTransit(t) => match t.state {
                TokenState::InTransit { progress, .. } => assert_eq!(progress, 0.25),
                TokenState::Processing { .. } => panic!("expected transit"),
            },
            other => panic!("unexpected {other:?}"),
        }
    }
}
