//! Graph-specific error types.

use fl_core::{EdgeId, FlError, NodeId};
use thiserror::Error;

/// Graph construction and validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// Two nodes share the same id.
    #[error("Duplicate node id {node}")]
    DuplicateNode { node: NodeId },

    /// Two edges share the same id.
    #[error("Duplicate edge id {edge}")]
    DuplicateEdge { edge: EdgeId },

    /// An edge endpoint refers to a node that doesn't exist.
    #[error("Edge {edge} refers to non-existent node {node}")]
    UnknownNodeRef { edge: EdgeId, node: NodeId },

    #[error("Node {node} has invalid cycle time {value}")]
    InvalidCycleTime { node: NodeId, value: f64 },

    #[error("Edge {edge} has invalid transit time {value}")]
    InvalidTransitTime { edge: EdgeId, value: f64 },

    /// Capacity must be at least one concurrent unit.
    #[error("Node {node} has zero capacity")]
    InvalidCapacity { node: NodeId },

    /// ID not found in index map.
    #[error("{what} {id} not found")]
    IdNotFound { what: &'static str, id: String },

    #[error(transparent)]
    Core(#[from] FlError),
}

pub type GraphResult<T> = Result<T, GraphError>;
