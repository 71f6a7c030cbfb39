//! Error types for simulation operations.

use fl_core::FlError;
use thiserror::Error;

/// Errors that prevent a run from starting or continuing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("No starting point found: add a node with outgoing edges and no inputs")]
    NoStartingPoint,

    #[error("At least two connected nodes are required to simulate (found {found})")]
    TooFewConnectedNodes { found: usize },

    #[error("Active unit limit of {limit} exceeded")]
    TokenLimitExceeded { limit: usize },

    #[error(transparent)]
    Core(#[from] FlError),
}

pub type SimResult<T> = Result<T, SimError>;
