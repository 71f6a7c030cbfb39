//! Error types for the fl-app service layer.

use std::path::PathBuf;

use fl_graph::GraphError;
use fl_sim::SimError;

/// Application error type wrapping the engine crates and file handling.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Simulation error: {0}")]
    Simulation(#[from] SimError),

    #[error("Failed to read line file: {path}")]
    LineFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse line file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Unsupported line file format: {path} (expected .yaml, .yml or .json)")]
    UnsupportedFormat { path: PathBuf },

    #[error("{what} not found: {id}")]
    NotFound { what: &'static str, id: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for fl-app operations.
pub type AppResult<T> = Result<T, AppError>;
