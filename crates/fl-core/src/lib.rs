//! fl-core: stable foundation for flowline.
//!
//! Contains:
//! - ids (string identifiers handed over by the editing surface)
//! - numeric (Real, duration floors, adjusted cycle time)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use error::{FlError, FlResult};
pub use ids::*;
pub use numeric::*;
