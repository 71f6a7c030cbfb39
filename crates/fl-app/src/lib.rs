//! Application service layer for flowline.
//!
//! Owns the editable node/edge lists, keeps the classified graph and live
//! stats current after every edit, and drives simulation runs for front ends
//! that have no animation loop of their own.

pub mod driver;
pub mod error;
pub mod line_file;
pub mod session;

// Re-export key types for convenience
pub use driver::{DriveOptions, DriveReport, drive};
pub use error::{AppError, AppResult};
pub use line_file::{LineFile, LineFormat, load_line_file, parse_line_file};
pub use session::FactorySession;
