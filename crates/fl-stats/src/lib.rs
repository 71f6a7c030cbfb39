//! Line analytics for flowline graphs.
//!
//! Provides:
//! - Critical path analysis (live stats recomputed on every graph change)
//! - Post-run utilization summary relative to the bottleneck

pub mod critical_path;
pub mod utilization;

pub use critical_path::{LiveStats, analyze};
pub use utilization::{NodeUtilization, RunSummary, summarize};
