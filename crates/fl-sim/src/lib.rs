//! Play-by-play simulation of units flowing through a flowline graph.
//!
//! Provides:
//! - Per-unit token state machine (processing at a node, or in transit on an edge)
//! - Frame clock with baseline capture and clamped deltas
//! - Per-frame node/edge annotations and unit positions
//! - Observer callbacks for frames, the primary unit cursor, and user-facing events
//! - Post-run utilization snapshot when the last unit completes

pub mod clock;
pub mod error;
pub mod events;
pub mod frame;
pub mod options;
pub mod sim;
pub mod token;

// Re-exports for public API
pub use clock::FrameClock;
pub use error::{SimError, SimResult};
pub use events::{EngineEvent, EventKind, Recorder, SimObserver};
pub use frame::{EdgeAnnotation, FrameUpdate, NodeAnnotation, UnitPosition};
pub use options::SimOptions;
pub use sim::{Simulator, TickStatus};
pub use token::{Advance, Token, TokenId, TokenState, advance};
