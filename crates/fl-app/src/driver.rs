//! Headless frame loop.
//!
//! Stands in for an animation "next frame" primitive: timestamps are evenly
//! spaced and the loop ends when the run finishes or the frame budget runs out.

use fl_core::Real;
use fl_sim::{EngineEvent, EventKind, FrameUpdate, SimObserver, TickStatus, UnitPosition};
use fl_stats::RunSummary;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::session::FactorySession;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveOptions {
    /// Wall-clock spacing between frames (milliseconds)
    pub frame_interval_ms: Real,
    /// Frames after the baseline before the run is stopped
    pub max_frames: usize,
}

impl Default for DriveOptions {
    fn default() -> Self {
        Self {
            frame_interval_ms: 1000.0 / 60.0,
            max_frames: 1_000_000,
        }
    }
}

impl DriveOptions {
    /// Spacing for a target frame rate.
    pub fn at_fps(fps: Real) -> Self {
        Self {
            frame_interval_ms: 1000.0 / fps,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if !self.frame_interval_ms.is_finite() || self.frame_interval_ms <= 0.0 {
            return Err(AppError::InvalidInput(format!(
                "frame interval must be positive, got {}",
                self.frame_interval_ms
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DriveReport {
    /// Advancing frames ticked (the baseline frame is not counted)
    pub frames: usize,
    pub units_completed: usize,
    /// False when the frame budget ran out first
    pub finished: bool,
    pub summary: Option<RunSummary>,
}

/// Forwards everything and counts completed units on the way.
struct Counting<'a> {
    inner: &'a mut dyn SimObserver,
    units_completed: usize,
}

impl SimObserver for Counting<'_> {
    fn on_frame_update(&mut self, frame: &FrameUpdate) {
        self.inner.on_frame_update(frame);
    }

    fn on_unit_position_update(&mut self, position: Option<&UnitPosition>) {
        self.inner.on_unit_position_update(position);
    }

    fn on_event(&mut self, event: &EngineEvent) {
        if event.kind == EventKind::UnitComplete {
            self.units_completed += 1;
        }
        self.inner.on_event(event);
    }
}

/// Start a run and tick it until it finishes.
///
/// A cyclic line never finishes; it is stopped (annotations cleared) once
/// `max_frames` frames have been ticked.
pub fn drive(
    session: &mut FactorySession,
    options: &DriveOptions,
    observer: &mut dyn SimObserver,
) -> AppResult<DriveReport> {
    options.validate()?;

    let mut counting = Counting {
        inner: observer,
        units_completed: 0,
    };
    session.start_simulation(&mut counting)?;
    session.tick(0.0, &mut counting)?;

    let mut frames = 0;
    let mut summary = None;
    while frames < options.max_frames {
        frames += 1;
        let timestamp_ms = frames as Real * options.frame_interval_ms;
        if let TickStatus::Finished(done) = session.tick(timestamp_ms, &mut counting)? {
            summary = Some(done);
            break;
        }
    }

    let finished = summary.is_some();
    if finished {
        info!(frames, units = counting.units_completed, "run finished");
    } else {
        warn!(frames, "frame budget exhausted, stopping run");
        session.stop_simulation(&mut counting);
    }

    Ok(DriveReport {
        frames,
        units_completed: counting.units_completed,
        finished,
        summary,
    })
}
