//! Run configuration.

use fl_core::{MAX_FRAME_DELTA_S, MIN_DURATION_S, Real, ensure_finite};
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Options for simulation runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimOptions {
    /// Simulated seconds per wall-clock second
    pub speed_multiplier: Real,
    /// Largest wall-clock delta applied in one frame (seconds)
    pub max_frame_delta_s: Real,
    /// Duration floor for zero-time nodes and edges (seconds)
    pub min_duration_s: Real,
    /// Maximum number of units in flight (safety limit)
    pub max_active_tokens: usize,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            speed_multiplier: 1.0,
            max_frame_delta_s: MAX_FRAME_DELTA_S,
            min_duration_s: MIN_DURATION_S,
            max_active_tokens: 10_000,
        }
    }
}

impl SimOptions {
    pub fn with_speed(mut self, speed_multiplier: Real) -> Self {
        self.speed_multiplier = speed_multiplier;
        self
    }

    pub fn validate(&self) -> SimResult<()> {
        if ensure_finite(self.speed_multiplier, "speed multiplier")? <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "speed multiplier must be positive",
            });
        }
        if ensure_finite(self.max_frame_delta_s, "max frame delta")? <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "max frame delta must be positive",
            });
        }
        if ensure_finite(self.min_duration_s, "min duration")? <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "min duration must be positive",
            });
        }
        if self.max_active_tokens == 0 {
            return Err(SimError::InvalidArg {
                what: "max active tokens must be positive",
            });
        }
        Ok(())
    }
}
