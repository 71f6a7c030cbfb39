//! Wall-clock to simulation-delta conversion.

use fl_core::{MAX_FRAME_DELTA_S, Real};

/// Turns frame timestamps (milliseconds) into clamped deltas (seconds).
///
/// The first timestamp only sets the baseline. Non-monotonic timestamps
/// yield a zero delta.
#[derive(Clone, Debug)]
pub struct FrameClock {
    last_ms: Option<Real>,
    max_delta_s: Real,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(MAX_FRAME_DELTA_S)
    }
}

impl FrameClock {
    pub fn new(max_delta_s: Real) -> Self {
        Self {
            last_ms: None,
            max_delta_s,
        }
    }

    /// Record a timestamp. Returns `None` for the baseline frame.
    pub fn tick(&mut self, timestamp_ms: Real) -> Option<Real> {
        let last = self.last_ms.replace(timestamp_ms)?;
        let delta_s = (timestamp_ms - last) / 1000.0;
        if delta_s.is_finite() {
            Some(delta_s.clamp(0.0, self.max_delta_s))
        } else {
            Some(0.0)
        }
    }

    /// Change the clamp. The baseline is kept.
    pub fn set_max_delta(&mut self, max_delta_s: Real) {
        self.max_delta_s = max_delta_s;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_is_baseline() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.tick(5_000.0), None);
        assert_eq!(clock.tick(5_050.0), Some(0.05));
    }

    #[test]
    fn large_gaps_are_clamped() {
        let mut clock = FrameClock::default();
        clock.tick(0.0);
        assert_eq!(clock.tick(30_000.0), Some(0.1));
    }

    #[test]
    fn backwards_time_is_zero() {
        let mut clock = FrameClock::default();
        clock.tick(100.0);
        assert_eq!(clock.tick(40.0), Some(0.0));
        assert_eq!(clock.tick(f64::NAN), Some(0.0));
    }

    #[test]
    fn new_clamp_keeps_baseline() {
        let mut clock = FrameClock::default();
        clock.tick(0.0);
        clock.set_max_delta(0.025);
        assert_eq!(clock.tick(1_000.0), Some(0.025));
    }
}
