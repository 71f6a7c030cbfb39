use crate::{FlError, FlResult};

/// Floating point type used throughout system
pub type Real = f64;

/// Smallest duration any node or edge is allowed to take, in seconds.
///
/// Zero-time nodes and edges are valid input; they still take one tick's
/// worth of this floor instead of dividing by zero.
pub const MIN_DURATION_S: Real = 0.1;

/// Upper bound on the wall-clock delta fed into a single frame, in seconds.
pub const MAX_FRAME_DELTA_S: Real = 0.1;

pub const SECONDS_PER_HOUR: Real = 3600.0;

pub fn ensure_finite(v: Real, what: &'static str) -> FlResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(FlError::NonFinite { what, value: v })
    }
}

/// Effective per-unit occupancy of a node: cycle time shared across its
/// concurrent capacity. A capacity of 0 or 1 leaves the cycle time unchanged.
pub fn adjusted_cycle_time(cycle_time_s: Real, max_capacity: u32) -> Real {
    if max_capacity > 1 {
        cycle_time_s / Real::from(max_capacity)
    } else {
        cycle_time_s
    }
}

/// Clamp a progress fraction to [0, 1].
pub fn clamp_unit(x: Real) -> Real {
    x.clamp(0.0, 1.0)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn adjusted_never_exceeds_cycle_time(cycle in 0.0_f64..10_000.0, cap in 0_u32..64) {
            let adjusted = adjusted_cycle_time(cycle, cap);
            prop_assert!(adjusted <= cycle);
            prop_assert!(adjusted >= 0.0);
        }
    }
}
