use std::time::Duration;

use crate::FlockingConfig;

/// Half-width of the hold band around the target distance.
const HOLD_BAND_M: f64 = 1.0;

/// Classification of the nearest-neighbor distance, driving the velocity
/// command and the pace of the control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// Dangerously close: flee at escape speed.
    Escape,
    /// Closer than the hold band: back off toward the target distance.
    Separate,
    /// Within ±1 m of the target distance: hold position.
    Hold,
    /// Farther than the hold band: close in on the neighbor.
    Approach,
    /// No neighbor with known coordinates: cruise at normal speed.
    FreeFlight,
}

impl Zone {
    /// Classify a nearest-neighbor distance.
    ///
    /// The four neighbor zones partition `[0, ∞)`: boundaries sit exactly
    /// at `escape_distance`, `target − 1` and `target + 1`, and every
    /// non-negative distance lands in exactly one zone.
    pub fn classify(distance_m: f64, config: &FlockingConfig) -> Zone {
        if distance_m < config.escape_distance_m {
            Zone::Escape
        } else if distance_m < config.target_distance_m - HOLD_BAND_M {
            Zone::Separate
        } else if distance_m <= config.target_distance_m + HOLD_BAND_M {
            Zone::Hold
        } else {
            Zone::Approach
        }
    }

    /// How long the control loop sleeps after acting in this zone.
    ///
    /// Escape reacts fastest; free flight can afford the slowest pace.
    pub fn tick_interval(self) -> Duration {
        match self {
            Zone::Escape => Duration::from_millis(100),
            Zone::Separate | Zone::Hold | Zone::Approach => Duration::from_millis(150),
            Zone::FreeFlight => Duration::from_millis(250),
        }
    }
}
