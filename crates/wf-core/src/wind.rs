//! Wind input.

use serde::{Deserialize, Serialize};

/// Wind speed and heading.
///
/// `direction_deg` is the compass heading the wind blows *toward*
/// (0 = north, clockwise).  The caller owns the value and passes it into each
/// run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WindVector {
    pub speed_kmh: f64,
    pub direction_deg: f64,
}

impl WindVector {
    pub fn new(speed_kmh: f64, direction_deg: f64) -> Self {
        Self {
            speed_kmh: if speed_kmh.is_finite() { speed_kmh.max(0.0) } else { 0.0 },
            direction_deg: if direction_deg.is_finite() { direction_deg.rem_euclid(360.0) } else { 0.0 },
        }
    }

    /// No wind at all.
    pub const CALM: WindVector = WindVector { speed_kmh: 0.0, direction_deg: 0.0 };

    #[inline]
    pub fn is_calm(&self) -> bool {
        self.speed_kmh <= 0.0
    }
}
