//! Wind modulation of spread edges.
//!
//! The multiplier scales the *rate* of spread along an edge, so the edge
//! duration is `source.burn_duration / multiplier`.  Downwind edges burn
//! faster (up to `max_multiplier`), upwind edges slower (down to
//! `min_multiplier`), and crosswind edges stay within a narrow band.

use wf_core::{Cell, GeoPoint, WindConfig, WindVector};

/// A wind vector together with the curve that turns it into multipliers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WindModel {
    wind: WindVector,
    config: WindConfig,
}

impl WindModel {
    pub fn new(wind: WindVector, config: WindConfig) -> Self {
        Self { wind, config }
    }

    /// No wind: every multiplier is exactly 1.
    pub fn calm() -> Self {
        Self::default()
    }

    #[inline]
    pub fn wind(&self) -> WindVector {
        self.wind
    }

    pub fn set_wind(&mut self, wind: WindVector) {
        self.wind = wind;
    }

    /// Rate multiplier for fire spreading toward compass bearing `bearing_deg`.
    pub fn multiplier(&self, bearing_deg: f64) -> f64 {
        if self.wind.is_calm() {
            return 1.0;
        }
        let c = &self.config;

        let mut diff = (bearing_deg - self.wind.direction_deg).rem_euclid(360.0);
        if diff > 180.0 {
            diff = 360.0 - diff;
        }
        let influence = diff.to_radians().cos();
        let speed_factor = (self.wind.speed_kmh / c.speed_normalization_kmh).min(c.max_speed_factor);
        let push = influence * speed_factor;

        if influence > c.alignment_threshold {
            (1.0 + push * c.tailwind_gain).min(c.max_multiplier)
        } else if influence < -c.alignment_threshold {
            (1.0 + push * c.headwind_gain).max(c.min_multiplier)
        } else {
            (1.0 + push * c.crosswind_gain).max(c.crosswind_min).min(c.crosswind_max)
        }
    }

    /// Multiplier for the edge between two centres.
    #[inline]
    pub fn edge_multiplier(&self, from: GeoPoint, to: GeoPoint) -> f64 {
        self.multiplier(from.bearing_deg(to))
    }

    /// Minutes for fire to cross from `source` into `target`.
    ///
    /// `None` if the source cannot burn.
    #[inline]
    pub fn edge_duration(&self, source: &Cell, target: &Cell) -> Option<f64> {
        source
            .burn_duration
            .map(|d| d / self.edge_multiplier(source.center, target.center))
    }
}
