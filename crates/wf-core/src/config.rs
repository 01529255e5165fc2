//! Engine configuration.
//!
//! Typically loaded from a JSON file by the application crate and passed to
//! the grid and spread engines.  Every section has defaults, and missing
//! fields in a partial file fall back to them.

use serde::{Deserialize, Serialize};

use crate::error::{WfError, WfResult};

// ── SpreadConfig ──────────────────────────────────────────────────────────────

/// Top-level engine configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpreadConfig {
    pub neighbors: NeighborConfig,
    pub wind: WindConfig,
    pub stochastic: StochasticConfig,
}

impl SpreadConfig {
    /// Reject values that would make the engines misbehave.
    pub fn validate(&self) -> WfResult<()> {
        self.neighbors.validate()?;
        self.wind.validate()?;
        self.stochastic.validate()
    }
}

fn positive(name: &str, v: f64) -> WfResult<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(WfError::Config(format!("{name} must be positive and finite, got {v}")))
    }
}

// ── NeighborConfig ────────────────────────────────────────────────────────────

/// Directional neighbour discovery parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeighborConfig {
    /// Nominal grid pitch in metres.  Default: 100.
    pub cell_pitch_m: f64,

    /// Candidates are gathered within `search_factor × cell_pitch_m`.
    /// Default: 1.5.  On a regular grid the diagonals (≈ 1.41 × pitch) fall
    /// inside this radius and are dropped by the axis-dominance test.
    pub search_factor: f64,

    /// Candidates closer than this are treated as the query cell itself.
    /// Default: 10 m.
    pub min_separation_m: f64,

    /// A candidate is north/south only if `|north| > axis_dominance × |east|`
    /// (and symmetrically for east/west).  Default: 1.5.
    pub axis_dominance: f64,
}

impl Default for NeighborConfig {
    fn default() -> Self {
        Self {
            cell_pitch_m: 100.0,
            search_factor: 1.5,
            min_separation_m: 10.0,
            axis_dominance: 1.5,
        }
    }
}

impl NeighborConfig {
    /// Search radius in metres.
    #[inline]
    pub fn search_radius_m(&self) -> f64 {
        self.search_factor * self.cell_pitch_m
    }

    pub fn validate(&self) -> WfResult<()> {
        positive("neighbors.cell_pitch_m", self.cell_pitch_m)?;
        positive("neighbors.search_factor", self.search_factor)?;
        positive("neighbors.axis_dominance", self.axis_dominance)?;
        if !(self.min_separation_m.is_finite() && self.min_separation_m >= 0.0) {
            return Err(WfError::Config(format!(
                "neighbors.min_separation_m must be non-negative, got {}",
                self.min_separation_m
            )));
        }
        if self.min_separation_m >= self.search_radius_m() {
            return Err(WfError::Config(
                "neighbors.min_separation_m must be below the search radius".into(),
            ));
        }
        Ok(())
    }
}

// ── WindConfig ────────────────────────────────────────────────────────────────

/// Shape of the wind multiplier curve.
///
/// With `influence = cos(angle between spread bearing and wind heading)` and
/// `sf = min(speed / speed_normalization_kmh, max_speed_factor)`:
///
/// - tailwind (`influence > alignment_threshold`):
///   `min(max_multiplier, 1 + influence·sf·tailwind_gain)`
/// - headwind (`influence < -alignment_threshold`):
///   `max(min_multiplier, 1 + influence·sf·headwind_gain)`
/// - crosswind: `clamp(1 + influence·sf·crosswind_gain, crosswind_min, crosswind_max)`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindConfig {
    pub speed_normalization_kmh: f64,
    pub max_speed_factor: f64,
    pub alignment_threshold: f64,
    pub tailwind_gain: f64,
    pub headwind_gain: f64,
    pub crosswind_gain: f64,
    pub max_multiplier: f64,
    pub min_multiplier: f64,
    pub crosswind_min: f64,
    pub crosswind_max: f64,
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            speed_normalization_kmh: 30.0,
            max_speed_factor: 2.0,
            alignment_threshold: 0.7,
            tailwind_gain: 3.0,
            headwind_gain: 0.8,
            crosswind_gain: 1.5,
            max_multiplier: 5.0,
            min_multiplier: 0.2,
            crosswind_min: 0.5,
            crosswind_max: 3.0,
        }
    }
}

impl WindConfig {
    pub fn validate(&self) -> WfResult<()> {
        positive("wind.speed_normalization_kmh", self.speed_normalization_kmh)?;
        positive("wind.max_speed_factor", self.max_speed_factor)?;
        positive("wind.min_multiplier", self.min_multiplier)?;
        positive("wind.crosswind_min", self.crosswind_min)?;
        if !(0.0..1.0).contains(&self.alignment_threshold) {
            return Err(WfError::Config(format!(
                "wind.alignment_threshold must be in [0, 1), got {}",
                self.alignment_threshold
            )));
        }
        if self.min_multiplier > self.max_multiplier || self.crosswind_min > self.crosswind_max {
            return Err(WfError::Config("wind multiplier bounds are inverted".into()));
        }
        Ok(())
    }
}

// ── StochasticConfig ──────────────────────────────────────────────────────────

/// Parameters for the randomised cellular spread variant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StochasticConfig {
    /// Master RNG seed.  The same seed always produces identical runs.
    pub seed: u64,
    /// Spread chance before rate and wind adjustments.  Default: 0.6.
    pub base_chance: f64,
    /// Weight of the normalised spread rate.  Default: 0.4.
    pub rate_weight: f64,
    /// Weight of `(wind_multiplier − 1)`.  Default: 0.3.
    pub wind_weight: f64,
    pub min_chance: f64,
    pub max_chance: f64,
    /// Minutes per cellular step.  Default: 1.
    pub step_minutes: f64,

    /// Reach of long-range spread past the immediate neighbours, in metres.
    /// Default: 0 (off).
    pub spotting_radius_m: f64,
    /// Long-range chance before distance, rate and wind adjustments.
    /// Default: 0.3.
    pub long_range_chance: f64,
    /// Weight of `1 − distance / spotting_radius_m`.  Default: 0.4.
    pub distance_weight: f64,
    /// Floor of the long-range chance.  Default: 0.1.
    pub long_range_min_chance: f64,
    /// A jump fails once more than this many non-flammable cells lie in a
    /// row on its path.  Default: 2.
    pub max_gap_cells: usize,
}

impl Default for StochasticConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            base_chance: 0.6,
            rate_weight: 0.4,
            wind_weight: 0.3,
            min_chance: 0.2,
            max_chance: 1.0,
            step_minutes: 1.0,
            spotting_radius_m: 0.0,
            long_range_chance: 0.3,
            distance_weight: 0.4,
            long_range_min_chance: 0.1,
            max_gap_cells: 2,
        }
    }
}

impl StochasticConfig {
    pub fn validate(&self) -> WfResult<()> {
        positive("stochastic.step_minutes", self.step_minutes)?;
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        if !in_unit(self.min_chance) || !in_unit(self.max_chance) || self.min_chance > self.max_chance {
            return Err(WfError::Config(format!(
                "stochastic chance bounds must satisfy 0 <= min <= max <= 1, got [{}, {}]",
                self.min_chance, self.max_chance
            )));
        }
        if !(self.spotting_radius_m.is_finite() && self.spotting_radius_m >= 0.0) {
            return Err(WfError::Config(format!(
                "stochastic.spotting_radius_m must be non-negative, got {}",
                self.spotting_radius_m
            )));
        }
        if !in_unit(self.long_range_min_chance) || self.long_range_min_chance > self.max_chance {
            return Err(WfError::Config(format!(
                "stochastic.long_range_min_chance must lie in [0, max_chance], got {}",
                self.long_range_min_chance
            )));
        }
        Ok(())
    }
}
