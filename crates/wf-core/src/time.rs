//! Simulated time in minutes.
//!
//! Fire time is continuous (burn durations are fractional minutes), so the
//! engines work in `f64` minutes.  `OrdMinutes` gives those a total order for
//! use as heap keys, and `IgniteTime` carries the two infinities of the batch
//! propagator explicitly instead of encoding them as `±inf` floats.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

// ── OrdMinutes ────────────────────────────────────────────────────────────────

/// `f64` minutes with a total order (`f64::total_cmp`).
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize)]
pub struct OrdMinutes(pub f64);

impl PartialEq for OrdMinutes {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OrdMinutes {}

impl PartialOrd for OrdMinutes {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrdMinutes {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for OrdMinutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} min", self.0)
    }
}

// ── IgniteTime ────────────────────────────────────────────────────────────────

/// Earliest instant a cell begins burning.
///
/// Ordered `PreBurned < At(_) < Unreached`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum IgniteTime {
    /// Enclosed by the ignition boundary: consumed before t = 0.
    PreBurned,
    /// Ignites at this many minutes after the run starts.
    At(f64),
    /// Never reached by the fire.
    #[default]
    Unreached,
}

impl IgniteTime {
    /// Finite ignition minute, if any.
    #[inline]
    pub fn minutes(self) -> Option<f64> {
        match self {
            IgniteTime::At(t) => Some(t),
            _ => None,
        }
    }

    #[inline]
    pub fn is_reached(self) -> bool {
        !matches!(self, IgniteTime::Unreached)
    }

    /// Numeric form with the infinities made explicit.
    #[inline]
    pub fn as_f64(self) -> f64 {
        match self {
            IgniteTime::PreBurned => f64::NEG_INFINITY,
            IgniteTime::At(t) => t,
            IgniteTime::Unreached => f64::INFINITY,
        }
    }
}

impl PartialOrd for IgniteTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.as_f64().total_cmp(&other.as_f64()))
    }
}

impl fmt::Display for IgniteTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgniteTime::PreBurned => f.write_str("pre-burned"),
            IgniteTime::At(t) => write!(f, "t={t:.2}"),
            IgniteTime::Unreached => f.write_str("unreached"),
        }
    }
}
