//! Grid cells and their external record form.

use serde::{Deserialize, Serialize};

use crate::error::{WfError, WfResult};
use crate::geo::{Bounds, GeoPoint};

/// Key precision: centres are rounded to 1e-6 degree.
const KEY_SCALE: f64 = 1e6;

// ── CellKey ───────────────────────────────────────────────────────────────────

/// Integer lookup key derived from a cell centre.
///
/// Two cells whose centres round to the same micro-degree share a key; the
/// grid builder rejects that as a duplicate.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct CellKey {
    pub lat_e6: i64,
    pub lng_e6: i64,
}

impl CellKey {
    #[inline]
    pub fn from_point(p: GeoPoint) -> Self {
        Self {
            lat_e6: (p.lat * KEY_SCALE).round() as i64,
            lng_e6: (p.lng * KEY_SCALE).round() as i64,
        }
    }
}

impl From<GeoPoint> for CellKey {
    fn from(p: GeoPoint) -> Self {
        CellKey::from_point(p)
    }
}

// ── Cell ──────────────────────────────────────────────────────────────────────

/// One immutable grid cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub center: GeoPoint,
    pub bounds: Bounds,
    /// Minutes to fully consume the cell once ignited.  `None` means the cell
    /// is non-flammable: it never ignites and never propagates.
    pub burn_duration: Option<f64>,
}

impl Cell {
    /// Build a cell, normalising the burn duration.
    ///
    /// Non-positive or non-finite durations become `None`.
    pub fn new(center: GeoPoint, bounds: Bounds, burn_duration: Option<f64>) -> Self {
        Self {
            center,
            bounds,
            burn_duration: burn_duration.filter(|d| d.is_finite() && *d > 0.0),
        }
    }

    /// Build a cell from a spread rate in metres per minute.
    ///
    /// The burn duration is the time for the front to cross `cell_size_m`,
    /// rounded to 0.01 min.  A non-positive rate yields a non-flammable cell.
    pub fn from_spread_rate(center: GeoPoint, bounds: Bounds, rate_m_per_min: f64, cell_size_m: f64) -> Self {
        let duration = if rate_m_per_min.is_finite() && rate_m_per_min > 0.0 {
            Some((cell_size_m / rate_m_per_min * 100.0).round() / 100.0)
        } else {
            None
        };
        Cell::new(center, bounds, duration)
    }

    #[inline]
    pub fn key(&self) -> CellKey {
        CellKey::from_point(self.center)
    }

    #[inline]
    pub fn is_flammable(&self) -> bool {
        self.burn_duration.is_some()
    }

    /// Spread rate implied by the burn duration, metres per minute.
    pub fn spread_rate(&self, cell_size_m: f64) -> Option<f64> {
        self.burn_duration.map(|d| cell_size_m / d)
    }
}

// ── CellRecord ────────────────────────────────────────────────────────────────

/// External cell record as produced by the grid generator.
///
/// ```json
/// { "center": [lat, lng],
///   "bounds": [[latMin, lngMin], [latMax, lngMax]],
///   "burnDurationMinutes": 12.5 }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRecord {
    pub center: [f64; 2],
    pub bounds: [[f64; 2]; 2],
    #[serde(default)]
    pub burn_duration_minutes: Option<f64>,
}

impl CellRecord {
    /// Validate and convert into a [`Cell`].  `index` is the record's position
    /// in the input and is only used for error reporting.
    pub fn into_cell(self, index: usize) -> WfResult<Cell> {
        let center = GeoPoint::from(self.center);
        let bounds = Bounds::new(GeoPoint::from(self.bounds[0]), GeoPoint::from(self.bounds[1]));

        if !center.is_finite() {
            return Err(WfError::InvalidCell { index, reason: format!("non-finite center {center}") });
        }
        if !bounds.is_finite() {
            return Err(WfError::InvalidCell { index, reason: "non-finite bounds".into() });
        }
        if !bounds.contains(center) {
            return Err(WfError::InvalidCell {
                index,
                reason: format!("center {center} lies outside its bounds"),
            });
        }

        Ok(Cell::new(center, bounds, self.burn_duration_minutes))
    }
}

impl From<&Cell> for CellRecord {
    fn from(cell: &Cell) -> Self {
        CellRecord {
            center: [cell.center.lat, cell.center.lng],
            bounds: [
                [cell.bounds.min.lat, cell.bounds.min.lng],
                [cell.bounds.max.lat, cell.bounds.max.lng],
            ],
            burn_duration_minutes: cell.burn_duration,
        }
    }
}
