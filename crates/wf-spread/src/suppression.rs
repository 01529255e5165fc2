//! Firebreaks and water drops.
//!
//! Suppression acts on the edges the fire would travel along:
//!
//! - a firebreak **blocks** any edge whose centre-to-centre segment crosses
//!   it, and **suppresses** any cell whose centre lies within half its width,
//! - a water drop **suppresses** every cell whose centre lies within its
//!   radius.
//!
//! A suppressed cell is recorded in the run's suppressed set and never burns
//! for the rest of that run.  Cells already on the fireline ignite regardless.

use rustc_hash::FxHashSet;
use tracing::debug;

use wf_core::geometry::{point_segment_distance_m, segments_intersect};
use wf_core::{CellId, GeoPoint};
use wf_grid::GridIndex;

// ── SuppressionFeature ────────────────────────────────────────────────────────

/// One operator-placed suppression feature.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SuppressionFeature {
    /// A cleared line of `width_m` metres from `start` to `end`.
    Firebreak { start: GeoPoint, end: GeoPoint, width_m: f64 },
    /// A circular retardant drop.
    WaterDrop { center: GeoPoint, radius_m: f64 },
}

impl SuppressionFeature {
    /// `true` if a cell centred at `p` is covered by this feature.
    pub fn covers(&self, p: GeoPoint) -> bool {
        match *self {
            SuppressionFeature::Firebreak { start, end, width_m } => {
                point_segment_distance_m(p, start, end) <= 0.5 * width_m
            }
            SuppressionFeature::WaterDrop { center, radius_m } => center.distance_m(p) <= radius_m,
        }
    }

    /// The centre line of a firebreak.
    fn line(&self) -> Option<(GeoPoint, GeoPoint)> {
        match *self {
            SuppressionFeature::Firebreak { start, end, .. } => Some((start, end)),
            SuppressionFeature::WaterDrop { .. } => None,
        }
    }
}

// ── EdgeVerdict ───────────────────────────────────────────────────────────────

/// What suppression does to one spread edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EdgeVerdict {
    /// Fire may cross.
    Open,
    /// The edge crosses a firebreak; the target may still burn by another path.
    Blocked,
    /// The target cell is covered; it is out of play for the rest of the run.
    Suppressed,
}

// ── SuppressionMask ───────────────────────────────────────────────────────────

/// The set of active suppression features.
///
/// [`rasterize`](Self::rasterize) precomputes which cells are covered so
/// `edge_verdict` no longer evaluates coverage geometry per edge.  Adding a
/// feature discards the raster; clearing removes everything.
#[derive(Clone, Debug, Default)]
pub struct SuppressionMask {
    features: Vec<SuppressionFeature>,
    covered: Option<FxHashSet<CellId>>,
}

impl SuppressionMask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, feature: SuppressionFeature) {
        self.features.push(feature);
        self.covered = None;
    }

    pub fn add_firebreak(&mut self, start: GeoPoint, end: GeoPoint, width_m: f64) {
        self.add(SuppressionFeature::Firebreak { start, end, width_m });
    }

    pub fn add_water_drop(&mut self, center: GeoPoint, radius_m: f64) {
        self.add(SuppressionFeature::WaterDrop { center, radius_m });
    }

    /// Remove every feature.
    pub fn clear(&mut self) {
        self.features.clear();
        self.covered = None;
    }

    #[inline]
    pub fn features(&self) -> &[SuppressionFeature] {
        &self.features
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    #[inline]
    pub fn is_rasterized(&self) -> bool {
        self.covered.is_some()
    }

    /// Precompute the covered cells of `grid`.  Returns how many are covered.
    pub fn rasterize(&mut self, grid: &GridIndex) -> usize {
        let covered: FxHashSet<CellId> = grid
            .ids()
            .filter(|&id| self.covers_point(grid.cell(id).center))
            .collect();
        let n = covered.len();
        debug!(features = self.features.len(), covered = n, "suppression rasterized");
        self.covered = Some(covered);
        n
    }

    /// `true` if any feature covers `p`.
    pub fn covers_point(&self, p: GeoPoint) -> bool {
        self.features.iter().any(|f| f.covers(p))
    }

    /// `true` if the cell is covered by any feature.
    pub fn covers(&self, grid: &GridIndex, cell: CellId) -> bool {
        match &self.covered {
            Some(set) => set.contains(&cell),
            None => grid.get(cell).is_some_and(|c| self.covers_point(c.center)),
        }
    }

    /// Verdict for fire travelling from `from` to `to`.
    ///
    /// A firebreak crossing takes precedence over coverage of the target.
    pub fn edge_verdict(&self, grid: &GridIndex, from: CellId, to: CellId) -> EdgeVerdict {
        if self.features.is_empty() {
            return EdgeVerdict::Open;
        }
        let (Some(a), Some(b)) = (grid.get(from), grid.get(to)) else {
            return EdgeVerdict::Open;
        };

        let crosses = self
            .features
            .iter()
            .filter_map(SuppressionFeature::line)
            .any(|(s, e)| segments_intersect(a.center, b.center, s, e));
        if crosses {
            return EdgeVerdict::Blocked;
        }

        if self.covers(grid, to) {
            EdgeVerdict::Suppressed
        } else {
            EdgeVerdict::Open
        }
    }
}
