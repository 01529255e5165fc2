//! The operator-drawn ignition boundary and per-cell classification.
//!
//! A cell is on the **fireline** when the boundary passes through its
//! interior, or when the boundary touches its edge and also encloses its
//! centre.  The second clause keeps a boundary traced exactly along one cell's
//! edges from also igniting the neighbours that share those edges.  A cell
//! whose centre is enclosed but which is not on the fireline is **interior**
//! and counts as already burned.

use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::geo::{Bounds, GeoPoint};
use crate::geometry::{clip_segment, point_in_polygon, strictly_inside};

/// Classification of one cell against an [`IgnitionBoundary`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Ignition {
    /// Ignites at t = 0.
    Fireline,
    /// Already consumed when the run starts.
    Interior,
    /// Untouched by the boundary.
    Outside,
}

/// Ordered list of boundary vertices.
///
/// The ring is closed implicitly: if the last point differs from the first,
/// a closing edge back to the first point is assumed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IgnitionBoundary {
    points: Vec<GeoPoint>,
}

impl IgnitionBoundary {
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }

    /// Rectangle boundary tracing `bounds` (SW, NW, NE, SE).
    pub fn from_bounds(bounds: &Bounds) -> Self {
        Self { points: bounds.corners().to_vec() }
    }

    #[inline]
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    /// Number of distinct vertices (a repeated closing point is not counted).
    pub fn vertex_count(&self) -> usize {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) if self.points.len() > 1 && first == last => self.points.len() - 1,
            _ => self.points.len(),
        }
    }

    /// A boundary needs at least three vertices to enclose anything.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.vertex_count() >= 3
    }

    /// Vertices with the first point appended if the ring is open.
    pub fn closed_ring(&self) -> Vec<GeoPoint> {
        let mut ring = self.points.clone();
        if let (Some(&first), Some(&last)) = (ring.first(), ring.last()) {
            if first != last {
                ring.push(first);
            }
        }
        ring
    }

    fn edges(&self) -> impl Iterator<Item = (GeoPoint, GeoPoint)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// `true` if any boundary edge meets the closed rectangle `bounds`.
    pub fn touches_bounds(&self, bounds: &Bounds) -> bool {
        self.is_valid() && self.edges().any(|(a, b)| clip_segment(a, b, bounds).is_some())
    }

    /// `true` if any boundary edge passes through the open interior of `bounds`.
    pub fn crosses_interior(&self, bounds: &Bounds) -> bool {
        self.is_valid()
            && self.edges().any(|(a, b)| match clip_segment(a, b, bounds) {
                Some((c0, c1)) => {
                    let mid = GeoPoint::new(0.5 * (c0.lat + c1.lat), 0.5 * (c0.lng + c1.lng));
                    strictly_inside(bounds, mid)
                }
                None => false,
            })
    }

    /// Point-in-polygon test against the closed ring.
    pub fn encloses(&self, p: GeoPoint) -> bool {
        self.is_valid() && point_in_polygon(p, &self.points)
    }

    /// Classify a cell.  An invalid boundary classifies everything `Outside`.
    pub fn classify(&self, cell: &Cell) -> Ignition {
        if !self.is_valid() {
            return Ignition::Outside;
        }
        let enclosed = self.encloses(cell.center);
        if self.crosses_interior(&cell.bounds) || (enclosed && self.touches_bounds(&cell.bounds)) {
            Ignition::Fireline
        } else if enclosed {
            Ignition::Interior
        } else {
            Ignition::Outside
        }
    }
}

impl From<Vec<GeoPoint>> for IgnitionBoundary {
    fn from(points: Vec<GeoPoint>) -> Self {
        IgnitionBoundary::new(points)
    }
}
