//! Geographic coordinate types and local-metre conversions.
//!
//! `GeoPoint` uses `f64` latitude/longitude.  Cell centres are keyed at 1e-6
//! degree (~0.11 m) so single precision would not be enough to keep keys
//! stable across a 100 m grid.
//!
//! Short-range work (neighbour classification, bearings, firebreak buffers)
//! uses an equirectangular approximation around the mean latitude of the two
//! points, with 111 km per degree of latitude.  Water-drop radii use the
//! haversine great-circle distance.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Metres per degree of latitude in the local planar approximation.
pub const METRES_PER_DEG_LAT: f64 = 111_000.0;

/// Mean Earth radius, metres.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Metres per degree of longitude at latitude `lat_deg`.
#[inline]
pub fn metres_per_deg_lng(lat_deg: f64) -> f64 {
    METRES_PER_DEG_LAT * lat_deg.to_radians().cos()
}

// ── GeoPoint ──────────────────────────────────────────────────────────────────

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// `true` if both coordinates are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lng * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }

    /// Planar offset `(north_m, east_m)` from `self` to `other`.
    #[inline]
    pub fn offset_m(self, other: GeoPoint) -> (f64, f64) {
        let mean_lat = 0.5 * (self.lat + other.lat);
        let north = (other.lat - self.lat) * METRES_PER_DEG_LAT;
        let east = (other.lng - self.lng) * metres_per_deg_lng(mean_lat);
        (north, east)
    }

    /// Planar distance in metres.  Cheaper than [`distance_m`](Self::distance_m)
    /// and accurate to well under a metre at cell scale.
    #[inline]
    pub fn planar_distance_m(self, other: GeoPoint) -> f64 {
        let (n, e) = self.offset_m(other);
        n.hypot(e)
    }

    /// Compass bearing from `self` to `other` in degrees: 0 = north,
    /// clockwise, in `[0, 360)`.  Returns 0 for identical points.
    pub fn bearing_deg(self, other: GeoPoint) -> f64 {
        let (north, east) = self.offset_m(other);
        let deg = east.atan2(north).to_degrees();
        if deg < 0.0 { deg + 360.0 } else { deg }
    }

    /// Approximate bounding-box check in degrees.
    #[inline]
    pub fn within_box(self, center: GeoPoint, half_lat: f64, half_lng: f64) -> bool {
        (self.lat - center.lat).abs() <= half_lat && (self.lng - center.lng).abs() <= half_lng
    }
}

impl From<[f64; 2]> for GeoPoint {
    /// `[lat, lng]` ordering, as produced by the grid generator.
    fn from(v: [f64; 2]) -> Self {
        GeoPoint::new(v[0], v[1])
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

// ── Bounds ────────────────────────────────────────────────────────────────────

/// Axis-aligned latitude/longitude rectangle.
///
/// `min` is the south-west corner, `max` the north-east corner.  [`Bounds::new`]
/// normalises the corner order so callers may pass them either way round.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: GeoPoint,
    pub max: GeoPoint,
}

impl Bounds {
    pub fn new(a: GeoPoint, b: GeoPoint) -> Self {
        Self {
            min: GeoPoint::new(a.lat.min(b.lat), a.lng.min(b.lng)),
            max: GeoPoint::new(a.lat.max(b.lat), a.lng.max(b.lng)),
        }
    }

    /// Square-ish bounds of `size_m` metres on each side around `center`.
    pub fn around(center: GeoPoint, size_m: f64) -> Self {
        let half_lat = 0.5 * size_m / METRES_PER_DEG_LAT;
        let half_lng = 0.5 * size_m / metres_per_deg_lng(center.lat);
        Self {
            min: GeoPoint::new(center.lat - half_lat, center.lng - half_lng),
            max: GeoPoint::new(center.lat + half_lat, center.lng + half_lng),
        }
    }

    #[inline]
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(0.5 * (self.min.lat + self.max.lat), 0.5 * (self.min.lng + self.max.lng))
    }

    /// Closed containment test (edges count as inside).
    #[inline]
    pub fn contains(&self, p: GeoPoint) -> bool {
        p.lat >= self.min.lat && p.lat <= self.max.lat && p.lng >= self.min.lng && p.lng <= self.max.lng
    }

    /// Corners in ring order: SW, NW, NE, SE.
    pub fn corners(&self) -> [GeoPoint; 4] {
        [
            self.min,
            GeoPoint::new(self.max.lat, self.min.lng),
            self.max,
            GeoPoint::new(self.min.lat, self.max.lng),
        ]
    }

    /// Smallest bounds covering both `self` and `other`.
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min: GeoPoint::new(self.min.lat.min(other.min.lat), self.min.lng.min(other.min.lng)),
            max: GeoPoint::new(self.max.lat.max(other.max.lat), self.max.lng.max(other.max.lng)),
        }
    }

    /// Planar area in square metres.
    pub fn area_m2(&self) -> f64 {
        let height = (self.max.lat - self.min.lat) * METRES_PER_DEG_LAT;
        let width = (self.max.lng - self.min.lng) * metres_per_deg_lng(self.center().lat);
        height * width
    }

    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }
}
