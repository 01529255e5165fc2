//! Planar geometry helpers on `GeoPoint`s.
//!
//! Intersection and containment predicates treat longitude as `x` and latitude
//! as `y` directly in degrees.  Both predicates are invariant under the
//! axis-aligned scaling that converts degrees to local metres, so no projection
//! is needed.  Distance helpers project to local metres first.

use crate::geo::{Bounds, GeoPoint};

/// Tolerance for the collinearity test, in squared degrees.
const COLLINEAR_EPS: f64 = 1e-18;

/// Signed area of the triangle `(a, b, c)` times two.
///
/// Positive when `c` lies to the left of `a → b` (counter-clockwise).
#[inline]
pub fn orientation(a: GeoPoint, b: GeoPoint, c: GeoPoint) -> f64 {
    (b.lng - a.lng) * (c.lat - a.lat) - (b.lat - a.lat) * (c.lng - a.lng)
}

#[inline]
fn sign(v: f64) -> i8 {
    if v > COLLINEAR_EPS {
        1
    } else if v < -COLLINEAR_EPS {
        -1
    } else {
        0
    }
}

/// `true` if `p` lies within the axis-aligned box spanned by `a` and `b`.
#[inline]
fn on_segment_box(a: GeoPoint, b: GeoPoint, p: GeoPoint) -> bool {
    p.lng >= a.lng.min(b.lng)
        && p.lng <= a.lng.max(b.lng)
        && p.lat >= a.lat.min(b.lat)
        && p.lat <= a.lat.max(b.lat)
}

/// `true` if segment `p1–p2` and segment `q1–q2` share at least one point.
///
/// Touching endpoints and collinear overlap both count as intersecting.
pub fn segments_intersect(p1: GeoPoint, p2: GeoPoint, q1: GeoPoint, q2: GeoPoint) -> bool {
    let d1 = sign(orientation(q1, q2, p1));
    let d2 = sign(orientation(q1, q2, p2));
    let d3 = sign(orientation(p1, p2, q1));
    let d4 = sign(orientation(p1, p2, q2));

    if d1 != d2 && d3 != d4 && d1 != 0 && d2 != 0 && d3 != 0 && d4 != 0 {
        return true;
    }

    (d1 == 0 && on_segment_box(q1, q2, p1))
        || (d2 == 0 && on_segment_box(q1, q2, p2))
        || (d3 == 0 && on_segment_box(p1, p2, q1))
        || (d4 == 0 && on_segment_box(p1, p2, q2))
}

/// Shortest planar distance in metres from `p` to the segment `a–b`.
pub fn point_segment_distance_m(p: GeoPoint, a: GeoPoint, b: GeoPoint) -> f64 {
    // Local frame with `a` at the origin: (north, east).
    let (bn, be) = a.offset_m(b);
    let (pn, pe) = a.offset_m(p);

    let len_sq = bn * bn + be * be;
    if len_sq == 0.0 {
        return pn.hypot(pe);
    }

    let t = ((pn * bn + pe * be) / len_sq).clamp(0.0, 1.0);
    (pn - t * bn).hypot(pe - t * be)
}

/// Even-odd ray-cast point-in-polygon test.
///
/// `ring` may be open or closed; the closing edge is implied.  Points exactly
/// on an edge may fall either way.
pub fn point_in_polygon(p: GeoPoint, ring: &[GeoPoint]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = (ring[i].lng, ring[i].lat);
        let (xj, yj) = (ring[j].lng, ring[j].lat);
        if (yi > p.lat) != (yj > p.lat) && p.lng < (xj - xi) * (p.lat - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Liang–Barsky clip of segment `a–b` against `bounds` (closed rectangle).
///
/// Returns the portion of the segment inside the rectangle, or `None` if the
/// segment misses it entirely.  A segment that only grazes a corner returns a
/// degenerate segment.
pub fn clip_segment(a: GeoPoint, b: GeoPoint, bounds: &Bounds) -> Option<(GeoPoint, GeoPoint)> {
    let dx = b.lng - a.lng;
    let dy = b.lat - a.lat;

    let p = [-dx, dx, -dy, dy];
    let q = [
        a.lng - bounds.min.lng,
        bounds.max.lng - a.lng,
        a.lat - bounds.min.lat,
        bounds.max.lat - a.lat,
    ];

    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    for (pk, qk) in p.into_iter().zip(q) {
        if pk == 0.0 {
            // Parallel to this edge: reject if outside it.
            if qk < 0.0 {
                return None;
            }
            continue;
        }
        let r = qk / pk;
        if pk < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    let at = |t: f64| GeoPoint::new(a.lat + t * dy, a.lng + t * dx);
    Some((at(t0), at(t1)))
}

/// `true` if `p` lies strictly inside `bounds` (edges excluded).
#[inline]
pub fn strictly_inside(bounds: &Bounds, p: GeoPoint) -> bool {
    p.lat > bounds.min.lat && p.lat < bounds.max.lat && p.lng > bounds.min.lng && p.lng < bounds.max.lng
}
