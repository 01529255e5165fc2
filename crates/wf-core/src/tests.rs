//! Unit tests for wf-core primitives.

#[cfg(test)]
mod helpers {
    use crate::geo::metres_per_deg_lng;
    use crate::{Bounds, Cell, GeoPoint};

    pub const LAT0: f64 = 40.0;
    pub const LNG0: f64 = -120.0;

    /// 3×3 grid of 100 m cells whose edges are shared exactly.
    /// Row 0 is the southern row; index = row * 3 + col.
    pub fn grid3x3() -> Vec<Cell> {
        let dlat = 100.0 / 111_000.0;
        let dlng = 100.0 / metres_per_deg_lng(LAT0);
        let lat_edges: Vec<f64> = (0..=3).map(|i| LAT0 + i as f64 * dlat).collect();
        let lng_edges: Vec<f64> = (0..=3).map(|j| LNG0 + j as f64 * dlng).collect();

        let mut cells = Vec::new();
        for r in 0..3 {
            for c in 0..3 {
                let bounds = Bounds::new(
                    GeoPoint::new(lat_edges[r], lng_edges[c]),
                    GeoPoint::new(lat_edges[r + 1], lng_edges[c + 1]),
                );
                cells.push(Cell::new(bounds.center(), bounds, Some(10.0)));
            }
        }
        cells
    }
}

#[cfg(test)]
mod ids {
    use crate::CellId;

    #[test]
    fn index_roundtrip() {
        let id = CellId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(CellId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinel_is_max() {
        assert_eq!(CellId::INVALID.0, u32::MAX);
        assert_eq!(CellId::default(), CellId::INVALID);
        assert!(!CellId::default().is_valid());
        assert!(CellId(0).is_valid());
    }

    #[test]
    fn display() {
        assert_eq!(CellId(7).to_string(), "cell#7");
    }
}

#[cfg(test)]
mod geo {
    use approx::assert_relative_eq;

    use crate::{Bounds, GeoPoint};

    #[test]
    fn zero_distance() {
        let p = GeoPoint::new(40.0, -120.0);
        assert!(p.distance_m(p) < 0.01);
    }

    #[test]
    fn one_degree_latitude() {
        let a = GeoPoint::new(30.0, -88.0);
        let b = GeoPoint::new(31.0, -88.0);
        let d = a.distance_m(b);
        assert!((d - 111_195.0).abs() < 500.0, "got {d}");
    }

    #[test]
    fn offset_axes() {
        let a = GeoPoint::new(40.0, -120.0);
        let north = GeoPoint::new(40.0 + 100.0 / 111_000.0, -120.0);
        let (n, e) = a.offset_m(north);
        assert_relative_eq!(n, 100.0, epsilon = 1e-6);
        assert_relative_eq!(e, 0.0, epsilon = 1e-9);

        let (n, e) = north.offset_m(a);
        assert_relative_eq!(n, -100.0, epsilon = 1e-6);
        assert_relative_eq!(e, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn bearings() {
        let a = GeoPoint::new(40.0, -120.0);
        assert_relative_eq!(a.bearing_deg(GeoPoint::new(40.001, -120.0)), 0.0, epsilon = 1e-9);
        assert_relative_eq!(a.bearing_deg(GeoPoint::new(40.0, -119.999)), 90.0, epsilon = 1e-9);
        assert_relative_eq!(a.bearing_deg(GeoPoint::new(39.999, -120.0)), 180.0, epsilon = 1e-9);
        assert_relative_eq!(a.bearing_deg(GeoPoint::new(40.0, -120.001)), 270.0, epsilon = 1e-9);
    }

    #[test]
    fn bounds_normalise_and_contain() {
        let b = Bounds::new(GeoPoint::new(1.0, 1.0), GeoPoint::new(0.0, 0.0));
        assert_eq!(b.min, GeoPoint::new(0.0, 0.0));
        assert_eq!(b.max, GeoPoint::new(1.0, 1.0));
        assert!(b.contains(GeoPoint::new(0.5, 0.5)));
        assert!(b.contains(GeoPoint::new(1.0, 0.0)));
        assert!(!b.contains(GeoPoint::new(1.1, 0.5)));
        assert_eq!(b.center(), GeoPoint::new(0.5, 0.5));
    }

    #[test]
    fn square_area() {
        let b = Bounds::around(GeoPoint::new(40.0, -120.0), 100.0);
        assert_relative_eq!(b.area_m2(), 10_000.0, max_relative = 1e-6);
    }

    #[test]
    fn bbox_check() {
        let center = GeoPoint::new(30.694, -88.043);
        assert!(GeoPoint::new(30.700, -88.040).within_box(center, 0.1, 0.1));
        assert!(!GeoPoint::new(31.5, -88.043).within_box(center, 0.1, 0.1));
    }
}

#[cfg(test)]
mod geometry {
    use approx::assert_relative_eq;

    use crate::geometry::{clip_segment, point_in_polygon, point_segment_distance_m, segments_intersect};
    use crate::{Bounds, GeoPoint};

    fn p(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint::new(lat, lng)
    }

    #[test]
    fn crossing_segments() {
        assert!(segments_intersect(p(0.0, 0.0), p(1.0, 1.0), p(0.0, 1.0), p(1.0, 0.0)));
    }

    #[test]
    fn parallel_segments_do_not_intersect() {
        assert!(!segments_intersect(p(0.0, 0.0), p(0.0, 1.0), p(1.0, 0.0), p(1.0, 1.0)));
    }

    #[test]
    fn touching_endpoint_counts() {
        assert!(segments_intersect(p(0.0, 0.0), p(1.0, 1.0), p(1.0, 1.0), p(2.0, 0.0)));
    }

    #[test]
    fn disjoint_collinear_segments() {
        assert!(!segments_intersect(p(0.0, 0.0), p(0.0, 1.0), p(0.0, 2.0), p(0.0, 3.0)));
    }

    #[test]
    fn polygon_containment() {
        let square = [p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)];
        assert!(point_in_polygon(p(0.5, 0.5), &square));
        assert!(!point_in_polygon(p(1.5, 0.5), &square));
        assert!(!point_in_polygon(p(0.5, 0.5), &square[..2]));
    }

    #[test]
    fn clip_through_box() {
        let b = Bounds::new(p(0.0, 0.0), p(1.0, 1.0));
        let (a, c) = clip_segment(p(0.5, -1.0), p(0.5, 2.0), &b).unwrap();
        assert_relative_eq!(a.lng, 0.0);
        assert_relative_eq!(c.lng, 1.0);
        assert_relative_eq!(a.lat, 0.5);
    }

    #[test]
    fn clip_miss() {
        let b = Bounds::new(p(0.0, 0.0), p(1.0, 1.0));
        assert!(clip_segment(p(2.0, -1.0), p(2.0, 2.0), &b).is_none());
        assert!(clip_segment(p(1.6, 0.5), p(0.5, 1.6), &b).is_none());
    }

    #[test]
    fn distance_to_segment() {
        let a = p(40.0, -120.0);
        let b = p(40.0 + 200.0 / 111_000.0, -120.0);
        let (_, east_per_deg) = a.offset_m(p(40.0, -119.0));
        let q = p(40.0 + 100.0 / 111_000.0, -120.0 + 30.0 / east_per_deg);
        assert_relative_eq!(point_segment_distance_m(q, a, b), 30.0, max_relative = 1e-3);
        // Beyond the end: distance to the endpoint.
        let beyond = p(40.0 + 300.0 / 111_000.0, -120.0);
        assert_relative_eq!(point_segment_distance_m(beyond, a, b), 100.0, max_relative = 1e-3);
    }
}

#[cfg(test)]
mod cell {
    use approx::assert_relative_eq;

    use crate::{Bounds, Cell, CellKey, CellRecord, GeoPoint, WfError};

    fn bounds() -> Bounds {
        Bounds::around(GeoPoint::new(40.0, -120.0), 100.0)
    }

    #[test]
    fn non_positive_duration_is_non_flammable() {
        let b = bounds();
        assert!(!Cell::new(b.center(), b, Some(0.0)).is_flammable());
        assert!(!Cell::new(b.center(), b, Some(-3.0)).is_flammable());
        assert!(!Cell::new(b.center(), b, Some(f64::NAN)).is_flammable());
        assert!(Cell::new(b.center(), b, Some(0.5)).is_flammable());
    }

    #[test]
    fn from_spread_rate_rounds() {
        let b = bounds();
        let cell = Cell::from_spread_rate(b.center(), b, 3.0, 100.0);
        assert_relative_eq!(cell.burn_duration.unwrap(), 33.33);
        assert_relative_eq!(cell.spread_rate(100.0).unwrap(), 100.0 / 33.33);

        assert!(Cell::from_spread_rate(b.center(), b, 0.0, 100.0).burn_duration.is_none());
    }

    #[test]
    fn key_rounds_to_micro_degrees() {
        let a = CellKey::from_point(GeoPoint::new(40.123_456_4, -120.0));
        let b = CellKey::from_point(GeoPoint::new(40.123_455_6, -120.0));
        assert_eq!(a, b);
        assert_eq!(a.lat_e6, 40_123_456);
    }

    #[test]
    fn record_from_json() {
        let json = r#"[
            {"center":[40.0005,-120.0005],"bounds":[[40.0,-120.001],[40.001,-120.0]],"burnDurationMinutes":12.5},
            {"center":[40.0015,-120.0005],"bounds":[[40.001,-120.001],[40.002,-120.0]],"burnDurationMinutes":null},
            {"center":[40.0025,-120.0005],"bounds":[[40.002,-120.001],[40.003,-120.0]]}
        ]"#;
        let records: Vec<CellRecord> = serde_json::from_str(json).unwrap();
        let cells: Vec<Cell> = records
            .into_iter()
            .enumerate()
            .map(|(i, r)| r.into_cell(i).unwrap())
            .collect();

        assert_eq!(cells[0].burn_duration, Some(12.5));
        assert!(!cells[1].is_flammable());
        assert!(!cells[2].is_flammable());
        assert_eq!(cells[0].center, GeoPoint::new(40.0005, -120.0005));
    }

    #[test]
    fn record_center_outside_bounds_rejected() {
        let rec = CellRecord {
            center: [41.0, -120.0],
            bounds: [[40.0, -120.001], [40.001, -120.0]],
            burn_duration_minutes: Some(5.0),
        };
        let err = rec.into_cell(3).unwrap_err();
        assert!(matches!(err, WfError::InvalidCell { index: 3, .. }));
    }

    #[test]
    fn record_roundtrip_through_cell() {
        let b = bounds();
        let cell = Cell::new(b.center(), b, Some(7.0));
        let back = CellRecord::from(&cell).into_cell(0).unwrap();
        assert_eq!(back, cell);
    }
}

#[cfg(test)]
mod boundary {
    use super::helpers::grid3x3;
    use crate::{Bounds, GeoPoint, Ignition, IgnitionBoundary};

    #[test]
    fn centre_trace_ignites_only_centre() {
        let cells = grid3x3();
        let boundary = IgnitionBoundary::from_bounds(&cells[4].bounds);

        let classes: Vec<Ignition> = cells.iter().map(|c| boundary.classify(c)).collect();
        assert_eq!(classes[4], Ignition::Fireline);
        for (i, class) in classes.iter().enumerate() {
            if i != 4 {
                assert_eq!(*class, Ignition::Outside, "cell {i}");
            }
        }
    }

    #[test]
    fn enclosed_cells_are_interior() {
        let cells = grid3x3();
        let all = cells.iter().skip(1).fold(cells[0].bounds, |acc, c| acc.union(&c.bounds));
        let boundary = IgnitionBoundary::from_bounds(&all);

        assert_eq!(boundary.classify(&cells[4]), Ignition::Interior);
        for i in [0, 1, 2, 3, 5, 6, 7, 8] {
            assert_eq!(boundary.classify(&cells[i]), Ignition::Fireline, "cell {i}");
        }
    }

    #[test]
    fn small_polygon_inside_one_cell() {
        let cells = grid3x3();
        let c = cells[0].center;
        let d = 1e-5;
        let boundary = IgnitionBoundary::new(vec![
            GeoPoint::new(c.lat - d, c.lng - d),
            GeoPoint::new(c.lat + d, c.lng - d),
            GeoPoint::new(c.lat, c.lng + d),
        ]);
        assert_eq!(boundary.classify(&cells[0]), Ignition::Fireline);
        assert_eq!(boundary.classify(&cells[1]), Ignition::Outside);
    }

    #[test]
    fn degenerate_boundary_classifies_nothing() {
        let cells = grid3x3();
        let boundary = IgnitionBoundary::new(vec![cells[4].center, cells[5].center]);
        assert!(!boundary.is_valid());
        assert!(cells.iter().all(|c| boundary.classify(c) == Ignition::Outside));
    }

    #[test]
    fn closing_point_not_counted() {
        let b = Bounds::new(GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 1.0));
        let mut pts = b.corners().to_vec();
        pts.push(pts[0]);
        let closed = IgnitionBoundary::new(pts);
        assert_eq!(closed.vertex_count(), 4);
        assert_eq!(closed.closed_ring().len(), 5);

        let open = IgnitionBoundary::from_bounds(&b);
        assert_eq!(open.closed_ring().len(), 5);

        let triangle_closed = IgnitionBoundary::new(vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(1.0, 0.0),
            GeoPoint::new(0.0, 0.0),
        ]);
        assert!(!triangle_closed.is_valid());
    }
}

#[cfg(test)]
mod time {
    use crate::{IgniteTime, OrdMinutes};

    #[test]
    fn ignite_time_order() {
        assert!(IgniteTime::PreBurned < IgniteTime::At(0.0));
        assert!(IgniteTime::At(0.0) < IgniteTime::At(5.0));
        assert!(IgniteTime::At(1e9) < IgniteTime::Unreached);
        assert_eq!(IgniteTime::default(), IgniteTime::Unreached);
        assert_eq!(IgniteTime::At(3.0).minutes(), Some(3.0));
        assert_eq!(IgniteTime::PreBurned.minutes(), None);
    }

    #[test]
    fn ord_minutes_sorts() {
        let mut v = vec![OrdMinutes(3.0), OrdMinutes(-1.0), OrdMinutes(2.5)];
        v.sort();
        assert_eq!(v, vec![OrdMinutes(-1.0), OrdMinutes(2.5), OrdMinutes(3.0)]);
    }
}

#[cfg(test)]
mod wind {
    use crate::WindVector;

    #[test]
    fn normalises_inputs() {
        let w = WindVector::new(-5.0, -90.0);
        assert_eq!(w.speed_kmh, 0.0);
        assert_eq!(w.direction_deg, 270.0);
        assert!(w.is_calm());
        assert!(!WindVector::new(10.0, 450.0).is_calm());
        assert_eq!(WindVector::new(10.0, 450.0).direction_deg, 90.0);
    }
}

#[cfg(test)]
mod config {
    use crate::{SpreadConfig, WfError};

    #[test]
    fn defaults_are_valid() {
        let cfg = SpreadConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.neighbors.cell_pitch_m, 100.0);
        assert_eq!(cfg.neighbors.search_radius_m(), 150.0);
        assert_eq!(cfg.wind.max_multiplier, 5.0);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: SpreadConfig = serde_json::from_str(r#"{"neighbors":{"cell_pitch_m":50.0}}"#).unwrap();
        assert_eq!(cfg.neighbors.cell_pitch_m, 50.0);
        assert_eq!(cfg.neighbors.search_factor, 1.5);
        assert_eq!(cfg.stochastic.base_chance, 0.6);
        assert_eq!(cfg.stochastic.spotting_radius_m, 0.0);
        assert_eq!(cfg.stochastic.max_gap_cells, 2);
    }

    #[test]
    fn json_roundtrip() {
        let cfg = SpreadConfig::default();
        let text = serde_json::to_string(&cfg).unwrap();
        let back: SpreadConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn rejects_bad_values() {
        let mut cfg = SpreadConfig::default();
        cfg.neighbors.cell_pitch_m = 0.0;
        assert!(matches!(cfg.validate(), Err(WfError::Config(_))));

        let mut cfg = SpreadConfig::default();
        cfg.stochastic.min_chance = 0.9;
        cfg.stochastic.max_chance = 0.1;
        assert!(cfg.validate().is_err());

        let mut cfg = SpreadConfig::default();
        cfg.wind.alignment_threshold = 1.5;
        assert!(cfg.validate().is_err());

        let mut cfg = SpreadConfig::default();
        cfg.stochastic.spotting_radius_m = -1.0;
        assert!(cfg.validate().is_err());

        let mut cfg = SpreadConfig::default();
        cfg.stochastic.max_chance = 0.5;
        cfg.stochastic.min_chance = 0.2;
        cfg.stochastic.long_range_min_chance = 0.8;
        assert!(cfg.validate().is_err());
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SimRng::new(7);
        let mut b = SimRng::new(7);
        let xs: Vec<u64> = (0..8).map(|_| a.random()).collect();
        let ys: Vec<u64> = (0..8).map(|_| b.random()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn children_diverge() {
        let mut root = SimRng::new(7);
        let mut c1 = root.child(1);
        let mut c2 = root.child(2);
        assert_ne!(c1.random::<u64>(), c2.random::<u64>());
    }
}
