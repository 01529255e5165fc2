//! Unit tests for wf-grid.
//!
//! All tests use hand-built grids near (40°N, 120°W).

#[cfg(test)]
mod helpers {
    use wf_core::geo::{metres_per_deg_lng, METRES_PER_DEG_LAT};
    use wf_core::{Bounds, Cell, CellId, GeoPoint};

    use crate::{GridIndex, GridIndexBuilder};

    pub const SW: GeoPoint = GeoPoint { lat: 40.0, lng: -120.0 };

    /// Regular `rows × cols` grid of 100 m cells, burn duration 10 min.
    pub fn grid(rows: usize, cols: usize) -> GridIndex {
        GridIndexBuilder::regular(SW, rows, cols, 100.0, |_, _| Some(10.0))
            .build()
            .unwrap()
    }

    /// Row-major id in a grid with `cols` columns.
    pub fn id(cols: usize, r: usize, c: usize) -> CellId {
        CellId((r * cols + c) as u32)
    }

    /// A small cell whose centre is offset `(north, east)` metres from `SW`.
    pub fn cell_at(north: f64, east: f64) -> Cell {
        let center = GeoPoint::new(
            SW.lat + north / METRES_PER_DEG_LAT,
            SW.lng + east / metres_per_deg_lng(SW.lat),
        );
        let bounds = Bounds::around(center, 10.0);
        Cell::new(center, bounds, Some(10.0))
    }
}

// ── Builder & lookup ──────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use wf_core::{CellRecord, GeoPoint, WfError};

    use super::helpers::{cell_at, grid, SW};
    use crate::{from_records, GridError, GridIndexBuilder};

    #[test]
    fn empty_build() {
        let g = GridIndexBuilder::new().build().unwrap();
        assert!(g.is_empty());
        assert!(g.bounds().is_none());
        assert!(g.locate(SW).is_none());
    }

    #[test]
    fn regular_grid_shares_edges() {
        let g = grid(3, 3);
        assert_eq!(g.len(), 9);
        let a = &g.cells[0];
        let b = &g.cells[1];
        let n = &g.cells[3];
        assert_eq!(a.bounds.max.lng, b.bounds.min.lng);
        assert_eq!(a.bounds.max.lat, n.bounds.min.lat);
    }

    #[test]
    fn extent_covers_all_cells() {
        let g = grid(2, 3);
        let ext = g.bounds().unwrap();
        assert_eq!(ext.min, SW);
        assert_eq!(ext.max, g.cells[5].bounds.max);
    }

    #[test]
    fn duplicate_key_rejected() {
        let mut b = GridIndexBuilder::new();
        b.add_cell(cell_at(0.0, 0.0));
        b.add_cell(cell_at(100.0, 0.0));
        b.add_cell(cell_at(0.0, 0.0));
        match b.build() {
            Err(GridError::DuplicateKey { first, second, .. }) => {
                assert_eq!(first.0, 0);
                assert_eq!(second.0, 2);
            }
            other => panic!("expected DuplicateKey, got {:?}", other.err()),
        }
    }

    #[test]
    fn bad_record_surfaces_core_error() {
        let mut b = GridIndexBuilder::new();
        let bad = CellRecord {
            center: [f64::NAN, 0.0],
            bounds: [[0.0, 0.0], [1.0, 1.0]],
            burn_duration_minutes: None,
        };
        let err = b.add_record(bad).unwrap_err();
        assert!(matches!(err, GridError::Core(WfError::InvalidCell { index: 0, .. })));
    }

    #[test]
    fn records_build_a_grid() {
        let records: Vec<CellRecord> = (0..3)
            .map(|i| CellRecord::from(&cell_at(100.0 * i as f64, 0.0)))
            .collect();
        let g = from_records(records).unwrap();
        assert_eq!(g.len(), 3);
        assert_eq!(g.min_burn_duration(), Some(10.0));
        assert_eq!(g.lookup_point(g.cells[2].center).map(|c| c.0), Some(2));
        assert!(g.lookup_point(GeoPoint::new(0.0, 0.0)).is_none());
    }
}

#[cfg(test)]
mod spatial {
    use approx::assert_relative_eq;
    use wf_core::GeoPoint;

    use super::helpers::{grid, id};

    #[test]
    fn locate_finds_containing_cell() {
        let g = grid(3, 3);
        for target in g.ids() {
            let b = g.cell(target).bounds;
            // A point three quarters of the way toward the NE corner.
            let p = GeoPoint::new(
                b.min.lat + 0.75 * (b.max.lat - b.min.lat),
                b.min.lng + 0.75 * (b.max.lng - b.min.lng),
            );
            assert_eq!(g.locate(p), Some(target));
        }
    }

    #[test]
    fn locate_outside_grid_is_none() {
        let g = grid(3, 3);
        let ext = g.bounds().unwrap();
        assert!(g.locate(GeoPoint::new(ext.max.lat + 0.01, ext.max.lng)).is_none());
    }

    #[test]
    fn radius_query() {
        let g = grid(3, 3);
        let centre = g.cell(id(3, 1, 1)).center;
        let mut near = g.cells_within_radius_m(centre, 120.0);
        near.sort_unstable_by_key(|&(c, _)| c);
        let ids: Vec<u32> = near.iter().map(|(c, _)| c.0).collect();
        assert_eq!(ids, vec![1, 3, 4, 5, 7]);
        for &(c, d) in &near {
            let expected = if c == id(3, 1, 1) { 0.0 } else { 100.0 };
            assert_relative_eq!(d, expected, epsilon = 0.1);
        }

        let all = g.cells_within_radius_m(centre, 150.0);
        assert_eq!(all.len(), 9);
        let corner = all.iter().find(|&&(c, _)| c == id(3, 2, 2)).map(|&(_, d)| d).unwrap();
        assert_relative_eq!(corner, 100.0 * std::f64::consts::SQRT_2, max_relative = 1e-3);
    }
}

// ── Neighbours ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod neighbors {
    use wf_core::{CellId, NeighborConfig};

    use super::helpers::{cell_at, grid, id};
    use crate::{Direction, GridIndexBuilder, LazyNeighbors, NeighborGraph, NeighborResolver, NeighborSource};

    #[test]
    fn centre_has_four_orthogonal_neighbours() {
        let g = grid(3, 3);
        let set = NeighborResolver::new(&g, NeighborConfig::default()).resolve(id(3, 1, 1));
        assert!(set.is_full());
        assert_eq!(set.get(Direction::North), Some(id(3, 2, 1)));
        assert_eq!(set.get(Direction::South), Some(id(3, 0, 1)));
        assert_eq!(set.get(Direction::East), Some(id(3, 1, 2)));
        assert_eq!(set.get(Direction::West), Some(id(3, 1, 0)));
    }

    #[test]
    fn diagonals_never_claim_a_slot() {
        let g = grid(3, 3);
        let r = NeighborResolver::new(&g, NeighborConfig::default());
        let corner = r.resolve(id(3, 0, 0));
        assert_eq!(corner.len(), 2);
        assert_eq!(corner.get(Direction::North), Some(id(3, 1, 0)));
        assert_eq!(corner.get(Direction::East), Some(id(3, 0, 1)));
        assert!(!corner.contains(id(3, 1, 1)));
    }

    #[test]
    fn regular_grid_is_symmetric() {
        let g = grid(4, 5);
        let graph = NeighborGraph::build(&g, &NeighborConfig::default());
        assert_eq!(graph.len(), 20);
        assert!(graph.asymmetric_links().is_empty());
        // 4×5 grid: 4·4 horizontal + 3·5 vertical undirected edges.
        assert_eq!(graph.link_count(), 2 * (4 * 4 + 3 * 5));
    }

    #[test]
    fn closer_candidate_wins_the_slot() {
        let mut b = GridIndexBuilder::new();
        let origin = b.add_cell(cell_at(0.0, 0.0));
        let far = b.add_cell(cell_at(130.0, 0.0));
        let near = b.add_cell(cell_at(100.0, 0.0));
        let g = b.build().unwrap();

        let set = NeighborResolver::new(&g, NeighborConfig::default()).resolve(origin);
        assert_eq!(set.get(Direction::North), Some(near));
        assert!(!set.contains(far));
    }

    #[test]
    fn too_close_candidates_are_ignored() {
        let mut b = GridIndexBuilder::new();
        let origin = b.add_cell(cell_at(0.0, 0.0));
        b.add_cell(cell_at(5.0, 0.0));
        let g = b.build().unwrap();
        assert!(NeighborResolver::new(&g, NeighborConfig::default()).resolve(origin).is_empty());
    }

    #[test]
    fn asymmetry_is_reported() {
        let mut b = GridIndexBuilder::new();
        let a = b.add_cell(cell_at(0.0, 0.0));
        let x = b.add_cell(cell_at(30.0, 100.0));
        let z = b.add_cell(cell_at(30.0, 20.0));
        let g = b.build().unwrap();

        let graph = NeighborGraph::build(&g, &NeighborConfig::default());
        assert_eq!(graph.get(a).get(Direction::East), Some(x));
        assert_eq!(graph.get(x).get(Direction::West), Some(z));
        assert!(graph.asymmetric_links().contains(&(a, Direction::East, x)));
    }

    #[test]
    fn small_radius_finds_nothing() {
        let g = grid(3, 3);
        let cfg = NeighborConfig { search_factor: 0.9, ..NeighborConfig::default() };
        let graph = NeighborGraph::build(&g, &cfg);
        assert_eq!(graph.link_count(), 0);
    }

    #[test]
    fn lazy_matches_eager_and_caches() {
        let g = grid(4, 4);
        let cfg = NeighborConfig::default();
        let graph = NeighborGraph::build(&g, &cfg);
        let mut lazy = LazyNeighbors::new(&g, cfg);

        assert_eq!(lazy.resolved_count(), 0);
        let c = id(4, 2, 2);
        assert_eq!(lazy.neighbors(c), graph.get(c));
        assert_eq!(lazy.neighbors(c), graph.get(c));
        assert_eq!(lazy.resolved_count(), 1);
        assert!(lazy.is_resolved(c));

        for cell in g.ids() {
            assert_eq!(lazy.neighbors(cell), graph.get(cell));
        }
        assert_eq!(lazy.resolved_count(), 16);
    }

    #[test]
    fn unknown_id_yields_empty_set() {
        let g = grid(2, 2);
        let mut graph = NeighborGraph::build(&g, &NeighborConfig::default());
        let mut lazy = LazyNeighbors::new(&g, NeighborConfig::default());
        assert!(graph.neighbors(CellId(99)).is_empty());
        assert!(lazy.neighbors(CellId(99)).is_empty());
        assert!(lazy.neighbors(CellId::INVALID).is_empty());
    }

    #[test]
    fn direction_helpers() {
        for d in Direction::ALL {
            assert_eq!(d.opposite().opposite(), d);
        }
        assert_eq!(Direction::East.bearing_deg(), 90.0);
        assert_eq!(Direction::West.to_string(), "W");
    }
}
