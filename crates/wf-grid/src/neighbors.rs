//! Directional neighbour discovery.
//!
//! Cells do not come with adjacency, and generated grids are not perfectly
//! regular (longitude spacing varies with latitude, cells may be missing), so
//! neighbours are derived geometrically.  For a query cell:
//!
//! 1. gather candidates whose centre is within `search_factor × cell_pitch_m`,
//! 2. drop candidates closer than `min_separation_m`,
//! 3. visit the rest by ascending distance, ties by ascending `CellId`,
//! 4. a candidate whose offset is dominated by its north/south component
//!    (`|north| > axis_dominance × |east|`) claims the North or South slot
//!    if free, and symmetrically for East/West; near-diagonal candidates
//!    are dropped,
//! 5. stop once all four slots are filled.
//!
//! The result is deterministic for a given grid and config, but not
//! necessarily symmetric: A may list B as its east neighbour while B's west
//! slot holds a closer cell.  [`NeighborGraph::asymmetric_links`] reports
//! such links; nothing repairs them.

use std::fmt;

use tracing::{debug, info};

use wf_core::{CellId, NeighborConfig};

use crate::index::GridIndex;

// ── Direction ─────────────────────────────────────────────────────────────────

/// The four neighbour slots.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::North, Direction::South, Direction::East, Direction::West];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Nominal compass bearing of this direction.
    pub fn bearing_deg(self) -> f64 {
        match self {
            Direction::North => 0.0,
            Direction::East => 90.0,
            Direction::South => 180.0,
            Direction::West => 270.0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::North => "N",
            Direction::South => "S",
            Direction::East => "E",
            Direction::West => "W",
        };
        f.write_str(s)
    }
}

// ── NeighborSet ───────────────────────────────────────────────────────────────

/// Up to four neighbours, one per [`Direction`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NeighborSet([Option<CellId>; 4]);

impl NeighborSet {
    pub const EMPTY: NeighborSet = NeighborSet([None; 4]);

    #[inline]
    pub fn get(&self, dir: Direction) -> Option<CellId> {
        self.0[dir.index()]
    }

    /// Fill `dir` if it is still empty.  Returns `true` if the slot was taken.
    pub fn claim(&mut self, dir: Direction, id: CellId) -> bool {
        let slot = &mut self.0[dir.index()];
        if slot.is_none() {
            *slot = Some(id);
            true
        } else {
            false
        }
    }

    /// Occupied slots in `Direction::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = (Direction, CellId)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |d| self.0[d.index()].map(|id| (d, id)))
    }

    pub fn len(&self) -> usize {
        self.0.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }

    pub fn is_full(&self) -> bool {
        self.0.iter().all(Option::is_some)
    }

    pub fn contains(&self, id: CellId) -> bool {
        self.0.contains(&Some(id))
    }
}

// ── NeighborSource ────────────────────────────────────────────────────────────

/// Anything that can answer "who are this cell's neighbours".
///
/// Takes `&mut self` so lazy sources can cache.  Unknown ids yield an empty
/// set.
pub trait NeighborSource {
    fn neighbors(&mut self, cell: CellId) -> NeighborSet;
}

impl<S: NeighborSource + ?Sized> NeighborSource for &mut S {
    fn neighbors(&mut self, cell: CellId) -> NeighborSet {
        (**self).neighbors(cell)
    }
}

// ── NeighborResolver ──────────────────────────────────────────────────────────

/// Stateless per-cell neighbour discovery over a [`GridIndex`].
#[derive(Clone)]
pub struct NeighborResolver<'g> {
    grid: &'g GridIndex,
    config: NeighborConfig,
}

impl<'g> NeighborResolver<'g> {
    pub fn new(grid: &'g GridIndex, config: NeighborConfig) -> Self {
        Self { grid, config }
    }

    #[inline]
    pub fn grid(&self) -> &'g GridIndex {
        self.grid
    }

    #[inline]
    pub fn config(&self) -> &NeighborConfig {
        &self.config
    }

    /// Resolve the neighbours of one cell.
    pub fn resolve(&self, cell: CellId) -> NeighborSet {
        let Some(query) = self.grid.get(cell) else {
            return NeighborSet::EMPTY;
        };
        let origin = query.center;

        let mut candidates: Vec<(CellId, f64)> = self
            .grid
            .cells_within_radius_m(origin, self.config.search_radius_m())
            .into_iter()
            .filter(|&(id, d)| id != cell && d >= self.config.min_separation_m)
            .collect();
        candidates.sort_unstable_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

        let k = self.config.axis_dominance;
        let mut set = NeighborSet::EMPTY;
        for (id, _) in candidates {
            let (north, east) = origin.offset_m(self.grid.cell(id).center);
            let dir = if north.abs() > k * east.abs() {
                if north > 0.0 { Direction::North } else { Direction::South }
            } else if east.abs() > k * north.abs() {
                if east > 0.0 { Direction::East } else { Direction::West }
            } else {
                continue;
            };
            set.claim(dir, id);
            if set.is_full() {
                break;
            }
        }
        set
    }
}

// ── NeighborGraph (eager) ─────────────────────────────────────────────────────

/// Neighbour sets for every cell, resolved up front.
///
/// With the `parallel` feature the per-cell resolution runs on Rayon's
/// thread pool.  Each cell is resolved independently, so the graph is
/// identical either way.
#[derive(Clone, Debug, Default)]
pub struct NeighborGraph {
    sets: Vec<NeighborSet>,
}

impl NeighborGraph {
    pub fn build(grid: &GridIndex, config: &NeighborConfig) -> Self {
        let resolver = NeighborResolver::new(grid, config.clone());

        #[cfg(not(feature = "parallel"))]
        let sets: Vec<NeighborSet> = grid.ids().map(|id| resolver.resolve(id)).collect();

        #[cfg(feature = "parallel")]
        let sets: Vec<NeighborSet> = {
            use rayon::prelude::*;
            (0..grid.len())
                .into_par_iter()
                .map(|i| resolver.resolve(CellId(i as u32)))
                .collect()
        };

        let graph = NeighborGraph { sets };
        info!(
            cells = graph.len(),
            links = graph.link_count(),
            asymmetric = graph.asymmetric_links().len(),
            "neighbour graph built"
        );
        graph
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Neighbours of `cell`; empty for unknown ids.
    #[inline]
    pub fn get(&self, cell: CellId) -> NeighborSet {
        self.sets.get(cell.index()).copied().unwrap_or_default()
    }

    /// Total number of directed links.
    pub fn link_count(&self) -> usize {
        self.sets.iter().map(NeighborSet::len).sum()
    }

    /// Links `(from, dir, to)` where `to` does not list `from` in the
    /// opposite slot.
    pub fn asymmetric_links(&self) -> Vec<(CellId, Direction, CellId)> {
        let mut out = Vec::new();
        for (i, set) in self.sets.iter().enumerate() {
            let from = CellId(i as u32);
            for (dir, to) in set.iter() {
                if self.get(to).get(dir.opposite()) != Some(from) {
                    out.push((from, dir, to));
                }
            }
        }
        out
    }
}

impl NeighborSource for NeighborGraph {
    #[inline]
    fn neighbors(&mut self, cell: CellId) -> NeighborSet {
        self.get(cell)
    }
}

impl NeighborSource for &NeighborGraph {
    #[inline]
    fn neighbors(&mut self, cell: CellId) -> NeighborSet {
        self.get(cell)
    }
}

// ── LazyNeighbors ─────────────────────────────────────────────────────────────

/// Resolves neighbours on first request and caches them.
///
/// Suited to the incremental predictor, which only ever touches the cells
/// near the fire.
pub struct LazyNeighbors<'g> {
    resolver: NeighborResolver<'g>,
    cache: Vec<Option<NeighborSet>>,
    resolved: usize,
}

impl<'g> LazyNeighbors<'g> {
    pub fn new(grid: &'g GridIndex, config: NeighborConfig) -> Self {
        Self {
            resolver: NeighborResolver::new(grid, config),
            cache: vec![None; grid.len()],
            resolved: 0,
        }
    }

    /// Number of cells resolved so far.
    #[inline]
    pub fn resolved_count(&self) -> usize {
        self.resolved
    }

    #[inline]
    pub fn is_resolved(&self, cell: CellId) -> bool {
        matches!(self.cache.get(cell.index()), Some(Some(_)))
    }
}

impl NeighborSource for LazyNeighbors<'_> {
    fn neighbors(&mut self, cell: CellId) -> NeighborSet {
        let Some(slot) = self.cache.get_mut(cell.index()) else {
            return NeighborSet::EMPTY;
        };
        if let Some(set) = slot {
            return *set;
        }
        let set = self.resolver.resolve(cell);
        *slot = Some(set);
        self.resolved += 1;
        debug!(%cell, found = set.len(), "neighbours resolved");
        set
    }
}
