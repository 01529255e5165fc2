//! Cell store, key lookup and spatial index.
//!
//! # Data layout
//!
//! Cells live in one `Vec<Cell>` indexed by `CellId`.  Two indexes sit on
//! top of it:
//!
//! - an `FxHashMap<CellKey, CellId>` for O(1) lookup by rounded centre,
//! - an R-tree (via `rstar`) of `[lat, lng]` centres for radius and
//!   containment queries.
//!
//! Both are built once by [`GridIndexBuilder::build`] and never mutated.

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::FxHashMap;
use tracing::{info, warn};

use wf_core::geo::metres_per_deg_lng;
use wf_core::{Bounds, Cell, CellId, CellKey, CellRecord, GeoPoint};

use crate::error::{GridError, GridResult};

/// Number of nearest centres checked by [`GridIndex::locate`].  A point lies
/// in one of the few cells whose centres are closest to it on any grid whose
/// cells are roughly square.
const LOCATE_CANDIDATES: usize = 9;

// ── R-tree cell entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree: a cell centre as `[lat, lng]` plus its id.
#[derive(Clone)]
struct CellEntry {
    point: [f64; 2],
    id: CellId,
}

impl RTreeObject for CellEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for CellEntry {
    /// Squared Euclidean distance in degree space.  Only used to rank nearby
    /// candidates; metric distances are computed separately.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlng = self.point[1] - point[1];
        dlat * dlat + dlng * dlng
    }
}

// ── GridIndex ─────────────────────────────────────────────────────────────────

/// Immutable set of cells with key and spatial lookup.
///
/// Do not construct directly; use [`GridIndexBuilder`].
pub struct GridIndex {
    /// All cells, indexed by `CellId`.
    pub cells: Vec<Cell>,

    by_key: FxHashMap<CellKey, CellId>,
    spatial_idx: RTree<CellEntry>,
    extent: Option<Bounds>,
}

impl GridIndex {
    /// A grid with no cells.
    pub fn empty() -> Self {
        GridIndex {
            cells: Vec::new(),
            by_key: FxHashMap::default(),
            spatial_idx: RTree::new(),
            extent: None,
        }
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterator over every `CellId` in index order.
    pub fn ids(&self) -> impl Iterator<Item = CellId> + '_ {
        (0..self.cells.len()).map(|i| CellId(i as u32))
    }

    #[inline]
    pub fn contains_id(&self, id: CellId) -> bool {
        id.index() < self.cells.len()
    }

    /// The cell with this id.
    ///
    /// # Panics
    /// Panics if `id` is out of range; use [`get`](Self::get) for untrusted ids.
    #[inline]
    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id.index()]
    }

    #[inline]
    pub fn get(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id.index())
    }

    /// Overall extent of all cell bounds.  `None` for an empty grid.
    #[inline]
    pub fn bounds(&self) -> Option<Bounds> {
        self.extent
    }

    /// Shortest burn duration of any flammable cell, i.e. the fastest cell.
    pub fn min_burn_duration(&self) -> Option<f64> {
        self.cells
            .iter()
            .filter_map(|c| c.burn_duration)
            .min_by(|a, b| a.total_cmp(b))
    }

    // ── Key lookup ────────────────────────────────────────────────────────

    #[inline]
    pub fn lookup(&self, key: CellKey) -> Option<CellId> {
        self.by_key.get(&key).copied()
    }

    /// Look up the cell whose centre rounds to the same key as `p`.
    #[inline]
    pub fn lookup_point(&self, p: GeoPoint) -> Option<CellId> {
        self.lookup(CellKey::from_point(p))
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The cell whose bounds contain `p`, e.g. a clicked map position.
    ///
    /// When `p` lies on a shared edge the cell with the nearest centre wins.
    pub fn locate(&self, p: GeoPoint) -> Option<CellId> {
        self.spatial_idx
            .nearest_neighbor_iter(&[p.lat, p.lng])
            .take(LOCATE_CANDIDATES)
            .find(|e| self.cells[e.id.index()].bounds.contains(p))
            .map(|e| e.id)
    }

    /// Cells whose centre lies inside the box `center ± (half_lat, half_lng)`
    /// degrees, in unspecified order.
    pub fn cells_within(&self, center: GeoPoint, half_lat: f64, half_lng: f64) -> Vec<CellId> {
        let envelope = AABB::from_corners(
            [center.lat - half_lat, center.lng - half_lng],
            [center.lat + half_lat, center.lng + half_lng],
        );
        self.spatial_idx
            .locate_in_envelope(&envelope)
            .map(|e| e.id)
            .collect()
    }

    /// Cells whose centre lies within `radius_m` planar metres of `center`,
    /// paired with that distance.
    pub fn cells_within_radius_m(&self, center: GeoPoint, radius_m: f64) -> Vec<(CellId, f64)> {
        let half_lat = radius_m / wf_core::geo::METRES_PER_DEG_LAT;
        // Near the poles a metre spans an unbounded number of longitude
        // degrees; clamp so the envelope stays finite.
        let half_lng = radius_m / metres_per_deg_lng(center.lat).max(1.0);

        self.cells_within(center, half_lat, half_lng)
            .into_iter()
            .filter_map(|id| {
                let d = center.planar_distance_m(self.cells[id.index()].center);
                (d <= radius_m).then_some((id, d))
            })
            .collect()
    }
}

// ── GridIndexBuilder ──────────────────────────────────────────────────────────

/// Construct a [`GridIndex`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use wf_core::{Bounds, Cell, GeoPoint};
/// use wf_grid::GridIndexBuilder;
///
/// let mut b = GridIndexBuilder::new();
/// let bounds = Bounds::around(GeoPoint::new(40.0, -120.0), 100.0);
/// let id = b.add_cell(Cell::new(bounds.center(), bounds, Some(10.0)));
/// let grid = b.build().unwrap();
/// assert_eq!(grid.lookup_point(bounds.center()), Some(id));
/// ```
pub struct GridIndexBuilder {
    cells: Vec<Cell>,
}

impl GridIndexBuilder {
    pub fn new() -> Self {
        Self { cells: Vec::new() }
    }

    pub fn with_capacity(cells: usize) -> Self {
        Self { cells: Vec::with_capacity(cells) }
    }

    /// Add a cell and return its `CellId` (sequential from 0).
    pub fn add_cell(&mut self, cell: Cell) -> CellId {
        let id = CellId(self.cells.len() as u32);
        self.cells.push(cell);
        id
    }

    /// Validate an external record and add it.
    pub fn add_record(&mut self, record: CellRecord) -> GridResult<CellId> {
        let cell = record.into_cell(self.cells.len())?;
        Ok(self.add_cell(cell))
    }

    /// Lay out a regular `rows × cols` grid of `pitch_m` cells whose
    /// south-west corner is `sw`.
    ///
    /// Cell edges are shared exactly between neighbours.  The longitude step
    /// is fixed from the latitude of `sw`, so columns stay aligned across
    /// rows.  `burn(row, col)` supplies each cell's burn duration; row 0 is
    /// the southern row and ids are assigned row-major.
    pub fn regular<F>(sw: GeoPoint, rows: usize, cols: usize, pitch_m: f64, mut burn: F) -> Self
    where
        F: FnMut(usize, usize) -> Option<f64>,
    {
        let dlat = pitch_m / wf_core::geo::METRES_PER_DEG_LAT;
        let dlng = pitch_m / metres_per_deg_lng(sw.lat);
        let lat_edges: Vec<f64> = (0..=rows).map(|r| sw.lat + r as f64 * dlat).collect();
        let lng_edges: Vec<f64> = (0..=cols).map(|c| sw.lng + c as f64 * dlng).collect();

        let mut b = Self::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                let bounds = Bounds::new(
                    GeoPoint::new(lat_edges[r], lng_edges[c]),
                    GeoPoint::new(lat_edges[r + 1], lng_edges[c + 1]),
                );
                b.add_cell(Cell::new(bounds.center(), bounds, burn(r, c)));
            }
        }
        b
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Consume the builder and produce a [`GridIndex`].
    ///
    /// Fails if two cells share a centre key.
    pub fn build(self) -> GridResult<GridIndex> {
        if self.cells.len() >= u32::MAX as usize {
            return Err(GridError::TooManyCells(self.cells.len()));
        }

        let mut by_key = FxHashMap::with_capacity_and_hasher(self.cells.len(), Default::default());
        for (i, cell) in self.cells.iter().enumerate() {
            let id = CellId(i as u32);
            let key = cell.key();
            if let Some(&first) = by_key.get(&key) {
                warn!(%first, second = %id, "duplicate cell key rejected");
                return Err(GridError::DuplicateKey { key, first, second: id });
            }
            by_key.insert(key, id);
        }

        let entries: Vec<CellEntry> = self
            .cells
            .iter()
            .enumerate()
            .map(|(i, c)| CellEntry { point: [c.center.lat, c.center.lng], id: CellId(i as u32) })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        let extent = self
            .cells
            .iter()
            .map(|c| c.bounds)
            .reduce(|acc, b| acc.union(&b));

        info!(cells = self.cells.len(), "grid index built");

        Ok(GridIndex { cells: self.cells, by_key, spatial_idx, extent })
    }
}

impl Default for GridIndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a grid from external records in one call.
pub fn from_records<I>(records: I) -> GridResult<GridIndex>
where
    I: IntoIterator<Item = CellRecord>,
{
    let mut b = GridIndexBuilder::new();
    for record in records {
        b.add_record(record)?;
    }
    b.build()
}
