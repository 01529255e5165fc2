//! Batch results and point-in-time snapshots.

use rustc_hash::FxHashSet;

use wf_core::{CellId, IgniteTime};
use wf_grid::GridIndex;

// ── CellState ─────────────────────────────────────────────────────────────────

/// Fire state of one cell at one instant.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CellState {
    Unburned,
    Burning,
    Burned,
}

impl CellState {
    pub fn as_str(self) -> &'static str {
        match self {
            CellState::Unburned => "unburned",
            CellState::Burning => "burning",
            CellState::Burned => "burned",
        }
    }
}

// ── StateSnapshot ─────────────────────────────────────────────────────────────

/// Partition of the grid into burning, burned and unburned cells at `time`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StateSnapshot {
    /// Minutes since ignition.
    pub time: f64,
    pub burning: FxHashSet<CellId>,
    pub burned: FxHashSet<CellId>,
    pub unburned: FxHashSet<CellId>,
}

impl StateSnapshot {
    pub fn state(&self, cell: CellId) -> CellState {
        if self.burning.contains(&cell) {
            CellState::Burning
        } else if self.burned.contains(&cell) {
            CellState::Burned
        } else {
            CellState::Unburned
        }
    }

    #[inline]
    pub fn is_burning(&self, cell: CellId) -> bool {
        self.burning.contains(&cell)
    }

    #[inline]
    pub fn is_burned(&self, cell: CellId) -> bool {
        self.burned.contains(&cell)
    }

    /// Burning cells in ascending id order.
    pub fn burning_sorted(&self) -> Vec<CellId> {
        sorted(&self.burning)
    }

    /// Burned cells in ascending id order.
    pub fn burned_sorted(&self) -> Vec<CellId> {
        sorted(&self.burned)
    }

    /// Area of the burned cells in square metres.
    pub fn burned_area_m2(&self, grid: &GridIndex) -> f64 {
        area(grid, self.burned.iter())
    }

    /// Area of burning plus burned cells in square metres.
    pub fn fire_area_m2(&self, grid: &GridIndex) -> f64 {
        area(grid, self.burned.iter().chain(self.burning.iter()))
    }
}

fn sorted(set: &FxHashSet<CellId>) -> Vec<CellId> {
    let mut v: Vec<CellId> = set.iter().copied().collect();
    v.sort_unstable();
    v
}

fn area<'a>(grid: &GridIndex, cells: impl Iterator<Item = &'a CellId>) -> f64 {
    cells
        .filter_map(|&id| grid.get(id))
        .map(|c| c.bounds.area_m2())
        .sum()
}

// ── IgniteField ───────────────────────────────────────────────────────────────

/// Earliest ignite time of every cell, as computed by the batch propagator.
///
/// Holds a copy of each cell's burn duration so [`state_at`](Self::state_at)
/// can answer without the grid.
#[derive(Clone, Debug, PartialEq)]
pub struct IgniteField {
    times: Vec<IgniteTime>,
    durations: Vec<Option<f64>>,
    suppressed: FxHashSet<CellId>,
}

impl IgniteField {
    pub(crate) fn new(times: Vec<IgniteTime>, durations: Vec<Option<f64>>, suppressed: FxHashSet<CellId>) -> Self {
        debug_assert_eq!(times.len(), durations.len());
        Self { times, durations, suppressed }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Ignite time of `cell`; `Unreached` for unknown ids.
    #[inline]
    pub fn ignite_time(&self, cell: CellId) -> IgniteTime {
        self.times.get(cell.index()).copied().unwrap_or_default()
    }

    #[inline]
    pub fn times(&self) -> &[IgniteTime] {
        &self.times
    }

    /// Cells taken out of the run by suppression.
    #[inline]
    pub fn suppressed(&self) -> &FxHashSet<CellId> {
        &self.suppressed
    }

    /// Latest finite ignite time, i.e. when the last cell caught.
    pub fn last_ignition(&self) -> Option<f64> {
        self.times
            .iter()
            .filter_map(|t| t.minutes())
            .max_by(|a, b| a.total_cmp(b))
    }

    /// State of one cell at `t` minutes.
    pub fn cell_state_at(&self, cell: CellId, t: f64) -> CellState {
        let i = cell.index();
        match self.times.get(i).copied().unwrap_or_default() {
            IgniteTime::PreBurned => CellState::Burned,
            IgniteTime::Unreached => CellState::Unburned,
            IgniteTime::At(ignite) => match self.durations[i] {
                None => CellState::Unburned,
                Some(d) if t >= ignite + d => CellState::Burned,
                Some(_) if t >= ignite => CellState::Burning,
                Some(_) => CellState::Unburned,
            },
        }
    }

    /// Partition the grid at `t` minutes.  Pure: repeated calls with the same
    /// `t` return equal snapshots.
    pub fn state_at(&self, t: f64) -> StateSnapshot {
        let mut snap = StateSnapshot { time: t, ..StateSnapshot::default() };
        for i in 0..self.times.len() {
            let id = CellId(i as u32);
            match self.cell_state_at(id, t) {
                CellState::Burning => snap.burning.insert(id),
                CellState::Burned => snap.burned.insert(id),
                CellState::Unburned => snap.unburned.insert(id),
            };
        }
        snap
    }
}
