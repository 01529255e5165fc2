//! Mutable state of an incremental run.
//!
//! # Time model
//!
//! All instants are absolute minutes since ignition.  A burning cell stores
//! the instant it burns out, so "remaining burn" is derived from the clock
//! rather than decremented per step, and splitting an advance into several
//! calls cannot accumulate rounding drift.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use wf_core::{Anomaly, CellId, IgnitionBoundary, OrdMinutes};
use wf_grid::GridIndex;

use crate::error::{SpreadError, SpreadResult};
use crate::field::StateSnapshot;
use crate::ignition::classify_grid;
use crate::observer::SpreadObserver;

/// One burning cell.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BurningCell {
    pub ignited_at: f64,
    pub burns_out_at: f64,
}

/// The next thing that happens on the frontier.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum FrontierEvent {
    BurnOut { cell: CellId, at: f64 },
    Ignite { cell: CellId, at: f64 },
}

impl FrontierEvent {
    #[inline]
    pub(crate) fn at(self) -> f64 {
        match self {
            FrontierEvent::BurnOut { at, .. } | FrontierEvent::Ignite { at, .. } => at,
        }
    }

    /// Total order: time, then burn-outs before ignitions, then lowest id.
    #[inline]
    fn key(self) -> (f64, u8, CellId) {
        match self {
            FrontierEvent::BurnOut { cell, at } => (at, 0, cell),
            FrontierEvent::Ignite { cell, at } => (at, 1, cell),
        }
    }

    fn precedes(self, other: FrontierEvent) -> bool {
        let (ta, ka, ia) = self.key();
        let (tb, kb, ib) = other.key();
        ta.total_cmp(&tb).then(ka.cmp(&kb)).then(ia.cmp(&ib)).is_lt()
    }
}

/// Candidate ignition instants of one not-yet-burning cell, one per burning
/// source that registered it, earliest first.
///
/// Keeping the sources lets the predictor re-check each edge against
/// suppression placed after the ignition was scheduled.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct PendingIgnition {
    sources: Vec<(f64, CellId)>,
}

impl PendingIgnition {
    /// Earliest scheduled instant.
    #[inline]
    pub(crate) fn at(&self) -> f64 {
        self.sources.first().map_or(f64::INFINITY, |&(at, _)| at)
    }

    pub(crate) fn offer(&mut self, at: f64, from: CellId) {
        let key = |&(t, id): &(f64, CellId)| (OrdMinutes(t), id);
        let pos = self.sources.partition_point(|e| key(e) < (OrdMinutes(at), from));
        self.sources.insert(pos, (at, from));
    }

    /// Drop the sources for which `keep` is false.  Returns how many were
    /// dropped.
    pub(crate) fn retain_sources(&mut self, mut keep: impl FnMut(CellId) -> bool) -> usize {
        let before = self.sources.len();
        self.sources.retain(|&(_, id)| keep(id));
        before - self.sources.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

// ── FireState ─────────────────────────────────────────────────────────────────

/// Burning, burned, pending and suppressed cells plus the elapsed clock.
///
/// `burning` and `burned` are disjoint; unburned is their complement.  The
/// state is created per boundary, mutated only by
/// [`SpreadPredictor`](crate::SpreadPredictor), and discarded by the caller.
#[derive(Clone, Debug, Default)]
pub struct FireState {
    pub(crate) clock: f64,
    pub(crate) burning: FxHashMap<CellId, BurningCell>,
    pub(crate) burned: FxHashSet<CellId>,
    /// Scheduled ignitions per not-yet-burning cell.  Entries outlive the
    /// cells that registered them.
    pub(crate) pending: FxHashMap<CellId, PendingIgnition>,
    pub(crate) suppressed: FxHashSet<CellId>,
    /// Burning cells whose neighbours have not been registered yet.
    pub(crate) unexpanded: Vec<CellId>,
    /// Non-flammable cells already reported.
    pub(crate) sinks: FxHashSet<CellId>,
    pub(crate) steps: u64,
    cell_count: usize,
}

impl FireState {
    /// Start a run: flammable fireline cells begin burning at t = 0 with their
    /// full burn duration, interior cells are burned immediately.
    ///
    /// Non-flammable fireline cells are reported and left unburned.
    pub fn ignite<O: SpreadObserver + ?Sized>(
        grid: &GridIndex,
        boundary: &IgnitionBoundary,
        observer: &mut O,
    ) -> FireState {
        let mut state = FireState { cell_count: grid.len(), ..FireState::default() };

        let (set, anomaly) = classify_grid(grid, boundary);
        if let Some(a) = anomaly {
            observer.on_anomaly(a);
        }

        state.burned.extend(set.interior.iter().copied());
        for &id in &set.fireline {
            match grid.cell(id).burn_duration {
                Some(d) => {
                    state.burning.insert(id, BurningCell { ignited_at: 0.0, burns_out_at: d });
                    state.unexpanded.push(id);
                    observer.on_ignite(id, 0.0);
                }
                None => {
                    state.sinks.insert(id);
                    observer.on_anomaly(Anomaly::NonFlammableCell(id));
                }
            }
        }

        debug!(burning = state.burning.len(), burned = state.burned.len(), "fire state ignited");
        state
    }

    /// Rebuild a state from externally stored sets.
    ///
    /// `burning` pairs each cell with its ignition instant.  Pending
    /// ignitions are re-derived from the burning cells on the next advance;
    /// ignitions already scheduled by cells that have since burned out are
    /// not restored.
    pub fn resume<B, D, S>(grid: &GridIndex, clock: f64, burning: B, burned: D, suppressed: S) -> SpreadResult<FireState>
    where
        B: IntoIterator<Item = (CellId, f64)>,
        D: IntoIterator<Item = CellId>,
        S: IntoIterator<Item = CellId>,
    {
        let known = |id: CellId| if grid.contains_id(id) { Ok(id) } else { Err(SpreadError::UnknownCell(id)) };

        let mut state = FireState { clock, cell_count: grid.len(), ..FireState::default() };

        for id in burned {
            state.burned.insert(known(id)?);
        }
        for id in suppressed {
            state.suppressed.insert(known(id)?);
        }

        let mut burning: Vec<(CellId, f64)> = burning.into_iter().collect();
        burning.sort_unstable_by_key(|&(id, _)| id);
        for (id, ignited_at) in burning {
            let d = grid
                .get(known(id)?)
                .and_then(|c| c.burn_duration)
                .ok_or(SpreadError::NotFlammable(id))?;
            if state.burned.contains(&id) {
                return Err(SpreadError::ConflictingState(id));
            }
            state.burning.insert(id, BurningCell { ignited_at, burns_out_at: ignited_at + d });
            state.unexpanded.push(id);
        }
        Ok(state)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Minutes elapsed since ignition.
    #[inline]
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Events applied so far over the lifetime of the run.
    #[inline]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    #[inline]
    pub fn is_burning(&self, cell: CellId) -> bool {
        self.burning.contains_key(&cell)
    }

    #[inline]
    pub fn is_burned(&self, cell: CellId) -> bool {
        self.burned.contains(&cell)
    }

    #[inline]
    pub fn is_suppressed(&self, cell: CellId) -> bool {
        self.suppressed.contains(&cell)
    }

    /// Minutes left until `cell` burns out; `None` unless it is burning.
    pub fn remaining_burn(&self, cell: CellId) -> Option<f64> {
        self.burning.get(&cell).map(|b| (b.burns_out_at - self.clock).max(0.0))
    }

    pub fn burning_cell(&self, cell: CellId) -> Option<BurningCell> {
        self.burning.get(&cell).copied()
    }

    /// Scheduled ignition instant of a cell not yet burning.
    pub fn pending_ignition(&self, cell: CellId) -> Option<f64> {
        self.pending.get(&cell).map(PendingIgnition::at)
    }

    pub fn burning_count(&self) -> usize {
        self.burning.len()
    }

    pub fn burned_count(&self) -> usize {
        self.burned.len()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn suppressed_cells(&self) -> &FxHashSet<CellId> {
        &self.suppressed
    }

    /// `true` while anything is burning or scheduled to ignite.
    pub fn is_active(&self) -> bool {
        !self.burning.is_empty() || !self.pending.is_empty() || !self.unexpanded.is_empty()
    }

    /// Partition the grid at the current clock.
    pub fn snapshot(&self, grid: &GridIndex) -> StateSnapshot {
        let mut snap = StateSnapshot {
            time: self.clock,
            burning: self.burning.keys().copied().collect(),
            burned: self.burned.clone(),
            ..StateSnapshot::default()
        };
        snap.unburned = grid
            .ids()
            .filter(|id| !snap.burning.contains(id) && !snap.burned.contains(id))
            .collect();
        snap
    }

    /// Number of cells in the grid this state was built for.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    // ── Frontier ──────────────────────────────────────────────────────────

    /// Earliest event by linear scan over burning cells and pending ignitions.
    pub(crate) fn next_event(&self) -> Option<FrontierEvent> {
        let burn_outs = self
            .burning
            .iter()
            .map(|(&cell, b)| FrontierEvent::BurnOut { cell, at: b.burns_out_at });
        let ignitions = self
            .pending
            .iter()
            .map(|(&cell, p)| FrontierEvent::Ignite { cell, at: p.at() });

        burn_outs
            .chain(ignitions)
            .reduce(|best, e| if e.precedes(best) { e } else { best })
    }

    /// Earliest pending ignition, ignoring burn-outs.
    pub(crate) fn next_ignition(&self) -> Option<(CellId, f64)> {
        self.pending
            .iter()
            .map(|(&cell, p)| (cell, p.at()))
            .reduce(|best, e| {
                if e.1.total_cmp(&best.1).then(e.0.cmp(&best.0)).is_lt() { e } else { best }
            })
    }
}
