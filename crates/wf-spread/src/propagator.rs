//! Batch shortest-ignite-time propagation.
//!
//! Dijkstra over the neighbour graph with edge cost
//! `source.burn_duration / wind_multiplier(edge)`:
//!
//! - fireline cells start at `At(0)`,
//! - interior cells are `PreBurned`: settled up front, never relaxed and
//!   never relaxing outward,
//! - everything else starts `Unreached`.
//!
//! The heap holds `Reverse((OrdMinutes, CellId))`, so ties settle in id order.
//! Stale entries are skipped via the settled bitset.  Popped times are final
//! and non-decreasing.
//!
//! A run can be advanced in slices ([`Propagation::run_for`]) to bound the
//! work done per call; the final field is identical to a single
//! [`run_to_completion`](Propagation::run_to_completion).

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rustc_hash::FxHashSet;
use tracing::{debug, info};

use wf_core::{Anomaly, CellId, IgniteTime, IgnitionBoundary, OrdMinutes};
use wf_grid::{GridIndex, NeighborSource};

use crate::field::IgniteField;
use crate::ignition::classify_grid;
use crate::observer::PropagationObserver;
use crate::suppression::{EdgeVerdict, SuppressionMask};
use crate::wind::WindModel;

// ── IgnitePropagator ──────────────────────────────────────────────────────────

/// Read-only inputs shared by every batch run.
#[derive(Clone, Copy)]
pub struct IgnitePropagator<'a> {
    grid: &'a GridIndex,
    suppression: &'a SuppressionMask,
    wind: &'a WindModel,
}

impl<'a> IgnitePropagator<'a> {
    pub fn new(grid: &'a GridIndex, suppression: &'a SuppressionMask, wind: &'a WindModel) -> Self {
        Self { grid, suppression, wind }
    }

    /// Seed a run from `boundary`.  Nothing is relaxed until the returned
    /// [`Propagation`] is stepped.
    pub fn start<N, O>(&self, boundary: &IgnitionBoundary, neighbors: N, observer: &mut O) -> Propagation<'a, N>
    where
        N: NeighborSource,
        O: PropagationObserver + ?Sized,
    {
        let n = self.grid.len();
        let mut run = Propagation {
            grid: self.grid,
            suppression: self.suppression,
            wind: self.wind,
            neighbors,
            times: vec![IgniteTime::Unreached; n],
            settled: vec![false; n],
            heap: BinaryHeap::new(),
            suppressed: FxHashSet::default(),
            sinks: FxHashSet::default(),
            pops: 0,
        };

        let (set, anomaly) = classify_grid(self.grid, boundary);
        if let Some(a) = anomaly {
            observer.on_anomaly(a);
        }

        for &id in &set.interior {
            run.times[id.index()] = IgniteTime::PreBurned;
            run.settled[id.index()] = true;
        }
        for &id in &set.fireline {
            run.times[id.index()] = IgniteTime::At(0.0);
            run.heap.push(Reverse((OrdMinutes(0.0), id)));
        }

        debug!(fireline = set.fireline.len(), interior = set.interior.len(), "propagation seeded");
        run
    }

    /// Seed and run to completion in one call.
    pub fn run<N, O>(&self, boundary: &IgnitionBoundary, neighbors: N, observer: &mut O) -> IgniteField
    where
        N: NeighborSource,
        O: PropagationObserver + ?Sized,
    {
        self.start(boundary, neighbors, observer).run_to_completion(observer)
    }
}

// ── Propagation ───────────────────────────────────────────────────────────────

/// An in-progress batch run.
///
/// Owned by the caller; dropping it cancels the run.
pub struct Propagation<'a, N> {
    grid: &'a GridIndex,
    suppression: &'a SuppressionMask,
    wind: &'a WindModel,
    neighbors: N,

    times: Vec<IgniteTime>,
    settled: Vec<bool>,
    heap: BinaryHeap<Reverse<(OrdMinutes, CellId)>>,
    suppressed: FxHashSet<CellId>,
    /// Non-flammable cells already reported, so each is reported once.
    sinks: FxHashSet<CellId>,
    pops: usize,
}

impl<N: NeighborSource> Propagation<'_, N> {
    /// `true` once no unsettled cell remains reachable.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.heap.is_empty()
    }

    /// Heap pops so far, stale entries included.
    #[inline]
    pub fn pops(&self) -> usize {
        self.pops
    }

    /// Current tentative (or final, if settled) ignite time of `cell`.
    #[inline]
    pub fn ignite_time(&self, cell: CellId) -> IgniteTime {
        self.times.get(cell.index()).copied().unwrap_or_default()
    }

    /// Pop heap entries until one cell settles, then relax its neighbours.
    ///
    /// Returns the settled cell, or `None` when the run is complete.
    pub fn step<O: PropagationObserver + ?Sized>(&mut self, observer: &mut O) -> Option<CellId> {
        while let Some(Reverse((OrdMinutes(t), cell))) = self.heap.pop() {
            self.pops += 1;

            // Skip stale heap entries.
            if self.settled[cell.index()] {
                continue;
            }
            self.settled[cell.index()] = true;
            observer.on_settle(cell, t);
            self.relax_from(cell, t, observer);
            return Some(cell);
        }
        None
    }

    /// Settle at most `max_pops` cells.  Returns `true` if the run finished.
    pub fn run_for<O: PropagationObserver + ?Sized>(&mut self, max_pops: usize, observer: &mut O) -> bool {
        for _ in 0..max_pops {
            if self.step(observer).is_none() {
                return true;
            }
        }
        self.is_done()
    }

    /// Drain the heap and return the final field.
    pub fn run_to_completion<O: PropagationObserver + ?Sized>(mut self, observer: &mut O) -> IgniteField {
        while self.step(observer).is_some() {}
        self.into_field()
    }

    /// Freeze the current times into a field.  Call after the run is done;
    /// cells still on the heap keep their tentative times.
    pub fn into_field(self) -> IgniteField {
        let reached = self.times.iter().filter(|t| t.is_reached()).count();
        info!(
            cells = self.times.len(),
            reached,
            suppressed = self.suppressed.len(),
            pops = self.pops,
            "batch propagation finished"
        );
        let durations = self.grid.cells.iter().map(|c| c.burn_duration).collect();
        IgniteField::new(self.times, durations, self.suppressed)
    }

    fn relax_from<O: PropagationObserver + ?Sized>(&mut self, from: CellId, t: f64, observer: &mut O) {
        let grid = self.grid;
        let source = grid.cell(from);
        if !source.is_flammable() {
            // A non-flammable fireline cell: reached, but a sink.
            if self.sinks.insert(from) {
                observer.on_anomaly(Anomaly::NonFlammableCell(from));
            }
            return;
        }

        let set = self.neighbors.neighbors(from);
        if set.is_empty() {
            observer.on_anomaly(Anomaly::UnresolvableNeighbor(from));
            return;
        }

        for (_, to) in set.iter() {
            let i = to.index();
            // Already at or before `t` (e.g. another fireline cell): no edge
            // out of `from` can improve it.
            if self.settled[i] || self.suppressed.contains(&to) || self.times[i].as_f64() <= t {
                continue;
            }
            let target = grid.cell(to);
            if !target.is_flammable() {
                if self.sinks.insert(to) {
                    observer.on_anomaly(Anomaly::NonFlammableCell(to));
                }
                continue;
            }

            match self.suppression.edge_verdict(grid, from, to) {
                EdgeVerdict::Blocked => continue,
                EdgeVerdict::Suppressed => {
                    self.suppressed.insert(to);
                    observer.on_suppressed(to);
                    continue;
                }
                EdgeVerdict::Open => {}
            }

            let Some(edge) = self.wind.edge_duration(source, target) else {
                continue;
            };
            let candidate = t + edge;
            if candidate < self.times[i].as_f64() {
                self.times[i] = IgniteTime::At(candidate);
                observer.on_relax(from, to, candidate);
                self.heap.push(Reverse((OrdMinutes(candidate), to)));
            }
        }
    }
}
