//! Randomised cellular spread.
//!
//! A separate model from the deterministic engines: time advances in fixed
//! steps, every front cell burns out after one step, and each eligible
//! neighbour catches with probability
//!
//! ```text
//! chance = clamp((base_chance + sf · rate_weight) · (0.5 + (wind_mult − 1) · wind_weight),
//!                min_chance, max_chance)
//! ```
//!
//! where `sf` is the neighbour's spread rate relative to the fastest cell in
//! the grid.  All randomness comes from the injected `rand::Rng`; with a
//! seeded [`SimRng`](wf_core::SimRng) a run is reproducible.
//!
//! With a positive `spotting_radius_m`, fire can also jump to cells within
//! that radius that are not immediate neighbours.  A jump needs a clear path:
//! the segment between the two centres may not touch a suppressed cell, cross
//! a firebreak, leave the grid, or pass more than `max_gap_cells`
//! non-flammable cells in a row.  Its chance is
//!
//! ```text
//! chance = clamp((long_range_chance + (1 − d / radius) · distance_weight)
//!                · (0.5 + 0.5 · sf) · (0.5 + (wind_mult − 1) · wind_weight),
//!                long_range_min_chance, max_chance)
//! ```

use rand::Rng;
use rustc_hash::FxHashSet;
use tracing::debug;

use wf_core::{CellId, GeoPoint, IgnitionBoundary, StochasticConfig};
use wf_grid::{GridIndex, NeighborSource};

use crate::field::StateSnapshot;
use crate::ignition::classify_grid;
use crate::suppression::{EdgeVerdict, SuppressionMask};
use crate::wind::WindModel;

// ── StochasticState ───────────────────────────────────────────────────────────

/// State of a stochastic run.
#[derive(Clone, Debug, Default)]
pub struct StochasticState {
    /// Minutes since ignition.
    pub time: f64,
    /// Cells burning this step, in ascending id order.
    pub front: Vec<CellId>,
    pub burned: FxHashSet<CellId>,
    pub suppressed: FxHashSet<CellId>,
    pub steps: u64,
}

impl StochasticState {
    #[inline]
    pub fn is_active(&self) -> bool {
        !self.front.is_empty()
    }

    pub fn snapshot(&self, grid: &GridIndex) -> StateSnapshot {
        let burning: FxHashSet<CellId> = self.front.iter().copied().collect();
        let unburned = grid
            .ids()
            .filter(|id| !burning.contains(id) && !self.burned.contains(id))
            .collect();
        StateSnapshot { time: self.time, burning, burned: self.burned.clone(), unburned }
    }
}

// ── StochasticSpread ──────────────────────────────────────────────────────────

/// Drives a [`StochasticState`] over a grid.
pub struct StochasticSpread<'a, N> {
    grid: &'a GridIndex,
    neighbors: N,
    suppression: &'a SuppressionMask,
    wind: &'a WindModel,
    config: StochasticConfig,
    /// Shortest burn duration in the grid; the fastest cell has `sf = 1`.
    fastest: Option<f64>,
}

impl<'a, N: NeighborSource> StochasticSpread<'a, N> {
    pub fn new(
        grid: &'a GridIndex,
        neighbors: N,
        suppression: &'a SuppressionMask,
        wind: &'a WindModel,
        config: StochasticConfig,
    ) -> Self {
        let fastest = grid.min_burn_duration();
        Self { grid, neighbors, suppression, wind, config, fastest }
    }

    /// Seed a run: flammable fireline cells form the first front, interior
    /// cells are burned.
    pub fn ignite(&self, boundary: &IgnitionBoundary) -> StochasticState {
        let (set, _) = classify_grid(self.grid, boundary);
        StochasticState {
            front: set
                .fireline
                .into_iter()
                .filter(|&id| self.grid.cell(id).is_flammable())
                .collect(),
            burned: set.interior.into_iter().collect(),
            ..StochasticState::default()
        }
    }

    /// Spread rate of `to` relative to the fastest cell, in `[0, 1]`.
    fn rate_factor(&self, to: CellId) -> f64 {
        match (self.fastest, self.grid.cell(to).burn_duration) {
            (Some(fastest), Some(d)) => (fastest / d).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }

    fn wind_factor(&self, from: CellId, to: CellId) -> f64 {
        let wind = self.wind.edge_multiplier(self.grid.cell(from).center, self.grid.cell(to).center);
        0.5 + (wind - 1.0) * self.config.wind_weight
    }

    /// Spread probability from `from` into `to`.
    pub fn spread_chance(&self, from: CellId, to: CellId) -> f64 {
        let c = &self.config;
        let chance = (c.base_chance + self.rate_factor(to) * c.rate_weight) * self.wind_factor(from, to);
        bounded(chance, c.min_chance, c.max_chance)
    }

    /// Probability of a jump from `from` into `to`, `distance_m` apart.
    pub fn spot_chance(&self, from: CellId, to: CellId, distance_m: f64) -> f64 {
        let c = &self.config;
        let reach = if c.spotting_radius_m > 0.0 { (1.0 - distance_m / c.spotting_radius_m).max(0.0) } else { 0.0 };
        let chance = (c.long_range_chance + reach * c.distance_weight)
            * (0.5 + 0.5 * self.rate_factor(to))
            * self.wind_factor(from, to);
        bounded(chance, c.long_range_min_chance, c.max_chance)
    }

    /// Whether fire can jump along the segment between the centres of `from`
    /// and `to`.
    fn spot_path_open(&self, suppressed: &FxHashSet<CellId>, from: CellId, to: CellId, distance_m: f64) -> bool {
        if self.suppression.edge_verdict(self.grid, from, to) == EdgeVerdict::Blocked {
            return false;
        }
        let a = self.grid.cell(from);
        let b = self.grid.cell(to).center;

        // Half a cell per sample, so no cell on the path is skipped.
        let (north, east) = a.bounds.min.offset_m(a.bounds.max);
        let stride = north.abs().min(east.abs()) / 2.0;
        let samples = if stride > 0.0 { (distance_m / stride).ceil().max(1.0) as usize } else { 1 };

        let mut gap = 0usize;
        let mut last = from;
        for i in 0..samples {
            let t = (i as f64 + 0.5) / samples as f64;
            let p = GeoPoint::new(a.center.lat + t * (b.lat - a.center.lat), a.center.lng + t * (b.lng - a.center.lng));
            let Some(cell) = self.grid.locate(p) else {
                return false;
            };
            if cell == last {
                continue;
            }
            last = cell;
            if cell == from || cell == to {
                gap = 0;
                continue;
            }
            if suppressed.contains(&cell) || self.suppression.covers(self.grid, cell) {
                return false;
            }
            if self.grid.cell(cell).is_flammable() {
                gap = 0;
            } else {
                gap += 1;
                if gap > self.config.max_gap_cells {
                    return false;
                }
            }
        }
        true
    }

    /// Advance one step.  Returns how many cells caught.
    pub fn step<R: Rng + ?Sized>(&mut self, state: &mut StochasticState, rng: &mut R) -> usize {
        if state.front.is_empty() {
            return 0;
        }
        state.time += self.config.step_minutes;
        state.steps += 1;

        let front = std::mem::take(&mut state.front);
        let in_front: FxHashSet<CellId> = front.iter().copied().collect();
        state.burned.extend(front.iter().copied());

        let spotting = self.config.spotting_radius_m > 0.0;
        let mut caught: FxHashSet<CellId> = FxHashSet::default();
        for &from in &front {
            let adjacent = self.neighbors.neighbors(from);
            for (_, to) in adjacent.iter() {
                if !self.eligible(state, &in_front, &caught, to) {
                    continue;
                }
                match self.suppression.edge_verdict(self.grid, from, to) {
                    EdgeVerdict::Blocked => continue,
                    EdgeVerdict::Suppressed => {
                        state.suppressed.insert(to);
                        continue;
                    }
                    EdgeVerdict::Open => {}
                }
                if rng.gen_bool(self.spread_chance(from, to)) {
                    caught.insert(to);
                }
            }

            if !spotting {
                continue;
            }
            let mut far = self.grid.cells_within_radius_m(self.grid.cell(from).center, self.config.spotting_radius_m);
            far.sort_unstable_by_key(|&(id, _)| id);
            for (to, distance_m) in far {
                if to == from || adjacent.contains(to) || !self.eligible(state, &in_front, &caught, to) {
                    continue;
                }
                if self.suppression.covers(self.grid, to) {
                    state.suppressed.insert(to);
                    continue;
                }
                if !self.spot_path_open(&state.suppressed, from, to, distance_m) {
                    continue;
                }
                if rng.gen_bool(self.spot_chance(from, to, distance_m)) {
                    caught.insert(to);
                }
            }
        }

        let mut next: Vec<CellId> = caught.into_iter().collect();
        next.sort_unstable();
        let n = next.len();
        state.front = next;
        n
    }

    /// A cell that has not burned, is not already alight and can burn.
    fn eligible(
        &self,
        state: &StochasticState,
        in_front: &FxHashSet<CellId>,
        caught: &FxHashSet<CellId>,
        to: CellId,
    ) -> bool {
        !state.burned.contains(&to)
            && !in_front.contains(&to)
            && !caught.contains(&to)
            && !state.suppressed.contains(&to)
            && self.grid.cell(to).is_flammable()
    }

    /// Step until the front dies out or `max_steps` steps ran.  Returns the
    /// number of steps taken.
    pub fn run<R: Rng + ?Sized>(&mut self, state: &mut StochasticState, rng: &mut R, max_steps: usize) -> usize {
        let mut taken = 0;
        while taken < max_steps && state.is_active() {
            self.step(state, rng);
            taken += 1;
        }
        debug!(steps = taken, burned = state.burned.len(), time = state.time, "stochastic run finished");
        taken
    }
}

/// Clamp `chance` to `[min, max]` and then to a probability.  A non-finite
/// chance falls back to `min`.
fn bounded(chance: f64, min: f64, max: f64) -> f64 {
    if !chance.is_finite() {
        return min.clamp(0.0, 1.0);
    }
    chance.max(min).min(max).clamp(0.0, 1.0)
}
