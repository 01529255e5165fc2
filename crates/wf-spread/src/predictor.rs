//! Incremental, budgeted frontier expansion.
//!
//! Each call to [`SpreadPredictor::advance`] spends a time budget by applying
//! frontier events one at a time, earliest first:
//!
//! - an **ignition** marks a pending cell burning and registers its
//!   neighbours at `now + burn_duration / wind_multiplier(edge)`,
//! - a **burn-out** moves a burning cell to burned.
//!
//! The earliest event is found by a linear scan of the frontier; there is no
//! global priority queue.  Ties go to burn-outs, then to the lowest `CellId`.
//! Events due exactly at the horizon are applied even once the budget has
//! reached zero, so simultaneous ignitions are all visible.
//!
//! When the next event lies beyond the budget, [`OvershootPolicy`] decides:
//! `Defer` spends the remaining budget and stops, which makes the state at
//! horizon `T` equal to the batch field's `state_at(T)`; `IgniteFastest`
//! spends it and ignites the earliest pending cell anyway.
//!
//! Suppression is checked twice: when an ignition is scheduled and again
//! when it falls due.  A water drop or firebreak placed through
//! [`SpreadPredictor::suppression_mut`] between advances therefore also
//! cancels ignitions that were already scheduled.

use tracing::debug;

use wf_core::{Anomaly, CellId};
use wf_grid::{GridIndex, NeighborSource};

use crate::observer::SpreadObserver;
use crate::state::{BurningCell, FireState, FrontierEvent};
use crate::suppression::{EdgeVerdict, SuppressionMask};
use crate::wind::WindModel;

/// Slack when comparing event instants with the horizon, in minutes.
const TIME_EPS: f64 = 1e-9;

// ── Reports ───────────────────────────────────────────────────────────────────

/// What to do when the next event lies beyond the remaining budget.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum OvershootPolicy {
    /// Spend the remaining budget and stop.
    #[default]
    Defer,
    /// Spend the remaining budget, then ignite the earliest pending cell
    /// early so every call makes visible progress.
    IgniteFastest,
}

/// Why an advance stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The next event lies beyond the budget.
    BudgetExhausted,
    /// Nothing is burning or pending.
    FrontierExhausted,
    /// `max_steps` events were applied and another is due within the
    /// budget, or a forced `IgniteFastest` ignition is waiting.
    StepLimit,
}

/// Outcome of one advance.
///
/// `consumed + remaining_budget` equals the requested budget.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AdvanceReport {
    pub consumed: f64,
    pub remaining_budget: f64,
    pub steps: usize,
    pub stop: StopReason,
}

/// Outcome of [`SpreadPredictor::run_steps`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum StepStatus {
    /// The step limit was hit; call again with `remaining_budget`.
    Yielded(AdvanceReport),
    /// The budget or the frontier is exhausted.
    Finished(AdvanceReport),
}

impl StepStatus {
    pub fn report(&self) -> &AdvanceReport {
        match self {
            StepStatus::Yielded(r) | StepStatus::Finished(r) => r,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, StepStatus::Finished(_))
    }
}

// ── SpreadPredictor ───────────────────────────────────────────────────────────

/// Advances a [`FireState`] through simulated time.
///
/// Owns its neighbour source (typically [`LazyNeighbors`](wf_grid::LazyNeighbors)),
/// its suppression features and its wind model, so the host can change
/// suppression or wind between advances.
pub struct SpreadPredictor<'g, N> {
    grid: &'g GridIndex,
    neighbors: N,
    suppression: SuppressionMask,
    wind: WindModel,
    policy: OvershootPolicy,
}

impl<'g, N: NeighborSource> SpreadPredictor<'g, N> {
    pub fn new(grid: &'g GridIndex, neighbors: N) -> Self {
        Self {
            grid,
            neighbors,
            suppression: SuppressionMask::default(),
            wind: WindModel::calm(),
            policy: OvershootPolicy::default(),
        }
    }

    pub fn with_suppression(mut self, suppression: SuppressionMask) -> Self {
        self.suppression = suppression;
        self
    }

    pub fn with_wind(mut self, wind: WindModel) -> Self {
        self.wind = wind;
        self
    }

    pub fn with_policy(mut self, policy: OvershootPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[inline]
    pub fn grid(&self) -> &'g GridIndex {
        self.grid
    }

    pub fn suppression(&self) -> &SuppressionMask {
        &self.suppression
    }

    /// Features placed here apply from now on, including to ignitions that
    /// are already scheduled.
    pub fn suppression_mut(&mut self) -> &mut SuppressionMask {
        &mut self.suppression
    }

    pub fn wind(&self) -> &WindModel {
        &self.wind
    }

    /// A new wind applies to edges registered from now on.
    pub fn wind_mut(&mut self) -> &mut WindModel {
        &mut self.wind
    }

    /// Spend up to `budget` minutes.
    pub fn advance<O>(&mut self, state: &mut FireState, budget: f64, observer: &mut O) -> AdvanceReport
    where
        O: SpreadObserver + ?Sized,
    {
        self.run(state, budget, usize::MAX, observer)
    }

    /// Spend up to `budget` minutes but apply at most `max_steps` events.
    ///
    /// On `Yielded`, call again with the report's `remaining_budget` to
    /// continue toward the same horizon.
    pub fn run_steps<O>(&mut self, state: &mut FireState, budget: f64, max_steps: usize, observer: &mut O) -> StepStatus
    where
        O: SpreadObserver + ?Sized,
    {
        let report = self.run(state, budget, max_steps, observer);
        match report.stop {
            StopReason::StepLimit => StepStatus::Yielded(report),
            _ => StepStatus::Finished(report),
        }
    }

    fn run<O>(&mut self, state: &mut FireState, budget: f64, max_steps: usize, observer: &mut O) -> AdvanceReport
    where
        O: SpreadObserver + ?Sized,
    {
        let budget = if budget.is_nan() { 0.0 } else { budget.max(0.0) };
        let start = state.clock;
        let horizon = start + budget;
        let mut steps = 0usize;

        let stop = loop {
            self.expand(state, observer);

            let Some(event) = state.next_event() else {
                break StopReason::FrontierExhausted;
            };

            if event.at() > horizon + TIME_EPS {
                let forcing = self.policy == OvershootPolicy::IgniteFastest && !state.pending.is_empty();
                if forcing && steps >= max_steps {
                    // The forced ignition is a step of its own; leave the
                    // budget for the next call.
                    break StopReason::StepLimit;
                }
                state.clock = state.clock.max(horizon);
                observer.on_anomaly(Anomaly::BudgetExhausted { pending_delay: event.at() - state.clock });

                if forcing {
                    if let Some(cell) = self.fastest_open_ignition(state, observer) {
                        let now = state.clock;
                        self.ignite(state, cell, now, observer);
                        steps += 1;
                        state.steps += 1;
                        observer.on_step(state);
                        // Register its neighbours before the caller looks.
                        self.expand(state, observer);
                    }
                }
                break StopReason::BudgetExhausted;
            }

            if steps >= max_steps {
                break StopReason::StepLimit;
            }

            if let FrontierEvent::Ignite { cell, .. } = event {
                if !self.recheck_pending(state, cell, observer) {
                    continue;
                }
            }

            state.clock = state.clock.max(event.at().min(horizon));
            match event {
                FrontierEvent::BurnOut { cell, at } => {
                    state.burning.remove(&cell);
                    state.burned.insert(cell);
                    observer.on_burn_out(cell, at);
                }
                FrontierEvent::Ignite { cell, at } => self.ignite(state, cell, at, observer),
            }
            steps += 1;
            state.steps += 1;
            observer.on_step(state);
        };

        let consumed = (state.clock - start).clamp(0.0, budget);
        let report = AdvanceReport { consumed, remaining_budget: budget - consumed, steps, stop };
        debug!(
            clock = state.clock,
            consumed,
            steps,
            burning = state.burning.len(),
            burned = state.burned.len(),
            pending = state.pending.len(),
            ?stop,
            "advance finished"
        );
        report
    }

    /// Move `cell` from pending to burning at instant `at`.
    fn ignite<O>(&self, state: &mut FireState, cell: CellId, at: f64, observer: &mut O)
    where
        O: SpreadObserver + ?Sized,
    {
        state.pending.remove(&cell);
        if state.burning.contains_key(&cell) || state.burned.contains(&cell) {
            return;
        }
        let Some(d) = self.grid.get(cell).and_then(|c| c.burn_duration) else {
            return;
        };
        state.burning.insert(cell, BurningCell { ignited_at: at, burns_out_at: at + d });
        state.unexpanded.push(cell);
        observer.on_ignite(cell, at);
    }

    /// Re-check a due ignition against the current suppression features,
    /// which may have changed since it was scheduled.
    ///
    /// A covered cell is suppressed and its ignition cancelled.  Sources
    /// whose edge now crosses a firebreak are dropped.  Returns `true` only
    /// if the ignition still stands at its scheduled instant.
    fn recheck_pending<O>(&self, state: &mut FireState, cell: CellId, observer: &mut O) -> bool
    where
        O: SpreadObserver + ?Sized,
    {
        if self.suppression.is_empty() {
            return true;
        }
        let grid = self.grid;
        if self.suppression.covers(grid, cell) {
            state.pending.remove(&cell);
            if state.suppressed.insert(cell) {
                observer.on_suppressed(cell, state.clock);
            }
            return false;
        }

        let Some(pending) = state.pending.get_mut(&cell) else {
            return false;
        };
        let suppression = &self.suppression;
        let dropped =
            pending.retain_sources(|from| suppression.edge_verdict(grid, from, cell) != EdgeVerdict::Blocked);
        if pending.is_empty() {
            state.pending.remove(&cell);
        }
        dropped == 0
    }

    /// Earliest pending ignition that survives [`recheck_pending`](Self::recheck_pending).
    fn fastest_open_ignition<O>(&self, state: &mut FireState, observer: &mut O) -> Option<CellId>
    where
        O: SpreadObserver + ?Sized,
    {
        while let Some((cell, _)) = state.next_ignition() {
            if self.recheck_pending(state, cell, observer) {
                return Some(cell);
            }
        }
        None
    }

    /// Register pending ignitions for every newly burning cell.
    fn expand<O>(&mut self, state: &mut FireState, observer: &mut O)
    where
        O: SpreadObserver + ?Sized,
    {
        let grid = self.grid;
        while let Some(from) = state.unexpanded.pop() {
            let Some(burning) = state.burning.get(&from).copied() else {
                continue;
            };
            let source = grid.cell(from);

            let set = self.neighbors.neighbors(from);
            if set.is_empty() {
                observer.on_anomaly(Anomaly::UnresolvableNeighbor(from));
                continue;
            }

            for (_, to) in set.iter() {
                if state.burning.contains_key(&to) || state.burned.contains(&to) || state.suppressed.contains(&to) {
                    continue;
                }
                let target = grid.cell(to);
                if !target.is_flammable() {
                    if state.sinks.insert(to) {
                        observer.on_anomaly(Anomaly::NonFlammableCell(to));
                    }
                    continue;
                }

                match self.suppression.edge_verdict(grid, from, to) {
                    EdgeVerdict::Blocked => continue,
                    EdgeVerdict::Suppressed => {
                        state.suppressed.insert(to);
                        state.pending.remove(&to);
                        observer.on_suppressed(to, state.clock);
                        continue;
                    }
                    EdgeVerdict::Open => {}
                }

                let Some(edge) = self.wind.edge_duration(source, target) else {
                    continue;
                };
                let at = (burning.ignited_at + edge).max(state.clock);
                state.pending.entry(to).or_default().offer(at, from);
            }
        }
    }
}
