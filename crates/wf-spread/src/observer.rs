//! Observer traits for progress reporting and data collection.
//!
//! All methods have default no-op implementations so implementors only need
//! to override what they care about.

use wf_core::{Anomaly, CellId};

use crate::state::FireState;

/// Callbacks from the batch [`Propagation`](crate::Propagation).
pub trait PropagationObserver {
    /// A cell's ignite time became final.  Called at most once per cell, in
    /// non-decreasing time order.
    fn on_settle(&mut self, _cell: CellId, _minutes: f64) {}

    /// A tentative ignite time for `to` was lowered to `minutes` by `from`.
    fn on_relax(&mut self, _from: CellId, _to: CellId, _minutes: f64) {}

    /// `cell` was covered by suppression and taken out of the run.
    fn on_suppressed(&mut self, _cell: CellId) {}

    fn on_anomaly(&mut self, _anomaly: Anomaly) {}
}

/// Callbacks from the incremental [`SpreadPredictor`](crate::SpreadPredictor).
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct Printer;
///
/// impl SpreadObserver for Printer {
///     fn on_ignite(&mut self, cell: CellId, at: f64) {
///         println!("{cell} ignites at {at:.1} min");
///     }
/// }
/// ```
pub trait SpreadObserver {
    /// `cell` started burning at `at` minutes.
    fn on_ignite(&mut self, _cell: CellId, _at: f64) {}

    /// `cell` finished burning at `at` minutes.
    fn on_burn_out(&mut self, _cell: CellId, _at: f64) {}

    /// `cell` was covered by suppression at `at` minutes.
    fn on_suppressed(&mut self, _cell: CellId, _at: f64) {}

    /// Called after every applied event with read-only access to the state,
    /// so writers can record a snapshot without the predictor knowing about
    /// any output format.
    fn on_step(&mut self, _state: &FireState) {}

    fn on_anomaly(&mut self, _anomaly: Anomaly) {}
}

/// An observer that does nothing.  Use when you need to call `advance` or
/// `run_to_completion` but don't want callbacks.
pub struct NoopObserver;

impl PropagationObserver for NoopObserver {}
impl SpreadObserver for NoopObserver {}
