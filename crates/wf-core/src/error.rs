//! Engine error type and the non-fatal anomaly taxonomy.
//!
//! Construction-time problems (a malformed cell record, an out-of-range
//! config value) are real errors and surface as `WfError`.  Everything that
//! can go wrong *during* propagation is an [`Anomaly`]: the affected region
//! simply stops burning and observers are told why.

use std::fmt;

use thiserror::Error;

use crate::CellId;

/// The top-level error type for `wf-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum WfError {
    #[error("invalid cell record #{index}: {reason}")]
    InvalidCell { index: usize, reason: String },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `wf-*` crates.
pub type WfResult<T> = Result<T, WfError>;

// ── Anomaly ───────────────────────────────────────────────────────────────────

/// A degraded-but-valid condition met while propagating fire.
///
/// None of these abort a run.  They are reported through the observer hooks
/// of `wf-spread` and logged at `debug`/`warn` level.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Anomaly {
    /// The ignition boundary has fewer than 3 points; nothing ignites.
    InvalidBoundary { points: usize },

    /// A cell with no positive burn duration was reached.  It acts as a sink:
    /// it may sit on the fireline but never propagates.
    NonFlammableCell(CellId),

    /// A burning cell has no discoverable neighbours; its branch ends.
    UnresolvableNeighbor(CellId),

    /// The time budget ran out before the next frontier event.
    BudgetExhausted { pending_delay: f64 },
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anomaly::InvalidBoundary { points } => {
                write!(f, "ignition boundary has {points} point(s); need at least 3")
            }
            Anomaly::NonFlammableCell(id) => write!(f, "{id} is not flammable"),
            Anomaly::UnresolvableNeighbor(id) => write!(f, "{id} has no neighbours"),
            Anomaly::BudgetExhausted { pending_delay } => {
                write!(f, "budget exhausted; next event {pending_delay:.2} min away")
            }
        }
    }
}
