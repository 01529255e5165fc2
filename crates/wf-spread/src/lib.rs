//! `wf-spread` — fire-spread engines.
//!
//! Two deterministic engines consume the same inputs and agree on the
//! result.  The inputs are a `GridIndex`, a neighbour source, an ignition
//! boundary, suppression features and wind.
//!
//! - [`IgnitePropagator`] computes every cell's earliest ignite time in one
//!   Dijkstra pass; [`IgniteField::state_at`] then answers "what is burning
//!   at time T" for any T.
//! - [`SpreadPredictor`] advances a [`FireState`] by a time budget, one
//!   frontier event at a time, for progressive display.
//!
//! [`StochasticSpread`] is an independent randomised cellular model.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                    |
//! |-----------------|-------------------------------------------------------------|
//! | [`suppression`] | `SuppressionFeature`, `SuppressionMask`, `EdgeVerdict`      |
//! | [`wind`]        | `WindModel`                                                 |
//! | [`ignition`]    | `IgnitionSet`, `classify_grid`                              |
//! | [`propagator`]  | `IgnitePropagator`, `Propagation` (batch)                   |
//! | [`field`]       | `IgniteField`, `StateSnapshot`, `CellState`                 |
//! | [`state`]       | `FireState`, `BurningCell`                                  |
//! | [`predictor`]   | `SpreadPredictor`, `AdvanceReport`, `StepStatus`, `OvershootPolicy` |
//! | [`stochastic`]  | `StochasticSpread`, `StochasticState`                       |
//! | [`observer`]    | `PropagationObserver`, `SpreadObserver`, `NoopObserver`     |
//! | [`error`]       | `SpreadError`, `SpreadResult<T>`                            |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                      |
//! |------------|-------------------------------------------------------------|
//! | `parallel` | Forwards to `wf-grid/parallel`.                             |

pub mod error;
pub mod field;
pub mod ignition;
pub mod observer;
pub mod predictor;
pub mod propagator;
pub mod state;
pub mod stochastic;
pub mod suppression;
pub mod wind;


pub use error::{SpreadError, SpreadResult};
pub use field::{CellState, IgniteField, StateSnapshot};
pub use ignition::{classify_grid, IgnitionSet};
pub use observer::{NoopObserver, PropagationObserver, SpreadObserver};
pub use predictor::{AdvanceReport, OvershootPolicy, SpreadPredictor, StepStatus, StopReason};
pub use propagator::{IgnitePropagator, Propagation};
pub use state::{BurningCell, FireState};
pub use stochastic::{StochasticSpread, StochasticState};
pub use suppression::{EdgeVerdict, SuppressionFeature, SuppressionMask};
pub use wind::WindModel;
