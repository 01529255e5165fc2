//! `wf-core` — foundational types for the `rust_wildfire` spread engine.
//!
//! This crate is a dependency of every other `wf-*` crate.  It intentionally
//! has no `wf-*` dependencies and minimal external ones (`rand`, `serde` and
//! `thiserror`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                |
//! |-----------------|---------------------------------------------------------|
//! | [`ids`]         | `CellId`                                                |
//! | [`geo`]         | `GeoPoint`, `Bounds`, haversine and local-metre offsets |
//! | [`geometry`]    | segment intersection, point-in-polygon, clipping        |
//! | [`cell`]        | `Cell`, `CellRecord`, `CellKey`                         |
//! | [`boundary`]    | `IgnitionBoundary`, `Ignition`                          |
//! | [`wind`]        | `WindVector`                                            |
//! | [`time`]        | `IgniteTime`, `OrdMinutes`                              |
//! | [`config`]      | `SpreadConfig` and its sections                         |
//! | [`rng`]         | `SimRng`                                                |
//! | [`error`]       | `WfError`, `WfResult`, `Anomaly`                        |

pub mod boundary;
pub mod cell;
pub mod config;
pub mod error;
pub mod geo;
pub mod geometry;
pub mod ids;
pub mod rng;
pub mod time;
pub mod wind;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use boundary::{Ignition, IgnitionBoundary};
pub use cell::{Cell, CellKey, CellRecord};
pub use config::{NeighborConfig, SpreadConfig, StochasticConfig, WindConfig};
pub use error::{Anomaly, WfError, WfResult};
pub use geo::{Bounds, GeoPoint};
pub use ids::CellId;
pub use rng::SimRng;
pub use time::{IgniteTime, OrdMinutes};
pub use wind::WindVector;
