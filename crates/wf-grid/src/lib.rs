//! `wf-grid` — cell lookup, spatial indexing, and neighbour discovery.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                       |
//! |---------------|----------------------------------------------------------------|
//! | [`index`]     | `GridIndex` (hash + R-tree), `GridIndexBuilder`                |
//! | [`neighbors`] | `Direction`, `NeighborSet`, `NeighborResolver`, `NeighborGraph`, `LazyNeighbors`, `NeighborSource` |
//! | [`error`]     | `GridError`, `GridResult<T>`                                   |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                      |
//! |------------|-------------------------------------------------------------|
//! | `parallel` | Builds `NeighborGraph` on Rayon's thread pool.              |

pub mod error;
pub mod index;
pub mod neighbors;

#[cfg(test)]
mod tests;

pub use error::{GridError, GridResult};
pub use index::{from_records, GridIndex, GridIndexBuilder};
pub use neighbors::{Direction, LazyNeighbors, NeighborGraph, NeighborResolver, NeighborSet, NeighborSource};
