//! Spread-subsystem error type.
//!
//! The engines themselves never fail; see [`wf_core::Anomaly`] for the
//! degraded conditions they report instead.  Errors only arise when a caller
//! hands in state that does not fit the grid.

use thiserror::Error;

use wf_core::CellId;
use wf_grid::GridError;

/// Errors produced by `wf-spread`.
#[derive(Debug, Error)]
pub enum SpreadError {
    #[error("{0} is not in the grid")]
    UnknownCell(CellId),

    #[error("{0} cannot burn: it has no burn duration")]
    NotFlammable(CellId),

    #[error("{0} is listed as both burning and burned")]
    ConflictingState(CellId),

    #[error(transparent)]
    Grid(#[from] GridError),
}

pub type SpreadResult<T> = Result<T, SpreadError>;
