//! Grid-subsystem error type.

use thiserror::Error;

use wf_core::{CellId, CellKey, WfError};

/// Errors produced by `wf-grid`.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("{second} has the same centre key as {first} ({key:?})")]
    DuplicateKey { key: CellKey, first: CellId, second: CellId },

    #[error("grid has {0} cells; at most u32::MAX - 1 are addressable")]
    TooManyCells(usize),

    #[error(transparent)]
    Core(#[from] WfError),
}

pub type GridResult<T> = Result<T, GridError>;
