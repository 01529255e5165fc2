//! The `SnapshotWriter` trait implemented by backend writers.

use crate::{CellStateRow, OutputResult, StepSummaryRow};

/// Sink for cell-state rows and step summaries.
///
/// Errors are returned here; [`SnapshotObserver`](crate::SnapshotObserver)
/// stores them because observer callbacks have no return value.
pub trait SnapshotWriter {
    /// Write a batch of cell states.
    fn write_cells(&mut self, rows: &[CellStateRow]) -> OutputResult<()>;

    /// Write one step summary row.
    fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.  Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
