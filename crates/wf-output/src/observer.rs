//! `SnapshotObserver<W>` — bridges `SpreadObserver` to a `SnapshotWriter`.

use wf_core::CellId;
use wf_grid::GridIndex;
use wf_spread::{CellState, FireState, SpreadObserver, StateSnapshot};

use crate::row::{CellStateRow, StepSummaryRow};
use crate::writer::SnapshotWriter;
use crate::{OutputError, OutputResult};

/// A [`SpreadObserver`] that writes cell states and step summaries to any
/// [`SnapshotWriter`] backend.
///
/// Every `interval`-th step is recorded.  Write errors are stored because
/// observer callbacks have no return value; check them with
/// [`take_error`][Self::take_error] after the run.
pub struct SnapshotObserver<'g, W: SnapshotWriter> {
    grid:       &'g GridIndex,
    writer:     W,
    interval:   u64,
    recorded:   u64,
    last_error: Option<OutputError>,
}

impl<'g, W: SnapshotWriter> SnapshotObserver<'g, W> {
    /// Record every step.
    pub fn new(grid: &'g GridIndex, writer: W) -> Self {
        Self { grid, writer, interval: 1, recorded: 0, last_error: None }
    }

    /// Record only steps that are a multiple of `interval` (minimum 1).
    pub fn every(mut self, interval: u64) -> Self {
        self.interval = interval.max(1);
        self
    }

    /// Number of steps written so far.
    pub fn recorded(&self) -> u64 {
        self.recorded
    }

    /// Take the stored write error (if any).  Only the first is kept.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Flush the writer.  Call once the run is over.
    pub fn finish(&mut self) {
        let result = self.writer.finish();
        self.store_err(result);
    }

    /// Record the current state of an incremental run regardless of the
    /// interval, e.g. the state right after ignition.
    pub fn record_state(&mut self, state: &FireState) {
        let snapshot = state.snapshot(self.grid);
        let suppressed = state.suppressed_cells().len();
        self.record(state.steps(), &snapshot, suppressed);
    }

    /// Record a snapshot, typically one from `IgniteField::state_at`.
    pub fn record(&mut self, step: u64, snapshot: &StateSnapshot, suppressed: usize) {
        let result = self.write(step, snapshot, suppressed);
        self.store_err(result);
        self.recorded += 1;
    }

    fn write(&mut self, step: u64, snapshot: &StateSnapshot, suppressed: usize) -> OutputResult<()> {
        let rows: Vec<CellStateRow> = self
            .grid
            .ids()
            .map(|id: CellId| {
                let cell = self.grid.cell(id);
                CellStateRow {
                    step,
                    time_min: snapshot.time,
                    cell_id:  id.0,
                    lat:      cell.center.lat,
                    lng:      cell.center.lng,
                    state:    snapshot.state(id),
                }
            })
            .collect();
        if !rows.is_empty() {
            self.writer.write_cells(&rows)?;
        }

        let count = |s: CellState| rows.iter().filter(|r| r.state == s).count() as u32;
        self.writer.write_step_summary(&StepSummaryRow {
            step,
            time_min:       snapshot.time,
            burning:        count(CellState::Burning),
            burned:         count(CellState::Burned),
            unburned:       count(CellState::Unburned),
            suppressed:     suppressed as u32,
            burned_area_m2: snapshot.burned_area_m2(self.grid),
        })
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: SnapshotWriter> SpreadObserver for SnapshotObserver<'_, W> {
    fn on_step(&mut self, state: &FireState) {
        if state.steps() % self.interval == 0 {
            self.record_state(state);
        }
    }
}
