//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `cell_states.csv`
//! - `step_summaries.csv`

use std::fs::{self, File};
use std::path::Path;

use csv::Writer;

use crate::writer::SnapshotWriter;
use crate::{CellStateRow, OutputResult, StepSummaryRow};

/// Writes snapshots to two CSV files.
pub struct CsvWriter {
    cells:     Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open both files and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        fs::create_dir_all(dir)?;

        let mut cells = Writer::from_path(dir.join("cell_states.csv"))?;
        cells.write_record(["step", "time_min", "cell_id", "lat", "lng", "state"])?;

        let mut summaries = Writer::from_path(dir.join("step_summaries.csv"))?;
        summaries.write_record([
            "step",
            "time_min",
            "burning",
            "burned",
            "unburned",
            "suppressed",
            "burned_area_m2",
        ])?;

        Ok(Self { cells, summaries, finished: false })
    }
}

impl SnapshotWriter for CsvWriter {
    fn write_cells(&mut self, rows: &[CellStateRow]) -> OutputResult<()> {
        for row in rows {
            self.cells.write_record(&[
                row.step.to_string(),
                format!("{:.3}", row.time_min),
                row.cell_id.to_string(),
                format!("{:.6}", row.lat),
                format!("{:.6}", row.lng),
                row.state.as_str().to_owned(),
            ])?;
        }
        Ok(())
    }

    fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.step.to_string(),
            format!("{:.3}", row.time_min),
            row.burning.to_string(),
            row.burned.to_string(),
            row.unburned.to_string(),
            row.suppressed.to_string(),
            format!("{:.1}", row.burned_area_m2),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.cells.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
