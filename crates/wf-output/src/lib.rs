//! `wf-output` — snapshot writers for the rust_wildfire spread engine.
//!
//! | Writer        | Files created                              |
//! |---------------|--------------------------------------------|
//! | [`CsvWriter`] | `cell_states.csv`, `step_summaries.csv`    |
//!
//! Writers implement [`SnapshotWriter`] and are driven either by
//! [`SnapshotObserver`], which implements `wf_spread::SpreadObserver`, or
//! directly from batch snapshots via [`SnapshotObserver::record`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use wf_output::{CsvWriter, SnapshotObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output")).unwrap();
//! let mut obs = SnapshotObserver::new(&grid, writer).every(5);
//! predictor.advance(&mut state, 60.0, &mut obs);
//! obs.finish();
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SnapshotObserver;
pub use row::{CellStateRow, StepSummaryRow};
pub use writer::SnapshotWriter;
