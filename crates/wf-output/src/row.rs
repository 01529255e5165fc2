//! Plain data row types written by output backends.

use wf_spread::CellState;

/// State of one cell at one recorded step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellStateRow {
    pub step:     u64,
    /// Minutes since ignition.
    pub time_min: f64,
    pub cell_id:  u32,
    pub lat:      f64,
    pub lng:      f64,
    pub state:    CellState,
}

/// Counts for one recorded step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSummaryRow {
    pub step:           u64,
    pub time_min:       f64,
    pub burning:        u32,
    pub burned:         u32,
    pub unburned:       u32,
    pub suppressed:     u32,
    pub burned_area_m2: f64,
}
