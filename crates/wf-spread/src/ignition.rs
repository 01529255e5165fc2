//! Classification of the whole grid against an ignition boundary.

use tracing::{debug, warn};

use wf_core::{Anomaly, CellId, Ignition, IgnitionBoundary};
use wf_grid::GridIndex;

/// Cells touched by an ignition boundary, in ascending `CellId` order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IgnitionSet {
    /// Cells the boundary passes through: they ignite at t = 0.
    pub fireline: Vec<CellId>,
    /// Cells enclosed by the boundary: consumed before the run starts.
    pub interior: Vec<CellId>,
}

impl IgnitionSet {
    pub fn is_empty(&self) -> bool {
        self.fireline.is_empty() && self.interior.is_empty()
    }
}

/// Classify every cell.
///
/// Returns the `InvalidBoundary` anomaly alongside an empty set when the
/// boundary has fewer than three vertices.
pub fn classify_grid(grid: &GridIndex, boundary: &IgnitionBoundary) -> (IgnitionSet, Option<Anomaly>) {
    if !boundary.is_valid() {
        let points = boundary.vertex_count();
        warn!(points, "ignition boundary too small; nothing ignites");
        return (IgnitionSet::default(), Some(Anomaly::InvalidBoundary { points }));
    }

    let mut set = IgnitionSet::default();
    for id in grid.ids() {
        match boundary.classify(grid.cell(id)) {
            Ignition::Fireline => set.fireline.push(id),
            Ignition::Interior => set.interior.push(id),
            Ignition::Outside => {}
        }
    }

    debug!(fireline = set.fireline.len(), interior = set.interior.len(), "boundary classified");
    (set, None)
}
