//! Cell identifier.
//!
//! A `CellId` is the position of a cell in the grid's cell array, assigned in
//! insertion order by the grid builder.  It doubles as the heap tie-breaker,
//! so every "lowest id wins" rule in the engines is an ordering on this type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Index of a cell in the grid's cell array.  Max ~4.3 billion cells.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellId(pub u32);

impl CellId {
    /// Sentinel for "no cell".
    pub const INVALID: CellId = CellId(u32::MAX);

    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl Default for CellId {
    #[inline(always)]
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cell#{}", self.0)
    }
}

impl From<CellId> for usize {
    #[inline(always)]
    fn from(id: CellId) -> usize {
        id.index()
    }
}

impl TryFrom<usize> for CellId {
    type Error = std::num::TryFromIntError;

    fn try_from(n: usize) -> Result<CellId, Self::Error> {
        u32::try_from(n).map(CellId)
    }
}
