//! Line types.

use super::{LineCode, StopId};

/// Index of a line within a [`Network`](super::Network).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineId(pub(crate) u32);

impl LineId {
    /// Returns the arena index of this line.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// An ordered sequence of stops.
///
/// Adjacency is implicit: the stops at positions `i` and `i + 1` are
/// neighbours, in both directions.
///
/// # Invariants
///
/// - At least one stop
/// - The code is the line prefix of the first stop's code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    id: LineId,
    code: LineCode,
    stops: Vec<StopId>,
}

impl Line {
    pub(crate) fn new(id: LineId, code: LineCode, stops: Vec<StopId>) -> Self {
        debug_assert!(!stops.is_empty(), "a line has at least one stop");
        Self { id, code, stops }
    }

    pub fn id(&self) -> LineId {
        self.id
    }

    pub fn code(&self) -> &LineCode {
        &self.code
    }

    /// Returns the stops in travel order.
    pub fn stops(&self) -> &[StopId] {
        &self.stops
    }

    /// Returns the number of stops on the line.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Returns true if the line calls at `stop`.
    pub fn contains(&self, stop: StopId) -> bool {
        self.stops.contains(&stop)
    }

    /// Iterates over consecutive stop pairs, first to last.
    pub fn hops(&self) -> impl Iterator<Item = (StopId, StopId)> + '_ {
        self.stops.windows(2).map(|pair| (pair[0], pair[1]))
    }
}
