//! Station types.

use std::fmt;

/// Index of a station within a [`Network`](super::Network).
///
/// Stations are compared by identity, so two stations that happened to share
/// a name in different networks are still distinct values here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StationId(pub(crate) u32);

impl StationId {
    /// Returns the arena index of this station.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A named place served by one or more lines.
///
/// A station owns nothing: the stops that call at it point back to it by
/// [`StationId`]. Interchanges are stations with stops on several lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    id: StationId,
    name: String,
}

impl Station {
    pub(crate) fn new(id: StationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Returns the station's identity within its network.
    pub fn id(&self) -> StationId {
        self.id
    }

    /// Returns the station name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
