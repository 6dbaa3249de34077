//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Route, RouteStop, Station};

/// Request to find routes between two stations.
#[derive(Debug, Default, Deserialize)]
pub struct RoutesRequest {
    /// Source station name
    pub from: String,

    /// Destination station name
    pub to: String,

    /// Time of travel as `YYYY-MM-DDTHH:MM` in network local time
    /// (defaults to now)
    pub at: Option<String>,

    /// Ignore timings and cost every hop and change at one minute
    #[serde(default)]
    pub untimed: bool,
}

/// Response for a route search.
#[derive(Debug, Serialize)]
pub struct RoutesResponse {
    /// Source station name
    pub from: String,

    /// Destination station name
    pub to: String,

    /// Time of travel used, `None` for an untimed search
    pub at: Option<String>,

    /// Minimal-time routes, best first
    pub routes: Vec<RouteResult>,

    /// Number of stops finalised during search
    pub stops_visited: usize,
}

/// One route option.
#[derive(Debug, Serialize)]
pub struct RouteResult {
    /// Stops in travel order
    pub stops: Vec<RouteStopResult>,

    /// Total travel time in minutes
    pub time_taken_mins: u32,

    /// Distinct stations visited
    pub stations_travelled: usize,

    /// Number of line changes
    pub changes: usize,

    /// Human-readable steps
    pub steps: Vec<String>,
}

impl RouteResult {
    pub fn from_route(route: &Route) -> Self {
        Self {
            stops: route.stops().iter().map(RouteStopResult::from_stop).collect(),
            time_taken_mins: route.time_taken_mins(),
            stations_travelled: route.stations_travelled(),
            changes: route.change_count(),
            steps: route.describe(),
        }
    }
}

/// A stop along a route.
#[derive(Debug, Serialize)]
pub struct RouteStopResult {
    /// Stop code (e.g., "NS24")
    pub code: String,

    /// Line code (e.g., "NS")
    pub line: String,

    /// Station name
    pub station: String,
}

impl RouteStopResult {
    pub fn from_stop(stop: &RouteStop) -> Self {
        Self {
            code: stop.code.to_string(),
            line: stop.line.to_string(),
            station: stop.station_name.clone(),
        }
    }
}

/// Station search query.
#[derive(Debug, Default, Deserialize)]
pub struct StationSearchRequest {
    /// Search query
    pub q: String,

    /// Maximum results (default 10)
    pub limit: Option<usize>,
}

/// Station search result.
#[derive(Debug, Serialize)]
pub struct StationSearchResult {
    /// Station name
    pub name: String,

    /// Codes of the station's stops
    pub codes: Vec<String>,
}

impl StationSearchResult {
    pub fn new(station: &Station, codes: Vec<String>) -> Self {
        Self {
            name: station.name().to_string(),
            codes,
        }
    }
}

/// Response for station search.
#[derive(Debug, Serialize)]
pub struct StationSearchResponse {
    /// Matching stations
    pub stations: Vec<StationSearchResult>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
