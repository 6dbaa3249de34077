//! Route types.
//!
//! A `Route` is one minimal-time way of travelling between two stations: the
//! stops visited in order, plus the total time. Routes are self-contained so
//! they can be formatted without the network they came from.

use std::collections::HashSet;
use std::fmt;

use chrono::Duration;

use super::{LineCode, Network, StationId, StopCode, StopId};

/// A stop as it appears in a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteStop {
    pub id: StopId,
    pub code: StopCode,
    pub line: LineCode,
    pub station: StationId,
    pub station_name: String,
}

impl RouteStop {
    /// Resolve a stop of `network` into a route stop.
    pub fn from_network(network: &Network, id: StopId) -> Self {
        let stop = network.stop(id);
        Self {
            id,
            code: stop.code().clone(),
            line: stop.code().line_code(),
            station: stop.station(),
            station_name: network.station(stop.station()).name().to_string(),
        }
    }
}

/// An ordered stop sequence with its total travel time.
///
/// # Invariants
///
/// - Routes produced by the planner have at least one stop
/// - Consecutive stops are either neighbours on a line or two stops of the
///   same station (a change of line)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    stops: Vec<RouteStop>,
    time_taken_mins: u32,
}

impl Route {
    /// Constructs a route from pre-validated stops.
    pub(crate) fn new(stops: Vec<RouteStop>, time_taken_mins: u32) -> Self {
        Self {
            stops,
            time_taken_mins,
        }
    }

    /// Build a route from stop ids of `network`.
    pub(crate) fn from_stop_ids(network: &Network, stops: &[StopId], time_taken_mins: u32) -> Self {
        let stops = stops
            .iter()
            .map(|id| RouteStop::from_network(network, *id))
            .collect();
        Self::new(stops, time_taken_mins)
    }

    pub fn stops(&self) -> &[RouteStop] {
        &self.stops
    }

    /// Returns the stop ids in travel order.
    pub fn stop_ids(&self) -> Vec<StopId> {
        self.stops.iter().map(|s| s.id).collect()
    }

    /// Returns the stop codes in travel order.
    pub fn stop_codes(&self) -> Vec<&str> {
        self.stops.iter().map(|s| s.code.as_str()).collect()
    }

    /// Total travel time in minutes.
    pub fn time_taken_mins(&self) -> u32 {
        self.time_taken_mins
    }

    /// Total travel time.
    pub fn duration(&self) -> Duration {
        Duration::minutes(i64::from(self.time_taken_mins))
    }

    /// Number of distinct stations visited, origin and destination included.
    pub fn stations_travelled(&self) -> usize {
        self.stops
            .iter()
            .map(|s| s.station)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Number of line changes along the route.
    pub fn change_count(&self) -> usize {
        self.stops
            .windows(2)
            .filter(|pair| pair[0].station == pair[1].station)
            .count()
    }

    /// Returns the first stop, if any.
    pub fn origin(&self) -> Option<&RouteStop> {
        self.stops.first()
    }

    /// Returns the last stop, if any.
    pub fn destination(&self) -> Option<&RouteStop> {
        self.stops.last()
    }

    /// Describe the route one step at a time.
    ///
    /// Each consecutive pair of stops becomes either a ride ("Take NS line
    /// from Bishan to Braddell") or a change of line at one station.
    pub fn describe(&self) -> Vec<String> {
        self.stops
            .windows(2)
            .map(|pair| {
                let (from, to) = (&pair[0], &pair[1]);
                if from.station == to.station {
                    format!("Change from {} line to {} line", from.line, to.line)
                } else {
                    format!(
                        "Take {} line from {} to {}",
                        from.line, from.station_name, to.station_name
                    )
                }
            })
            .collect()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stations travelled: {}", self.stations_travelled())?;
        writeln!(f, "Time: {} minutes", self.time_taken_mins)?;
        let codes: Vec<String> = self
            .stops
            .iter()
            .map(|s| format!("'{}'", s.code))
            .collect();
        writeln!(f, "Route: ({})", codes.join(", "))?;
        for step in self.describe() {
            write!(f, "\n{step}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NetworkBuilder, StopSpec};
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2011, 10, 8).unwrap()
    }

    /// Holland Village -> Farrer Road -> Botanic Gardens (change) -> Stevens
    fn botanic_gardens_route() -> Route {
        let mut builder = NetworkBuilder::new();
        builder
            .add_line(vec![
                StopSpec::new("CC21", "Holland Village", date()),
                StopSpec::new("CC20", "Farrer Road", date()),
                StopSpec::new("CC19", "Botanic Gardens", date()),
            ])
            .unwrap();
        builder
            .add_line(vec![
                StopSpec::new("DT9", "Botanic Gardens", date()),
                StopSpec::new("DT10", "Stevens", date()),
            ])
            .unwrap();
        let network = builder.build();

        let ids: Vec<StopId> = ["CC21", "CC20", "CC19", "DT9", "DT10"]
            .iter()
            .map(|code| network.find_stop(code).unwrap().id())
            .collect();
        Route::from_stop_ids(&network, &ids, 4)
    }

    #[test]
    fn describe_rides_and_changes() {
        let route = botanic_gardens_route();

        assert_eq!(
            route.describe(),
            vec![
                "Take CC line from Holland Village to Farrer Road",
                "Take CC line from Farrer Road to Botanic Gardens",
                "Change from CC line to DT line",
                "Take DT line from Botanic Gardens to Stevens",
            ]
        );
    }

    #[test]
    fn display() {
        let route = botanic_gardens_route();

        let expected = [
            "Stations travelled: 4",
            "Time: 4 minutes",
            "Route: ('CC21', 'CC20', 'CC19', 'DT9', 'DT10')",
            "",
            "Take CC line from Holland Village to Farrer Road",
            "Take CC line from Farrer Road to Botanic Gardens",
            "Change from CC line to DT line",
            "Take DT line from Botanic Gardens to Stevens",
        ]
        .join("\n");
        assert_eq!(route.to_string(), expected);
    }

    #[test]
    fn counts() {
        let route = botanic_gardens_route();

        assert_eq!(route.stations_travelled(), 4);
        assert_eq!(route.change_count(), 1);
        assert_eq!(route.time_taken_mins(), 4);
        assert_eq!(route.duration(), Duration::minutes(4));
        assert_eq!(route.origin().unwrap().station_name, "Holland Village");
        assert_eq!(route.destination().unwrap().station_name, "Stevens");
        assert_eq!(route.stop_codes(), vec!["CC21", "CC20", "CC19", "DT9", "DT10"]);
    }

    #[test]
    fn single_stop_route_has_no_steps() {
        let mut builder = NetworkBuilder::new();
        builder
            .add_line(vec![StopSpec::new("NS1", "Jurong East", date())])
            .unwrap();
        let network = builder.build();
        let id = network.find_stop("NS1").unwrap().id();

        let route = Route::from_stop_ids(&network, &[id], 0);
        assert!(route.describe().is_empty());
        assert_eq!(route.change_count(), 0);
        assert_eq!(route.stations_travelled(), 1);
    }

    #[test]
    fn empty_route_has_no_endpoints() {
        let route = Route::new(Vec::new(), 0);

        assert!(route.origin().is_none());
        assert!(route.destination().is_none());
        assert!(route.describe().is_empty());
        assert_eq!(route.stations_travelled(), 0);
        assert_eq!(route.to_string(), "Stations travelled: 0\nTime: 0 minutes\nRoute: ()\n");
    }
}
