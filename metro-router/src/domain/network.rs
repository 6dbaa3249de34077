//! The network arena.
//!
//! A `Network` owns every station, stop and line of a transit system and hands
//! out lightweight ids. It is immutable once built: routing queries read it
//! through a shared reference and keep their per-query state elsewhere.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use super::{
    DomainError, Line, LineId, Station, StationId, Stop, StopCode, StopId,
};

/// An immutable transit network.
#[derive(Debug, Clone, Default)]
pub struct Network {
    stations: Vec<Station>,
    stops: Vec<Stop>,
    lines: Vec<Line>,
    station_by_name: HashMap<String, StationId>,
}

impl Network {
    /// Create an empty network.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the station with the given id.
    ///
    /// # Panics
    ///
    /// Panics if the id does not belong to this network.
    pub fn station(&self, id: StationId) -> &Station {
        &self.stations[id.index()]
    }

    /// Returns the stop with the given id.
    ///
    /// # Panics
    ///
    /// Panics if the id does not belong to this network.
    pub fn stop(&self, id: StopId) -> &Stop {
        &self.stops[id.index()]
    }

    /// Returns the line with the given id.
    ///
    /// # Panics
    ///
    /// Panics if the id does not belong to this network.
    pub fn line(&self, id: LineId) -> &Line {
        &self.lines[id.index()]
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Look up a station by its exact name.
    pub fn find_station(&self, name: &str) -> Option<&Station> {
        self.station_by_name
            .get(name)
            .map(|id| self.station(*id))
    }

    /// Iterates over every stop calling at `station`, in network order.
    pub fn stops_at(&self, station: StationId) -> impl Iterator<Item = &Stop> + '_ {
        self.stops.iter().filter(move |s| s.station() == station)
    }

    /// Look up a stop by its code.
    pub fn find_stop(&self, code: &str) -> Option<&Stop> {
        self.stops.iter().find(|s| s.code().as_str() == code)
    }

    /// Search stations whose name contains `query`, ignoring case.
    ///
    /// Results are sorted by name and capped at `limit`.
    pub fn search_stations(&self, query: &str, limit: usize) -> Vec<&Station> {
        let needle = query.to_lowercase();
        let mut matches: Vec<&Station> = self
            .stations
            .iter()
            .filter(|s| s.name().to_lowercase().contains(&needle))
            .collect();
        matches.sort_by(|a, b| a.name().cmp(b.name()));
        matches.truncate(limit);
        matches
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// One stop of a line handed to [`NetworkBuilder::add_line`].
#[derive(Debug, Clone)]
pub struct StopSpec {
    pub code: String,
    pub station: String,
    pub opening_date: NaiveDate,
}

impl StopSpec {
    pub fn new(code: impl Into<String>, station: impl Into<String>, opening_date: NaiveDate) -> Self {
        Self {
            code: code.into(),
            station: station.into(),
            opening_date,
        }
    }
}

/// Builder for assembling a [`Network`] line by line.
///
/// Stations are interned by exact name, so two lines naming the same station
/// share it and produce an interchange.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use metro_router::domain::{NetworkBuilder, StopSpec};
///
/// let opened = NaiveDate::from_ymd_opt(1990, 3, 10).unwrap();
/// let mut builder = NetworkBuilder::new();
/// builder
///     .add_line(vec![
///         StopSpec::new("NS1", "Jurong East", opened),
///         StopSpec::new("NS2", "Bukit Batok", opened),
///     ])
///     .unwrap();
/// let network = builder.build();
///
/// assert_eq!(network.lines().len(), 1);
/// assert!(network.find_station("Bukit Batok").is_some());
/// ```
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    inner: Network,
    codes: HashSet<StopCode>,
}

impl NetworkBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a line made of the given stops, in travel order.
    ///
    /// The line code is taken from the first stop's code prefix. Nothing is
    /// added if validation fails.
    pub fn add_line(
        &mut self,
        stops: impl IntoIterator<Item = StopSpec>,
    ) -> Result<LineId, DomainError> {
        let specs: Vec<StopSpec> = stops.into_iter().collect();
        if specs.is_empty() {
            return Err(DomainError::EmptyLine);
        }

        // Validate everything before touching the arena
        let mut codes = Vec::with_capacity(specs.len());
        let mut seen = HashSet::new();
        for spec in &specs {
            let code = StopCode::parse(&spec.code)?;
            if spec.station.trim().is_empty() {
                return Err(DomainError::EmptyStationName(code));
            }
            if self.codes.contains(&code) || !seen.insert(code.clone()) {
                return Err(DomainError::DuplicateStopCode(code));
            }
            codes.push(code);
        }

        let line_id = LineId(self.inner.lines.len() as u32);
        let line_code = codes[0].line_code();
        let mut stop_ids = Vec::with_capacity(specs.len());

        for (spec, code) in specs.into_iter().zip(codes) {
            let station = self.intern_station(&spec.station);
            let stop_id = StopId(self.inner.stops.len() as u32);
            self.codes.insert(code.clone());
            self.inner
                .stops
                .push(Stop::new(stop_id, code, station, line_id, spec.opening_date));
            stop_ids.push(stop_id);
        }

        self.inner
            .lines
            .push(Line::new(line_id, line_code, stop_ids));
        Ok(line_id)
    }

    fn intern_station(&mut self, name: &str) -> StationId {
        if let Some(id) = self.inner.station_by_name.get(name) {
            return *id;
        }
        let id = StationId(self.inner.stations.len() as u32);
        self.inner.stations.push(Station::new(id, name));
        self.inner.station_by_name.insert(name.to_string(), id);
        id
    }

    /// Build the network.
    pub fn build(self) -> Network {
        self.inner
    }
}
