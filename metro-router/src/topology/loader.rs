//! Stations map parsing.
//!
//! The stations map is a JSON array with one record per stop:
//!
//! ```json
//! [
//!   { "StationCode": "NS1", "StationName": "Jurong East", "OpeningDate": "10 March 1990" },
//!   { "StationCode": "EW24", "StationName": "Jurong East", "OpeningDate": "5 November 1988" }
//! ]
//! ```
//!
//! Records are grouped into lines by the line prefix of their code, in order
//! of first appearance. Within a line, stops keep the order of the file.

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{DomainError, LineCode, Network, NetworkBuilder, StopCode, StopSpec};

use super::TopologyError;

/// Date formats accepted for `OpeningDate`.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d %B %Y"];

/// One record of the stations map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationRecord {
    #[serde(rename = "StationCode")]
    pub station_code: String,

    #[serde(rename = "StationName")]
    pub station_name: String,

    #[serde(rename = "OpeningDate")]
    pub opening_date: String,
}

/// Load a network from a stations map file.
pub fn load_file(path: impl AsRef<Path>) -> Result<Network, TopologyError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| TopologyError::Io {
        path: path.display().to_string(),
        source,
    })?;
    from_json(&json)
}

/// Parse a network from stations map JSON.
pub fn from_json(json: &str) -> Result<Network, TopologyError> {
    let records: Vec<StationRecord> = serde_json::from_str(json)?;
    from_records(records)
}

/// Build a network from parsed records.
pub fn from_records(records: Vec<StationRecord>) -> Result<Network, TopologyError> {
    let mut order: Vec<LineCode> = Vec::new();
    let mut by_line: HashMap<LineCode, Vec<StopSpec>> = HashMap::new();

    for record in records {
        let code = StopCode::parse(record.station_code.trim())
            .map_err(DomainError::from)?;
        let opening_date = parse_opening_date(&record.opening_date).ok_or_else(|| {
            TopologyError::InvalidOpeningDate {
                code: code.to_string(),
                value: record.opening_date.clone(),
            }
        })?;

        let line = code.line_code();
        let stops = by_line.entry(line.clone()).or_insert_with(|| {
            order.push(line);
            Vec::new()
        });
        stops.push(StopSpec::new(
            code.as_str(),
            record.station_name.trim(),
            opening_date,
        ));
    }

    let mut builder = NetworkBuilder::new();
    for line in &order {
        if let Some(stops) = by_line.remove(line) {
            builder.add_line(stops)?;
        }
    }
    let network = builder.build();

    debug!(
        lines = network.lines().len(),
        stops = network.stops().len(),
        stations = network.stations().len(),
        "Loaded stations map"
    );

    Ok(network)
}

/// Parse an opening date in any of the accepted formats.
pub fn parse_opening_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
}
