//! Time bands.

use std::fmt;

use chrono::{Datelike, NaiveDateTime, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

/// Error returned when a time band is malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time band: {reason}")]
pub struct InvalidTimeBand {
    reason: String,
}

impl InvalidTimeBand {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Which band a point in time falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Peak,
    Night,
    Other,
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Band::Peak => "peak",
            Band::Night => "night",
            Band::Other => "other",
        })
    }
}

/// A recurring window of time: a set of weekdays and a minute-of-day range.
///
/// Both ends are inclusive and compared at minute granularity, so a band
/// ending at 08:59 still contains 08:59:59.
///
/// # Examples
///
/// ```
/// use chrono::{NaiveDate, NaiveTime, Weekday};
/// use metro_router::timings::TimeBand;
///
/// let band = TimeBand::new(
///     NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
///     NaiveTime::from_hms_opt(8, 59, 0).unwrap(),
///     vec![Weekday::Wed],
/// )
/// .unwrap();
///
/// let wednesday = NaiveDate::from_ymd_opt(2019, 1, 23).unwrap();
/// assert!(band.contains(wednesday.and_hms_opt(8, 59, 59).unwrap()));
/// assert!(!band.contains(wednesday.and_hms_opt(9, 0, 0).unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTimeBand", into = "RawTimeBand")]
pub struct TimeBand {
    start: NaiveTime,
    end: NaiveTime,
    days: Vec<Weekday>,
}

impl TimeBand {
    /// Create a band. `start` must not be after `end`.
    pub fn new(start: NaiveTime, end: NaiveTime, days: Vec<Weekday>) -> Result<Self, InvalidTimeBand> {
        if minute_of_day(start) > minute_of_day(end) {
            return Err(InvalidTimeBand::new(format!(
                "start {} is after end {}",
                start.format("%H:%M"),
                end.format("%H:%M")
            )));
        }
        Ok(Self { start, end, days })
    }

    /// Returns true if `at` falls on one of the band's days and inside its
    /// minute range.
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        let minute = minute_of_day(at.time());
        self.days.contains(&at.weekday())
            && minute >= minute_of_day(self.start)
            && minute <= minute_of_day(self.end)
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn days(&self) -> &[Weekday] {
        &self.days
    }
}

fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Serialised form of a [`TimeBand`]: `{"start": "06:00", "end": "08:59", "days": ["Mon"]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawTimeBand {
    start: String,
    end: String,
    days: Vec<String>,
}

impl TryFrom<RawTimeBand> for TimeBand {
    type Error = InvalidTimeBand;

    fn try_from(raw: RawTimeBand) -> Result<Self, Self::Error> {
        let start = parse_hhmm(&raw.start)?;
        let end = parse_hhmm(&raw.end)?;
        let days = raw
            .days
            .iter()
            .map(|d| {
                d.parse::<Weekday>()
                    .map_err(|_| InvalidTimeBand::new(format!("unknown weekday {d:?}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        TimeBand::new(start, end, days)
    }
}

impl From<TimeBand> for RawTimeBand {
    fn from(band: TimeBand) -> Self {
        Self {
            start: band.start.format("%H:%M").to_string(),
            end: band.end.format("%H:%M").to_string(),
            days: band.days.iter().map(|d| d.to_string()).collect(),
        }
    }
}

fn parse_hhmm(s: &str) -> Result<NaiveTime, InvalidTimeBand> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|_| InvalidTimeBand::new(format!("expected HH:MM, got {s:?}")))
}
