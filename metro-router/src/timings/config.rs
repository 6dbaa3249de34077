//! Timings configuration.
//!
//! Describes when the network runs and how long things take: the peak and
//! night bands, per-line minutes between stops for each band, and the time
//! needed to change lines. Loaded from JSON, with the Singapore MRT figures
//! built in.

use std::path::Path;

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use super::{Band, TimeBand, TimingsError};

/// How a line behaves during one band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    /// Whether trains run at all.
    #[serde(default = "operational_by_default")]
    pub operational: bool,

    /// Minutes between consecutive stops, required when operational.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes_per_stop: Option<u32>,
}

fn operational_by_default() -> bool {
    true
}

impl Timing {
    /// A band in which trains run every `minutes` between stops.
    pub fn runs(minutes: u32) -> Self {
        Self {
            operational: true,
            minutes_per_stop: Some(minutes),
        }
    }

    /// A band in which the line does not run.
    pub fn closed() -> Self {
        Self {
            operational: false,
            minutes_per_stop: None,
        }
    }
}

/// Timings for one or more lines sharing the same figures.
///
/// A band left out falls back to `other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineTimings {
    pub codes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peak: Option<Timing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub night: Option<Timing>,
    pub other: Timing,
}

impl LineTimings {
    /// Returns the timing for `band`, falling back to other hours.
    pub fn for_band(&self, band: Band) -> Timing {
        match band {
            Band::Peak => self.peak.unwrap_or(self.other),
            Band::Night => self.night.unwrap_or(self.other),
            Band::Other => self.other,
        }
    }
}

/// Minutes needed to change lines, per band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineChange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peak: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub night: Option<u32>,
    pub other: u32,
}

impl LineChange {
    pub fn for_band(&self, band: Band) -> u32 {
        match band {
            Band::Peak => self.peak.unwrap_or(self.other),
            Band::Night => self.night.unwrap_or(self.other),
            Band::Other => self.other,
        }
    }
}

/// Complete timings configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingsConfig {
    /// IANA timezone all times are evaluated in.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default)]
    pub peak_hours: Vec<TimeBand>,

    #[serde(default)]
    pub night_hours: Vec<TimeBand>,

    #[serde(default)]
    pub lines: Vec<LineTimings>,

    pub line_change: LineChange,

    /// Minutes between stops for lines not listed in `lines`.
    #[serde(default = "default_fallback_minutes")]
    pub fallback_minutes_per_stop: u32,
}

fn default_timezone() -> String {
    "Asia/Singapore".to_string()
}

fn default_fallback_minutes() -> u32 {
    10
}

impl TimingsConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, TimingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TimingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TimingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// The Singapore MRT timings.
    ///
    /// Peak is weekdays 06:00-08:59 and 18:00-20:59, night is every day
    /// 00:00-05:59 and 22:00-23:59. The CG, CE and DT lines do not run at
    /// night.
    pub fn singapore() -> Self {
        let weekdays = vec![Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri];
        let every_day = vec![
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ];

        Self {
            timezone: default_timezone(),
            peak_hours: vec![
                band((6, 0), (8, 59), &weekdays),
                band((18, 0), (20, 59), &weekdays),
            ],
            night_hours: vec![
                band((0, 0), (5, 59), &every_day),
                band((22, 0), (23, 59), &every_day),
            ],
            lines: vec![
                line(&["NS", "NE"], Timing::runs(12), Timing::runs(10), Timing::runs(10)),
                line(&["CG", "CE"], Timing::runs(10), Timing::closed(), Timing::runs(10)),
                line(&["DT"], Timing::runs(10), Timing::closed(), Timing::runs(8)),
                line(&["TE"], Timing::runs(10), Timing::runs(8), Timing::runs(8)),
                line(&["EW", "CC"], Timing::runs(10), Timing::runs(10), Timing::runs(10)),
            ],
            line_change: LineChange {
                peak: Some(15),
                night: Some(10),
                other: 10,
            },
            fallback_minutes_per_stop: default_fallback_minutes(),
        }
    }
}

impl Default for TimingsConfig {
    fn default() -> Self {
        Self::singapore()
    }
}

fn band(start: (u32, u32), end: (u32, u32), days: &[Weekday]) -> TimeBand {
    let time = |(h, m): (u32, u32)| NaiveTime::from_hms_opt(h, m, 0).expect("built-in band time");
    TimeBand::new(time(start), time(end), days.to_vec()).expect("built-in band is well-formed")
}

fn line(codes: &[&str], peak: Timing, night: Timing, other: Timing) -> LineTimings {
    LineTimings {
        codes: codes.iter().map(|c| c.to_string()).collect(),
        peak: Some(peak),
        night: Some(night),
        other,
    }
}
