//! The time policy seam and its implementations.

use std::collections::HashMap;

use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::domain::LineCode;

use super::{Band, LineTimings, TimingsConfig, TimingsError};

/// Answers how the network behaves at a point in time.
///
/// Times are wall-clock times in the network's own timezone. This
/// abstraction allows the router to be tested with fixed costs.
pub trait TimePolicy {
    /// Whether `line` is running at `at`.
    fn is_operational(&self, line: &LineCode, at: NaiveDateTime) -> bool;

    /// Minutes between consecutive stops of `line` at `at`.
    ///
    /// Only meaningful when the line is operational.
    fn per_hop_cost(&self, line: &LineCode, at: NaiveDateTime) -> u32;

    /// Minutes needed to change lines at `at`.
    fn per_transfer_cost(&self, at: NaiveDateTime) -> u32;
}

/// A policy where every line always runs and everything costs one minute.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitTimings;

impl TimePolicy for UnitTimings {
    fn is_operational(&self, _line: &LineCode, _at: NaiveDateTime) -> bool {
        true
    }

    fn per_hop_cost(&self, _line: &LineCode, _at: NaiveDateTime) -> u32 {
        1
    }

    fn per_transfer_cost(&self, _at: NaiveDateTime) -> u32 {
        1
    }
}

/// A line's resolved behaviour at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStatus {
    /// Running, with this many minutes between stops
    Running { minutes_per_stop: u32 },
    /// Not running
    Closed,
}

/// A policy driven by peak and night bands.
///
/// Peak takes precedence over night when both match; anything else is
/// "other hours". Lines missing from the configuration always run at the
/// fallback figure.
#[derive(Debug, Clone)]
pub struct BandedTimings {
    config: TimingsConfig,
    timezone: Tz,
    lines: HashMap<LineCode, usize>,
}

impl BandedTimings {
    /// Validate `config` and build a policy from it.
    pub fn new(config: TimingsConfig) -> Result<Self, TimingsError> {
        let timezone: Tz = config
            .timezone
            .parse()
            .map_err(|_| TimingsError::UnknownTimezone(config.timezone.clone()))?;

        let mut lines = HashMap::new();
        for (idx, entry) in config.lines.iter().enumerate() {
            for code in &entry.codes {
                let code = LineCode::parse(code)?;
                validate_bands(&code, entry)?;
                if lines.insert(code.clone(), idx).is_some() {
                    return Err(TimingsError::DuplicateLine(code.to_string()));
                }
            }
        }

        debug!(
            timezone = %timezone,
            lines = lines.len(),
            peak_bands = config.peak_hours.len(),
            night_bands = config.night_hours.len(),
            "Loaded timings"
        );

        Ok(Self {
            config,
            timezone,
            lines,
        })
    }

    /// The Singapore MRT policy.
    pub fn singapore() -> Self {
        Self::new(TimingsConfig::singapore()).expect("built-in timings are valid")
    }

    pub fn config(&self) -> &TimingsConfig {
        &self.config
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// The current wall-clock time in the network's timezone.
    pub fn local_now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.timezone).naive_local()
    }

    /// Which band `at` falls into.
    pub fn band_at(&self, at: NaiveDateTime) -> Band {
        if self.config.peak_hours.iter().any(|b| b.contains(at)) {
            Band::Peak
        } else if self.config.night_hours.iter().any(|b| b.contains(at)) {
            Band::Night
        } else {
            Band::Other
        }
    }

    /// How `line` behaves at `at`.
    pub fn line_status(&self, line: &LineCode, at: NaiveDateTime) -> LineStatus {
        let Some(&idx) = self.lines.get(line) else {
            return LineStatus::Running {
                minutes_per_stop: self.config.fallback_minutes_per_stop,
            };
        };

        let timing = self.config.lines[idx].for_band(self.band_at(at));
        match (timing.operational, timing.minutes_per_stop) {
            (true, Some(minutes_per_stop)) => LineStatus::Running { minutes_per_stop },
            // Validated at construction: operational bands carry minutes
            (true, None) => LineStatus::Running {
                minutes_per_stop: self.config.fallback_minutes_per_stop,
            },
            (false, _) => LineStatus::Closed,
        }
    }
}

fn validate_bands(code: &LineCode, entry: &LineTimings) -> Result<(), TimingsError> {
    for band in [Band::Peak, Band::Night, Band::Other] {
        let timing = entry.for_band(band);
        if timing.operational && timing.minutes_per_stop.is_none() {
            return Err(TimingsError::MissingMinutes {
                line: code.to_string(),
                band,
            });
        }
    }
    Ok(())
}

impl TimePolicy for BandedTimings {
    fn is_operational(&self, line: &LineCode, at: NaiveDateTime) -> bool {
        matches!(self.line_status(line, at), LineStatus::Running { .. })
    }

    fn per_hop_cost(&self, line: &LineCode, at: NaiveDateTime) -> u32 {
        match self.line_status(line, at) {
            LineStatus::Running { minutes_per_stop } => minutes_per_stop,
            LineStatus::Closed => u32::MAX,
        }
    }

    fn per_transfer_cost(&self, at: NaiveDateTime) -> u32 {
        self.config.line_change.for_band(self.band_at(at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timings::Timing;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    fn code(s: &str) -> LineCode {
        LineCode::parse(s).unwrap()
    }

    #[test]
    fn ns_line_in_weekday_peak() {
        let policy = BandedTimings::singapore();
        // Wednesday
        for time in [
            at(2019, 1, 23, 6, 0, 0),
            at(2019, 1, 23, 8, 30, 0),
            at(2019, 1, 23, 8, 59, 59),
            at(2019, 1, 23, 18, 0, 0),
            at(2019, 1, 23, 20, 59, 59),
        ] {
            assert!(policy.is_operational(&code("NS"), time));
            assert_eq!(policy.per_hop_cost(&code("NS"), time), 12);
            assert_eq!(policy.per_hop_cost(&code("NE"), time), 12);
            assert_eq!(policy.per_hop_cost(&code("CC"), time), 10);
            assert_eq!(policy.per_transfer_cost(time), 15);
        }
    }

    #[test]
    fn weekend_mornings_are_not_peak() {
        let policy = BandedTimings::singapore();
        let saturday = at(2019, 1, 5, 6, 0, 0);
        let sunday = at(2019, 1, 6, 6, 0, 0);

        assert_eq!(policy.band_at(saturday), Band::Other);
        assert_eq!(policy.per_hop_cost(&code("NS"), saturday), 10);
        assert_eq!(policy.per_hop_cost(&code("NS"), sunday), 10);
        assert_eq!(policy.per_transfer_cost(sunday), 10);
    }

    #[test]
    fn night_closures() {
        let policy = BandedTimings::singapore();
        let late = at(2019, 1, 23, 22, 30, 0);
        let early = at(2019, 1, 26, 5, 59, 0);

        for time in [late, early] {
            assert_eq!(policy.band_at(time), Band::Night);
            assert!(!policy.is_operational(&code("DT"), time));
            assert!(!policy.is_operational(&code("CG"), time));
            assert!(!policy.is_operational(&code("CE"), time));
            assert!(policy.is_operational(&code("TE"), time));
            assert_eq!(policy.per_hop_cost(&code("TE"), time), 8);
            assert_eq!(policy.per_transfer_cost(time), 10);
        }
    }

    #[test]
    fn other_hours() {
        let policy = BandedTimings::singapore();
        let midday = at(2019, 1, 23, 12, 0, 0);

        assert_eq!(policy.band_at(midday), Band::Other);
        assert_eq!(policy.per_hop_cost(&code("DT"), midday), 8);
        assert_eq!(policy.per_hop_cost(&code("TE"), midday), 8);
        assert_eq!(policy.per_hop_cost(&code("EW"), midday), 10);
    }

    #[test]
    fn unconfigured_line_uses_fallback() {
        let policy = BandedTimings::singapore();
        let midnight = at(2019, 1, 23, 0, 30, 0);

        assert!(policy.is_operational(&code("BP"), midnight));
        assert_eq!(policy.per_hop_cost(&code("BP"), midnight), 10);
    }

    #[test]
    fn peak_wins_over_night() {
        let mut config = TimingsConfig::singapore();
        // Make the morning peak overlap the night band
        config.night_hours = config.peak_hours.clone();
        let policy = BandedTimings::new(config).unwrap();

        let time = at(2019, 1, 23, 7, 0, 0);
        assert_eq!(policy.band_at(time), Band::Peak);
        assert!(policy.is_operational(&code("DT"), time));
    }

    #[test]
    fn rejects_unknown_timezone() {
        let mut config = TimingsConfig::singapore();
        config.timezone = "Mars/Olympus".into();
        assert!(matches!(
            BandedTimings::new(config),
            Err(TimingsError::UnknownTimezone(_))
        ));
    }

    #[test]
    fn rejects_duplicate_and_malformed_lines() {
        let mut config = TimingsConfig::singapore();
        config.lines.push(config.lines[0].clone());
        assert!(matches!(
            BandedTimings::new(config),
            Err(TimingsError::DuplicateLine(_))
        ));

        let mut config = TimingsConfig::singapore();
        config.lines[0].codes.push("n5".into());
        assert!(matches!(
            BandedTimings::new(config),
            Err(TimingsError::InvalidLineCode(_))
        ));
    }

    #[test]
    fn rejects_operational_band_without_minutes() {
        let mut config = TimingsConfig::singapore();
        config.lines[0].night = Some(Timing {
            operational: true,
            minutes_per_stop: None,
        });
        assert!(matches!(
            BandedTimings::new(config),
            Err(TimingsError::MissingMinutes { band: Band::Night, .. })
        ));
    }

    #[test]
    fn unit_timings() {
        let time = at(2019, 1, 23, 7, 0, 0);
        assert!(UnitTimings.is_operational(&code("DT"), time));
        assert_eq!(UnitTimings.per_hop_cost(&code("DT"), time), 1);
        assert_eq!(UnitTimings.per_transfer_cost(time), 1);
    }

    #[test]
    fn other_timezone_is_accepted() {
        let mut config = TimingsConfig::singapore();
        config.timezone = "Europe/London".into();
        let policy = BandedTimings::new(config).unwrap();
        assert_eq!(policy.timezone(), chrono_tz::Europe::London);
    }
}
