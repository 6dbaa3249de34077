//! Stop and line code types.

use std::fmt;

use chrono::NaiveDate;

use super::{LineId, StationId};

/// Error returned when parsing an invalid stop or line code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid code {code:?}: {reason}")]
pub struct InvalidCode {
    code: String,
    reason: &'static str,
}

impl InvalidCode {
    fn new(code: &str, reason: &'static str) -> Self {
        Self {
            code: code.to_string(),
            reason,
        }
    }
}

/// The code of a line, such as `NS` or `CC`.
///
/// Line codes are one or more uppercase ASCII letters.
///
/// # Examples
///
/// ```
/// use metro_router::domain::LineCode;
///
/// let ns = LineCode::parse("NS").unwrap();
/// assert_eq!(ns.as_str(), "NS");
///
/// assert!(LineCode::parse("ns").is_err());
/// assert!(LineCode::parse("").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineCode(String);

impl LineCode {
    /// Parse a line code.
    pub fn parse(s: &str) -> Result<Self, InvalidCode> {
        if s.is_empty() {
            return Err(InvalidCode::new(s, "line code must not be empty"));
        }
        if !s.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(InvalidCode::new(
                s,
                "line code must be uppercase ASCII letters A-Z",
            ));
        }
        Ok(Self(s.to_string()))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for LineCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineCode({})", self.0)
    }
}

impl fmt::Display for LineCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The code of a stop, such as `NS1` or `CC29`.
///
/// A stop code is a line prefix (uppercase ASCII letters) followed by a
/// sequence part (ASCII letters or digits). The prefix names the line the
/// stop belongs to.
///
/// # Examples
///
/// ```
/// use metro_router::domain::StopCode;
///
/// let code = StopCode::parse("CC21").unwrap();
/// assert_eq!(code.line_code().as_str(), "CC");
///
/// // A prefix alone is not a stop
/// assert!(StopCode::parse("CC").is_err());
/// // Neither is a bare number
/// assert!(StopCode::parse("21").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StopCode {
    code: String,
    prefix_len: usize,
}

impl StopCode {
    /// Parse a stop code.
    pub fn parse(s: &str) -> Result<Self, InvalidCode> {
        let prefix_len = s.bytes().take_while(u8::is_ascii_uppercase).count();

        if prefix_len == 0 {
            return Err(InvalidCode::new(
                s,
                "stop code must start with an uppercase line prefix",
            ));
        }
        if prefix_len == s.len() {
            return Err(InvalidCode::new(
                s,
                "stop code must have a sequence after the line prefix",
            ));
        }
        if !s.bytes().skip(prefix_len).all(|b| b.is_ascii_alphanumeric()) {
            return Err(InvalidCode::new(
                s,
                "stop sequence must be ASCII letters or digits",
            ));
        }

        Ok(Self {
            code: s.to_string(),
            prefix_len,
        })
    }

    /// Returns the full code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.code
    }

    /// Returns the line prefix of this code.
    pub fn line_code(&self) -> LineCode {
        LineCode(self.code[..self.prefix_len].to_string())
    }
}

impl fmt::Debug for StopCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopCode({})", self.code)
    }
}

impl fmt::Display for StopCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

/// Index of a stop within a [`Network`](super::Network).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StopId(pub(crate) u32);

impl StopId {
    /// Returns the arena index of this stop.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One line's occurrence of a station.
///
/// A stop belongs to exactly one line and one station. Several stops may
/// reference the same station, which is what makes it an interchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stop {
    id: StopId,
    code: StopCode,
    station: StationId,
    line: LineId,
    opening_date: NaiveDate,
}

impl Stop {
    pub(crate) fn new(
        id: StopId,
        code: StopCode,
        station: StationId,
        line: LineId,
        opening_date: NaiveDate,
    ) -> Self {
        Self {
            id,
            code,
            station,
            line,
            opening_date,
        }
    }

    pub fn id(&self) -> StopId {
        self.id
    }

    pub fn code(&self) -> &StopCode {
        &self.code
    }

    pub fn station(&self) -> StationId {
        self.station
    }

    pub fn line(&self) -> LineId {
        self.line
    }

    pub fn opening_date(&self) -> NaiveDate {
        self.opening_date
    }

    /// Returns true if the stop is open on the given date.
    pub fn is_open_on(&self, date: NaiveDate) -> bool {
        self.opening_date <= date
    }
}
