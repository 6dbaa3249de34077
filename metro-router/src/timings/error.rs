//! Timings error types.

use crate::domain::InvalidCode;

use super::Band;

/// Errors raised while loading or validating a timings configuration.
#[derive(Debug, thiserror::Error)]
pub enum TimingsError {
    /// Reading the configuration file failed
    #[error("failed to read timings from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid JSON, or a time band is malformed
    #[error("timings parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The timezone is not a known IANA name
    #[error("unknown timezone {0:?}")]
    UnknownTimezone(String),

    /// A line code in the configuration is malformed
    #[error(transparent)]
    InvalidLineCode(#[from] InvalidCode),

    /// The same line code appears in two entries
    #[error("line {0} is configured more than once")]
    DuplicateLine(String),

    /// An operational band must say how long a hop takes
    #[error("line {line} runs during {band} hours but has no minutes_per_stop")]
    MissingMinutes { line: String, band: Band },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = TimingsError::UnknownTimezone("Mars/Olympus".into());
        assert_eq!(err.to_string(), "unknown timezone \"Mars/Olympus\"");

        let err = TimingsError::DuplicateLine("NS".into());
        assert_eq!(err.to_string(), "line NS is configured more than once");

        let err = TimingsError::MissingMinutes {
            line: "DT".into(),
            band: Band::Night,
        };
        assert_eq!(
            err.to_string(),
            "line DT runs during night hours but has no minutes_per_stop"
        );
    }
}
