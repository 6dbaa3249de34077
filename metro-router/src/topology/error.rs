//! Topology loading error types.

use crate::domain::DomainError;

/// Errors that can occur when loading a stations map.
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    /// Reading the file failed
    #[error("failed to read stations map from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a JSON array of station records
    #[error("stations map parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// An opening date could not be understood
    #[error("stop {code} has an invalid opening date {value:?}")]
    InvalidOpeningDate { code: String, value: String },

    /// A record broke a network invariant
    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = TopologyError::InvalidOpeningDate {
            code: "NS1".into(),
            value: "someday".into(),
        };
        assert_eq!(
            err.to_string(),
            "stop NS1 has an invalid opening date \"someday\""
        );

        let err: TopologyError = DomainError::EmptyLine.into();
        assert_eq!(err.to_string(), "line must have at least one stop");
    }
}
