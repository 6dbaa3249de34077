//! Domain error types.
//!
//! These errors represent validation failures while assembling a network.
//! They are distinct from IO and parsing errors raised by the loaders.

use super::{InvalidCode, StopCode};

/// Domain-level errors for network construction.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DomainError {
    /// A stop or line code failed validation
    #[error(transparent)]
    InvalidCode(#[from] InvalidCode),

    /// Lines need at least one stop
    #[error("line must have at least one stop")]
    EmptyLine,

    /// Stop codes identify a stop across the whole network
    #[error("duplicate stop code {0}")]
    DuplicateStopCode(StopCode),

    /// Station names must not be blank
    #[error("stop {0} has an empty station name")]
    EmptyStationName(StopCode),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DomainError::EmptyLine;
        assert_eq!(err.to_string(), "line must have at least one stop");

        let code = StopCode::parse("NS1").unwrap();
        let err = DomainError::DuplicateStopCode(code.clone());
        assert_eq!(err.to_string(), "duplicate stop code NS1");

        let err = DomainError::EmptyStationName(code);
        assert_eq!(err.to_string(), "stop NS1 has an empty station name");

        let err: DomainError = StopCode::parse("1").unwrap_err().into();
        assert!(err.to_string().starts_with("invalid code \"1\""));
    }
}
