//! Crate-level error definitions.
//!
//! Failover itself never fails: attempt failures travel inside
//! [`Status`](crate::outcome::Status). These errors cover construction and
//! configuration only.

use thiserror::Error;

use crate::config::loader::ConfigError;

/// Errors that can occur while building or steering a failover manager.
#[derive(Debug, Error)]
pub enum FailoverError {
    /// A region origin could not be parsed as a URL.
    #[error("Invalid origin for region '{region}': {source}")]
    InvalidOrigin {
        region: String,
        #[source]
        source: url::ParseError,
    },

    /// The HTTP client for a region could not be built.
    #[error("Failed to build client for region '{region}': {source}")]
    Client {
        region: String,
        #[source]
        source: reqwest::Error,
    },

    /// An endpoint handle that does not belong to the pool was supplied.
    #[error("Endpoint '{0}' is not a member of this pool")]
    UnknownEndpoint(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for failover construction and control operations.
pub type FailoverResult<T> = Result<T, FailoverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FailoverError::UnknownEndpoint("eu-west".to_string());
        assert_eq!(err.to_string(), "Endpoint 'eu-west' is not a member of this pool");

        let err = FailoverError::InvalidOrigin {
            region: "primary".to_string(),
            source: url::ParseError::EmptyHost,
        };
        assert!(err.to_string().contains("primary"));
    }
}
