//! Remote directory error types.
//!
//! ## Security Note
//!
//! Error messages carry URLs and status codes, never credentials or
//! request bodies.

use kc_federation::FederationError;
use thiserror::Error;

/// Remote directory errors.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Invalid configuration.
    #[error("Unable to validate configuration. Err: {0}")]
    Configuration(String),

    /// The request could not be sent or its body could not be read.
    #[error("Directory request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The directory answered with a non-success status.
    #[error("Directory returned HTTP {status} for {url}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Requested URL, without query parameters.
        url: String,
    },

    /// The response body was not the expected JSON.
    #[error("Undecodable directory response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl RemoteError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Checks if the directory could not be reached or answered badly.
    #[must_use]
    pub const fn is_directory_fault(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Status { .. } | Self::Decode(_))
    }
}

/// Result type for remote directory operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

impl From<RemoteError> for FederationError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Configuration(_) => FederationError::Configuration(err.to_string()),
            RemoteError::Http(_) | RemoteError::Status { .. } | RemoteError::Decode(_) => {
                FederationError::unavailable(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_are_directory_faults() {
        let err = RemoteError::Status {
            status: 503,
            url: "https://directory.example.com/users".to_string(),
        };
        assert!(err.is_directory_fault());
        assert!(!RemoteError::config("bad").is_directory_fault());

        let mapped: FederationError = err.into();
        assert!(matches!(mapped, FederationError::DirectoryUnavailable(_)));
        assert!(mapped.to_string().contains("503"));
    }

    #[test]
    fn configuration_errors_block_activation() {
        let mapped: FederationError = RemoteError::config("Please check the url.").into();
        assert!(mapped.is_configuration_error());
        assert_eq!(
            mapped.to_string(),
            "Configuration error: Unable to validate configuration. Err: Please check the url."
        );
    }

    #[test]
    fn decode_errors_are_directory_faults() {
        let decode = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let err = RemoteError::from(decode);
        assert!(err.is_directory_fault());
    }
}
