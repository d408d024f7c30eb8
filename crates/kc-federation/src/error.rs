//! Federation error types.
//!
//! ## NIST 800-53 Rev5: SI-11 (Error Handling)
//!
//! A directory that answered "no such user" is not an error; lookups
//! return `None`. The variants here cover a directory that could not
//! answer at all, and providers decide per operation whether such a fault
//! is absorbed or surfaced.

use thiserror::Error;

/// Errors that can occur during federation operations.
#[derive(Debug, Error)]
pub enum FederationError {
    /// Provider configuration failed validation and must not be activated.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The external directory could not be reached or returned an unusable response.
    #[error("Directory unavailable: {0}")]
    DirectoryUnavailable(String),

    /// The external directory failed while verifying a credential.
    ///
    /// Distinct from a rejected credential: the authentication attempt
    /// must be aborted rather than reported as a bad password.
    #[error("Credential verification failed: {0}")]
    VerificationFault(String),

    /// A federated identity key could not be decoded.
    #[error("Invalid federated identity key: {0}")]
    InvalidKey(String),
}

impl FederationError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Creates a directory unavailable error.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::DirectoryUnavailable(msg.into())
    }

    /// Creates a verification fault.
    #[must_use]
    pub fn verification_fault(msg: impl Into<String>) -> Self {
        Self::VerificationFault(msg.into())
    }

    /// Checks if this error was caused by the external directory.
    #[must_use]
    pub const fn is_directory_fault(&self) -> bool {
        matches!(
            self,
            Self::DirectoryUnavailable(_) | Self::VerificationFault(_)
        )
    }

    /// Checks if this is a configuration error.
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

/// Result type for federation operations.
pub type FederationResult<T> = Result<T, FederationError>;
