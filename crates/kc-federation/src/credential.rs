//! Credential input and per-user credential dispatch.

use std::fmt;

use crate::error::FederationResult;
use crate::provider::CredentialInputValidator;
use crate::realm::RealmContext;
use crate::user::UserModel;

/// Credential type of a password.
pub const PASSWORD: &str = "password";

/// A credential presented during authentication.
#[derive(Clone)]
pub struct CredentialInput {
    credential_type: String,
    challenge_response: String,
}

impl CredentialInput {
    /// Creates a credential input of any type.
    #[must_use]
    pub fn new(credential_type: impl Into<String>, challenge_response: impl Into<String>) -> Self {
        Self {
            credential_type: credential_type.into(),
            challenge_response: challenge_response.into(),
        }
    }

    /// Creates a password credential input.
    #[must_use]
    pub fn password(value: impl Into<String>) -> Self {
        Self::new(PASSWORD, value)
    }

    /// Returns the credential type.
    #[must_use]
    pub fn credential_type(&self) -> &str {
        &self.credential_type
    }

    /// Returns the secret presented by the user.
    #[must_use]
    pub fn challenge_response(&self) -> &str {
        &self.challenge_response
    }
}

impl fmt::Debug for CredentialInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialInput")
            .field("credential_type", &self.credential_type)
            .field("challenge_response", &"***")
            .finish()
    }
}

/// Credential operations for one user.
///
/// Holds no credential state. Every call is dispatched to the validator
/// that owns the user's credentials.
#[derive(Debug)]
pub struct UserCredentialManager<'a, U> {
    realm: &'a RealmContext,
    user: &'a U,
}

impl<'a, U: UserModel> UserCredentialManager<'a, U> {
    /// Creates a credential manager for a user.
    #[must_use]
    pub const fn new(realm: &'a RealmContext, user: &'a U) -> Self {
        Self { realm, user }
    }

    /// Validates a credential through the given validator.
    ///
    /// Unsupported credential types are rejected without calling it.
    pub async fn is_valid<V: CredentialInputValidator>(
        &self,
        validator: &V,
        input: &CredentialInput,
    ) -> FederationResult<bool> {
        if !validator.supports_credential_type(input.credential_type()) {
            return Ok(false);
        }
        validator.is_valid(self.realm, self.user, input).await
    }

    /// Checks whether the user has a credential of this type.
    pub async fn is_configured_for<V: CredentialInputValidator>(
        &self,
        validator: &V,
        credential_type: &str,
    ) -> bool {
        validator.supports_credential_type(credential_type)
            && validator
                .is_configured_for(self.realm, self.user, credential_type)
                .await
    }
}
