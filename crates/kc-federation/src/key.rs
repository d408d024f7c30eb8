//! Federated identity keys.
//!
//! The host never stores a federated user. It stores only a key that names
//! the provider instance and the user's native id in the external directory,
//! formatted as `f:<provider id>:<external id>`.

use std::fmt;
use std::str::FromStr;

use crate::error::FederationError;

const FEDERATED_PREFIX: &str = "f:";

/// Composite key of a provider instance and an external user id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FederatedIdentityKey {
    provider_id: String,
    external_id: String,
}

impl FederatedIdentityKey {
    /// Creates a key for a user held by the given provider instance.
    #[must_use]
    pub fn new(provider_id: impl Into<String>, external_id: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            external_id: external_id.into(),
        }
    }

    /// Returns the provider instance identifier.
    #[must_use]
    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    /// Returns the user's id in the external directory.
    #[must_use]
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    /// Checks whether a host user id is in federated form.
    #[must_use]
    pub fn is_federated(id: &str) -> bool {
        id.starts_with(FEDERATED_PREFIX)
    }

    /// Recovers the external id from a host user id.
    ///
    /// Ids that are not in federated form are returned unchanged, so a
    /// provider can be handed either shape.
    #[must_use]
    pub fn external_id_of(id: &str) -> &str {
        id.strip_prefix(FEDERATED_PREFIX)
            .and_then(|rest| rest.split_once(':'))
            .map_or(id, |(_, external)| external)
    }
}

impl fmt::Display for FederatedIdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{FEDERATED_PREFIX}{}:{}", self.provider_id, self.external_id)
    }
}

impl FromStr for FederatedIdentityKey {
    type Err = FederationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix(FEDERATED_PREFIX)
            .ok_or_else(|| FederationError::InvalidKey(s.to_string()))?;

        // Provider ids never contain ':'; external ids may.
        match rest.split_once(':') {
            Some((provider, external)) if !provider.is_empty() && !external.is_empty() => {
                Ok(Self::new(provider, external))
            }
            _ => Err(FederationError::InvalidKey(s.to_string())),
        }
    }
}
