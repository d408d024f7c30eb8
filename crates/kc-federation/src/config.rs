//! Federation provider configuration.
//!
//! A [`FederationConfig`] is the component model the host stores for one
//! federation instance: identity, ordering, and a flat property map that
//! each provider type interprets on its own.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{FederationError, FederationResult};

/// Base configuration for all federation providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FederationConfig {
    /// Unique identifier for this provider instance.
    pub id: Uuid,

    /// Realm this provider belongs to.
    pub realm_id: Uuid,

    /// Provider type (e.g., "remote-user").
    pub provider_type: String,

    /// Display name.
    pub name: String,

    /// Priority for user lookup (lower = higher priority).
    pub priority: i32,

    /// Whether the provider is enabled.
    pub enabled: bool,

    /// Provider-specific properties.
    pub config: HashMap<String, String>,
}

impl FederationConfig {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> FederationConfigBuilder {
        FederationConfigBuilder::new()
    }

    /// Gets a property value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.config.get(key).map(String::as_str)
    }

    /// Gets a property value as bool.
    ///
    /// A present value is `true` only if it equals `true` ignoring ASCII
    /// case; any other value is `false`. `None` only when the key is absent.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.config.get(key).map(|v| v.eq_ignore_ascii_case("true"))
    }

    /// Returns a copy with one property replaced.
    ///
    /// Component models are never edited in place; an update produces a
    /// new value that has to pass validation again.
    #[must_use]
    pub fn with_property(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut updated = self.clone();
        updated.config.insert(key.into(), value.into());
        updated
    }
}

/// Builder for FederationConfig.
#[derive(Debug, Default)]
pub struct FederationConfigBuilder {
    id: Option<Uuid>,
    realm_id: Option<Uuid>,
    provider_type: Option<String>,
    name: Option<String>,
    priority: i32,
    enabled: bool,
    config: HashMap<String, String>,
}

impl FederationConfigBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            enabled: true,
            ..Default::default()
        }
    }

    /// Sets the ID.
    #[must_use]
    pub fn id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the realm ID.
    #[must_use]
    pub fn realm_id(mut self, realm_id: Uuid) -> Self {
        self.realm_id = Some(realm_id);
        self
    }

    /// Sets the provider type.
    #[must_use]
    pub fn provider_type(mut self, provider_type: impl Into<String>) -> Self {
        self.provider_type = Some(provider_type.into());
        self
    }

    /// Sets the name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Sets whether the provider is enabled.
    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Adds a property.
    #[must_use]
    pub fn config(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    /// Builds the configuration.
    ///
    /// ## Errors
    ///
    /// Returns a configuration error if the realm ID, provider type or
    /// name is missing.
    pub fn build(self) -> FederationResult<FederationConfig> {
        let realm_id = self
            .realm_id
            .ok_or_else(|| FederationError::config("realm_id is required"))?;
        let provider_type = self
            .provider_type
            .ok_or_else(|| FederationError::config("provider_type is required"))?;
        let name = self
            .name
            .ok_or_else(|| FederationError::config("name is required"))?;

        Ok(FederationConfig {
            id: self.id.unwrap_or_else(Uuid::now_v7),
            realm_id,
            provider_type,
            name,
            priority: self.priority,
            enabled: self.enabled,
            config: self.config,
        })
    }
}
