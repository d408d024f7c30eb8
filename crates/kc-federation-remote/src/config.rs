//! Remote directory provider configuration.
//!
//! A [`RemoteConfig`] is validated once, when the component is saved, and
//! is immutable afterwards. Changing a setting means building a new value.

use std::fmt;

use kc_federation::FederationConfig;
use serde::{Deserialize, Serialize};

use crate::error::{RemoteError, RemoteResult};

// ============================================================================
// Property Keys and Defaults
// ============================================================================

/// Component property keys.
pub mod keys {
    /// Base URL of the directory.
    pub const URL: &str = "url";
    /// Path of the single-user lookup endpoint.
    pub const FIND_USER_ENDPOINT: &str = "find_user_endpoint";
    /// Path of the password verification endpoint.
    pub const VERIFY_USER_ENDPOINT: &str = "verify_user_endpoint";
    /// Path of the search endpoint.
    pub const SEARCH_USER_ENDPOINT: &str = "search_user_endpoint";
    /// Path of the count endpoint.
    pub const COUNT_USER_ENDPOINT: &str = "count_user_endpoint";
    /// Basic auth username.
    pub const AUTHORIZATION_USERNAME: &str = "authorization_username";
    /// Basic auth password.
    pub const AUTHORIZATION_PASSWORD: &str = "authorization_password";
    /// Whether directory roles are added to tokens.
    pub const ADD_ROLES_TO_TOKEN: &str = "add_role_to_token";
    /// Whether detail logs are emitted.
    pub const DEBUG_ENABLED: &str = "debug_log_enabled";
}

/// Minimum length of the base URL.
pub const URL_MIN_LENGTH: usize = 10;

/// Default lookup path.
pub const DEFAULT_FIND_PATH: &str = "/users";
/// Default verify path.
pub const DEFAULT_VERIFY_PATH: &str = "/auth";
/// Default search path.
pub const DEFAULT_SEARCH_PATH: &str = "/users";
/// Default count path.
pub const DEFAULT_COUNT_PATH: &str = "/users/count";

// ============================================================================
// Remote Configuration
// ============================================================================

/// Settings for one remote directory federation instance.
#[derive(Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL the endpoint paths are appended to.
    pub base_url: String,

    /// Lookup endpoint path.
    pub find_path: String,

    /// Verify endpoint path.
    pub verify_path: String,

    /// Search endpoint path.
    pub search_path: String,

    /// Count endpoint path.
    pub count_path: String,

    /// Basic auth username. Empty disables basic auth on GET requests.
    pub auth_username: String,

    /// Basic auth password.
    #[serde(skip_serializing, default)]
    pub auth_password: String,

    /// Whether directory roles are materialized into the user's role mappings.
    pub add_roles_to_token: bool,

    /// Whether detail logs are emitted.
    pub debug_enabled: bool,
}

impl RemoteConfig {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> RemoteConfigBuilder {
        RemoteConfigBuilder::new()
    }

    /// Reads and validates the configuration from a component model.
    ///
    /// Missing endpoint paths and flags take their defaults; a missing
    /// base URL fails validation.
    pub fn from_federation_config(component: &FederationConfig) -> RemoteResult<Self> {
        let mut builder = Self::builder()
            .base_url(component.get(keys::URL).unwrap_or_default())
            .auth_username(component.get(keys::AUTHORIZATION_USERNAME).unwrap_or_default())
            .auth_password(component.get(keys::AUTHORIZATION_PASSWORD).unwrap_or_default());

        if let Some(path) = component.get(keys::FIND_USER_ENDPOINT) {
            builder = builder.find_path(path);
        }
        if let Some(path) = component.get(keys::VERIFY_USER_ENDPOINT) {
            builder = builder.verify_path(path);
        }
        if let Some(path) = component.get(keys::SEARCH_USER_ENDPOINT) {
            builder = builder.search_path(path);
        }
        if let Some(path) = component.get(keys::COUNT_USER_ENDPOINT) {
            builder = builder.count_path(path);
        }
        if let Some(flag) = component.get_bool(keys::ADD_ROLES_TO_TOKEN) {
            builder = builder.add_roles_to_token(flag);
        }
        if let Some(flag) = component.get_bool(keys::DEBUG_ENABLED) {
            builder = builder.debug_enabled(flag);
        }

        builder.build()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> RemoteResult<()> {
        if self.base_url.chars().count() < URL_MIN_LENGTH {
            return Err(RemoteError::config("Please check the url."));
        }

        let paths = [
            (keys::FIND_USER_ENDPOINT, &self.find_path),
            (keys::VERIFY_USER_ENDPOINT, &self.verify_path),
            (keys::SEARCH_USER_ENDPOINT, &self.search_path),
            (keys::COUNT_USER_ENDPOINT, &self.count_path),
        ];
        for (key, path) in paths {
            if path.is_empty() {
                return Err(RemoteError::config(format!("{key} cannot be empty")));
            }
        }

        Ok(())
    }

    /// Whether GET requests carry basic auth.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.auth_username.is_empty()
    }

    /// Full URL of the lookup endpoint.
    #[must_use]
    pub fn find_url(&self) -> String {
        format!("{}{}", self.base_url, self.find_path)
    }

    /// Full URL of the verify endpoint.
    #[must_use]
    pub fn verify_url(&self) -> String {
        format!("{}{}", self.base_url, self.verify_path)
    }

    /// Full URL of the search endpoint.
    #[must_use]
    pub fn search_url(&self) -> String {
        format!("{}{}", self.base_url, self.search_path)
    }

    /// Full URL of the count endpoint.
    #[must_use]
    pub fn count_url(&self) -> String {
        format!("{}{}", self.base_url, self.count_path)
    }
}

impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("base_url", &self.base_url)
            .field("find_path", &self.find_path)
            .field("verify_path", &self.verify_path)
            .field("search_path", &self.search_path)
            .field("count_path", &self.count_path)
            .field("auth_username", &self.auth_username)
            .field("auth_password", &"***")
            .field("add_roles_to_token", &self.add_roles_to_token)
            .field("debug_enabled", &self.debug_enabled)
            .finish()
    }
}

// ============================================================================
// Configuration Builder
// ============================================================================

/// Builder for remote directory configuration.
#[derive(Debug)]
pub struct RemoteConfigBuilder {
    base_url: String,
    find_path: String,
    verify_path: String,
    search_path: String,
    count_path: String,
    auth_username: String,
    auth_password: String,
    add_roles_to_token: bool,
    debug_enabled: bool,
}

impl Default for RemoteConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteConfigBuilder {
    /// Creates a new builder with default endpoint paths.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: String::new(),
            find_path: DEFAULT_FIND_PATH.to_string(),
            verify_path: DEFAULT_VERIFY_PATH.to_string(),
            search_path: DEFAULT_SEARCH_PATH.to_string(),
            count_path: DEFAULT_COUNT_PATH.to_string(),
            auth_username: String::new(),
            auth_password: String::new(),
            add_roles_to_token: true,
            debug_enabled: false,
        }
    }

    /// Sets the base URL.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the lookup path.
    #[must_use]
    pub fn find_path(mut self, path: impl Into<String>) -> Self {
        self.find_path = path.into();
        self
    }

    /// Sets the verify path.
    #[must_use]
    pub fn verify_path(mut self, path: impl Into<String>) -> Self {
        self.verify_path = path.into();
        self
    }

    /// Sets the search path.
    #[must_use]
    pub fn search_path(mut self, path: impl Into<String>) -> Self {
        self.search_path = path.into();
        self
    }

    /// Sets the count path.
    #[must_use]
    pub fn count_path(mut self, path: impl Into<String>) -> Self {
        self.count_path = path.into();
        self
    }

    /// Sets the basic auth username.
    #[must_use]
    pub fn auth_username(mut self, username: impl Into<String>) -> Self {
        self.auth_username = username.into();
        self
    }

    /// Sets the basic auth password.
    #[must_use]
    pub fn auth_password(mut self, password: impl Into<String>) -> Self {
        self.auth_password = password.into();
        self
    }

    /// Sets whether directory roles are added to tokens.
    #[must_use]
    pub const fn add_roles_to_token(mut self, enabled: bool) -> Self {
        self.add_roles_to_token = enabled;
        self
    }

    /// Sets whether detail logs are emitted.
    #[must_use]
    pub const fn debug_enabled(mut self, enabled: bool) -> Self {
        self.debug_enabled = enabled;
        self
    }

    /// Builds and validates the configuration.
    pub fn build(self) -> RemoteResult<RemoteConfig> {
        let config = RemoteConfig {
            base_url: self.base_url,
            find_path: self.find_path,
            verify_path: self.verify_path,
            search_path: self.search_path,
            count_path: self.count_path,
            auth_username: self.auth_username,
            auth_password: self.auth_password,
            add_roles_to_token: self.add_roles_to_token,
            debug_enabled: self.debug_enabled,
        };

        config.validate()?;
        Ok(config)
    }
}
