//! Provider factory.
//!
//! Validation runs when an administrator saves the component. A component
//! that fails it is rejected and never reaches [`RemoteUserProviderFactory::create`];
//! `create` validates again so an invalid model cannot be activated by
//! another path.

use kc_federation::{FederationConfig, FederationError, FederationResult};

use crate::config::RemoteConfig;
use crate::provider::{RemoteUserProvider, PROVIDER_TYPE};

/// Factory for [`RemoteUserProvider`] instances.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoteUserProviderFactory;

impl RemoteUserProviderFactory {
    /// Returns the provider type this factory creates.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        PROVIDER_TYPE
    }

    /// Returns the admin console display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        "Remote User Directory"
    }

    /// Returns the admin console help text.
    #[must_use]
    pub const fn help_text(&self) -> &'static str {
        "Federates users from an HTTP user directory"
    }

    /// Validates a component model before it is saved.
    pub fn validate_configuration(&self, component: &FederationConfig) -> FederationResult<RemoteConfig> {
        if component.provider_type != PROVIDER_TYPE {
            return Err(FederationError::config(format!(
                "Unable to validate configuration. Err: unexpected provider type '{}'",
                component.provider_type
            )));
        }

        RemoteConfig::from_federation_config(component).map_err(|e| {
            tracing::warn!(component = %component.name, error = %e, "Rejected remote directory configuration");
            FederationError::from(e)
        })
    }

    /// Creates a provider for a component model.
    pub fn create(&self, component: &FederationConfig) -> FederationResult<RemoteUserProvider> {
        let config = self.validate_configuration(component)?;
        let provider = RemoteUserProvider::new(component.clone(), config)?;

        tracing::info!(
            provider = provider.id(),
            name = %component.name,
            "Remote directory provider created"
        );
        Ok(provider)
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::config::keys;

    fn component(url: &str) -> FederationConfig {
        FederationConfig::builder()
            .realm_id(Uuid::now_v7())
            .provider_type(PROVIDER_TYPE)
            .name("Directory")
            .config(keys::URL, url)
            .config(keys::AUTHORIZATION_USERNAME, "svc")
            .config(keys::AUTHORIZATION_PASSWORD, "s3cret")
            .build()
            .unwrap()
    }

    #[test]
    fn short_url_blocks_activation() {
        let factory = RemoteUserProviderFactory;

        let err = factory.validate_configuration(&component("http://ab")).unwrap_err();
        assert!(err.is_configuration_error());
        assert!(err.to_string().contains("Please check the url."));
        assert!(factory.create(&component("http://ab")).is_err());
    }

    #[test]
    fn valid_component_creates_provider() {
        let factory = RemoteUserProviderFactory;
        let component = component("http://abc");

        let provider = factory.create(&component).unwrap();

        assert_eq!(factory.id(), "remote-user");

        assert_eq!(provider.id(), component.id.to_string());
        assert_eq!(provider.remote_config().auth_username, "svc");
    }

    #[test]
    fn updated_component_is_validated_again() {
        let factory = RemoteUserProviderFactory;
        let original = component("https://directory.example.com");
        assert!(factory.validate_configuration(&original).is_ok());

        let updated = original.with_property(keys::URL, "https://x");
        assert!(factory.validate_configuration(&updated).is_err());
    }

    #[test]
    fn foreign_provider_type_is_rejected() {
        let factory = RemoteUserProviderFactory;
        let mut foreign = component("https://directory.example.com");
        foreign.provider_type = "ldap".to_string();

        assert!(factory.validate_configuration(&foreign).is_err());
    }
}
