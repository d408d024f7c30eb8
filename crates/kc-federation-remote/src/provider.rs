//! Remote directory storage provider.
//!
//! ## Failure Policy
//!
//! - Lookups degrade to "not found" and searches to an empty result.
//! - Counts degrade to zero.
//! - Password verification faults abort the login with
//!   [`FederationError::VerificationFault`]; a directory outage is never
//!   reported as a wrong password.
//!
//! Passwords are never logged.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use kc_federation::credential::PASSWORD;
use kc_federation::{
    CredentialInput, CredentialInputValidator, FederatedIdentityKey, FederationConfig,
    FederationError, FederationResult, Group, RealmContext, Role, UserLookupProvider, UserModel,
    UserQueryProvider, UserRegistrationProvider, UserStorageProvider,
};

use crate::adapter::RemoteUserAdapter;
use crate::client::{DirectoryClient, LookupKey};
use crate::config::RemoteConfig;
use crate::dto::RemoteUserRecord;
use crate::error::RemoteResult;

/// Provider type identifier.
pub const PROVIDER_TYPE: &str = "remote-user";

/// Search parameter selecting the directory's query method.
pub const METHOD_PARAM: &str = "method";
/// Search method for plain user queries.
pub const METHOD_USER: &str = "user";
/// Search method for role membership queries.
pub const METHOD_ROLE: &str = "role";
/// Search parameter carrying the role name.
pub const ROLE_PARAM: &str = "role";

/// Federation provider backed by an HTTP user directory.
#[derive(Debug)]
pub struct RemoteUserProvider {
    /// Component model this provider was created from.
    federation_config: FederationConfig,

    /// Provider instance id, as embedded in federated keys.
    provider_id: String,

    /// Validated remote settings.
    config: Arc<RemoteConfig>,

    /// Directory client.
    client: DirectoryClient,
}

impl RemoteUserProvider {
    /// Creates a provider from a component model and its validated settings.
    pub fn new(federation_config: FederationConfig, config: RemoteConfig) -> RemoteResult<Self> {
        config.validate()?;
        let config = Arc::new(config);
        let client = DirectoryClient::new(Arc::clone(&config))?;

        Ok(Self {
            provider_id: federation_config.id.to_string(),
            federation_config,
            config,
            client,
        })
    }

    /// Returns the provider instance id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.provider_id
    }

    /// Returns the remote settings.
    #[must_use]
    pub fn remote_config(&self) -> &RemoteConfig {
        &self.config
    }

    /// Returns the directory client.
    #[must_use]
    pub const fn client(&self) -> &DirectoryClient {
        &self.client
    }

    fn map_user(&self, realm: &RealmContext, record: RemoteUserRecord) -> RemoteUserAdapter {
        RemoteUserAdapter::new(
            &self.provider_id,
            realm.clone(),
            Arc::clone(&self.config),
            record,
        )
    }

    async fn get_user(&self, realm: &RealmContext, key: LookupKey<'_>) -> Option<RemoteUserAdapter> {
        match self.client.lookup(key).await {
            Some(record) => {
                detail!(self.config, lookup = key.kind(), id = %record.id, "Remote user found");
                Some(self.map_user(realm, record))
            }
            None => {
                detail!(self.config, lookup = key.kind(), "Remote user not found");
                None
            }
        }
    }

    async fn count(&self, params: Option<&HashMap<String, String>>) -> usize {
        self.client.count(params).await.as_usize()
    }
}

impl UserStorageProvider for RemoteUserProvider {
    type User = RemoteUserAdapter;

    fn config(&self) -> &FederationConfig {
        &self.federation_config
    }

    fn provider_type(&self) -> &'static str {
        PROVIDER_TYPE
    }

    fn pre_remove_realm(&self, realm: &RealmContext) {
        detail!(self.config, realm = realm.name(), "pre-remove realm");
    }

    fn pre_remove_group(&self, realm: &RealmContext, group: &Group) {
        detail!(self.config, realm = realm.name(), group = %group.name, "pre-remove group");
    }

    fn pre_remove_role(&self, realm: &RealmContext, role: &Role) {
        detail!(self.config, realm = realm.name(), role = %role.name, "pre-remove role");
    }
}

impl UserLookupProvider for RemoteUserProvider {
    async fn get_user_by_id(&self, realm: &RealmContext, id: &str) -> Option<RemoteUserAdapter> {
        detail!(self.config, id, "Get user by id");
        let external_id = FederatedIdentityKey::external_id_of(id);
        self.get_user(realm, LookupKey::Id(external_id)).await
    }

    async fn get_user_by_username(
        &self,
        realm: &RealmContext,
        username: &str,
    ) -> Option<RemoteUserAdapter> {
        detail!(self.config, username, "Get user by username");
        self.get_user(realm, LookupKey::Username(username)).await
    }

    async fn get_user_by_email(
        &self,
        realm: &RealmContext,
        email: &str,
    ) -> Option<RemoteUserAdapter> {
        detail!(self.config, email, "Get user by email");
        self.get_user(realm, LookupKey::Email(email)).await
    }
}

impl UserQueryProvider for RemoteUserProvider {
    async fn search_for_users(
        &self,
        realm: &RealmContext,
        params: &HashMap<String, String>,
        first: Option<usize>,
        max: Option<usize>,
    ) -> Vec<RemoteUserAdapter> {
        detail!(self.config, ?params, ?first, ?max, "Search users");

        let mut query = params.clone();
        query
            .entry(METHOD_PARAM.to_string())
            .or_insert_with(|| METHOD_USER.to_string());

        match self.client.search(&query, first, max).await {
            Ok(records) => records
                .into_iter()
                .map(|record| self.map_user(realm, record))
                .collect(),
            Err(e) => {
                tracing::warn!(
                    provider = %self.provider_id,
                    error = %e,
                    "Directory search failed, returning no users"
                );
                Vec::new()
            }
        }
    }

    async fn search_for_users_by_attribute(
        &self,
        _realm: &RealmContext,
        name: &str,
        _value: &str,
    ) -> Vec<RemoteUserAdapter> {
        detail!(self.config, attribute = name, "Attribute search is not supported");
        Vec::new()
    }

    async fn group_members(
        &self,
        _realm: &RealmContext,
        group: &Group,
        _first: Option<usize>,
        _max: Option<usize>,
    ) -> Vec<RemoteUserAdapter> {
        detail!(self.config, group = %group.name, "Group membership is not supported");
        Vec::new()
    }

    async fn role_members(
        &self,
        realm: &RealmContext,
        role: &Role,
        first: Option<usize>,
        max: Option<usize>,
    ) -> Vec<RemoteUserAdapter> {
        let params = HashMap::from([
            (METHOD_PARAM.to_string(), METHOD_ROLE.to_string()),
            (ROLE_PARAM.to_string(), role.name.clone()),
        ]);
        self.search_for_users(realm, &params, first, max).await
    }

    async fn users_count(&self, _realm: &RealmContext) -> usize {
        detail!(self.config, "Get users count");
        self.count(None).await
    }

    // Group ids are accepted but not sent: the directory has no group filter.
    async fn users_count_in_groups(
        &self,
        _realm: &RealmContext,
        group_ids: &HashSet<String>,
    ) -> usize {
        detail!(self.config, ?group_ids, "Get users count by group");
        self.count(None).await
    }

    async fn users_count_by_params(
        &self,
        _realm: &RealmContext,
        params: &HashMap<String, String>,
    ) -> usize {
        detail!(self.config, ?params, "Get users count by params");
        self.count(Some(params)).await
    }

    async fn users_count_by_params_in_groups(
        &self,
        _realm: &RealmContext,
        params: &HashMap<String, String>,
        group_ids: &HashSet<String>,
    ) -> usize {
        detail!(self.config, ?params, ?group_ids, "Get users count by params and group");
        self.count(Some(params)).await
    }

    async fn users_count_with_service_accounts(
        &self,
        _realm: &RealmContext,
        include_service_accounts: bool,
    ) -> usize {
        detail!(self.config, include_service_accounts, "Get users count by includeServiceAccount");
        self.count(None).await
    }
}

impl CredentialInputValidator for RemoteUserProvider {
    fn supports_credential_type(&self, credential_type: &str) -> bool {
        credential_type == PASSWORD
    }

    async fn is_configured_for<U: UserModel>(
        &self,
        realm: &RealmContext,
        user: &U,
        credential_type: &str,
    ) -> bool {
        detail!(
            self.config,
            realm = realm.name(),
            user = user.username(),
            credential_type,
            "isConfiguredFor"
        );
        self.supports_credential_type(credential_type)
    }

    async fn is_valid<U: UserModel>(
        &self,
        realm: &RealmContext,
        user: &U,
        input: &CredentialInput,
    ) -> FederationResult<bool> {
        detail!(
            self.config,
            realm = realm.name(),
            user = user.username(),
            credential_type = input.credential_type(),
            "isValid"
        );
        if !self.supports_credential_type(input.credential_type()) {
            return Ok(false);
        }

        match self
            .client
            .verify(user.username(), input.challenge_response())
            .await
        {
            Ok(result) => {
                detail!(self.config, user = user.username(), valid = result.valid, "Verify user result");
                Ok(result.valid)
            }
            Err(e) => {
                tracing::error!(
                    provider = %self.provider_id,
                    user = user.username(),
                    error = %e,
                    "Remote password verification failed"
                );
                Err(FederationError::verification_fault(format!(
                    "Remote server error: {e}"
                )))
            }
        }
    }
}

impl UserRegistrationProvider for RemoteUserProvider {
    async fn add_user(&self, _realm: &RealmContext, username: &str) -> Option<RemoteUserAdapter> {
        detail!(self.config, username, "Registration is not supported");
        None
    }

    async fn remove_user<U: UserModel>(&self, _realm: &RealmContext, user: &U) -> bool {
        detail!(self.config, user = user.username(), "Removal is not supported");
        false
    }
}

#[cfg(test)]
mod tests {
    use kc_federation::{InMemoryRoleGrants, InMemoryRoleRegistry};
    use uuid::Uuid;

    use super::*;

    fn provider() -> RemoteUserProvider {
        let component = FederationConfig::builder()
            .id(Uuid::now_v7())
            .realm_id(Uuid::now_v7())
            .provider_type(PROVIDER_TYPE)
            .name("Directory")
            .build()
            .unwrap();
        let config = RemoteConfig::builder()
            // Nothing listens here; every request fails to connect.
            .base_url("http://127.0.0.1:9")
            .build()
            .unwrap();
        RemoteUserProvider::new(component, config).unwrap()
    }

    fn realm() -> RealmContext {
        RealmContext::new(
            Uuid::now_v7(),
            "acme",
            Arc::new(InMemoryRoleRegistry::new()),
            Arc::new(InMemoryRoleGrants::new()),
        )
    }

    #[test]
    fn only_password_credentials_are_supported() {
        let provider = provider();
        assert!(provider.supports_credential_type("password"));
        assert!(!provider.supports_credential_type("otp"));
        assert!(!provider.supports_credential_type("word"));
        assert!(!provider.supports_credential_type(""));
    }

    #[test]
    fn provider_id_matches_component() {
        let provider = provider();
        assert_eq!(provider.id(), provider.config().id.to_string());
        assert_eq!(provider.provider_type(), "remote-user");
    }

    #[tokio::test]
    async fn unreachable_directory_degrades_reads() {
        let provider = provider();
        let realm = realm();

        assert!(provider.get_user_by_username(&realm, "alice").await.is_none());
        assert!(provider.get_user_by_id(&realm, "f:p:42").await.is_none());
        assert!(provider
            .search_for_users(&realm, &HashMap::new(), Some(0), Some(10))
            .await
            .is_empty());
        assert_eq!(provider.users_count(&realm).await, 0);
    }

    #[tokio::test]
    async fn unreachable_directory_fails_verification_loudly() {
        let provider = provider();
        let realm = realm();
        let user = RemoteUserAdapter::new(
            provider.id(),
            realm.clone(),
            Arc::new(provider.remote_config().clone()),
            RemoteUserRecord::new("42", "alice"),
        );

        let result = provider
            .is_valid(&realm, &user, &CredentialInput::password("s3cret"))
            .await;
        assert!(matches!(result, Err(FederationError::VerificationFault(_))));
    }

    #[tokio::test]
    async fn unsupported_capabilities_are_inert() {
        let provider = provider();
        let realm = realm();
        let group = Group::new(Uuid::now_v7(), "staff");
        let user = RemoteUserAdapter::new(
            provider.id(),
            realm.clone(),
            Arc::new(provider.remote_config().clone()),
            RemoteUserRecord::new("42", "alice"),
        );

        assert!(provider.group_members(&realm, &group, None, None).await.is_empty());
        assert!(provider
            .search_for_users_by_attribute(&realm, "department", "R&D")
            .await
            .is_empty());
        assert!(provider.add_user(&realm, "new-user").await.is_none());
        assert!(!provider.remove_user(&realm, &user).await);
        assert!(provider.is_configured_for(&realm, &user, PASSWORD).await);

        provider.pre_remove_realm(&realm);
        provider.pre_remove_group(&realm, &group);
        provider.pre_remove_role(&realm, &Role::new_realm_role(realm.id(), "a"));
    }
}
