//! Identity adapter for directory records.
//!
//! A [`RemoteUserAdapter`] exposes one decoded record through the host's
//! [`UserModel`] contract. It lives for a single request and is rebuilt
//! from a fresh lookup every time.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use kc_federation::user::{EMAIL, FIRST_NAME, LAST_NAME, USERNAME};
use kc_federation::{
    FederatedIdentityKey, FederationResult, RealmContext, Role, UserCredentialManager, UserModel,
};

use crate::config::RemoteConfig;
use crate::dto::RemoteUserRecord;

/// A directory user as seen by the host.
#[derive(Debug, Clone)]
pub struct RemoteUserAdapter {
    key: FederatedIdentityKey,
    host_id: String,
    record: RemoteUserRecord,
    realm: RealmContext,
    config: Arc<RemoteConfig>,
}

impl RemoteUserAdapter {
    /// Wraps a record fetched by the given provider instance.
    #[must_use]
    pub fn new(
        provider_id: &str,
        realm: RealmContext,
        config: Arc<RemoteConfig>,
        record: RemoteUserRecord,
    ) -> Self {
        let key = FederatedIdentityKey::new(provider_id, record.id.clone());
        Self {
            host_id: key.to_string(),
            key,
            record,
            realm,
            config,
        }
    }

    /// Returns the federated identity key.
    #[must_use]
    pub const fn key(&self) -> &FederatedIdentityKey {
        &self.key
    }

    /// Returns the wrapped record.
    #[must_use]
    pub const fn record(&self) -> &RemoteUserRecord {
        &self.record
    }

    /// Returns the realm this user was resolved in.
    #[must_use]
    pub const fn realm(&self) -> &RealmContext {
        &self.realm
    }

    /// Credential operations for this user.
    ///
    /// The adapter holds no credentials; validation is dispatched to the
    /// provider passed to the returned manager.
    #[must_use]
    pub fn credential_manager(&self) -> UserCredentialManager<'_, Self> {
        UserCredentialManager::new(&self.realm, self)
    }
}

impl UserModel for RemoteUserAdapter {
    fn id(&self) -> &str {
        &self.host_id
    }

    fn username(&self) -> &str {
        &self.record.user_name
    }

    fn email(&self) -> Option<&str> {
        self.record.email.as_deref()
    }

    fn first_name(&self) -> Option<&str> {
        self.record.first_name.as_deref()
    }

    fn last_name(&self) -> Option<&str> {
        self.record.last_name.as_deref()
    }

    fn is_email_verified(&self) -> bool {
        self.record.email_verified
    }

    fn is_enabled(&self) -> bool {
        self.record.enabled
    }

    fn created_timestamp(&self) -> Option<DateTime<Utc>> {
        self.record.created_timestamp()
    }

    fn federation_link(&self) -> Option<&str> {
        Some(self.key.provider_id())
    }

    fn attributes(&self) -> HashMap<String, Vec<String>> {
        let mut attributes: HashMap<String, Vec<String>> = HashMap::new();
        attributes.insert(USERNAME.to_string(), vec![self.record.user_name.clone()]);
        attributes.insert(EMAIL.to_string(), self.record.email.iter().cloned().collect());
        attributes.insert(
            FIRST_NAME.to_string(),
            self.record.first_name.iter().cloned().collect(),
        );
        attributes.insert(
            LAST_NAME.to_string(),
            self.record.last_name.iter().cloned().collect(),
        );

        for (name, value) in &self.record.attributes {
            attributes
                .entry(name.clone())
                .or_default()
                .push(value.clone());
        }
        attributes
    }

    /// Local grants first, then one role per name in the record's `roles`
    /// field when role materialization is enabled.
    ///
    /// Missing realm roles are created as a side effect. The directory
    /// roles are never stored as grants, and a role granted locally and
    /// asserted by the directory appears twice.
    async fn role_mappings(&self) -> FederationResult<Vec<Role>> {
        let mut roles = self.realm.role_mappings(&self.host_id).await?;
        if !self.config.add_roles_to_token {
            return Ok(roles);
        }

        for name in self.record.role_names() {
            let handle = self.realm.get_or_create_role(name).await?;
            if handle.created {
                detail!(self.config, role = name, realm = self.realm.name(), "Adding role");
            }
            roles.push(handle.role);
        }
        Ok(roles)
    }
}
