//! User storage provider traits.
//!
//! ## NIST 800-53 Rev5 Controls
//!
//! - IA-2: Identification and Authentication (Organizational Users)
//! - IA-5: Authenticator Management
//!
//! A provider implements the capabilities it supports as separate traits,
//! all sharing the [`UserStorageProvider`] base. Lookups and queries return
//! plain values: a provider absorbs directory faults on those paths and
//! answers "absent", "empty" or zero. Credential validation returns a
//! [`FederationResult`] so that a fault can abort the login.

use std::collections::{HashMap, HashSet};

use crate::config::FederationConfig;
use crate::credential::CredentialInput;
use crate::error::FederationResult;
use crate::realm::{Group, RealmContext};
use crate::role::Role;
use crate::user::UserModel;

// ============================================================================
// User Storage Provider
// ============================================================================

/// Base trait for user storage federation providers.
///
/// ## Implementation Notes
///
/// - Providers must be thread-safe (Send + Sync); the host calls one
///   instance from many request workers.
/// - Removal hooks are notifications. A provider that keeps no
///   per-realm state has nothing to clean up.
pub trait UserStorageProvider: Send + Sync {
    /// The user type this provider hands to the host.
    type User: UserModel;

    /// Returns the provider configuration.
    fn config(&self) -> &FederationConfig;

    /// Returns the provider type identifier.
    fn provider_type(&self) -> &'static str;

    /// Called before a realm is removed.
    fn pre_remove_realm(&self, _realm: &RealmContext) {}

    /// Called before a group is removed.
    fn pre_remove_group(&self, _realm: &RealmContext, _group: &Group) {}

    /// Called before a role is removed.
    fn pre_remove_role(&self, _realm: &RealmContext, _role: &Role) {}

    /// Closes the provider, releasing any resources.
    fn close(&self) {}
}

// ============================================================================
// Lookup
// ============================================================================

/// Single-user lookups.
#[allow(async_fn_in_trait)]
pub trait UserLookupProvider: UserStorageProvider {
    /// Gets a user by host-side id.
    async fn get_user_by_id(&self, realm: &RealmContext, id: &str) -> Option<Self::User>;

    /// Gets a user by username.
    async fn get_user_by_username(
        &self,
        realm: &RealmContext,
        username: &str,
    ) -> Option<Self::User>;

    /// Gets a user by email.
    async fn get_user_by_email(&self, realm: &RealmContext, email: &str) -> Option<Self::User>;
}

// ============================================================================
// Query
// ============================================================================

/// Multi-user queries and counts.
#[allow(async_fn_in_trait)]
pub trait UserQueryProvider: UserStorageProvider {
    /// Searches for users with a free-form parameter bag.
    ///
    /// `first` and `max` paginate the result when given.
    async fn search_for_users(
        &self,
        realm: &RealmContext,
        params: &HashMap<String, String>,
        first: Option<usize>,
        max: Option<usize>,
    ) -> Vec<Self::User>;

    /// Searches for users holding an attribute value.
    async fn search_for_users_by_attribute(
        &self,
        realm: &RealmContext,
        name: &str,
        value: &str,
    ) -> Vec<Self::User>;

    /// Lists members of a group.
    async fn group_members(
        &self,
        realm: &RealmContext,
        group: &Group,
        first: Option<usize>,
        max: Option<usize>,
    ) -> Vec<Self::User>;

    /// Lists users holding a role.
    async fn role_members(
        &self,
        realm: &RealmContext,
        role: &Role,
        first: Option<usize>,
        max: Option<usize>,
    ) -> Vec<Self::User>;

    /// Counts all users.
    async fn users_count(&self, realm: &RealmContext) -> usize;

    /// Counts users in any of the given groups.
    async fn users_count_in_groups(
        &self,
        realm: &RealmContext,
        group_ids: &HashSet<String>,
    ) -> usize;

    /// Counts users matching a parameter bag.
    async fn users_count_by_params(
        &self,
        realm: &RealmContext,
        params: &HashMap<String, String>,
    ) -> usize;

    /// Counts users matching a parameter bag within the given groups.
    async fn users_count_by_params_in_groups(
        &self,
        realm: &RealmContext,
        params: &HashMap<String, String>,
        group_ids: &HashSet<String>,
    ) -> usize;

    /// Counts users, optionally including service accounts.
    async fn users_count_with_service_accounts(
        &self,
        realm: &RealmContext,
        include_service_accounts: bool,
    ) -> usize;
}

// ============================================================================
// Credential Validation
// ============================================================================

/// Validates credentials against the external store.
///
/// ## NIST 800-53 Rev5: IA-5
///
/// Implementations must not log or store the challenge response.
#[allow(async_fn_in_trait)]
pub trait CredentialInputValidator: UserStorageProvider {
    /// Checks whether a credential type is handled by this provider.
    fn supports_credential_type(&self, credential_type: &str) -> bool;

    /// Checks whether a user has a credential of this type configured.
    async fn is_configured_for<U: UserModel>(
        &self,
        realm: &RealmContext,
        user: &U,
        credential_type: &str,
    ) -> bool;

    /// Validates a credential.
    ///
    /// Returns `Ok(false)` for a rejected credential and `Err` when the
    /// check itself could not be completed.
    async fn is_valid<U: UserModel>(
        &self,
        realm: &RealmContext,
        user: &U,
        input: &CredentialInput,
    ) -> FederationResult<bool>;
}

// ============================================================================
// Registration
// ============================================================================

/// Creates and removes users in the external store.
#[allow(async_fn_in_trait)]
pub trait UserRegistrationProvider: UserStorageProvider {
    /// Creates a user. Returns `None` if the provider did not create one.
    async fn add_user(&self, realm: &RealmContext, username: &str) -> Option<Self::User>;

    /// Removes a user. Returns true if the user was removed.
    async fn remove_user<U: UserModel>(&self, realm: &RealmContext, user: &U) -> bool;
}
