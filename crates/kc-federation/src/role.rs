//! Roles and the host-owned role capabilities.
//!
//! Federation providers never own role state. They reach the realm's role
//! registry and the local grant store through the traits below, which the
//! host injects via [`RealmContext`](crate::realm::RealmContext).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::FederationResult;

/// A realm role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Unique identifier.
    pub id: Uuid,
    /// Role name (unique within the realm).
    pub name: String,
    /// Role description.
    pub description: Option<String>,
    /// Realm this role belongs to.
    pub realm_id: Uuid,
    /// When the role was created.
    pub created_at: DateTime<Utc>,
}

impl Role {
    /// Creates a new realm role.
    #[must_use]
    pub fn new_realm_role(realm_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            description: None,
            realm_id,
            created_at: Utc::now(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }
}

/// Result of a get-or-create on the role registry.
#[derive(Debug, Clone)]
pub struct RoleHandle {
    /// The resolved role.
    pub role: Role,
    /// Whether the role was created by this call.
    pub created: bool,
}

/// The realm's role registry.
///
/// ## Concurrency
///
/// Several request workers may resolve the same role name at once.
/// Implementations must make [`get_or_create`](Self::get_or_create) atomic:
/// concurrent callers for one name observe a single role, and at most one
/// of them reports `created`. The default method is a plain
/// lookup-then-insert and only satisfies this for single-writer stores.
#[async_trait]
pub trait RoleRegistry: Send + Sync {
    /// Gets a realm role by name.
    async fn get_role(&self, realm_id: Uuid, name: &str) -> FederationResult<Option<Role>>;

    /// Creates a realm role.
    async fn add_role(&self, realm_id: Uuid, name: &str) -> FederationResult<Role>;

    /// Gets a realm role by name, creating it if absent.
    async fn get_or_create(&self, realm_id: Uuid, name: &str) -> FederationResult<RoleHandle> {
        if let Some(role) = self.get_role(realm_id, name).await? {
            return Ok(RoleHandle {
                role,
                created: false,
            });
        }
        let role = self.add_role(realm_id, name).await?;
        Ok(RoleHandle {
            role,
            created: true,
        })
    }
}

/// Role grants the host keeps on local record for a user.
#[async_trait]
pub trait RoleGrantStore: Send + Sync {
    /// Lists the roles granted to a user, keyed by the host's user id.
    async fn role_mappings(&self, realm_id: Uuid, user_id: &str) -> FederationResult<Vec<Role>>;
}

// ============================================================================
// In-memory implementations
// ============================================================================

/// Role registry backed by a concurrent map.
#[derive(Debug, Default)]
pub struct InMemoryRoleRegistry {
    roles: DashMap<(Uuid, String), Role>,
}

impl InMemoryRoleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of roles across all realms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Returns true if no role has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

#[async_trait]
impl RoleRegistry for InMemoryRoleRegistry {
    async fn get_role(&self, realm_id: Uuid, name: &str) -> FederationResult<Option<Role>> {
        Ok(self
            .roles
            .get(&(realm_id, name.to_string()))
            .map(|entry| entry.value().clone()))
    }

    async fn add_role(&self, realm_id: Uuid, name: &str) -> FederationResult<Role> {
        let role = Role::new_realm_role(realm_id, name);
        self.roles.insert((realm_id, name.to_string()), role.clone());
        Ok(role)
    }

    async fn get_or_create(&self, realm_id: Uuid, name: &str) -> FederationResult<RoleHandle> {
        let mut created = false;
        // The entry guard holds the shard lock, so lookup and insert are one step.
        let role = self
            .roles
            .entry((realm_id, name.to_string()))
            .or_insert_with(|| {
                created = true;
                Role::new_realm_role(realm_id, name)
            })
            .value()
            .clone();
        Ok(RoleHandle { role, created })
    }
}

/// Local grant store backed by a concurrent map.
#[derive(Debug, Default)]
pub struct InMemoryRoleGrants {
    grants: DashMap<(Uuid, String), Vec<Role>>,
}

impl InMemoryRoleGrants {
    /// Creates an empty grant store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grants a role to a user.
    pub fn grant(&self, user_id: impl Into<String>, role: Role) {
        self.grants
            .entry((role.realm_id, user_id.into()))
            .or_default()
            .push(role);
    }
}

#[async_trait]
impl RoleGrantStore for InMemoryRoleGrants {
    async fn role_mappings(&self, realm_id: Uuid, user_id: &str) -> FederationResult<Vec<Role>> {
        Ok(self
            .grants
            .get(&(realm_id, user_id.to_string()))
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }
}
