//! Realm handle passed to federation providers.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::error::FederationResult;
use crate::role::{Role, RoleGrantStore, RoleHandle, RoleRegistry};

/// The realm a federation call runs in, together with its role capabilities.
///
/// Cheap to clone; the capabilities are shared.
#[derive(Clone)]
pub struct RealmContext {
    id: Uuid,
    name: String,
    roles: Arc<dyn RoleRegistry>,
    grants: Arc<dyn RoleGrantStore>,
}

impl RealmContext {
    /// Creates a realm handle.
    #[must_use]
    pub fn new(
        id: Uuid,
        name: impl Into<String>,
        roles: Arc<dyn RoleRegistry>,
        grants: Arc<dyn RoleGrantStore>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            roles,
            grants,
        }
    }

    /// Returns the realm ID.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the realm name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets a realm role by name.
    pub async fn get_role(&self, name: &str) -> FederationResult<Option<Role>> {
        self.roles.get_role(self.id, name).await
    }

    /// Gets a realm role by name, creating it if absent.
    pub async fn get_or_create_role(&self, name: &str) -> FederationResult<RoleHandle> {
        self.roles.get_or_create(self.id, name).await
    }

    /// Lists the roles granted locally to a user.
    pub async fn role_mappings(&self, user_id: &str) -> FederationResult<Vec<Role>> {
        self.grants.role_mappings(self.id, user_id).await
    }
}

impl fmt::Debug for RealmContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RealmContext")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A group reference, as handed to providers by membership queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Unique identifier.
    pub id: Uuid,
    /// Group name.
    pub name: String,
}

impl Group {
    /// Creates a group reference.
    #[must_use]
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
