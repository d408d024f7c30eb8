//! Shared fixtures for the remote directory integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use kc_federation::{FederationConfig, InMemoryRoleGrants, InMemoryRoleRegistry, RealmContext};
use kc_federation_remote::config::keys;
use kc_federation_remote::{RemoteUserProvider, RemoteUserProviderFactory};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;
use wiremock::MockServer;

pub const AUTH_USERNAME: &str = "svc-keycloak";
pub const AUTH_PASSWORD: &str = "directory-secret";
pub const USER_AGENT: &str = "Keycloak User Federation SPI";

/// Installs a test subscriber once; `RUST_LOG` controls verbosity.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Test realm with in-memory role capabilities.
pub struct TestRealm {
    pub realm: RealmContext,
    pub registry: Arc<InMemoryRoleRegistry>,
    pub grants: Arc<InMemoryRoleGrants>,
}

impl TestRealm {
    pub fn new() -> Self {
        let registry = Arc::new(InMemoryRoleRegistry::new());
        let grants = Arc::new(InMemoryRoleGrants::new());
        let realm = RealmContext::new(Uuid::now_v7(), "acme", registry.clone(), grants.clone());
        Self {
            realm,
            registry,
            grants,
        }
    }
}

/// Component model pointing at the mock directory.
pub fn component(server: &MockServer) -> FederationConfig {
    FederationConfig::builder()
        .realm_id(Uuid::now_v7())
        .provider_type("remote-user")
        .name("Mock Directory")
        .config(keys::URL, server.uri())
        .config(keys::AUTHORIZATION_USERNAME, AUTH_USERNAME)
        .config(keys::AUTHORIZATION_PASSWORD, AUTH_PASSWORD)
        .config(keys::DEBUG_ENABLED, "true")
        .build()
        .expect("valid component")
}

/// Provider created through the factory, as the host would.
pub fn provider(server: &MockServer) -> RemoteUserProvider {
    init_tracing();
    RemoteUserProviderFactory
        .create(&component(server))
        .expect("provider")
}

pub fn user_json(id: &str, username: &str, roles: &str) -> Value {
    json!({
        "id": id,
        "firstName": "First",
        "lastName": "Last",
        "userName": username,
        "email": format!("{username}@example.com"),
        "emailVerified": true,
        "enabled": true,
        "createdAt": "2024-03-01T12:00:00Z",
        "attributes": {"department": "R&D"},
        "roles": roles
    })
}
