//! End-to-end provider behavior against a mock HTTP directory.

mod common;

use std::collections::{HashMap, HashSet};

use kc_federation::{
    CredentialInput, CredentialInputValidator, FederationError, Role, UserLookupProvider,
    UserModel, UserQueryProvider,
};
use serde_json::json;
use wiremock::matchers::{basic_auth, body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{user_json, TestRealm, AUTH_PASSWORD, AUTH_USERNAME};

async fn mount_alice(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("type", "username"))
        .and(query_param("username", "alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("42", "alice", "admin,,auditor")))
        .mount(server)
        .await;
}

// ============================================================================
// Lookup
// ============================================================================

#[tokio::test]
async fn username_lookup_yields_federated_user() {
    let server = MockServer::start().await;
    mount_alice(&server).await;
    let provider = common::provider(&server);
    let test = TestRealm::new();

    let user = provider
        .get_user_by_username(&test.realm, "alice")
        .await
        .expect("alice");

    assert_eq!(user.id(), format!("f:{}:42", provider.id()));
    assert_eq!(user.federation_link(), Some(provider.id()));
    assert_eq!(user.username(), "alice");
    assert_eq!(user.first_attribute("department").as_deref(), Some("R&D"));
    assert!(user.created_timestamp().is_some());
}

#[tokio::test]
async fn federated_id_lookup_sends_external_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("type", "id"))
        .and(query_param("id", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("42", "alice", "")))
        .expect(2)
        .mount(&server)
        .await;
    let provider = common::provider(&server);
    let test = TestRealm::new();

    let key = format!("f:{}:42", provider.id());
    let by_key = provider.get_user_by_id(&test.realm, &key).await.unwrap();
    let by_raw = provider.get_user_by_id(&test.realm, "42").await.unwrap();

    assert_eq!(by_key.id(), by_raw.id());
}

#[tokio::test]
async fn missing_user_is_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let provider = common::provider(&server);
    let test = TestRealm::new();

    assert!(provider.get_user_by_email(&test.realm, "nobody@example.com").await.is_none());
}

// ============================================================================
// Roles
// ============================================================================

#[tokio::test]
async fn directory_roles_are_materialized_on_read() {
    let server = MockServer::start().await;
    mount_alice(&server).await;
    let provider = common::provider(&server);
    let test = TestRealm::new();

    let user = provider.get_user_by_username(&test.realm, "alice").await.unwrap();
    let names: Vec<String> = user
        .role_mappings()
        .await
        .unwrap()
        .into_iter()
        .map(|role| role.name)
        .collect();

    assert_eq!(names, vec!["admin", "auditor"]);
    assert_eq!(test.registry.len(), 2);

    // A second read reuses the roles created by the first.
    let again = provider.get_user_by_username(&test.realm, "alice").await.unwrap();
    assert_eq!(again.role_mappings().await.unwrap().len(), 2);
    assert_eq!(test.registry.len(), 2);
}

#[tokio::test]
async fn local_grants_come_first() {
    let server = MockServer::start().await;
    mount_alice(&server).await;
    let provider = common::provider(&server);
    let test = TestRealm::new();
    let local = Role::new_realm_role(test.realm.id(), "local-only");
    test.grants
        .grant(&format!("f:{}:42", provider.id()), local.clone());

    let user = provider.get_user_by_username(&test.realm, "alice").await.unwrap();
    let roles = user.role_mappings().await.unwrap();

    assert_eq!(roles[0], local);
    assert_eq!(roles.len(), 3);
}

// ============================================================================
// Search and count
// ============================================================================

#[tokio::test]
async fn search_defaults_method_to_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("method", "user"))
        .and(query_param("q", "a"))
        .and(query_param("skip", "0"))
        .and(query_param("take", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            user_json("1", "ann", ""),
            user_json("2", "amy", ""),
            user_json("3", "abe", "")
        ])))
        .expect(1)
        .mount(&server)
        .await;
    let provider = common::provider(&server);
    let test = TestRealm::new();

    let params = HashMap::from([("q".to_string(), "a".to_string())]);
    let users = provider
        .search_for_users(&test.realm, &params, Some(0), Some(2))
        .await;

    let names: Vec<&str> = users.iter().map(|user| user.username()).collect();
    assert_eq!(names, vec!["ann", "amy"]);
}

#[tokio::test]
async fn search_keeps_caller_method() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("method", "custom"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    let provider = common::provider(&server);
    let test = TestRealm::new();

    let params = HashMap::from([("method".to_string(), "custom".to_string())]);
    assert!(provider
        .search_for_users(&test.realm, &params, None, None)
        .await
        .is_empty());
}

#[tokio::test]
async fn search_fault_returns_no_users() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let provider = common::provider(&server);
    let test = TestRealm::new();

    assert!(provider
        .search_for_users(&test.realm, &HashMap::new(), Some(0), Some(10))
        .await
        .is_empty());
}

#[tokio::test]
async fn role_members_queries_by_role_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("method", "role"))
        .and(query_param("role", "admin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([user_json("42", "alice", "admin")])))
        .expect(1)
        .mount(&server)
        .await;
    let provider = common::provider(&server);
    let test = TestRealm::new();
    let admin = Role::new_realm_role(test.realm.id(), "admin");

    let members = provider.role_members(&test.realm, &admin, None, None).await;

    assert_eq!(members.len(), 1);
    assert_eq!(members[0].username(), "alice");
}

#[tokio::test]
async fn every_count_shape_reads_total() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total": 42})))
        .mount(&server)
        .await;
    let provider = common::provider(&server);
    let test = TestRealm::new();
    let groups = HashSet::from(["g1".to_string(), "g2".to_string()]);
    let params = HashMap::from([("enabled".to_string(), "true".to_string())]);

    assert_eq!(provider.users_count(&test.realm).await, 42);
    assert_eq!(provider.users_count_in_groups(&test.realm, &groups).await, 42);
    assert_eq!(provider.users_count_by_params(&test.realm, &params).await, 42);
    assert_eq!(
        provider
            .users_count_by_params_in_groups(&test.realm, &params, &groups)
            .await,
        42
    );
    assert_eq!(provider.users_count_with_service_accounts(&test.realm, true).await, 42);
}

#[tokio::test]
async fn count_fault_is_zero() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/count"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let provider = common::provider(&server);
    let test = TestRealm::new();

    assert_eq!(provider.users_count(&test.realm).await, 0);
}

// ============================================================================
// Credentials
// ============================================================================

async fn mount_verify(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/auth"))
        .and(basic_auth(AUTH_USERNAME, AUTH_PASSWORD))
        .and(body_json(json!({"username": "alice", "password": "s3cret"})))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn credential_manager_dispatches_to_provider() {
    let server = MockServer::start().await;
    mount_alice(&server).await;
    mount_verify(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"valid": true})),
    )
    .await;
    let provider = common::provider(&server);
    let test = TestRealm::new();

    let user = provider.get_user_by_username(&test.realm, "alice").await.unwrap();
    let manager = user.credential_manager();

    assert!(manager
        .is_valid(&provider, &CredentialInput::password("s3cret"))
        .await
        .unwrap());
    assert!(manager.is_configured_for(&provider, "password").await);
}

#[tokio::test]
async fn rejected_password_is_false() {
    let server = MockServer::start().await;
    mount_alice(&server).await;
    mount_verify(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"valid": false})),
    )
    .await;
    let provider = common::provider(&server);
    let test = TestRealm::new();

    let user = provider.get_user_by_username(&test.realm, "alice").await.unwrap();
    let valid = provider
        .is_valid(&test.realm, &user, &CredentialInput::password("s3cret"))
        .await
        .unwrap();

    assert!(!valid);
}

#[tokio::test]
async fn non_password_credential_never_reaches_directory() {
    let server = MockServer::start().await;
    mount_alice(&server).await;
    Mock::given(method("POST"))
        .and(path("/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"valid": true})))
        .expect(0)
        .mount(&server)
        .await;
    let provider = common::provider(&server);
    let test = TestRealm::new();

    let user = provider.get_user_by_username(&test.realm, "alice").await.unwrap();
    let valid = provider
        .is_valid(&test.realm, &user, &CredentialInput::new("otp", "123456"))
        .await
        .unwrap();

    assert!(!valid);
}

#[tokio::test]
async fn directory_fault_aborts_verification() {
    let server = MockServer::start().await;
    mount_alice(&server).await;
    mount_verify(&server, ResponseTemplate::new(503)).await;
    let provider = common::provider(&server);
    let test = TestRealm::new();

    let user = provider.get_user_by_username(&test.realm, "alice").await.unwrap();
    let err = provider
        .is_valid(&test.realm, &user, &CredentialInput::password("s3cret"))
        .await
        .unwrap_err();

    assert!(matches!(err, FederationError::VerificationFault(_)));
    assert!(err.is_directory_fault());
    assert!(err.to_string().contains("Remote server error"));
}

#[tokio::test]
async fn unauthorized_verify_response_aborts_instead_of_rejecting() {
    let server = MockServer::start().await;
    mount_alice(&server).await;
    mount_verify(
        &server,
        ResponseTemplate::new(401).set_body_json(json!({"valid": false})),
    )
    .await;
    let provider = common::provider(&server);
    let test = TestRealm::new();

    let user = provider.get_user_by_username(&test.realm, "alice").await.unwrap();
    let err = user
        .credential_manager()
        .is_valid(&provider, &CredentialInput::password("s3cret"))
        .await
        .unwrap_err();

    assert!(matches!(err, FederationError::VerificationFault(_)));
}
