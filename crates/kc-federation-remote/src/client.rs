//! HTTP client for the remote user directory.
//!
//! Every call is one round trip. There is no retry, no cache and no
//! custom timeout. The failure policy differs per operation:
//!
//! | Operation | On fault |
//! |-----------|----------|
//! | lookup    | absent   |
//! | count     | zero     |
//! | search    | `Err`    |
//! | verify    | `Err`    |
//!
//! The `try_*` variants of lookup and count keep the fault visible for
//! callers that need to tell "absent" from "unreachable".

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::header::USER_AGENT;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::config::RemoteConfig;
use crate::dto::{CountResult, RemoteUserRecord, VerifyRequest, VerifyResult};
use crate::error::{RemoteError, RemoteResult};

/// Client identifier sent with every request.
pub const CLIENT_USER_AGENT: &str = "Keycloak User Federation SPI";

/// Query parameter carrying the search offset.
pub const SKIP_PARAM: &str = "skip";
/// Query parameter carrying the search limit.
pub const TAKE_PARAM: &str = "take";

/// How a single user is looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKey<'a> {
    /// By directory-native id.
    Id(&'a str),
    /// By username.
    Username(&'a str),
    /// By email address.
    Email(&'a str),
}

impl<'a> LookupKey<'a> {
    /// Value of the `type` query parameter, which also names the value parameter.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Id(_) => "id",
            Self::Username(_) => "username",
            Self::Email(_) => "email",
        }
    }

    /// The looked-up value.
    #[must_use]
    pub const fn value(&self) -> &'a str {
        match self {
            Self::Id(v) | Self::Username(v) | Self::Email(v) => v,
        }
    }

    fn query(&self) -> [(&'static str, &'a str); 2] {
        [("type", self.kind()), (self.kind(), self.value())]
    }
}

/// Client for one remote directory.
///
/// Cheap to clone; the connection pool and configuration are shared.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    http: Client,
    config: Arc<RemoteConfig>,
}

impl DirectoryClient {
    /// Creates a client for a validated configuration.
    pub fn new(config: Arc<RemoteConfig>) -> RemoteResult<Self> {
        let http = Client::builder().build()?;
        Ok(Self { http, config })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    // === Lookup ===

    /// Looks up a single user. Any fault is reported as absent.
    pub async fn lookup(&self, key: LookupKey<'_>) -> Option<RemoteUserRecord> {
        match self.try_lookup(key).await {
            Ok(record) => record,
            Err(e) => {
                tracing::debug!(
                    lookup = key.kind(),
                    error = %e,
                    "Directory lookup failed, treating user as absent"
                );
                None
            }
        }
    }

    /// Looks up a single user, keeping faults distinct from absence.
    pub async fn try_lookup(&self, key: LookupKey<'_>) -> RemoteResult<Option<RemoteUserRecord>> {
        let url = self.config.find_url();
        let request = self.get(&url).query(&key.query());
        fetch_json(request, &url).await
    }

    /// Looks up a user by directory-native id.
    pub async fn lookup_by_id(&self, id: &str) -> Option<RemoteUserRecord> {
        self.lookup(LookupKey::Id(id)).await
    }

    /// Looks up a user by username.
    pub async fn lookup_by_username(&self, username: &str) -> Option<RemoteUserRecord> {
        self.lookup(LookupKey::Username(username)).await
    }

    /// Looks up a user by email.
    pub async fn lookup_by_email(&self, email: &str) -> Option<RemoteUserRecord> {
        self.lookup(LookupKey::Email(email)).await
    }

    // === Search ===

    /// Searches for users.
    ///
    /// The caller's parameters are copied, never modified. `offset` and
    /// `limit` are sent as `skip` and `take`. A response longer than
    /// `limit` is truncated.
    pub async fn search(
        &self,
        params: &HashMap<String, String>,
        offset: Option<usize>,
        limit: Option<usize>,
    ) -> RemoteResult<Vec<RemoteUserRecord>> {
        let mut query = params.clone();
        if let Some(offset) = offset {
            query.insert(SKIP_PARAM.to_string(), offset.to_string());
        }
        if let Some(limit) = limit {
            query.insert(TAKE_PARAM.to_string(), limit.to_string());
        }

        let url = self.config.search_url();
        let request = self.get(&url).query(&query);
        let mut records: Vec<RemoteUserRecord> =
            fetch_json(request, &url).await?.unwrap_or_default();

        if let Some(limit) = limit {
            records.truncate(limit);
        }
        Ok(records)
    }

    // === Count ===

    /// Counts users. Any fault is reported as zero.
    pub async fn count(&self, params: Option<&HashMap<String, String>>) -> CountResult {
        match self.try_count(params).await {
            Ok(count) => count,
            Err(e) => {
                tracing::debug!(error = %e, "Directory count failed, reporting zero");
                CountResult::default()
            }
        }
    }

    /// Counts users, keeping faults visible.
    pub async fn try_count(
        &self,
        params: Option<&HashMap<String, String>>,
    ) -> RemoteResult<CountResult> {
        let url = self.config.count_url();
        let mut request = self.get(&url);
        if let Some(params) = params {
            request = request.query(params);
        }
        Ok(fetch_json(request, &url).await?.unwrap_or_default())
    }

    // === Verify ===

    /// Verifies a username and password.
    ///
    /// Faults are returned as errors, never as `valid: false`. An empty
    /// response body is a rejection.
    pub async fn verify(&self, username: &str, password: &str) -> RemoteResult<VerifyResult> {
        let url = self.config.verify_url();
        let request = self
            .http
            .post(&url)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .basic_auth(&self.config.auth_username, Some(&self.config.auth_password))
            .json(&VerifyRequest { username, password });

        Ok(fetch_json(request, &url).await?.unwrap_or_default())
    }

    /// Builds a GET request with the client identifier and, if configured,
    /// basic auth.
    fn get(&self, url: &str) -> RequestBuilder {
        let request = self.http.get(url).header(USER_AGENT, CLIENT_USER_AGENT);
        if self.config.has_credentials() {
            request.basic_auth(&self.config.auth_username, Some(&self.config.auth_password))
        } else {
            request
        }
    }
}

/// Sends a request and decodes a JSON body. An empty body decodes to `None`.
async fn fetch_json<T: DeserializeOwned>(
    request: RequestBuilder,
    url: &str,
) -> RemoteResult<Option<T>> {
    let response = request.send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(RemoteError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let body = response.text().await?;
    if body.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(&body)?))
}
