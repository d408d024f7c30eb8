//! Wire types of the directory's HTTP contract.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A user record as returned by the directory.
///
/// Only ever produced by decoding a response. Never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteUserRecord {
    /// Directory-native id, unique within the directory.
    pub id: String,

    /// First name.
    #[serde(default)]
    pub first_name: Option<String>,

    /// Last name.
    #[serde(default)]
    pub last_name: Option<String>,

    /// Username.
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_name: String,

    /// Email address.
    #[serde(default)]
    pub email: Option<String>,

    /// Whether the email has been verified.
    #[serde(default, deserialize_with = "null_as_default")]
    pub email_verified: bool,

    /// Whether the account is enabled.
    #[serde(default, deserialize_with = "null_as_default")]
    pub enabled: bool,

    /// Creation timestamp as sent by the directory.
    #[serde(default)]
    pub created_at: Option<String>,

    /// Free-form single-valued attributes.
    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: HashMap<String, String>,

    /// Comma-separated role names.
    #[serde(default, deserialize_with = "null_as_default")]
    pub roles: String,
}

impl RemoteUserRecord {
    /// Creates a record with only an id and a username.
    #[must_use]
    pub fn new(id: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            first_name: None,
            last_name: None,
            user_name: user_name.into(),
            email: None,
            email_verified: false,
            enabled: false,
            created_at: None,
            attributes: HashMap::new(),
            roles: String::new(),
        }
    }

    /// Role names in directory order.
    ///
    /// Names are neither trimmed nor deduplicated. Empty segments are skipped.
    pub fn role_names(&self) -> impl Iterator<Item = &str> {
        self.roles.split(',').filter(|name| !name.is_empty())
    }

    /// Parses the creation timestamp as RFC 3339.
    #[must_use]
    pub fn created_timestamp(&self) -> Option<DateTime<Utc>> {
        self.created_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|ts| ts.with_timezone(&Utc))
    }
}

/// Response of the count endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResult {
    /// Number of matching users.
    #[serde(default)]
    pub total: u64,
}

impl CountResult {
    /// Returns the total as a host-side count.
    #[must_use]
    pub fn as_usize(&self) -> usize {
        usize::try_from(self.total).unwrap_or(usize::MAX)
    }
}

/// Response of the verify endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResult {
    /// Whether the password matched.
    #[serde(default)]
    pub valid: bool,
}

/// Body of the verify request.
#[derive(Clone, Serialize)]
pub struct VerifyRequest<'a> {
    /// Username to verify.
    pub username: &'a str,
    /// Password to verify.
    pub password: &'a str,
}

impl fmt::Debug for VerifyRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifyRequest")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
