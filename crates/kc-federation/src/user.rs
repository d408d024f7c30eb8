//! The host identity contract.
//!
//! Any user the host can authenticate or put into a token implements
//! [`UserModel`], whether it is stored locally or wraps a record fetched
//! from an external directory.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::FederationResult;
use crate::role::Role;

/// Attribute name of the username.
pub const USERNAME: &str = "username";
/// Attribute name of the email address.
pub const EMAIL: &str = "email";
/// Attribute name of the first name.
pub const FIRST_NAME: &str = "firstName";
/// Attribute name of the last name.
pub const LAST_NAME: &str = "lastName";

/// A user as seen by the host.
#[allow(async_fn_in_trait)]
pub trait UserModel: Send + Sync {
    /// Host-side user id.
    fn id(&self) -> &str;

    /// Username.
    fn username(&self) -> &str;

    /// Email address.
    fn email(&self) -> Option<&str>;

    /// First name.
    fn first_name(&self) -> Option<&str>;

    /// Last name.
    fn last_name(&self) -> Option<&str>;

    /// Whether the email has been verified.
    fn is_email_verified(&self) -> bool;

    /// Whether the account is enabled.
    fn is_enabled(&self) -> bool;

    /// When the account was created, if known.
    fn created_timestamp(&self) -> Option<DateTime<Utc>>;

    /// Provider instance this user is federated from, if any.
    fn federation_link(&self) -> Option<&str> {
        None
    }

    /// All attributes, multi-valued.
    fn attributes(&self) -> HashMap<String, Vec<String>>;

    /// Values of one attribute. Names are matched exactly.
    fn attribute_values(&self, name: &str) -> Vec<String> {
        self.attributes().remove(name).unwrap_or_default()
    }

    /// First value of one attribute. Names are matched exactly.
    fn first_attribute(&self, name: &str) -> Option<String> {
        self.attribute_values(name).into_iter().next()
    }

    /// Roles effective for this user, in grant order.
    async fn role_mappings(&self) -> FederationResult<Vec<Role>>;
}
