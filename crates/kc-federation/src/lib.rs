//! # kc-federation
//!
//! User federation framework for Keycloak Rust.
//!
//! This crate defines what the host expects from a user federation
//! provider: the capability traits, the identity contract a federated user
//! satisfies, the federated identity key the host persists instead of the
//! user, and the role capabilities a provider may use without owning them.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod credential;
pub mod error;
pub mod key;
pub mod provider;
pub mod realm;
pub mod role;
pub mod user;

pub use config::{FederationConfig, FederationConfigBuilder};
pub use credential::{CredentialInput, UserCredentialManager};
pub use error::{FederationError, FederationResult};
pub use key::FederatedIdentityKey;
pub use provider::{
    CredentialInputValidator, UserLookupProvider, UserQueryProvider, UserRegistrationProvider,
    UserStorageProvider,
};
pub use realm::{Group, RealmContext};
pub use role::{
    InMemoryRoleGrants, InMemoryRoleRegistry, Role, RoleGrantStore, RoleHandle, RoleRegistry,
};
pub use user::UserModel;
