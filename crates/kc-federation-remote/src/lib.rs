//! # kc-federation-remote
//!
//! User federation provider for Keycloak Rust backed by an HTTP user
//! directory.
//!
//! The directory is never replicated: each lookup, search, count or
//! password check is one HTTP round trip, and only the federated identity
//! key is kept by the host. Roles listed on a directory record can be
//! materialized into the user's role mappings on every read.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Emits an `info` event only when the instance has detail logs enabled.
macro_rules! detail {
    ($config:expr, $($arg:tt)+) => {
        if $config.debug_enabled {
            ::tracing::info!($($arg)+);
        }
    };
}

pub mod adapter;
pub mod client;
pub mod config;
pub mod dto;
pub mod error;
pub mod factory;
pub mod provider;

pub use adapter::RemoteUserAdapter;
pub use client::{DirectoryClient, LookupKey};
pub use config::{RemoteConfig, RemoteConfigBuilder};
pub use dto::{CountResult, RemoteUserRecord, VerifyResult};
pub use error::{RemoteError, RemoteResult};
pub use factory::RemoteUserProviderFactory;
pub use provider::RemoteUserProvider;
