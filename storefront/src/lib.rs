//! # Storefront
//!
//! Account registration, authentication and session tokens for an online storefront,
//! plus read-only catalog search.
//!
//! ## Core Modules
//!
//! - [`auth`]: credential hashing, token issuance, sign-up and login
//! - [`catalog`]: product listing and name search
//! - [`db`]: PostgreSQL pool, repository traits and their implementations
//!
//! Every component receives its store through a repository trait object, so the
//! PostgreSQL repositories can be swapped for the in-memory ones in [`db::memory`].
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use storefront::auth::{AccountRegistry, CredentialHasher, TokenConfig, TokenIssuer};
//! use storefront::db::memory::InMemoryAccountRepository;
//!
//! let accounts = Arc::new(InMemoryAccountRepository::new());
//! let hasher = Arc::new(CredentialHasher::new("pepper_for_docs".to_string()));
//! let tokens = Arc::new(TokenIssuer::new(
//!     accounts.clone(),
//!     &TokenConfig::new("a_signing_secret_that_is_long_enough".to_string()),
//! ));
//! let registry = AccountRegistry::new(accounts, hasher, tokens);
//! # let _ = registry;
//! ```

/// Account registration, login, password hashing and session tokens.
pub mod auth;

/// Product catalog listing and search.
pub mod catalog;

/// Database pool, repositories and query timeouts.
pub mod db;
