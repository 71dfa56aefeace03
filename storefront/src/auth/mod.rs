//! Authentication module providing account sign-up, login and session tokens.
//!
//! This module implements:
//! - Argon2id password hashing with server-side pepper
//! - HS256 JWT session tokens (24-hour expiry by default)
//! - HS256 JWT refresh tokens (7-day expiry by default)
//! - Email and phone uniqueness backed by store constraints
//! - Login failures that never reveal which credential was wrong
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use storefront::auth::{
//!     AccountRegistry, Authenticator, CredentialHasher, LoginRequest, SignUpRequest,
//!     TokenConfig, TokenIssuer,
//! };
//! use storefront::db::{Database, DatabaseConfig, PgAccountRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env();
//!     let db = Database::new(&config).await?;
//!     let accounts = Arc::new(PgAccountRepository::new(db.pool().clone(), config.query_timeout()));
//!
//!     let hasher = Arc::new(CredentialHasher::new("secret_pepper".to_string()));
//!     let tokens = Arc::new(TokenIssuer::new(
//!         accounts.clone(),
//!         &TokenConfig::new("jwt_secret".to_string()),
//!     ));
//!     let registry = AccountRegistry::new(accounts.clone(), hasher.clone(), tokens.clone());
//!     let authenticator = Authenticator::new(accounts, hasher, tokens);
//!
//!     registry
//!         .sign_up(SignUpRequest {
//!             first_name: Some("Ada".to_string()),
//!             last_name: Some("Lovelace".to_string()),
//!             email: Some("ada@example.com".to_string()),
//!             phone: Some("555-0100".to_string()),
//!             password: Some("engines".to_string()),
//!         })
//!         .await?;
//!
//!     let account = authenticator
//!         .login(LoginRequest {
//!             email: "ada@example.com".to_string(),
//!             password: "engines".to_string(),
//!         })
//!         .await?;
//!     println!("Logged in {}", account.id);
//!     Ok(())
//! }
//! ```

pub mod authenticator;
pub mod errors;
pub mod hasher;
pub mod models;
pub mod registry;
pub mod tokens;
pub mod validation;

pub use authenticator::Authenticator;
pub use errors::{AuthError, AuthResult};
pub use hasher::{CredentialHasher, HashParams};
pub use models::{
    Account, AccountId, AccountView, Address, CartItem, LoginRequest, Order, PaymentMethod,
    RefreshClaims, SessionClaims, SessionTokens, SignUpRequest, TokenKind,
};
pub use registry::{AccountRegistry, SignUpStage};
pub use tokens::{TokenConfig, TokenIssuer};
pub use validation::{FieldViolation, ValidationErrors};
