//! HTTP API for the storefront.
//!
//! # Endpoints Overview
//!
//! ## Accounts
//! - `POST /signup` - Create an account (`/users/signup` is an alias)
//! - `POST /login` - Login with email and password (`/users/login` is an alias)
//!
//! ## Catalog
//! - `GET /products` - List every product
//! - `GET /products/search?name=<text>` - Products whose name contains `text`
//!
//! ## Health Check
//! - `GET /health` - Server health status
//!
//! Routes that act on behalf of an account are layered with
//! [`middleware::require_session`].
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use storefront::{
//!     auth::{AccountRegistry, Authenticator, CredentialHasher, TokenConfig, TokenIssuer},
//!     catalog::CatalogSearch,
//!     db::memory::{InMemoryAccountRepository, InMemoryProductRepository},
//! };
//! use storefront_server::api::{create_router, AppState};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let accounts = Arc::new(InMemoryAccountRepository::new());
//! let hasher = Arc::new(CredentialHasher::new("a_pepper_of_16_chars".to_string()));
//! let tokens = Arc::new(TokenIssuer::new(
//!     accounts.clone(),
//!     &TokenConfig::new("a_signing_secret_that_is_long_enough".to_string()),
//! ));
//!
//! let state = AppState {
//!     registry: Arc::new(AccountRegistry::new(accounts.clone(), hasher.clone(), tokens.clone())),
//!     authenticator: Arc::new(Authenticator::new(accounts, hasher, tokens.clone())),
//!     tokens,
//!     catalog: Arc::new(CatalogSearch::new(Arc::new(InMemoryProductRepository::default()))),
//!     database: None,
//! };
//!
//! let app = create_router(state);
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # CORS
//!
//! CORS is configured permissively. In production, configure appropriate
//! origins, methods, and headers.

pub mod auth;
pub mod middleware;
pub mod products;
pub mod request_id;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use storefront::{
    auth::{AccountRegistry, Authenticator, FieldViolation, TokenIssuer},
    catalog::CatalogSearch,
    db::Database,
};
use tower_http::cors::CorsLayer;

/// Application state shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<AccountRegistry>,
    pub authenticator: Arc<Authenticator>,
    /// Verifies session tokens for protected routes
    pub tokens: Arc<TokenIssuer>,
    pub catalog: Arc<CatalogSearch>,
    /// Pool probed by `/health`; `None` when running on in-memory stores
    pub database: Option<Database>,
}

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldViolation>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_fields(error: impl Into<String>, fields: Vec<FieldViolation>) -> Self {
        Self {
            error: error.into(),
            fields,
        }
    }
}

/// Error half of every handler's result
pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn api_error(status: StatusCode, error: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse::new(error)))
}

/// Create the API router with all endpoints and middleware.
///
/// ```text
/// GET  /health                 - Health check
/// POST /signup                 - Create account
/// POST /login                  - Login
/// POST /users/signup           - Alias of /signup
/// POST /users/login            - Alias of /login
/// GET  /products               - List products
/// GET  /products/search?name=  - Search products by name
/// ```
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/signup", post(auth::sign_up))
        .route("/login", post(auth::login))
        .route("/users/signup", post(auth::sign_up))
        .route("/users/login", post(auth::login))
        .route("/products", get(products::list_products))
        .route("/products/search", get(products::search_products))
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint for monitoring and load balancers.
///
/// Returns `200 OK` when the database answers, or `503 Service Unavailable`
/// when it does not.
///
/// ```bash
/// curl http://localhost:8000/health
/// # {"status":"healthy","database":true,"version":"0.1.0","timestamp":"2026-10-16T10:30:00+00:00"}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let db_healthy = match &state.database {
        Some(db) => db.health_check().await.is_ok(),
        None => true,
    };

    let status_code = if db_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if db_healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "database": db_healthy,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}
