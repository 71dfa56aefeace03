//! Session middleware for protected endpoints.
//!
//! Validates the session token and injects the [`AuthenticatedAccount`] into
//! request extensions for downstream handlers.
//!
//! # Usage
//!
//! ```rust,no_run
//! use axum::{Router, routing::get, middleware};
//! # use storefront_server::api::middleware::{require_session, AuthenticatedAccount};
//! # use storefront_server::api::AppState;
//! # let state: AppState = unimplemented!();
//!
//! async fn cart(account: AuthenticatedAccount) -> String {
//!     format!("Cart of {}", account.email)
//! }
//!
//! let protected: Router = Router::new()
//!     .route("/cart", get(cart))
//!     .layer(middleware::from_fn_with_state(state.clone(), require_session))
//!     .with_state(state);
//! # let _ = protected;
//! ```

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use storefront::auth::AccountId;

use super::AppState;
use crate::logging::log_security_event;

/// Alternative header carrying the bare session token
pub const TOKEN_HEADER: &str = "token";

/// Identity taken from a verified session token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedAccount {
    pub account_id: AccountId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// `Authorization: Bearer <jwt>` first, then the `token` header
fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .or_else(|| {
            headers
                .get(TOKEN_HEADER)
                .and_then(|value| value.to_str().ok())
        })
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Reject requests without a valid session token.
///
/// - **Success**: Injects `AuthenticatedAccount` → Calls next handler
/// - **Missing token**: Returns `401 Unauthorized`
/// - **Invalid, expired or refresh token**: Returns `401 Unauthorized`
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(token) = session_token(request.headers()) else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    let claims = match state.tokens.verify_session(token) {
        Ok(claims) => claims,
        Err(_) => {
            log_security_event("invalid_token", None, "Rejected session token");
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    request.extensions_mut().insert(AuthenticatedAccount {
        account_id: claims.sub,
        email: claims.email,
        first_name: claims.first_name,
        last_name: claims.last_name,
    });
    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for AuthenticatedAccount
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedAccount>()
            .cloned()
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_extracted() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(session_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn test_token_header_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, HeaderValue::from_static("abc.def.ghi"));
        assert_eq!(session_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn test_non_bearer_authorization_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert_eq!(session_token(&headers), None);
    }

    #[test]
    fn test_empty_token_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, HeaderValue::from_static("  "));
        assert_eq!(session_token(&headers), None);
    }
}
