//! Account API handlers.
//!
//! # Examples
//!
//! Sign up:
//! ```bash
//! curl -X POST http://localhost:8000/signup \
//!   -H "Content-Type: application/json" \
//!   -d '{"first_name": "Ada", "last_name": "Lovelace", "email": "ada@example.com",
//!        "phone": "555-0100", "password": "secret"}'
//! ```
//!
//! Login:
//! ```bash
//! curl -X POST http://localhost:8000/login \
//!   -H "Content-Type: application/json" \
//!   -d '{"email": "ada@example.com", "password": "secret"}'
//! ```

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use storefront::auth::{AccountView, AuthError, LoginRequest, SignUpRequest};

use super::{ApiError, AppState, ErrorResponse, api_error, request_id::RequestId};
use crate::{logging::log_security_event, metrics};

/// Body returned by a successful sign-up
pub const SIGN_UP_SUCCESS: &str = "Successfully signed in!";

/// Body returned when sign-up fails on the server side
pub const SIGN_UP_FAILED: &str = "Account was not created";

/// Create an account.
///
/// # Response
///
/// `201 Created` with the body `"Successfully signed in!"`.
///
/// # Errors
///
/// - `400 Bad Request`: Malformed JSON, invalid fields (listed in `fields`),
///   or email/phone already registered
/// - `500 Internal Server Error`: The account could not be stored
pub async fn sign_up(
    State(state): State<AppState>,
    request_id: RequestId,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<&'static str>), ApiError> {
    let Json(candidate) = payload.map_err(|rejection| {
        metrics::signup_attempts_total("invalid");
        api_error(StatusCode::BAD_REQUEST, rejection.body_text())
    })?;

    match state.registry.sign_up(candidate).await {
        Ok(_) => {
            metrics::signup_attempts_total("created");
            Ok((StatusCode::CREATED, Json(SIGN_UP_SUCCESS)))
        }
        Err(AuthError::Validation(errors)) => {
            metrics::signup_attempts_total("invalid");
            Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_fields(
                    "Validation failed",
                    errors.into_vec(),
                )),
            ))
        }
        Err(e @ (AuthError::DuplicateEmail | AuthError::DuplicatePhone)) => {
            metrics::signup_attempts_total("duplicate");
            Err(api_error(StatusCode::BAD_REQUEST, e.client_message()))
        }
        Err(e) => {
            metrics::signup_attempts_total("error");
            tracing::error!(request_id = %request_id.as_str(), "Sign-up failed: {}", e);
            Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, SIGN_UP_FAILED))
        }
    }
}

/// Authenticate with email and password.
///
/// # Response
///
/// `302 Found` with the account (password hash omitted) carrying a freshly
/// issued token pair.
///
/// # Errors
///
/// - `400 Bad Request`: Malformed JSON
/// - `500 Internal Server Error`: Incorrect credentials or server failure
pub async fn login(
    State(state): State<AppState>,
    request_id: RequestId,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AccountView>), ApiError> {
    let Json(request) =
        payload.map_err(|rejection| api_error(StatusCode::BAD_REQUEST, rejection.body_text()))?;
    let email = request.email.clone();

    match state.authenticator.login(request).await {
        Ok(account) => {
            metrics::login_attempts_total(true);
            Ok((StatusCode::FOUND, Json(account)))
        }
        Err(e) => {
            metrics::login_attempts_total(false);
            if matches!(e, AuthError::InvalidCredentials) {
                log_security_event("failed_login", Some(&email), "Invalid credentials");
            } else {
                tracing::error!(request_id = %request_id.as_str(), "Login failed: {}", e);
            }
            Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, e.client_message()))
        }
    }
}
