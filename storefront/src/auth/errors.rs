//! Authentication error types.

use std::time::Duration;

use thiserror::Error;

use super::validation::ValidationErrors;
use crate::db::timeouts::TimeoutError;

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// One or more sign-up fields are missing or malformed
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Email already registered
    #[error("An account with this email already exists")]
    DuplicateEmail,

    /// Phone number already registered
    #[error("An account with this phone number already exists")]
    DuplicatePhone,

    /// Unknown email or wrong password. Both cases share this variant so callers
    /// cannot tell which credential was wrong.
    #[error("login or password is incorrect")]
    InvalidCredentials,

    /// Account record vanished
    #[error("Account not found")]
    AccountNotFound,

    /// Token signature, expiry or kind did not check out
    #[error("Invalid or expired token")]
    InvalidToken,

    /// Password hashing failed
    #[error("Password hashing failed")]
    HashingFailed,

    /// JWT signing failed
    #[error("Token signing failed: {0}")]
    Signing(jsonwebtoken::errors::Error),

    /// Configured token lifetime puts the expiry past the representable range
    #[error("Token lifetime {0} is out of range")]
    ExpiryOutOfRange(chrono::Duration),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Store operation exceeded the query timeout
    #[error("Store operation timed out after {0:?}")]
    Timeout(Duration),
}

impl AuthError {
    /// Get a client-safe error message that doesn't leak sensitive information
    ///
    /// Store, hashing and signing failures collapse into one opaque message.
    pub fn client_message(&self) -> String {
        match self {
            AuthError::Database(_)
            | AuthError::Timeout(_)
            | AuthError::HashingFailed
            | AuthError::Signing(_)
            | AuthError::ExpiryOutOfRange(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<TimeoutError> for AuthError {
    fn from(err: TimeoutError) -> Self {
        match err {
            TimeoutError::Timeout(duration) => AuthError::Timeout(duration),
            TimeoutError::Database(e) => AuthError::Database(e),
        }
    }
}

impl From<ValidationErrors> for AuthError {
    fn from(errors: ValidationErrors) -> Self {
        AuthError::Validation(errors)
    }
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;
