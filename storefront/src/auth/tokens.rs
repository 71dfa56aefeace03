//! Session and refresh token issuance.

use std::sync::Arc;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use log::debug;
use uuid::Uuid;

use super::{
    errors::{AuthError, AuthResult},
    models::{AccountId, RefreshClaims, SessionClaims, SessionTokens, TokenKind},
};
use crate::db::AccountRepository;

/// Token signing configuration
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// HMAC secret shared by signing and verification
    pub secret: String,
    pub session_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl TokenConfig {
    /// Configuration with the default lifetimes: 24 hours for session tokens,
    /// 7 days for refresh tokens
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            session_ttl: Duration::hours(24),
            refresh_ttl: Duration::hours(168),
        }
    }
}

/// Issues, verifies and persists session/refresh token pairs
#[derive(Clone)]
pub struct TokenIssuer {
    accounts: Arc<dyn AccountRepository>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    session_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    /// Create a new token issuer
    ///
    /// # Arguments
    ///
    /// * `accounts` - Account store the refreshed pairs are written to
    /// * `config` - Signing secret and token lifetimes
    pub fn new(accounts: Arc<dyn AccountRepository>, config: &TokenConfig) -> Self {
        Self {
            accounts,
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            session_ttl: config.session_ttl,
            refresh_ttl: config.refresh_ttl,
        }
    }

    /// Sign a fresh session/refresh token pair for an identity
    ///
    /// # Errors
    ///
    /// * `AuthError::Signing` - JWT encoding failed
    /// * `AuthError::ExpiryOutOfRange` - A lifetime overflows the clock
    pub fn issue(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
        account_id: AccountId,
    ) -> AuthResult<SessionTokens> {
        let now = Utc::now();
        let session_exp = expiry(now, self.session_ttl)?;
        let refresh_exp = expiry(now, self.refresh_ttl)?;

        let session = SessionClaims {
            sub: account_id,
            email: email.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            typ: TokenKind::Session,
            jti: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: session_exp,
        };

        let refresh = RefreshClaims {
            sub: account_id,
            typ: TokenKind::Refresh,
            jti: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: refresh_exp,
        };

        let header = Header::new(Algorithm::HS256);
        let token = encode(&header, &session, &self.encoding_key).map_err(AuthError::Signing)?;
        let refresh_token =
            encode(&header, &refresh, &self.encoding_key).map_err(AuthError::Signing)?;

        Ok(SessionTokens {
            token,
            refresh_token,
        })
    }

    /// Persist a token pair onto an account and bump its `updated_at`
    ///
    /// # Returns
    ///
    /// * `AuthResult<DateTime<Utc>>` - The `updated_at` that was written
    ///
    /// # Errors
    ///
    /// * `AuthError::AccountNotFound` - No account has this ID
    pub async fn refresh(
        &self,
        tokens: &SessionTokens,
        account_id: AccountId,
    ) -> AuthResult<DateTime<Utc>> {
        let updated_at = Utc::now().trunc_subsecs(0);
        self.accounts
            .update_tokens(account_id, tokens, updated_at)
            .await?;

        debug!("Stored refreshed tokens for account {}", account_id);
        Ok(updated_at)
    }

    /// Verify a session token and return its claims
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidToken` - Bad signature, expired, or not a session token
    pub fn verify_session(&self, token: &str) -> AuthResult<SessionClaims> {
        let claims = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| AuthError::InvalidToken)?
            .claims;

        if claims.typ != TokenKind::Session {
            return Err(AuthError::InvalidToken);
        }
        Ok(claims)
    }

    /// Verify a refresh token and return its claims
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidToken` - Bad signature, expired, or not a refresh token
    pub fn verify_refresh(&self, token: &str) -> AuthResult<RefreshClaims> {
        let claims = decode::<RefreshClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| AuthError::InvalidToken)?
            .claims;

        if claims.typ != TokenKind::Refresh {
            return Err(AuthError::InvalidToken);
        }
        Ok(claims)
    }
}

fn expiry(now: DateTime<Utc>, ttl: Duration) -> AuthResult<i64> {
    now.checked_add_signed(ttl)
        .map(|exp| exp.timestamp())
        .ok_or(AuthError::ExpiryOutOfRange(ttl))
}
