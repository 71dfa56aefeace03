//! Login.

use std::sync::Arc;

use log::{info, warn};

use super::{
    errors::{AuthError, AuthResult},
    hasher::CredentialHasher,
    models::{AccountView, LoginRequest},
    tokens::TokenIssuer,
    validation::normalize_email,
};
use crate::db::AccountRepository;

/// Checks credentials and rotates the token pair on success
#[derive(Clone)]
pub struct Authenticator {
    accounts: Arc<dyn AccountRepository>,
    hasher: Arc<CredentialHasher>,
    tokens: Arc<TokenIssuer>,
}

impl Authenticator {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        hasher: Arc<CredentialHasher>,
        tokens: Arc<TokenIssuer>,
    ) -> Self {
        Self {
            accounts,
            hasher,
            tokens,
        }
    }

    /// Login with email and password
    ///
    /// # Returns
    ///
    /// * `AuthResult<AccountView>` - The account carrying its newly issued token pair
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidCredentials` - Unknown email or wrong password
    /// * `AuthError::Signing` - Token signing failed
    /// * `AuthError::Database` / `AuthError::Timeout` - Store failure
    pub async fn login(&self, request: LoginRequest) -> AuthResult<AccountView> {
        let email = normalize_email(&request.email);

        let Some(mut account) = self.accounts.find_by_email(&email).await? else {
            warn!("Login rejected: unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if let Err(e) = self.hasher.verify(&account.password_hash, &request.password) {
            warn!("Login rejected for account {}: password mismatch", account.id);
            return Err(e);
        }

        let tokens = self.tokens.issue(
            &account.email,
            &account.first_name,
            &account.last_name,
            account.id,
        )?;

        let updated_at = match self.tokens.refresh(&tokens, account.id).await {
            Ok(updated_at) => updated_at,
            // Deleted between lookup and refresh
            Err(AuthError::AccountNotFound) => return Err(AuthError::InvalidCredentials),
            Err(e) => return Err(e),
        };

        account.token = tokens.token;
        account.refresh_token = tokens.refresh_token;
        account.updated_at = updated_at;

        info!("Account {} logged in", account.id);
        Ok(AccountView::from(account))
    }
}
