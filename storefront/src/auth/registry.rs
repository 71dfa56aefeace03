//! Account sign-up.

use std::{fmt, sync::Arc};

use chrono::{SubsecRound, Utc};
use log::{debug, info};
use uuid::Uuid;

use super::{
    errors::{AuthError, AuthResult},
    hasher::CredentialHasher,
    models::{Account, AccountView, SignUpRequest},
    tokens::TokenIssuer,
    validation::validate_sign_up,
};
use crate::db::AccountRepository;

/// Progress of a single sign-up attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignUpStage {
    Received,
    Validated,
    UniquenessChecked,
    Hashed,
    Persisted,
    TokenIssued,
    Complete,
    Rejected,
}

impl fmt::Display for SignUpStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SignUpStage::Received => "received",
            SignUpStage::Validated => "validated",
            SignUpStage::UniquenessChecked => "uniqueness-checked",
            SignUpStage::Hashed => "hashed",
            SignUpStage::Persisted => "persisted",
            SignUpStage::TokenIssued => "token-issued",
            SignUpStage::Complete => "complete",
            SignUpStage::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// Creates accounts
#[derive(Clone)]
pub struct AccountRegistry {
    accounts: Arc<dyn AccountRepository>,
    hasher: Arc<CredentialHasher>,
    tokens: Arc<TokenIssuer>,
}

impl AccountRegistry {
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

    /// Register a new account
    ///
    /// # Arguments
    ///
    /// * `request` - Sign-up candidate
    ///
    /// # Returns
    ///
    /// * `AuthResult<AccountView>` - Created account, without its password hash
    ///
    /// # Errors
    ///
    /// * `AuthError::Validation` - Missing or malformed fields, all listed
    /// * `AuthError::DuplicateEmail` - Email already registered
    /// * `AuthError::DuplicatePhone` - Phone number already registered
    /// * `AuthError::HashingFailed` / `AuthError::Signing` - Credential primitives failed
    /// * `AuthError::Database` / `AuthError::Timeout` - Insert failed; nothing was created
    pub async fn sign_up(&self, request: SignUpRequest) -> AuthResult<AccountView> {
        trace_stage(SignUpStage::Received, "");

        let candidate = validate_sign_up(request)
            .map_err(|e| reject(SignUpStage::Validated, e.into()))?;
        trace_stage(SignUpStage::Validated, &candidate.email);

        // Fast path only. The insert below is what actually enforces uniqueness
        // under concurrent sign-ups.
        if self.accounts.email_exists(&candidate.email).await? {
            return Err(reject(SignUpStage::UniquenessChecked, AuthError::DuplicateEmail));
        }
        if self.accounts.phone_exists(&candidate.phone).await? {
            return Err(reject(SignUpStage::UniquenessChecked, AuthError::DuplicatePhone));
        }
        trace_stage(SignUpStage::UniquenessChecked, &candidate.email);

        let password_hash = self.hasher.hash(&candidate.password)?;
        trace_stage(SignUpStage::Hashed, &candidate.email);

        let id = Uuid::new_v4();
        let now = Utc::now().trunc_subsecs(0);
        let tokens = self.tokens.issue(
            &candidate.email,
            &candidate.first_name,
            &candidate.last_name,
            id,
        )?;
        trace_stage(SignUpStage::TokenIssued, &candidate.email);

        let account = Account {
            id,
            first_name: candidate.first_name,
            last_name: candidate.last_name,
            email: candidate.email,
            phone: candidate.phone,
            password_hash,
            token: tokens.token,
            refresh_token: tokens.refresh_token,
            created_at: now,
            updated_at: now,
            cart: Vec::new(),
            addresses: Vec::new(),
            orders: Vec::new(),
        };

        self.accounts.insert_account(&account).await.map_err(|e| match e {
            AuthError::DuplicateEmail | AuthError::DuplicatePhone => {
                reject(SignUpStage::Persisted, e)
            }
            other => other,
        })?;
        trace_stage(SignUpStage::Persisted, &account.email);

        info!("Account {} created", account.id);
        trace_stage(SignUpStage::Complete, &account.email);
        Ok(AccountView::from(account))
    }
}

fn trace_stage(stage: SignUpStage, email: &str) {
    debug!("sign-up {}: {}", stage, email);
}

fn reject(at: SignUpStage, err: AuthError) -> AuthError {
    info!("sign-up {} at {}: {}", SignUpStage::Rejected, at, err);
    err
}
