//! In-memory repositories.
//!
//! Used by tests and local experiments. The account map sits behind a single
//! async mutex so the uniqueness check and the insert happen atomically, which
//! is what the PostgreSQL unique constraints give the real store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use super::repository::{AccountRepository, ProductRepository};
use crate::auth::{Account, AccountId, AuthError, AuthResult, SessionTokens};
use crate::catalog::{CatalogResult, Product};

/// In-memory `AccountRepository`
#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: Mutex<HashMap<AccountId, Account>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account, bypassing the uniqueness checks
    pub fn with_account(mut self, account: Account) -> Self {
        self.accounts.get_mut().insert(account.id, account);
        self
    }

    /// Number of stored accounts
    pub async fn len(&self) -> usize {
        self.accounts.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.lock().await.is_empty()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn email_exists(&self, email: &str) -> AuthResult<bool> {
        let accounts = self.accounts.lock().await;
        Ok(accounts.values().any(|a| a.email == email))
    }

    async fn phone_exists(&self, phone: &str) -> AuthResult<bool> {
        let accounts = self.accounts.lock().await;
        Ok(accounts.values().any(|a| a.phone == phone))
    }

    async fn insert_account(&self, account: &Account) -> AuthResult<()> {
        let mut accounts = self.accounts.lock().await;

        if accounts.values().any(|a| a.email == account.email) {
            return Err(AuthError::DuplicateEmail);
        }
        if accounts.values().any(|a| a.phone == account.phone) {
            return Err(AuthError::DuplicatePhone);
        }

        accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<Account>> {
        let accounts = self.accounts.lock().await;
        Ok(accounts.values().find(|a| a.email == email).cloned())
    }

    async fn update_tokens(
        &self,
        account_id: AccountId,
        tokens: &SessionTokens,
        updated_at: DateTime<Utc>,
    ) -> AuthResult<()> {
        let mut accounts = self.accounts.lock().await;
        let account = accounts
            .get_mut(&account_id)
            .ok_or(AuthError::AccountNotFound)?;

        account.token = tokens.token.clone();
        account.refresh_token = tokens.refresh_token.clone();
        account.updated_at = updated_at;
        Ok(())
    }
}

/// In-memory `ProductRepository`, ordered by product name like the SQL store
#[derive(Default)]
pub struct InMemoryProductRepository {
    products: Vec<Product>,
}

impl InMemoryProductRepository {
    pub fn new(products: Vec<Product>) -> Self {
        let mut repo = Self { products };
        repo.sort();
        repo
    }

    pub fn with_product(mut self, product: Product) -> Self {
        self.products.push(product);
        self.sort();
        self
    }

    fn sort(&mut self) {
        self.products
            .sort_by(|a, b| a.product_name.cmp(&b.product_name));
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn list_all(&self) -> CatalogResult<Vec<Product>> {
        Ok(self.products.clone())
    }

    async fn search_by_name(&self, query: &str) -> CatalogResult<Vec<Product>> {
        Ok(self
            .products
            .iter()
            .filter(|p| p.product_name.contains(query))
            .cloned()
            .collect())
    }
}
