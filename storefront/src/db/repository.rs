//! Repository traits and their PostgreSQL implementations.
//!
//! Services hold an `Arc<dyn …Repository>` so the store can be swapped for the
//! in-memory implementations in [`super::memory`].

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, postgres::PgRow, types::Json};

use super::timeouts::{TimeoutError, with_timeout};
use crate::auth::{
    Account, AccountId, Address, AuthError, AuthResult, CartItem, Order, SessionTokens,
};
use crate::catalog::{CatalogResult, Product};

/// Unique constraint on `accounts.email`
pub const EMAIL_UNIQUE_CONSTRAINT: &str = "accounts_email_key";

/// Unique constraint on `accounts.phone`
pub const PHONE_UNIQUE_CONSTRAINT: &str = "accounts_phone_key";

/// Account store operations
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Whether an account with this (normalized) email exists
    async fn email_exists(&self, email: &str) -> AuthResult<bool>;

    /// Whether an account with this phone number exists
    async fn phone_exists(&self, phone: &str) -> AuthResult<bool>;

    /// Insert a fully initialized account.
    ///
    /// Must fail with `DuplicateEmail`/`DuplicatePhone` when another account
    /// already holds the email or phone, even if that account was inserted
    /// concurrently after the caller's existence checks.
    async fn insert_account(&self, account: &Account) -> AuthResult<()>;

    /// Find account by (normalized) email
    async fn find_by_email(&self, email: &str) -> AuthResult<Option<Account>>;

    /// Replace the stored token pair and `updated_at`.
    ///
    /// Fails with `AccountNotFound` when no account has this ID.
    async fn update_tokens(
        &self,
        account_id: AccountId,
        tokens: &SessionTokens,
        updated_at: DateTime<Utc>,
    ) -> AuthResult<()>;
}

/// Product store operations
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Every product
    async fn list_all(&self) -> CatalogResult<Vec<Product>>;

    /// Products whose name contains `query`, case-sensitively
    async fn search_by_name(&self, query: &str) -> CatalogResult<Vec<Product>>;
}

/// PostgreSQL implementation of `AccountRepository`
pub struct PgAccountRepository {
    pool: PgPool,
    query_timeout: Duration,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }
}

const ACCOUNT_COLUMNS: &str = "id, first_name, last_name, email, phone, password_hash, \
     token, refresh_token, created_at, updated_at, cart, addresses, orders";

fn account_from_row(r: &PgRow) -> Result<Account, sqlx::Error> {
    Ok(Account {
        id: r.try_get("id")?,
        first_name: r.try_get("first_name")?,
        last_name: r.try_get("last_name")?,
        email: r.try_get("email")?,
        phone: r.try_get("phone")?,
        password_hash: r.try_get("password_hash")?,
        token: r.try_get("token")?,
        refresh_token: r.try_get("refresh_token")?,
        created_at: r.try_get("created_at")?,
        updated_at: r.try_get("updated_at")?,
        cart: r.try_get::<Json<Vec<CartItem>>, _>("cart")?.0,
        addresses: r.try_get::<Json<Vec<Address>>, _>("addresses")?.0,
        orders: r.try_get::<Json<Vec<Order>>, _>("orders")?.0,
    })
}

/// Map a unique violation on one of the account constraints to its conflict error
fn map_insert_error(e: sqlx::Error) -> AuthError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        match db_err.constraint() {
            Some(EMAIL_UNIQUE_CONSTRAINT) => return AuthError::DuplicateEmail,
            Some(PHONE_UNIQUE_CONSTRAINT) => return AuthError::DuplicatePhone,
            _ => {}
        }
    }
    AuthError::Database(e)
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn email_exists(&self, email: &str) -> AuthResult<bool> {
        let exists = with_timeout(
            self.query_timeout,
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM accounts WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool),
        )
        .await?;
        Ok(exists)
    }

    async fn phone_exists(&self, phone: &str) -> AuthResult<bool> {
        let exists = with_timeout(
            self.query_timeout,
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM accounts WHERE phone = $1)")
                .bind(phone)
                .fetch_one(&self.pool),
        )
        .await?;
        Ok(exists)
    }

    async fn insert_account(&self, account: &Account) -> AuthResult<()> {
        let insert = sqlx::query(
            "INSERT INTO accounts (id, first_name, last_name, email, phone, password_hash,
                                   token, refresh_token, created_at, updated_at,
                                   cart, addresses, orders)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(account.id)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(&account.email)
        .bind(&account.phone)
        .bind(&account.password_hash)
        .bind(&account.token)
        .bind(&account.refresh_token)
        .bind(account.created_at)
        .bind(account.updated_at)
        .bind(Json(&account.cart))
        .bind(Json(&account.addresses))
        .bind(Json(&account.orders))
        .execute(&self.pool);

        match with_timeout(self.query_timeout, insert).await {
            Ok(_) => Ok(()),
            Err(TimeoutError::Database(e)) => Err(map_insert_error(e)),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<Account>> {
        let sql = format!("SELECT {} FROM accounts WHERE email = $1", ACCOUNT_COLUMNS);
        let row = with_timeout(
            self.query_timeout,
            sqlx::query(&sql).bind(email).fetch_optional(&self.pool),
        )
        .await?;

        Ok(row.as_ref().map(account_from_row).transpose()?)
    }

    async fn update_tokens(
        &self,
        account_id: AccountId,
        tokens: &SessionTokens,
        updated_at: DateTime<Utc>,
    ) -> AuthResult<()> {
        let result = with_timeout(
            self.query_timeout,
            sqlx::query(
                "UPDATE accounts SET token = $1, refresh_token = $2, updated_at = $3 WHERE id = $4",
            )
            .bind(&tokens.token)
            .bind(&tokens.refresh_token)
            .bind(updated_at)
            .bind(account_id)
            .execute(&self.pool),
        )
        .await?;

        if result.rows_affected() == 0 {
            return Err(AuthError::AccountNotFound);
        }
        Ok(())
    }
}

/// PostgreSQL implementation of `ProductRepository`
pub struct PgProductRepository {
    pool: PgPool,
    query_timeout: Duration,
}

impl PgProductRepository {
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }
}

fn product_from_row(r: &PgRow) -> Result<Product, sqlx::Error> {
    Ok(Product {
        product_id: r.try_get("product_id")?,
        product_name: r.try_get("product_name")?,
        price: r.try_get("price")?,
        rating: r.try_get("rating")?,
        image: r.try_get("image")?,
    })
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn list_all(&self) -> CatalogResult<Vec<Product>> {
        let rows = with_timeout(
            self.query_timeout,
            sqlx::query(
                "SELECT product_id, product_name, price, rating, image
                 FROM products ORDER BY product_name",
            )
            .fetch_all(&self.pool),
        )
        .await?;

        Ok(rows
            .iter()
            .map(product_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn search_by_name(&self, query: &str) -> CatalogResult<Vec<Product>> {
        // strpos keeps the match literal; LIKE would treat % and _ in the query as wildcards
        let rows = with_timeout(
            self.query_timeout,
            sqlx::query(
                "SELECT product_id, product_name, price, rating, image
                 FROM products WHERE strpos(product_name, $1) > 0 ORDER BY product_name",
            )
            .bind(query)
            .fetch_all(&self.pool),
        )
        .await?;

        Ok(rows
            .iter()
            .map(product_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }
}
