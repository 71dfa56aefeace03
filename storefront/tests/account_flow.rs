//! Integration tests for the account and catalog flows.
//!
//! Runs sign-up, login and search end to end against the in-memory repositories.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use storefront::auth::{
    Account, AccountId, AccountRegistry, AuthError, AuthResult, Authenticator,
    CredentialHasher, HashParams, LoginRequest, SessionTokens, SignUpRequest, TokenConfig,
    TokenIssuer,
};
use storefront::catalog::{CatalogError, CatalogSearch, Product};
use storefront::db::AccountRepository;
use storefront::db::memory::{InMemoryAccountRepository, InMemoryProductRepository};
use uuid::Uuid;

const SECRET: &str = "integration_test_secret_key_32_bytes";

struct Services {
    accounts: Arc<InMemoryAccountRepository>,
    registry: AccountRegistry,
    authenticator: Authenticator,
}

fn fast_hasher() -> Arc<CredentialHasher> {
    Arc::new(CredentialHasher::with_params(
        "integration_pepper".to_string(),
        HashParams::new(1024, 1, 1, None).unwrap(),
    ))
}

fn services_with(accounts: Arc<dyn AccountRepository>) -> (AccountRegistry, Authenticator) {
    let hasher = fast_hasher();
    let tokens = Arc::new(TokenIssuer::new(
        accounts.clone(),
        &TokenConfig::new(SECRET.to_string()),
    ));
    (
        AccountRegistry::new(accounts.clone(), hasher.clone(), tokens.clone()),
        Authenticator::new(accounts, hasher, tokens),
    )
}

fn setup() -> Services {
    let accounts = Arc::new(InMemoryAccountRepository::new());
    let (registry, authenticator) = services_with(accounts.clone());
    Services {
        accounts,
        registry,
        authenticator,
    }
}

fn candidate(email: &str, phone: &str, password: &str) -> SignUpRequest {
    SignUpRequest {
        first_name: Some("Grace".to_string()),
        last_name: Some("Hopper".to_string()),
        email: Some(email.to_string()),
        phone: Some(phone.to_string()),
        password: Some(password.to_string()),
    }
}

fn login(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn test_sign_up_creates_exactly_one_account() {
    let s = setup();

    s.registry
        .sign_up(candidate("a@x.com", "555", "secret"))
        .await
        .expect("sign-up should succeed");

    assert_eq!(s.accounts.len().await, 1);
    let stored = s.accounts.find_by_email("a@x.com").await.unwrap().unwrap();
    assert_ne!(stored.password_hash, "secret");
}

#[tokio::test]
async fn test_same_signup_twice_is_duplicate_email() {
    let s = setup();

    s.registry
        .sign_up(candidate("a@x.com", "555", "secret"))
        .await
        .unwrap();
    let second = s.registry.sign_up(candidate("a@x.com", "555", "secret")).await;

    assert!(matches!(second, Err(AuthError::DuplicateEmail)));
    assert_eq!(s.accounts.len().await, 1);
}

#[tokio::test]
async fn test_duplicate_email_regardless_of_phone() {
    let s = setup();
    s.registry
        .sign_up(candidate("a@x.com", "555", "secret"))
        .await
        .unwrap();

    let result = s.registry.sign_up(candidate("a@x.com", "999", "secret")).await;
    assert!(matches!(result, Err(AuthError::DuplicateEmail)));
}

#[tokio::test]
async fn test_email_uniqueness_ignores_case() {
    let s = setup();
    s.registry
        .sign_up(candidate("Grace@Navy.mil", "555", "secret"))
        .await
        .unwrap();

    let result = s.registry.sign_up(candidate("grace@navy.mil", "999", "secret")).await;
    assert!(matches!(result, Err(AuthError::DuplicateEmail)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_signups_with_same_email() {
    let s = setup();
    let first = s.registry.clone();
    let second = s.registry.clone();

    let (a, b) = tokio::join!(
        tokio::spawn(async move { first.sign_up(candidate("race@x.com", "111", "secret")).await }),
        tokio::spawn(async move { second.sign_up(candidate("race@x.com", "222", "secret")).await }),
    );
    let results = [a.unwrap(), b.unwrap()];

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        results
            .iter()
            .filter(|r| matches!(r, Err(AuthError::DuplicateEmail)))
            .count(),
        1
    );
    assert_eq!(s.accounts.len().await, 1);
}

#[tokio::test]
async fn test_login_returns_fresh_tokens() {
    let s = setup();
    let created = s
        .registry
        .sign_up(candidate("a@x.com", "555", "secret"))
        .await
        .unwrap();

    let first = s.authenticator.login(login("a@x.com", "secret")).await.unwrap();
    let second = s.authenticator.login(login("a@x.com", "secret")).await.unwrap();

    assert_eq!(first.id, created.id);
    assert_ne!(first.token, created.token);
    assert_ne!(first.refresh_token, created.refresh_token);
    assert_ne!(second.token, first.token);
    assert_ne!(second.refresh_token, first.refresh_token);

    let stored = s.accounts.find_by_email("a@x.com").await.unwrap().unwrap();
    assert_eq!(stored.token, second.token);
    assert_eq!(stored.updated_at, second.updated_at);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let s = setup();
    s.registry
        .sign_up(candidate("a@x.com", "555", "secret"))
        .await
        .unwrap();

    let unknown = s
        .authenticator
        .login(login("nobody@x.com", "secret"))
        .await
        .unwrap_err();
    let wrong = s
        .authenticator
        .login(login("a@x.com", "not-it"))
        .await
        .unwrap_err();

    assert!(matches!(unknown, AuthError::InvalidCredentials));
    assert!(matches!(wrong, AuthError::InvalidCredentials));
    assert_eq!(unknown.client_message(), wrong.client_message());
}

#[tokio::test]
async fn test_login_accepts_differently_cased_email() {
    let s = setup();
    s.registry
        .sign_up(candidate("a@x.com", "555", "secret"))
        .await
        .unwrap();

    assert!(s.authenticator.login(login(" A@X.com ", "secret")).await.is_ok());
}

#[tokio::test]
async fn test_validation_reports_every_field() {
    let s = setup();

    let err = s
        .registry
        .sign_up(SignUpRequest::default())
        .await
        .unwrap_err();

    let AuthError::Validation(errors) = err else {
        panic!("expected validation error, got {err:?}");
    };
    assert_eq!(
        errors.fields(),
        vec!["first_name", "last_name", "email", "phone", "password"]
    );
    assert!(s.accounts.is_empty().await);
}

/// Store that accepts reads but rejects every write
struct ReadOnlyStore;

#[async_trait]
impl AccountRepository for ReadOnlyStore {
    async fn email_exists(&self, _email: &str) -> AuthResult<bool> {
        Ok(false)
    }

    async fn phone_exists(&self, _phone: &str) -> AuthResult<bool> {
        Ok(false)
    }

    async fn insert_account(&self, _account: &Account) -> AuthResult<()> {
        Err(AuthError::Database(sqlx::Error::PoolClosed))
    }

    async fn find_by_email(&self, _email: &str) -> AuthResult<Option<Account>> {
        Ok(None)
    }

    async fn update_tokens(
        &self,
        _account_id: AccountId,
        _tokens: &SessionTokens,
        _updated_at: DateTime<Utc>,
    ) -> AuthResult<()> {
        Err(AuthError::Database(sqlx::Error::PoolClosed))
    }
}

#[tokio::test]
async fn test_store_failure_is_opaque_to_clients() {
    let (registry, _) = services_with(Arc::new(ReadOnlyStore));

    let err = registry
        .sign_up(candidate("a@x.com", "555", "secret"))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Database(_)));
    assert_eq!(err.client_message(), "Internal server error");
}

fn product(name: &str) -> Product {
    Product {
        product_id: Uuid::new_v4(),
        product_name: name.to_string(),
        price: 100,
        rating: Some(5),
        image: String::new(),
    }
}

#[tokio::test]
async fn test_search_returns_only_containing_names() {
    let catalog = CatalogSearch::new(Arc::new(InMemoryProductRepository::new(vec![
        product("Alienware x15"),
        product("Giner ware"),
        product("Iphone 13 Pro"),
        product("Warehouse shelf"),
    ])));

    for query in ["ware", "Pro", "x", "Ware"] {
        let hits = catalog.search_by_name(query).await.unwrap();
        assert!(hits.iter().all(|p| p.product_name.contains(query)));
        let expected = catalog
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .filter(|p| p.product_name.contains(query))
            .count();
        assert_eq!(hits.len(), expected, "query {query:?}");
    }

    assert!(matches!(
        catalog.search_by_name("").await,
        Err(CatalogError::EmptyQuery)
    ));
}
