//! Integration tests for the PostgreSQL repositories.
//!
//! These run against the database named by `DATABASE_URL` and are skipped when it
//! is unset. The schema in `schema.sql` is applied on first use.

use std::sync::Arc;

use chrono::{SubsecRound, Utc};
use storefront::auth::{
    Account, AccountRegistry, Address, AuthError, CartItem, CredentialHasher, HashParams, Order,
    PaymentMethod, SessionTokens, SignUpRequest, TokenConfig, TokenIssuer,
};
use storefront::catalog::{CatalogSearch, Product};
use storefront::db::{
    AccountRepository, Database, DatabaseConfig, PgAccountRepository, PgProductRepository,
    ProductRepository,
};
use tokio::sync::OnceCell;
use uuid::Uuid;

static SCHEMA: OnceCell<()> = OnceCell::const_new();

/// Connect and make sure the tables exist, or `None` when no database is configured
async fn setup_test_db() -> Option<Database> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping PostgreSQL test");
        return None;
    };

    let config = DatabaseConfig {
        database_url,
        max_connections: 5,
        min_connections: 1,
        connection_timeout_secs: 5,
        ..DatabaseConfig::development()
    };
    let db = Database::new(&config)
        .await
        .expect("Failed to create test database");

    SCHEMA
        .get_or_init(|| async {
            sqlx::raw_sql(include_str!("../schema.sql"))
                .execute(db.pool())
                .await
                .expect("Failed to apply schema");
        })
        .await;

    Some(db)
}

fn accounts(db: &Database) -> Arc<PgAccountRepository> {
    Arc::new(PgAccountRepository::new(
        db.pool().clone(),
        DatabaseConfig::development().query_timeout(),
    ))
}

fn unique_phone() -> String {
    format!("{:015}", Uuid::new_v4().as_u128() % 1_000_000_000_000_000)
}

async fn cleanup_accounts(db: &Database, email: &str) {
    let _ = sqlx::query("DELETE FROM accounts WHERE email = $1")
        .bind(email)
        .execute(db.pool())
        .await;
}

fn product(name: String) -> Product {
    Product {
        product_id: Uuid::new_v4(),
        product_name: name,
        price: 1200,
        rating: Some(5),
        image: "item.jpg".to_string(),
    }
}

async fn insert_product(db: &Database, product: &Product) {
    sqlx::query(
        "INSERT INTO products (product_id, product_name, price, rating, image)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(product.product_id)
    .bind(&product.product_name)
    .bind(product.price)
    .bind(product.rating)
    .bind(&product.image)
    .execute(db.pool())
    .await
    .expect("Failed to insert product");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_signups_hit_the_email_constraint() {
    let Some(db) = setup_test_db().await else {
        return;
    };
    let email = format!("race-{}@example.com", Uuid::new_v4().simple());

    let store = accounts(&db);
    let hasher = Arc::new(CredentialHasher::with_params(
        "pg_test_pepper".to_string(),
        HashParams::new(1024, 1, 1, None).unwrap(),
    ));
    let tokens = Arc::new(TokenIssuer::new(
        store.clone(),
        &TokenConfig::new("pg_test_secret_key_of_32_characters".to_string()),
    ));
    let registry = AccountRegistry::new(store.clone(), hasher, tokens);

    let candidate = |phone: String| SignUpRequest {
        first_name: Some("Grace".to_string()),
        last_name: Some("Hopper".to_string()),
        email: Some(email.clone()),
        phone: Some(phone),
        password: Some("secret".to_string()),
    };
    let first = registry.clone();
    let second = registry.clone();
    let first_candidate = candidate(unique_phone());
    let second_candidate = candidate(unique_phone());

    let (a, b) = tokio::join!(
        tokio::spawn(async move { first.sign_up(first_candidate).await }),
        tokio::spawn(async move { second.sign_up(second_candidate).await }),
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

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE email = $1")
        .bind(&email)
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(count, 1);

    cleanup_accounts(&db, &email).await;
}

#[tokio::test]
async fn test_duplicate_phone_maps_from_constraint() {
    let Some(db) = setup_test_db().await else {
        return;
    };
    let store = accounts(&db);
    let phone = unique_phone();
    let now = Utc::now().trunc_subsecs(0);

    let account = |email: String| Account {
        id: Uuid::new_v4(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email,
        phone: phone.clone(),
        password_hash: "hash".to_string(),
        token: "t".to_string(),
        refresh_token: "r".to_string(),
        created_at: now,
        updated_at: now,
        cart: Vec::new(),
        addresses: Vec::new(),
        orders: Vec::new(),
    };
    let first_email = format!("first-{}@example.com", Uuid::new_v4().simple());
    let second_email = format!("second-{}@example.com", Uuid::new_v4().simple());

    store.insert_account(&account(first_email.clone())).await.unwrap();
    let result = store.insert_account(&account(second_email)).await;
    assert!(matches!(result, Err(AuthError::DuplicatePhone)));

    cleanup_accounts(&db, &first_email).await;
}

#[tokio::test]
async fn test_account_documents_survive_storage() {
    let Some(db) = setup_test_db().await else {
        return;
    };
    let store = accounts(&db);
    let now = Utc::now().trunc_subsecs(0);
    let email = format!("docs-{}@example.com", Uuid::new_v4().simple());

    let item = CartItem {
        product_id: Uuid::new_v4(),
        product_name: "Alienware x15".to_string(),
        price: 2500,
        rating: Some(4),
        image: "alienware.jpg".to_string(),
    };
    let account = Account {
        id: Uuid::new_v4(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: email.clone(),
        phone: unique_phone(),
        password_hash: "hash".to_string(),
        token: "t".to_string(),
        refresh_token: "r".to_string(),
        created_at: now,
        updated_at: now,
        cart: vec![item.clone()],
        addresses: vec![Address {
            address_id: Uuid::new_v4(),
            house: "12".to_string(),
            street: "Baker Street".to_string(),
            city: "London".to_string(),
            pincode: "NW1".to_string(),
        }],
        orders: vec![Order {
            order_id: Uuid::new_v4(),
            items: vec![item],
            ordered_at: now,
            total_price: 2500,
            discount: Some(100),
            payment_method: PaymentMethod {
                digital: true,
                cod: false,
            },
        }],
    };

    store.insert_account(&account).await.unwrap();
    let stored = store.find_by_email(&email).await.unwrap().unwrap();

    assert_eq!(stored.id, account.id);
    assert_eq!(stored.cart, account.cart);
    assert_eq!(stored.addresses, account.addresses);
    assert_eq!(stored.orders, account.orders);
    assert_eq!(stored.created_at, account.created_at);

    let tokens = SessionTokens {
        token: "fresh".to_string(),
        refresh_token: "fresh-refresh".to_string(),
    };
    let later = now + chrono::Duration::seconds(5);
    store.update_tokens(account.id, &tokens, later).await.unwrap();

    let stored = store.find_by_email(&email).await.unwrap().unwrap();
    assert_eq!(stored.token, "fresh");
    assert_eq!(stored.refresh_token, "fresh-refresh");
    assert_eq!(stored.updated_at, later);

    assert!(matches!(
        store.update_tokens(Uuid::new_v4(), &tokens, later).await,
        Err(AuthError::AccountNotFound)
    ));

    cleanup_accounts(&db, &email).await;
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let Some(db) = setup_test_db().await else {
        return;
    };
    let tag = Uuid::new_v4().simple().to_string();
    let discounted = product(format!("{tag}% off bundle"));
    let plain = product(format!("{tag}X off bundle"));
    insert_product(&db, &discounted).await;
    insert_product(&db, &plain).await;

    let catalog = CatalogSearch::new(Arc::new(PgProductRepository::new(
        db.pool().clone(),
        DatabaseConfig::development().query_timeout(),
    )));

    let found = catalog.search_by_name(&format!("{tag}%")).await.unwrap();
    assert_eq!(found, vec![discounted.clone()]);

    let found = catalog.search_by_name(&tag).await.unwrap();
    assert_eq!(found.len(), 2);
    assert!(found.contains(&discounted) && found.contains(&plain));

    let listed = catalog.list_all().await.unwrap();
    assert!(listed.contains(&discounted));

    let repo = PgProductRepository::new(
        db.pool().clone(),
        DatabaseConfig::development().query_timeout(),
    );
    let underscore = repo.search_by_name(&format!("{tag}_")).await.unwrap();
    assert!(underscore.is_empty());

    let _ = sqlx::query("DELETE FROM products WHERE product_id = ANY($1)")
        .bind(vec![discounted.product_id, plain.product_id])
        .execute(db.pool())
        .await;
}
