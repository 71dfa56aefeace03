//! Storefront HTTP server.
//!
//! Serves account sign-up and login plus catalog search over PostgreSQL.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Error;
use pico_args::Arguments;
use storefront::{
    auth::{AccountRegistry, Authenticator, CredentialHasher, TokenIssuer},
    catalog::CatalogSearch,
    db::{AccountRepository, Database, PgAccountRepository, PgProductRepository},
};
use storefront_server::{
    api::{self, AppState},
    config::ServerConfig,
    logging, metrics,
};
use tracing::info;

const HELP: &str = "\
Run the storefront server

USAGE:
  storefront_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND, 0.0.0.0:$PORT, or 127.0.0.1:8000]
  --db-url     URL         Database connection string  [default: env DATABASE_URL or postgres://postgres@localhost/storefront]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  PORT                     Port to bind on all interfaces when SERVER_BIND is unset
  DATABASE_URL             PostgreSQL connection string
  JWT_SECRET               JWT signing secret (at least 32 characters)
  PASSWORD_PEPPER          Password hashing pepper (at least 16 characters)
  METRICS_BIND             Prometheus exporter address (disabled when unset)
  (See .env.example for all configuration options)
";

struct Args {
    bind: Option<SocketAddr>,
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        bind: pargs.opt_value_from_str("--bind")?,
        database_url: pargs.opt_value_from_str("--db-url")?,
    };

    logging::init();

    let config = ServerConfig::from_env(args.bind, args.database_url)?;
    config.validate()?;

    if let Some(addr) = config.metrics_bind {
        metrics::init_metrics(addr).map_err(|e| anyhow::anyhow!(e))?;
        info!("Prometheus exporter listening on {}", addr);
    }

    info!("Connecting to database");
    let db = Database::new(&config.database)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;
    info!("Database connected successfully");

    let query_timeout = config.database.query_timeout();
    let accounts: Arc<dyn AccountRepository> = Arc::new(PgAccountRepository::new(
        db.pool().clone(),
        query_timeout,
    ));
    let products = Arc::new(PgProductRepository::new(db.pool().clone(), query_timeout));

    let hasher = Arc::new(CredentialHasher::new(
        config.security.password_pepper.clone(),
    ));
    let tokens = Arc::new(TokenIssuer::new(accounts.clone(), &config.token_config()));

    let state = AppState {
        registry: Arc::new(AccountRegistry::new(
            accounts.clone(),
            hasher.clone(),
            tokens.clone(),
        )),
        authenticator: Arc::new(Authenticator::new(accounts, hasher, tokens.clone())),
        tokens,
        catalog: Arc::new(CatalogSearch::new(products)),
        database: Some(db.clone()),
    };

    let app = api::create_router(state);

    info!("Starting HTTP server on {}", config.bind);
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", config.bind, e))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    info!("Shutting down server...");
    db.close().await;

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
