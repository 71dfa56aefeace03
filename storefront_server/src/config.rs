//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use std::{net::SocketAddr, str::FromStr};

use storefront::{auth::TokenConfig, db::DatabaseConfig};

const DEFAULT_BIND: &str = "127.0.0.1:8000";

/// Upper bound on either token lifetime: ten years
pub const MAX_TOKEN_TTL_HOURS: i64 = 10 * 365 * 24;

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Security configuration
    pub security: SecurityConfig,
    /// Session token lifetime in hours
    pub session_ttl_hours: i64,
    /// Refresh token lifetime in hours
    pub refresh_ttl_hours: i64,
    /// Prometheus exporter address, disabled when unset
    pub metrics_bind: Option<SocketAddr>,
}

/// Security-related configuration
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// JWT signing secret (required)
    pub jwt_secret: String,
    /// Password hashing pepper (required)
    pub password_pepper: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    /// * `database_url_override` - Optional database URL override (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if required variables are missing or invalid
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        database_url_override: Option<String>,
    ) -> Result<Self, ConfigError> {
        Self::from_source(bind_override, database_url_override, |key| {
            std::env::var(key).ok()
        })
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_source<F>(
        bind_override: Option<SocketAddr>,
        database_url_override: Option<String>,
        lookup: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind = match bind_override {
            Some(bind) => bind,
            None => resolve_bind(&lookup)?,
        };

        let mut database = DatabaseConfig::from_lookup(&lookup);
        if let Some(url) = database_url_override {
            database.database_url = url;
        }

        // Security configuration (REQUIRED)
        let jwt_secret = lookup("JWT_SECRET").ok_or_else(|| ConfigError::MissingRequired {
            var: "JWT_SECRET".to_string(),
            hint: "Generate with: openssl rand -hex 32".to_string(),
        })?;

        let password_pepper =
            lookup("PASSWORD_PEPPER").ok_or_else(|| ConfigError::MissingRequired {
                var: "PASSWORD_PEPPER".to_string(),
                hint: "Generate with: openssl rand -hex 16".to_string(),
            })?;

        if jwt_secret.len() < 32 {
            return Err(ConfigError::Invalid {
                var: "JWT_SECRET".to_string(),
                reason: "Must be at least 32 characters (128-bit security)".to_string(),
            });
        }

        if password_pepper.len() < 16 {
            return Err(ConfigError::Invalid {
                var: "PASSWORD_PEPPER".to_string(),
                reason: "Must be at least 16 characters (64-bit security)".to_string(),
            });
        }

        let metrics_bind = match lookup("METRICS_BIND") {
            Some(raw) => Some(raw.parse().map_err(|_| ConfigError::Invalid {
                var: "METRICS_BIND".to_string(),
                reason: format!("'{}' is not a socket address", raw),
            })?),
            None => None,
        };

        Ok(ServerConfig {
            bind,
            database,
            security: SecurityConfig {
                jwt_secret,
                password_pepper,
            },
            session_ttl_hours: parse_or(&lookup, "SESSION_TOKEN_TTL_HOURS", 24),
            refresh_ttl_hours: parse_or(&lookup, "REFRESH_TOKEN_TTL_HOURS", 168),
            metrics_bind,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session_ttl_hours <= 0 {
            return Err(ConfigError::Invalid {
                var: "SESSION_TOKEN_TTL_HOURS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.refresh_ttl_hours > MAX_TOKEN_TTL_HOURS {
            return Err(ConfigError::Invalid {
                var: "REFRESH_TOKEN_TTL_HOURS".to_string(),
                reason: format!("Cannot exceed {}h", MAX_TOKEN_TTL_HOURS),
            });
        }

        if self.refresh_ttl_hours <= self.session_ttl_hours {
            return Err(ConfigError::Invalid {
                var: "REFRESH_TOKEN_TTL_HOURS".to_string(),
                reason: format!(
                    "Must be greater than session token lifetime ({}h)",
                    self.session_ttl_hours
                ),
            });
        }

        if self.database.query_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "DB_QUERY_TIMEOUT_SECS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::Invalid {
                var: "DB_MIN_CONNECTIONS".to_string(),
                reason: format!(
                    "Cannot exceed max connections ({})",
                    self.database.max_connections
                ),
            });
        }

        Ok(())
    }

    /// Token signing settings derived from this configuration
    pub fn token_config(&self) -> TokenConfig {
        TokenConfig {
            session_ttl: chrono::Duration::hours(self.session_ttl_hours),
            refresh_ttl: chrono::Duration::hours(self.refresh_ttl_hours),
            ..TokenConfig::new(self.security.jwt_secret.clone())
        }
    }
}

/// `SERVER_BIND` wins; otherwise a platform-provided `PORT` binds every interface.
fn resolve_bind<F>(lookup: &F) -> Result<SocketAddr, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup("SERVER_BIND") {
        return raw.parse().map_err(|_| ConfigError::Invalid {
            var: "SERVER_BIND".to_string(),
            reason: format!("'{}' is not a socket address", raw),
        });
    }

    if let Some(raw) = lookup("PORT") {
        let port: u16 = raw.parse().map_err(|_| ConfigError::Invalid {
            var: "PORT".to_string(),
            reason: format!("'{}' is not a port number", raw),
        })?;
        return Ok(SocketAddr::from(([0, 0, 0, 0], port)));
    }

    DEFAULT_BIND.parse().map_err(|_| ConfigError::Invalid {
        var: "SERVER_BIND".to_string(),
        reason: "default bind address is malformed".to_string(),
    })
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse a variable with default fallback
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
