/// Configuration management for the API server
///
/// Configuration is read from environment variables (a `.env` file is loaded
/// first when present).
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
/// - `INIT_DB`: `1`/`true` to run migrations and seed the bootstrap admin on start
/// - `ADMIN_USERNAME`, `ADMIN_EMAIL`, `ADMIN_PASSWORD`: bootstrap admin (all three or none)
/// - `API_HOST`: host to bind to (default: 0.0.0.0)
/// - `API_PORT`: port to bind to (default: 5000)
/// - `CORS_ORIGINS`: comma-separated allowed origins (default: `*`)
/// - `PRODUCTION`: `1`/`true` enables HSTS and secure cookies
/// - `MAX_UPLOAD_BYTES`: largest accepted bulk-import upload (default: 10 MiB)
/// - `SECRET_KEY`: session signing key, at least 32 characters (required)
/// - `SESSION_TTL_HOURS`: session lifetime (default: 24)
/// - `RUST_LOG`: log filter

use qbank_shared::db::migrations::BootstrapAdmin;
use std::env;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,

    /// Allowed CORS origins; `*` means any
    pub cors_origins: Vec<String>,

    /// Production mode: HSTS header and `Secure` session cookies
    pub production: bool,

    /// Body limit for the bulk-import endpoint
    pub max_upload_bytes: usize,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,

    /// Run migrations and seeding on startup
    pub init: bool,

    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// HS256 signing key for session tokens
    pub secret: String,

    pub ttl_hours: i64,
}

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

fn parse_flag(value: Option<String>) -> bool {
    value
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

fn parse_or<T>(value: Option<String>, default: T, name: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{name} has an invalid value '{raw}': {e}")),
        None => Ok(default),
    }
}

impl Config {
    /// Loads configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value does not
    /// parse.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(lookup("API_PORT"), 5000u16, "API_PORT")?;

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|origins| !origins.is_empty())
            .unwrap_or_else(|| vec!["*".to_string()]);

        let max_upload_bytes = parse_or(
            lookup("MAX_UPLOAD_BYTES"),
            DEFAULT_MAX_UPLOAD_BYTES,
            "MAX_UPLOAD_BYTES",
        )?;

        let url = lookup("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;
        let max_connections = parse_or(lookup("DATABASE_MAX_CONNECTIONS"), 10u32, "DATABASE_MAX_CONNECTIONS")?;

        let bootstrap_admin = match (
            lookup("ADMIN_USERNAME"),
            lookup("ADMIN_EMAIL"),
            lookup("ADMIN_PASSWORD"),
        ) {
            (Some(username), Some(email), Some(password)) => Some(BootstrapAdmin {
                username,
                email,
                password,
            }),
            (None, None, None) => None,
            _ => anyhow::bail!(
                "ADMIN_USERNAME, ADMIN_EMAIL and ADMIN_PASSWORD must be set together"
            ),
        };

        let secret = lookup("SECRET_KEY")
            .ok_or_else(|| anyhow::anyhow!("SECRET_KEY environment variable is required"))?;
        if secret.len() < 32 {
            anyhow::bail!("SECRET_KEY must be at least 32 characters long");
        }
        let ttl_hours = parse_or(lookup("SESSION_TTL_HOURS"), 24i64, "SESSION_TTL_HOURS")?;
        if ttl_hours <= 0 {
            anyhow::bail!("SESSION_TTL_HOURS must be positive");
        }

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                cors_origins,
                production: parse_flag(lookup("PRODUCTION")),
                max_upload_bytes,
            },
            database: DatabaseConfig {
                url,
                max_connections,
                init: parse_flag(lookup("INIT_DB")),
                bootstrap_admin,
            },
            session: SessionConfig { secret, ttl_hours },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}
