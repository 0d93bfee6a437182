//! Configuration management.
//!
//! This module provides a configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables (optionally from a `.env` file)
//! - Sensible defaults for all optional settings
//!
//! # Environment Variables
//!
//! - `HOST` - Server bind address (default: 0.0.0.0)
//! - `PORT` - Server port (default: 3000)
//! - `DATABASE_URL` - PostgreSQL connection string (required)
//! - `DB_MAX_CONNECTIONS` - Connection pool size (default: 10)
//! - `ADMIN_PASSWORD` - Password accepted by `POST /login` (required)
//! - `JWT_SECRET` - Key used to sign admin session tokens (required)
//! - `CLIENT_URL` - Allowed CORS origins, comma-separated (default: any)
//! - `COOKIE_INSECURE` - Drop the `Secure` cookie attribute (default: false)

use clap::Parser;
use http::HeaderValue;

use crate::server::RouterConfig;
use crate::store::DEFAULT_MAX_CONNECTIONS;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Where Is This Class - classroom directions service.
///
/// Maps classroom codes to building, floor and directions in several
/// languages, and ranks classrooms by how often they are looked up.
#[derive(Parser, Debug, Clone)]
#[command(name = "where-is-this-class")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "PORT")]
    pub port: u16,

    // =========================================================================
    // Database Configuration
    // =========================================================================
    /// PostgreSQL connection URL.
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,

    /// Maximum number of pooled database connections.
    #[arg(long, default_value_t = DEFAULT_MAX_CONNECTIONS, env = "DB_MAX_CONNECTIONS")]
    pub db_max_connections: u32,

    // =========================================================================
    // Authentication Configuration
    // =========================================================================
    /// Admin password exchanged for a session cookie at `POST /login`.
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: String,

    /// Secret key for signing admin session tokens.
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub session_secret: String,

    /// Send session cookies without the `Secure` attribute.
    ///
    /// WARNING: Only for local development over plain HTTP.
    #[arg(long, default_value_t = false, env = "COOKIE_INSECURE")]
    pub cookie_insecure: bool,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin without credentials.
    #[arg(long, env = "CLIENT_URL", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.database_url.trim().is_empty() {
            return Err("Database URL is required. Set --database-url or DATABASE_URL".to_string());
        }

        if self.admin_password.is_empty() {
            return Err(
                "Admin password is required. Set --admin-password or ADMIN_PASSWORD".to_string(),
            );
        }

        if self.session_secret.is_empty() {
            return Err(
                "Session signing secret is required. Set --session-secret or JWT_SECRET"
                    .to_string(),
            );
        }

        if self.db_max_connections == 0 {
            return Err("db_max_connections must be greater than 0".to_string());
        }

        for origin in self.cors_origins.iter().flatten() {
            let origin = origin.trim();
            if !origin.is_empty() && HeaderValue::from_str(origin).is_err() {
                return Err(format!(
                    "Invalid CORS origin {:?} in --cors-origins / CLIENT_URL",
                    origin
                ));
            }
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Build the router configuration from these settings.
    pub fn router_config(&self) -> RouterConfig {
        let mut router_config = RouterConfig::new(&self.admin_password, &self.session_secret)
            .with_secure_cookies(!self.cookie_insecure)
            .with_tracing(!self.no_tracing);

        if let Some(ref origins) = self.cors_origins {
            let origins: Vec<String> = origins
                .iter()
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
            router_config = router_config.with_cors_origins(origins);
        }

        router_config
    }
}

// =============================================================================
// Tests
// =============================================================================
