//! Server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults suitable for a single-shop deployment on a LAN.

use std::env;
use std::path::PathBuf;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,

    /// Path to the SQLite database file
    pub database_path: PathBuf,

    /// JWT secret key for signing session tokens
    pub jwt_secret: String,

    /// JWT session token lifetime in seconds
    pub jwt_lifetime_secs: i64,

    /// Directory where uploaded product images are stored
    pub upload_dir: PathBuf,

    /// Email for the seeded admin account (first run only)
    pub admin_email: String,

    /// Password for the seeded admin account (first run only)
    pub admin_password: String,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ServerConfig {
            http_port: env::var("KHALKHAL_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("KHALKHAL_PORT".to_string()))?,

            database_path: env::var("KHALKHAL_DB_PATH")
                .unwrap_or_else(|_| "khalkhal.db".to_string())
                .into(),

            jwt_secret: env::var("KHALKHAL_JWT_SECRET").unwrap_or_else(|_| {
                // In production this MUST be set via environment variable
                "khalkhal-dev-secret-change-in-production".to_string()
            }),

            jwt_lifetime_secs: env::var("KHALKHAL_JWT_LIFETIME_SECS")
                .unwrap_or_else(|_| "43200".to_string()) // 12 hours, one shift
                .parse()
                .map_err(|_| {
                    ConfigError::InvalidValue("KHALKHAL_JWT_LIFETIME_SECS".to_string())
                })?,

            upload_dir: env::var("KHALKHAL_UPLOAD_DIR")
                .unwrap_or_else(|_| "uploads".to_string())
                .into(),

            admin_email: env::var("KHALKHAL_ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@khalkhal.local".to_string()),

            admin_password: env::var("KHALKHAL_ADMIN_PASSWORD")
                .unwrap_or_else(|_| "admin".to_string()),
        };

        if config.jwt_secret.is_empty() {
            return Err(ConfigError::MissingRequired(
                "KHALKHAL_JWT_SECRET".to_string(),
            ));
        }

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_load() {
        let config = ServerConfig::load().unwrap();
        assert!(config.http_port > 0);
        assert!(!config.jwt_secret.is_empty());
    }
}
