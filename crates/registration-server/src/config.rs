//! Configuration for the registration server.

use anyhow::{ensure, Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::path::PathBuf;

/// Longest accepted admin token lifetime, one year.
pub const MAX_TOKEN_TTL_HOURS: u64 = 24 * 365;

/// Server configuration.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Admin credentials (required)
    pub admin: AdminConfig,

    /// Token signing configuration (required)
    pub auth: AuthConfig,

    /// Record storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Deserialize)]
pub struct AdminConfig {
    pub username: String,
    pub password: SecretString,
}

#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret for admin tokens
    pub jwt_secret: SecretString,

    /// Token lifetime in hours
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: u64,
}

impl AuthConfig {
    /// Token lifetime as a duration.
    ///
    /// `Config::from_settings` keeps `token_ttl_hours` within
    /// `1..=MAX_TOKEN_TTL_HOURS`, which always fits.
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.token_ttl_hours.min(MAX_TOKEN_TTL_HOURS) as i64)
    }
}

#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    /// Path to the registrations file
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,

    /// Enable persistence (if false, records are in-memory only)
    #[serde(default = "default_true")]
    pub persist: bool,

    /// Encrypt the registrations file with a key derived from this secret
    #[serde(default)]
    pub encryption_key: Option<SecretString>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON log lines
    #[serde(default)]
    pub json: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            persist: true,
            encryption_key: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_port(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_token_ttl_hours() -> u64 {
    24
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("/data/registrations.json")
}

fn default_true() -> bool {
    true
}

fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    7000
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Nested keys use `__`, e.g. `ADMIN__USERNAME` or `AUTH__JWT_SECRET`.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(false),
            )
            .build()
            .context("Failed to build configuration")?;

        Self::from_settings(settings)
    }

    /// Deserialize from already collected settings.
    pub fn from_settings(settings: config::Config) -> Result<Self> {
        let config: Self = settings
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        let ttl = config.auth.token_ttl_hours;
        ensure!(
            (1..=MAX_TOKEN_TTL_HOURS).contains(&ttl),
            "auth.token_ttl_hours must be between 1 and {MAX_TOKEN_TTL_HOURS}, got {ttl}"
        );

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn settings(pairs: &[(&str, &str)]) -> config::Config {
        let mut builder = config::Config::builder();
        for (key, value) in pairs {
            builder = builder.set_override(*key, *value).unwrap();
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_required_values_with_defaults() {
        let config = Config::from_settings(settings(&[
            ("admin.username", "admin"),
            ("admin.password", "hunter22"),
            ("auth.jwt_secret", "signing-secret"),
        ]))
        .unwrap();

        assert_eq!(config.admin.username, "admin");
        assert_eq!(config.admin.password.expose_secret(), "hunter22");
        assert_eq!(config.auth.token_ttl_hours, 24);
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.server.listen_addr, "0.0.0.0");
        assert!(config.storage.persist);
        assert!(config.storage.encryption_key.is_none());
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_settings(settings(&[
            ("admin.username", "office"),
            ("admin.password", "pw"),
            ("auth.jwt_secret", "s"),
            ("auth.token_ttl_hours", "2"),
            ("server.port", "8080"),
            ("storage.persist", "false"),
            ("storage.path", "/tmp/regs.json"),
            ("storage.encryption_key", "disk-key"),
        ]))
        .unwrap();

        assert_eq!(config.auth.token_ttl_hours, 2);
        assert_eq!(config.server.port, 8080);
        assert!(!config.storage.persist);
        assert_eq!(config.storage.path, PathBuf::from("/tmp/regs.json"));
        assert!(config.storage.encryption_key.is_some());
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let result = Config::from_settings(settings(&[("auth.jwt_secret", "s")]));
        assert!(result.is_err());

        let result = Config::from_settings(settings(&[
            ("admin.username", "admin"),
            ("admin.password", "pw"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_token_ttl_bounds() {
        let with_ttl = |ttl: &str| {
            Config::from_settings(settings(&[
                ("admin.username", "admin"),
                ("admin.password", "pw"),
                ("auth.jwt_secret", "s"),
                ("auth.token_ttl_hours", ttl),
            ]))
        };

        let config = with_ttl("8760").unwrap();
        assert_eq!(config.auth.token_ttl(), chrono::Duration::hours(8760));
        assert_eq!(
            with_ttl("1").unwrap().auth.token_ttl(),
            chrono::Duration::hours(1)
        );

        let err = with_ttl("8761").unwrap_err();
        assert!(err.to_string().contains("auth.token_ttl_hours"));
        assert!(with_ttl("0").is_err());
        assert!(with_ttl("18446744073709551615").is_err());
    }

    #[test]
    fn test_secrets_redacted_in_debug() {
        let config = Config::from_settings(settings(&[
            ("admin.username", "admin"),
            ("admin.password", "super-secret-password"),
            ("auth.jwt_secret", "super-secret-signing-key"),
        ]))
        .unwrap();

        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret-password"));
        assert!(!debug.contains("super-secret-signing-key"));
    }
}
