//! Configuration management for the directory service
//!
//! The configuration is loaded once at startup from the file named on the
//! command line, with environment overrides, and is immutable afterwards.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Complete process configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DirectoryConfig {
    pub listen: ListenConfig,

    /// Credential store connection (legacy key name kept for existing files)
    pub redis_local: StoreConfig,

    /// Domains this instance answers for. Matching is exact and case-sensitive.
    pub domains: Vec<String>,
}

/// HTTP listener address
#[derive(Debug, Deserialize, Clone)]
pub struct ListenConfig {
    /// Empty means all interfaces
    #[serde(default)]
    pub host: String,
    pub port: u16,
}

/// Key-value store connection parameters and pool tuning
#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    pub host: String,
    pub port: u16,

    /// AUTH password, empty to skip AUTH
    #[serde(default)]
    pub auth: String,

    /// Prepended verbatim to the user id to build the lookup key
    #[serde(default)]
    pub key_prefix: String,

    #[serde(default)]
    pub database: u8,

    // ═══ POOL TUNING ═══
    #[serde(default = "default_max_idle")]
    pub max_idle: usize,

    /// 0 means no bound on concurrent checkouts
    #[serde(default)]
    pub max_active: usize,

    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,

    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    #[serde(default = "default_command_timeout_ms")]
    pub command_timeout_ms: u64,
}

fn default_max_idle() -> usize {
    3
}

fn default_idle_timeout_secs() -> u64 {
    180
}

fn default_connect_timeout_ms() -> u64 {
    2000
}

fn default_command_timeout_ms() -> u64 {
    1000
}

impl DirectoryConfig {
    /// Load configuration from `path` with `DIRECTORY_*` environment overrides
    ///
    /// Nested keys use `__`, e.g. `DIRECTORY_REDIS_LOCAL__AUTH`.
    pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path).required(true))
            .add_source(
                Environment::with_prefix("DIRECTORY")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: DirectoryConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.listen.port == 0 {
            return Err(config::ConfigError::Message(
                "listen.port cannot be 0".into(),
            ));
        }

        if self.redis_local.host.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "redis_local.host cannot be empty".into(),
            ));
        }

        if self.redis_local.port == 0 {
            return Err(config::ConfigError::Message(
                "redis_local.port cannot be 0".into(),
            ));
        }

        if self.domains.is_empty() {
            return Err(config::ConfigError::Message(
                "at least one domain must be configured".into(),
            ));
        }

        if self.domains.iter().any(|d| d.is_empty()) {
            return Err(config::ConfigError::Message(
                "domains cannot contain an empty entry".into(),
            ));
        }

        if self.redis_local.max_idle == 0 {
            return Err(config::ConfigError::Message(
                "redis_local.max_idle must be greater than 0".into(),
            ));
        }

        if self.redis_local.idle_timeout_secs == 0
            || self.redis_local.connect_timeout_ms == 0
            || self.redis_local.command_timeout_ms == 0
        {
            return Err(config::ConfigError::Message(
                "redis_local timeouts must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

impl ListenConfig {
    /// Get the bind address as `host:port`
    pub fn socket(&self) -> String {
        let host = if self.host.is_empty() {
            "0.0.0.0"
        } else {
            self.host.as_str()
        };
        format!("{}:{}", host, self.port)
    }
}

impl StoreConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn write_config(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "xml-directory-{}-{}.json",
            name,
            std::process::id()
        ));
        fs::write(&path, body).unwrap();
        path
    }

    const LEGACY: &str = r#"{
        "listen": { "host": "", "port": "8080" },
        "redis_local": { "host": "127.0.0.1", "port": "6379", "auth": "secret", "key_prefix": "sip:" },
        "domains": ["pbx.example.com", "Lab.example.com"]
    }"#;

    #[test]
    fn test_load_legacy_file_with_string_ports() {
        let path = write_config("legacy", LEGACY);
        let config = DirectoryConfig::load(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(config.listen.port, 8080);
        assert_eq!(config.listen.socket(), "0.0.0.0:8080");
        assert_eq!(config.redis_local.port, 6379);
        assert_eq!(config.redis_local.auth, "secret");
        assert_eq!(config.redis_local.key_prefix, "sip:");
        assert_eq!(config.redis_local.max_idle, 3);
        assert_eq!(config.redis_local.max_active, 0);
        assert_eq!(config.redis_local.idle_timeout(), Duration::from_secs(180));
        assert_eq!(config.domains.len(), 2);
    }

    #[test]
    fn test_missing_file_is_error() {
        let path = std::env::temp_dir().join("xml-directory-does-not-exist.json");
        assert!(DirectoryConfig::load(&path).is_err());
    }

    #[test]
    fn test_rejects_empty_domain_list() {
        let path = write_config(
            "nodomains",
            r#"{
                "listen": { "host": "127.0.0.1", "port": 8080 },
                "redis_local": { "host": "127.0.0.1", "port": 6379 },
                "domains": []
            }"#,
        );
        let result = DirectoryConfig::load(&path);
        fs::remove_file(&path).ok();
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_zero_listen_port() {
        let path = write_config(
            "zeroport",
            r#"{
                "listen": { "host": "127.0.0.1", "port": 0 },
                "redis_local": { "host": "127.0.0.1", "port": 6379 },
                "domains": ["pbx.example.com"]
            }"#,
        );
        let result = DirectoryConfig::load(&path);
        fs::remove_file(&path).ok();
        assert!(result.is_err());
    }
}
