//! Redis-backed credential store

use async_trait::async_trait;
use log::{debug, warn};

use super::pool::{PoolSettings, RedisPool};
use super::{CredentialRecord, CredentialStore, Lookup};
use crate::config::StoreConfig;
use crate::error::StoreError;

/// Resolves `key_prefix + user` with a single GET per lookup
pub struct RedisStore {
    pool: RedisPool,
    key_prefix: String,
}

impl RedisStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            pool: RedisPool::new(PoolSettings::from(config)),
            key_prefix: config.key_prefix.clone(),
        }
    }

    /// Fail unless the store answers. Called once before serving.
    pub async fn check(&self) -> Result<(), StoreError> {
        self.pool.check().await
    }

    pub fn key(&self, user: &str) -> String {
        format!("{}{}", self.key_prefix, user)
    }

    async fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.pool.get().await?;
        conn.get(key).await
    }
}

#[async_trait]
impl CredentialStore for RedisStore {
    async fn fetch(&self, user: &str) -> Lookup {
        let key = self.key(user);

        match self.get_raw(&key).await {
            Ok(Some(raw)) => match CredentialRecord::from_json(raw.as_bytes()) {
                Some(record) => Lookup::from(Some(record)),
                None => {
                    debug!("Malformed credential record under {}", key);
                    Lookup::NotFound
                }
            },
            Ok(None) => {
                debug!("No credential record under {}", key);
                Lookup::NotFound
            }
            Err(e) => {
                warn!("Credential lookup for {} failed: {}", key, e);
                Lookup::NotFound
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(port: u16) -> StoreConfig {
        StoreConfig {
            host: "127.0.0.1".to_string(),
            port,
            auth: String::new(),
            key_prefix: "directory:".to_string(),
            database: 0,
            max_idle: 3,
            max_active: 0,
            idle_timeout_secs: 180,
            connect_timeout_ms: 500,
            command_timeout_ms: 500,
        }
    }

    #[test]
    fn test_key_is_prefix_plus_raw_user() {
        let store = RedisStore::new(&config(6379));
        assert_eq!(store.key("1001"), "directory:1001");
        assert_eq!(store.key(" a b*"), "directory: a b*");
        assert_eq!(store.key(""), "directory:");
    }

    #[tokio::test]
    async fn test_unreachable_store_is_not_found() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let store = RedisStore::new(&config(port));
        assert_eq!(store.fetch("1001").await, Lookup::NotFound);
    }
}
