//! Store connection pool
//!
//! Keeps a bounded LIFO stack of idle connections. Connections idle longer
//! than the idle timeout are closed on the next checkout, and a reused
//! connection must answer `PING` before it is handed out.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use fred::cmd;
use fred::prelude::*;
use log::{debug, info};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::time::timeout;

use crate::config::StoreConfig;
use crate::error::StoreError;

/// Connection and pool parameters
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    pub database: u8,
    pub max_idle: usize,
    /// 0 means unbounded
    pub max_active: usize,
    pub idle_timeout: Duration,
    pub connect_timeout: Duration,
    pub command_timeout: Duration,
}

impl From<&StoreConfig> for PoolSettings {
    fn from(config: &StoreConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            password: (!config.auth.is_empty()).then(|| config.auth.clone()),
            database: config.database,
            max_idle: config.max_idle,
            max_active: config.max_active,
            idle_timeout: config.idle_timeout(),
            connect_timeout: config.connect_timeout(),
            command_timeout: config.command_timeout(),
        }
    }
}

struct IdleClient {
    client: Client,
    since: Instant,
}

/// Pool of store connections
pub struct RedisPool {
    settings: PoolSettings,
    /// Oldest first
    idle: Mutex<Vec<IdleClient>>,
    active: Option<Arc<Semaphore>>,
}

impl RedisPool {
    pub fn new(settings: PoolSettings) -> Self {
        let active = (settings.max_active > 0).then(|| Arc::new(Semaphore::new(settings.max_active)));
        Self {
            settings,
            idle: Mutex::new(Vec::new()),
            active,
        }
    }

    /// Number of idle connections currently held
    pub fn idle_count(&self) -> usize {
        self.lock_idle().len()
    }

    /// Dial a fresh connection and PING it. Used once at startup.
    pub async fn check(&self) -> Result<(), StoreError> {
        let client = self.dial().await?;
        if let Err(e) = self.ping(&client).await {
            close(client);
            return Err(e);
        }
        info!(
            "Store reachable at {}:{}",
            self.settings.host, self.settings.port
        );
        self.put(client);
        Ok(())
    }

    /// Check out a connection, reusing a live idle one when possible
    pub async fn get(&self) -> Result<PooledClient<'_>, StoreError> {
        let permit = match &self.active {
            Some(semaphore) => Some(
                timeout(self.settings.connect_timeout, semaphore.clone().acquire_owned())
                    .await
                    .map_err(|_| StoreError::PoolExhausted)?
                    .map_err(|_| StoreError::PoolExhausted)?,
            ),
            None => None,
        };

        while let Some(client) = self.take_idle() {
            match self.ping(&client).await {
                Ok(()) => return Ok(PooledClient::new(self, client, permit)),
                Err(e) => {
                    debug!("Discarding idle store connection: {}", e);
                    close(client);
                }
            }
        }

        let client = self.dial().await?;
        Ok(PooledClient::new(self, client, permit))
    }

    async fn dial(&self) -> Result<Client, StoreError> {
        let config = Config {
            server: ServerConfig::new_centralized(self.settings.host.clone(), self.settings.port),
            password: self.settings.password.clone(),
            database: Some(self.settings.database),
            ..Default::default()
        };
        let connection = ConnectionConfig {
            connection_timeout: self.settings.connect_timeout,
            ..Default::default()
        };

        // No reconnect policy: a broken connection is dropped, not repaired.
        let client = Client::new(config, None, Some(connection), None);

        match timeout(self.settings.connect_timeout, client.init()).await {
            Ok(Ok(_)) => Ok(client),
            Ok(Err(e)) => {
                close(client);
                Err(StoreError::from(e))
            }
            Err(_) => {
                close(client);
                Err(StoreError::Timeout(self.settings.connect_timeout))
            }
        }
    }

    async fn ping(&self, client: &Client) -> Result<(), StoreError> {
        let args: Vec<String> = vec![];
        timeout(
            self.settings.command_timeout,
            client.custom::<String, _>(cmd!("PING"), args),
        )
        .await
        .map_err(|_| StoreError::Timeout(self.settings.command_timeout))??;
        Ok(())
    }

    /// Pop the most recently used idle connection, closing expired ones
    fn take_idle(&self) -> Option<Client> {
        let mut idle = self.lock_idle();
        let now = Instant::now();
        let fresh_from = idle
            .iter()
            .position(|c| now.duration_since(c.since) < self.settings.idle_timeout)
            .unwrap_or(idle.len());

        for stale in idle.drain(..fresh_from) {
            debug!("Closing store connection idle past {:?}", self.settings.idle_timeout);
            close(stale.client);
        }

        idle.pop().map(|c| c.client)
    }

    /// Return a connection to the idle stack, evicting the oldest when full
    fn put(&self, client: Client) {
        let mut idle = self.lock_idle();
        if idle.len() >= self.settings.max_idle {
            let oldest = idle.remove(0);
            close(oldest.client);
        }
        idle.push(IdleClient {
            client,
            since: Instant::now(),
        });
    }

    fn lock_idle(&self) -> MutexGuard<'_, Vec<IdleClient>> {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Send QUIT in the background; the caller does not wait for it.
fn close(client: Client) {
    if let Ok(handle) = tokio::runtime::Handle::try_current() {
        handle.spawn(async move {
            let _ = client.quit().await;
        });
    }
}

/// A checked-out connection
///
/// Goes back to the idle stack on drop unless a command on it failed.
pub struct PooledClient<'a> {
    pool: &'a RedisPool,
    client: Option<Client>,
    broken: bool,
    _permit: Option<OwnedSemaphorePermit>,
}

impl<'a> PooledClient<'a> {
    fn new(pool: &'a RedisPool, client: Client, permit: Option<OwnedSemaphorePermit>) -> Self {
        Self {
            pool,
            client: Some(client),
            broken: false,
            _permit: permit,
        }
    }

    /// GET `key` as a string, bounded by the command timeout
    pub async fn get(&mut self, key: &str) -> Result<Option<String>, StoreError> {
        let Some(client) = self.client.as_ref() else {
            return Err(StoreError::PoolExhausted);
        };

        let command_timeout = self.pool.settings.command_timeout;
        let result = match timeout(command_timeout, client.get::<Option<String>, _>(key)).await {
            Ok(result) => result.map_err(StoreError::from),
            Err(_) => Err(StoreError::Timeout(command_timeout)),
        };

        if result.is_err() {
            self.broken = true;
        }
        result
    }
}

impl Drop for PooledClient<'_> {
    fn drop(&mut self) {
        if let Some(client) = self.client.take() {
            if self.broken {
                close(client);
            } else {
                self.pool.put(client);
            }
        }
    }
}
