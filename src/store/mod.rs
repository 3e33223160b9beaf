//! Credential store client
//!
//! Resolves a user id to a credential record. Every failure (unreachable
//! store, timeout, missing key, malformed value) comes back as
//! [`Lookup::NotFound`] so the HTTP peer cannot tell them apart.

pub mod pool;
pub mod redis;

pub use pool::{PoolSettings, PooledClient, RedisPool};
pub use redis::RedisStore;

use async_trait::async_trait;
use serde::Deserialize;

/// Stored identity of one user, as JSON `{"name":..,"number":..,"pass":..}`
///
/// Missing fields default to empty, unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CredentialRecord {
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(rename = "number")]
    pub caller_number: String,
    #[serde(rename = "pass")]
    pub password: String,
}

impl CredentialRecord {
    /// Parse a stored value. `None` if it is not a record.
    pub fn from_json(raw: &[u8]) -> Option<Self> {
        serde_json::from_slice::<Option<CredentialRecord>>(raw)
            .ok()
            .map(Option::unwrap_or_default)
    }
}

/// Result of a credential lookup
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Found(CredentialRecord),
    NotFound,
}

/// A found record may still carry an empty password; the authorization
/// gate rejects those.
impl From<Option<CredentialRecord>> for Lookup {
    fn from(record: Option<CredentialRecord>) -> Self {
        match record {
            Some(record) => Lookup::Found(record),
            None => Lookup::NotFound,
        }
    }
}

/// Source of credential records
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up the record stored for `user`. The user id is used verbatim.
    async fn fetch(&self, user: &str) -> Lookup;
}
