//! Application context
//!
//! Built once at startup and shared by every request. Nothing in it is
//! written while serving.

use std::sync::Arc;

use crate::config::DirectoryConfig;
use crate::store::CredentialStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DirectoryConfig>,
    pub store: Arc<dyn CredentialStore>,
}

impl AppState {
    pub fn new(config: DirectoryConfig, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    pub fn domains(&self) -> &[String] {
        &self.config.domains
    }
}
