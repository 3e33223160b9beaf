//! XML Directory - Entry Point
//!
//! Answers the telephony engine's directory callbacks from a Redis credential store.

use log::{error, info};
use std::path::Path;
use std::sync::Arc;

use xml_directory::error::DirectoryError;
use xml_directory::store::RedisStore;
use xml_directory::utils::logging::setup_logging;
use xml_directory::{AppState, DirectoryConfig, Server};

#[tokio::main]
async fn main() {
    setup_logging();

    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), DirectoryError> {
    let path = std::env::args()
        .nth(1)
        .ok_or_else(|| DirectoryError::Usage("xml-directory <config_file>".into()))?;

    info!("Loading configuration from {}", path);
    let config = DirectoryConfig::load(Path::new(&path))?;

    let store = RedisStore::new(&config.redis_local);
    store.check().await?;

    let state = AppState::new(config, Arc::new(store));
    let server = Server::bind(state).await?;
    server.start().await
}
