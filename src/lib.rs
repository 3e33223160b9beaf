pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod protocol;
pub mod server;
pub mod store;
pub mod utils;

pub use config::DirectoryConfig;
pub use server::{AppState, Server};
