//! HTTP server
//!
//! Application context, router, the directory handler and the listener.

pub mod core;
pub mod handler;
pub mod state;

pub use self::core::{Server, router};
pub use state::AppState;
