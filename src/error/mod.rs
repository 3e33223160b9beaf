//! Error handling
//!
//! Defines error types for the directory service.

pub mod types;

pub use types::*;
