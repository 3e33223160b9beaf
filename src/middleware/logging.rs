//! Logging middleware
//!
//! One line per directory decision. Passwords never reach the log.

use log::info;

use crate::auth::AuthDecision;

/// Log the outcome of a directory callback
pub fn log_decision(user: &str, domain: &str, decision: &AuthDecision) {
    match decision {
        AuthDecision::Accept(_) => info!("Directory lookup {}@{}: accepted", user, domain),
        AuthDecision::Reject(reason) => {
            info!("Directory lookup {}@{}: rejected ({})", user, domain, reason)
        }
    }
}
