//! Authentication decision
//!
//! Sanitizes the untrusted callback fields and applies the single
//! authorization rule of the service.

pub mod decision;
pub mod validator;

pub use decision::{AuthDecision, CheckedRequest, Identity, RejectReason, decide};
pub use validator::{AuthRequest, DIRECTORY_EVENT, Field, ValidatedRequest, validate};
