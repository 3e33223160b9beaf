//! Authorization gate
//!
//! A request is accepted only when event name, domain, user and stored
//! password are all non-empty. There is no partial success.

use std::fmt;

use super::validator::ValidatedRequest;
use crate::store::{CredentialRecord, Lookup};

/// Values rendered into a success document
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub domain: String,
    pub user: String,
    pub password: String,
    pub name: String,
    pub number: String,
}

/// Why a request was rejected. Only used for server-side logging; the
/// engine always receives the same failure document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RejectReason {
    InvalidEvent,
    DomainNotAllowed,
    EmptyUser,
    NotFound,
    EmptyPassword,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::InvalidEvent => write!(f, "invalid event name"),
            RejectReason::DomainNotAllowed => write!(f, "domain not allowed"),
            RejectReason::EmptyUser => write!(f, "empty user"),
            RejectReason::NotFound => write!(f, "no credential"),
            RejectReason::EmptyPassword => write!(f, "empty password"),
        }
    }
}

/// Outcome of one directory callback
#[derive(Debug, Clone, PartialEq)]
pub enum AuthDecision {
    Accept(Identity),
    Reject(RejectReason),
}

impl AuthDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, AuthDecision::Accept(_))
    }
}

/// A request whose event name, domain and user all passed. Only the
/// stored password is left to check.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckedRequest {
    pub domain: String,
    pub user: String,
}

impl ValidatedRequest {
    /// Fails with the reason this request is rejected whatever the store holds
    pub fn precheck(self) -> Result<CheckedRequest, RejectReason> {
        if self.event_name.as_deref().is_none_or(str::is_empty) {
            return Err(RejectReason::InvalidEvent);
        }
        let domain = match self.domain {
            Some(domain) if !domain.is_empty() => domain,
            _ => return Err(RejectReason::DomainNotAllowed),
        };
        if self.user.is_empty() {
            return Err(RejectReason::EmptyUser);
        }
        Ok(CheckedRequest {
            domain,
            user: self.user,
        })
    }
}

/// Apply the password half of the authorization rule to a checked request
pub fn decide(request: CheckedRequest, lookup: Lookup) -> AuthDecision {
    let record = match lookup {
        Lookup::Found(record) => record,
        Lookup::NotFound => return AuthDecision::Reject(RejectReason::NotFound),
    };

    let CredentialRecord {
        display_name,
        caller_number,
        password,
    } = record;

    if password.is_empty() {
        return AuthDecision::Reject(RejectReason::EmptyPassword);
    }

    AuthDecision::Accept(Identity {
        domain: request.domain,
        user: request.user,
        password,
        name: display_name,
        number: caller_number,
    })
}
