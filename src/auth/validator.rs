//! Request validator
//!
//! Checks the event name and domain of a directory callback against their
//! allow-lists. A field that fails comes back as `None` so the decision
//! gate can never see a value outside the allow-list.

use crate::protocol::FormFields;

/// Event tag the engine sends when it wants a user's directory entry
pub const DIRECTORY_EVENT: &str = "REQUEST_PARAMS";

/// Validated callback fields
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field {
    EventName,
    Domain,
}

impl Field {
    /// Form key carrying this field
    pub fn form_key(self) -> &'static str {
        match self {
            Field::EventName => "Event-Name",
            Field::Domain => "domain",
        }
    }
}

/// Returns `value` if it is acceptable for `field`, `None` otherwise.
///
/// Event names must equal [`DIRECTORY_EVENT`]. Domains must be an exact,
/// case-sensitive member of `domains`.
pub fn validate<'a>(field: Field, value: &'a str, domains: &[String]) -> Option<&'a str> {
    let accepted = match field {
        Field::EventName => value == DIRECTORY_EVENT,
        Field::Domain => !value.is_empty() && domains.iter().any(|d| d == value),
    };
    accepted.then_some(value)
}

/// Raw fields of one directory callback
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthRequest {
    pub event_name: String,
    pub domain: String,
    pub user: String,
}

impl AuthRequest {
    /// Extract the callback fields. Missing fields are empty.
    pub fn from_form(form: &FormFields) -> Self {
        Self {
            event_name: form.get(Field::EventName.form_key()).unwrap_or("").to_string(),
            domain: form.get(Field::Domain.form_key()).unwrap_or("").to_string(),
            user: form.get("user").unwrap_or("").to_string(),
        }
    }

    /// Sanitize the event name and domain. The user id is passed through
    /// untouched; it only has to resolve to a stored record.
    pub fn validate(self, domains: &[String]) -> ValidatedRequest {
        let event_name = validate(Field::EventName, &self.event_name, domains).map(str::to_string);
        let domain = validate(Field::Domain, &self.domain, domains).map(str::to_string);

        ValidatedRequest {
            event_name,
            domain,
            user: self.user,
        }
    }
}

/// Callback fields after validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    pub event_name: Option<String>,
    pub domain: Option<String>,
    pub user: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domains() -> Vec<String> {
        vec!["pbx.example.com".to_string(), "Lab.example.com".to_string()]
    }

    #[test]
    fn test_event_name_accepts_only_directory_event() {
        let d = domains();
        assert_eq!(
            validate(Field::EventName, "REQUEST_PARAMS", &d),
            Some("REQUEST_PARAMS")
        );
        assert_eq!(validate(Field::EventName, "request_params", &d), None);
        assert_eq!(validate(Field::EventName, "REQUEST_PARAMS ", &d), None);
        assert_eq!(validate(Field::EventName, "CHANNEL_CREATE", &d), None);
        assert_eq!(validate(Field::EventName, "", &d), None);
    }

    #[test]
    fn test_domain_requires_exact_member() {
        let d = domains();
        assert_eq!(
            validate(Field::Domain, "pbx.example.com", &d),
            Some("pbx.example.com")
        );
        assert_eq!(
            validate(Field::Domain, "Lab.example.com", &d),
            Some("Lab.example.com")
        );
        assert_eq!(validate(Field::Domain, "lab.example.com", &d), None);
        assert_eq!(validate(Field::Domain, "PBX.EXAMPLE.COM", &d), None);
        assert_eq!(validate(Field::Domain, "evil.example.com", &d), None);
        assert_eq!(validate(Field::Domain, "", &d), None);
    }

    #[test]
    fn test_empty_domain_never_matches() {
        let d = vec![String::new()];
        assert_eq!(validate(Field::Domain, "", &d), None);
    }

    #[test]
    fn test_validate_request_keeps_user_verbatim() {
        let request = AuthRequest {
            event_name: "REQUEST_PARAMS".to_string(),
            domain: "evil.example.com".to_string(),
            user: " 1001:*".to_string(),
        };

        let validated = request.validate(&domains());
        assert_eq!(validated.event_name.as_deref(), Some("REQUEST_PARAMS"));
        assert_eq!(validated.domain, None);
        assert_eq!(validated.user, " 1001:*");
    }

    #[test]
    fn test_from_form_reads_expected_keys() {
        let form = FormFields::parse(
            b"Event-Name=REQUEST_PARAMS&domain=pbx.example.com&user=1001&action=sip_auth",
            None,
        )
        .unwrap();

        let request = AuthRequest::from_form(&form);
        assert_eq!(request.event_name, "REQUEST_PARAMS");
        assert_eq!(request.domain, "pbx.example.com");
        assert_eq!(request.user, "1001");
    }

    #[test]
    fn test_from_form_missing_fields_are_empty() {
        let form = FormFields::parse(b"", None).unwrap();
        assert_eq!(AuthRequest::from_form(&form), AuthRequest::default());
    }
}
