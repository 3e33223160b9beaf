//! Form body parsing
//!
//! Parses `application/x-www-form-urlencoded` callback bodies strictly:
//! a bad percent escape or a `;` separator makes the whole request malformed.

use crate::error::FormError;

/// Decoded form fields, body first then query string
#[derive(Debug, Default, Clone)]
pub struct FormFields {
    pairs: Vec<(String, String)>,
}

impl FormFields {
    /// Parse a form body and an optional raw query string
    pub fn parse(body: &[u8], query: Option<&str>) -> Result<Self, FormError> {
        let mut pairs = decode(body)?;
        if let Some(query) = query {
            pairs.extend(decode(query.as_bytes())?);
        }
        Ok(Self { pairs })
    }

    /// First value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

fn decode(raw: &[u8]) -> Result<Vec<(String, String)>, FormError> {
    check_encoding(raw)?;
    serde_urlencoded::from_bytes(raw).map_err(|e| FormError::InvalidEscape(e.to_string()))
}

fn check_encoding(raw: &[u8]) -> Result<(), FormError> {
    if raw.contains(&b';') {
        return Err(FormError::SemicolonSeparator);
    }

    let mut i = 0;
    while i < raw.len() {
        if raw[i] != b'%' {
            i += 1;
            continue;
        }
        let escape = &raw[i..raw.len().min(i + 3)];
        if escape.len() != 3 || !escape[1..].iter().all(u8::is_ascii_hexdigit) {
            return Err(FormError::InvalidEscape(
                String::from_utf8_lossy(escape).into_owned(),
            ));
        }
        i += 3;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_callback_body() {
        let form = FormFields::parse(
            b"hostname=fs1&section=directory&Event-Name=REQUEST_PARAMS&user=1001&domain=pbx.example.com",
            None,
        )
        .unwrap();
        assert_eq!(form.len(), 5);
        assert_eq!(form.get("Event-Name"), Some("REQUEST_PARAMS"));
        assert_eq!(form.get("user"), Some("1001"));
        assert_eq!(form.get("domain"), Some("pbx.example.com"));
        assert_eq!(form.get("missing"), None);
    }

    #[test]
    fn test_parse_decodes_escapes_and_plus() {
        let form = FormFields::parse(b"user=alice%40home&name=Front+Desk", None).unwrap();
        assert_eq!(form.get("user"), Some("alice@home"));
        assert_eq!(form.get("name"), Some("Front Desk"));
    }

    #[test]
    fn test_first_value_wins_and_body_precedes_query() {
        let form = FormFields::parse(b"user=1001&user=1002", Some("user=2001&domain=q")).unwrap();
        assert_eq!(form.get("user"), Some("1001"));
        assert_eq!(form.get("domain"), Some("q"));
    }

    #[test]
    fn test_empty_body() {
        let form = FormFields::parse(b"", None).unwrap();
        assert!(form.is_empty());
    }

    #[test]
    fn test_invalid_escape_is_malformed() {
        assert_eq!(
            FormFields::parse(b"user=%zz", None).unwrap_err(),
            FormError::InvalidEscape("%zz".to_string())
        );
        assert!(FormFields::parse(b"user=100%", None).is_err());
        assert!(FormFields::parse(b"user=100%4", None).is_err());
    }

    #[test]
    fn test_semicolon_is_malformed() {
        assert_eq!(
            FormFields::parse(b"user=1001;domain=x", None).unwrap_err(),
            FormError::SemicolonSeparator
        );
        assert!(FormFields::parse(b"user=1001", Some("a=b;c=d")).is_err());
    }
}
