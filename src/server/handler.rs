//! Directory callback handler
//!
//! validate → lookup → decide → render. Every response, including errors,
//! is labelled `text/xml`.

use axum::body::Bytes;
use axum::extract::{RawQuery, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use log::{error, warn};

use super::state::AppState;
use crate::auth::{AuthDecision, AuthRequest, decide};
use crate::middleware::logging::log_decision;
use crate::protocol::{CONTENT_TYPE_XML, FormFields, render_failure, render_identity};

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// `POST /directory`
pub async fn directory(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Response {
    let body: &[u8] = if is_form_body(&headers) { &body } else { &[] };

    let form = match FormFields::parse(body, query.as_deref()) {
        Ok(form) => form,
        Err(e) => {
            warn!("Malformed directory request: {}", e);
            return xml(StatusCode::BAD_REQUEST, ());
        }
    };

    let request = AuthRequest::from_form(&form);
    let raw_domain = request.domain.clone();
    let request = request.validate(state.domains());
    let user = request.user.clone();

    let decision = match request.precheck() {
        Err(reason) => AuthDecision::Reject(reason),
        Ok(checked) => {
            let lookup = state.store.fetch(&checked.user).await;
            decide(checked, lookup)
        }
    };

    log_decision(&user, &raw_domain, &decision);

    match decision {
        AuthDecision::Accept(identity) => match render_identity(&identity) {
            Ok(doc) => xml(StatusCode::OK, doc),
            Err(e) => {
                error!("Failed to render directory entry for {}: {}", user, e);
                xml(StatusCode::OK, render_failure())
            }
        },
        AuthDecision::Reject(_) => xml(StatusCode::OK, render_failure()),
    }
}

/// Any other method on `/directory`
pub async fn method_not_allowed() -> Response {
    xml(StatusCode::METHOD_NOT_ALLOWED, ())
}

fn xml(status: StatusCode, body: impl IntoResponse) -> Response {
    (status, [(header::CONTENT_TYPE, CONTENT_TYPE_XML)], body).into_response()
}

/// The body holds form fields unless another content type is declared
fn is_form_body(headers: &HeaderMap) -> bool {
    match headers.get(header::CONTENT_TYPE) {
        // Lenient: Go's ParseForm treats a missing type as octet-stream and skips the body.
        None => true,
        Some(value) => value
            .to_str()
            .ok()
            .and_then(|v| v.split(';').next())
            .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_URLENCODED)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn with_content_type(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_form_content_types() {
        assert!(is_form_body(&HeaderMap::new()));
        assert!(is_form_body(&with_content_type(
            "application/x-www-form-urlencoded"
        )));
        assert!(is_form_body(&with_content_type(
            "Application/X-WWW-Form-Urlencoded; charset=UTF-8"
        )));
        assert!(!is_form_body(&with_content_type("application/json")));
        assert!(!is_form_body(&with_content_type("multipart/form-data; boundary=x")));
    }
}
