//! Directory response documents
//!
//! The engine parses these as trusted XML. The failure document is fixed
//! byte for byte; the success document comes from an askama template that
//! XML-escapes every interpolated value.

use askama::Template;

use crate::auth::Identity;

pub const CONTENT_TYPE_XML: &str = "text/xml";

/// Sent for every rejected lookup
pub const NOT_FOUND_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<document type="freeswitch/xml">
  <section name="result">
    <result status="not found"/>
  </section>
</document>
"#;

#[derive(Template)]
#[template(path = "directory.xml")]
struct DirectoryTemplate<'a> {
    domain: &'a str,
    user_id: &'a str,
    password: &'a str,
    name: &'a str,
    number: &'a str,
}

pub fn render_failure() -> &'static [u8] {
    NOT_FOUND_XML.as_bytes()
}

pub fn render_success(
    domain: &str,
    user_id: &str,
    password: &str,
    name: &str,
    number: &str,
) -> Result<String, askama::Error> {
    let mut doc = DirectoryTemplate {
        domain,
        user_id,
        password,
        name,
        number,
    }
    .render()?;
    // askama drops the template file's final newline; the engine expects it.
    doc.push('\n');
    Ok(doc)
}

pub fn render_identity(identity: &Identity) -> Result<String, askama::Error> {
    render_success(
        &identity.domain,
        &identity.user,
        &identity.password,
        &identity.name,
        &identity.number,
    )
}
