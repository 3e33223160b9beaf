//! Directory callback protocol
//!
//! Parses callback form bodies and renders the XML documents the engine expects.

pub mod parser;
pub mod responses;

pub use parser::FormFields;
pub use responses::{
    CONTENT_TYPE_XML, NOT_FOUND_XML, render_failure, render_identity, render_success,
};
