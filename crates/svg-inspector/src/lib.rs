//! SVG document conformance checking.
//!
//! This crate checks an SVG document against a declarative grammar: which
//! elements exist, which attributes each may or must carry, what syntax an
//! attribute value must follow, and which elements may nest inside which. It
//! never rewrites the document; the output is a verdict plus every violation
//! found, in document order.
//!
//! # Example
//!
//! ```rust
//! use svg_inspector::validate_document;
//!
//! let result = validate_document(
//!     r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100">
//!          <rect x="10" y="10" width="80" height="80" fill="#FF0000"/>
//!        </svg>"##,
//! );
//! assert!(result.is_valid());
//!
//! let result = validate_document(r#"<svg width="100"><rect><circle r="2"/></rect></svg>"#);
//! assert_eq!(
//!     result.errors(),
//!     [
//!         "Missing required attribute 'xmlns' on <svg>",
//!         "<circle> is not allowed as a child of <rect>",
//!     ]
//! );
//! ```
//!
//! The result serialises to `{"isValid": bool, "errors": [string]}`.
//! Structured [`Violation`]s with codes and source spans are available from
//! [`ValidationResult::violations`].
//!
//! # Custom catalogues
//!
//! The built-in catalogue covers SVG 1.1 and SVG 2. A different grammar can
//! be loaded with [`SchemaRegistry::from_json`] and checked with
//! [`Validator::with_registry`].

pub mod attributes;
pub mod containment;
pub mod error;
pub mod schema;
pub mod validator;
pub mod values;

pub use attributes::{AttributeValidator, is_wildcard_attribute};
pub use containment::is_allowed_child;
pub use error::{
    SchemaError, SchemaLint, ValidationResult, ValueError, Violation, ViolationKind,
};
pub use schema::{ElementSchema, GlobalCategory, SchemaRegistry};
pub use svg_inspector_xml::SourceSpan;
pub use validator::Validator;

/// Validate a document against the built-in SVG catalogue.
pub fn validate_document(text: &str) -> ValidationResult {
    Validator::new().validate_document(text)
}

/// Validate raw bytes against the built-in SVG catalogue.
///
/// Bytes that are not UTF-8 fail with `Input is not a string`.
pub fn validate_bytes(bytes: &[u8]) -> ValidationResult {
    Validator::new().validate_bytes(bytes)
}
