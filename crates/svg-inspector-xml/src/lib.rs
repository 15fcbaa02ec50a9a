//! Source-tracked XML parsing for svg-inspector.
//!
//! This crate is the text-to-tree step in front of the SVG validator. It wraps
//! [`quick-xml`] and produces a tree of [`XmlElement`]s where each element,
//! attribute, and text node remembers the byte range it came from, so that
//! violations found later can point back into the original markup.
//!
//! # Overview
//!
//! The main types are:
//! - [`XmlDocument`]: The parsed document with its single root element
//! - [`XmlElement`]: An element with name, attributes, ordered children, and spans
//! - [`XmlAttribute`]: An attribute with separate spans for its name and value
//! - [`XmlChild`]: One child slot, either an element or a run of text
//!
//! # Example
//!
//! ```rust
//! use svg_inspector_xml::parse;
//!
//! let doc = parse(r#"<svg width="10">
//!   <rect x="1"/>
//!   <rect x="2"/>
//! </svg>"#).unwrap();
//!
//! assert_eq!(doc.root.name, "svg");
//! assert_eq!(doc.root.get_attribute("width"), Some("10"));
//!
//! let rects: Vec<_> = doc.root.elements().collect();
//! assert_eq!(rects.len(), 2);
//! assert_eq!(rects[1].get_attribute("x"), Some("2"));
//! ```
//!
//! The parser never hands back a partial tree: malformed input is always an
//! [`Error`].

pub mod error;
pub mod parser;
pub mod span;
pub mod types;

pub use error::{Error, Result};
pub use parser::parse;
pub use span::{Location, SourceSpan};
pub use types::{XmlAttribute, XmlChild, XmlDocument, XmlElement};
