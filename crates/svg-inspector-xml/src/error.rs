//! Error types for XML parsing.

use crate::span::SourceSpan;
use thiserror::Error;

/// Result type alias for svg-inspector-xml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during XML parsing.
///
/// Every variant means the input is not well-formed; no tree is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// XML syntax error reported by quick-xml.
    #[error("XML syntax error: {message}{}", at_byte(.position))]
    XmlSyntax {
        message: String,
        /// Byte offset where the error occurred.
        position: Option<u64>,
    },

    /// Input ended while elements were still open.
    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEof {
        expected: String,
        span: Option<SourceSpan>,
    },

    #[error("Mismatched end tag: expected </{expected}>, found </{found}>")]
    MismatchedEndTag {
        expected: String,
        found: String,
        span: Option<SourceSpan>,
    },

    #[error("Invalid XML structure: {message}")]
    InvalidStructure { message: String },

    /// No root element.
    #[error("Empty XML document: no root element found")]
    EmptyDocument,

    #[error("Invalid XML: multiple root elements")]
    MultipleRoots { span: Option<SourceSpan> },
}

fn at_byte(position: &Option<u64>) -> String {
    match position {
        Some(pos) => format!(" at byte {}", pos),
        None => String::new(),
    }
}

impl Error {
    /// Best-known span for this error, if any.
    pub fn span(&self) -> Option<SourceSpan> {
        match self {
            Error::XmlSyntax { position, .. } => position.map(|p| {
                let p = p as usize;
                SourceSpan::new(p, p)
            }),
            Error::UnexpectedEof { span, .. }
            | Error::MismatchedEndTag { span, .. }
            | Error::MultipleRoots { span } => *span,
            Error::InvalidStructure { .. } | Error::EmptyDocument => None,
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlSyntax {
            message: err.to_string(),
            position: None,
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlSyntax {
            message: format!("Attribute error: {}", err),
            position: None,
        }
    }
}
