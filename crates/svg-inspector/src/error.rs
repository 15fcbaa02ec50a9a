// Violation and error types for SVG validation

use serde::Serialize;
use std::fmt;
use svg_inspector_xml::SourceSpan;
use thiserror::Error;

/// Why an attribute value was rejected by its grammar.
///
/// The `Display` form is the human-readable reason, phrased to follow the
/// offending `name="value"` pair.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    /// The value does not match the attribute's syntax.
    #[error("is not a valid {expected}")]
    Malformed { expected: &'static str },

    /// A well-formed length that must not be negative.
    #[error("must not be negative")]
    Negative,

    /// A well-formed number outside its permitted range.
    #[error("must be between {min} and {max}")]
    OutOfRange { min: f64, max: f64 },

    /// Path data that is empty or only whitespace.
    #[error("is empty path data")]
    EmptyPath,
}

/// Structured violation kinds
#[derive(Debug, Clone, PartialEq)]
pub enum ViolationKind {
    /// Element not in the vocabulary, named by the catalogue when it has a name
    UnknownElement {
        element: String,
        vocabulary: Option<String>,
    },

    MissingRequiredAttribute { element: String, attribute: String },

    /// Attribute neither element-specific, global, nor a wildcard match
    DisallowedAttribute { element: String, attribute: String },

    InvalidAttributeValue {
        element: String,
        attribute: String,
        value: String,
        reason: ValueError,
    },

    DeprecatedElement { element: String },

    DeprecatedAttribute { element: String, attribute: String },

    /// Structurally illegal nesting
    DisallowedChildPlacement { parent: String, child: String },

    /// The text could not be parsed as markup
    MalformedDocument { message: String },

    InvalidRoot { expected: String, found: String },

    /// The input was not text
    InvalidInputType,
}

impl ViolationKind {
    /// Get the error code for this violation kind
    pub fn code(&self) -> &'static str {
        match self {
            ViolationKind::UnknownElement { .. } => "SVG-1-1",
            ViolationKind::MissingRequiredAttribute { .. } => "SVG-1-2",
            ViolationKind::DisallowedAttribute { .. } => "SVG-1-3",
            ViolationKind::InvalidAttributeValue { .. } => "SVG-1-4",
            ViolationKind::DeprecatedElement { .. } => "SVG-1-5",
            ViolationKind::DeprecatedAttribute { .. } => "SVG-1-6",
            ViolationKind::DisallowedChildPlacement { .. } => "SVG-1-7",
            ViolationKind::MalformedDocument { .. } => "SVG-2-1",
            ViolationKind::InvalidRoot { .. } => "SVG-2-2",
            ViolationKind::InvalidInputType => "SVG-2-3",
        }
    }

    /// Short title, used as a heading when rendering the violation
    pub fn title(&self) -> &'static str {
        match self {
            ViolationKind::UnknownElement { .. } => "Unknown element",
            ViolationKind::MissingRequiredAttribute { .. } => "Missing required attribute",
            ViolationKind::DisallowedAttribute { .. } => "Attribute not allowed",
            ViolationKind::InvalidAttributeValue { .. } => "Invalid attribute value",
            ViolationKind::DeprecatedElement { .. } => "Deprecated element",
            ViolationKind::DeprecatedAttribute { .. } => "Deprecated attribute",
            ViolationKind::DisallowedChildPlacement { .. } => "Child not allowed here",
            ViolationKind::MalformedDocument { .. } => "Malformed document",
            ViolationKind::InvalidRoot { .. } => "Invalid root element",
            ViolationKind::InvalidInputType => "Invalid input",
        }
    }

    /// Whether this kind stops validation before any tree walk.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ViolationKind::MalformedDocument { .. }
                | ViolationKind::InvalidRoot { .. }
                | ViolationKind::InvalidInputType
        )
    }

    /// Format a human-readable message from this violation kind
    pub fn message(&self) -> String {
        match self {
            ViolationKind::UnknownElement {
                element,
                vocabulary: Some(vocabulary),
            } => format!("<{}> is not a valid {} element", element, vocabulary),
            ViolationKind::UnknownElement {
                element,
                vocabulary: None,
            } => format!("<{}> is not a valid element", element),
            ViolationKind::MissingRequiredAttribute { element, attribute } => {
                format!("Missing required attribute '{}' on <{}>", attribute, element)
            }
            ViolationKind::DisallowedAttribute { element, attribute } => {
                format!("Attribute '{}' is not allowed on <{}>", attribute, element)
            }
            ViolationKind::InvalidAttributeValue {
                element,
                attribute,
                value,
                reason,
            } => {
                format!(
                    "Invalid attribute value on <{}>: {}=\"{}\" {}",
                    element, attribute, value, reason
                )
            }
            ViolationKind::DeprecatedElement { element } => {
                format!("<{}> is deprecated", element)
            }
            ViolationKind::DeprecatedAttribute { element, attribute } => {
                format!("Attribute '{}' on <{}> is deprecated", attribute, element)
            }
            ViolationKind::DisallowedChildPlacement { parent, child } => {
                format!("<{}> is not allowed as a child of <{}>", child, parent)
            }
            ViolationKind::MalformedDocument { message } => format!("Invalid XML: {}", message),
            ViolationKind::InvalidRoot { expected, found } => {
                format!("Root element is not <{}>, found <{}>", expected, found)
            }
            ViolationKind::InvalidInputType => "Input is not a string".to_string(),
        }
    }
}

/// A single violation, with the source span it concerns when known
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub kind: ViolationKind,
    pub span: Option<SourceSpan>,
}

impl Violation {
    pub fn new(kind: ViolationKind) -> Self {
        Self { kind, span: None }
    }

    pub fn with_span(mut self, span: SourceSpan) -> Self {
        self.span = Some(span);
        self
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn message(&self) -> String {
        self.kind.message()
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.message())
    }
}

/// Outcome of validating one document.
///
/// Serialises to `{ "isValid": bool, "errors": [string] }`. `is_valid` is
/// true exactly when `errors` is empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    is_valid: bool,
    errors: Vec<String>,
    #[serde(skip)]
    violations: Vec<Violation>,
}

impl ValidationResult {
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        let errors: Vec<String> = violations.iter().map(Violation::message).collect();
        Self {
            is_valid: errors.is_empty(),
            errors,
            violations,
        }
    }

    /// A result carrying a single violation.
    pub fn failure(violation: Violation) -> Self {
        Self::from_violations(vec![violation])
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Human-readable messages, in reporting order.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

/// An authoring problem in a schema catalogue
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SchemaLint {
    /// A required attribute that the same element does not allow
    RequiredNotAllowed { element: String, attribute: String },

    DuplicateElement { element: String },

    /// A foreign-content name that is also a catalogued element
    ForeignElementCatalogued { element: String },
}

impl fmt::Display for SchemaLint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaLint::RequiredNotAllowed { element, attribute } => write!(
                f,
                "<{}> requires '{}' but does not allow it",
                element, attribute
            ),
            SchemaLint::DuplicateElement { element } => {
                write!(f, "<{}> is defined more than once", element)
            }
            SchemaLint::ForeignElementCatalogued { element } => write!(
                f,
                "<{}> is both a catalogued element and foreign content",
                element
            ),
        }
    }
}

/// Errors that can occur while loading a schema catalogue
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Invalid schema catalogue: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Inconsistent schema catalogue: {}", join_lints(.0))]
    Inconsistent(Vec<SchemaLint>),
}

fn join_lints(lints: &[SchemaLint]) -> String {
    lints
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offender() {
        let kind = ViolationKind::InvalidAttributeValue {
            element: "rect".to_string(),
            attribute: "width".to_string(),
            value: "invalid".to_string(),
            reason: ValueError::Malformed { expected: "length" },
        };
        assert_eq!(
            kind.message(),
            "Invalid attribute value on <rect>: width=\"invalid\" is not a valid length"
        );

        let kind = ViolationKind::InvalidAttributeValue {
            element: "circle".to_string(),
            attribute: "opacity".to_string(),
            value: "2".to_string(),
            reason: ValueError::OutOfRange { min: 0.0, max: 1.0 },
        };
        assert_eq!(
            kind.message(),
            "Invalid attribute value on <circle>: opacity=\"2\" must be between 0 and 1"
        );

        let kind = ViolationKind::DisallowedChildPlacement {
            parent: "rect".to_string(),
            child: "circle".to_string(),
        };
        assert_eq!(kind.message(), "<circle> is not allowed as a child of <rect>");
    }

    #[test]
    fn test_unknown_element_message_names_vocabulary() {
        let kind = ViolationKind::UnknownElement {
            element: "blink".to_string(),
            vocabulary: Some("SVG".to_string()),
        };
        assert_eq!(kind.message(), "<blink> is not a valid SVG element");

        let kind = ViolationKind::UnknownElement {
            element: "blink".to_string(),
            vocabulary: None,
        };
        assert_eq!(kind.message(), "<blink> is not a valid element");
    }

    #[test]
    fn test_fatal_kinds() {
        assert!(ViolationKind::InvalidInputType.is_fatal());
        assert!(
            !ViolationKind::UnknownElement {
                element: "x".to_string(),
                vocabulary: None,
            }
            .is_fatal()
        );
        assert_eq!(ViolationKind::InvalidInputType.code(), "SVG-2-3");
    }

    #[test]
    fn test_result_validity_tracks_errors() {
        let ok = ValidationResult::from_violations(vec![]);
        assert!(ok.is_valid());
        assert!(ok.errors().is_empty());

        let bad = ValidationResult::failure(Violation::new(ViolationKind::InvalidInputType));
        assert!(!bad.is_valid());
        assert_eq!(bad.errors(), ["Input is not a string".to_string()]);
        assert_eq!(bad.violations().len(), 1);
    }

    #[test]
    fn test_result_serialisation() {
        let result = ValidationResult::failure(
            Violation::new(ViolationKind::DeprecatedElement {
                element: "tref".to_string(),
            })
            .with_span(SourceSpan::new(1, 5)),
        );
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"isValid":false,"errors":["<tref> is deprecated"]}"#);
    }

    #[test]
    fn test_schema_error_display() {
        let err = SchemaError::Inconsistent(vec![SchemaLint::DuplicateElement {
            element: "g".to_string(),
        }]);
        assert_eq!(
            err.to_string(),
            "Inconsistent schema catalogue: <g> is defined more than once"
        );
    }
}
