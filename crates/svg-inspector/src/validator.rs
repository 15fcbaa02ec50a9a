//! Document validation: the entry point and the tree walk.

use crate::attributes::AttributeValidator;
use crate::containment::is_allowed_child;
use crate::error::{ValidationResult, Violation, ViolationKind};
use crate::schema::SchemaRegistry;
use svg_inspector_xml::{XmlElement, parse};

/// Element whose subtree holds non-SVG content and is never walked.
const FOREIGN_CONTENT_CONTAINER: &str = "foreignObject";

/// A pending element in the tree walk.
struct Visit<'t> {
    element: &'t XmlElement,
    parent: Option<&'t XmlElement>,
}

/// Validates documents against a schema registry.
///
/// A validator holds no per-document state; one instance can check any
/// number of documents, from any number of threads.
///
/// # Example
///
/// ```rust
/// use svg_inspector::Validator;
///
/// let validator = Validator::new();
/// let result = validator.validate_document(
///     r#"<svg xmlns="http://www.w3.org/2000/svg"><rect width="-1"/></svg>"#,
/// );
/// assert!(!result.is_valid());
/// assert_eq!(
///     result.errors(),
///     ["Invalid attribute value on <rect>: width=\"-1\" must not be negative"]
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    registry: &'a SchemaRegistry,
}

impl Validator<'static> {
    /// A validator over the built-in SVG catalogue.
    pub fn new() -> Self {
        Self::with_registry(SchemaRegistry::builtin())
    }
}

impl Default for Validator<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Validator<'a> {
    pub fn with_registry(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'a SchemaRegistry {
        self.registry
    }

    /// Validate raw bytes. Bytes that are not UTF-8 text fail with a single
    /// [`ViolationKind::InvalidInputType`] and are never parsed.
    pub fn validate_bytes(&self, bytes: &[u8]) -> ValidationResult {
        match std::str::from_utf8(bytes) {
            Ok(text) => self.validate_document(text),
            Err(err) => {
                tracing::debug!(error = %err, "Input is not UTF-8 text");
                ValidationResult::failure(Violation::new(ViolationKind::InvalidInputType))
            }
        }
    }

    /// Validate a complete document.
    ///
    /// Malformed markup and a wrong root element each end validation with a
    /// single violation. Otherwise every violation in the tree is collected.
    pub fn validate_document(&self, text: &str) -> ValidationResult {
        tracing::debug!(bytes = text.len(), "Validating document");

        let doc = match parse(text) {
            Ok(doc) => doc,
            Err(err) => {
                tracing::debug!(error = %err, "Document is not well-formed");
                let mut violation = Violation::new(ViolationKind::MalformedDocument {
                    message: err.to_string(),
                });
                violation.span = err.span();
                return ValidationResult::failure(violation);
            }
        };

        let found = doc.root.qualified_name();
        let expected = self.registry.root_element();
        if found != expected {
            return ValidationResult::failure(
                Violation::new(ViolationKind::InvalidRoot {
                    expected: expected.to_string(),
                    found,
                })
                .with_span(doc.root.name_span),
            );
        }

        let violations = self.validate_tree(&doc.root);
        tracing::debug!(errors = violations.len(), "Validation finished");
        ValidationResult::from_violations(violations)
    }

    /// Walk the tree under `root` and collect every violation.
    ///
    /// The order is a depth-first pre-order: an element's placement
    /// violations, then its own, then its children's left to right. The walk
    /// keeps its own stack, so nesting depth is bounded only by memory.
    pub fn validate_tree(&self, root: &XmlElement) -> Vec<Violation> {
        let attributes = AttributeValidator::new(self.registry);
        let mut violations = Vec::new();
        let mut stack = vec![Visit {
            element: root,
            parent: None,
        }];

        while let Some(Visit { element, parent }) = stack.pop() {
            let name = element.qualified_name();

            if self.registry.is_foreign_element(&name) {
                tracing::trace!(element = %name, "Skipping foreign subtree");
                continue;
            }
            tracing::trace!(element = %name, "Visiting element");

            let known = self.registry.lookup(&name).is_some();
            if !known {
                violations.push(
                    Violation::new(ViolationKind::UnknownElement {
                        element: name.clone(),
                        vocabulary: self.registry.vocabulary().map(str::to_string),
                    })
                    .with_span(element.name_span),
                );
            }

            if let Some(parent) = parent {
                let parent_name = parent.qualified_name();
                if !is_allowed_child(&parent_name, &name) {
                    violations.push(
                        Violation::new(ViolationKind::DisallowedChildPlacement {
                            parent: parent_name,
                            child: name.clone(),
                        })
                        .with_span(element.name_span),
                    );
                }
            }

            if self.registry.is_deprecated_element(&name) {
                violations.push(
                    Violation::new(ViolationKind::DeprecatedElement {
                        element: name.clone(),
                    })
                    .with_span(element.name_span),
                );
            }

            if known {
                violations.extend(attributes.validate(element));
            }

            if name == FOREIGN_CONTENT_CONTAINER {
                continue;
            }

            // Reversed so the first child is popped first.
            for child in element.elements().collect::<Vec<_>>().into_iter().rev() {
                stack.push(Visit {
                    element: child,
                    parent: Some(element),
                });
            }
        }

        violations
    }
}
