//! Per-element attribute validation.

use crate::error::{Violation, ViolationKind};
use crate::schema::{ElementSchema, SchemaRegistry};
use crate::values;
use once_cell::sync::Lazy;
use regex::Regex;
use svg_inspector_xml::{XmlAttribute, XmlElement};

static EVENT_HANDLER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^on[a-zA-Z]+$").unwrap());

/// Attribute names accepted on every element without a grammar check.
///
/// Covers `data-*`, `aria-*`, `on<event>` handlers and the literal `role`.
pub fn is_wildcard_attribute(attr: &str) -> bool {
    attr == "role"
        || attr.strip_prefix("data-").is_some_and(|rest| !rest.is_empty())
        || attr.strip_prefix("aria-").is_some_and(|rest| !rest.is_empty())
        || EVENT_HANDLER_RE.is_match(attr)
}

/// Checks an element's attributes against its catalogue entry.
#[derive(Debug, Clone, Copy)]
pub struct AttributeValidator<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> AttributeValidator<'a> {
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Validate the attributes of `element`.
    ///
    /// Every problem is reported: missing required attributes first in
    /// catalogue order, then one entry per offending attribute in document
    /// order. An element outside the vocabulary yields a single
    /// [`ViolationKind::UnknownElement`] and no attribute checks.
    pub fn validate(&self, element: &XmlElement) -> Vec<Violation> {
        let name = element.qualified_name();
        let Some(schema) = self.registry.lookup(&name) else {
            return vec![
                Violation::new(ViolationKind::UnknownElement {
                    element: name,
                    vocabulary: self.registry.vocabulary().map(str::to_string),
                })
                .with_span(element.name_span),
            ];
        };

        let mut violations = Vec::new();

        for required in &schema.required_attrs {
            if element.get_attribute_full(required).is_none() {
                violations.push(
                    Violation::new(ViolationKind::MissingRequiredAttribute {
                        element: name.clone(),
                        attribute: required.clone(),
                    })
                    .with_span(element.name_span),
                );
            }
        }

        for attr in &element.attributes {
            if let Some(violation) = self.check_attribute(schema, &name, attr) {
                violations.push(violation);
            }
        }

        violations
    }

    fn check_attribute(
        &self,
        schema: &ElementSchema,
        element: &str,
        attr: &XmlAttribute,
    ) -> Option<Violation> {
        let attr_name = attr.qualified_name();

        if self.registry.is_deprecated_attribute(&attr_name) {
            return Some(
                Violation::new(ViolationKind::DeprecatedAttribute {
                    element: element.to_string(),
                    attribute: attr_name,
                })
                .with_span(attr.name_span),
            );
        }

        let declared =
            schema.allows(&attr_name) || self.registry.is_global_attribute(schema, &attr_name);
        if !declared {
            if is_wildcard_attribute(&attr_name) {
                return None;
            }
            return Some(
                Violation::new(ViolationKind::DisallowedAttribute {
                    element: element.to_string(),
                    attribute: attr_name,
                })
                .with_span(attr.name_span),
            );
        }

        match values::check(&attr_name, &attr.value) {
            Ok(()) => None,
            Err(reason) => {
                tracing::trace!(
                    element,
                    attribute = %attr_name,
                    value = %attr.value,
                    "Attribute value rejected"
                );
                Some(
                    Violation::new(ViolationKind::InvalidAttributeValue {
                        element: element.to_string(),
                        attribute: attr_name,
                        value: attr.value.clone(),
                        reason,
                    })
                    .with_span(attr.value_span),
                )
            }
        }
    }
}
