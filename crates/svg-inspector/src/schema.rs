//! The SVG schema registry.
//!
//! This module provides the catalogue of permitted elements, the attributes
//! each may or must carry, the global attribute categories, the deprecation
//! lists, and the foreign-content allow-list. The built-in catalogue is
//! authored as JSON (`svg_schema.json`) and embedded at compile time.
//!
//! A registry is immutable once built and can be shared freely between
//! threads.

use crate::error::{SchemaError, SchemaLint};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// A named group of attributes usable on any element unless the element
/// excludes the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlobalCategory {
    /// `id`, `class`, `style`, `lang`, ...
    Core,
    /// `requiredExtensions`, `systemLanguage`
    Conditional,
    /// `onclick`, `onload`, ...
    Event,
    /// `fill`, `stroke`, `transform`, ...
    Presentation,
}

/// Attribute rules for one element.
///
/// `required_attrs ⊆ allowed_attrs` is an authoring rule of the catalogue;
/// [`SchemaRegistry::lint`] reports entries that break it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSchema {
    pub name: String,

    /// Required attributes in catalogue order (keeps error output stable).
    pub required_attrs: Vec<String>,

    pub allowed_attrs: HashSet<String>,

    /// Global categories that may NOT be used on this element.
    pub excluded_globals: Vec<GlobalCategory>,
}

impl ElementSchema {
    pub fn allows(&self, attr: &str) -> bool {
        self.allowed_attrs.contains(attr)
    }

    pub fn excludes(&self, category: GlobalCategory) -> bool {
        self.excluded_globals.contains(&category)
    }
}

/// On-disk shape of a schema catalogue.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    root: String,
    /// Name used for the vocabulary in messages, e.g. "SVG".
    #[serde(default)]
    vocabulary: Option<String>,
    #[serde(default)]
    globals: BTreeMap<GlobalCategory, Vec<String>>,
    #[serde(default)]
    deprecated: DeprecatedFile,
    #[serde(default)]
    foreign_elements: Vec<String>,
    elements: Vec<ElementEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DeprecatedFile {
    #[serde(default)]
    elements: Vec<String>,
    #[serde(default)]
    attributes: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ElementEntry {
    name: String,
    #[serde(default)]
    required: Vec<String>,
    #[serde(default)]
    allowed: Vec<String>,
    #[serde(default)]
    exclude_globals: Vec<GlobalCategory>,
}

/// Catalogue of elements and attributes that a document may use.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    root: String,
    vocabulary: Option<String>,
    elements: HashMap<String, ElementSchema>,
    globals: BTreeMap<GlobalCategory, HashSet<String>>,
    deprecated_elements: HashSet<String>,
    deprecated_attributes: HashSet<String>,
    foreign_elements: HashSet<String>,
    /// Element names listed more than once in the source catalogue.
    duplicates: Vec<String>,
}

/// The built-in SVG catalogue, parsed on first use.
///
/// # Panics
///
/// Panics if the embedded JSON is invalid or fails its lint. Either is a
/// defect in `svg_schema.json`, caught by the tests in this module.
static BUILTIN: Lazy<SchemaRegistry> = Lazy::new(|| {
    let json_data = include_str!("../svg_schema.json");
    SchemaRegistry::from_json(json_data).expect("Invalid built-in SVG schema catalogue")
});

impl SchemaRegistry {
    /// The built-in SVG 1.1 / SVG 2 catalogue.
    pub fn builtin() -> &'static SchemaRegistry {
        &BUILTIN
    }

    /// Load a catalogue from its JSON form.
    ///
    /// # Errors
    ///
    /// Fails if the JSON does not match the catalogue shape, or if the
    /// resulting tables are inconsistent (see [`SchemaRegistry::lint`]).
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        let registry = Self::from_catalog(file);

        let lints = registry.lint();
        if !lints.is_empty() {
            return Err(SchemaError::Inconsistent(lints));
        }

        tracing::debug!(
            root = %registry.root,
            elements = registry.elements.len(),
            "Loaded schema catalogue"
        );
        Ok(registry)
    }

    fn from_catalog(file: CatalogFile) -> Self {
        let mut elements = HashMap::new();
        let mut duplicates = Vec::new();

        // The first entry for a name wins; later ones are only reported.
        for entry in file.elements {
            if elements.contains_key(&entry.name) {
                duplicates.push(entry.name);
                continue;
            }
            let schema = ElementSchema {
                name: entry.name.clone(),
                required_attrs: entry.required,
                allowed_attrs: entry.allowed.into_iter().collect(),
                excluded_globals: entry.exclude_globals,
            };
            elements.insert(entry.name, schema);
        }

        Self {
            root: file.root,
            vocabulary: file.vocabulary,
            elements,
            globals: file
                .globals
                .into_iter()
                .map(|(category, names)| (category, names.into_iter().collect()))
                .collect(),
            deprecated_elements: file.deprecated.elements.into_iter().collect(),
            deprecated_attributes: file.deprecated.attributes.into_iter().collect(),
            foreign_elements: file.foreign_elements.into_iter().collect(),
            duplicates,
        }
    }

    /// Name of the element every document must have as its root.
    pub fn root_element(&self) -> &str {
        &self.root
    }

    /// Display name of the vocabulary, if the catalogue gives one.
    pub fn vocabulary(&self) -> Option<&str> {
        self.vocabulary.as_deref()
    }

    /// Look up the schema for an element. `None` means the element is not
    /// part of the vocabulary.
    pub fn lookup(&self, element: &str) -> Option<&ElementSchema> {
        self.elements.get(element)
    }

    pub fn is_deprecated_element(&self, element: &str) -> bool {
        self.deprecated_elements.contains(element)
    }

    pub fn is_deprecated_attribute(&self, attr: &str) -> bool {
        self.deprecated_attributes.contains(attr)
    }

    /// Elements whose whole subtree lies outside the SVG grammar.
    pub fn is_foreign_element(&self, element: &str) -> bool {
        self.foreign_elements.contains(element)
    }

    /// Union of every global attribute category.
    pub fn global_attribute_names(&self) -> HashSet<&str> {
        self.globals
            .values()
            .flat_map(|names| names.iter().map(String::as_str))
            .collect()
    }

    /// Attributes in one global category.
    pub fn category(&self, category: GlobalCategory) -> impl Iterator<Item = &str> {
        self.globals
            .get(&category)
            .into_iter()
            .flat_map(|names| names.iter().map(String::as_str))
    }

    /// Whether `attr` is a global attribute usable on `schema`'s element,
    /// honouring the element's category exclusions.
    pub fn is_global_attribute(&self, schema: &ElementSchema, attr: &str) -> bool {
        self.globals
            .iter()
            .any(|(category, names)| !schema.excludes(*category) && names.contains(attr))
    }

    /// Check the catalogue's authoring rules.
    ///
    /// Results are sorted so the output is stable.
    pub fn lint(&self) -> Vec<SchemaLint> {
        let mut lints: Vec<SchemaLint> = self
            .duplicates
            .iter()
            .map(|element| SchemaLint::DuplicateElement {
                element: element.clone(),
            })
            .collect();

        for schema in self.elements.values() {
            for attr in &schema.required_attrs {
                if !schema.allows(attr) {
                    lints.push(SchemaLint::RequiredNotAllowed {
                        element: schema.name.clone(),
                        attribute: attr.clone(),
                    });
                }
            }
        }

        for element in &self.foreign_elements {
            if self.elements.contains_key(element) {
                lints.push(SchemaLint::ForeignElementCatalogued {
                    element: element.clone(),
                });
            }
        }

        lints.sort();
        lints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalogue_loads() {
        let registry = SchemaRegistry::builtin();
        assert_eq!(registry.root_element(), "svg");
        assert_eq!(registry.vocabulary(), Some("SVG"));
        assert!(registry.lookup("rect").is_some());
        assert!(registry.lookup("unknown").is_none());
    }

    #[test]
    fn test_builtin_catalogue_is_lint_clean() {
        assert_eq!(SchemaRegistry::builtin().lint(), vec![]);
    }

    #[test]
    fn test_svg_requires_xmlns() {
        let svg = SchemaRegistry::builtin().lookup("svg").unwrap();
        assert_eq!(svg.required_attrs, vec!["xmlns".to_string()]);
        assert!(svg.allows("viewBox"));
    }

    #[test]
    fn test_deprecated_lists() {
        let registry = SchemaRegistry::builtin();
        assert!(registry.is_deprecated_element("tref"));
        assert!(registry.is_deprecated_element("font-face"));
        assert!(!registry.is_deprecated_element("text"));

        assert!(registry.is_deprecated_attribute("enable-background"));
        assert!(registry.is_deprecated_attribute("xlink:title"));
        assert!(!registry.is_deprecated_attribute("xlink:href"));

        // Deprecated elements stay catalogued so they are not also unknown.
        assert!(registry.lookup("tref").is_some());
    }

    #[test]
    fn test_global_attribute_union() {
        let globals = SchemaRegistry::builtin().global_attribute_names();
        for attr in ["id", "class", "systemLanguage", "onclick", "fill", "transform"] {
            assert!(globals.contains(attr), "{} should be global", attr);
        }
        assert!(!globals.contains("width"));
    }

    #[test]
    fn test_global_category_exclusion() {
        let registry = SchemaRegistry::builtin();
        let rect = registry.lookup("rect").unwrap();
        let script = registry.lookup("script").unwrap();

        assert!(registry.is_global_attribute(rect, "fill"));
        assert!(!registry.is_global_attribute(script, "fill"));
        assert!(registry.is_global_attribute(script, "id"));
        assert!(registry.category(GlobalCategory::Presentation).any(|a| a == "fill"));
    }

    #[test]
    fn test_foreign_elements() {
        let registry = SchemaRegistry::builtin();
        assert!(registry.is_foreign_element("div"));
        assert!(registry.is_foreign_element("p"));
        assert!(!registry.is_foreign_element("foreignObject"));
        assert!(!registry.is_foreign_element("a"));
    }

    #[test]
    fn test_custom_catalogue() {
        let registry = SchemaRegistry::from_json(
            r#"{
                "root": "doc",
                "globals": { "core": ["id"] },
                "elements": [
                    { "name": "doc", "required": ["version"], "allowed": ["version"] },
                    { "name": "item", "allowed": ["value"] }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(registry.root_element(), "doc");
        assert_eq!(registry.vocabulary(), None);
        assert!(registry.lookup("item").unwrap().allows("value"));
        assert!(!registry.is_deprecated_element("item"));
        assert_eq!(registry.global_attribute_names().len(), 1);
    }

    #[test]
    fn test_catalogue_lint_rejects_required_not_allowed() {
        let err = SchemaRegistry::from_json(
            r#"{
                "root": "doc",
                "elements": [
                    { "name": "doc", "required": ["version"], "allowed": [] },
                    { "name": "doc", "allowed": [] }
                ],
                "foreign_elements": ["doc"]
            }"#,
        )
        .unwrap_err();

        match err {
            SchemaError::Inconsistent(lints) => {
                assert_eq!(
                    lints,
                    vec![
                        SchemaLint::RequiredNotAllowed {
                            element: "doc".to_string(),
                            attribute: "version".to_string(),
                        },
                        SchemaLint::DuplicateElement {
                            element: "doc".to_string(),
                        },
                        SchemaLint::ForeignElementCatalogued {
                            element: "doc".to_string(),
                        },
                    ]
                );
            }
            other => panic!("expected lint failure, got {:?}", other),
        }
    }

    #[test]
    fn test_catalogue_rejects_unknown_category() {
        let err = SchemaRegistry::from_json(
            r#"{ "root": "doc", "globals": { "styling": [] }, "elements": [] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::Json(_)));
    }
}
