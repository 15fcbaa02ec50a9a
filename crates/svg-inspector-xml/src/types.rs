//! Core types for source-tracked XML trees.

use crate::span::SourceSpan;

/// A parsed XML document.
#[derive(Debug, Clone)]
pub struct XmlDocument {
    /// The single root element of the document.
    pub root: XmlElement,

    /// Span of the entire input text.
    pub source: SourceSpan,
}

/// An XML element with source location tracking.
#[derive(Debug, Clone)]
pub struct XmlElement {
    /// The local name of the element (without namespace prefix).
    pub name: String,

    /// Namespace prefix, if any (e.g., "svg" in `<svg:rect>`).
    pub prefix: Option<String>,

    /// Attributes in document order. Names are unique per element.
    pub attributes: Vec<XmlAttribute>,

    /// Child elements and text runs in document order.
    pub children: Vec<XmlChild>,

    /// Span of the element name inside the start tag.
    pub name_span: SourceSpan,

    /// Span of the entire element, from `<` of the start tag to the end of
    /// the end tag (or `/>`).
    pub span: SourceSpan,
}

/// An XML attribute with separate spans for name and value.
#[derive(Debug, Clone)]
pub struct XmlAttribute {
    /// The local name of the attribute (without namespace prefix).
    pub name: String,

    /// Namespace prefix, if any (e.g., "xlink" in `xlink:href`).
    pub prefix: Option<String>,

    /// The attribute value after unescaping XML entities.
    pub value: String,

    pub name_span: SourceSpan,

    /// Span of the value including its quotes.
    pub value_span: SourceSpan,
}

/// A single child slot of an element.
#[derive(Debug, Clone)]
pub enum XmlChild {
    Element(XmlElement),

    /// Character data, including CDATA sections.
    Text { content: String, span: SourceSpan },
}

impl XmlDocument {
    pub fn new(root: XmlElement, source: SourceSpan) -> Self {
        Self { root, source }
    }
}

fn qualify(prefix: Option<&str>, name: &str) -> String {
    match prefix {
        Some(prefix) => format!("{}:{}", prefix, name),
        None => name.to_string(),
    }
}

impl XmlElement {
    /// Create a new element without children.
    pub fn new(
        name: impl Into<String>,
        prefix: Option<String>,
        attributes: Vec<XmlAttribute>,
        name_span: SourceSpan,
        span: SourceSpan,
    ) -> Self {
        Self {
            name: name.into(),
            prefix,
            attributes,
            children: Vec::new(),
            name_span,
            span,
        }
    }

    /// The element name as written, `prefix:name` or just `name`.
    pub fn qualified_name(&self) -> String {
        qualify(self.prefix.as_deref(), &self.name)
    }

    /// Get an attribute value by qualified name.
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.get_attribute_full(name).map(|a| a.value.as_str())
    }

    /// Get an attribute by qualified name, including its spans.
    pub fn get_attribute_full(&self, name: &str) -> Option<&XmlAttribute> {
        self.attributes.iter().find(|a| a.qualified_name() == name)
    }

    /// Iterate over child elements in document order, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|c| match c {
            XmlChild::Element(e) => Some(e),
            XmlChild::Text { .. } => None,
        })
    }

    /// Get child elements by qualified name.
    pub fn get_children(&self, name: &str) -> Vec<&XmlElement> {
        self.elements()
            .filter(|e| e.qualified_name() == name)
            .collect()
    }

    /// Concatenated text content of the direct text children, if any.
    pub fn text(&self) -> Option<String> {
        let mut text: Option<String> = None;
        for child in &self.children {
            if let XmlChild::Text { content, .. } = child {
                text.get_or_insert_with(String::new).push_str(content);
            }
        }
        text
    }

    pub fn has_elements(&self) -> bool {
        self.elements().next().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Drop for XmlElement {
    // Descendants are released from a worklist; the derived drop recurses
    // once per nesting level.
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(child) = pending.pop() {
            if let XmlChild::Element(mut element) = child {
                pending.append(&mut element.children);
            }
        }
    }
}

impl XmlAttribute {
    pub fn new(
        name: impl Into<String>,
        prefix: Option<String>,
        value: impl Into<String>,
        name_span: SourceSpan,
        value_span: SourceSpan,
    ) -> Self {
        Self {
            name: name.into(),
            prefix,
            value: value.into(),
            name_span,
            value_span,
        }
    }

    /// The attribute name as written, `prefix:name` or just `name`.
    pub fn qualified_name(&self) -> String {
        qualify(self.prefix.as_deref(), &self.name)
    }
}
