//! XML parser that builds XmlDocument trees.

use crate::{Error, Result, SourceSpan, XmlAttribute, XmlChild, XmlDocument, XmlElement};
use quick_xml::Reader;
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};

/// Parse XML from a string, producing an XmlDocument tree.
///
/// # Example
///
/// ```rust
/// use svg_inspector_xml::parse;
///
/// let doc = parse("<svg><g/></svg>").unwrap();
/// assert_eq!(doc.root.name, "svg");
/// ```
///
/// # Errors
///
/// Returns an error if the XML is malformed, has no root element, or has
/// more than one root element.
pub fn parse(content: &str) -> Result<XmlDocument> {
    let mut parser = XmlParser::new(content);
    parser.parse()
}

/// Event-driven tree builder over a quick-xml reader.
struct XmlParser<'a> {
    /// Markup being parsed; spans index into it.
    source: &'a str,

    reader: Reader<&'a [u8]>,

    /// Stack of elements whose end tag has not been seen yet.
    stack: Vec<BuildNode>,
}

/// An open element, collecting its children.
struct BuildNode {
    name: String,
    prefix: Option<String>,
    name_span: SourceSpan,
    attributes: Vec<XmlAttribute>,

    /// Byte offset of the `<` that opened this element.
    start_offset: usize,

    children: Vec<XmlChild>,
}

impl<'a> XmlParser<'a> {
    fn new(source: &'a str) -> Self {
        let mut reader = Reader::from_str(source);
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;

        Self {
            source,
            reader,
            stack: Vec::new(),
        }
    }

    fn parse(&mut self) -> Result<XmlDocument> {
        let mut root: Option<XmlElement> = None;

        loop {
            // Offset of the `<` (or text start) for this event
            let event_start = self.reader.buffer_position() as usize;

            match self.reader.read_event() {
                Ok(Event::Start(e)) => {
                    self.handle_start(e, event_start)?;
                }
                Ok(Event::End(e)) => {
                    let element = self.handle_end(e)?;
                    self.attach(element, &mut root)?;
                }
                Ok(Event::Empty(e)) => {
                    let element = self.handle_empty(e, event_start)?;
                    self.attach(element, &mut root)?;
                }
                Ok(Event::Text(e)) => {
                    self.handle_text(e, event_start)?;
                }
                Ok(Event::CData(e)) => {
                    self.handle_cdata(e, event_start)?;
                }
                Ok(Event::Comment(_) | Event::PI(_) | Event::Decl(_) | Event::DocType(_)) => {}
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlSyntax {
                        message: e.to_string(),
                        position: Some(self.reader.error_position()),
                    });
                }
            }
        }

        if let Some(node) = self.stack.last() {
            return Err(Error::UnexpectedEof {
                expected: format!("closing tag </{}>", qualified(&node.prefix, &node.name)),
                span: Some(node.name_span),
            });
        }

        let root = root.ok_or(Error::EmptyDocument)?;
        Ok(XmlDocument::new(root, SourceSpan::new(0, self.source.len())))
    }

    /// Hand a finished element to its parent, or make it the root.
    fn attach(&mut self, element: XmlElement, root: &mut Option<XmlElement>) -> Result<()> {
        match self.stack.last_mut() {
            Some(parent) => {
                parent.children.push(XmlChild::Element(element));
                Ok(())
            }
            None if root.is_some() => Err(Error::MultipleRoots {
                span: Some(element.span),
            }),
            None => {
                *root = Some(element);
                Ok(())
            }
        }
    }

    fn handle_start(&mut self, e: BytesStart<'_>, event_start: usize) -> Result<()> {
        let (name, prefix) = split_name(e.name().as_ref());
        let name_span = self.name_span(&e, event_start);
        let attributes = self.parse_attributes(&e, event_start)?;

        self.stack.push(BuildNode {
            name,
            prefix,
            name_span,
            attributes,
            start_offset: event_start,
            children: Vec::new(),
        });

        Ok(())
    }

    fn handle_end(&mut self, e: BytesEnd<'_>) -> Result<XmlElement> {
        let (end_name, end_prefix) = split_name(e.name().as_ref());

        let node = self.stack.pop().ok_or_else(|| Error::InvalidStructure {
            message: format!(
                "Unexpected closing tag </{}>",
                qualified(&end_prefix, &end_name)
            ),
        })?;

        // quick-xml checks end names itself; this guards against a reader
        // configured without that check.
        if node.name != end_name || node.prefix != end_prefix {
            return Err(Error::MismatchedEndTag {
                expected: qualified(&node.prefix, &node.name),
                found: qualified(&end_prefix, &end_name),
                span: Some(node.name_span),
            });
        }

        let end_offset = self.reader.buffer_position() as usize;

        Ok(XmlElement {
            name: node.name,
            prefix: node.prefix,
            attributes: node.attributes,
            children: node.children,
            name_span: node.name_span,
            span: SourceSpan::new(node.start_offset, end_offset),
        })
    }

    fn handle_empty(&mut self, e: BytesStart<'_>, event_start: usize) -> Result<XmlElement> {
        let (name, prefix) = split_name(e.name().as_ref());
        let name_span = self.name_span(&e, event_start);
        let attributes = self.parse_attributes(&e, event_start)?;
        let end_offset = self.reader.buffer_position() as usize;

        Ok(XmlElement {
            name,
            prefix,
            attributes,
            children: Vec::new(),
            name_span,
            span: SourceSpan::new(event_start, end_offset),
        })
    }

    fn handle_text(&mut self, e: BytesText<'_>, event_start: usize) -> Result<()> {
        let text = e.unescape().map_err(|err| Error::XmlSyntax {
            message: format!("Invalid text content: {}", err),
            position: Some(event_start as u64),
        })?;

        let span = SourceSpan::new(event_start, self.reader.buffer_position() as usize);
        let content = text.into_owned();

        match self.stack.last_mut() {
            Some(node) => {
                // Skip whitespace-only text between elements
                if content.trim().is_empty() && !node.children.is_empty() {
                    return Ok(());
                }
                node.children.push(XmlChild::Text { content, span });
                Ok(())
            }
            None if is_blank(&content) => Ok(()),
            None => Err(text_outside_root(event_start)),
        }
    }

    fn handle_cdata(&mut self, e: BytesCData<'_>, event_start: usize) -> Result<()> {
        let content = String::from_utf8_lossy(e.as_ref()).to_string();
        let span = SourceSpan::new(event_start, self.reader.buffer_position() as usize);

        match self.stack.last_mut() {
            Some(node) => {
                node.children.push(XmlChild::Text { content, span });
                Ok(())
            }
            // CDATA is never allowed outside the root, even when empty.
            None => Err(text_outside_root(event_start)),
        }
    }

    fn name_span(&self, e: &BytesStart<'_>, event_start: usize) -> SourceSpan {
        let name_start = event_start + 1; // Skip '<'
        SourceSpan::new(name_start, name_start + e.name().as_ref().len())
    }

    fn parse_attributes(&self, e: &BytesStart<'_>, tag_start: usize) -> Result<Vec<XmlAttribute>> {
        let mut attributes = Vec::new();

        // The tag content starts after '<'
        let content_start = tag_start + 1;
        let tag_str = String::from_utf8_lossy(e.as_ref());

        // Attributes come in source order, so each search resumes where the
        // previous value ended.
        let mut cursor = e.name().as_ref().len();

        for attr_result in e.attributes() {
            let attr = attr_result?;
            let full_name = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            let (name, prefix) = split_name(attr.key.as_ref());

            let value = attr.unescape_value().map_err(|err| Error::XmlSyntax {
                message: format!("Invalid attribute value: {}", err),
                position: Some(tag_start as u64),
            })?;

            let (name_range, value_range) = find_attribute(&tag_str, cursor, &full_name)
                .unwrap_or((cursor..cursor, cursor..cursor));
            cursor = value_range.end;

            attributes.push(XmlAttribute {
                name,
                prefix,
                value: value.into_owned(),
                name_span: SourceSpan::new(
                    content_start + name_range.start,
                    content_start + name_range.end,
                ),
                value_span: SourceSpan::new(
                    content_start + value_range.start,
                    content_start + value_range.end,
                ),
            });
        }

        Ok(attributes)
    }
}

/// Locate `name="value"` inside the raw tag content, starting at `from`.
///
/// Returns the byte ranges of the name and of the quoted value, relative to
/// the tag content. A match must be preceded by whitespace and followed by
/// `=`, so `x` is not found inside `xmlns`.
fn find_attribute(
    tag: &str,
    from: usize,
    name: &str,
) -> Option<(std::ops::Range<usize>, std::ops::Range<usize>)> {
    let mut search_from = from;

    while let Some(rel) = tag.get(search_from..)?.find(name) {
        let name_start = search_from + rel;
        let name_end = name_start + name.len();
        search_from = name_end;

        let preceded_by_space = tag[..name_start]
            .chars()
            .next_back()
            .is_some_and(char::is_whitespace);
        if !preceded_by_space {
            continue;
        }

        let after = &tag[name_end..];
        let trimmed = after.trim_start();
        let Some(rest) = trimmed.strip_prefix('=') else {
            continue;
        };
        let value_rel = rest.len() - rest.trim_start().len();
        let value_start = name_end + (after.len() - rest.len()) + value_rel;

        let quote = tag[value_start..].chars().next()?;
        let value_end = if quote == '"' || quote == '\'' {
            tag[value_start + 1..]
                .find(quote)
                .map_or(tag.len(), |p| value_start + 1 + p + 1)
        } else {
            tag[value_start..]
                .find(|c: char| c.is_whitespace() || c == '/')
                .map_or(tag.len(), |p| value_start + p)
        };

        return Some((name_start..name_end, value_start..value_end));
    }

    None
}

/// Whitespace (and a byte-order mark) is the only character data allowed
/// before or after the root element.
fn is_blank(text: &str) -> bool {
    text.chars().all(|c| c.is_whitespace() || c == '\u{feff}')
}

fn text_outside_root(position: usize) -> Error {
    Error::XmlSyntax {
        message: "character data outside the root element".to_string(),
        position: Some(position as u64),
    }
}

fn split_name(raw: &[u8]) -> (String, Option<String>) {
    let full_name = String::from_utf8_lossy(raw);
    match full_name.split_once(':') {
        Some((prefix, local)) => (local.to_string(), Some(prefix.to_string())),
        None => (full_name.to_string(), None),
    }
}

fn qualified(prefix: &Option<String>, name: &str) -> String {
    match prefix {
        Some(prefix) => format!("{}:{}", prefix, name),
        None => name.to_string(),
    }
}
