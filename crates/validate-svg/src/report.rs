//! Rendering validation results for the terminal and for machines.

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use serde::Serialize;
use std::ops::Range;
use svg_inspector::{ValidationResult, Violation};

/// One file's entry in JSON output.
#[derive(Debug, Serialize)]
pub struct FileReport<'a> {
    pub file: String,
    #[serde(flatten)]
    pub result: &'a ValidationResult,
}

/// Render every violation in `result` as text.
///
/// Violations with a span get an ariadne snippet of `source`; the rest are
/// printed as a single line.
pub fn render_text(file: &str, source: &str, result: &ValidationResult, color: bool) -> String {
    if result.is_valid() {
        return format!("✓ {}\n", file);
    }

    let mut output = String::new();
    for violation in result.violations() {
        match violation_range(violation, source) {
            Some(range) => match render_snippet(file, source, violation, range, color) {
                Some(snippet) => output.push_str(&snippet),
                None => output.push_str(&render_line(file, violation)),
            },
            None => output.push_str(&render_line(file, violation)),
        }
    }
    output.push_str(&format!(
        "✗ {} ({} {})\n",
        file,
        result.errors().len(),
        if result.errors().len() == 1 { "error" } else { "errors" }
    ));
    output
}

fn render_line(file: &str, violation: &Violation) -> String {
    format!("{}: [{}] {}\n", file, violation.code(), violation)
}

fn render_snippet(
    file: &str,
    source: &str,
    violation: &Violation,
    range: Range<usize>,
    color: bool,
) -> Option<String> {
    let report = Report::build(ReportKind::Error, file.to_string(), range.start)
        .with_config(Config::default().with_color(color))
        .with_code(violation.code())
        .with_message(violation.kind.title())
        .with_label(
            Label::new((file.to_string(), range))
                .with_message(violation.message())
                .with_color(Color::Red),
        )
        .finish();

    let mut output = Vec::new();
    report
        .write((file.to_string(), Source::from(source)), &mut output)
        .ok()?;
    String::from_utf8(output).ok()
}

/// The violation's span as a character range, widened to at least one
/// character so ariadne has something to underline.
fn violation_range(violation: &Violation, source: &str) -> Option<Range<usize>> {
    let span = violation.span?;
    if span.end > source.len() || !source.is_char_boundary(span.start) {
        return None;
    }

    let total = source.chars().count();
    let start = char_offset(source, span.start);
    let end = char_offset(source, span.end).max(start + 1).min(total);
    if start >= end {
        return None;
    }
    Some(start..end)
}

/// ariadne counts characters, the validator counts bytes.
fn char_offset(source: &str, byte_offset: usize) -> usize {
    source
        .char_indices()
        .take_while(|(idx, _)| *idx < byte_offset)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use svg_inspector::{SourceSpan, ViolationKind, validate_document};

    const INVALID: &str = r#"<svg xmlns="x"><rect width="wide"/></svg>"#;

    #[test]
    fn test_valid_file_is_one_line() {
        let result = validate_document(r#"<svg xmlns="x"/>"#);
        assert_eq!(render_text("a.svg", "", &result, false), "✓ a.svg\n");
    }

    #[test]
    fn test_snippet_names_code_and_message() {
        let result = validate_document(INVALID);
        let text = render_text("bad.svg", INVALID, &result, false);

        assert!(text.contains("[SVG-1-4]"), "{}", text);
        assert!(text.contains("Invalid attribute value"), "{}", text);
        assert!(text.contains("bad.svg"), "{}", text);
        assert!(text.ends_with("✗ bad.svg (1 error)\n"), "{}", text);
    }

    #[test]
    fn test_violation_without_span_is_a_line() {
        let result = svg_inspector::validate_bytes(&[0xff]);
        assert_eq!(
            render_text("x.svg", "", &result, false),
            "x.svg: [SVG-2-3] Input is not a string\n✗ x.svg (1 error)\n"
        );
    }

    #[test]
    fn test_char_offsets() {
        assert_eq!(char_offset("abc", 2), 2);
        assert_eq!(char_offset("éa", 2), 1);
        assert_eq!(char_offset("éa", 3), 2);
    }

    #[test]
    fn test_empty_span_is_widened() {
        let source = "<svg><rect></svg>";
        let violation = Violation::new(ViolationKind::MalformedDocument {
            message: "mismatched end tag".to_string(),
        })
        .with_span(SourceSpan::new(11, 11));
        assert_eq!(violation_range(&violation, source), Some(11..12));

        let at_end = Violation::new(ViolationKind::MalformedDocument {
            message: "unexpected end of input".to_string(),
        })
        .with_span(SourceSpan::new(source.len(), source.len()));
        assert_eq!(violation_range(&at_end, source), None);
    }

    #[test]
    fn test_json_report_shape() {
        let result = validate_document(INVALID);
        let report = FileReport {
            file: "bad.svg".to_string(),
            result: &result,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "file": "bad.svg",
                "isValid": false,
                "errors": ["Invalid attribute value on <rect>: width=\"wide\" is not a valid length"],
            })
        );
    }
}
