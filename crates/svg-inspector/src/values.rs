//! Attribute value grammars.
//!
//! Each grammar is a lexical approximation: it catches grossly malformed
//! values cheaply and does not re-implement the full SVG value syntax. In
//! particular path data is only checked for its character class, not for the
//! number of arguments each command takes.

use crate::error::ValueError;
use once_cell::sync::Lazy;
use regex::Regex;

const NUMBER: &str = r"[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?";

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(&format!("^{}$", NUMBER)).unwrap());

static LENGTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("^({})(?:[a-zA-Z]{{2}}|%)?$", NUMBER)).unwrap());

static HEX_COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").unwrap()
});

static COLOR_FUNCTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:rgba?|hsla?)\(\s*[^()]*\)$").unwrap());

static PAINT_SERVER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^url\(\s*#[^()\s]+\s*\)$").unwrap());

static COLOR_NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z]+$").unwrap());

static VIEWBOX_SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s,]+").unwrap());

static TRANSFORM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:(?:translate|scale|rotate|skewX|skewY|matrix)\s*\(\s*[^()\s][^()]*\)\s*,?\s*)+$")
        .unwrap()
});

static PATH_DATA_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[MmZzLlHhVvCcSsQqTtAaEe0-9.,+\-\s]+$").unwrap());

static ASPECT_RATIO_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^x(?:Min|Mid|Max)Y(?:Min|Mid|Max)\s+(?:meet|slice)$").unwrap()
});

const COLOR_KEYWORDS: &[&str] = &["none", "currentColor", "inherit", "transparent"];

/// The value grammar an attribute is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    /// A number with an optional unit.
    Length { non_negative: bool },
    Color,
    /// A number in `0..=1`.
    Opacity,
    ViewBox,
    Transform,
    PathData,
    PreserveAspectRatio,
    /// No grammar is modelled; every value is accepted.
    Unchecked,
}

/// Pick the grammar for an attribute name.
pub fn grammar_for(attr: &str) -> Grammar {
    match attr {
        "width" | "height" | "r" | "rx" | "ry" => Grammar::Length { non_negative: true },
        "x" | "y" | "cx" | "cy" | "x1" | "y1" | "x2" | "y2" | "dx" | "dy" | "offset" => {
            Grammar::Length {
                non_negative: false,
            }
        }
        "fill" | "stroke" | "stop-color" | "flood-color" | "lighting-color" => Grammar::Color,
        "viewBox" => Grammar::ViewBox,
        "transform" | "gradientTransform" | "patternTransform" => Grammar::Transform,
        "d" => Grammar::PathData,
        "preserveAspectRatio" => Grammar::PreserveAspectRatio,
        _ if attr.ends_with("opacity") => Grammar::Opacity,
        _ => Grammar::Unchecked,
    }
}

/// Check `value` against the grammar of `attr`.
///
/// Surrounding whitespace is ignored.
pub fn check(attr: &str, value: &str) -> Result<(), ValueError> {
    grammar_for(attr).check(value)
}

impl Grammar {
    pub fn check(self, value: &str) -> Result<(), ValueError> {
        let value = value.trim();
        match self {
            Grammar::Length { non_negative } => check_length(value, non_negative),
            Grammar::Color => check_color(value),
            Grammar::Opacity => check_opacity(value),
            Grammar::ViewBox => check_view_box(value),
            Grammar::Transform => matches(&TRANSFORM_RE, value, "transform list"),
            Grammar::PathData => check_path_data(value),
            Grammar::PreserveAspectRatio => {
                matches(&ASPECT_RATIO_RE, value, "preserveAspectRatio value")
            }
            Grammar::Unchecked => Ok(()),
        }
    }
}

fn matches(re: &Regex, value: &str, expected: &'static str) -> Result<(), ValueError> {
    if re.is_match(value) {
        Ok(())
    } else {
        Err(ValueError::Malformed { expected })
    }
}

fn check_length(value: &str, non_negative: bool) -> Result<(), ValueError> {
    let number = LENGTH_RE
        .captures(value)
        .and_then(|caps| caps.get(1))
        .ok_or(ValueError::Malformed { expected: "length" })?;

    if non_negative && parse_number(number.as_str()) < 0.0 {
        return Err(ValueError::Negative);
    }
    Ok(())
}

fn check_color(value: &str) -> Result<(), ValueError> {
    let accepted = COLOR_KEYWORDS.contains(&value)
        || HEX_COLOR_RE.is_match(value)
        || COLOR_FUNCTION_RE.is_match(value)
        || PAINT_SERVER_RE.is_match(value)
        || COLOR_NAME_RE.is_match(value);

    if accepted {
        Ok(())
    } else {
        Err(ValueError::Malformed { expected: "color" })
    }
}

fn check_opacity(value: &str) -> Result<(), ValueError> {
    matches(&NUMBER_RE, value, "number")?;

    let opacity = parse_number(value);
    if (0.0..=1.0).contains(&opacity) {
        Ok(())
    } else {
        Err(ValueError::OutOfRange { min: 0.0, max: 1.0 })
    }
}

fn check_view_box(value: &str) -> Result<(), ValueError> {
    let tokens: Vec<&str> = VIEWBOX_SEPARATOR_RE
        .split(value)
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.len() == 4 && tokens.iter().all(|t| NUMBER_RE.is_match(t)) {
        Ok(())
    } else {
        Err(ValueError::Malformed {
            expected: "viewBox (four numbers)",
        })
    }
}

fn check_path_data(value: &str) -> Result<(), ValueError> {
    if value.is_empty() {
        return Err(ValueError::EmptyPath);
    }
    matches(&PATH_DATA_RE, value, "path data")
}

/// Parse text already matched by [`NUMBER`].
fn parse_number(text: &str) -> f64 {
    text.parse::<f64>().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn malformed(expected: &'static str) -> Result<(), ValueError> {
        Err(ValueError::Malformed { expected })
    }

    #[test]
    fn test_grammar_dispatch() {
        assert_eq!(grammar_for("width"), Grammar::Length { non_negative: true });
        assert_eq!(grammar_for("x2"), Grammar::Length { non_negative: false });
        assert_eq!(grammar_for("stop-color"), Grammar::Color);
        assert_eq!(grammar_for("fill-opacity"), Grammar::Opacity);
        assert_eq!(grammar_for("flood-opacity"), Grammar::Opacity);
        assert_eq!(grammar_for("patternTransform"), Grammar::Transform);
        assert_eq!(grammar_for("points"), Grammar::Unchecked);
    }

    #[test]
    fn test_lengths() {
        for value in ["10", "0", "1.5", ".5", "-3", "+4", "10px", "2.5em", "50%", "1e3", " 7 "] {
            assert_eq!(check("x", value), Ok(()), "{} should be a length", value);
        }
        for value in ["invalid", "", "10 px", "px", "1.2.3", "10pxx", "--1"] {
            assert_eq!(check("x", value), malformed("length"), "{} should fail", value);
        }
    }

    #[test]
    fn test_negative_lengths_are_distinct() {
        assert_eq!(check("width", "-5"), Err(ValueError::Negative));
        assert_eq!(check("r", "-0.1px"), Err(ValueError::Negative));
        assert_eq!(check("width", "-0"), Ok(()));
        assert_eq!(check("x", "-5"), Ok(()));
        assert_eq!(check("width", "-abc"), malformed("length"));
    }

    #[test]
    fn test_colors() {
        for value in [
            "none",
            "currentColor",
            "transparent",
            "#FF0000",
            "#f00",
            "#ff000080",
            "rgb(255, 0, 0)",
            "rgba(0,0,0,0.5)",
            "hsl(120, 100%, 50%)",
            "url(#grad1)",
            "red",
            "CornflowerBlue",
        ] {
            assert_eq!(check("fill", value), Ok(()), "{} should be a color", value);
        }
        for value in ["#ff", "#12345", "rgb(1,2", "url(grad)", "light blue", "12"] {
            assert_eq!(check("fill", value), malformed("color"), "{} should fail", value);
        }
    }

    #[test]
    fn test_opacity() {
        assert_eq!(check("opacity", "0"), Ok(()));
        assert_eq!(check("opacity", "1"), Ok(()));
        assert_eq!(check("fill-opacity", "0.25"), Ok(()));
        assert_eq!(check("stop-opacity", ".5"), Ok(()));

        let out_of_range = Err(ValueError::OutOfRange { min: 0.0, max: 1.0 });
        assert_eq!(check("opacity", "1.5"), out_of_range);
        assert_eq!(check("opacity", "-0.1"), out_of_range);

        assert_eq!(check("opacity", "half"), malformed("number"));
        assert_eq!(check("opacity", "50%"), malformed("number"));
    }

    #[test]
    fn test_view_box() {
        assert_eq!(check("viewBox", "0 0 100 100"), Ok(()));
        assert_eq!(check("viewBox", "0,0,100,100"), Ok(()));
        assert_eq!(check("viewBox", " -10, -10  20 20.5 "), Ok(()));

        let expected = malformed("viewBox (four numbers)");
        assert_eq!(check("viewBox", "0 0 100"), expected);
        assert_eq!(check("viewBox", "0 0 100 100 5"), expected);
        assert_eq!(check("viewBox", "0 0 wide 100"), expected);
        assert_eq!(check("viewBox", ""), expected);
    }

    #[test]
    fn test_transforms() {
        for value in [
            "translate(10,10)",
            "translate(10, 10) rotate(45) scale(0.5)",
            "matrix(1 0 0 1 0 0)",
            "skewX(30)skewY(10)",
            "rotate(45), scale(2)",
        ] {
            assert_eq!(check("transform", value), Ok(()), "{} should pass", value);
        }
        for value in [
            "",
            "translate",
            "translate()",
            "translate( )",
            "spin(45)",
            "rotate(45) wobble(1)",
            "rotate((1))",
        ] {
            assert_eq!(
                check("gradientTransform", value),
                malformed("transform list"),
                "{} should fail",
                value
            );
        }
    }

    #[test]
    fn test_path_data() {
        assert_eq!(check("d", "M10,10 L90,10 L90,90 L10,90 Z"), Ok(()));
        assert_eq!(check("d", "m1e2 -3.5E-1 a 5 5 0 0 1 10 10"), Ok(()));
        assert_eq!(check("d", ""), Err(ValueError::EmptyPath));
        assert_eq!(check("d", "   "), Err(ValueError::EmptyPath));
        assert_eq!(check("d", "M10 10 X 5"), malformed("path data"));
    }

    #[test]
    fn test_preserve_aspect_ratio() {
        for value in ["xMidYMid meet", "xMinYMax slice", "xMaxYMin\tmeet"] {
            assert_eq!(check("preserveAspectRatio", value), Ok(()), "{}", value);
        }
        for value in [
            "xMidYMid stretch",
            "middle",
            "xmidymid meet",
            "xMaxYMin",
            "none",
            "xMidYMidmeet",
        ] {
            assert_eq!(
                check("preserveAspectRatio", value),
                malformed("preserveAspectRatio value"),
                "{}",
                value
            );
        }
    }

    #[test]
    fn test_unchecked_attributes_accept_anything() {
        assert_eq!(check("points", "!!!"), Ok(()));
        assert_eq!(check("class", ""), Ok(()));
    }
}
