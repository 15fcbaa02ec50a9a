//! Parent/child containment rules.
//!
//! The policy is permissive: a known element may contain any other known
//! element unless one of the rules below narrows it. Child-side rules are
//! checked before parent-side ones.

const GRADIENTS: &[&str] = &["linearGradient", "radialGradient"];

const ANIMATION: &[&str] = &["animate", "animateMotion", "animateTransform", "set", "discard"];

const DESCRIPTIVE: &[&str] = &["desc", "title", "metadata"];

const SHAPES: &[&str] = &[
    "rect", "circle", "ellipse", "line", "polyline", "polygon", "path", "image", "use",
];

const TEXT_CONTENT: &[&str] = &["text", "tspan", "textPath"];

const TEXT_FLOW: &[&str] = &["tspan", "textPath", "a", "tref", "altGlyph"];

/// The rule that governs what an element may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParentRule {
    /// Stops plus animation and descriptive children.
    Gradient,
    /// Only animation and descriptive children.
    Leaf,
    /// Text-flow plus animation and descriptive children.
    Text,
    Any,
}

fn parent_rule(parent: &str) -> ParentRule {
    if GRADIENTS.contains(&parent) {
        ParentRule::Gradient
    } else if SHAPES.contains(&parent) {
        ParentRule::Leaf
    } else if TEXT_CONTENT.contains(&parent) {
        ParentRule::Text
    } else {
        ParentRule::Any
    }
}

fn is_animation_or_descriptive(child: &str) -> bool {
    ANIMATION.contains(&child) || DESCRIPTIVE.contains(&child)
}

/// Whether `child` may appear directly inside `parent`.
///
/// Independent of attribute legality, and total: unknown names on either
/// side fall through to the permissive default.
pub fn is_allowed_child(parent: &str, child: &str) -> bool {
    match child {
        "stop" => return GRADIENTS.contains(&parent),
        "mpath" => return parent == "animateMotion",
        _ => {}
    }

    match parent_rule(parent) {
        ParentRule::Gradient => child == "stop" || is_animation_or_descriptive(child),
        ParentRule::Leaf => is_animation_or_descriptive(child),
        ParentRule::Text => TEXT_FLOW.contains(&child) || is_animation_or_descriptive(child),
        ParentRule::Any => true,
    }
}
