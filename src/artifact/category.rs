//! Utility-class categorization and description templates
//!
//! Class names are matched in fixed precedence order; the first family
//! that matches decides the category, and the category decides how the
//! human-readable description is rendered.

use crate::record::{Category, Declaration};

/// Prefix families that make a class eligible for extraction
pub const ELIGIBLE_PREFIXES: &[&str] = &[
    // spacing
    "ma-", "mt-", "mr-", "mb-", "ml-", "ms-", "me-", "mx-", "my-",
    "pa-", "pt-", "pr-", "pb-", "pl-", "ps-", "pe-", "px-", "py-",
    // display
    "d-",
    // flex
    "flex-", "justify-", "align-", "order-",
    // text / font
    "text-", "font-",
    // background
    "bg-",
    // elevation
    "elevation-",
    // border / rounded
    "border", "rounded",
    // width / height
    "w-", "h-",
    // position / offset
    "position-", "top-", "right-", "bottom-", "left-",
    // gap
    "ga-", "gap-",
    // misc
    "overflow-", "float-", "opacity-",
];

/// Check whether a class name starts with a known utility prefix
pub fn is_utility_prefixed(name: &str) -> bool {
    ELIGIBLE_PREFIXES.iter().any(|p| name.starts_with(p))
}

const SPACING_DIRECTIONS: &[char] = &['a', 't', 'r', 'b', 'l', 's', 'e', 'x', 'y'];

fn spacing_parts(name: &str) -> Option<(char, char, &str)> {
    let mut chars = name.chars();
    let kind = chars.next()?;
    let direction = chars.next()?;
    if kind != 'm' && kind != 'p' {
        return None;
    }
    if !SPACING_DIRECTIONS.contains(&direction) {
        return None;
    }
    let rest = name.get(2..)?.strip_prefix('-')?;
    if rest.is_empty() {
        return None;
    }
    Some((kind, direction, rest))
}

/// Assign a category by fixed-precedence prefix match
pub fn categorize(name: &str) -> Category {
    if spacing_parts(name).is_some() {
        Category::Spacing
    } else if name.starts_with("d-") {
        Category::Display
    } else if ["flex-", "justify-", "align-", "order-"]
        .iter()
        .any(|p| name.starts_with(p))
    {
        Category::Flexbox
    } else if name.starts_with("text-") || name.starts_with("font-") {
        Category::Typography
    } else if name.starts_with("bg-") {
        Category::Background
    } else if name.starts_with("elevation-") {
        Category::Elevation
    } else if name.starts_with("border") || name.starts_with("rounded") {
        Category::Border
    } else if name.starts_with("w-") || name.starts_with("h-") {
        Category::Sizing
    } else if ["position-", "top-", "right-", "bottom-", "left-"]
        .iter()
        .any(|p| name.starts_with(p))
    {
        Category::Position
    } else if name.starts_with("ga-") || name.starts_with("gap-") {
        Category::Gap
    } else {
        Category::Other
    }
}

/// Render the description for a class name in the given category
pub fn describe(name: &str, category: Category, properties: &[Declaration]) -> Option<String> {
    match category {
        Category::Spacing => {
            let (kind, direction, value) = spacing_parts(name)?;
            let kind = if kind == 'm' { "margin" } else { "padding" };
            let direction = match direction {
                'a' => "on all sides",
                't' => "on top",
                'r' => "on right",
                'b' => "on bottom",
                'l' => "on left",
                's' => "on the start side",
                'e' => "on the end side",
                'x' => "on the x-axis",
                'y' => "on the y-axis",
                _ => return None,
            };
            Some(format!(
                "Apply {} {} {}",
                kind,
                spacing_value(value),
                direction
            ))
        }
        Category::Display => {
            let rest = name.strip_prefix("d-")?;
            match rest.split_once('-') {
                Some((bp, value)) if is_breakpoint(bp) => {
                    Some(format!("Set display to {} at the {} breakpoint", value, bp))
                }
                _ => Some(format!("Set display to {}", rest)),
            }
        }
        Category::Background => name
            .strip_prefix("bg-")
            .map(|rest| format!("Apply background color {}", rest)),
        Category::Elevation => name
            .strip_prefix("elevation-")
            .map(|rest| format!("Apply elevation level {}", rest)),
        Category::Sizing => {
            let (kind, rest) = if let Some(rest) = name.strip_prefix("w-") {
                ("width", rest)
            } else {
                ("height", name.strip_prefix("h-")?)
            };
            Some(format!("Set {} to {}", kind, rest))
        }
        Category::Position => {
            if let Some(rest) = name.strip_prefix("position-") {
                Some(format!("Set position to {}", rest))
            } else {
                let (edge, rest) = name.split_once('-')?;
                Some(format!("Offset from {} by {}", edge, rest))
            }
        }
        Category::Gap => {
            let rest = name.strip_prefix("ga-").or_else(|| name.strip_prefix("gap-"))?;
            Some(format!("Set gap spacing {}", rest))
        }
        Category::Flexbox | Category::Typography | Category::Border => properties
            .first()
            .map(|d| format!("Set {} to {}", d.property, d.value)),
        Category::Other => None,
    }
}

/// Negative spacing values are encoded with an `n` prefix (`ma-n2`)
fn spacing_value(value: &str) -> String {
    match value.strip_prefix('n') {
        Some(digits) if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) => {
            format!("-{}", digits)
        }
        _ => value.to_string(),
    }
}

fn is_breakpoint(s: &str) -> bool {
    matches!(s, "sm" | "md" | "lg" | "xl" | "xxl")
}
