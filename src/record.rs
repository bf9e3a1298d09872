//! Core data model for extracted utility classes

use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// One `property: value` pair from a declaration block.
///
/// Records keep declarations as an ordered list; within one record the
/// property names are unique and keep the order they appeared in the rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub property: String,
    pub value: String,
}

/// Category of a utility class, matched in fixed precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Spacing,
    Display,
    Flexbox,
    Typography,
    Background,
    Elevation,
    Border,
    Sizing,
    Position,
    Gap,
    Other,
}

impl Category {
    /// All categories, for CLI filters
    pub fn all() -> &'static [Self] {
        &[
            Self::Spacing,
            Self::Display,
            Self::Flexbox,
            Self::Typography,
            Self::Background,
            Self::Elevation,
            Self::Border,
            Self::Sizing,
            Self::Position,
            Self::Gap,
            Self::Other,
        ]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Spacing => "spacing",
            Self::Display => "display",
            Self::Flexbox => "flexbox",
            Self::Typography => "typography",
            Self::Background => "background",
            Self::Elevation => "elevation",
            Self::Border => "border",
            Self::Sizing => "sizing",
            Self::Position => "position",
            Self::Gap => "gap",
            Self::Other => "other",
        };
        write!(f, "{}", name)
    }
}

/// One extracted utility class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Class name without the leading dot, unique within a root
    pub name: String,

    /// Selector text of the rule that introduced this class
    pub selector: String,

    /// Declarations of the introducing rule, insertion order preserved
    pub properties: Vec<Declaration>,

    /// Assigned category
    pub category: Category,

    /// Human-readable summary, derived from the category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A located vuetify installation within a workspace root
///
/// Rebuilt wholesale on every locate cycle; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installation {
    /// The workspace root this installation belongs to
    pub root_path: PathBuf,

    /// Absolute path to the generated stylesheet
    pub artifact_path: PathBuf,

    /// Version from the package manifest
    pub version: Version,
}
