//! Generated-stylesheet parsing
//!
//! Turns the bytes of a vuetify dist stylesheet into an ordered sequence of
//! utility [`Record`]s. Parsing is a pure function of the input bytes:
//! same artifact, same records, in the same order.
//!
//! The grammar work is delegated to `lightningcss`; this module only walks
//! the resulting rule tree, filters selectors down to single-class utility
//! rules, and deduplicates class names across the whole artifact (the first
//! rule that introduces a name wins).

pub mod category;

use crate::error::{VutilError, VutilResult};
use crate::record::{Declaration, Record};
use lightningcss::printer::PrinterOptions;
use lightningcss::rules::{CssRule, CssRuleList};
use lightningcss::stylesheet::{ParserOptions, StyleSheet};
use lightningcss::traits::ToCss;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Hard ceiling on artifact size; larger inputs are rejected before the
/// grammar parser ever runs.
pub const MAX_ARTIFACT_BYTES: u64 = 50 * 1024 * 1024;

/// Parse an artifact into utility records
pub fn parse(artifact_path: &Path, bytes: &[u8]) -> VutilResult<Vec<Record>> {
    if bytes.len() as u64 > MAX_ARTIFACT_BYTES {
        return Err(VutilError::SizeExceeded {
            path: artifact_path.to_path_buf(),
            size: bytes.len() as u64,
            limit: MAX_ARTIFACT_BYTES,
        });
    }

    let text = std::str::from_utf8(bytes)
        .map_err(|e| VutilError::malformed(artifact_path, format!("not valid UTF-8: {}", e)))?;

    let sheet = StyleSheet::parse(text, ParserOptions::default())
        .map_err(|e| VutilError::malformed(artifact_path, e.to_string()))?;

    let mut walker = RuleWalker {
        seen: HashSet::new(),
        records: Vec::new(),
    };
    walker.walk(&sheet.rules)?;

    debug!(
        "Extracted {} utility record(s) from {}",
        walker.records.len(),
        artifact_path.display()
    );
    Ok(walker.records)
}

struct RuleWalker {
    seen: HashSet<String>,
    records: Vec<Record>,
}

impl RuleWalker {
    fn walk(&mut self, rules: &CssRuleList) -> VutilResult<()> {
        for rule in &rules.0 {
            match rule {
                CssRule::Style(style) => {
                    let properties = collect_declarations(&style.declarations)?;

                    for selector in &style.selectors.0 {
                        let text = selector
                            .to_css_string(PrinterOptions::default())
                            .map_err(|e| {
                                VutilError::Internal(format!("selector serialization: {}", e))
                            })?;

                        if !is_eligible(&text) {
                            continue;
                        }

                        for name in class_tokens(&text) {
                            if !self.seen.insert(name.clone()) {
                                continue;
                            }
                            let cat = category::categorize(&name);
                            let description = category::describe(&name, cat, &properties);
                            self.records.push(Record {
                                name,
                                selector: text.clone(),
                                properties: properties.clone(),
                                category: cat,
                                description,
                            });
                        }
                    }

                    self.walk(&style.rules)?;
                }
                CssRule::Media(media) => self.walk(&media.rules)?,
                CssRule::Supports(supports) => self.walk(&supports.rules)?,
                CssRule::LayerBlock(layer) => self.walk(&layer.rules)?,
                _ => {}
            }
        }
        Ok(())
    }
}

/// Selector eligibility filter
///
/// A selector qualifies only if it targets classes directly: no combinators,
/// no attribute or pseudo-element parts, leading class marker, and a leading
/// class name (pseudo-class suffix stripped) from a known utility family.
fn is_eligible(selector: &str) -> bool {
    if selector.contains(' ') || selector.contains('>') || selector.contains('+') {
        return false;
    }
    if selector.contains('[') || selector.contains("::") {
        return false;
    }
    let Some(rest) = selector.strip_prefix('.') else {
        return false;
    };

    let leading: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();

    category::is_utility_prefixed(&leading)
}

/// Collect every class token appearing in a selector's text
fn class_tokens(selector: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = selector.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if c != '.' {
            continue;
        }
        let mut name = String::new();
        while let Some((_, next)) = chars.peek() {
            if next.is_ascii_alphanumeric() || *next == '-' || *next == '_' {
                name.push(*next);
                chars.next();
            } else {
                break;
            }
        }
        if !name.is_empty() {
            tokens.push(name);
        }
    }
    tokens
}

/// Flatten a declaration block into ordered `property: value` pairs
///
/// Property names are unique per record: a repeated property keeps its
/// first position and takes the last value, matching cascade behavior.
fn collect_declarations(
    block: &lightningcss::declaration::DeclarationBlock,
) -> VutilResult<Vec<Declaration>> {
    let mut out: Vec<Declaration> = Vec::new();

    for property in block
        .declarations
        .iter()
        .chain(block.important_declarations.iter())
    {
        let name = property.property_id().name().to_string();
        let value = property
            .value_to_css_string(PrinterOptions::default())
            .map_err(|e| VutilError::Internal(format!("value serialization: {}", e)))?;

        match out.iter_mut().find(|d| d.property == name) {
            Some(existing) => existing.value = value,
            None => out.push(Declaration {
                property: name,
                value,
            }),
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Category;
    use std::path::PathBuf;

    fn parse_str(css: &str) -> Vec<Record> {
        parse(&PathBuf::from("vuetify.css"), css.as_bytes()).unwrap()
    }

    #[test]
    fn eligibility_filter() {
        let records = parse_str(
            ".ma-2 { margin: 8px }\n\
             .foo .bar { color: red }\n\
             .v-btn::before { content: '' }\n\
             [data-x] { color: blue }",
        );

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "ma-2");
    }

    #[test]
    fn combinators_rejected() {
        let records = parse_str(
            ".ma-1 > .ma-2 { margin: 4px }\n\
             .pa-1 + .pa-2 { padding: 4px }\n\
             .d-flex { display: flex }",
        );

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "d-flex");
    }

    #[test]
    fn non_utility_class_rejected() {
        let records = parse_str(".v-card { padding: 16px }\n.pa-4 { padding: 16px }");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "pa-4");
    }

    #[test]
    fn pseudo_class_suffix_allowed() {
        let records = parse_str(".ma-2:hover { margin: 8px }");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "ma-2");
    }

    #[test]
    fn dedup_first_rule_wins() {
        let records = parse_str(".ma-2 { margin: 8px }\n.ma-2 { margin: 16px }");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].properties.len(), 1);
        assert_eq!(records[0].properties[0].value, "8px");
    }

    #[test]
    fn compound_selector_yields_all_classes() {
        let records = parse_str(".ma-2.pa-2 { margin: 8px; padding: 8px }");

        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["ma-2", "pa-2"]);
        assert_eq!(records[0].selector, records[1].selector);
    }

    #[test]
    fn categorization() {
        let records = parse_str(
            ".pa-4 { padding: 16px }\n\
             .d-flex { display: flex }\n\
             .elevation-8 { box-shadow: 0 5px 5px rgba(0,0,0,.2) }",
        );

        let by_name: std::collections::HashMap<_, _> =
            records.iter().map(|r| (r.name.as_str(), r)).collect();

        let pa4 = by_name["pa-4"];
        assert_eq!(pa4.category, Category::Spacing);
        let desc = pa4.description.as_deref().unwrap();
        assert!(desc.contains("padding"));
        assert!(desc.contains("on all sides"));

        assert_eq!(by_name["d-flex"].category, Category::Display);
        assert_eq!(by_name["elevation-8"].category, Category::Elevation);
    }

    #[test]
    fn rules_inside_media_queries_walked() {
        let records = parse_str(
            "@media (min-width: 600px) { .d-sm-flex { display: flex } }",
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "d-sm-flex");
    }

    #[test]
    fn important_declarations_collected() {
        let records = parse_str(".ma-2 { margin: 8px !important }");
        assert_eq!(records[0].properties.len(), 1);
        assert_eq!(records[0].properties[0].property, "margin");
    }

    #[test]
    fn size_ceiling_rejected_before_parsing() {
        let bytes = vec![b' '; (MAX_ARTIFACT_BYTES + 1) as usize];
        let err = parse(&PathBuf::from("vuetify.css"), &bytes).unwrap_err();
        assert!(matches!(err, VutilError::SizeExceeded { .. }));
    }

    #[test]
    fn malformed_artifact_rejected() {
        let err = parse(&PathBuf::from("vuetify.css"), b"..bad { color: red }").unwrap_err();
        assert!(matches!(err, VutilError::MalformedArtifact { .. }));
    }

    #[test]
    fn parse_is_deterministic() {
        let css = ".ma-2 { margin: 8px }\n.d-flex { display: flex }";
        assert_eq!(parse_str(css), parse_str(css));
    }

    #[test]
    fn class_tokens_extraction() {
        assert_eq!(class_tokens(".ma-2"), vec!["ma-2"]);
        assert_eq!(class_tokens(".ma-2.pa-2"), vec!["ma-2", "pa-2"]);
        assert_eq!(class_tokens(".ma-2:hover"), vec!["ma-2"]);
        assert!(class_tokens("div").is_empty());
    }
}
