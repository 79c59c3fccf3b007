//! Component category classification
//!
//! Document parts inside a package fall into a small number of structural
//! roles: text-bearing stories, page layout, shared resources, and package
//! metadata. Findings and coverage are bucketed by these roles so that a gap
//! in layout samples is not drowned out by noise from story content.
//!
//! Classification works on the part's source path (the top-level grouping the
//! part belongs to); the element tree itself carries no section identity.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Structural role of a document part
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Text-bearing subtrees (stories, word-processing content)
    Story,
    /// Page geometry: spreads, master spreads, style definitions
    Layout,
    /// Shared resources: fonts, graphics, preferences
    Resource,
    /// Package metadata and manifests
    Metadata,
    /// Anything that matches no known grouping
    Other,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Story => "story",
            Category::Layout => "layout",
            Category::Resource => "resource",
            Category::Metadata => "metadata",
            Category::Other => "other",
        };
        write!(f, "{}", name)
    }
}

/// Classifies part paths into component categories
pub struct CategoryMatcher {
    patterns: Vec<(Regex, Category)>,
}

impl Default for CategoryMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryMatcher {
    pub fn new() -> Self {
        // First match wins; patterns cover both page-layout packages
        // (Stories/, Spreads/, Resources/) and word-processing packages
        // (content.xml, styles.xml, META-INF/).
        let patterns = vec![
            (r"(?i)(^|/)stories/", Category::Story),
            (r"(?i)(^|/)content\.xml$", Category::Story),
            (r"(?i)(^|/)(spreads|masterspreads)/", Category::Layout),
            (r"(?i)(^|/)styles\.xml$", Category::Layout),
            (r"(?i)(^|/)resources/", Category::Resource),
            (r"(?i)(fonts|graphic|preferences)\.xml$", Category::Resource),
            (r"(?i)(^|/)meta-inf/", Category::Metadata),
            (r"(?i)(^|/)(designmap\.xml|manifest\.xml|meta\.xml|mimetype)$", Category::Metadata),
            (r"(?i)(^|/)xml/", Category::Metadata),
        ];

        Self {
            patterns: patterns
                .into_iter()
                .map(|(p, c)| (Regex::new(p).expect("category pattern"), c))
                .collect(),
        }
    }

    /// Classify a part path into its component category
    pub fn classify(&self, path: &str) -> Category {
        for (pattern, category) in &self.patterns {
            if pattern.is_match(path) {
                return *category;
            }
        }
        Category::Other
    }
}
