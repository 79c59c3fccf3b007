//! Validation against an observed schema
//!
//! Walks a candidate document exactly as the sample walker does, but
//! classifies instead of accumulating. The schema is read-only here; a
//! validation run can never mutate a snapshot.
//!
//! Finding kinds and severities:
//! - unknown element (high): the tag was never observed at all
//! - unknown attribute (medium): the tag is known but never carried this attribute
//! - missing typical attribute (medium): an attribute carried by nearly every
//!   historical occurrence of this tag is absent here
//! - unexpected child (low): a structural surprise, not necessarily wrong
//!
//! Attribute *values* are never validated: once an attribute's value sampling
//! is cap-exceeded the model treats it as free text, and below the cap the
//! sample set is too small to call a new literal wrong.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use tracing::debug;

use crate::category::{Category, CategoryMatcher};
use crate::element::Sample;
use crate::error::{Result, SchemaError};
use crate::schema::ObservedSchema;
use crate::walker::walk_with_depth;

/// What a finding reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    UnknownElement,
    UnknownAttribute,
    UnexpectedChild,
    MissingTypicalAttribute,
}

/// How much a finding matters
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl FindingKind {
    pub fn severity(self) -> Severity {
        match self {
            FindingKind::UnknownElement => Severity::High,
            FindingKind::UnknownAttribute => Severity::Medium,
            FindingKind::MissingTypicalAttribute => Severity::Medium,
            FindingKind::UnexpectedChild => Severity::Low,
        }
    }
}

/// Where a finding was raised
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Source part path within the package
    pub file: String,
    /// Ancestor tag path within the part
    pub path: String,
}

/// One validation finding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    pub location: Location,
    pub severity: Severity,
}

/// Per-category finding counts, split by kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub unknown_elements: u64,
    pub unknown_attributes: u64,
    pub unexpected_children: u64,
    pub missing_typical_attributes: u64,
}

impl CategoryCounts {
    fn bump(&mut self, kind: FindingKind) {
        match kind {
            FindingKind::UnknownElement => self.unknown_elements += 1,
            FindingKind::UnknownAttribute => self.unknown_attributes += 1,
            FindingKind::UnexpectedChild => self.unexpected_children += 1,
            FindingKind::MissingTypicalAttribute => self.missing_typical_attributes += 1,
        }
    }

    fn absorb(&mut self, other: &CategoryCounts) {
        self.unknown_elements += other.unknown_elements;
        self.unknown_attributes += other.unknown_attributes;
        self.unexpected_children += other.unexpected_children;
        self.missing_typical_attributes += other.missing_typical_attributes;
    }
}

/// Ordered findings plus summary counts grouped by component category
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub findings: Vec<Finding>,
    pub summary_by_category: BTreeMap<Category, CategoryCounts>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Count findings at a given severity
    pub fn count_at(&self, severity: Severity) -> usize {
        self.findings.iter().filter(|f| f.severity == severity).count()
    }

    /// Count findings of a given kind
    pub fn count_of(&self, kind: FindingKind) -> usize {
        self.findings.iter().filter(|f| f.kind == kind).count()
    }

    /// Fold another report into this one (multi-part validation runs)
    pub fn absorb(&mut self, other: ValidationReport) {
        self.findings.extend(other.findings);
        for (category, counts) in other.summary_by_category {
            self.summary_by_category
                .entry(category)
                .or_default()
                .absorb(&counts);
        }
    }
}

/// Validator tuning knobs
#[derive(Debug, Clone)]
pub struct ValidateOptions {
    /// Minimum historical frequency for an attribute to count as typical
    pub missing_attr_threshold: f64,
    /// Traversal nesting-depth guard
    pub max_depth: usize,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        let config = crate::config::EngineConfig::default();
        Self {
            missing_attr_threshold: config.missing_attr_threshold,
            max_depth: config.max_depth,
        }
    }
}

impl From<&crate::config::EngineConfig> for ValidateOptions {
    fn from(config: &crate::config::EngineConfig) -> Self {
        Self {
            missing_attr_threshold: config.missing_attr_threshold,
            max_depth: config.max_depth,
        }
    }
}

/// Validate one candidate document against an observed schema.
///
/// Fails with [`SchemaError::MalformedSample`] if the candidate cannot be
/// traversed; that is fatal for this operation but touches nothing persisted.
pub fn validate(
    schema: &ObservedSchema,
    sample: &Sample,
    options: &ValidateOptions,
) -> Result<ValidationReport> {
    let matcher = CategoryMatcher::new();
    let category = matcher.classify(&sample.file);

    let mut report = ValidationReport::default();
    let mut counts = CategoryCounts::default();

    for visit in walk_with_depth(&sample.root, options.max_depth) {
        let visit = visit.map_err(|err| match err {
            SchemaError::MalformedSample { reason, .. } => SchemaError::MalformedSample {
                file: sample.file.clone(),
                reason,
            },
            other => other,
        })?;

        let location = Location {
            file: sample.file.clone(),
            path: visit.path.clone(),
        };

        let profile = match schema.profile(visit.tag) {
            Some(profile) => profile,
            None => {
                counts.bump(FindingKind::UnknownElement);
                report.findings.push(Finding {
                    kind: FindingKind::UnknownElement,
                    tag: visit.tag.to_string(),
                    attribute: None,
                    location,
                    severity: FindingKind::UnknownElement.severity(),
                });
                // No profile to check attributes or children against.
                continue;
            }
        };

        for (name, _) in visit.attrs {
            if !profile.attrs.contains(name) {
                counts.bump(FindingKind::UnknownAttribute);
                report.findings.push(Finding {
                    kind: FindingKind::UnknownAttribute,
                    tag: visit.tag.to_string(),
                    attribute: Some(name.clone()),
                    location: location.clone(),
                    severity: FindingKind::UnknownAttribute.severity(),
                });
            }
        }

        // An attribute is typical when nearly every historical occurrence of
        // the tag carried it; genuinely optional attributes stay quiet.
        for (attr, _) in profile
            .attr_values
            .iter()
            .filter(|(_, av)| av.count > 0)
        {
            if profile.attr_frequency(attr) >= options.missing_attr_threshold
                && visit.attrs.iter().all(|(name, _)| name != attr)
            {
                counts.bump(FindingKind::MissingTypicalAttribute);
                report.findings.push(Finding {
                    kind: FindingKind::MissingTypicalAttribute,
                    tag: visit.tag.to_string(),
                    attribute: Some(attr.clone()),
                    location: location.clone(),
                    severity: FindingKind::MissingTypicalAttribute.severity(),
                });
            }
        }

        for child in &visit.children {
            if !profile.children.contains(*child) {
                counts.bump(FindingKind::UnexpectedChild);
                report.findings.push(Finding {
                    kind: FindingKind::UnexpectedChild,
                    tag: (*child).to_string(),
                    attribute: None,
                    location: location.clone(),
                    severity: FindingKind::UnexpectedChild.severity(),
                });
            }
        }
    }

    report
        .summary_by_category
        .entry(category)
        .or_default()
        .absorb(&counts);

    debug!(
        file = %sample.file,
        findings = report.findings.len(),
        "validated sample"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulate::SchemaBuilder;
    use crate::config::EngineConfig;
    use crate::element::Element;

    fn training_samples() -> Vec<Sample> {
        vec![
            Sample::new(
                "Stories/Story_u1.xml",
                Element::new("Foo").attr("a", "1").attr("b", "2"),
            ),
            Sample::new(
                "Stories/Story_u2.xml",
                Element::new("Foo").attr("a", "10").attr("b", "20"),
            ),
        ]
    }

    fn schema_of(samples: &[Sample]) -> ObservedSchema {
        let mut builder = SchemaBuilder::new(&EngineConfig::default());
        builder.merge_corpus(samples);
        builder.finish()
    }

    #[test]
    fn test_training_samples_validate_clean() {
        let samples = training_samples();
        let schema = schema_of(&samples);
        for sample in &samples {
            let report = validate(&schema, sample, &ValidateOptions::default()).unwrap();
            assert_eq!(report.count_at(Severity::High), 0);
            assert_eq!(report.count_at(Severity::Medium), 0);
        }
    }

    #[test]
    fn test_unknown_attribute_and_missing_typical() {
        let schema = schema_of(&training_samples());
        let candidate = Sample::new("Stories/Story_u3.xml", Element::new("Foo").attr("c", "3"));

        let report = validate(&schema, &candidate, &ValidateOptions::default()).unwrap();

        // c is unknown; a and b each appeared in 100% of prior occurrences.
        assert_eq!(report.count_of(FindingKind::UnknownAttribute), 1);
        assert_eq!(report.count_of(FindingKind::MissingTypicalAttribute), 2);
        let unknown = report
            .findings
            .iter()
            .find(|f| f.kind == FindingKind::UnknownAttribute)
            .unwrap();
        assert_eq!(unknown.attribute.as_deref(), Some("c"));
    }

    #[test]
    fn test_unknown_element_suppresses_attribute_checks() {
        let schema = schema_of(&training_samples());
        let candidate = Sample::new("Stories/Story_u4.xml", Element::new("Bar").attr("x", "1"));

        let report = validate(&schema, &candidate, &ValidateOptions::default()).unwrap();
        assert_eq!(report.count_of(FindingKind::UnknownElement), 1);
        assert_eq!(report.count_of(FindingKind::UnknownAttribute), 0);
    }

    #[test]
    fn test_unexpected_child_is_low_severity() {
        let samples = vec![Sample::new(
            "Spreads/Spread_u1.xml",
            Element::new("Spread").child(Element::new("Page")),
        )];
        let schema = schema_of(&samples);

        let candidate = Sample::new(
            "Spreads/Spread_u2.xml",
            Element::new("Spread").child(Element::new("Page")).child(Element::new("Page")),
        );
        let clean = validate(&schema, &candidate, &ValidateOptions::default()).unwrap();
        assert_eq!(clean.count_of(FindingKind::UnexpectedChild), 0);

        // Guide is a known tag nowhere, so it raises both unknown-element
        // (for itself) and unexpected-child (under Spread).
        let surprising = Sample::new(
            "Spreads/Spread_u3.xml",
            Element::new("Spread").child(Element::new("Guide")),
        );
        let report = validate(&schema, &surprising, &ValidateOptions::default()).unwrap();
        assert_eq!(report.count_of(FindingKind::UnexpectedChild), 1);
        let child_finding = report
            .findings
            .iter()
            .find(|f| f.kind == FindingKind::UnexpectedChild)
            .unwrap();
        assert_eq!(child_finding.severity, Severity::Low);
    }

    #[test]
    fn test_cap_exceeded_values_raise_nothing() {
        let mut config = EngineConfig::default();
        config.value_cap = 3;
        let mut builder = SchemaBuilder::new(&config);
        for (i, v) in ["1", "2", "3", "4"].iter().enumerate() {
            builder
                .merge_sample(&Sample::new(
                    format!("Stories/Story_u{}.xml", i),
                    Element::new("Foo").attr("a", *v),
                ))
                .unwrap();
        }
        let schema = builder.finish();
        assert!(schema.profile("Foo").unwrap().attr_values["a"].cap_exceeded);

        // Value 5 was never sampled; free-text mode means no finding.
        let candidate = Sample::new("Stories/Story_u9.xml", Element::new("Foo").attr("a", "5"));
        let report = validate(&schema, &candidate, &ValidateOptions::default()).unwrap();
        assert!(report.is_clean());
    }

    #[test]
    fn test_summary_groups_by_category() {
        let schema = schema_of(&training_samples());
        let candidate = Sample::new("Resources/Fonts.xml", Element::new("Bar"));
        let report = validate(&schema, &candidate, &ValidateOptions::default()).unwrap();

        let counts = &report.summary_by_category[&Category::Resource];
        assert_eq!(counts.unknown_elements, 1);
    }
}
