//! Coverage reporting
//!
//! Measures how much of a reference schema's catalogued structure (distinct
//! tags plus distinct (tag, attribute) pairs) a target actually exercises,
//! overall and per component category. A schema measured against itself is
//! 100% by construction.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::accumulate::SchemaBuilder;
use crate::category::Category;
use crate::config::EngineConfig;
use crate::element::Sample;
use crate::schema::ObservedSchema;

/// Exercised-versus-catalogued counts for one bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageStat {
    /// Distinct tags and (tag, attribute) pairs in the reference
    pub catalogued: usize,
    /// How many of those the target exercises
    pub exercised: usize,
}

impl CoverageStat {
    /// Coverage percentage; an empty bucket counts as fully covered
    pub fn percent(&self) -> f64 {
        if self.catalogued == 0 {
            return 100.0;
        }
        self.exercised as f64 / self.catalogued as f64 * 100.0
    }

    fn add(&mut self, catalogued: usize, exercised: usize) {
        self.catalogued += catalogued;
        self.exercised += exercised;
    }
}

/// Overall and per-category coverage of a reference schema
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoverageReport {
    pub total: CoverageStat,
    pub by_category: BTreeMap<Category, CoverageStat>,
}

/// Measure how much of `reference` the `target` schema exercises.
///
/// The target is typically a schema profiled from the corpus under test; a
/// tag counts as exercised when the target observed it at all, and a (tag,
/// attribute) pair when the target observed that attribute on that tag.
pub fn coverage(reference: &ObservedSchema, target: &ObservedSchema) -> CoverageReport {
    let mut report = CoverageReport::default();

    for (tag, profile) in &reference.elements {
        let target_profile = target.profile(tag);

        let catalogued = 1 + profile.attrs.len();
        let exercised = match target_profile {
            Some(tp) => 1 + profile.attrs.iter().filter(|a| tp.attrs.contains(*a)).count(),
            None => 0,
        };

        report.total.add(catalogued, exercised);
        // A tag counts toward every category its reference profile lists.
        for category in &profile.categories {
            report
                .by_category
                .entry(*category)
                .or_default()
                .add(catalogued, exercised);
        }
    }

    report
}

/// Measure how much of `reference` a document corpus exercises, by profiling
/// the corpus and comparing the result. Malformed samples are skipped the
/// same way accumulation skips them. A schema against its own full training
/// corpus is 100%.
pub fn coverage_of_corpus(
    reference: &ObservedSchema,
    samples: &[Sample],
    config: &EngineConfig,
) -> CoverageReport {
    let mut builder = SchemaBuilder::new(config);
    builder.merge_corpus(samples);
    coverage(reference, &builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;

    fn schema_of(samples: &[Sample]) -> ObservedSchema {
        let mut builder = SchemaBuilder::new(&EngineConfig::default());
        builder.merge_corpus(samples);
        builder.finish()
    }

    fn reference() -> ObservedSchema {
        schema_of(&[
            Sample::new(
                "Stories/Story_u1.xml",
                Element::new("Story")
                    .attr("Self", "u1")
                    .child(Element::new("Content")),
            ),
            Sample::new("Spreads/Spread_u1.xml", Element::new("Spread").attr("Self", "s1")),
        ])
    }

    #[test]
    fn test_self_coverage_is_full() {
        let schema = reference();
        let report = coverage(&schema, &schema);
        assert_eq!(report.total.percent(), 100.0);
        for stat in report.by_category.values() {
            assert_eq!(stat.percent(), 100.0);
        }
    }

    #[test]
    fn test_partial_corpus_shows_gap() {
        let schema = reference();
        let partial = schema_of(&[Sample::new(
            "Stories/Story_u1.xml",
            Element::new("Story").child(Element::new("Content")),
        )]);

        let report = coverage(&schema, &partial);
        // Catalogued: Story + Self, Content, Spread + Self = 5 items.
        // Exercised: Story, Content = 2 (the Self attrs and Spread are not).
        assert_eq!(report.total.catalogued, 5);
        assert_eq!(report.total.exercised, 2);

        let layout = &report.by_category[&Category::Layout];
        assert_eq!(layout.exercised, 0);
        assert_eq!(layout.percent(), 0.0);

        let story = &report.by_category[&Category::Story];
        assert!(story.percent() > 0.0 && story.percent() < 100.0);
    }

    #[test]
    fn test_corpus_coverage_of_training_set_is_full() {
        let samples = vec![
            Sample::new(
                "Stories/Story_u1.xml",
                Element::new("Story")
                    .attr("Self", "u1")
                    .child(Element::new("Content")),
            ),
            Sample::new("Spreads/Spread_u1.xml", Element::new("Spread").attr("Self", "s1")),
        ];
        let schema = schema_of(&samples);
        let report = coverage_of_corpus(&schema, &samples, &EngineConfig::default());
        assert_eq!(report.total.percent(), 100.0);
    }

    #[test]
    fn test_empty_reference_is_vacuously_covered() {
        let empty = ObservedSchema::default();
        let report = coverage(&empty, &empty);
        assert_eq!(report.total.percent(), 100.0);
    }
}
