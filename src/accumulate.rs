//! Schema accumulation
//!
//! Folds walker output from many sample documents into one
//! [`ObservedSchema`]. Accumulation is a commutative monoid: merging samples
//! one by one, or profiling each sample independently and combining with
//! [`ObservedSchema::union`], produces the identical schema.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::category::CategoryMatcher;
use crate::config::EngineConfig;
use crate::element::Sample;
use crate::error::{Result, SchemaError};
use crate::schema::{ElementProfile, ObservedSchema};
use crate::walker::collect_visits;

/// Accumulates sample observations into an observed schema
pub struct SchemaBuilder {
    schema: ObservedSchema,
    matcher: CategoryMatcher,
    value_cap: usize,
    max_depth: usize,
}

impl SchemaBuilder {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            schema: ObservedSchema::default(),
            matcher: CategoryMatcher::new(),
            value_cap: config.value_cap,
            max_depth: config.max_depth,
        }
    }

    /// Merge one sample into the schema under construction.
    ///
    /// The sample is walked completely before any profile is touched, so a
    /// malformed sample is rejected whole and never contributes a partial
    /// prefix.
    pub fn merge_sample(&mut self, sample: &Sample) -> Result<()> {
        let visits = collect_visits(&sample.root, self.max_depth).map_err(|err| match err {
            SchemaError::MalformedSample { reason, .. } => SchemaError::MalformedSample {
                file: sample.file.clone(),
                reason,
            },
            other => other,
        })?;

        let category = self.matcher.classify(&sample.file);

        // Which tags this sample has already touched; local to this merge
        // invocation so source attribution never leaks across samples.
        let mut seen_tags: HashSet<&str> = HashSet::new();

        for visit in &visits {
            let profile = self
                .schema
                .elements
                .entry(visit.tag.to_string())
                .or_insert_with(ElementProfile::default);

            profile.count += 1;
            if seen_tags.insert(visit.tag) {
                profile.sources += 1;
            }
            profile.categories.insert(category);

            for (name, value) in visit.attrs {
                profile.attrs.insert(name.clone());
                profile
                    .attr_values
                    .entry(name.clone())
                    .or_default()
                    .record(value, self.value_cap);
            }
            for child in &visit.children {
                profile.children.insert((*child).to_string());
            }
            if let Some(parent) = visit.parent {
                profile.parents.insert(parent.to_string());
            }
        }

        self.schema.samples += 1;
        debug!(file = %sample.file, elements = visits.len(), "merged sample");
        Ok(())
    }

    /// Merge a whole corpus, absorbing malformed samples.
    ///
    /// A sample that cannot be traversed is skipped with a diagnostic and a
    /// bumped skip count; the rest of the corpus still accumulates.
    pub fn merge_corpus<'a>(&mut self, samples: impl IntoIterator<Item = &'a Sample>) {
        for sample in samples {
            if let Err(err) = self.merge_sample(sample) {
                warn!(file = %sample.file, error = %err, "skipping malformed sample");
                self.schema.skipped += 1;
            }
        }
    }

    /// Record a sample that failed before it ever reached the walker
    /// (unreadable file, unparseable interchange JSON).
    pub fn record_skip(&mut self) {
        self.schema.skipped += 1;
    }

    /// Finish accumulation; the schema is immutable from here on
    pub fn finish(self) -> ObservedSchema {
        self.schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;
    use crate::schema::DEFAULT_VALUE_CAP;

    fn sample_one() -> Sample {
        Sample::new(
            "Stories/Story_u1.xml",
            Element::new("Story")
                .attr("Self", "u1")
                .child(Element::new("Content"))
                .child(Element::new("Content")),
        )
    }

    fn sample_two() -> Sample {
        Sample::new(
            "Stories/Story_u2.xml",
            Element::new("Story")
                .attr("Self", "u2")
                .attr("TrackChanges", "false")
                .child(Element::new("Br")),
        )
    }

    fn build(samples: &[Sample]) -> ObservedSchema {
        let mut builder = SchemaBuilder::new(&EngineConfig::default());
        builder.merge_corpus(samples);
        builder.finish()
    }

    #[test]
    fn test_profiles_union_across_samples() {
        let schema = build(&[sample_one(), sample_two()]);

        let story = schema.profile("Story").unwrap();
        assert_eq!(story.count, 2);
        assert_eq!(story.sources, 2);
        assert!(story.attrs.contains("Self"));
        assert!(story.attrs.contains("TrackChanges"));
        assert!(story.children.contains("Content"));
        assert!(story.children.contains("Br"));

        // Content appears twice in one sample: two occurrences, one source.
        let content = schema.profile("Content").unwrap();
        assert_eq!(content.count, 2);
        assert_eq!(content.sources, 1);
        assert_eq!(content.parents.iter().collect::<Vec<_>>(), vec!["Story"]);
    }

    #[test]
    fn test_merge_order_is_unobservable() {
        let forward = build(&[sample_one(), sample_two()]);
        let backward = build(&[sample_two(), sample_one()]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_parallel_union_matches_sequential() {
        let sequential = build(&[sample_one(), sample_two()]);

        let a = build(&[sample_one()]);
        let b = build(&[sample_two()]);
        let combined = a.union(b, DEFAULT_VALUE_CAP);

        assert_eq!(sequential, combined);
    }

    #[test]
    fn test_malformed_sample_is_isolated() {
        let mut deep = Element::new("a");
        for _ in 0..700 {
            deep = Element::new("a").child(deep);
        }
        let bad = Sample::new("Stories/bad.xml", deep);

        let schema = build(&[sample_one(), bad, sample_two()]);
        assert_eq!(schema.samples, 2);
        assert_eq!(schema.skipped, 1);
        assert_eq!(schema.profile("Story").unwrap().sources, 2);
    }
}
