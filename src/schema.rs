//! Observed schema types
//!
//! An [`ObservedSchema`] is a structural model of an XML vocabulary inferred
//! purely from example documents: a mapping from element tag to an
//! [`ElementProfile`] of attributes, child tags, parent contexts, bounded
//! attribute-value samples, and occurrence statistics. It is the unit of
//! persistence and comparison, immutable once built, and only ever read by
//! the validator, delta engine, and coverage reporter.
//!
//! All sets are `BTreeSet`/`BTreeMap` and the value-sample retention rule is
//! order-independent, so the same sample set yields byte-identical schemas
//! regardless of merge order.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::category::Category;

/// Default bound on distinct attribute-value samples per attribute
pub const DEFAULT_VALUE_CAP: usize = 20;

/// Bounded distinct-value samples for one attribute
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttrValues {
    /// How many elements of this tag carried the attribute, across all
    /// samples. Separate from the value-sample bound; drives the
    /// missing-typical-attribute check.
    pub count: u64,
    /// Up to `cap` distinct observed literal values. Retention keeps the
    /// lexicographically smallest values so the set is independent of the
    /// order samples were merged in.
    pub values: BTreeSet<String>,
    /// Once set, the attribute is treated as free text: the value set stays
    /// bounded and value-level diffing is suppressed. Never reverts.
    #[serde(default)]
    pub cap_exceeded: bool,
}

impl AttrValues {
    /// Record one observed value, respecting the sample cap
    pub fn record(&mut self, value: &str, cap: usize) {
        self.count += 1;
        if cap == 0 {
            self.cap_exceeded = true;
            return;
        }
        if self.values.contains(value) {
            return;
        }
        self.values.insert(value.to_string());
        if self.values.len() > cap {
            self.values.pop_last();
            self.cap_exceeded = true;
        }
    }

    /// Commutative union of two value records
    pub fn union(mut self, other: AttrValues, cap: usize) -> AttrValues {
        self.count += other.count;
        self.values.extend(other.values);
        self.cap_exceeded |= other.cap_exceeded;
        while self.values.len() > cap {
            self.values.pop_last();
            self.cap_exceeded = true;
        }
        self
    }
}

/// Everything observed about one element tag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementProfile {
    /// Attribute names ever observed on this tag
    pub attrs: BTreeSet<String>,
    /// Child tags ever observed under this tag
    pub children: BTreeSet<String>,
    /// Parent tags this tag was ever observed under
    pub parents: BTreeSet<String>,
    /// Total occurrences across all samples
    pub count: u64,
    /// Number of distinct samples that contributed at least one occurrence
    pub sources: u64,
    /// Per-attribute occurrence counts and bounded value samples
    pub attr_values: BTreeMap<String, AttrValues>,
    /// Component categories of the parts this tag appeared in
    #[serde(default)]
    pub categories: BTreeSet<Category>,
}

impl ElementProfile {
    /// Fraction of this tag's occurrences that carried the given attribute
    pub fn attr_frequency(&self, attr: &str) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        match self.attr_values.get(attr) {
            Some(av) => av.count as f64 / self.count as f64,
            None => 0.0,
        }
    }

    /// Commutative union of two profiles for the same tag
    pub fn union(mut self, other: ElementProfile, cap: usize) -> ElementProfile {
        self.attrs.extend(other.attrs);
        self.children.extend(other.children);
        self.parents.extend(other.parents);
        self.categories.extend(other.categories);
        self.count += other.count;
        self.sources += other.sources;
        for (attr, values) in other.attr_values {
            let merged = match self.attr_values.remove(&attr) {
                Some(existing) => existing.union(values, cap),
                None => values,
            };
            self.attr_values.insert(attr, merged);
        }
        self
    }
}

/// A structural model of an XML vocabulary inferred from example documents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedSchema {
    /// Per-tag profiles
    pub elements: BTreeMap<String, ElementProfile>,
    /// Number of samples that contributed
    pub samples: u64,
    /// Number of malformed samples skipped during accumulation
    #[serde(default)]
    pub skipped: u64,
}

impl ObservedSchema {
    /// Look up the profile for a tag
    pub fn profile(&self, tag: &str) -> Option<&ElementProfile> {
        self.elements.get(tag)
    }

    /// Number of distinct tags catalogued
    pub fn tag_count(&self) -> usize {
        self.elements.len()
    }

    /// Number of distinct (tag, attribute) pairs catalogued
    pub fn attr_count(&self) -> usize {
        self.elements.values().map(|p| p.attrs.len()).sum()
    }

    /// Commutative, associative union of two schemas built from disjoint
    /// sample sets. Lets per-sample profiling run in parallel and combine in
    /// any order without the order being observable in the result.
    pub fn union(mut self, other: ObservedSchema, cap: usize) -> ObservedSchema {
        for (tag, profile) in other.elements {
            let merged = match self.elements.remove(&tag) {
                Some(existing) => existing.union(profile, cap),
                None => profile,
            };
            self.elements.insert(tag, merged);
        }
        self.samples += other.samples;
        self.skipped += other.skipped;
        self
    }
}
