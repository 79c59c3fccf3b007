//! Schema deltas
//!
//! A deterministic structural diff between two observed schemas. Pure and
//! total: it never fails for well-formed inputs and never touches either
//! schema. `diff(A, A)` is empty, and `diff(B, A)` is the exact negation of
//! `diff(A, B)`.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::schema::ObservedSchema;

/// Added/removed literal values for one attribute
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueChange {
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub added: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub removed: BTreeSet<String>,
}

impl ValueChange {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    fn negated(self) -> Self {
        Self {
            added: self.removed,
            removed: self.added,
        }
    }
}

/// Differences within one surviving tag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagChanges {
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub added_attrs: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub removed_attrs: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub added_children: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub removed_children: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub added_parents: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub removed_parents: BTreeSet<String>,
    /// Signed occurrence-count delta (new minus base)
    #[serde(default)]
    pub count_delta: i64,
    /// Per-attribute literal changes, for attributes present on both sides
    /// with value sampling still active on both sides
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub value_changes: BTreeMap<String, ValueChange>,
    /// Attributes whose value changes were omitted because either side had
    /// already gone cap-exceeded; free-text mode cannot be meaningfully
    /// diffed, and the omission itself is part of the delta
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub value_diff_suppressed: BTreeSet<String>,
}

impl TagChanges {
    pub fn is_empty(&self) -> bool {
        self.added_attrs.is_empty()
            && self.removed_attrs.is_empty()
            && self.added_children.is_empty()
            && self.removed_children.is_empty()
            && self.added_parents.is_empty()
            && self.removed_parents.is_empty()
            && self.count_delta == 0
            && self.value_changes.is_empty()
            && self.value_diff_suppressed.is_empty()
    }

    fn negated(self) -> Self {
        Self {
            added_attrs: self.removed_attrs,
            removed_attrs: self.added_attrs,
            added_children: self.removed_children,
            removed_children: self.added_children,
            added_parents: self.removed_parents,
            removed_parents: self.added_parents,
            count_delta: -self.count_delta,
            value_changes: self
                .value_changes
                .into_iter()
                .map(|(attr, change)| (attr, change.negated()))
                .collect(),
            value_diff_suppressed: self.value_diff_suppressed,
        }
    }
}

/// Summary counts for a delta
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaSummary {
    pub added_tags: usize,
    pub removed_tags: usize,
    pub changed_tags: usize,
    pub added_attrs: usize,
    pub removed_attrs: usize,
    pub value_changes: usize,
}

/// Immutable structural diff of two observed schemas
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDelta {
    /// Tags in the new schema only, sorted
    pub added_tags: Vec<String>,
    /// Tags in the base schema only, sorted
    pub removed_tags: Vec<String>,
    /// Per-surviving-tag differences; tags with no difference are absent
    pub changed: BTreeMap<String, TagChanges>,
}

impl SchemaDelta {
    /// Compute the delta from `base` to `new`
    pub fn diff(base: &ObservedSchema, new: &ObservedSchema) -> SchemaDelta {
        let base_tags: BTreeSet<_> = base.elements.keys().collect();
        let new_tags: BTreeSet<_> = new.elements.keys().collect();

        let added_tags = new_tags
            .difference(&base_tags)
            .map(|t| (*t).clone())
            .collect();
        let removed_tags = base_tags
            .difference(&new_tags)
            .map(|t| (*t).clone())
            .collect();

        let mut changed = BTreeMap::new();
        for tag in base_tags.intersection(&new_tags) {
            let base_profile = &base.elements[*tag];
            let new_profile = &new.elements[*tag];

            let mut changes = TagChanges {
                added_attrs: new_profile.attrs.difference(&base_profile.attrs).cloned().collect(),
                removed_attrs: base_profile.attrs.difference(&new_profile.attrs).cloned().collect(),
                added_children: new_profile
                    .children
                    .difference(&base_profile.children)
                    .cloned()
                    .collect(),
                removed_children: base_profile
                    .children
                    .difference(&new_profile.children)
                    .cloned()
                    .collect(),
                added_parents: new_profile
                    .parents
                    .difference(&base_profile.parents)
                    .cloned()
                    .collect(),
                removed_parents: base_profile
                    .parents
                    .difference(&new_profile.parents)
                    .cloned()
                    .collect(),
                count_delta: new_profile.count as i64 - base_profile.count as i64,
                ..Default::default()
            };

            for (attr, base_values) in &base_profile.attr_values {
                let Some(new_values) = new_profile.attr_values.get(attr) else {
                    continue;
                };
                if base_values.cap_exceeded || new_values.cap_exceeded {
                    changes.value_diff_suppressed.insert(attr.clone());
                    continue;
                }
                let change = ValueChange {
                    added: new_values.values.difference(&base_values.values).cloned().collect(),
                    removed: base_values.values.difference(&new_values.values).cloned().collect(),
                };
                if !change.is_empty() {
                    changes.value_changes.insert(attr.clone(), change);
                }
            }

            if !changes.is_empty() {
                changed.insert((*tag).clone(), changes);
            }
        }

        SchemaDelta {
            added_tags,
            removed_tags,
            changed,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added_tags.is_empty() && self.removed_tags.is_empty() && self.changed.is_empty()
    }

    /// The delta in the opposite direction: added and removed swap, count
    /// deltas flip sign
    pub fn negated(self) -> SchemaDelta {
        SchemaDelta {
            added_tags: self.removed_tags,
            removed_tags: self.added_tags,
            changed: self
                .changed
                .into_iter()
                .map(|(tag, changes)| (tag, changes.negated()))
                .collect(),
        }
    }

    pub fn summary(&self) -> DeltaSummary {
        DeltaSummary {
            added_tags: self.added_tags.len(),
            removed_tags: self.removed_tags.len(),
            changed_tags: self.changed.len(),
            added_attrs: self.changed.values().map(|c| c.added_attrs.len()).sum(),
            removed_attrs: self.changed.values().map(|c| c.removed_attrs.len()).sum(),
            value_changes: self.changed.values().map(|c| c.value_changes.len()).sum(),
        }
    }
}
