//! Checklist and coverage-plan rendering
//!
//! Turns schema deltas into human-actionable Markdown. Items are ranked:
//! new elements first, then new attributes, then attribute value changes,
//! then removed items. A combined plan deduplicates recommendations that
//! recur across labeled deltas and cross-references the contributing labels.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use crate::delta::{DeltaSummary, SchemaDelta};

/// One actionable recommendation extracted from a delta.
///
/// Variant order is the ranking order; the derived `Ord` keeps rendered
/// output sorted new-element > new-attribute > value-change > removed-item.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum PlanItem {
    NewElement { tag: String },
    NewAttribute { tag: String, attr: String },
    ValueChange { tag: String, attr: String },
    RemovedElement { tag: String },
    RemovedAttribute { tag: String, attr: String },
    RemovedChild { tag: String, child: String },
}

impl PlanItem {
    /// Checklist line body, naming the tag/attribute involved
    pub fn describe(&self) -> String {
        match self {
            PlanItem::NewElement { tag } => format!("{}: new element", tag),
            PlanItem::NewAttribute { tag, attr } => {
                format!("{}::{}: new attribute", tag, attr)
            }
            PlanItem::ValueChange { tag, attr } => {
                format!("{}::{}: attribute value set changed", tag, attr)
            }
            PlanItem::RemovedElement { tag } => format!("{}: element no longer observed", tag),
            PlanItem::RemovedAttribute { tag, attr } => {
                format!("{}::{}: attribute no longer observed", tag, attr)
            }
            PlanItem::RemovedChild { tag, child } => {
                format!("{}::{}: child no longer observed", tag, child)
            }
        }
    }

    fn section(&self) -> usize {
        match self {
            PlanItem::NewElement { .. } => 0,
            PlanItem::NewAttribute { .. } => 1,
            PlanItem::ValueChange { .. } => 2,
            PlanItem::RemovedElement { .. }
            | PlanItem::RemovedAttribute { .. }
            | PlanItem::RemovedChild { .. } => 3,
        }
    }
}

const SECTION_TITLES: [&str; 4] = [
    "New Elements",
    "New Attributes",
    "Attribute Value Changes",
    "Removed Items",
];

/// Extract ranked plan items from a delta
pub fn plan_items(delta: &SchemaDelta) -> Vec<PlanItem> {
    let mut items = Vec::new();

    for tag in &delta.added_tags {
        items.push(PlanItem::NewElement { tag: tag.clone() });
    }
    for (tag, changes) in &delta.changed {
        for attr in &changes.added_attrs {
            items.push(PlanItem::NewAttribute {
                tag: tag.clone(),
                attr: attr.clone(),
            });
        }
        for attr in changes.value_changes.keys() {
            items.push(PlanItem::ValueChange {
                tag: tag.clone(),
                attr: attr.clone(),
            });
        }
        for attr in &changes.removed_attrs {
            items.push(PlanItem::RemovedAttribute {
                tag: tag.clone(),
                attr: attr.clone(),
            });
        }
        for child in &changes.removed_children {
            items.push(PlanItem::RemovedChild {
                tag: tag.clone(),
                child: child.clone(),
            });
        }
    }
    for tag in &delta.removed_tags {
        items.push(PlanItem::RemovedElement { tag: tag.clone() });
    }

    items.sort();
    items
}

fn write_section(out: &mut String, title: &str, lines: &[String]) {
    let _ = writeln!(out, "## {}", title);
    if lines.is_empty() {
        out.push_str("- [x] None\n\n");
        return;
    }
    for line in lines {
        let _ = writeln!(out, "- [ ] {}", line);
    }
    out.push('\n');
}

/// Render one delta as a Markdown checklist under a single label heading
pub fn render_checklist(delta: &SchemaDelta, label: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Observed Schema Checklist: {}\n", label);
    out.push_str("Items below differ between the base schema and the new sample set.\n\n");

    let items = plan_items(delta);
    for (section, title) in SECTION_TITLES.iter().enumerate() {
        let lines: Vec<String> = items
            .iter()
            .filter(|i| i.section() == section)
            .map(|i| i.describe())
            .collect();
        write_section(&mut out, title, &lines);
    }
    out
}

/// Merged, deduplicated recommendations across labeled deltas
#[derive(Debug, Clone, Default)]
pub struct CoveragePlan {
    /// Recommendation -> labels exhibiting it
    items: BTreeMap<PlanItem, BTreeSet<String>>,
    /// Per-label delta summaries, for the plan header
    summaries: BTreeMap<String, DeltaSummary>,
}

impl CoveragePlan {
    /// Combine labeled deltas into one plan. Identical recommendations from
    /// different labels collapse into a single item cross-referencing all of
    /// them.
    pub fn combine(labeled: &[(String, SchemaDelta)]) -> CoveragePlan {
        let mut plan = CoveragePlan::default();
        for (label, delta) in labeled {
            plan.summaries.insert(label.clone(), delta.summary());
            for item in plan_items(delta) {
                plan.items.entry(item).or_default().insert(label.clone());
            }
        }
        plan
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Render the combined plan as Markdown
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("# Observed Schema Coverage Plan\n\n");
        out.push_str("Items recur across the labeled sample sets noted on each line.\n\n");

        out.push_str("## Summary\n");
        for (label, summary) in &self.summaries {
            let _ = writeln!(
                out,
                "- {}: new elements={}, new attributes={}, value changes={}, removed={}",
                label,
                summary.added_tags,
                summary.added_attrs,
                summary.value_changes,
                summary.removed_tags + summary.removed_attrs,
            );
        }
        out.push('\n');

        // BTreeMap keyed by PlanItem keeps the ranking order.
        for (section, title) in SECTION_TITLES.iter().enumerate() {
            let lines: Vec<String> = self
                .items
                .iter()
                .filter(|(item, _)| item.section() == section)
                .map(|(item, labels)| {
                    let labels = labels.iter().cloned().collect::<Vec<_>>().join(", ");
                    format!("{} (labels: {})", item.describe(), labels)
                })
                .collect();
            write_section(&mut out, title, &lines);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delta::TagChanges;

    fn delta_with_bar() -> SchemaDelta {
        let mut changes = TagChanges::default();
        changes.added_attrs.insert("TrackChanges".to_string());
        let mut delta = SchemaDelta::default();
        delta.added_tags.push("Bar".to_string());
        delta.changed.insert("Story".to_string(), changes);
        delta
    }

    #[test]
    fn test_new_element_ranks_above_attribute_changes() {
        let markdown = render_checklist(&delta_with_bar(), "baseline vs sample");

        let bar = markdown.find("- [ ] Bar: new element").unwrap();
        let attr = markdown
            .find("- [ ] Story::TrackChanges: new attribute")
            .unwrap();
        assert!(bar < attr);
    }

    #[test]
    fn test_empty_sections_render_none() {
        let markdown = render_checklist(&SchemaDelta::default(), "empty");
        assert_eq!(markdown.matches("- [x] None").count(), 4);
        assert!(!markdown.contains("- [ ]"));
    }

    #[test]
    fn test_combine_deduplicates_across_labels() {
        let labeled = vec![
            ("print".to_string(), delta_with_bar()),
            ("digital".to_string(), delta_with_bar()),
        ];
        let plan = CoveragePlan::combine(&labeled);
        let markdown = plan.render();

        assert_eq!(markdown.matches("Bar: new element").count(), 1);
        assert!(markdown.contains("(labels: digital, print)"));
        assert!(markdown.contains("- print: new elements=1"));
    }
}
