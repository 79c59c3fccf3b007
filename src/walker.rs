//! Sample walker
//!
//! Traverses one parsed element tree in document (pre-order) order and yields
//! one [`Visit`] per element: its tag, attributes, parent tag, and ordered
//! child tags. The walk is lazy, finite, and restartable; calling [`walk`]
//! again starts over. It borrows the tree and has no side effects.
//!
//! A tree nested deeper than the configured guard cannot be traversed safely
//! and fails with [`SchemaError::MalformedSample`]; the failure is local to
//! that one sample.

use crate::element::Element;
use crate::error::SchemaError;

/// Default nesting-depth guard for traversal
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// One element visit, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit<'a> {
    /// Element tag
    pub tag: &'a str,
    /// Attributes in document order
    pub attrs: &'a [(String, String)],
    /// Parent tag, `None` for the root
    pub parent: Option<&'a str>,
    /// Ordered child tags
    pub children: Vec<&'a str>,
    /// Ancestor tag path, e.g. `Story/ParagraphStyleRange[0]/Content[1]`
    pub path: String,
}

/// Walk an element tree with the default depth guard
pub fn walk(root: &Element) -> Walk<'_> {
    walk_with_depth(root, DEFAULT_MAX_DEPTH)
}

/// Walk an element tree, failing once nesting exceeds `max_depth`
pub fn walk_with_depth(root: &Element, max_depth: usize) -> Walk<'_> {
    Walk {
        stack: vec![Frame {
            elem: root,
            parent: None,
            path: root.tag.clone(),
            depth: 0,
        }],
        max_depth,
        fused: false,
    }
}

struct Frame<'a> {
    elem: &'a Element,
    parent: Option<&'a str>,
    path: String,
    depth: usize,
}

/// Lazy pre-order traversal over an element tree
pub struct Walk<'a> {
    stack: Vec<Frame<'a>>,
    max_depth: usize,
    fused: bool,
}

impl<'a> Iterator for Walk<'a> {
    type Item = Result<Visit<'a>, SchemaError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.fused {
            return None;
        }
        let frame = self.stack.pop()?;

        if frame.depth > self.max_depth {
            self.fused = true;
            return Some(Err(SchemaError::MalformedSample {
                file: String::new(),
                reason: format!(
                    "element nesting exceeds {} levels at '{}'",
                    self.max_depth, frame.path
                ),
            }));
        }

        // Push children in reverse so they pop in document order.
        for (idx, child) in frame.elem.children.iter().enumerate().rev() {
            self.stack.push(Frame {
                elem: child,
                parent: Some(frame.elem.tag.as_str()),
                path: format!("{}/{}[{}]", frame.path, child.tag, idx),
                depth: frame.depth + 1,
            });
        }

        Some(Ok(Visit {
            tag: &frame.elem.tag,
            attrs: &frame.elem.attrs,
            parent: frame.parent,
            children: frame.elem.children.iter().map(|c| c.tag.as_str()).collect(),
            path: frame.path,
        }))
    }
}

/// Collect a full walk, or fail if the tree cannot be traversed.
///
/// Used by the accumulator so a malformed sample is rejected whole instead of
/// contributing a partial prefix to the schema.
pub fn collect_visits(root: &Element, max_depth: usize) -> Result<Vec<Visit<'_>>, SchemaError> {
    walk_with_depth(root, max_depth).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> Element {
        Element::new("Story")
            .attr("Self", "u123")
            .child(
                Element::new("ParagraphStyleRange")
                    .child(Element::new("Content"))
                    .child(Element::new("Br")),
            )
            .child(Element::new("Content"))
    }

    #[test]
    fn test_document_order() {
        let root = tree();
        let visits: Vec<_> = walk(&root).collect::<Result<_, _>>().unwrap();
        let tags: Vec<_> = visits.iter().map(|v| v.tag).collect();
        assert_eq!(
            tags,
            vec!["Story", "ParagraphStyleRange", "Content", "Br", "Content"]
        );
    }

    #[test]
    fn test_parent_and_children() {
        let root = tree();
        let visits: Vec<_> = walk(&root).collect::<Result<_, _>>().unwrap();

        assert_eq!(visits[0].parent, None);
        assert_eq!(visits[0].children, vec!["ParagraphStyleRange", "Content"]);
        assert_eq!(visits[1].parent, Some("Story"));
        assert_eq!(visits[2].parent, Some("ParagraphStyleRange"));
    }

    #[test]
    fn test_paths_carry_sibling_index() {
        let root = tree();
        let visits: Vec<_> = walk(&root).collect::<Result<_, _>>().unwrap();
        assert_eq!(visits[0].path, "Story");
        assert_eq!(visits[1].path, "Story/ParagraphStyleRange[0]");
        assert_eq!(visits[3].path, "Story/ParagraphStyleRange[0]/Br[1]");
        assert_eq!(visits[4].path, "Story/Content[1]");
    }

    #[test]
    fn test_restartable() {
        let root = tree();
        let first: Vec<_> = walk(&root).map(|v| v.unwrap().path).collect();
        let second: Vec<_> = walk(&root).map(|v| v.unwrap().path).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_depth_guard() {
        let mut root = Element::new("a");
        for _ in 0..10 {
            root = Element::new("a").child(root);
        }
        let err = collect_visits(&root, 4).unwrap_err();
        assert!(matches!(err, SchemaError::MalformedSample { .. }));
    }
}
