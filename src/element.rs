//! Parsed element trees and samples
//!
//! The engine consumes documents that have already been unpacked and parsed
//! by an outer layer. What crosses the boundary is an explicit, typed element
//! tree: tag, attributes in document order, and child elements. Nothing here
//! knows about ZIP archives or raw XML text.

use serde::{Deserialize, Serialize};

/// One parsed XML element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Element tag with any namespace prefix already resolved away
    pub tag: String,
    /// Attributes in document order
    #[serde(default)]
    pub attrs: Vec<(String, String)>,
    /// Child elements in document order
    #[serde(default)]
    pub children: Vec<Element>,
}

impl Element {
    /// Create a leaf element with no attributes
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Builder-style child
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Look up an attribute value by name
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// One logical sample document: a source name plus its parsed root element.
///
/// The source name is the path of the part inside the package (e.g.
/// `Stories/Story_u123.xml` or `content.xml`) and drives component-category
/// classification and finding locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sample {
    /// Source file name of this part within its package
    pub file: String,
    /// Parsed root element
    pub root: Element,
}

impl Sample {
    pub fn new(file: impl Into<String>, root: Element) -> Self {
        Self {
            file: file.into(),
            root,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_lookup() {
        let elem = Element::new("ParagraphStyleRange")
            .attr("AppliedParagraphStyle", "ParagraphStyle/Body")
            .child(Element::new("Content"));

        assert_eq!(
            elem.get_attr("AppliedParagraphStyle"),
            Some("ParagraphStyle/Body")
        );
        assert_eq!(elem.get_attr("Missing"), None);
        assert_eq!(elem.children.len(), 1);
    }

    #[test]
    fn test_sample_roundtrip() {
        let sample = Sample::new("Stories/Story_u1.xml", Element::new("Story"));
        let json = serde_json::to_string(&sample).unwrap();
        let back: Sample = serde_json::from_str(&json).unwrap();
        assert_eq!(back.file, "Stories/Story_u1.xml");
        assert_eq!(back.root, sample.root);
    }
}
