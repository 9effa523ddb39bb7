//! Canonical node labels for alignment equality.
//!
//! A `Label` is a comparison-only value derived from a node: it captures
//! kind and content but not identity, position, or children. Two nodes
//! participate in an "update" alignment step at zero cost exactly when
//! their labels are equal.
//!
//! Which parts of a node enter the label is a per-run strategy, carried by
//! `LabelConfig` and threaded explicitly through the alignment engine and
//! backtracker. There is no process-wide default to swap.

use crate::node::{HtmlContent, NodeRef};

/// A canonical, comparison-only representation of a node.
///
/// Labels are recomputed on demand and never cached across structural
/// mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    /// An element label: tag name, and attributes when the active
    /// configuration includes them.
    Element {
        /// The tag name.
        name: String,
        /// Ordered attribute pairs, or `None` when attributes are
        /// excluded from comparison.
        attributes: Option<Vec<(String, String)>>,
    },
    /// A text label.
    Text {
        /// The text content.
        content: String,
    },
    /// A comment label.
    Comment {
        /// The comment content.
        content: String,
    },
}

/// Labeling strategy for one alignment run.
#[derive(Debug, Clone, Copy)]
pub struct LabelConfig {
    /// Whether element attributes participate in label equality.
    ///
    /// The reference behavior keeps them in; turning this off gives
    /// looser matching that pairs elements by tag name alone.
    pub include_attributes: bool,
}

impl Default for LabelConfig {
    fn default() -> Self {
        LabelConfig {
            include_attributes: true,
        }
    }
}

impl LabelConfig {
    /// Computes the label of a node under this configuration.
    pub fn label(&self, node: &NodeRef) -> Label {
        match node.borrow().content() {
            HtmlContent::Element(e) => Label::Element {
                name: e.name().to_string(),
                attributes: if self.include_attributes {
                    Some(e.attributes().to_vec())
                } else {
                    None
                },
            },
            HtmlContent::Text(t) => Label::Text {
                content: t.text().to_string(),
            },
            HtmlContent::Comment(c) => Label::Comment {
                content: c.text().to_string(),
            },
        }
    }

    /// Tests whether two nodes are label-equal under this configuration.
    pub fn labels_equal(&self, a: &NodeRef, b: &NodeRef) -> bool {
        self.label(a) == self.label(b)
    }
}
