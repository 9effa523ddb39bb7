//! RTDM - Web Page Template Detection and Removal
//!
//! This library detects the boilerplate ("template") shared across a
//! collection of HTML documents from the same site, using the restricted
//! top-down mapping described in "A fast and robust method for web page
//! template detection and removal" (Vieira et al.).
//!
//! # Overview
//!
//! Two document trees are aligned by a recursive dynamic program over
//! their child forests: deleting or inserting a forest entry costs its
//! whole subtree, while pairing two entries recurses into their children.
//! A backtrace over the resulting matrix decides which source-side nodes
//! belong to the shared template, and a pruning pass projects that set
//! back onto the source tree as the smallest connected sub-tree
//! containing it. [`find_template`] folds this pairwise extraction over
//! any number of documents.
//!
//! # Key Features
//!
//! - Forest alignment with whole-subtree delete/insert costs
//! - Identity-preserving backtrace reconstruction of the template
//! - Synchronized dual-tree pruning that never mutates the source
//! - Pluggable labeling (with or without attributes) and edit costs
//!
//! HTML parsing is out of scope: the library consumes already-built
//! trees (see [`node`]) and returns an in-memory tree handle; rendering
//! and persistence belong to the caller.
//!
//! # Example
//!
//! ```
//! use rtdm::{extract_common, new_element_node, new_text_node, AlignConfig, NodeInner};
//!
//! // <div><p>Hello</p></div> and <div><p>World</p></div>
//! let page = |text: &str| {
//!     let div = new_element_node("div", &[]);
//!     let p = new_element_node("p", &[]);
//!     NodeInner::add_child(&p, new_text_node(text));
//!     NodeInner::add_child(&div, p);
//!     div
//! };
//!
//! let template = extract_common(&page("Hello"), &page("World"), &AlignConfig::default())?;
//!
//! // The shared structure is <div><p></p></div>: the texts differ and
//! // drop out, the elements survive.
//! let p = template.borrow().child(0).unwrap().clone();
//! assert_eq!(p.borrow().content().as_element().unwrap().name(), "p");
//! assert_eq!(p.borrow().child_count(), 0);
//! # Ok::<(), rtdm::Error>(())
//! ```

pub mod align;
pub mod cost;
pub mod error;
pub mod label;
pub mod node;
pub mod template;

// Re-export commonly used types
pub use align::{align, AlignConfig, Alignment, BacktraceCell, BacktraceMatrix, CostMatrix, EditOp};
pub use cost::CostModel;
pub use error::{Error, Result};
pub use label::{Label, LabelConfig};
pub use node::{
    descendants, new_comment_node, new_element_node, new_node, new_text_node, HtmlComment,
    HtmlContent, HtmlElement, HtmlText, NodeInner, NodeRef, TreeCursor, WeakNodeRef,
};
pub use template::{
    extract_common, find_template, retrieve_template, smallest_subtree_containing, FoldOptions,
    PairingOrder,
};
