//! Node structures for HTML tree representation.
//!
//! This module provides the core node type used to represent parsed HTML
//! documents as trees. The tree is owned top-down through `Rc` child links;
//! each node additionally carries a non-owning `Weak` back-reference to its
//! parent so that upward traversal is possible during pruning.
//!
//! Every node is assigned a unique `u64` id at creation. Identity-keyed
//! sets (template nodes, preserved ancestors) are built over these ids
//! rather than over pointer addresses.

pub mod cursor;
mod html_content;

pub use cursor::{descendants, TreeCursor};
pub use html_content::{HtmlComment, HtmlContent, HtmlElement, HtmlText};

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Error, Result};

/// Global counter for generating unique node IDs.
static NODE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generates a unique node ID.
fn next_node_id() -> u64 {
    NODE_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// A reference-counted pointer to a node.
pub type NodeRef = Rc<RefCell<NodeInner>>;

/// A weak reference to a node.
pub type WeakNodeRef = Weak<RefCell<NodeInner>>;

/// The inner data of a node in a document tree.
///
/// Each node has:
/// - HTML content (element, text, or comment)
/// - 0 or more children, in document order
/// - A parent (except for roots and detached nodes)
/// - A position among its siblings
#[derive(Debug)]
pub struct NodeInner {
    /// Unique identifier for this node.
    id: u64,
    /// HTML content of this node.
    content: HtmlContent,
    /// Child nodes in document order.
    children: Vec<NodeRef>,
    /// Weak reference to the parent node.
    parent: WeakNodeRef,
    /// Zero-based position among siblings (-1 for a root or detached node).
    child_pos: i32,
}

impl NodeInner {
    /// Creates a new node with the given content.
    pub fn new(content: HtmlContent) -> Self {
        NodeInner {
            id: next_node_id(),
            content,
            children: Vec::new(),
            parent: Weak::new(),
            child_pos: -1,
        }
    }

    /// Returns the unique ID of this node.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns the content of this node.
    pub fn content(&self) -> &HtmlContent {
        &self.content
    }

    /// Returns the number of children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Returns a reference to the child at the given index.
    pub fn child(&self, index: usize) -> Option<&NodeRef> {
        self.children.get(index)
    }

    /// Returns the children as a slice.
    pub fn children(&self) -> &[NodeRef] {
        &self.children
    }

    /// Returns a weak reference to the parent.
    pub fn parent(&self) -> &WeakNodeRef {
        &self.parent
    }

    /// Returns the child position (0-based index among siblings, -1 for
    /// a root or detached node).
    pub fn child_pos(&self) -> i32 {
        self.child_pos
    }
}

/// Helper functions that work with `NodeRef`.
impl NodeInner {
    /// Appends a child node, fixing up its parent link and position.
    pub fn add_child(parent_ref: &NodeRef, child_ref: NodeRef) {
        {
            let mut child = child_ref.borrow_mut();
            child.parent = Rc::downgrade(parent_ref);
            child.child_pos = parent_ref.borrow().children.len() as i32;
        }
        parent_ref.borrow_mut().children.push(child_ref);
    }

    /// Removes a node (and its whole subtree) from its parent.
    ///
    /// Sibling positions are renumbered. Detaching a node that has no
    /// parent is a no-op.
    pub fn detach(node_ref: &NodeRef) {
        let parent = node_ref.borrow().parent.upgrade();
        if let Some(parent) = parent {
            let id = node_ref.borrow().id;
            let mut parent_mut = parent.borrow_mut();
            if let Some(index) = parent_mut
                .children
                .iter()
                .position(|c| c.borrow().id == id)
            {
                parent_mut.children.remove(index);
                for i in index..parent_mut.children.len() {
                    parent_mut.children[i].borrow_mut().child_pos = i as i32;
                }
            }
        }
        let mut node = node_ref.borrow_mut();
        node.parent = Weak::new();
        node.child_pos = -1;
    }

    /// Makes an independent structural copy of a subtree.
    ///
    /// The copy replicates content and child order exactly, so traversing
    /// the copy visits nodes in the same order as traversing the source.
    /// Copied nodes receive fresh ids.
    pub fn deep_clone(node_ref: &NodeRef) -> NodeRef {
        let copy = new_node(node_ref.borrow().content.clone());
        let children: Vec<NodeRef> = node_ref.borrow().children.to_vec();
        for child in &children {
            let child_copy = Self::deep_clone(child);
            Self::add_child(&copy, child_copy);
        }
        copy
    }

    /// Checks that a tree is structurally well-formed.
    ///
    /// Every child must hold a live parent link back to the node that owns
    /// it and a `child_pos` matching its index. Violations are contract
    /// breaches on the caller's side and surface as [`Error::InvalidTree`].
    pub fn check_tree(root: &NodeRef) -> Result<()> {
        let mut stack = vec![root.clone()];
        while let Some(node) = stack.pop() {
            let borrowed = node.borrow();
            for (index, child) in borrowed.children.iter().enumerate() {
                let child_borrowed = child.borrow();
                let parent = child_borrowed.parent.upgrade().ok_or_else(|| {
                    Error::InvalidTree(format!(
                        "node {} has no parent link",
                        child_borrowed.id
                    ))
                })?;
                if parent.borrow().id != borrowed.id {
                    return Err(Error::InvalidTree(format!(
                        "node {} has a parent link to a different node",
                        child_borrowed.id
                    )));
                }
                if child_borrowed.child_pos != index as i32 {
                    return Err(Error::InvalidTree(format!(
                        "node {} has child_pos {} but sibling index {}",
                        child_borrowed.id, child_borrowed.child_pos, index
                    )));
                }
                stack.push(child.clone());
            }
        }
        Ok(())
    }
}

/// Creates a new node wrapped in a `NodeRef`.
pub fn new_node(content: HtmlContent) -> NodeRef {
    Rc::new(RefCell::new(NodeInner::new(content)))
}

/// Creates a new element node with the given tag name and attributes.
pub fn new_element_node(name: &str, attributes: &[(&str, &str)]) -> NodeRef {
    let attributes = attributes
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    new_node(HtmlContent::Element(HtmlElement::new(
        name.to_string(),
        attributes,
    )))
}

/// Creates a new text node with the given content.
pub fn new_text_node(text: &str) -> NodeRef {
    new_node(HtmlContent::Text(HtmlText::new(text)))
}

/// Creates a new comment node with the given content.
pub fn new_comment_node(text: &str) -> NodeRef {
    new_node(HtmlContent::Comment(HtmlComment::new(text)))
}
