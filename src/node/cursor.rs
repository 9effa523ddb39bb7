//! Non-recursive tree traversal.
//!
//! `TreeCursor` walks a subtree in pre-order or post-order without using
//! host call recursion. Instead of a call stack it keeps, for each
//! ancestor of the current node, the index of the next child to resume at
//! (the bifurcation stack). Auxiliary space is therefore bounded by tree
//! depth, never by total node count, so arbitrarily large documents can
//! be enumerated without touching host recursion limits.

use std::rc::Rc;

use super::NodeRef;

/// A restartable cursor over one subtree.
///
/// A cursor yields each node of the subtree exactly once per pass:
/// pre-order yields a node the first time it is reached, post-order only
/// after all of its children have been yielded. Traversal ends with `None`
/// once control has returned to the subtree root with all children
/// exhausted; `reset` rewinds for another pass.
pub struct TreeCursor {
    /// Root of the subtree being traversed.
    root: NodeRef,
    /// The node the cursor is currently positioned at.
    current: Option<NodeRef>,
    /// Index of the next unvisited child at the current node.
    next_child: usize,
    /// Resume indices for each ancestor of the current node.
    bifurcation: Vec<usize>,
}

impl TreeCursor {
    /// Creates a cursor positioned at the start of the given subtree.
    pub fn new(root: NodeRef) -> Self {
        TreeCursor {
            current: Some(root.clone()),
            root,
            next_child: 0,
            bifurcation: Vec::new(),
        }
    }

    /// Rewinds the cursor to the start of the subtree.
    pub fn reset(&mut self) {
        self.current = Some(self.root.clone());
        self.next_child = 0;
        self.bifurcation.clear();
    }

    /// Returns the next node in pre-order, or `None` when the subtree is
    /// exhausted.
    pub fn next_pre_order(&mut self) -> Option<NodeRef> {
        let mut current = self.current.take()?;
        let mut result = None;

        loop {
            let num_children = current.borrow().child_count();

            if num_children == 0 || self.next_child == num_children {
                // A leaf, or all children have been visited
                if num_children == 0 {
                    result = Some(current.clone());
                }

                if Rc::ptr_eq(&current, &self.root) {
                    // Back at the root with nothing left to visit
                    return result;
                }

                let parent = current
                    .borrow()
                    .parent()
                    .upgrade()
                    .expect("non-root node reachable from the root has a parent");
                current = parent;
                self.next_child = self.bifurcation.pop().unwrap_or(0);
            } else {
                // First arrival at this node yields it before descending
                if self.next_child == 0 {
                    result = Some(current.clone());
                }

                let child = current.borrow().children()[self.next_child].clone();
                self.bifurcation.push(self.next_child + 1);
                self.next_child = 0;
                current = child;
            }

            if result.is_some() {
                self.current = Some(current);
                return result;
            }
        }
    }

    /// Returns the next node in post-order, or `None` when the subtree is
    /// exhausted.
    pub fn next_post_order(&mut self) -> Option<NodeRef> {
        let mut current = self.current.take()?;

        loop {
            let num_children = current.borrow().child_count();

            if num_children == 0 || self.next_child == num_children {
                // A leaf, or all children have been visited: yield it
                let result = current.clone();

                if Rc::ptr_eq(&current, &self.root) {
                    return Some(result);
                }

                let parent = current
                    .borrow()
                    .parent()
                    .upgrade()
                    .expect("non-root node reachable from the root has a parent");
                self.next_child = self.bifurcation.pop().unwrap_or(0);
                self.current = Some(parent);
                return Some(result);
            }

            let child = current.borrow().children()[self.next_child].clone();
            self.bifurcation.push(self.next_child + 1);
            self.next_child = 0;
            current = child;
        }
    }
}

/// Returns the strict descendants of a node in pre-order.
///
/// The node itself is not included.
pub fn descendants(node: &NodeRef) -> Vec<NodeRef> {
    let mut cursor = TreeCursor::new(node.clone());
    let mut result = Vec::new();

    // The first pre-order yield is the subtree root itself
    cursor.next_pre_order();
    while let Some(n) = cursor.next_pre_order() {
        result.push(n);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{new_element_node, new_text_node, NodeInner};

    /// div > [p > [t1, t2], span]
    fn sample_tree() -> (NodeRef, Vec<NodeRef>) {
        let div = new_element_node("div", &[]);
        let p = new_element_node("p", &[]);
        let t1 = new_text_node("one");
        let t2 = new_text_node("two");
        let span = new_element_node("span", &[]);

        NodeInner::add_child(&div, p.clone());
        NodeInner::add_child(&p, t1.clone());
        NodeInner::add_child(&p, t2.clone());
        NodeInner::add_child(&div, span.clone());

        (div.clone(), vec![div, p, t1, t2, span])
    }

    fn ids(nodes: &[NodeRef]) -> Vec<u64> {
        nodes.iter().map(|n| n.borrow().id()).collect()
    }

    #[test]
    fn test_pre_order_sequence() {
        let (root, nodes) = sample_tree();

        let mut cursor = TreeCursor::new(root);
        let mut visited = Vec::new();
        while let Some(n) = cursor.next_pre_order() {
            visited.push(n.borrow().id());
        }

        // div, p, t1, t2, span
        assert_eq!(visited, ids(&nodes));
        assert!(cursor.next_pre_order().is_none());
    }

    #[test]
    fn test_post_order_sequence() {
        let (root, nodes) = sample_tree();
        let node_ids = ids(&nodes);

        let mut cursor = TreeCursor::new(root);
        let mut visited = Vec::new();
        while let Some(n) = cursor.next_post_order() {
            visited.push(n.borrow().id());
        }

        // t1, t2, p, span, div
        let expected = vec![
            node_ids[2],
            node_ids[3],
            node_ids[1],
            node_ids[4],
            node_ids[0],
        ];
        assert_eq!(visited, expected);
        assert!(cursor.next_post_order().is_none());
    }

    #[test]
    fn test_single_node_tree() {
        let leaf = new_text_node("alone");

        let mut cursor = TreeCursor::new(leaf.clone());
        let visited = cursor.next_pre_order().unwrap();
        assert_eq!(visited.borrow().id(), leaf.borrow().id());
        assert!(cursor.next_pre_order().is_none());

        cursor.reset();
        let visited = cursor.next_post_order().unwrap();
        assert_eq!(visited.borrow().id(), leaf.borrow().id());
        assert!(cursor.next_post_order().is_none());
    }

    #[test]
    fn test_reset_restarts_traversal() {
        let (root, nodes) = sample_tree();

        let mut cursor = TreeCursor::new(root);
        cursor.next_pre_order();
        cursor.next_pre_order();
        cursor.reset();

        let first = cursor.next_pre_order().unwrap();
        assert_eq!(first.borrow().id(), nodes[0].borrow().id());
    }

    #[test]
    fn test_descendants_excludes_subtree_root() {
        let (root, nodes) = sample_tree();
        let expected: Vec<u64> = ids(&nodes)[1..].to_vec();

        assert_eq!(ids(&descendants(&root)), expected);
    }

    #[test]
    fn test_descendants_of_leaf_is_empty() {
        let leaf = new_text_node("x");
        assert!(descendants(&leaf).is_empty());
    }

    #[test]
    fn test_cursor_on_inner_subtree() {
        let (_, nodes) = sample_tree();
        let p = nodes[1].clone();

        // Traversal stays within the p subtree even though p has a parent
        let mut cursor = TreeCursor::new(p.clone());
        let mut visited = Vec::new();
        while let Some(n) = cursor.next_pre_order() {
            visited.push(n.borrow().id());
        }

        assert_eq!(
            visited,
            vec![
                p.borrow().id(),
                nodes[2].borrow().id(),
                nodes[3].borrow().id()
            ]
        );
    }
}
