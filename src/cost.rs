//! Edit cost model for forest alignment.
//!
//! Costs are uniform per node and independent of subtree size; when a
//! whole subtree is deleted or inserted, the alignment engine sums the
//! per-node cost over the subtree's descendants itself.

use crate::node::NodeRef;

/// Per-node edit costs.
///
/// The default is unit cost for every operation, matching the reference
/// algorithm. Note that with unit costs a single replace (cost 1) always
/// undercuts a delete plus an insert (cost 2); callers that want
/// mismatched leaves resolved as delete+insert can raise `replace`.
#[derive(Debug, Clone, Copy)]
pub struct CostModel {
    /// Cost of deleting one node.
    pub delete: u64,
    /// Cost of inserting one node.
    pub insert: u64,
    /// Cost of replacing one node with a label-unequal one.
    pub replace: u64,
}

impl Default for CostModel {
    fn default() -> Self {
        CostModel {
            delete: 1,
            insert: 1,
            replace: 1,
        }
    }
}

impl CostModel {
    /// Returns the cost of deleting the given node (not its subtree).
    pub fn delete_cost(&self, _node: &NodeRef) -> u64 {
        self.delete
    }

    /// Returns the cost of inserting the given node (not its subtree).
    pub fn insert_cost(&self, _node: &NodeRef) -> u64 {
        self.insert
    }

    /// Returns the cost of replacing `_a` with `_b`.
    pub fn replace_cost(&self, _a: &NodeRef, _b: &NodeRef) -> u64 {
        self.replace
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::new_element_node;

    #[test]
    fn test_default_is_unit_cost() {
        let costs = CostModel::default();
        let a = new_element_node("div", &[]);
        let b = new_element_node("span", &[]);

        assert_eq!(costs.delete_cost(&a), 1);
        assert_eq!(costs.insert_cost(&b), 1);
        assert_eq!(costs.replace_cost(&a, &b), 1);
    }

    #[test]
    fn test_costs_are_parameterizable() {
        let costs = CostModel {
            delete: 3,
            insert: 2,
            replace: 5,
        };
        let a = new_element_node("div", &[]);
        let b = new_element_node("span", &[]);

        assert_eq!(costs.delete_cost(&a), 3);
        assert_eq!(costs.insert_cost(&b), 2);
        assert_eq!(costs.replace_cost(&a, &b), 5);
    }

    #[test]
    fn test_cost_independent_of_subtree_size() {
        use crate::node::NodeInner;

        let costs = CostModel::default();
        let bushy = new_element_node("div", &[]);
        for _ in 0..5 {
            NodeInner::add_child(&bushy, new_element_node("p", &[]));
        }
        let leaf = new_element_node("div", &[]);

        assert_eq!(costs.delete_cost(&bushy), costs.delete_cost(&leaf));
    }
}
