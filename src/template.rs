//! Template reconstruction and extraction.
//!
//! This module turns a filled backtrace matrix back into trees: the
//! backtracker walks the matrix to decide which source-side nodes belong
//! to the shared template, the projector prunes a copy of the source tree
//! down to those nodes and their ancestors, and the fold orchestrator
//! repeats the whole pipeline across a collection of documents.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashSet;

use crate::align::{align, AlignConfig, BacktraceMatrix, EditOp};
use crate::error::{Error, Result};
use crate::label::LabelConfig;
use crate::node::{HtmlContent, NodeInner, NodeRef, TreeCursor};

/// Returns true for nodes that never denote shared structure.
///
/// Comments and whitespace-only text are excluded from templates by
/// policy, even when their labels match.
fn never_template(node: &NodeRef) -> bool {
    match node.borrow().content() {
        HtmlContent::Comment(_) => true,
        HtmlContent::Text(t) => t.is_whitespace(),
        HtmlContent::Element(_) => false,
    }
}

/// Walks a backtrace matrix and collects the source-side template nodes.
///
/// The walk starts at the terminal cell `(m, n)` and follows the recorded
/// operations back towards the origin, stopping as soon as either index
/// reaches zero; the remaining prefix is an all-delete or all-insert run
/// and contributes nothing. Update cells recurse into their nested
/// backtrace first, then emit the source node when the sub-template is
/// non-empty or the pair is label-equal. A node is emitted before its
/// descendants.
pub fn retrieve_template(backtrace: &BacktraceMatrix, labels: &LabelConfig) -> Vec<NodeRef> {
    let mut template = Vec::new();

    if backtrace.rows() <= 1 {
        return template;
    }

    let mut i = backtrace.rows() - 1;
    let mut j = backtrace.cols() - 1;

    while i > 0 && j > 0 {
        let cell = backtrace
            .get(i, j)
            .expect("interior backtrace cells are always filled");

        match cell.op {
            EditOp::Delete => j -= 1,
            EditOp::Insert => i -= 1,
            EditOp::Update => {
                let sub_template = retrieve_template(&cell.next, labels);

                if (!sub_template.is_empty() || labels.labels_equal(&cell.src, &cell.dst))
                    && !never_template(&cell.src)
                {
                    template.push(cell.src.clone());
                }
                template.extend(sub_template);

                i -= 1;
                j -= 1;
            }
        }
    }

    template
}

/// Produces the smallest sub-tree of `root` containing every template
/// node and the ancestors that keep them connected.
///
/// The source tree is never modified; the result is a pruned independent
/// copy. Correspondence between source and copy nodes is positional: the
/// copy replicates the source's shape, and both trees are traversed in
/// lockstep post-order so the k-th visited node on each side corresponds.
/// All marking completes before the first node is removed; detaching
/// during the walk would corrupt the cursors.
pub fn smallest_subtree_containing(root: &NodeRef, template_nodes: &[NodeRef]) -> NodeRef {
    let template_ids: FxHashSet<u64> =
        template_nodes.iter().map(|n| n.borrow().id()).collect();

    let template = NodeInner::deep_clone(root);

    let mut source_cursor = TreeCursor::new(root.clone());
    let mut copy_cursor = TreeCursor::new(template.clone());

    let mut preserved: FxHashSet<u64> = FxHashSet::default();
    let mut doomed: Vec<NodeRef> = Vec::new();

    let root_id = root.borrow().id();

    loop {
        let node = source_cursor
            .next_post_order()
            .expect("source and copy cursors advance in lockstep");
        let copy_node = copy_cursor
            .next_post_order()
            .expect("source and copy cursors advance in lockstep");

        let node_id = node.borrow().id();
        if node_id == root_id {
            break;
        }

        if template_ids.contains(&node_id) {
            // Ancestors of a template node must survive for connectivity
            let mut ancestor = node.borrow().parent().upgrade();
            while let Some(a) = ancestor {
                if a.borrow().id() == root_id {
                    break;
                }
                preserved.insert(a.borrow().id());
                ancestor = a.borrow().parent().upgrade();
            }
        } else if !preserved.contains(&node_id) {
            doomed.push(copy_node);
        }
    }

    for node in &doomed {
        NodeInner::detach(node);
    }

    template
}

/// Computes the common template of `t1` against `t2`.
///
/// Aligns the two trees, backtracks the template-node set, and projects
/// it onto `t1`. The result is always a sub-tree of the *first* argument;
/// `extract_common(a, b)` and `extract_common(b, a)` generally differ.
pub fn extract_common(t1: &NodeRef, t2: &NodeRef, config: &AlignConfig) -> Result<NodeRef> {
    NodeInner::check_tree(t1)?;
    NodeInner::check_tree(t2)?;

    let alignment = align(t1, t2, config);
    let template_nodes = retrieve_template(&alignment.backtrace, &config.labels);

    Ok(smallest_subtree_containing(t1, &template_nodes))
}

/// Order in which the fold orchestrator draws documents.
///
/// Alignment is neither associative nor order-invariant, so different
/// draw orders can yield different (though typically similar) templates.
/// The randomized default preserves the reference behavior; the other
/// variants exist for reproducible runs.
#[derive(Debug, Clone, Copy)]
pub enum PairingOrder {
    /// Draw documents at random, seeding from the OS.
    Random,
    /// Draw documents at random from a fixed seed.
    Seeded(u64),
    /// Consume documents first to last.
    InOrder,
}

/// Options for [`find_template`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FoldOptions {
    /// Strategy objects passed to every alignment.
    pub align: AlignConfig,
    /// Document draw order.
    pub order: PairingOrder,
}

impl Default for PairingOrder {
    fn default() -> Self {
        PairingOrder::Random
    }
}

/// Removes and returns the next document according to the draw order.
fn draw(remaining: &mut Vec<NodeRef>, rng: &mut Option<StdRng>) -> NodeRef {
    match rng {
        Some(rng) => {
            let index = rng.gen_range(0..remaining.len());
            remaining.remove(index)
        }
        None => remaining.remove(0),
    }
}

/// Finds the template shared across a collection of document trees.
///
/// Draws two documents (without replacement), computes their pairwise
/// common template, then folds in each remaining document by aligning the
/// running template against it and replacing the running template with
/// the projection. Requires at least two documents.
pub fn find_template(documents: Vec<NodeRef>, options: &FoldOptions) -> Result<NodeRef> {
    if documents.len() < 2 {
        return Err(Error::InsufficientInput {
            got: documents.len(),
        });
    }

    for document in &documents {
        NodeInner::check_tree(document)?;
    }

    let mut rng = match options.order {
        PairingOrder::Random => Some(StdRng::from_entropy()),
        PairingOrder::Seeded(seed) => Some(StdRng::seed_from_u64(seed)),
        PairingOrder::InOrder => None,
    };

    let mut remaining = documents;

    let first = draw(&mut remaining, &mut rng);
    let second = draw(&mut remaining, &mut rng);
    let mut template = extract_common(&first, &second, &options.align)?;

    while !remaining.is_empty() {
        let next = draw(&mut remaining, &mut rng);
        template = extract_common(&template, &next, &options.align)?;
    }

    Ok(template)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{
        new_comment_node, new_element_node, new_text_node, NodeInner, NodeRef,
    };

    fn element(name: &str, children: Vec<NodeRef>) -> NodeRef {
        let node = new_element_node(name, &[]);
        for child in children {
            NodeInner::add_child(&node, child);
        }
        node
    }

    /// Renders a tree as a compact one-line expression for assertions.
    fn dump(node: &NodeRef) -> String {
        let borrowed = node.borrow();
        match borrowed.content() {
            HtmlContent::Element(e) => {
                let children: Vec<String> =
                    borrowed.children().iter().map(dump).collect();
                format!("{}({})", e.name(), children.join(","))
            }
            HtmlContent::Text(t) => format!("'{}'", t.text()),
            HtmlContent::Comment(c) => format!("<!--{}-->", c.text()),
        }
    }

    #[test]
    fn test_backtracker_emits_label_equal_pairs() {
        let t1 = element("div", vec![element("p", vec![new_text_node("Hello")])]);
        let t2 = element("div", vec![element("p", vec![new_text_node("World")])]);

        let config = AlignConfig::default();
        let alignment = align(&t1, &t2, &config);
        let template = retrieve_template(&alignment.backtrace, &config.labels);

        // p is emitted (labels equal); the text differs and both texts
        // are leaves, so neither is emitted
        assert_eq!(template.len(), 1);
        assert_eq!(
            template[0].borrow().id(),
            t1.borrow().child(0).unwrap().borrow().id()
        );
    }

    #[test]
    fn test_backtracker_emits_node_before_descendants() {
        let t1 = element(
            "div",
            vec![element("p", vec![element("em", vec![])])],
        );
        let t2 = element(
            "div",
            vec![element("p", vec![element("em", vec![])])],
        );

        let config = AlignConfig::default();
        let alignment = align(&t1, &t2, &config);
        let template = retrieve_template(&alignment.backtrace, &config.labels);

        let p = t1.borrow().child(0).unwrap().clone();
        let em = p.borrow().child(0).unwrap().clone();
        let ids: Vec<u64> = template.iter().map(|n| n.borrow().id()).collect();
        assert_eq!(ids, vec![p.borrow().id(), em.borrow().id()]);
    }

    #[test]
    fn test_backtracker_excludes_comments_and_whitespace() {
        // All three children are label-equal across the trees, but only
        // the element may enter the template set
        let t1 = element(
            "div",
            vec![
                new_comment_node("generated"),
                new_text_node("   "),
                element("p", vec![]),
            ],
        );
        let t2 = element(
            "div",
            vec![
                new_comment_node("generated"),
                new_text_node("   "),
                element("p", vec![]),
            ],
        );

        let config = AlignConfig::default();
        let alignment = align(&t1, &t2, &config);
        let template = retrieve_template(&alignment.backtrace, &config.labels);

        assert_eq!(template.len(), 1);
        assert!(template[0].borrow().content().is_element());
    }

    #[test]
    fn test_backtracker_stops_at_matrix_edge() {
        // Trailing mismatched siblings put a non-update cell at the
        // terminal position, which ends the walk before the matching
        // pairs are reached
        let t1 = element("div", vec![element("h1", vec![])]);
        let t2 = element(
            "div",
            vec![element("h1", vec![]), element("x", vec![])],
        );

        let config = AlignConfig::default();
        let alignment = align(&t1, &t2, &config);
        let template = retrieve_template(&alignment.backtrace, &config.labels);

        assert!(template.is_empty());
    }

    #[test]
    fn test_empty_backtrace_yields_no_template() {
        let template =
            retrieve_template(&BacktraceMatrix::empty(), &LabelConfig::default());
        assert!(template.is_empty());
    }

    #[test]
    fn test_projection_keeps_template_nodes_and_ancestors() {
        // div > [section > [p, span], footer]; template = {p}
        let p = element("p", vec![]);
        let section = element("section", vec![p.clone(), element("span", vec![])]);
        let root = element("div", vec![section, element("footer", vec![])]);

        let result = smallest_subtree_containing(&root, &[p]);

        assert_eq!(dump(&result), "div(section(p()))");
        // The source tree is untouched
        assert_eq!(dump(&root), "div(section(p(),span()),footer())");
    }

    #[test]
    fn test_projection_with_empty_template_keeps_only_root() {
        let root = element(
            "div",
            vec![element("p", vec![new_text_node("x")])],
        );

        let result = smallest_subtree_containing(&root, &[]);

        assert_eq!(dump(&result), "div()");
    }

    #[test]
    fn test_projection_no_sibling_rides_along() {
        // Both leaves sit under the same parent; only the template one
        // survives
        let keep = element("p", vec![]);
        let drop = element("aside", vec![]);
        let root = element("div", vec![element("main", vec![keep.clone(), drop])]);

        let result = smallest_subtree_containing(&root, &[keep]);

        assert_eq!(dump(&result), "div(main(p()))");
    }

    #[test]
    fn test_extract_common_end_to_end() {
        let t1 = element("div", vec![element("p", vec![new_text_node("Hello")])]);
        let t2 = element("div", vec![element("p", vec![new_text_node("World")])]);

        let result = extract_common(&t1, &t2, &AlignConfig::default()).unwrap();

        assert_eq!(dump(&result), "div(p())");
    }

    #[test]
    fn test_extract_common_is_asymmetric() {
        // The p elements carry differing attributes but share a child, so
        // each is emitted with a non-empty sub-template; the projection
        // keeps the attributes of the first argument.
        let t1 = element(
            "div",
            vec![{
                let p = new_element_node("p", &[("class", "a")]);
                NodeInner::add_child(&p, element("em", vec![]));
                p
            }],
        );
        let t2 = element(
            "div",
            vec![{
                let p = new_element_node("p", &[("class", "b")]);
                NodeInner::add_child(&p, element("em", vec![]));
                p
            }],
        );

        let config = AlignConfig::default();
        let forward = extract_common(&t1, &t2, &config).unwrap();
        let backward = extract_common(&t2, &t1, &config).unwrap();

        let class_of = |root: &NodeRef| {
            let p = root.borrow().child(0).unwrap().clone();
            let borrowed = p.borrow();
            borrowed.content().as_element().unwrap().attributes()[0].1.clone()
        };

        assert_eq!(class_of(&forward), "a");
        assert_eq!(class_of(&backward), "b");
    }

    #[test]
    fn test_extract_common_self_restricts_to_meaningful_nodes() {
        let make = || {
            element(
                "div",
                vec![
                    new_comment_node("nav start"),
                    element("p", vec![new_text_node("body"), new_text_node("  ")]),
                ],
            )
        };
        let t1 = make();
        let t2 = make();

        let result = extract_common(&t1, &t2, &AlignConfig::default()).unwrap();

        // Comments and whitespace-only text drop out at every level
        assert_eq!(dump(&result), "div(p('body'))");
    }

    #[test]
    fn test_extract_common_rejects_invalid_tree() {
        let t1 = element("div", vec![element("p", vec![])]);
        let t2 = element("div", vec![element("p", vec![])]);

        // Re-parenting a child without detaching it first leaves t1
        // holding a child whose parent link points elsewhere
        let stolen = t1.borrow().child(0).unwrap().clone();
        let other = element("main", vec![]);
        NodeInner::add_child(&other, stolen);

        assert!(matches!(
            extract_common(&t1, &t2, &AlignConfig::default()),
            Err(Error::InvalidTree(_))
        ));
    }

    #[test]
    fn test_find_template_requires_two_documents() {
        let options = FoldOptions::default();

        assert!(matches!(
            find_template(vec![], &options),
            Err(Error::InsufficientInput { got: 0 })
        ));

        let single = element("div", vec![]);
        assert!(matches!(
            find_template(vec![single], &options),
            Err(Error::InsufficientInput { got: 1 })
        ));
    }

    #[test]
    fn test_find_template_in_order_fold() {
        let make = |text: &str| {
            element(
                "div",
                vec![
                    element("nav", vec![]),
                    element("p", vec![new_text_node(text)]),
                ],
            )
        };
        let documents = vec![make("one"), make("two"), make("three")];

        let options = FoldOptions {
            order: PairingOrder::InOrder,
            ..FoldOptions::default()
        };
        let result = find_template(documents, &options).unwrap();

        assert_eq!(dump(&result), "div(nav(),p())");
    }

    #[test]
    fn test_find_template_seeded_is_reproducible() {
        let make = |class: &str| {
            let p = new_element_node("p", &[("class", class)]);
            NodeInner::add_child(&p, element("em", vec![]));
            element("div", vec![p])
        };

        let options = FoldOptions {
            order: PairingOrder::Seeded(42),
            ..FoldOptions::default()
        };

        let a = find_template(vec![make("a"), make("b"), make("c")], &options).unwrap();
        let b = find_template(vec![make("a"), make("b"), make("c")], &options).unwrap();

        assert_eq!(dump(&a), dump(&b));
    }
}
