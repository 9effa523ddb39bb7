//! Forest alignment by restricted top-down mapping.
//!
//! The alignment engine takes two nodes and aligns their children as two
//! ordered forests of subtrees. Deleting or inserting a forest entry
//! costs its whole subtree; an "update" pairs two entries and, when both
//! have children, recurses into their child forests. The result is a
//! dense cost matrix plus a backtrace matrix from which the shared
//! template can be reconstructed.
//!
//! The recursion on the update path is bounded by tree depth, which is
//! acceptable for HTML documents; pathologically deep inputs would need
//! an explicit work-list variant.

use crate::cost::CostModel;
use crate::label::LabelConfig;
use crate::node::{descendants, NodeRef};

/// The edit operation recorded for a backtrace cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    /// The source-side subtree was removed.
    Delete,
    /// The destination-side subtree was added.
    Insert,
    /// The two subtrees were paired.
    Update,
}

/// Strategy objects for one alignment run.
///
/// Passed explicitly into the engine and the backtracker; there is no
/// process-wide default to select.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlignConfig {
    /// Labeling strategy used for equality tests.
    pub labels: LabelConfig,
    /// Per-node edit costs.
    pub costs: CostModel,
}

/// Dense (m+1)×(n+1) matrix of cumulative alignment costs.
///
/// Row 0 and column 0 hold the cumulative cost of deleting or inserting
/// an entire initial run of subtrees.
#[derive(Debug)]
pub struct CostMatrix {
    rows: usize,
    cols: usize,
    data: Vec<u64>,
}

impl CostMatrix {
    /// Creates a zeroed matrix for forests of m and n subtrees.
    fn new(m: usize, n: usize) -> Self {
        CostMatrix {
            rows: m + 1,
            cols: n + 1,
            data: vec![0; (m + 1) * (n + 1)],
        }
    }

    /// Returns the number of rows (m + 1).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns (n + 1).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the cost at `(i, j)`.
    pub fn get(&self, i: usize, j: usize) -> u64 {
        self.data[i * self.cols + j]
    }

    fn set(&mut self, i: usize, j: usize, cost: u64) {
        self.data[i * self.cols + j] = cost;
    }
}

/// One filled cell of a backtrace matrix.
#[derive(Debug)]
pub struct BacktraceCell {
    /// The operation that achieved the minimal cost.
    pub op: EditOp,
    /// The minimal cost, equal to the cost matrix entry for this cell.
    pub cost: u64,
    /// The source-side child this cell compared.
    pub src: NodeRef,
    /// The destination-side child this cell compared.
    pub dst: NodeRef,
    /// Nested backtrace from recursive alignment of the children of
    /// `src` and `dst`. Empty unless this is an update cell that
    /// recursed.
    pub next: BacktraceMatrix,
}

/// Dense (m+1)×(n+1) matrix of backtrace cells.
///
/// Cells in row 0 and column 0 are never filled; they correspond to the
/// all-deletes / all-inserts borders.
#[derive(Debug, Default)]
pub struct BacktraceMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<Option<BacktraceCell>>,
}

impl BacktraceMatrix {
    /// Creates an unfilled matrix for forests of m and n subtrees.
    fn new(m: usize, n: usize) -> Self {
        let mut cells = Vec::new();
        cells.resize_with((m + 1) * (n + 1), || None);
        BacktraceMatrix {
            rows: m + 1,
            cols: n + 1,
            cells,
        }
    }

    /// Creates an empty matrix, used for update cells that did not
    /// recurse.
    pub fn empty() -> Self {
        BacktraceMatrix::default()
    }

    /// Returns the number of rows (m + 1), or 0 for an empty matrix.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns (n + 1), or 0 for an empty matrix.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the cell at `(i, j)`, or `None` for border and unfilled
    /// cells.
    pub fn get(&self, i: usize, j: usize) -> Option<&BacktraceCell> {
        if self.rows == 0 {
            return None;
        }
        self.cells[i * self.cols + j].as_ref()
    }

    fn set(&mut self, i: usize, j: usize, cell: BacktraceCell) {
        self.cells[i * self.cols + j] = Some(cell);
    }
}

/// The result of aligning the child forests of two nodes.
#[derive(Debug)]
pub struct Alignment {
    /// Total minimal cost, `M[m][n]`.
    pub cost: u64,
    /// The filled cost matrix.
    pub costs: CostMatrix,
    /// The filled backtrace matrix.
    pub backtrace: BacktraceMatrix,
}

/// Aligns the children of `t1` and `t2` as two ordered forests.
///
/// Fills the cost and backtrace matrices over the two child forests and
/// returns them together with the total cost. Update cells whose children
/// both have children recurse into a nested alignment.
///
/// When two or more operations achieve the minimal cost, the recorded
/// operation follows the fixed precedence delete, then insert, then
/// update. This precedence decides which backtrace path is recorded and
/// therefore which nodes end up in the template.
pub fn align(t1: &NodeRef, t2: &NodeRef, config: &AlignConfig) -> Alignment {
    let children1: Vec<NodeRef> = t1.borrow().children().to_vec();
    let children2: Vec<NodeRef> = t2.borrow().children().to_vec();
    let m = children1.len();
    let n = children2.len();

    let mut costs = CostMatrix::new(m, n);
    let mut backtrace = BacktraceMatrix::new(m, n);

    // Borders: cumulative whole-subtree deletion / insertion costs
    for i in 1..=m {
        let child = &children1[i - 1];
        let mut cost = costs.get(i - 1, 0) + config.costs.delete_cost(child);
        for node in descendants(child) {
            cost += config.costs.delete_cost(&node);
        }
        costs.set(i, 0, cost);
    }

    for j in 1..=n {
        let child = &children2[j - 1];
        let mut cost = costs.get(0, j - 1) + config.costs.insert_cost(child);
        for node in descendants(child) {
            cost += config.costs.insert_cost(&node);
        }
        costs.set(0, j, cost);
    }

    for i in 1..=m {
        for j in 1..=n {
            let child1 = &children1[i - 1];
            let child2 = &children2[j - 1];
            let desc1 = descendants(child1);
            let desc2 = descendants(child2);

            let mut delete = costs.get(i - 1, j) + config.costs.delete_cost(child1);
            for node in &desc1 {
                delete += config.costs.delete_cost(node);
            }

            let mut insert = costs.get(i, j - 1) + config.costs.insert_cost(child2);
            for node in &desc2 {
                insert += config.costs.insert_cost(node);
            }

            let mut update = costs.get(i - 1, j - 1);
            if config.labels.label(child1) != config.labels.label(child2) {
                update += config.costs.replace_cost(child1, child2);
            }

            let mut next = BacktraceMatrix::empty();
            let child1_is_leaf = child1.borrow().child_count() == 0;
            let child2_is_leaf = child2.borrow().child_count() == 0;

            if child1_is_leaf || child2_is_leaf {
                if child1_is_leaf {
                    for node in &desc2 {
                        update += config.costs.insert_cost(node);
                    }
                } else {
                    // Mirrors the reference algorithm, which walks the dst
                    // descendant list in this branch while charging delete
                    // costs. The list is empty when dst is a leaf, so the
                    // src subtree goes uncharged; suspected reference
                    // defect, kept for compatibility.
                    for node in &desc2 {
                        update += config.costs.delete_cost(node);
                    }
                }
            } else {
                let nested = align(child1, child2, config);
                update += nested.cost;
                next = nested.backtrace;
            }

            let best = delete.min(insert).min(update);
            let op = if best == delete {
                EditOp::Delete
            } else if best == insert {
                EditOp::Insert
            } else {
                EditOp::Update
            };

            costs.set(i, j, best);
            backtrace.set(
                i,
                j,
                BacktraceCell {
                    op,
                    cost: best,
                    src: child1.clone(),
                    dst: child2.clone(),
                    next,
                },
            );
        }
    }

    Alignment {
        cost: costs.get(m, n),
        costs,
        backtrace,
    }
}
