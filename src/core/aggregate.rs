//! # Tree Aggregation Module / 树聚合模块
//!
//! Walks the test tree once, producing the pre-order flat row sequence used by
//! the report and the bottom-up result counts of every subtree.
//!
//! 单次遍历测试树，生成报告使用的先序扁平行序列以及每个子树自底向上的结果计数。

use crate::core::models::{NodeKind, ResultCounts, TestNode, TestOutcome};

/// A tree node seen in pre-order, annotated with its depth (0 for the nodes
/// passed to [`flatten`]) and the counts of its whole subtree.
///
/// 以先序访问到的树节点，附带其深度（传给 [`flatten`] 的节点深度为 0）
/// 以及整个子树的计数。
#[derive(Debug, Clone)]
pub struct FlatRow {
    pub identifier: String,
    pub name: String,
    pub kind: NodeKind,
    pub result: TestOutcome,
    pub duration: String,
    pub depth: usize,
    pub counts: ResultCounts,
    /// Names of the direct `Failure Message` children, in order.
    pub failure_messages: Vec<String>,
}

/// The outcome of a full walk: every node as a row, plus the grand total.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub rows: Vec<FlatRow>,
    pub counts: ResultCounts,
}

/// Flattens `nodes` depth-first in pre-order and counts results bottom-up.
/// Every node, whatever its kind, yields exactly one row.
///
/// 以深度优先先序扁平化 `nodes`，并自底向上统计结果。
/// 每个节点（无论类型）恰好产生一行。
pub fn flatten(nodes: &[TestNode]) -> Aggregation {
    let mut rows = Vec::new();
    let counts = nodes.iter().map(|node| walk(node, 0, &mut rows)).sum();
    Aggregation { rows, counts }
}

/// Counts the results of `nodes` without building rows.
pub fn count_results(nodes: &[TestNode]) -> ResultCounts {
    nodes.iter().map(subtree_counts).sum()
}

/// Counts of a single subtree: one unit for a countable node, plus the sum
/// of its children.
pub fn subtree_counts(node: &TestNode) -> ResultCounts {
    own_counts(node) + node.children.iter().map(subtree_counts).sum::<ResultCounts>()
}

fn own_counts(node: &TestNode) -> ResultCounts {
    if node.kind.is_countable() {
        ResultCounts::single(&node.result)
    } else {
        ResultCounts::default()
    }
}

fn walk(node: &TestNode, depth: usize, rows: &mut Vec<FlatRow>) -> ResultCounts {
    let index = rows.len();
    rows.push(FlatRow {
        identifier: node.identifier.clone(),
        name: node.name.clone(),
        kind: node.kind.clone(),
        result: node.result.clone(),
        duration: node.duration.clone(),
        depth,
        counts: ResultCounts::default(),
        failure_messages: node
            .children
            .iter()
            .filter(|child| child.kind == NodeKind::FailureMessage)
            .map(|child| child.name.clone())
            .collect(),
    });

    let children: ResultCounts = node
        .children
        .iter()
        .map(|child| walk(child, depth + 1, rows))
        .sum();
    let counts = own_counts(node) + children;
    rows[index].counts = counts;
    counts
}

