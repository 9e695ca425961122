//! Exit-reason report tree and the aggregator that builds it.
//!
//! Each trade walks its reason path from the root. At every depth the node
//! for that segment is found or created among its siblings and records the
//! trade, so a parent aggregates every trade that passes through it while its
//! children split the same trades more finely. Depth is unbounded.

use serde::{Deserialize, Serialize};

use exitlab_core::Trade;

use crate::classify::ReasonPath;

/// Statistics for one reason-path segment at one depth.
///
/// Raw samples are filled by [`ReportTree::add_trade`]; derived fields stay
/// zero until [`ReportTree::finalize`] runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportNode {
    pub reason: String,
    pub exits: usize,
    /// Absolute profit of every trade through this node.
    pub profits: Vec<f64>,
    /// Durations in minutes, positive values only.
    pub durations: Vec<i64>,

    // ── Derived ──
    pub avg_profit: f64,
    pub total_profit: f64,
    /// Share of the sibling group's absolute total profit, in percent.
    pub total_profit_pct: f64,
    /// Average duration in whole minutes.
    pub avg_duration: i64,
    pub std_dev_duration: f64,

    pub children: ReportTree,
}

impl ReportNode {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            ..Self::default()
        }
    }

    /// Record one closed trade. Returns 1 if its duration was unusable.
    fn record(&mut self, trade: &Trade) -> usize {
        self.exits += 1;
        self.profits.push(trade.profit_abs);
        if trade.has_duration() {
            self.durations.push(trade.duration);
            0
        } else {
            1
        }
    }
}

/// Sibling group of report nodes; the root group is the whole report.
///
/// Nodes keep first-seen order and labels are unique within a group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportTree {
    nodes: Vec<ReportNode>,
}

impl ReportTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate one trade along its reason path.
    ///
    /// Open trades are skipped. Returns how many node samples had a zero
    /// duration: one per node visited, so a two-level path with an unset
    /// duration counts twice.
    pub fn add_trade(&mut self, trade: &Trade, path: &ReasonPath) -> usize {
        if trade.is_open {
            return 0;
        }
        self.add_segments(trade, path.segments())
    }

    fn add_segments(&mut self, trade: &Trade, segments: &[String]) -> usize {
        let Some((reason, rest)) = segments.split_first() else {
            return 0;
        };
        let node = self.find_or_insert(reason);
        let zero_duration = node.record(trade);
        zero_duration + node.children.add_segments(trade, rest)
    }

    fn find_or_insert(&mut self, reason: &str) -> &mut ReportNode {
        let idx = match self.nodes.iter().position(|n| n.reason == reason) {
            Some(idx) => idx,
            None => {
                self.nodes.push(ReportNode::new(reason));
                self.nodes.len() - 1
            }
        };
        &mut self.nodes[idx]
    }

    pub fn nodes(&self) -> &[ReportNode] {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [ReportNode] {
        &mut self.nodes
    }

    pub fn get(&self, reason: &str) -> Option<&ReportNode> {
        self.nodes.iter().find(|n| n.reason == reason)
    }

    /// Follow a label path down the tree.
    pub fn find_path(&self, path: &[&str]) -> Option<&ReportNode> {
        let (first, rest) = path.split_first()?;
        let node = self.get(first)?;
        if rest.is_empty() {
            Some(node)
        } else {
            node.children.find_path(rest)
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Sum of exit counts in this group.
    pub fn total_exits(&self) -> usize {
        self.nodes.iter().map(|n| n.exits).sum()
    }

    /// Every node with its depth, depth-first, parents before children.
    pub fn flatten(&self) -> Vec<(usize, &ReportNode)> {
        let mut out = Vec::new();
        self.collect(0, &mut out);
        out
    }

    fn collect<'a>(&'a self, depth: usize, out: &mut Vec<(usize, &'a ReportNode)>) {
        for node in &self.nodes {
            out.push((depth, node));
            node.children.collect(depth + 1, out);
        }
    }
}
