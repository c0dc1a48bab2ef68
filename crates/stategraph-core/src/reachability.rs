//! Reachability flags used for authoring warnings.

use crate::config::VizConfig;
use crate::model::{Graph, ResolvedGraph};
use crate::Result;
use std::collections::VecDeque;

/// Per-node flags, indexed like [`ResolvedGraph::nodes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reachability {
    /// Reachable from the initial state.
    pub reachable: Vec<bool>,
    /// Can reach the terminal state; `None` when the graph has no terminal node.
    pub reachable_from_end: Option<Vec<bool>>,
}

pub fn compute_reachability(graph: &ResolvedGraph<'_>) -> Reachability {
    let n = graph.nodes().len();
    let reachable = match graph.init_index() {
        Some(init) => flood(n, init, |idx| graph.outgoing(idx).collect()),
        None => vec![false; n],
    };
    let reachable_from_end = graph
        .terminal_index()
        .map(|end| flood(n, end, |idx| graph.incoming(idx).collect()));
    Reachability {
        reachable,
        reachable_from_end,
    }
}

fn flood(n: usize, start: usize, next: impl Fn(usize) -> Vec<usize>) -> Vec<bool> {
    let mut seen = vec![false; n];
    let mut queue = VecDeque::new();
    seen[start] = true;
    queue.push_back(start);
    while let Some(idx) = queue.pop_front() {
        for w in next(idx) {
            if !seen[w] {
                seen[w] = true;
                queue.push_back(w);
            }
        }
    }
    seen
}

impl Graph {
    /// Returns a copy with `reachable` / `reachableFromEnd` recomputed.
    ///
    /// Without a terminal node `reachableFromEnd` cannot be derived, so any supplied value is
    /// kept.
    pub fn with_reachability(mut self, config: &VizConfig) -> Result<Self> {
        let flags = {
            let resolved = self.validate(config)?;
            compute_reachability(&resolved)
        };
        for (idx, node) in self.nodes.iter_mut().enumerate() {
            node.reachable = Some(flags.reachable[idx]);
            if let Some(from_end) = &flags.reachable_from_end {
                node.reachable_from_end = Some(from_end[idx]);
            }
        }
        Ok(self)
    }
}
