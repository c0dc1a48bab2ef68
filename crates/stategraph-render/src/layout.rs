//! Node placement.
//!
//! Ranks come from breadth-first depth starting at the initial state. Each rank is one row;
//! states the initial state cannot reach share a final row. Rows are centered on the widest
//! one. The result maps node ids to top-left anchors and never mutates the graph.

use crate::geometry::{Point, text_width};
use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use stategraph_core::{ResolvedGraph, VizConfig};
use std::collections::VecDeque;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Top-left anchor per node id, in graph node order.
    pub positions: IndexMap<String, Point>,
}

impl Layout {
    pub fn position(&self, id: &str) -> Option<Point> {
        self.positions.get(id).copied()
    }

    /// Uses the `x0`/`y0` anchors supplied on every node.
    pub fn from_graph_positions(graph: &ResolvedGraph<'_>) -> Result<Self> {
        let mut positions = IndexMap::with_capacity(graph.nodes().len());
        for node in graph.nodes() {
            let (Some(x), Some(y)) = (node.x0, node.y0) else {
                return Err(Error::MissingPosition {
                    id: node.id.clone(),
                });
            };
            positions.insert(node.id.clone(), Point::new(x, y));
        }
        Ok(Self { positions })
    }

    /// Supplied anchors when every node has them, otherwise [`compute_layout`].
    pub fn for_graph(graph: &ResolvedGraph<'_>, config: &VizConfig) -> Self {
        let all_placed = graph
            .nodes()
            .iter()
            .all(|n| n.x0.is_some() && n.y0.is_some());
        if all_placed {
            if let Ok(layout) = Self::from_graph_positions(graph) {
                return layout;
            }
        }
        compute_layout(graph, config)
    }
}

pub fn compute_layout(graph: &ResolvedGraph<'_>, config: &VizConfig) -> Layout {
    let nodes = graph.nodes();
    if nodes.is_empty() {
        return Layout::default();
    }

    let rows = rank_rows(graph);
    let box_width = |idx: usize| {
        text_width(&nodes[idx].name, config.max_label_length) + 2.0 * config.node_padding_x
    };
    let spacing = config.layout.node_spacing;
    let row_widths: Vec<f64> = rows
        .iter()
        .map(|row| {
            let boxes: f64 = row.iter().map(|&idx| box_width(idx)).sum();
            boxes + spacing * row.len().saturating_sub(1) as f64
        })
        .collect();
    let widest = row_widths.iter().copied().fold(0.0_f64, f64::max);

    let mut anchors: Vec<Option<Point>> = vec![None; nodes.len()];
    for (rank, row) in rows.iter().enumerate() {
        let mut cursor = config.layout.margin + (widest - row_widths[rank]) / 2.0;
        let y = config.layout.margin + rank as f64 * config.layout.rank_spacing;
        for &idx in row {
            anchors[idx] = Some(Point::new(cursor + config.node_padding_x, y));
            cursor += box_width(idx) + spacing;
        }
    }

    let positions = nodes
        .iter()
        .zip(anchors)
        .filter_map(|(node, p)| p.map(|p| (node.id.clone(), p)))
        .collect::<IndexMap<_, _>>();

    tracing::debug!(
        nodes = positions.len(),
        ranks = rows.len(),
        "computed state graph layout"
    );
    Layout { positions }
}

/// Rows of node indices, each in discovery order.
fn rank_rows(graph: &ResolvedGraph<'_>) -> Vec<Vec<usize>> {
    let n = graph.nodes().len();
    let mut rank: Vec<Option<usize>> = vec![None; n];
    let mut rows: Vec<Vec<usize>> = Vec::new();

    if let Some(init) = graph.init_index() {
        let mut queue = VecDeque::new();
        rank[init] = Some(0);
        queue.push_back(init);
        while let Some(idx) = queue.pop_front() {
            let r = rank[idx].unwrap_or(0);
            if rows.len() <= r {
                rows.resize_with(r + 1, Vec::new);
            }
            rows[r].push(idx);
            for next in graph.outgoing(idx) {
                if rank[next].is_none() {
                    rank[next] = Some(r + 1);
                    queue.push_back(next);
                }
            }
        }
    }

    let orphans: Vec<usize> = (0..n).filter(|&idx| rank[idx].is_none()).collect();
    if !orphans.is_empty() {
        rows.push(orphans);
    }
    rows
}
