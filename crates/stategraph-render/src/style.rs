//! Per-node styling policy.

use stategraph_core::{AnnotationWarning, HighlightStates, Node, OpacityMap, VizConfig};

pub const INITIAL_FILL: &str = "olive";
pub const TERMINAL_FILL: &str = "green";
pub const WARNING_FILL: &str = "pink";
pub const DEFAULT_FILL: &str = "beige";

/// Role of a node within its graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRole {
    pub initial: bool,
    pub terminal: bool,
}

/// First match wins: override, initial, terminal, reachability warning, default.
pub fn node_fill(node: &Node, role: NodeRole, fill_override: Option<&str>) -> String {
    if let Some(fill) = fill_override {
        return fill.to_string();
    }
    let fill = if role.initial {
        INITIAL_FILL
    } else if role.terminal {
        TERMINAL_FILL
    } else if node.has_reachability_warning() {
        WARNING_FILL
    } else {
        DEFAULT_FILL
    };
    fill.to_string()
}

pub fn node_stroke(
    node: &Node,
    highlight: Option<&HighlightStates>,
    config: &VizConfig,
    warnings: &mut Vec<AnnotationWarning>,
) -> String {
    let Some(highlight) = highlight else {
        return config.neutral_stroke.clone();
    };
    match highlight.stroke_for(&node.hash_id) {
        Some(color) => color.to_string(),
        None => {
            AnnotationWarning::HighlightMissing {
                hash_id: node.hash_id.clone(),
            }
            .report(warnings);
            config.neutral_stroke.clone()
        }
    }
}

pub fn node_stroke_width(role: NodeRole, highlighting: bool) -> f64 {
    if role.initial || role.terminal || highlighting {
        3.0
    } else {
        2.0
    }
}

pub fn node_opacity(
    node: &Node,
    opacity: Option<&OpacityMap>,
    config: &VizConfig,
    warnings: &mut Vec<AnnotationWarning>,
) -> f64 {
    match opacity {
        Some(map) => map.opacity_for(&node.hash_id, config.default_opacity, warnings),
        None => config.default_opacity,
    }
}
