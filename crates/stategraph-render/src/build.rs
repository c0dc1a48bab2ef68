//! Pure scene construction: graph + layout + options in, scene + warnings out.

use crate::geometry::{NodeBox, Rect, edge_path};
use crate::layout::Layout;
use crate::legend::build_legend;
use crate::scene::{Defs, DeleteControl, LinkShape, NodeShape, Scene, TextShape};
use crate::style::{NodeRole, node_fill, node_opacity, node_stroke, node_stroke_width};
use crate::{Error, RenderContext, Result};
use serde::{Deserialize, Serialize};
use stategraph_core::{
    AnnotationWarning, HighlightStates, OpacityMap, ResolvedGraph, StateStatsMap,
};

/// Extra room kept right of and below the last node anchor.
const BOUNDS_PAD_X: f64 = 200.0;
const BOUNDS_PAD_Y: f64 = 100.0;
const DELETE_TARGET_SIZE: f64 = 20.0;

/// Per-render styling and annotation inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderOptions {
    /// Overrides the computed fill of every node.
    pub node_fill_color: Option<String>,
    pub opacity_map: Option<OpacityMap>,
    pub forbid_node_deletion: bool,
    pub highlight_states: Option<HighlightStates>,
    /// When present, selecting a node opens a stats popup instead of the editor.
    pub state_stats: Option<StateStatsMap>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderOutput {
    pub scene: Scene,
    pub warnings: Vec<AnnotationWarning>,
}

pub fn render_scene(
    graph: &ResolvedGraph<'_>,
    layout: &Layout,
    options: &RenderOptions,
    ctx: &RenderContext,
) -> Result<RenderOutput> {
    let config = &ctx.config;
    let mut warnings = Vec::new();

    let mut boxes = Vec::with_capacity(graph.nodes().len());
    for node in graph.nodes() {
        let anchor = layout
            .position(&node.id)
            .ok_or_else(|| Error::MissingPosition {
                id: node.id.clone(),
            })?;
        boxes.push(NodeBox::new(anchor, &node.name, config));
    }

    let mut width: f64 = 0.0;
    let mut height: f64 = 0.0;
    for b in &boxes {
        width = width.max(b.anchor.x + BOUNDS_PAD_X);
        height = height.max(b.anchor.y + BOUNDS_PAD_Y);
    }

    // An empty graph draws nothing at all, legend included.
    let legend = if graph.is_empty() {
        None
    } else {
        build_legend(
            options.opacity_map.as_ref(),
            options.highlight_states.as_ref(),
            config,
            &mut warnings,
        )
    };
    if let Some(legend) = &legend {
        width = width.max(legend.frame.right());
        height = height.max(legend.frame.bottom() + 10.0);
    }

    let links = graph
        .links()
        .iter()
        .map(|link| LinkShape {
            source: graph.node(link.source).id.clone(),
            target: graph.node(link.target).id.clone(),
            path: edge_path(&boxes[link.source], &boxes[link.target], link.is_self_loop()),
            stroke: config.edge_stroke.clone(),
            stroke_width: config.edge_stroke_width,
        })
        .collect();

    let highlighting = options.highlight_states.is_some();
    let mut nodes = Vec::with_capacity(boxes.len());
    for (idx, (node, b)) in graph.nodes().iter().zip(&boxes).enumerate() {
        let role = NodeRole {
            initial: graph.is_initial(idx),
            terminal: graph.is_terminal(idx),
        };

        let delete_control = (!options.forbid_node_deletion && !role.initial && !role.terminal)
            .then(|| DeleteControl {
                hit_region: Rect::new(
                    b.anchor.x + b.text_width - 15.0,
                    b.anchor.y,
                    DELETE_TARGET_SIZE,
                    DELETE_TARGET_SIZE,
                ),
                glyph: TextShape::new(b.anchor.x + b.text_width - 10.0, b.anchor.y + 10.0, "x"),
            });

        nodes.push(NodeShape {
            id: node.id.clone(),
            hash_id: node.hash_id.clone(),
            name: node.name.clone(),
            rect: b.rect,
            corner_radius: 4.0,
            fill: node_fill(node, role, options.node_fill_color.as_deref()),
            fill_opacity: node_opacity(node, options.opacity_map.as_ref(), config, &mut warnings),
            stroke: node_stroke(
                node,
                options.highlight_states.as_ref(),
                config,
                &mut warnings,
            ),
            stroke_width: node_stroke_width(role, highlighting),
            label: TextShape::new(
                b.center.x,
                b.anchor.y + 25.0,
                ctx.truncator.truncate(&node.name, config.max_label_length),
            )
            .centered(),
            tooltip: node.tooltip(),
            selectable: !role.terminal,
            delete_control,
        });
    }

    let scene = Scene {
        width,
        height,
        canvas_width: width.max(config.min_canvas_width),
        defs: Defs {
            arrowhead_fill: "grey".to_string(),
            // An unset stop color paints black.
            gradient_color: options
                .node_fill_color
                .clone()
                .unwrap_or_else(|| "black".to_string()),
        },
        legend,
        links,
        nodes,
        popup: None,
    };

    tracing::debug!(
        nodes = scene.nodes.len(),
        links = scene.links.len(),
        width = scene.canvas_width,
        height = scene.height,
        warnings = warnings.len(),
        "built state graph scene"
    );

    Ok(RenderOutput { scene, warnings })
}
