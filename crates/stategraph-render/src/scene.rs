//! Retained-mode scene produced by one render call.
//!
//! A [`Scene`] is plain data: it can be serialized, compared, hit-tested and turned into SVG.
//! Draw order is legend, links, nodes, popup; hit testing walks it back to front.

use crate::geometry::{EdgePath, Point, Rect};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextShape {
    pub x: f64,
    pub y: f64,
    pub text: String,
    #[serde(default)]
    pub anchor: TextAnchor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default)]
    pub bold: bool,
}

impl TextShape {
    pub fn new(x: f64, y: f64, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            text: text.into(),
            anchor: TextAnchor::Start,
            fill: None,
            font_size: None,
            bold: false,
        }
    }

    pub fn centered(mut self) -> Self {
        self.anchor = TextAnchor::Middle;
        self
    }

    pub fn fill(mut self, color: impl Into<String>) -> Self {
        self.fill = Some(color.into());
        self
    }

    pub fn font_size(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// Shared `<defs>`: the arrowhead marker and the opacity-legend gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Defs {
    pub arrowhead_fill: String,
    pub gradient_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkShape {
    pub source: String,
    pub target: String,
    pub path: EdgePath,
    pub stroke: String,
    pub stroke_width: f64,
}

/// Invisible click target plus the visible `x` glyph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteControl {
    pub hit_region: Rect,
    pub glyph: TextShape,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeShape {
    pub id: String,
    pub hash_id: String,
    /// Full state name; `label.text` may be elided.
    pub name: String,
    pub rect: Rect,
    pub corner_radius: f64,
    pub fill: String,
    pub fill_opacity: f64,
    pub stroke: String,
    pub stroke_width: f64,
    pub label: TextShape,
    pub tooltip: String,
    /// False for the terminal state.
    pub selectable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_control: Option<DeleteControl>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpacitySwatch {
    /// Filled with the gradient from [`Defs`].
    pub swatch: Rect,
    pub label: TextShape,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendRow {
    pub swatch: Rect,
    pub color: String,
    pub label: TextShape,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Legend {
    pub frame: Rect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<OpacitySwatch>,
    #[serde(default)]
    pub rows: Vec<LegendRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupAnswer {
    pub bullet: Point,
    pub text: TextShape,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupRule {
    pub heading: TextShape,
    pub answers: Vec<PopupAnswer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseControl {
    pub hit_region: Rect,
    pub glyph: TextShape,
}

/// Statistics overlay for one state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsPopup {
    pub hash_id: String,
    /// Dimmed cover over the whole scene; blocks clicks on the graph below.
    pub glass: Rect,
    pub panel: Rect,
    pub title: TextShape,
    pub entry_count: TextShape,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answers_heading: Option<TextShape>,
    pub rules: Vec<PopupRule>,
    pub close: CloseControl,
}

impl StatsPopup {
    /// Every answer row, in display order.
    pub fn answer_lines(&self) -> impl Iterator<Item = &str> {
        self.rules
            .iter()
            .flat_map(|r| r.answers.iter().map(|a| a.text.text.as_str()))
    }
}

/// What a click landed on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Interaction {
    #[serde(rename_all = "camelCase")]
    SelectState { state_id: String },
    #[serde(rename_all = "camelCase")]
    DeleteState { state_id: String },
    ClosePopup,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Bounding box of the drawn content.
    pub width: f64,
    pub height: f64,
    /// Width for the host container: `width`, but never below the configured minimum.
    pub canvas_width: f64,
    pub defs: Defs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    pub links: Vec<LinkShape>,
    pub nodes: Vec<NodeShape>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popup: Option<StatsPopup>,
}

impl Scene {
    /// Placeholder with no content.
    pub fn empty(min_canvas_width: f64) -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            canvas_width: min_canvas_width,
            defs: Defs {
                arrowhead_fill: "grey".to_string(),
                gradient_color: "black".to_string(),
            },
            legend: None,
            links: Vec::new(),
            nodes: Vec::new(),
            popup: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty() && self.legend.is_none()
    }

    pub fn node(&self, hash_id: &str) -> Option<&NodeShape> {
        self.nodes.iter().find(|n| n.hash_id == hash_id)
    }

    pub fn delete_controls(&self) -> impl Iterator<Item = (&NodeShape, &DeleteControl)> {
        self.nodes
            .iter()
            .filter_map(|n| n.delete_control.as_ref().map(|d| (n, d)))
    }

    /// Topmost interactive element under `(x, y)`.
    ///
    /// An open popup is modal: only its close control responds.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<Interaction> {
        if let Some(popup) = &self.popup {
            if popup.close.hit_region.contains(x, y) {
                return Some(Interaction::ClosePopup);
            }
            return None;
        }

        for node in self.nodes.iter().rev() {
            if let Some(ctrl) = &node.delete_control {
                if ctrl.hit_region.contains(x, y) {
                    return Some(Interaction::DeleteState {
                        state_id: node.hash_id.clone(),
                    });
                }
            }
            if node.selectable && node.rect.contains(x, y) {
                return Some(Interaction::SelectState {
                    state_id: node.hash_id.clone(),
                });
            }
        }
        None
    }
}
