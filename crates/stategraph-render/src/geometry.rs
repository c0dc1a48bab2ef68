//! Node box and edge path geometry.
//!
//! Boxes are sized from the label length alone, so layout and rendering agree on widths
//! without a text measurer.

use serde::{Deserialize, Serialize};
use stategraph_core::VizConfig;

/// Box width contributed by the label before any characters.
pub const TEXT_BASE_WIDTH: f64 = 40.0;
/// Box width per label character, up to the label cap.
pub const TEXT_CHAR_WIDTH: f64 = 5.0;
/// Sideways displacement of a bezier control point from the chord midpoint.
pub const EDGE_BEND: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Inclusive on all edges.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }
}

/// Label-driven width: `40 + 5 * min(len, cap)`, counted in characters.
pub fn text_width(name: &str, max_label_length: usize) -> f64 {
    let len = name.chars().count().min(max_label_length);
    TEXT_BASE_WIDTH + TEXT_CHAR_WIDTH * len as f64
}

/// On-screen box of one node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeBox {
    /// Layout anchor (`x0`, `y0`).
    pub anchor: Point,
    pub text_width: f64,
    /// Drawn rectangle: the text width padded on both sides.
    pub rect: Rect,
    pub center: Point,
}

impl NodeBox {
    pub fn new(anchor: Point, name: &str, config: &VizConfig) -> Self {
        let text_width = text_width(name, config.max_label_length);
        let pad = config.node_padding_x;
        Self {
            anchor,
            text_width,
            rect: Rect::new(
                anchor.x - pad,
                anchor.y,
                text_width + 2.0 * pad,
                config.node_height,
            ),
            center: Point::new(
                anchor.x + text_width / 2.0,
                anchor.y + config.node_height / 2.0,
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EdgePath {
    /// One quadratic bezier segment from `start` through `control` to `end`.
    Quadratic {
        start: Point,
        control: Point,
        end: Point,
    },
    /// Elliptical arc leaving and re-entering the same box.
    #[serde(rename_all = "camelCase")]
    SelfLoop {
        start: Point,
        radius_x: f64,
        radius_y: f64,
        end: Point,
    },
}

impl EdgePath {
    pub fn is_self_loop(&self) -> bool {
        matches!(self, EdgePath::SelfLoop { .. })
    }

    pub fn start(&self) -> Point {
        match *self {
            EdgePath::Quadratic { start, .. } | EdgePath::SelfLoop { start, .. } => start,
        }
    }

    pub fn end(&self) -> Point {
        match *self {
            EdgePath::Quadratic { end, .. } | EdgePath::SelfLoop { end, .. } => end,
        }
    }

    /// SVG path data (`d` attribute).
    pub fn to_path_data(&self) -> String {
        let mut out = String::new();
        let num = crate::svg::fmt_number_into;
        match *self {
            EdgePath::Quadratic {
                start,
                control,
                end,
            } => {
                out.push('M');
                num(&mut out, start.x);
                out.push(' ');
                num(&mut out, start.y);
                out.push_str(" Q ");
                num(&mut out, control.x);
                out.push(' ');
                num(&mut out, control.y);
                out.push(' ');
                num(&mut out, end.x);
                out.push(' ');
                num(&mut out, end.y);
            }
            EdgePath::SelfLoop {
                start,
                radius_x,
                radius_y,
                end,
            } => {
                out.push('M');
                num(&mut out, start.x);
                out.push(',');
                num(&mut out, start.y);
                out.push('A');
                num(&mut out, radius_x);
                out.push(',');
                num(&mut out, radius_y);
                out.push_str(" 0 1,1 ");
                num(&mut out, end.x);
                out.push(' ');
                num(&mut out, end.y);
            }
        }
        out
    }
}

/// Path for a link from `source` to `target`.
///
/// Self-loops and boxes whose centers coincide get the arc form; the bezier form divides by
/// the center distance.
pub fn edge_path(source: &NodeBox, target: &NodeBox, self_loop: bool) -> EdgePath {
    let s = source.center;
    let t = target.center;
    let dx = t.x - s.x;
    let dy = t.y - s.y;

    if self_loop || (dx == 0.0 && dy == 0.0) {
        return self_loop_path(source);
    }

    // Vertical clearance: half the box height.
    let clearance = source.rect.height / 2.0;
    let (start_cutoff, end_cutoff) = if dx == 0.0 {
        let c = clearance / dy.abs();
        (c, c)
    } else {
        let start = (source.text_width / 2.0) / dx.abs();
        let end = (target.text_width / 2.0) / dx.abs();
        if dy != 0.0 {
            let c = clearance / dy.abs();
            (start.min(c), end.min(c))
        } else {
            (start, end)
        }
    };

    let norm = (dx * dx + dy * dy).sqrt();
    let perp_x = dy / norm;
    let perp_y = -dx / norm;

    EdgePath::Quadratic {
        start: Point::new(s.x + start_cutoff * dx, s.y + start_cutoff * dy),
        control: Point::new(
            s.x + dx / 2.0 + perp_x * EDGE_BEND,
            s.y + dy / 2.0 + perp_y * EDGE_BEND,
        ),
        end: Point::new(t.x - end_cutoff * dx, t.y - end_cutoff * dy),
    }
}

fn self_loop_path(node: &NodeBox) -> EdgePath {
    let c = node.center;
    let half_h = node.rect.height / 2.0;
    let quarter_w = node.text_width / 4.0;
    EdgePath::SelfLoop {
        start: Point::new(c.x - quarter_w, c.y + half_h),
        radius_x: quarter_w,
        radius_y: half_h,
        end: Point::new(c.x - 10.0 - node.text_width / 2.0, c.y),
    }
}
