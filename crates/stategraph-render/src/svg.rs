//! SVG serialization of a [`Scene`].
//!
//! Output is deterministic: the same scene and options always produce the same bytes.

mod util;

pub(crate) use util::fmt_number_into;
use util::{escape_xml, escape_xml_into, fmt_number};

use crate::geometry::Rect;
use crate::scene::{
    Legend, LinkShape, NodeShape, Scene, StatsPopup, TextAnchor, TextShape,
};
use std::fmt::Write as _;

#[derive(Debug, Clone)]
pub struct SvgRenderOptions {
    /// Root element id; also prefixes the marker and gradient ids.
    pub diagram_id: Option<String>,
    /// When true, emit the invisible delete targets next to their glyphs.
    pub include_hit_regions: bool,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            diagram_id: None,
            include_hit_regions: true,
        }
    }
}

pub fn render_scene_svg(scene: &Scene, options: &SvgRenderOptions) -> String {
    let id = options.diagram_id.as_deref().unwrap_or("stategraph");
    let id = escape_xml(id);
    let arrowhead_id = format!("{id}-arrowhead");
    let gradient_id = format!("{id}-nodeGradient");

    let mut out = String::new();
    let _ = write!(
        &mut out,
        r#"<svg id="{id}" xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" class="stategraph">"#,
        w = fmt_number(scene.canvas_width),
        h = fmt_number(scene.height),
    );

    out.push_str("<defs>");
    let _ = write!(
        &mut out,
        r#"<marker id="{arrowhead_id}" viewBox="-5 -5 18 18" refX="10" refY="6" markerWidth="6" markerHeight="9" orient="auto"><path d="M -5 0 L 12 6 L -5 12 z" fill="{}"/></marker>"#,
        escape_xml(&scene.defs.arrowhead_fill)
    );
    let color = escape_xml(&scene.defs.gradient_color);
    let _ = write!(
        &mut out,
        r#"<linearGradient id="{gradient_id}"><stop offset="0%" stop-color="{color}" stop-opacity="1"/><stop offset="100%" stop-color="{color}" stop-opacity="0.1"/></linearGradient>"#
    );
    out.push_str("</defs>");

    if let Some(legend) = &scene.legend {
        render_legend(&mut out, legend, &gradient_id);
    }

    out.push_str(r#"<g class="links">"#);
    for link in &scene.links {
        render_link(&mut out, link, &arrowhead_id);
    }
    out.push_str("</g>");

    out.push_str(r#"<g class="nodes">"#);
    for node in &scene.nodes {
        render_node(&mut out, node, options);
    }
    out.push_str("</g>");

    if let Some(popup) = &scene.popup {
        render_popup(&mut out, popup);
    }

    out.push_str("</svg>\n");
    out
}

fn render_legend(out: &mut String, legend: &Legend, gradient_id: &str) {
    out.push_str(r#"<g class="legend">"#);
    push_rect(out, &legend.frame, r##"class="legend-frame" fill="white" stroke="#CCCCCC""##);
    if let Some(opacity) = &legend.opacity {
        let fill = format!(r#"fill="url(#{gradient_id})""#);
        push_rect(out, &opacity.swatch, &fill);
        push_text(out, &opacity.label, "legend-label");
    }
    for row in &legend.rows {
        let attrs = format!(
            r#"rx="4" ry="4" fill="white" stroke="{}" stroke-width="3""#,
            escape_xml(&row.color)
        );
        push_rect(out, &row.swatch, &attrs);
        push_text(out, &row.label, "legend-label");
    }
    out.push_str("</g>");
}

fn render_link(out: &mut String, link: &LinkShape, arrowhead_id: &str) {
    out.push_str(r#"<path class="link" data-source=""#);
    escape_xml_into(out, &link.source);
    out.push_str(r#"" data-target=""#);
    escape_xml_into(out, &link.target);
    out.push_str(r#"" d=""#);
    out.push_str(&link.path.to_path_data());
    out.push_str(r#"" fill="none" stroke=""#);
    escape_xml_into(out, &link.stroke);
    out.push_str(r#"" stroke-width=""#);
    fmt_number_into(out, link.stroke_width);
    let _ = write!(out, r#"" marker-end="url(#{arrowhead_id})"/>"#);
}

fn render_node(out: &mut String, node: &NodeShape, options: &SvgRenderOptions) {
    out.push_str(r#"<g class="node"#);
    if node.selectable {
        out.push_str(" selectable");
    }
    out.push_str(r#"" data-state-id=""#);
    escape_xml_into(out, &node.hash_id);
    out.push_str(r#"">"#);

    out.push_str("<title>");
    escape_xml_into(out, &node.tooltip);
    out.push_str("</title>");

    let mut attrs = String::new();
    attrs.push_str(r#"rx=""#);
    fmt_number_into(&mut attrs, node.corner_radius);
    attrs.push_str(r#"" ry=""#);
    fmt_number_into(&mut attrs, node.corner_radius);
    attrs.push_str(r#"" fill=""#);
    attrs.push_str(&escape_xml(&node.fill));
    attrs.push_str(r#"" fill-opacity=""#);
    fmt_number_into(&mut attrs, node.fill_opacity);
    attrs.push_str(r#"" stroke=""#);
    attrs.push_str(&escape_xml(&node.stroke));
    attrs.push_str(r#"" stroke-width=""#);
    fmt_number_into(&mut attrs, node.stroke_width);
    attrs.push('"');
    push_rect(out, &node.rect, &attrs);
    push_text(out, &node.label, "node-label");

    if let Some(ctrl) = &node.delete_control {
        if options.include_hit_regions {
            push_rect(out, &ctrl.hit_region, r#"class="delete-target" fill="pink" opacity="0""#);
        }
        push_text(out, &ctrl.glyph, "delete-glyph");
    }
    out.push_str("</g>");
}

fn render_popup(out: &mut String, popup: &StatsPopup) {
    out.push_str(r#"<g class="stats-popup" data-state-id=""#);
    escape_xml_into(out, &popup.hash_id);
    out.push_str(r#"">"#);
    push_rect(out, &popup.glass, r#"class="glass" fill="black" fill-opacity="0.3""#);
    push_rect(out, &popup.panel, r##"class="panel" fill="white" stroke="#888888""##);
    push_text(out, &popup.title, "popup-title");
    push_text(out, &popup.entry_count, "popup-count");
    if let Some(heading) = &popup.answers_heading {
        push_text(out, heading, "popup-heading");
    }
    for rule in &popup.rules {
        push_text(out, &rule.heading, "popup-rule");
        for answer in &rule.answers {
            out.push_str(r#"<circle cx=""#);
            fmt_number_into(out, answer.bullet.x);
            out.push_str(r#"" cy=""#);
            fmt_number_into(out, answer.bullet.y);
            out.push_str(r##"" r="2" fill="#555555"/>"##);
            push_text(out, &answer.text, "popup-answer");
        }
    }
    push_rect(out, &popup.close.hit_region, r#"class="close-target" fill="white""#);
    push_text(out, &popup.close.glyph, "close-glyph");
    out.push_str("</g>");
}

fn push_rect(out: &mut String, rect: &Rect, attrs: &str) {
    out.push_str(r#"<rect x=""#);
    fmt_number_into(out, rect.x);
    out.push_str(r#"" y=""#);
    fmt_number_into(out, rect.y);
    out.push_str(r#"" width=""#);
    fmt_number_into(out, rect.width.max(0.0));
    out.push_str(r#"" height=""#);
    fmt_number_into(out, rect.height.max(0.0));
    out.push_str("\" ");
    out.push_str(attrs);
    out.push_str("/>");
}

fn push_text(out: &mut String, text: &TextShape, class: &str) {
    let _ = write!(out, r#"<text class="{class}" x=""#);
    fmt_number_into(out, text.x);
    out.push_str(r#"" y=""#);
    fmt_number_into(out, text.y);
    out.push('"');
    if text.anchor == TextAnchor::Middle {
        out.push_str(r#" text-anchor="middle""#);
    }
    if let Some(fill) = &text.fill {
        out.push_str(r#" fill=""#);
        escape_xml_into(out, fill);
        out.push('"');
    }
    if let Some(size) = text.font_size {
        out.push_str(r#" font-size=""#);
        fmt_number_into(out, size);
        out.push('"');
    }
    if text.bold {
        out.push_str(r#" font-weight="bold""#);
    }
    out.push('>');
    escape_xml_into(out, &text.text);
    out.push_str("</text>");
}
