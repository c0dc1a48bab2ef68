use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Geometry and styling constants shared by layout, scene building and SVG output.
///
/// Every field has a default, so partial JSON objects deserialize cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VizConfig {
    /// `hashId` of the terminal pseudo-state.
    pub terminal_state_id: String,
    /// Labels longer than this are elided. Also caps the label-driven box width.
    pub max_label_length: usize,
    pub node_padding_x: f64,
    pub node_height: f64,
    /// Lower bound for the host container width.
    pub min_canvas_width: f64,
    /// Node fill opacity used when no opacity map is supplied or a lookup misses.
    pub default_opacity: f64,
    pub neutral_stroke: String,
    pub edge_stroke: String,
    pub edge_stroke_width: f64,
    pub legend: LegendConfig,
    pub layout: LayoutConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegendConfig {
    pub x: f64,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Minimum distance of every node anchor from the top/left edge.
    pub margin: f64,
    /// Horizontal gap between neighboring boxes in one rank.
    pub node_spacing: f64,
    /// Vertical distance between consecutive ranks.
    pub rank_spacing: f64,
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            terminal_state_id: "END".to_string(),
            max_label_length: 20,
            node_padding_x: 8.0,
            node_height: 40.0,
            min_canvas_width: 680.0,
            default_opacity: 0.5,
            neutral_stroke: "#CCCCCC".to_string(),
            edge_stroke: "#b3b3b3".to_string(),
            edge_stroke_width: 3.0,
            legend: LegendConfig::default(),
            layout: LayoutConfig::default(),
        }
    }
}

impl Default for LegendConfig {
    fn default() -> Self {
        Self {
            x: 450.0,
            width: 200.0,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin: 20.0,
            node_spacing: 40.0,
            rank_spacing: 80.0,
        }
    }
}

impl VizConfig {
    pub fn from_json(value: &Value) -> Result<Self> {
        let cfg = Self::deserialize(value)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Returns a copy of `self` with `overrides` deep-merged on top.
    ///
    /// Objects merge key by key; any other value replaces the slot wholesale.
    pub fn merged_with(&self, overrides: &Value) -> Result<Self> {
        let mut base = serde_json::to_value(self)?;
        deep_merge_value(&mut base, overrides);
        Self::from_json(&base)
    }

    pub fn validate(&self) -> Result<()> {
        // Elision keeps `max - 3` characters plus the ellipsis.
        if self.max_label_length < 3 {
            return Err(Error::InvalidConfig {
                message: format!(
                    "maxLabelLength must be at least 3 (got {})",
                    self.max_label_length
                ),
            });
        }
        let positive = [
            ("nodeHeight", self.node_height),
            ("minCanvasWidth", self.min_canvas_width),
            ("legend.width", self.legend.width),
            ("layout.rankSpacing", self.layout.rank_spacing),
        ];
        for (name, v) in positive {
            if !(v.is_finite() && v > 0.0) {
                return Err(Error::InvalidConfig {
                    message: format!("{name} must be a positive number (got {v})"),
                });
            }
        }
        let non_negative = [
            ("nodePaddingX", self.node_padding_x),
            ("edgeStrokeWidth", self.edge_stroke_width),
            ("layout.margin", self.layout.margin),
            ("layout.nodeSpacing", self.layout.node_spacing),
        ];
        for (name, v) in non_negative {
            if !(v.is_finite() && v >= 0.0) {
                return Err(Error::InvalidConfig {
                    message: format!("{name} must be a non-negative number (got {v})"),
                });
            }
        }
        if !(0.0..=1.0).contains(&self.default_opacity) {
            return Err(Error::InvalidConfig {
                message: format!(
                    "defaultOpacity must lie in [0, 1] (got {})",
                    self.default_opacity
                ),
            });
        }
        Ok(())
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}
