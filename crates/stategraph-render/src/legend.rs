//! Legend panel to the right of the graph.
//!
//! The opacity swatch (when present) sits at the top; highlight rows stack below it at a
//! fixed pitch. The frame grows to fit whatever is present.

use crate::geometry::Rect;
use crate::scene::{Legend, LegendRow, OpacitySwatch, TextShape};
use stategraph_core::{AnnotationWarning, HighlightStates, OpacityMap, VizConfig};

pub const LEGEND_INSET: f64 = 10.0;
/// Vertical space taken by the opacity swatch and its caption.
pub const OPACITY_BLOCK_HEIGHT: f64 = 70.0;
pub const ROW_PITCH: f64 = 40.0;
pub const ROW_SWATCH_SIZE: f64 = 30.0;
pub const OPACITY_SWATCH_HEIGHT: f64 = 20.0;

/// `None` unless an opacity map or highlight states are supplied.
pub fn build_legend(
    opacity: Option<&OpacityMap>,
    highlight: Option<&HighlightStates>,
    config: &VizConfig,
    warnings: &mut Vec<AnnotationWarning>,
) -> Option<Legend> {
    if opacity.is_none() && highlight.is_none() {
        return None;
    }

    let x = config.legend.x;
    let width = config.legend.width;
    let mut height = 0.0;

    let opacity_swatch = opacity.map(|map| {
        height += OPACITY_BLOCK_HEIGHT;
        OpacitySwatch {
            swatch: Rect::new(
                x + LEGEND_INSET,
                LEGEND_INSET,
                width - 2.0 * LEGEND_INSET,
                OPACITY_SWATCH_HEIGHT,
            ),
            label: TextShape::new(x + LEGEND_INSET, 50.0, map.legend_label(warnings)),
        }
    });

    let first_row_y = if opacity_swatch.is_some() {
        OPACITY_BLOCK_HEIGHT
    } else {
        LEGEND_INSET
    };
    let mut rows = Vec::new();
    if let Some(highlight) = highlight {
        for (i, entry) in highlight.legend.iter().enumerate() {
            height += ROW_PITCH;
            let y = first_row_y + i as f64 * ROW_PITCH;
            rows.push(LegendRow {
                swatch: Rect::new(x + LEGEND_INSET, y, ROW_SWATCH_SIZE, ROW_SWATCH_SIZE),
                color: entry.color.clone(),
                label: TextShape::new(x + 50.0, y + 17.0, entry.description.clone()),
            });
        }
    }

    Some(Legend {
        frame: Rect::new(x, 0.0, width, height),
        opacity: opacity_swatch,
        rows,
    })
}
