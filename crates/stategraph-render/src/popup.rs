//! In-scene statistics overlay for a selected state.

use crate::geometry::{Point, Rect};
use crate::scene::{CloseControl, PopupAnswer, PopupRule, StatsPopup, TextShape};
use stategraph_core::StateStats;

const PANEL_X: f64 = 145.0;
const PANEL_WIDTH: f64 = 420.0;
const TEXT_X: f64 = 150.0;
const LINE_HEIGHT: f64 = 20.0;
const ACCENT: &str = "seagreen";

impl StatsPopup {
    /// Lays out the overlay for one state.
    ///
    /// The panel starts 30% down the scene and grows by one row per answer plus one spacer
    /// row per rule.
    pub fn build(
        hash_id: &str,
        name: &str,
        stats: &StateStats,
        scene_width: f64,
        scene_height: f64,
    ) -> Self {
        let top = scene_height * 0.3;

        let title = TextShape::new(TEXT_X, top + 20.0, name)
            .fill(ACCENT)
            .font_size(20.0)
            .bold();
        let entry_count = TextShape::new(
            TEXT_X,
            top + 40.0,
            format!("Times hit: {}", stats.total_entry_count),
        )
        .fill(ACCENT)
        .bold();

        let mut row = 0.0;
        let mut rules = Vec::new();
        for (rule_name, rule) in stats.answered_rules() {
            let heading = TextShape::new(160.0, top + 80.0 + row * LINE_HEIGHT, rule_name)
                .fill("#888888")
                .bold();
            let mut answers = Vec::with_capacity(rule.answers.len());
            for answer in &rule.answers {
                row += 1.0;
                answers.push(PopupAnswer {
                    bullet: Point::new(165.0, top + 75.0 + row * LINE_HEIGHT),
                    text: TextShape::new(
                        175.0,
                        top + 80.0 + row * LINE_HEIGHT,
                        answer.display_line(),
                    )
                    .fill("#555555"),
                });
            }
            row += 1.0;
            rules.push(PopupRule { heading, answers });
        }

        let answers_heading = (!rules.is_empty()).then(|| {
            TextShape::new(TEXT_X, top + 60.0, "Answers:")
                .fill(ACCENT)
                .bold()
        });
        let panel_height = if rules.is_empty() {
            60.0
        } else {
            60.0 + row * LINE_HEIGHT + 10.0
        };
        let close_x = PANEL_X + PANEL_WIDTH - LINE_HEIGHT;

        StatsPopup {
            hash_id: hash_id.to_string(),
            glass: Rect::new(0.0, 0.0, scene_width, scene_height),
            panel: Rect::new(PANEL_X, top, PANEL_WIDTH, panel_height),
            title,
            entry_count,
            answers_heading,
            rules,
            close: CloseControl {
                hit_region: Rect::new(close_x, top, LINE_HEIGHT, LINE_HEIGHT),
                glyph: TextShape::new(close_x + 5.0, top + 15.0, "x")
                    .font_size(20.0)
                    .bold(),
            },
        }
    }
}
