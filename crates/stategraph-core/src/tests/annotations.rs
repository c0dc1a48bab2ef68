use crate::annotations::{LEGEND_KEY, parse_legacy_legend, pluralize_times};
use crate::*;
use serde_json::json;

#[test]
fn opacity_lookup_clamps_and_defaults() {
    let map = OpacityMap::new("Visits")
        .with("A", 0.25)
        .with("B", 1.7)
        .with("C", -0.2);
    let mut warnings = Vec::new();

    assert_eq!(map.opacity_for("A", 0.5, &mut warnings), 0.25);
    assert!(warnings.is_empty());

    assert_eq!(map.opacity_for("B", 0.5, &mut warnings), 1.0);
    assert_eq!(map.opacity_for("C", 0.5, &mut warnings), 0.0);
    assert_eq!(map.opacity_for("Z", 0.5, &mut warnings), 0.5);
    assert_eq!(warnings.len(), 3);
    assert_eq!(
        warnings[2],
        AnnotationWarning::OpacityMissing {
            hash_id: "Z".to_string()
        }
    );
}

#[test]
fn legacy_opacity_map_reads_legend_and_numbers() {
    let value = json!({"legend": "Number of visits", "A": 0.3, "B": 1, "C": "bad"});
    let mut warnings = Vec::new();
    let map = OpacityMap::from_json(&value, &mut warnings).unwrap();

    assert_eq!(map.legend.as_deref(), Some("Number of visits"));
    assert_eq!(map.values.get("A"), Some(&0.3));
    assert_eq!(map.values.get("B"), Some(&1.0));
    assert!(!map.values.contains_key("C"));
    assert!(!map.values.contains_key(LEGEND_KEY));
    assert!(matches!(
        warnings.as_slice(),
        [AnnotationWarning::MalformedAnnotation { key, .. }] if key == "C"
    ));
}

#[test]
fn structured_opacity_map_round_trips_through_json() {
    let value = json!({"legend": "Visits", "values": {"A": 0.1}});
    let mut warnings = Vec::new();
    let map = OpacityMap::from_json(&value, &mut warnings).unwrap();
    assert_eq!(map, OpacityMap::new("Visits").with("A", 0.1));
    assert!(warnings.is_empty());
}

#[test]
fn legacy_legend_splits_pairs_in_order() {
    let mut warnings = Vec::new();
    let legend = parse_legacy_legend("red:Error,green:OK", &mut warnings);
    assert_eq!(
        legend,
        vec![LegendEntry::new("red", "Error"), LegendEntry::new("green", "OK")]
    );
    assert!(warnings.is_empty());
}

#[test]
fn legacy_legend_keeps_colons_in_descriptions_and_drops_garbage() {
    let mut warnings = Vec::new();
    let legend = parse_legacy_legend("blue:Ratio: high, nocolon ,:empty,", &mut warnings);
    assert_eq!(legend, vec![LegendEntry::new("blue", "Ratio: high")]);
    assert_eq!(warnings.len(), 2);
}

#[test]
fn legacy_highlight_map_without_legend_still_yields_strokes() {
    let value = json!({"A": "red", "B": "#00ff00"});
    let mut warnings = Vec::new();
    let h = HighlightStates::from_json(&value, &mut warnings).unwrap();
    assert_eq!(h.stroke_for("A"), Some("red"));
    assert_eq!(h.stroke_for("B"), Some("#00ff00"));
    assert!(h.legend.is_empty());
    assert_eq!(warnings, vec![AnnotationWarning::HighlightLegendMissing]);
}

#[test]
fn structured_highlight_states_deserialize() {
    let value = json!({
        "legend": [{"color": "red", "description": "Error"}],
        "strokes": {"A": "red"}
    });
    let mut warnings = Vec::new();
    let h = HighlightStates::from_json(&value, &mut warnings).unwrap();
    assert_eq!(
        h,
        HighlightStates::default()
            .with_stroke("A", "red")
            .with_legend_entry("red", "Error")
    );
}

#[test]
fn state_stats_use_wire_names_and_tuple_answers() {
    let stats: StateStats = serde_json::from_value(json!({
        "totalEntryCount": 5,
        "rule_stats": {
            "Equals": {"answers": [["6", 2]]},
            "Default": {"answers": []}
        }
    }))
    .unwrap();

    assert_eq!(stats.total_entry_count, 5);
    let rules: Vec<_> = stats.answered_rules().map(|(name, _)| name).collect();
    assert_eq!(rules, vec!["Equals"]);
    assert_eq!(stats.rule_stats["Equals"].answers[0].display_line(), "6 (2 times)");
}

#[test]
fn pluralization() {
    assert_eq!(pluralize_times(1), "1 time");
    assert_eq!(pluralize_times(2), "2 times");
    assert_eq!(pluralize_times(0), "0 times");
}
