//! Side tables keyed by `hashId`: node opacity, highlight strokes and per-state answer stats.
//!
//! Lookups never fail. A miss or an out-of-range value falls back to a default and records an
//! [`AnnotationWarning`], so a broken annotation cannot prevent the base graph from rendering.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key reserved for the legend entry in the flat annotation maps.
pub const LEGEND_KEY: &str = "legend";

/// Non-fatal diagnostic produced when an annotation had to be defaulted or dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AnnotationWarning {
    #[error("no opacity for state `{hash_id}`; using default")]
    OpacityMissing { hash_id: String },
    #[error("opacity {value} for state `{hash_id}` is outside [0, 1]; clamped")]
    OpacityOutOfRange { hash_id: String, value: f64 },
    #[error("no highlight stroke for state `{hash_id}`; using neutral stroke")]
    HighlightMissing { hash_id: String },
    #[error("opacity map has no legend label")]
    OpacityLegendMissing,
    #[error("highlight map has no legend")]
    HighlightLegendMissing,
    #[error("legend entry `{entry}` is not a `color:description` pair; dropped")]
    MalformedLegendEntry { entry: String },
    #[error("annotation `{key}` ignored: {reason}")]
    MalformedAnnotation { key: String, reason: String },
    #[error("no stats for state `{hash_id}`; showing zero entries")]
    StatsMissing { hash_id: String },
}

impl AnnotationWarning {
    /// Logs the warning and appends it to `sink`.
    pub fn report(self, sink: &mut Vec<AnnotationWarning>) {
        tracing::warn!(warning = %self, "annotation defaulted");
        sink.push(self);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpacityMap {
    /// Caption shown next to the opacity gradient swatch.
    #[serde(default)]
    pub legend: Option<String>,
    #[serde(default)]
    pub values: IndexMap<String, f64>,
}

impl OpacityMap {
    pub fn new(legend: impl Into<String>) -> Self {
        Self {
            legend: Some(legend.into()),
            values: IndexMap::new(),
        }
    }

    pub fn with(mut self, hash_id: impl Into<String>, opacity: f64) -> Self {
        self.values.insert(hash_id.into(), opacity);
        self
    }

    /// Opacity for `hash_id`, clamped to `[0, 1]`; `default` when missing or NaN.
    pub fn opacity_for(
        &self,
        hash_id: &str,
        default: f64,
        warnings: &mut Vec<AnnotationWarning>,
    ) -> f64 {
        let Some(&value) = self.values.get(hash_id) else {
            AnnotationWarning::OpacityMissing {
                hash_id: hash_id.to_string(),
            }
            .report(warnings);
            return default;
        };
        if value.is_nan() {
            AnnotationWarning::OpacityOutOfRange {
                hash_id: hash_id.to_string(),
                value,
            }
            .report(warnings);
            return default;
        }
        if !(0.0..=1.0).contains(&value) {
            AnnotationWarning::OpacityOutOfRange {
                hash_id: hash_id.to_string(),
                value,
            }
            .report(warnings);
        }
        value.clamp(0.0, 1.0)
    }

    pub fn legend_label(&self, warnings: &mut Vec<AnnotationWarning>) -> &str {
        match self.legend.as_deref() {
            Some(label) => label,
            None => {
                AnnotationWarning::OpacityLegendMissing.report(warnings);
                ""
            }
        }
    }

    /// Reads the flat `{hashId: number, "legend": text}` form.
    pub fn from_legacy(map: &Map<String, Value>, warnings: &mut Vec<AnnotationWarning>) -> Self {
        let mut out = Self::default();
        for (key, value) in map {
            if key == LEGEND_KEY {
                match value.as_str() {
                    Some(s) => out.legend = Some(s.to_string()),
                    None => AnnotationWarning::MalformedAnnotation {
                        key: key.clone(),
                        reason: "legend label is not a string".to_string(),
                    }
                    .report(warnings),
                }
                continue;
            }
            match json_f64(value) {
                Some(v) => {
                    out.values.insert(key.clone(), v);
                }
                None => AnnotationWarning::MalformedAnnotation {
                    key: key.clone(),
                    reason: format!("opacity is not a number: {value}"),
                }
                .report(warnings),
            }
        }
        if out.legend.is_none() {
            AnnotationWarning::OpacityLegendMissing.report(warnings);
        }
        out
    }

    /// Accepts either the structured form (`{"legend": .., "values": {..}}`) or the flat one.
    pub fn from_json(
        value: &Value,
        warnings: &mut Vec<AnnotationWarning>,
    ) -> crate::Result<Self> {
        let Some(map) = value.as_object() else {
            return Ok(Self::deserialize(value)?);
        };
        if map.get("values").is_some_and(Value::is_object) {
            return Ok(Self::deserialize(value)?);
        }
        Ok(Self::from_legacy(map, warnings))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub color: String,
    pub description: String,
}

impl LegendEntry {
    pub fn new(color: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HighlightStates {
    #[serde(default)]
    pub legend: Vec<LegendEntry>,
    /// Stroke color per `hashId`.
    #[serde(default)]
    pub strokes: IndexMap<String, String>,
}

impl HighlightStates {
    pub fn with_stroke(mut self, hash_id: impl Into<String>, color: impl Into<String>) -> Self {
        self.strokes.insert(hash_id.into(), color.into());
        self
    }

    pub fn with_legend_entry(
        mut self,
        color: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.legend.push(LegendEntry::new(color, description));
        self
    }

    pub fn stroke_for(&self, hash_id: &str) -> Option<&str> {
        self.strokes.get(hash_id).map(String::as_str)
    }

    /// Reads the flat `{hashId: color, "legend": "color:desc,color:desc"}` form.
    pub fn from_legacy(map: &Map<String, Value>, warnings: &mut Vec<AnnotationWarning>) -> Self {
        let mut out = Self::default();
        let mut saw_legend = false;
        for (key, value) in map {
            let Some(s) = value.as_str() else {
                AnnotationWarning::MalformedAnnotation {
                    key: key.clone(),
                    reason: format!("expected a string, got {value}"),
                }
                .report(warnings);
                continue;
            };
            if key == LEGEND_KEY {
                saw_legend = true;
                out.legend = parse_legacy_legend(s, warnings);
            } else {
                out.strokes.insert(key.clone(), s.to_string());
            }
        }
        if !saw_legend {
            AnnotationWarning::HighlightLegendMissing.report(warnings);
        }
        out
    }

    /// Accepts either the structured form (`{"legend": [..], "strokes": {..}}`) or the flat one.
    pub fn from_json(
        value: &Value,
        warnings: &mut Vec<AnnotationWarning>,
    ) -> crate::Result<Self> {
        let Some(map) = value.as_object() else {
            return Ok(Self::deserialize(value)?);
        };
        let structured = map.get("strokes").is_some_and(Value::is_object)
            || map.get(LEGEND_KEY).is_some_and(Value::is_array);
        if structured {
            return Ok(Self::deserialize(value)?);
        }
        Ok(Self::from_legacy(map, warnings))
    }
}

/// Parses `"color:description,color:description"`.
///
/// Each pair splits at its first `:`, so descriptions may contain colons. Pairs without a
/// colon or with an empty color are dropped.
pub fn parse_legacy_legend(
    text: &str,
    warnings: &mut Vec<AnnotationWarning>,
) -> Vec<LegendEntry> {
    let mut out = Vec::new();
    for raw in text.split(',') {
        let entry = raw.trim();
        if entry.is_empty() {
            continue;
        }
        match entry.split_once(':') {
            Some((color, desc)) if !color.trim().is_empty() => {
                out.push(LegendEntry::new(color.trim(), desc.trim()));
            }
            _ => AnnotationWarning::MalformedLegendEntry {
                entry: entry.to_string(),
            }
            .report(warnings),
        }
    }
    out
}

/// `(answerText, count)` pair; serialized as a two-element array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerCount(pub String, pub u64);

impl AnswerCount {
    pub fn answer(&self) -> &str {
        &self.0
    }

    pub fn count(&self) -> u64 {
        self.1
    }

    /// `"6 (2 times)"`.
    pub fn display_line(&self) -> String {
        format!("{} ({})", self.0, pluralize_times(self.1))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleStats {
    #[serde(default)]
    pub answers: Vec<AnswerCount>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateStats {
    #[serde(default)]
    pub total_entry_count: u64,
    #[serde(default, rename = "rule_stats")]
    pub rule_stats: IndexMap<String, RuleStats>,
}

impl StateStats {
    pub fn new(total_entry_count: u64) -> Self {
        Self {
            total_entry_count,
            rule_stats: IndexMap::new(),
        }
    }

    pub fn with_answer(
        mut self,
        rule: impl Into<String>,
        answer: impl Into<String>,
        count: u64,
    ) -> Self {
        self.rule_stats
            .entry(rule.into())
            .or_default()
            .answers
            .push(AnswerCount(answer.into(), count));
        self
    }

    /// Rules that recorded at least one answer, in input order.
    pub fn answered_rules(&self) -> impl Iterator<Item = (&str, &RuleStats)> {
        self.rule_stats
            .iter()
            .filter(|(_, r)| !r.answers.is_empty())
            .map(|(name, r)| (name.as_str(), r))
    }
}

/// Stats per `hashId`.
pub type StateStatsMap = IndexMap<String, StateStats>;

/// `"1 time"`, `"2 times"`, `"0 times"`.
pub fn pluralize_times(count: u64) -> String {
    if count == 1 {
        "1 time".to_string()
    } else {
        format!("{count} times")
    }
}

fn json_f64(v: &Value) -> Option<f64> {
    v.as_f64()
        .or_else(|| v.as_i64().map(|n| n as f64))
        .or_else(|| v.as_u64().map(|n| n as f64))
}
