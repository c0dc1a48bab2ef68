//! Comparison of two exploration versions for the history view.
//!
//! States are matched by a stable id that survives renames; a content fingerprint decides
//! whether a matched state changed. The result is a ready-to-render [`Graph`] plus the
//! [`HighlightStates`] that color each node by its change status.

use crate::annotations::HighlightStates;
use crate::error::LinkEndpoint;
use crate::model::{Graph, Node};
use crate::{Error, Result};
use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiffStatus {
    Added,
    Deleted,
    Changed,
    Unchanged,
    Renamed,
}

impl DiffStatus {
    /// Legend order.
    pub const ALL: [DiffStatus; 5] = [
        DiffStatus::Added,
        DiffStatus::Deleted,
        DiffStatus::Changed,
        DiffStatus::Unchanged,
        DiffStatus::Renamed,
    ];

    pub fn color(self) -> &'static str {
        match self {
            DiffStatus::Added => "rgb(78, 162, 78)",
            DiffStatus::Deleted => "rgb(220, 20, 60)",
            DiffStatus::Changed => "rgb(30, 144, 255)",
            DiffStatus::Unchanged => "rgb(245, 245, 220)",
            DiffStatus::Renamed => "rgb(255, 215, 0)",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            DiffStatus::Added => "Added",
            DiffStatus::Deleted => "Deleted",
            DiffStatus::Changed => "Changed",
            DiffStatus::Unchanged => "Unchanged",
            DiffStatus::Renamed => "Renamed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionedState {
    pub stable_id: String,
    pub name: String,
    /// Opaque content digest; equal fingerprints mean equal content.
    pub fingerprint: String,
}

impl VersionedState {
    pub fn new(
        stable_id: impl Into<String>,
        name: impl Into<String>,
        fingerprint: impl Into<String>,
    ) -> Self {
        Self {
            stable_id: stable_id.into(),
            name: name.into(),
            fingerprint: fingerprint.into(),
        }
    }
}

/// A transition between two states of one version, by state name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionLink {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSnapshot {
    pub init_state_name: String,
    #[serde(default)]
    pub states: Vec<VersionedState>,
    #[serde(default)]
    pub links: Vec<VersionLink>,
}

impl VersionSnapshot {
    pub fn new(init_state_name: impl Into<String>) -> Self {
        Self {
            init_state_name: init_state_name.into(),
            ..Default::default()
        }
    }

    pub fn state(mut self, state: VersionedState) -> Self {
        self.states.push(state);
        self
    }

    pub fn link(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.links.push(VersionLink {
            from: from.into(),
            to: to.into(),
        });
        self
    }

    fn stable_ids_by_name(&self) -> Result<FxHashMap<&str, &str>> {
        let mut seen: FxHashMap<&str, ()> = FxHashMap::default();
        let mut by_name = FxHashMap::default();
        for s in &self.states {
            if seen.insert(s.stable_id.as_str(), ()).is_some() {
                return Err(Error::DuplicateNode {
                    id: s.stable_id.clone(),
                });
            }
            if by_name.insert(s.name.as_str(), s.stable_id.as_str()).is_some() {
                return Err(Error::DuplicateNode { id: s.name.clone() });
            }
        }
        Ok(by_name)
    }

    fn link_keys(&self) -> Result<Vec<(String, String)>> {
        let by_name = self.stable_ids_by_name()?;
        let mut out = Vec::with_capacity(self.links.len());
        for (link_index, link) in self.links.iter().enumerate() {
            let lookup = |name: &str, endpoint| {
                by_name
                    .get(name)
                    .map(|s| s.to_string())
                    .ok_or_else(|| Error::InvalidGraph {
                        link_index,
                        endpoint,
                        node_id: name.to_string(),
                    })
            };
            out.push((
                lookup(&link.from, LinkEndpoint::Source)?,
                lookup(&link.to, LinkEndpoint::Target)?,
            ));
        }
        Ok(out)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateDiff {
    pub stable_id: String,
    pub status: DiffStatus,
    /// Display name; renamed states read `"<new> (was: <old>)"`.
    pub label: String,
    pub old_name: Option<String>,
    pub new_name: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDiffSummary {
    /// Distinct links across both versions.
    pub total: usize,
    pub added: usize,
    pub deleted: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionDiff {
    pub states: Vec<StateDiff>,
    pub graph: Graph,
    pub highlight: HighlightStates,
    pub links: LinkDiffSummary,
}

impl VersionDiff {
    pub fn status_of(&self, stable_id: &str) -> Option<DiffStatus> {
        self.states
            .iter()
            .find(|s| s.stable_id == stable_id)
            .map(|s| s.status)
    }
}

/// Diffs `old` against `new`.
///
/// Node order: states of `new` in order, then states only present in `old`. The initial
/// state is taken from `new`, falling back to `old` when `new` has no states. An
/// `initStateName` that matches none of its snapshot's states is an
/// [`Error::UnknownInitialState`].
pub fn diff_versions(old: &VersionSnapshot, new: &VersionSnapshot) -> Result<VersionDiff> {
    let old_links = old.link_keys()?;
    let new_links = new.link_keys()?;

    let old_by_id: IndexMap<&str, &VersionedState> = old
        .states
        .iter()
        .map(|s| (s.stable_id.as_str(), s))
        .collect();
    let new_ids: FxHashMap<&str, ()> = new
        .states
        .iter()
        .map(|s| (s.stable_id.as_str(), ()))
        .collect();

    let mut states = Vec::with_capacity(old.states.len() + new.states.len());
    for s in &new.states {
        let diff = match old_by_id.get(s.stable_id.as_str()) {
            None => StateDiff {
                stable_id: s.stable_id.clone(),
                status: DiffStatus::Added,
                label: s.name.clone(),
                old_name: None,
                new_name: Some(s.name.clone()),
            },
            Some(prev) => {
                let renamed = prev.name != s.name;
                let status = match (prev.fingerprint == s.fingerprint, renamed) {
                    (false, _) => DiffStatus::Changed,
                    (true, true) => DiffStatus::Renamed,
                    (true, false) => DiffStatus::Unchanged,
                };
                let label = if renamed {
                    format!("{} (was: {})", s.name, prev.name)
                } else {
                    s.name.clone()
                };
                StateDiff {
                    stable_id: s.stable_id.clone(),
                    status,
                    label,
                    old_name: Some(prev.name.clone()),
                    new_name: Some(s.name.clone()),
                }
            }
        };
        states.push(diff);
    }
    for s in &old.states {
        if new_ids.contains_key(s.stable_id.as_str()) {
            continue;
        }
        states.push(StateDiff {
            stable_id: s.stable_id.clone(),
            status: DiffStatus::Deleted,
            label: s.name.clone(),
            old_name: Some(s.name.clone()),
            new_name: None,
        });
    }

    let old_set: IndexSet<(String, String)> = old_links.into_iter().collect();
    let new_set: IndexSet<(String, String)> = new_links.into_iter().collect();
    let added = new_set.difference(&old_set).count();
    let deleted = old_set.difference(&new_set).count();
    let union: IndexSet<&(String, String)> = new_set.iter().chain(old_set.iter()).collect();
    let summary = LinkDiffSummary {
        total: union.len(),
        added,
        deleted,
    };

    let init_source = if new.states.is_empty() { old } else { new };
    let init_state_id = match init_stable_id(init_source) {
        Some(id) => id,
        None if states.is_empty() => String::new(),
        None => {
            return Err(Error::UnknownInitialState {
                init_state_id: init_source.init_state_name.clone(),
            });
        }
    };
    let mut graph = Graph::new(init_state_id);
    for s in &states {
        graph
            .nodes
            .push(Node::new(s.stable_id.clone(), s.label.clone()));
    }
    for (from, to) in union {
        graph = graph.link(from.clone(), to.clone());
    }

    let mut highlight = HighlightStates::default();
    for s in &states {
        highlight
            .strokes
            .insert(s.stable_id.clone(), s.status.color().to_string());
    }
    for status in DiffStatus::ALL {
        if states.iter().any(|s| s.status == status) {
            highlight = highlight.with_legend_entry(status.color(), status.description());
        }
    }

    tracing::debug!(
        states = states.len(),
        links_total = summary.total,
        links_added = summary.added,
        links_deleted = summary.deleted,
        "diffed exploration versions"
    );

    Ok(VersionDiff {
        states,
        graph,
        highlight,
        links: summary,
    })
}

fn init_stable_id(snapshot: &VersionSnapshot) -> Option<String> {
    snapshot
        .states
        .iter()
        .find(|s| s.name == snapshot.init_state_name)
        .map(|s| s.stable_id.clone())
}
