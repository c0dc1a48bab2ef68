use crate::config::VizConfig;
use crate::error::LinkEndpoint;
use crate::{Error, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// One exploration state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Key used for keyed re-rendering and for link resolution.
    pub id: String,
    /// Key of the annotation maps; compared against `initStateId` and the terminal marker.
    pub hash_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reachable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reachable_from_end: Option<bool>,
    /// Top-left anchor supplied by an external layout pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x0: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y0: Option<f64>,
}

impl Node {
    /// Creates a node whose `hashId` equals its `id`.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            hash_id: id.clone(),
            id,
            name: name.into(),
            reachable: None,
            reachable_from_end: None,
            x0: None,
            y0: None,
        }
    }

    pub fn with_hash_id(mut self, hash_id: impl Into<String>) -> Self {
        self.hash_id = hash_id.into();
        self
    }

    pub fn with_reachability(
        mut self,
        reachable: Option<bool>,
        reachable_from_end: Option<bool>,
    ) -> Self {
        self.reachable = reachable;
        self.reachable_from_end = reachable_from_end;
        self
    }

    pub fn at(mut self, x0: f64, y0: f64) -> Self {
        self.x0 = Some(x0);
        self.y0 = Some(y0);
        self
    }

    /// True when either reachability flag is explicitly `false`.
    pub fn has_reachability_warning(&self) -> bool {
        self.reachable == Some(false) || self.reachable_from_end == Some(false)
    }

    /// Hover text: the full name, plus a warning when a reachability flag is `false`.
    ///
    /// `reachable` wins when both flags are false.
    pub fn tooltip(&self) -> String {
        let warning = if self.reachable == Some(false) {
            Some("Warning: this state is unreachable.")
        } else if self.reachable_from_end == Some(false) {
            Some("Warning: there is no path from this state to the END state.")
        } else {
            None
        };
        match warning {
            Some(w) => format!("{} ({w})", self.name),
            None => self.name.clone(),
        }
    }
}

/// Directed transition; `source` and `target` are node ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    pub source: String,
    pub target: String,
}

impl Link {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Caller-owned graph; rebuilt by the caller on every change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub init_state_id: String,
}

impl Graph {
    pub fn new(init_state_id: impl Into<String>) -> Self {
        Self {
            nodes: Vec::new(),
            links: Vec::new(),
            init_state_id: init_state_id.into(),
        }
    }

    pub fn node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn link(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.links.push(Link::new(source, target));
        self
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Checks identity and position invariants and resolves links to node indices.
    ///
    /// This is the only way to obtain a [`ResolvedGraph`], so dangling links never reach
    /// layout or rendering.
    pub fn validate(&self, config: &VizConfig) -> Result<ResolvedGraph<'_>> {
        let mut by_id: FxHashMap<&str, usize> = FxHashMap::default();
        let mut by_hash: FxHashMap<&str, usize> = FxHashMap::default();
        for (idx, node) in self.nodes.iter().enumerate() {
            if by_id.insert(node.id.as_str(), idx).is_some() {
                return Err(Error::DuplicateNode {
                    id: node.id.clone(),
                });
            }
            if by_hash.insert(node.hash_id.as_str(), idx).is_some() {
                return Err(Error::DuplicateNode {
                    id: node.hash_id.clone(),
                });
            }
            match (node.x0, node.y0) {
                (None, None) => {}
                (x, y) => {
                    let x = x.unwrap_or(f64::NAN);
                    let y = y.unwrap_or(f64::NAN);
                    let ok = |v: f64| v.is_finite() && v >= 0.0;
                    if !(ok(x) && ok(y)) {
                        return Err(Error::InvalidPosition {
                            id: node.id.clone(),
                            x,
                            y,
                        });
                    }
                }
            }
        }

        let init = by_hash.get(self.init_state_id.as_str()).copied();
        if init.is_none() && !self.nodes.is_empty() {
            return Err(Error::UnknownInitialState {
                init_state_id: self.init_state_id.clone(),
            });
        }
        let terminal = by_hash.get(config.terminal_state_id.as_str()).copied();

        let mut links = Vec::with_capacity(self.links.len());
        for (link_index, link) in self.links.iter().enumerate() {
            let resolve = |id: &str, endpoint: LinkEndpoint| {
                by_id
                    .get(id)
                    .copied()
                    .ok_or_else(|| Error::InvalidGraph {
                        link_index,
                        endpoint,
                        node_id: id.to_string(),
                    })
            };
            let source = resolve(&link.source, LinkEndpoint::Source)?;
            let target = resolve(&link.target, LinkEndpoint::Target)?;
            links.push(ResolvedLink { source, target });
        }

        tracing::debug!(
            nodes = self.nodes.len(),
            links = links.len(),
            "validated state graph"
        );

        Ok(ResolvedGraph {
            graph: self,
            links,
            by_id,
            by_hash,
            init,
            terminal,
        })
    }
}

/// A link whose endpoints are indices into [`ResolvedGraph::nodes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolvedLink {
    pub source: usize,
    pub target: usize,
}

impl ResolvedLink {
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// A validated, read-only view over a [`Graph`].
#[derive(Debug, Clone)]
pub struct ResolvedGraph<'a> {
    graph: &'a Graph,
    links: Vec<ResolvedLink>,
    by_id: FxHashMap<&'a str, usize>,
    by_hash: FxHashMap<&'a str, usize>,
    init: Option<usize>,
    terminal: Option<usize>,
}

impl<'a> ResolvedGraph<'a> {
    pub fn graph(&self) -> &'a Graph {
        self.graph
    }

    pub fn nodes(&self) -> &'a [Node] {
        &self.graph.nodes
    }

    pub fn node(&self, idx: usize) -> &'a Node {
        &self.graph.nodes[idx]
    }

    pub fn links(&self) -> &[ResolvedLink] {
        &self.links
    }

    pub fn is_empty(&self) -> bool {
        self.graph.nodes.is_empty()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn node_by_hash_id(&self, hash_id: &str) -> Option<&'a Node> {
        self.by_hash.get(hash_id).map(|&idx| &self.graph.nodes[idx])
    }

    pub fn init_index(&self) -> Option<usize> {
        self.init
    }

    pub fn terminal_index(&self) -> Option<usize> {
        self.terminal
    }

    pub fn is_initial(&self, idx: usize) -> bool {
        self.init == Some(idx)
    }

    pub fn is_terminal(&self, idx: usize) -> bool {
        self.terminal == Some(idx)
    }

    pub fn outgoing(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.links
            .iter()
            .filter(move |l| l.source == idx)
            .map(|l| l.target)
    }

    pub fn incoming(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.links
            .iter()
            .filter(move |l| l.target == idx)
            .map(|l| l.source)
    }
}
