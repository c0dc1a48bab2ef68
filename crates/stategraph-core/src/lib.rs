#![forbid(unsafe_code)]

//! Exploration state-graph model (headless).
//!
//! A caller builds a [`Graph`] of states and transitions, optionally attaches annotation maps
//! (opacity, highlight strokes, answer stats) and hands it to a renderer. [`Graph::validate`]
//! is the boundary: nothing downstream ever sees a link with a dangling endpoint.

pub mod annotations;
pub mod config;
pub mod diff;
pub mod error;
pub mod model;
pub mod reachability;

pub use annotations::{
    AnnotationWarning, AnswerCount, HighlightStates, LegendEntry, OpacityMap, RuleStats,
    StateStats, StateStatsMap,
};
pub use config::VizConfig;
pub use diff::{DiffStatus, VersionDiff, VersionSnapshot, VersionedState, diff_versions};
pub use error::{Error, LinkEndpoint, Result};
pub use model::{Graph, Link, Node, ResolvedGraph, ResolvedLink};
pub use reachability::{Reachability, compute_reachability};

#[cfg(test)]
mod tests;
