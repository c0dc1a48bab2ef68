#![forbid(unsafe_code)]

//! Headless renderer for exploration state graphs.
//!
//! [`render_scene`] turns a validated graph plus a [`Layout`] into a [`Scene`]; [`svg`] writes a
//! scene as SVG; [`StateGraphRenderer`] keeps the current scene and routes clicks to a
//! [`GraphInteractionListener`].

pub mod build;
pub mod geometry;
pub mod layout;
pub mod legend;
pub mod popup;
pub mod renderer;
pub mod scene;
pub mod style;
pub mod svg;
pub mod text;

pub use build::{RenderOptions, RenderOutput, render_scene};
pub use geometry::{EdgePath, NodeBox, Point, Rect, edge_path, text_width};
pub use layout::{Layout, compute_layout};
pub use renderer::{
    GraphInteractionListener, HostSize, NoopListener, RenderResult, StateGraphRenderer,
};
pub use scene::{Interaction, Scene, StatsPopup};
pub use svg::{SvgRenderOptions, render_scene_svg};
pub use text::{EllipsisTruncator, LabelTruncator};

use stategraph_core::VizConfig;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Model(#[from] stategraph_core::Error),
    #[error("no layout position for state `{id}`")]
    MissingPosition { id: String },
    #[error("scene JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Configuration and injected services shared by every render.
#[derive(Clone)]
pub struct RenderContext {
    pub config: VizConfig,
    pub truncator: Arc<dyn LabelTruncator + Send + Sync>,
}

impl RenderContext {
    pub fn new(config: VizConfig) -> Self {
        Self {
            config,
            truncator: Arc::new(EllipsisTruncator),
        }
    }

    pub fn with_truncator(mut self, truncator: Arc<dyn LabelTruncator + Send + Sync>) -> Self {
        self.truncator = truncator;
        self
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new(VizConfig::default())
    }
}

impl std::fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Validates `graph`, lays it out and builds its scene in one call.
pub fn render_graph(
    graph: &stategraph_core::Graph,
    options: &RenderOptions,
    ctx: &RenderContext,
) -> Result<RenderOutput> {
    let resolved = graph.validate(&ctx.config)?;
    let layout = Layout::for_graph(&resolved, &ctx.config);
    render_scene(&resolved, &layout, options, ctx)
}
