//! Stateful front end: owns the current scene and forwards clicks to an injected listener.

use crate::build::{RenderOptions, render_scene};
use crate::layout::Layout;
use crate::scene::{Interaction, Scene, StatsPopup};
use crate::{RenderContext, Result};
use serde::{Deserialize, Serialize};
use stategraph_core::{AnnotationWarning, Graph, StateStats};

/// Receives user interactions. All calls are synchronous notifications; the renderer never
/// navigates or persists anything itself.
pub trait GraphInteractionListener {
    /// A selectable state was clicked. The host should load that state's details.
    fn on_node_selected(&mut self, state_id: &str);

    /// Follows [`Self::on_node_selected`] when no stats are attached to the current render.
    fn on_open_editor(&mut self, _state_id: &str) {}

    /// The delete control of a state was clicked. The host should ask for confirmation.
    fn on_delete_requested(&mut self, state_id: &str);
}

/// Listener that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl GraphInteractionListener for NoopListener {
    fn on_node_selected(&mut self, _state_id: &str) {}

    fn on_delete_requested(&mut self, _state_id: &str) {}
}

/// Size the host container should take after a render.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HostSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderResult {
    pub size: HostSize,
    pub warnings: Vec<AnnotationWarning>,
}

pub struct StateGraphRenderer<L> {
    ctx: RenderContext,
    listener: L,
    scene: Scene,
    options: RenderOptions,
}

impl<L: GraphInteractionListener> StateGraphRenderer<L> {
    pub fn new(listener: L) -> Self {
        Self::with_context(RenderContext::default(), listener)
    }

    pub fn with_context(ctx: RenderContext, listener: L) -> Self {
        let scene = Scene::empty(ctx.config.min_canvas_width);
        Self {
            ctx,
            listener,
            scene,
            options: RenderOptions::default(),
        }
    }

    /// Replaces the current scene with a drawing of `graph`.
    ///
    /// The graph is validated and the new scene fully built before anything is swapped in.
    /// On error the previous scene is replaced by an empty placeholder, never by a partial one.
    pub fn render(&mut self, graph: &Graph, options: &RenderOptions) -> Result<RenderResult> {
        let built = graph.validate(&self.ctx.config).map_err(Into::into).and_then(|resolved| {
            let layout = Layout::for_graph(&resolved, &self.ctx.config);
            render_scene(&resolved, &layout, options, &self.ctx)
        });

        match built {
            Ok(out) => {
                self.scene = out.scene;
                self.options = options.clone();
                Ok(RenderResult {
                    size: self.host_size(),
                    warnings: out.warnings,
                })
            }
            Err(err) => {
                tracing::warn!(error = %err, "state graph not rendered");
                self.clear();
                Err(err)
            }
        }
    }

    pub fn clear(&mut self) {
        self.scene = Scene::empty(self.ctx.config.min_canvas_width);
        self.options = RenderOptions::default();
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    pub fn host_size(&self) -> HostSize {
        HostSize {
            width: self.scene.canvas_width,
            height: self.scene.height,
        }
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    pub fn into_listener(self) -> L {
        self.listener
    }

    /// Hit-tests `(x, y)` and dispatches whatever was hit.
    pub fn click(&mut self, x: f64, y: f64) -> Option<Interaction> {
        let hit = self.scene.hit_test(x, y)?;
        self.dispatch(&hit);
        Some(hit)
    }

    /// Applies `interaction` to the current scene. Returns warnings raised while doing so.
    ///
    /// Interactions that do not match the current scene (unknown state, terminal state,
    /// a state without a delete control) are ignored.
    pub fn dispatch(&mut self, interaction: &Interaction) -> Vec<AnnotationWarning> {
        let mut warnings = Vec::new();
        match interaction {
            Interaction::SelectState { state_id } => {
                let Some(node) = self.scene.node(state_id).filter(|n| n.selectable) else {
                    return warnings;
                };
                let name = node.name.clone();
                self.listener.on_node_selected(state_id);

                let Some(stats_map) = self.options.state_stats.as_ref() else {
                    self.listener.on_open_editor(state_id);
                    return warnings;
                };
                let missing;
                let stats = match stats_map.get(state_id.as_str()) {
                    Some(stats) => stats,
                    None => {
                        AnnotationWarning::StatsMissing {
                            hash_id: state_id.clone(),
                        }
                        .report(&mut warnings);
                        missing = StateStats::default();
                        &missing
                    }
                };
                self.scene.popup = Some(StatsPopup::build(
                    state_id,
                    &name,
                    stats,
                    self.scene.canvas_width,
                    self.scene.height,
                ));
            }
            Interaction::DeleteState { state_id } => {
                let deletable = self
                    .scene
                    .node(state_id)
                    .is_some_and(|n| n.delete_control.is_some());
                if deletable {
                    self.listener.on_delete_requested(state_id);
                }
            }
            Interaction::ClosePopup => {
                self.scene.popup = None;
            }
        }
        warnings
    }
}
