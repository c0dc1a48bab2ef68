use stategraph_core::{Graph, HighlightStates, Node, OpacityMap, StateStats, StateStatsMap};
use stategraph_render::scene::Interaction;
use stategraph_render::{
    NoopListener, RenderContext, RenderOptions, StateGraphRenderer, SvgRenderOptions,
    render_graph, render_scene_svg,
};

fn fixture() -> Graph {
    Graph::new("A")
        .node(Node::new("A", "Start <here>"))
        .node(Node::new("B", "Q & A").with_reachability(None, Some(false)))
        .node(Node::new("END", "END"))
        .link("A", "B")
        .link("B", "B")
        .link("B", "END")
}

#[test]
fn svg_carries_ids_markers_and_escaped_labels() {
    let out = render_graph(&fixture(), &RenderOptions::default(), &RenderContext::default())
        .unwrap();
    let opts = SvgRenderOptions {
        diagram_id: Some("explore".to_string()),
        ..Default::default()
    };
    let svg = render_scene_svg(&out.scene, &opts);

    assert!(svg.starts_with(r#"<svg id="explore""#));
    assert!(svg.contains(r#"width="680""#));
    assert!(svg.contains(r#"<marker id="explore-arrowhead""#));
    assert!(svg.contains(r#"marker-end="url(#explore-arrowhead)""#));
    assert!(svg.contains(r#"<linearGradient id="explore-nodeGradient">"#));
    assert!(svg.contains("Start &lt;here&gt;"));
    assert!(svg.contains("Q &amp; A (Warning: there is no path from this state to the END state.)"));
    assert!(!svg.contains("Start <here>"));
    assert_eq!(svg.matches(r#"class="link""#).count(), 3);
    assert_eq!(svg.matches("<title>").count(), 3);
    assert_eq!(svg.matches(r#"<g class="node selectable""#).count(), 2);
    assert_eq!(svg.matches(r#"class="delete-target""#).count(), 1);
    assert!(svg.contains("0 1,1"));
}

#[test]
fn svg_output_is_deterministic() {
    let ctx = RenderContext::default();
    let a = render_graph(&fixture(), &RenderOptions::default(), &ctx).unwrap();
    let b = render_graph(&fixture(), &RenderOptions::default(), &ctx).unwrap();
    let opts = SvgRenderOptions::default();
    assert_eq!(render_scene_svg(&a.scene, &opts), render_scene_svg(&b.scene, &opts));
}

#[test]
fn hit_regions_can_be_left_out() {
    let out = render_graph(&fixture(), &RenderOptions::default(), &RenderContext::default())
        .unwrap();
    let opts = SvgRenderOptions {
        include_hit_regions: false,
        ..Default::default()
    };
    let svg = render_scene_svg(&out.scene, &opts);
    assert!(!svg.contains("delete-target"));
    assert!(svg.contains(r#"class="delete-glyph""#));
}

#[test]
fn legend_and_popup_are_serialized() {
    let mut stats = StateStatsMap::new();
    stats.insert("B".to_string(), StateStats::new(3).with_answer("Rule", "yes", 3));
    let options = RenderOptions {
        opacity_map: Some(OpacityMap::new("Visits").with("A", 0.25)),
        highlight_states: Some(HighlightStates::default().with_legend_entry("red", "Error")),
        state_stats: Some(stats),
        ..Default::default()
    };
    let mut r = StateGraphRenderer::new(NoopListener);
    r.render(&fixture(), &options).unwrap();
    r.dispatch(&Interaction::SelectState {
        state_id: "B".to_string(),
    });

    let svg = render_scene_svg(r.scene(), &SvgRenderOptions::default());
    assert!(svg.contains(r#"fill="url(#stategraph-nodeGradient)""#));
    assert!(svg.contains(">Visits</text>"));
    assert!(svg.contains(">Error</text>"));
    assert!(svg.contains(r#"fill-opacity="0.25""#));
    assert!(svg.contains(r#"class="stats-popup" data-state-id="B""#));
    assert!(svg.contains(">Times hit: 3</text>"));
    assert!(svg.contains(">yes (3 times)</text>"));
}

#[test]
fn empty_scene_is_a_bare_canvas() {
    let r = StateGraphRenderer::new(NoopListener);
    let svg = render_scene_svg(r.scene(), &SvgRenderOptions::default());
    assert!(svg.contains(r#"width="680" height="0""#));
    assert!(!svg.contains("<rect"));
    assert!(!svg.contains("<path class"));
}
