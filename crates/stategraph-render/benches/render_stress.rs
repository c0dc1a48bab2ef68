use criterion::{Criterion, criterion_group, criterion_main};
use stategraph_core::{Graph, HighlightStates, Node, OpacityMap};
use stategraph_render::{
    RenderContext, RenderOptions, SvgRenderOptions, render_graph, render_scene_svg,
};
use std::hint::black_box;

/// A ladder of `n` states: each links forward, back to the start, and to itself.
fn ladder(n: usize) -> Graph {
    let mut g = Graph::new("s0");
    for i in 0..n {
        g = g.node(Node::new(format!("s{i}"), format!("State number {i}")));
    }
    g = g.node(Node::new("END", "END"));
    for i in 0..n {
        let next = if i + 1 == n {
            "END".to_string()
        } else {
            format!("s{}", i + 1)
        };
        g = g
            .link(format!("s{i}"), next)
            .link(format!("s{i}"), "s0")
            .link(format!("s{i}"), format!("s{i}"));
    }
    g
}

fn annotated_options(n: usize) -> RenderOptions {
    let mut opacity = OpacityMap::new("Visits");
    let mut highlight = HighlightStates::default()
        .with_legend_entry("red", "Error")
        .with_legend_entry("green", "OK");
    for i in 0..n {
        opacity = opacity.with(format!("s{i}"), (i % 10) as f64 / 10.0);
        let color = if i % 2 == 0 { "red" } else { "green" };
        highlight = highlight.with_stroke(format!("s{i}"), color);
    }
    RenderOptions {
        opacity_map: Some(opacity),
        highlight_states: Some(highlight),
        ..Default::default()
    }
}

fn bench_render_stress(c: &mut Criterion) {
    let ctx = RenderContext::default();
    let svg_opts = SvgRenderOptions::default();

    let mut group = c.benchmark_group("render_stress");
    group.sample_size(50);

    for (name, size, annotated) in [
        ("ladder_50", 50usize, false),
        ("ladder_200", 200usize, false),
        ("ladder_200_annotated", 200usize, true),
    ] {
        let graph = ladder(size);
        let options = if annotated {
            annotated_options(size)
        } else {
            RenderOptions::default()
        };

        // Pre-check outside measurement.
        let _ = render_graph(&graph, &options, &ctx).expect("render");

        group.bench_function(name, |b| {
            b.iter(|| {
                let out = render_graph(black_box(&graph), &options, &ctx).expect("render");
                let svg = render_scene_svg(&out.scene, &svg_opts);
                black_box(svg.len());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_render_stress);
criterion_main!(benches);
