use crate::*;
use serde_json::json;

fn sample() -> Graph {
    Graph::new("A")
        .node(Node::new("A", "Introduction"))
        .node(Node::new("B", "Second"))
        .node(Node::new("END", "END"))
        .link("A", "B")
        .link("B", "END")
        .link("B", "B")
}

#[test]
fn validate_resolves_links_to_indices() {
    let g = sample();
    let cfg = VizConfig::default();
    let r = g.validate(&cfg).unwrap();

    assert_eq!(r.links().len(), 3);
    assert_eq!(r.links()[0], ResolvedLink { source: 0, target: 1 });
    assert!(r.links()[2].is_self_loop());
    assert_eq!(r.init_index(), Some(0));
    assert_eq!(r.terminal_index(), Some(2));
    assert!(r.is_initial(0));
    assert!(r.is_terminal(2));
    assert_eq!(r.outgoing(1).collect::<Vec<_>>(), vec![2, 1]);
    assert_eq!(r.incoming(1).collect::<Vec<_>>(), vec![0, 1]);
}

#[test]
fn validate_rejects_dangling_link_target() {
    let g = sample().link("A", "missing");
    let err = g.validate(&VizConfig::default()).unwrap_err();
    match err {
        Error::InvalidGraph {
            link_index,
            endpoint,
            node_id,
        } => {
            assert_eq!(link_index, 3);
            assert_eq!(endpoint, LinkEndpoint::Target);
            assert_eq!(node_id, "missing");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn validate_rejects_dangling_link_source() {
    let g = Graph::new("A")
        .node(Node::new("A", "a"))
        .link("ghost", "A");
    let err = g.validate(&VizConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidGraph {
            endpoint: LinkEndpoint::Source,
            ..
        }
    ));
    assert_eq!(
        err.to_string(),
        "invalid graph: link #0 has unknown source `ghost`"
    );
}

#[test]
fn validate_rejects_duplicate_ids_and_unknown_initial_state() {
    let g = Graph::new("A")
        .node(Node::new("A", "a"))
        .node(Node::new("A", "again"));
    assert!(matches!(
        g.validate(&VizConfig::default()),
        Err(Error::DuplicateNode { .. })
    ));

    let g = Graph::new("Z").node(Node::new("A", "a"));
    assert!(matches!(
        g.validate(&VizConfig::default()),
        Err(Error::UnknownInitialState { .. })
    ));
}

#[test]
fn validate_rejects_bad_positions() {
    let g = Graph::new("A").node(Node::new("A", "a").at(-1.0, 4.0));
    assert!(matches!(
        g.validate(&VizConfig::default()),
        Err(Error::InvalidPosition { .. })
    ));

    let mut half = Node::new("A", "a");
    half.x0 = Some(10.0);
    let g = Graph::new("A").node(half);
    assert!(matches!(
        g.validate(&VizConfig::default()),
        Err(Error::InvalidPosition { .. })
    ));
}

#[test]
fn empty_graph_is_valid() {
    let g = Graph::default();
    let r = g.validate(&VizConfig::default()).unwrap();
    assert!(r.is_empty());
    assert_eq!(r.init_index(), None);
}

#[test]
fn graph_deserializes_from_camel_case_json() {
    let g: Graph = serde_json::from_value(json!({
        "nodes": [
            {"id": "a", "hashId": "A", "name": "First", "reachable": false, "x0": 10, "y0": 20},
            {"id": "b", "hashId": "B", "name": "Second", "reachableFromEnd": true}
        ],
        "links": [{"source": "a", "target": "b"}],
        "initStateId": "A"
    }))
    .unwrap();

    assert_eq!(g.nodes[0].reachable, Some(false));
    assert_eq!(g.nodes[0].x0, Some(10.0));
    assert_eq!(g.nodes[1].reachable, None);
    assert_eq!(g.nodes[1].reachable_from_end, Some(true));
    let r = g.validate(&VizConfig::default()).unwrap();
    assert_eq!(r.node_by_hash_id("B").map(|n| n.id.as_str()), Some("b"));
}

#[test]
fn tooltip_prefers_unreachable_warning() {
    let n = Node::new("A", "Intro").with_reachability(Some(false), Some(false));
    assert_eq!(n.tooltip(), "Intro (Warning: this state is unreachable.)");

    let n = Node::new("A", "Intro").with_reachability(None, Some(false));
    assert_eq!(
        n.tooltip(),
        "Intro (Warning: there is no path from this state to the END state.)"
    );

    let n = Node::new("A", "Intro").with_reachability(Some(true), None);
    assert_eq!(n.tooltip(), "Intro");
    assert!(!n.has_reachability_warning());
}
