use crate::*;

#[test]
fn flags_unreachable_and_dead_end_states() {
    let g = Graph::new("A")
        .node(Node::new("A", "start"))
        .node(Node::new("B", "middle"))
        .node(Node::new("C", "orphan"))
        .node(Node::new("D", "dead end"))
        .node(Node::new("END", "END"))
        .link("A", "B")
        .link("B", "END")
        .link("A", "D")
        .link("C", "B");

    let g = g.with_reachability(&VizConfig::default()).unwrap();
    let flags: Vec<_> = g
        .nodes
        .iter()
        .map(|n| (n.id.as_str(), n.reachable, n.reachable_from_end))
        .collect();
    assert_eq!(
        flags,
        vec![
            ("A", Some(true), Some(true)),
            ("B", Some(true), Some(true)),
            ("C", Some(false), Some(true)),
            ("D", Some(true), Some(false)),
            ("END", Some(true), Some(true)),
        ]
    );
}

#[test]
fn no_terminal_leaves_reachable_from_end_absent() {
    let g = Graph::new("A")
        .node(Node::new("A", "start"))
        .node(Node::new("B", "loop"))
        .link("A", "B")
        .link("B", "B");
    let cfg = VizConfig::default();
    let resolved = g.validate(&cfg).unwrap();
    let r = compute_reachability(&resolved);
    assert_eq!(r.reachable, vec![true, true]);
    assert_eq!(r.reachable_from_end, None);
}

#[test]
fn dangling_links_are_rejected_before_flood_fill() {
    let g = Graph::new("A").node(Node::new("A", "start")).link("A", "X");
    assert!(g.with_reachability(&VizConfig::default()).is_err());
}

#[test]
fn without_terminal_supplied_from_end_flags_survive() {
    let g = Graph::new("A")
        .node(Node::new("A", "start").with_reachability(Some(false), Some(false)))
        .node(Node::new("B", "loop"))
        .link("A", "B");

    let g = g.with_reachability(&VizConfig::default()).unwrap();
    assert_eq!(g.nodes[0].reachable, Some(true));
    assert_eq!(g.nodes[0].reachable_from_end, Some(false));
    assert_eq!(g.nodes[1].reachable, Some(true));
    assert_eq!(g.nodes[1].reachable_from_end, None);
}
