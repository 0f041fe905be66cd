use hedit::{EdgeKey, Item, Mode, NodeId, Point, H};

struct Fixture {
    h: H,
    a: NodeId,
    c: NodeId,
    /// a -> b
    e1: EdgeKey,
    /// c -> e1
    e2: EdgeKey,
    /// a -> e2, its dst is an edge whose own dst is an edge
    e3: EdgeKey,
}

fn fixture() -> Fixture {
    let mut h = H::new();
    h.set_mode(Mode::H);
    let a = h.spawn(Point::new(0.0, 0.0), None).unwrap();
    let b = h.spawn(Point::new(10.0, 0.0), None).unwrap();
    let c = h.spawn(Point::new(0.0, 10.0), None).unwrap();
    let e1 = h.connect(a.into(), b.into()).unwrap();
    let e2 = h.connect(c.into(), e1.into()).unwrap();
    let e3 = h.connect(a.into(), e2.into()).unwrap();
    Fixture { h, a, c, e1, e2, e3 }
}

#[test]
fn modes_are_ordered_and_named() {
    assert!(Mode::H < Mode::T);
    assert!(Mode::T < Mode::PropertyGraph);
    assert!(Mode::PropertyGraph < Mode::EdgeColoredGraph);
    assert!(Mode::EdgeColoredGraph < Mode::Graph);
    for m in Mode::ALL {
        assert_eq!(Mode::from_name(m.name()), Some(m));
    }
    assert_eq!(Mode::from_name("hypergraph"), None);
    assert_eq!(Mode::default(), Mode::T);
}

#[test]
fn tighten_and_loosen_clamp() {
    let mut h = H::new();
    assert_eq!(h.loosen(), Mode::H);
    assert_eq!(h.loosen(), Mode::H);
    for _ in 0..10 {
        h.tighten();
    }
    assert_eq!(h.mode(), Mode::Graph);
    assert_eq!(h.mode_name(), "graph");
}

#[test]
fn absent_endpoints_never_connect() {
    let f = fixture();
    assert!(!f.h.can_connect(None, Some(f.a.into())));
    assert!(!f.h.can_connect(Some(f.a.into()), None));
    assert!(!f.h.can_connect(Some(f.a.into()), Some(Item::Node(NodeId(42)))));
}

#[test]
fn only_h_lets_edges_originate_from_edges() {
    let mut f = fixture();
    assert!(f.h.can_connect(Some(f.e1.into()), Some(f.a.into())));
    f.h.set_mode(Mode::T);
    assert!(!f.h.can_connect(Some(f.e1.into()), Some(f.a.into())));
    assert!(f.h.can_connect(Some(f.a.into()), Some(f.e3.into())));
}

#[test]
fn graph_mode_rejects_edge_destinations() {
    let mut f = fixture();
    f.h.set_mode(Mode::Graph);
    assert!(!f.h.can_connect(Some(f.c.into()), Some(f.e1.into())));
    assert!(f.h.can_connect(Some(f.c.into()), Some(f.a.into())));
}

#[test]
fn edge_colored_graph_allows_one_property_edge() {
    let mut f = fixture();
    f.h.set_mode(Mode::EdgeColoredGraph);
    // e1 already carries e2
    assert!(!f.h.can_connect(Some(f.a.into()), Some(f.e1.into())));
    // e3 carries nothing, but its dst is itself an edge
    assert!(!f.h.can_connect(Some(f.c.into()), Some(f.e3.into())));

    let mut h = H::new();
    h.set_mode(Mode::EdgeColoredGraph);
    let a = h.spawn(Point::new(0.0, 0.0), None).unwrap();
    let b = h.spawn(Point::new(1.0, 0.0), None).unwrap();
    let t = h.spawn(Point::new(2.0, 0.0), None).unwrap();
    let e = h.connect(a.into(), b.into()).unwrap();
    assert!(h.connect(t.into(), e.into()).is_some());
    assert!(h.connect(a.into(), e.into()).is_none());
}

#[test]
fn property_modes_require_grounded_targets() {
    let mut f = fixture();
    f.h.set_mode(Mode::PropertyGraph);
    assert!(!f.h.can_connect(Some(f.c.into()), Some(f.e2.into())));
    assert!(f.h.can_connect(Some(f.c.into()), Some(f.e1.into())));
    f.h.set_mode(Mode::T);
    assert!(f.h.can_connect(Some(f.c.into()), Some(f.e2.into())));
}

#[test]
fn tightening_keeps_existing_edges() {
    let mut f = fixture();
    f.h.set_mode(Mode::Graph);
    assert_eq!(f.h.edge_count(), 3);
    assert!(f.h.refresh().is_ok());
}
