use hedit::query::{maybe_cycle_elem, maybe_duplicate, maybe_self_loop, maybe_single};
use hedit::{Direction, HError, Item, Mode, NodeId, Point, Returns, StructuralId, H};

struct Tagged {
    h: H,
    a: NodeId,
    b: NodeId,
    c: NodeId,
    t: NodeId,
    /// a -> b, tagged by t
    e1: hedit::EdgeKey,
}

fn tagged() -> Tagged {
    let mut h = H::new();
    let a = h.spawn(Point::new(0.0, 0.0), Some("a")).unwrap();
    let b = h.spawn(Point::new(10.0, 0.0), Some("b")).unwrap();
    let c = h.spawn(Point::new(0.0, 10.0), Some("c")).unwrap();
    let t = h.spawn(Point::new(5.0, 5.0), Some("t")).unwrap();
    let e1 = h.connect(a.into(), b.into()).unwrap();
    h.connect(t.into(), e1.into()).unwrap();
    h.connect(a.into(), c.into()).unwrap();
    Tagged { h, a, b, c, t, e1 }
}

#[test]
fn connected_follows_direction_and_kind() {
    let f = tagged();
    let h = &f.h;
    assert_eq!(
        h.connected(f.a.into(), &[], Direction::Outgoing, Returns::Nodes),
        vec![Item::Node(f.b), Item::Node(f.c)]
    );
    assert!(h
        .connected(f.a.into(), &[], Direction::Outgoing, Returns::Edges)
        .is_empty());
    assert_eq!(
        h.connected(f.t.into(), &[], Direction::Outgoing, Returns::Edges),
        vec![Item::Edge(f.e1)]
    );
    assert_eq!(
        h.connected(f.b.into(), &[], Direction::Either, Returns::Both),
        vec![Item::Node(f.a)]
    );
    assert_eq!(
        h.connected(f.e1.into(), &[], Direction::Incoming, Returns::Both),
        vec![Item::Node(f.t)]
    );
}

#[test]
fn connected_via_requires_a_tag_on_the_edge() {
    let f = tagged();
    assert_eq!(
        f.h.connected(f.a.into(), &[f.t.into()], Direction::Outgoing, Returns::Both),
        vec![Item::Node(f.b)]
    );
    assert!(f
        .h
        .connected(f.a.into(), &[f.c.into()], Direction::Outgoing, Returns::Both)
        .is_empty());
}

#[test]
fn adjacency_lists_nodes_then_edges() {
    let f = tagged();
    let adj = f.h.adjacency(true, Direction::Outgoing);
    assert_eq!(
        adj,
        vec![
            (
                StructuralId::Node(0),
                vec![StructuralId::Node(1), StructuralId::Node(2)]
            ),
            (
                StructuralId::Node(3),
                vec![StructuralId::pair(StructuralId::Node(0), StructuralId::Node(1))]
            ),
        ]
    );
    let full = f.h.adjacency(false, Direction::Outgoing);
    assert_eq!(full.len(), f.h.node_count() + f.h.edge_count());
}

#[test]
fn hypergraph_flattens_nested_edges() {
    let mut f = tagged();
    let ids = |v: &[u32]| v.iter().map(|i| NodeId(*i)).collect::<Vec<_>>();
    assert_eq!(
        f.h.as_hypergraph(false).unwrap(),
        vec![ids(&[0, 1]), ids(&[3, 0, 1]), ids(&[0, 2])]
    );
    assert_eq!(
        f.h.as_hypergraph(true).unwrap(),
        vec![ids(&[3, 0, 1]), ids(&[0, 2])]
    );

    f.h.set_mode(Mode::H);
    let err = f.h.as_hypergraph(false).unwrap_err();
    assert!(matches!(err, HError::ModeNotAllowed { mode: "H", .. }));
    assert_eq!(err.code(), "mode_not_allowed");
}

#[test]
fn node_types_of_a_property_graph() {
    let mut f = tagged();
    let i = f.h.spawn(Point::new(20.0, 20.0), Some("i")).unwrap();
    f.h.connect(f.a.into(), i.into()).unwrap();
    f.h.connect(i.into(), f.b.into()).unwrap();

    assert!(f.h.split_node_types().is_err(), "T mode is not a property graph");
    f.h.set_mode(Mode::PropertyGraph);
    let types = f.h.split_node_types().unwrap();
    assert_eq!(types.endpoints.into_iter().collect::<Vec<_>>(), vec![f.a, f.b, f.c]);
    assert_eq!(types.tags.into_iter().collect::<Vec<_>>(), vec![f.t]);
    assert_eq!(types.items.into_iter().collect::<Vec<_>>(), vec![i]);
}

#[test]
fn node_lookup_by_name() {
    let mut h = H::new();
    let x = h.spawn(Point::new(0.0, 0.0), Some("dup")).unwrap();
    let y = h.spawn(Point::new(1.0, 0.0), Some("dup")).unwrap();
    let z = h.spawn(Point::new(2.0, 0.0), Some("solo")).unwrap();

    assert_eq!(h.find_nodes("dup").count(), 2);
    assert_eq!(h.node_id_by_name("solo", None, &[]).unwrap(), z);
    let err = h.node_id_by_name("dup", None, &[]).unwrap_err();
    assert_eq!(err.code(), "ambiguous");
    assert_eq!(h.node_id_by_name("dup", Some(&[y]), &[]).unwrap(), y);
    assert_eq!(h.node_id_by_name("dup", None, &[y]).unwrap(), x);
    assert!(matches!(
        h.node_id_by_name("missing", None, &[]),
        Err(HError::NotFound(_))
    ));
}

#[test]
fn pair_list_helpers() {
    let pairs = [(0, 1), (1, 2), (2, 0)];
    assert_eq!(maybe_self_loop(&pairs), None);
    assert_eq!(maybe_self_loop(&[(0, 1), (4, 4)]), Some(4));

    assert_eq!(maybe_duplicate(&pairs, Direction::Either), None);
    assert_eq!(maybe_duplicate(&[(0, 1), (0, 2)], Direction::Incoming), Some(0));
    assert_eq!(maybe_duplicate(&[(0, 1), (0, 2)], Direction::Outgoing), None);
    assert_eq!(maybe_duplicate(&[(0, 2), (1, 2)], Direction::Either), Some(2));

    assert_eq!(maybe_single(&[(5, 1), (5, 2)], Direction::Incoming), Some(5));
    assert_eq!(maybe_single(&[(5, 1), (6, 1)], Direction::Outgoing), Some(1));
    assert_eq!(maybe_single(&pairs, Direction::Either), None);
    assert_eq!(maybe_single::<u32>(&[], Direction::Incoming), None);

    assert_eq!(maybe_cycle_elem(&pairs), Some((2, 0)));
    assert_eq!(maybe_cycle_elem(&[(0, 1), (1, 2), (0, 2)]), None);
    assert_eq!(maybe_cycle_elem(&[(3, 3)]), Some((3, 3)));
    assert_eq!(
        maybe_cycle_elem(&[(1, 2), (0, 1), (2, 5), (5, 0)]),
        Some((5, 0))
    );
}
