use hedit::color::interpolate;
use hedit::config::{DEFAULT_INCOMING, DEFAULT_PALETTE};
use hedit::{ColorStrategy, EdgeKey, Item, Mode, Point, Rgb, H};
use std::collections::HashSet;

/// a -> b, c -> (a -> b), d -> (c -> (a -> b)), a -> c
fn layered() -> (H, [EdgeKey; 4]) {
    let mut h = H::new();
    h.set_mode(Mode::H);
    let a = h.spawn(Point::new(0.0, 0.0), None).unwrap();
    let b = h.spawn(Point::new(10.0, 0.0), None).unwrap();
    let c = h.spawn(Point::new(0.0, 10.0), None).unwrap();
    let d = h.spawn(Point::new(10.0, 10.0), None).unwrap();
    let e1 = h.connect(a.into(), b.into()).unwrap();
    let e2 = h.connect(c.into(), e1.into()).unwrap();
    let e3 = h.connect(d.into(), e2.into()).unwrap();
    let e4 = h.connect(a.into(), c.into()).unwrap();
    (h, [e1, e2, e3, e4])
}

#[test]
fn levels_partition_edges_and_respect_dependencies() {
    let (mut h, [e1, e2, e3, e4]) = layered();
    let view = h.refresh().unwrap();
    assert_eq!(view.levels, vec![vec![e3, e4], vec![e2], vec![e1]]);

    let mut seen = HashSet::new();
    for wave in &view.levels {
        for k in wave {
            assert!(seen.insert(*k), "edge placed twice");
        }
    }
    assert_eq!(seen.len(), h.edge_count());

    for e in h.edges() {
        let w = view.wave_of[&e.key];
        for dep in e.dependencies() {
            assert!(view.wave_of[&dep] > w, "dependency must come later");
        }
    }
}

#[test]
fn depth_counts_nested_edge_endpoints() {
    let (mut h, [e1, e2, e3, e4]) = layered();
    let view = h.refresh().unwrap();
    assert_eq!(view.depth[&e1], 0);
    assert_eq!(view.depth[&e2], 1);
    assert_eq!(view.depth[&e3], 2);
    assert_eq!(view.depth[&e4], 0);
    assert_eq!(view.depth_range(), Some((0, 2)));
}

#[test]
fn index_maps_serialized_ids_to_items() {
    let (mut h, [e1, e2, ..]) = layered();
    let view = h.refresh().unwrap();
    assert_eq!(view.index.get("[0,1]"), Some(&Item::Edge(e1)));
    assert_eq!(view.index.get("[2,[0,1]]"), Some(&Item::Edge(e2)));
    assert_eq!(view.index.get("3"), Some(&Item::Node(hedit::NodeId(3))));
    assert_eq!(view.index.len(), h.node_count() + h.edge_count());
    assert_eq!(view.incoming_of(e1), &[e2]);
}

#[test]
fn level_banding_spans_the_palette() {
    let (mut h, [e1, e2, e3, e4]) = layered();
    let colors = h.colors(ColorStrategy::Level).unwrap();
    assert_eq!(colors[&Item::Edge(e3)], DEFAULT_PALETTE[0]);
    assert_eq!(colors[&Item::Edge(e4)], DEFAULT_PALETTE[0]);
    assert_eq!(colors[&Item::Edge(e2)], interpolate(&DEFAULT_PALETTE, 0.5));
    assert_eq!(colors[&Item::Edge(e1)], DEFAULT_PALETTE[15]);
}

#[test]
fn depth_banding_uses_normalized_depth() {
    let (mut h, [e1, e2, e3, _]) = layered();
    let colors = h.colors(ColorStrategy::Depth).unwrap();
    assert_eq!(colors[&Item::Edge(e1)], DEFAULT_PALETTE[0]);
    assert_eq!(colors[&Item::Edge(e2)], interpolate(&DEFAULT_PALETTE, 0.5));
    assert_eq!(colors[&Item::Edge(e3)], DEFAULT_PALETTE[15]);
}

#[test]
fn depth_banding_degenerates_to_first_color() {
    let mut h = H::new();
    let a = h.spawn(Point::new(0.0, 0.0), None).unwrap();
    let b = h.spawn(Point::new(1.0, 0.0), None).unwrap();
    let e = h.connect(a.into(), b.into()).unwrap();
    let f = h.connect(b.into(), a.into()).unwrap();
    let colors = h.colors(ColorStrategy::Depth).unwrap();
    assert_eq!(colors[&Item::Edge(e)], DEFAULT_PALETTE[0]);
    assert_eq!(colors[&Item::Edge(f)], DEFAULT_PALETTE[0]);
}

#[test]
fn incoming_weighted_colors() {
    let mut h = H::new();
    let a = h.spawn(Point::new(0.0, 0.0), None).unwrap();
    let b = h.spawn(Point::new(100.0, 0.0), None).unwrap();
    let t1 = h.spawn(Point::new(50.0, 50.0), None).unwrap();
    let t2 = h.spawn(Point::new(50.0, -50.0), None).unwrap();
    // a -> b points along +x (angle 0), b -> a along -x (angle pi)
    let forward = h.connect(a.into(), b.into()).unwrap();
    let backward = h.connect(b.into(), a.into()).unwrap();

    let colors = h.colors(ColorStrategy::Incoming).unwrap();
    assert_eq!(colors[&Item::Edge(forward)], DEFAULT_INCOMING[0]);
    assert_eq!(colors[&Item::Edge(backward)], DEFAULT_INCOMING[1]);

    h.select(&[t1.into()], false);
    h.recolor_selection(Some(Rgb(200, 10, 10)));
    h.select(&[t2.into()], false);
    h.recolor_selection(Some(Rgb(0, 10, 30)));
    h.connect(t1.into(), backward.into()).unwrap();
    h.connect(t2.into(), backward.into()).unwrap();
    h.connect(t1.into(), forward.into()).unwrap();

    let colors = h.colors(ColorStrategy::Incoming).unwrap();
    assert_eq!(colors[&Item::Edge(backward)], Rgb(101, 11, 21));
    assert_eq!(colors[&Item::Edge(forward)], Rgb(200, 10, 10));
}

#[test]
fn explicit_edge_color_wins_and_nodes_resolve_defaults() {
    let mut h = H::new();
    let a = h.spawn(Point::new(0.0, 0.0), None).unwrap();
    let b = h.spawn(Point::new(1.0, 0.0), None).unwrap();
    let e = h.connect(a.into(), b.into()).unwrap();
    h.select(&[e.into()], false);
    h.recolor_selection(Some(Rgb(1, 2, 3)));
    for strategy in [ColorStrategy::Incoming, ColorStrategy::Level, ColorStrategy::Depth] {
        assert_eq!(h.color_of(e.into(), strategy).unwrap(), Some(Rgb(1, 2, 3)));
    }
    assert_eq!(
        h.color_of(a.into(), ColorStrategy::Level).unwrap(),
        Some(h.config().node_color)
    );
}
