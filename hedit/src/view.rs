//! Derived data recomputed from scratch after structural changes.

use crate::error::{HError, HResult};
use crate::model::{EdgeKey, Item, StructuralId};
use crate::H;
use std::collections::HashMap;

/// Immutable snapshot of the data derived from an H's structure.
#[derive(Clone, Debug, Default)]
pub struct View {
    /// Serialized structural id -> item, for every node and edge.
    pub index: HashMap<String, Item>,
    pub ids: HashMap<Item, StructuralId>,
    /// Dependency waves. An edge is placed only after every edge that refers
    /// to it, so referring edges always sit in earlier waves.
    pub levels: Vec<Vec<EdgeKey>>,
    pub wave_of: HashMap<EdgeKey, usize>,
    /// 0 for an edge between nodes, else 1 + the deepest edge endpoint.
    pub depth: HashMap<EdgeKey, u32>,
    /// Edges whose dst is the keyed edge, in creation order.
    pub incoming: HashMap<EdgeKey, Vec<EdgeKey>>,
}

impl View {
    pub fn build(h: &H) -> HResult<View> {
        let levels = dependency_levels(h)?;

        let mut view = View {
            levels,
            ..View::default()
        };
        for n in h.nodes() {
            let id = StructuralId::Node(n.id.0);
            view.index.insert(id.to_string(), Item::Node(n.id));
            view.ids.insert(Item::Node(n.id), id);
        }
        for e in h.edges() {
            if let Item::Edge(d) = e.dst {
                view.incoming.entry(d).or_default().push(e.key);
            }
        }

        // Dependencies live in later waves, so walking the waves backwards
        // sees every endpoint before the edges built on it.
        for (w, wave) in view.levels.iter().enumerate().rev() {
            for &key in wave {
                let Some(e) = h.edge(key) else { continue };
                let (Some(src), Some(dst)) = (view.ids.get(&e.src), view.ids.get(&e.dst)) else {
                    return Err(HError::UnresolvedEdges(1));
                };
                let id = StructuralId::pair(src.clone(), dst.clone());
                let depth = e
                    .dependencies()
                    .filter_map(|d| view.depth.get(&d).map(|x| x + 1))
                    .max()
                    .unwrap_or(0);
                view.index.insert(id.to_string(), Item::Edge(key));
                view.ids.insert(Item::Edge(key), id);
                view.depth.insert(key, depth);
                view.wave_of.insert(key, w);
            }
        }
        Ok(view)
    }

    pub fn item(&self, id: &StructuralId) -> Option<Item> {
        self.index.get(&id.to_string()).copied()
    }

    pub fn id_of(&self, item: Item) -> Option<&StructuralId> {
        self.ids.get(&item)
    }

    pub fn incoming_of(&self, key: EdgeKey) -> &[EdgeKey] {
        self.incoming.get(&key).map_or(&[], Vec::as_slice)
    }

    pub fn depth_range(&self) -> Option<(u32, u32)> {
        let min = self.depth.values().min()?;
        let max = self.depth.values().max()?;
        Some((*min, *max))
    }
}

/// Partitions the edges into waves: repeatedly take every edge no remaining
/// edge refers to. A pass that places nothing means the remaining edges
/// refer to each other in a cycle.
pub fn dependency_levels(h: &H) -> HResult<Vec<Vec<EdgeKey>>> {
    let mut deps: HashMap<EdgeKey, Vec<EdgeKey>> = HashMap::new();
    let mut pending: HashMap<EdgeKey, usize> = HashMap::new();
    for e in h.edges() {
        pending.entry(e.key).or_insert(0);
        let ds: Vec<EdgeKey> = e.dependencies().collect();
        for d in &ds {
            *pending.entry(*d).or_insert(0) += 1;
        }
        deps.insert(e.key, ds);
    }

    let order: Vec<EdgeKey> = h.edges().map(|e| e.key).collect();
    let mut placed: HashMap<EdgeKey, bool> = order.iter().map(|k| (*k, false)).collect();
    let mut remaining = order.len();
    let mut levels = Vec::new();
    while remaining > 0 {
        let wave: Vec<EdgeKey> = order
            .iter()
            .copied()
            .filter(|k| !placed[k] && pending.get(k).copied().unwrap_or(0) == 0)
            .collect();
        if wave.is_empty() {
            return Err(HError::CyclicEdges(remaining));
        }
        for k in &wave {
            placed.insert(*k, true);
            for d in deps.get(k).into_iter().flatten() {
                if let Some(p) = pending.get_mut(d) {
                    *p = p.saturating_sub(1);
                }
            }
        }
        remaining -= wave.len();
        levels.push(wave);
    }
    Ok(levels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Edge, Node, NodeId, Point};

    #[test]
    fn mutually_referring_edges_are_reported() {
        let mut h = H::new();
        h.put_node(Node::new(Point::new(0.0, 0.0), "a", NodeId(0), None));
        h.put_edge(Edge::new(EdgeKey(0), Item::Node(NodeId(0)), Item::Edge(EdgeKey(1))));
        h.put_edge(Edge::new(EdgeKey(1), Item::Node(NodeId(0)), Item::Edge(EdgeKey(0))));
        h.put_edge(Edge::new(EdgeKey(2), Item::Node(NodeId(0)), Item::Node(NodeId(0))));
        assert!(matches!(dependency_levels(&h), Err(HError::CyclicEdges(2))));
        assert!(h.refresh().is_err());
        assert!(h.is_invalid());
    }

    #[test]
    fn cyclic_edges_have_no_structural_id() {
        let mut h = H::new();
        h.put_node(Node::new(Point::new(0.0, 0.0), "a", NodeId(0), None));
        h.put_node(Node::new(Point::new(4.0, 0.0), "b", NodeId(1), None));
        h.put_edge(Edge::new(EdgeKey(0), Item::Node(NodeId(0)), Item::Node(NodeId(1))));
        h.put_edge(Edge::new(EdgeKey(1), Item::Node(NodeId(0)), Item::Edge(EdgeKey(2))));
        h.put_edge(Edge::new(EdgeKey(2), Item::Node(NodeId(1)), Item::Edge(EdgeKey(1))));

        assert!(h.structural_id(Item::Edge(EdgeKey(0))).is_some());
        assert_eq!(h.structural_id(Item::Edge(EdgeKey(1))), None);
        assert_eq!(h.position_of(Item::Edge(EdgeKey(2))), None);
        assert!(!h.depends_on(Item::Edge(EdgeKey(0)), Item::Edge(EdgeKey(1))));
        assert!(h.depends_on(Item::Edge(EdgeKey(1)), Item::Edge(EdgeKey(2))));

        let doc = h.to_json_value();
        assert_eq!(doc["conn"].as_array().map(Vec::len), Some(1));
    }
}
