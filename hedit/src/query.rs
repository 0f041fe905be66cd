//! Read-only queries over a document, for tools that consume saved H files
//! as data rather than edit them.

use crate::error::{HError, HResult};
use crate::model::{Item, Node, NodeId, StructuralId};
use crate::{Mode, H};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::hash::Hash;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Follow edges from src to dst.
    Outgoing,
    /// Follow edges from dst back to src.
    Incoming,
    Either,
}

/// Which kind of neighbour to report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Returns {
    Nodes,
    Edges,
    Both,
}

/// Node classes of a tagged property graph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeTypes {
    /// Sources or sinks that only connect to nodes.
    pub endpoints: BTreeSet<NodeId>,
    /// Nodes without incoming edges that only point at edges.
    pub tags: BTreeSet<NodeId>,
    /// Everything else.
    pub items: BTreeSet<NodeId>,
}

impl H {
    fn require_mode(&self, op: &'static str, allowed: &[Mode]) -> HResult<()> {
        if allowed.contains(&self.mode) {
            return Ok(());
        }
        Err(HError::ModeNotAllowed {
            op,
            mode: self.mode.name(),
            allowed: allowed
                .iter()
                .map(|m| m.name())
                .collect::<Vec<_>>()
                .join(", "),
        })
    }

    pub fn find_nodes<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes().filter(move |n| n.name == name)
    }

    /// The single node called `name`, optionally restricted to `allowed` ids
    /// and excluding `disallowed` ones.
    pub fn node_id_by_name(
        &self,
        name: &str,
        allowed: Option<&[NodeId]>,
        disallowed: &[NodeId],
    ) -> HResult<NodeId> {
        let mut hits = self
            .find_nodes(name)
            .map(|n| n.id)
            .filter(|id| allowed.map_or(true, |a| a.contains(id)) && !disallowed.contains(id));
        let first = hits.next().ok_or_else(|| HError::NotFound(name.to_string()))?;
        if let Some(second) = hits.next() {
            return Err(HError::Ambiguous(format!(
                "{:?} matches node {} and node {}",
                name, first.0, second.0
            )));
        }
        Ok(first)
    }

    /// Neighbours of `item` along `direction`. With `via`, an edge only
    /// counts if every `via` item has an edge pointing at it.
    pub fn connected(
        &self,
        item: Item,
        via: &[Item],
        direction: Direction,
        returns: Returns,
    ) -> Vec<Item> {
        let (outgoing, incoming) = match direction {
            Direction::Outgoing => (true, false),
            Direction::Incoming => (false, true),
            Direction::Either => (true, true),
        };
        let mut out = Vec::new();
        for (wanted, forward) in [(incoming, false), (outgoing, true)] {
            if !wanted {
                continue;
            }
            for e in self.edges() {
                let (from, to) = if forward { (e.src, e.dst) } else { (e.dst, e.src) };
                if from != item {
                    continue;
                }
                let keep = match returns {
                    Returns::Both => true,
                    Returns::Nodes => !to.is_edge(),
                    Returns::Edges => to.is_edge(),
                };
                let this = Item::Edge(e.key);
                if keep && via.iter().all(|v| self.find_edge(*v, this).is_some()) {
                    out.push(to);
                }
            }
        }
        out
    }

    /// Generalized adjacency keyed by structural id, nodes first.
    pub fn adjacency(
        &self,
        omit_empty: bool,
        direction: Direction,
    ) -> Vec<(StructuralId, Vec<StructuralId>)> {
        let items = self
            .nodes()
            .map(|n| Item::Node(n.id))
            .chain(self.edges().map(|e| Item::Edge(e.key)));
        let mut out = Vec::new();
        for item in items {
            let nbs: Vec<StructuralId> = self
                .connected(item, &[], direction, Returns::Both)
                .into_iter()
                .filter_map(|i| self.structural_id(i))
                .collect();
            if omit_empty && nbs.is_empty() {
                continue;
            }
            if let Some(id) = self.structural_id(item) {
                out.push((id, nbs));
            }
        }
        out
    }

    /// Flattens every edge into the node sequence it spans, so that
    /// `0 -> (1 -> 2)` becomes `[0, 1, 2]`. With `remove_subsumed`, edges
    /// that other edges point at are left out.
    pub fn as_hypergraph(&self, remove_subsumed: bool) -> HResult<Vec<Vec<NodeId>>> {
        self.require_mode(
            "as_hypergraph",
            &[
                Mode::T,
                Mode::PropertyGraph,
                Mode::EdgeColoredGraph,
                Mode::Graph,
            ],
        )?;
        let mut out = Vec::new();
        for e in self.edges() {
            if remove_subsumed && self.has_incoming(e.key) {
                continue;
            }
            let mut seq = Vec::new();
            self.flatten_into(Item::Edge(e.key), &mut seq, self.edges.len());
            out.push(seq);
        }
        Ok(out)
    }

    fn flatten_into(&self, item: Item, seq: &mut Vec<NodeId>, budget: usize) {
        match item {
            Item::Node(id) => seq.push(id),
            Item::Edge(k) => {
                let (Some(budget), Some(e)) = (budget.checked_sub(1), self.edge(k)) else {
                    return;
                };
                self.flatten_into(e.src, seq, budget);
                self.flatten_into(e.dst, seq, budget);
            }
        }
    }

    /// Splits the nodes of a tagged property graph into endpoints, tags and
    /// items.
    pub fn split_node_types(&self) -> HResult<NodeTypes> {
        self.require_mode(
            "split_node_types",
            &[Mode::PropertyGraph, Mode::EdgeColoredGraph],
        )?;
        let none = |id: NodeId, d: Direction, r: Returns| {
            self.connected(Item::Node(id), &[], d, r).is_empty()
        };
        let mut types = NodeTypes::default();
        for n in self.nodes() {
            let id = n.id;
            let no_in = none(id, Direction::Incoming, Returns::Both);
            let no_out = none(id, Direction::Outgoing, Returns::Both);
            let only_to_nodes = none(id, Direction::Outgoing, Returns::Edges);
            let only_to_edges = none(id, Direction::Outgoing, Returns::Nodes);
            if (no_in || no_out) && only_to_nodes {
                types.endpoints.insert(id);
            } else if no_in && only_to_edges {
                types.tags.insert(id);
            } else {
                types.items.insert(id);
            }
        }
        Ok(types)
    }
}

/// First `a` with a pair `(a, a)`.
pub fn maybe_self_loop<T: PartialEq + Clone>(pairs: &[(T, T)]) -> Option<T> {
    pairs.iter().find(|(a, b)| a == b).map(|(a, _)| a.clone())
}

/// A value repeated among the sources (`Incoming`) or destinations
/// (`Outgoing`) of `pairs`.
pub fn maybe_duplicate<T: Eq + Hash + Clone>(pairs: &[(T, T)], direction: Direction) -> Option<T> {
    match direction {
        Direction::Either => maybe_duplicate(pairs, Direction::Incoming)
            .or_else(|| maybe_duplicate(pairs, Direction::Outgoing)),
        d => {
            let mut seen = HashSet::new();
            pairs
                .iter()
                .map(|p| side(p, d))
                .find(|v| !seen.insert(*v))
                .cloned()
        }
    }
}

/// The sole source (`Incoming`) or destination (`Outgoing`) of `pairs`.
pub fn maybe_single<T: PartialEq + Clone>(pairs: &[(T, T)], direction: Direction) -> Option<T> {
    match direction {
        Direction::Either => maybe_single(pairs, Direction::Incoming)
            .or_else(|| maybe_single(pairs, Direction::Outgoing)),
        d => {
            let mut it = pairs.iter().map(|p| side(p, d));
            let first = it.next()?;
            it.all(|v| v == first).then(|| first.clone())
        }
    }
}

fn side<T>(pair: &(T, T), direction: Direction) -> &T {
    match direction {
        Direction::Outgoing => &pair.1,
        _ => &pair.0,
    }
}

/// The first pair, in order, that closes a cycle.
pub fn maybe_cycle_elem<T: Eq + Hash + Clone>(pairs: &[(T, T)]) -> Option<(T, T)> {
    let mut reachable: HashMap<T, HashSet<T>> = HashMap::new();
    for (s, d) in pairs {
        reachable.entry(s.clone()).or_default().insert(d.clone());
        let from_d = reachable.get(d).cloned().unwrap_or_default();
        let keys: Vec<T> = reachable.keys().cloned().collect();
        for a in keys {
            let Some(bs) = reachable.get_mut(&a) else { continue };
            if a != *s && !bs.contains(s) {
                continue;
            }
            if a == *d || from_d.contains(&a) {
                return Some((s.clone(), d.clone()));
            }
            bs.insert(d.clone());
            bs.extend(from_d.iter().cloned());
        }
    }
    None
}
