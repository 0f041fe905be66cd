//! Mutators. Each one builds a single [`Op`] and runs it through the command
//! engine; a request that does not apply returns `false` and changes
//! nothing.

use crate::command::Op;
use crate::model::{Color, Edge, EdgeKey, Item, Node, NodeId, Point, Rgb};
use crate::H;
use std::collections::HashSet;

impl H {
    /// Spawns a node at `pos`. Without a name it is called `<prefix><id>`.
    /// Non-finite positions are refused.
    pub fn spawn(&mut self, pos: Point, name: Option<&str>) -> Option<NodeId> {
        if !pos.is_finite() {
            return None;
        }
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        let name = match name {
            Some(n) => n.to_string(),
            None => format!("{}{}", self.config.node_name_prefix, id.0),
        };
        self.exec(
            Op::Spawn(Node::new(pos, name, id, None)),
            format!("spawn node {}", id.0),
            true,
        )
        .then_some(id)
    }

    fn alloc_edge(&mut self, src: Item, dst: Item) -> Edge {
        let key = EdgeKey(self.next_edge_key);
        self.next_edge_key += 1;
        Edge::new(key, src, dst)
    }

    /// Builds the admissible subset of `pairs` as new edges, skipping
    /// duplicates of existing edges and of each other.
    fn plan_edges(&mut self, pairs: impl IntoIterator<Item = (Item, Item)>) -> Vec<Edge> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for (src, dst) in pairs {
            if !self.can_connect(Some(src), Some(dst)) {
                continue;
            }
            if self.find_edge(src, dst).is_some() || !seen.insert((src, dst)) {
                continue;
            }
            out.push(self.alloc_edge(src, dst));
        }
        out
    }

    /// Connects `src -> dst` if the mode allows it and no equal edge exists.
    pub fn connect(&mut self, src: Item, dst: Item) -> Option<EdgeKey> {
        let edges = self.plan_edges([(src, dst)]);
        let key = edges.first()?.key;
        self.exec(Op::Connect(edges), "connect", true).then_some(key)
    }

    /// Connects every selected item to `target`, as one command.
    pub fn connect_selection(&mut self, target: Item) -> Vec<EdgeKey> {
        let sources = self.selection.clone();
        self.connect_many(sources.into_iter().map(|s| (s, target)), "connect selection")
    }

    /// Connects `tag` to every selected item, as one command.
    pub fn tag_selection(&mut self, tag: Item) -> Vec<EdgeKey> {
        let targets = self.selection.clone();
        self.connect_many(targets.into_iter().map(|t| (tag, t)), "tag selection")
    }

    pub(crate) fn connect_many(
        &mut self,
        pairs: impl IntoIterator<Item = (Item, Item)>,
        description: &str,
    ) -> Vec<EdgeKey> {
        let edges = self.plan_edges(pairs);
        if edges.is_empty() {
            return Vec::new();
        }
        let keys: Vec<EdgeKey> = edges.iter().map(|e| e.key).collect();
        let description = format!("{} ({} edges)", description, keys.len());
        if !self.exec(Op::Connect(edges), description, true) {
            return Vec::new();
        }
        keys
    }

    /// Spawns a node at `pos` and connects it to each of `targets`, as one
    /// command. Nothing happens unless at least one edge is admissible.
    pub(crate) fn spawn_tag(&mut self, pos: Point, targets: &[Item]) -> Option<NodeId> {
        if !pos.is_finite() {
            return None;
        }
        let admissible: Vec<Item> = targets
            .iter()
            .copied()
            .filter(|t| self.contains(*t) && self.admits(false, *t))
            .collect();
        if admissible.is_empty() {
            return None;
        }
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        let name = format!("{}{}", self.config.node_name_prefix, id.0);
        let mut seen = HashSet::new();
        let mut edges = Vec::new();
        for t in admissible {
            if seen.insert(t) {
                edges.push(self.alloc_edge(Item::Node(id), t));
            }
        }
        let n = edges.len();
        self.exec(
            Op::Batch(vec![
                Op::Spawn(Node::new(pos, name, id, None)),
                Op::Connect(edges),
            ]),
            format!("tag with new node {} ({} edges)", id.0, n),
            true,
        )
        .then_some(id)
    }

    /// Points `edge` at a new dst. Refused if the mode disallows the new
    /// edge, if an equal edge exists, or if `target` depends on `edge`.
    pub fn replace_dst(&mut self, edge: EdgeKey, target: Item) -> bool {
        self.replace_many(&[edge], target) > 0
    }

    pub(crate) fn replace_many(&mut self, edges: &[EdgeKey], target: Item) -> usize {
        let mut changes = Vec::new();
        let mut taken = HashSet::new();
        for &key in edges {
            let Some(e) = self.edge(key) else { continue };
            let (src, old) = (e.src, e.dst);
            if old == target || !self.can_connect(Some(src), Some(target)) {
                continue;
            }
            if self.depends_on(target, Item::Edge(key)) {
                continue;
            }
            if self.find_edge(src, target).is_some() || !taken.insert(src) {
                continue;
            }
            changes.push((key, old, target));
        }
        let n = changes.len();
        if n == 0 {
            return 0;
        }
        let description = format!("replace dst of {} edges", n);
        if !self.exec(Op::Rewire(changes), description, true) {
            return 0;
        }
        n
    }

    /// Deletes the selection together with every edge that transitively
    /// touches it.
    pub fn delete_selection(&mut self) -> bool {
        let doomed = self.cascade(self.selection.iter().copied());
        if doomed.is_empty() {
            return false;
        }
        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        for n in self.nodes() {
            if doomed.contains(&Item::Node(n.id)) {
                nodes.push(n.clone());
            }
        }
        for e in self.edges() {
            if doomed.contains(&Item::Edge(e.key)) {
                edges.push(e.clone());
            }
        }
        let description = format!("delete {} nodes, {} edges", nodes.len(), edges.len());
        let selection = self.selection.clone();
        self.exec(
            Op::Remove {
                nodes,
                edges,
                selection,
            },
            description,
            true,
        )
    }

    /// `roots` plus all edges reaching any of them, to a fixpoint.
    pub(crate) fn cascade(&self, roots: impl IntoIterator<Item = Item>) -> HashSet<Item> {
        let mut doomed: HashSet<Item> = roots.into_iter().filter(|i| self.contains(*i)).collect();
        loop {
            let before = doomed.len();
            for e in self.edges() {
                if doomed.contains(&e.src) || doomed.contains(&e.dst) {
                    doomed.insert(Item::Edge(e.key));
                }
            }
            if doomed.len() == before {
                return doomed;
            }
        }
    }

    /// Renames every selected node.
    pub fn rename_selection(&mut self, name: &str) -> bool {
        let changes: Vec<_> = self
            .selected_nodes()
            .filter_map(|id| self.node(id))
            .filter(|n| n.name != name)
            .map(|n| (n.id, n.name.clone(), name.to_string()))
            .collect();
        if changes.is_empty() {
            return false;
        }
        self.exec(Op::Rename(changes), format!("rename to {:?}", name), false)
    }

    /// Sets the stored color of every selected item; `None` restores the
    /// default sentinel.
    pub fn recolor_selection(&mut self, color: Option<Rgb>) -> bool {
        let color = Color::from(color);
        let changes: Vec<_> = self
            .selection
            .iter()
            .filter_map(|&item| {
                let old = match item {
                    Item::Node(id) => self.node(id)?.color,
                    Item::Edge(key) => self.edge(key)?.color,
                };
                (old != color).then_some((item, old, color))
            })
            .collect();
        if changes.is_empty() {
            return false;
        }
        self.exec(Op::Recolor(changes), "recolor", false)
    }

    /// Translates every selected node.
    pub fn move_selection(&mut self, dx: f64, dy: f64) -> bool {
        let nodes: Vec<NodeId> = self.selected_nodes().collect();
        self.move_nodes(&nodes, dx, dy)
    }

    pub(crate) fn move_nodes(&mut self, ids: &[NodeId], dx: f64, dy: f64) -> bool {
        if !dx.is_finite() || !dy.is_finite() || (dx == 0.0 && dy == 0.0) {
            return false;
        }
        let changes: Vec<_> = ids
            .iter()
            .filter_map(|&id| self.node(id))
            .map(|n| (n.id, n.pos, Point::new(n.pos.x + dx, n.pos.y + dy)))
            .collect();
        if changes.is_empty() {
            return false;
        }
        self.exec(
            Op::Move(changes),
            format!("move by ({}, {})", dx, dy),
            false,
        )
    }

    /// Selects `items`. Additive selection appends (re-selecting an item
    /// makes it the most recent); otherwise the selection is replaced.
    pub fn select(&mut self, items: &[Item], additive: bool) -> bool {
        let mut after = if additive {
            self.selection.clone()
        } else {
            Vec::new()
        };
        for &item in items {
            if !self.contains(item) {
                continue;
            }
            after.retain(|i| *i != item);
            after.push(item);
        }
        self.set_selection(after)
    }

    pub fn deselect(&mut self, items: &[Item]) -> bool {
        let after = self
            .selection
            .iter()
            .copied()
            .filter(|i| !items.contains(i))
            .collect();
        self.set_selection(after)
    }

    pub fn deselect_all(&mut self) -> bool {
        self.set_selection(Vec::new())
    }

    fn set_selection(&mut self, after: Vec<Item>) -> bool {
        if after == self.selection {
            return false;
        }
        let n = after.len();
        let before = self.selection.clone();
        self.exec(
            Op::Select { before, after },
            format!("select {} items", n),
            false,
        )
    }
}
