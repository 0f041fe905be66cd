use crate::model::{Color, Edge, EdgeKey, Item, Node, NodeId, Point};
use crate::H;

/// A reversible change, applied forward by `apply` and backward by `revert`.
///
/// Every variant carries both the old and the new state it touches. `apply`
/// re-reads the old state each time it runs, so a redo replayed onto a
/// document that changed since the undo still reverts exactly.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Op {
    Spawn(Node),
    Connect(Vec<Edge>),
    /// Removed items keep their slots; `selection` is the selection before.
    /// Re-running it removes whatever now cascades from the same roots.
    Remove {
        nodes: Vec<Node>,
        edges: Vec<Edge>,
        selection: Vec<Item>,
    },
    Rename(Vec<(NodeId, String, String)>),
    Recolor(Vec<(Item, Color, Color)>),
    Move(Vec<(NodeId, Point, Point)>),
    /// Edge, old dst, new dst.
    Rewire(Vec<(EdgeKey, Item, Item)>),
    Select {
        before: Vec<Item>,
        after: Vec<Item>,
    },
    Batch(Vec<Op>),
}

impl Op {
    /// Runs the op forward if it still fits the document, recording the
    /// state it replaces. Leaves `h` untouched and returns false otherwise.
    pub(crate) fn apply(&mut self, h: &mut H) -> bool {
        match self {
            Op::Spawn(node) => {
                if h.node(node.id).is_some() {
                    return false;
                }
                h.put_node(node.clone());
            }
            Op::Connect(edges) => {
                let fits = edges.iter().all(|e| {
                    h.edge(e.key).is_none()
                        && h.contains(e.src)
                        && h.contains(e.dst)
                        && h.find_edge(e.src, e.dst).is_none()
                });
                if !fits {
                    return false;
                }
                for e in edges.iter() {
                    h.put_edge(e.clone());
                }
            }
            Op::Remove {
                nodes,
                edges,
                selection,
            } => {
                let roots: Vec<Item> = nodes
                    .iter()
                    .map(|n| Item::Node(n.id))
                    .chain(edges.iter().map(|e| Item::Edge(e.key)))
                    .filter(|i| h.contains(*i))
                    .collect();
                if roots.is_empty() {
                    return false;
                }
                // edges added since the snapshot may hang off the roots too
                let doomed = h.cascade(roots);
                *nodes = h
                    .nodes()
                    .filter(|n| doomed.contains(&Item::Node(n.id)))
                    .cloned()
                    .collect();
                *edges = h
                    .edges()
                    .filter(|e| doomed.contains(&Item::Edge(e.key)))
                    .cloned()
                    .collect();
                *selection = h.selection.clone();
                for e in edges.iter() {
                    h.take_edge(e.key);
                }
                for n in nodes.iter() {
                    h.take_node(n.id);
                }
                h.selection.retain(|i| !doomed.contains(i));
            }
            Op::Rename(changes) => {
                if !changes.iter().all(|(id, ..)| h.node(*id).is_some()) {
                    return false;
                }
                for (id, old, new) in changes.iter_mut() {
                    if let Some(n) = h.node_mut(*id) {
                        *old = std::mem::replace(&mut n.name, new.clone());
                    }
                }
            }
            Op::Recolor(changes) => {
                if !changes.iter().all(|(item, ..)| h.contains(*item)) {
                    return false;
                }
                for (item, old, new) in changes.iter_mut() {
                    if let Some(prev) = h.set_color(*item, *new) {
                        *old = prev;
                    }
                }
            }
            Op::Move(changes) => {
                if !changes.iter().all(|(id, ..)| h.node(*id).is_some()) {
                    return false;
                }
                for (id, old, new) in changes.iter_mut() {
                    if let Some(n) = h.node_mut(*id) {
                        *old = std::mem::replace(&mut n.pos, *new);
                    }
                }
            }
            Op::Rewire(changes) => {
                let fits = changes.iter().all(|(key, _, new)| match h.edge(*key) {
                    Some(e) => {
                        e.dst != *new
                            && h.contains(*new)
                            && !h.depends_on(*new, Item::Edge(*key))
                            && h.find_edge(e.src, *new).is_none()
                    }
                    None => false,
                });
                if !fits {
                    return false;
                }
                for (key, old, new) in changes.iter_mut() {
                    if let Some(e) = h.edge_mut(*key) {
                        *old = std::mem::replace(&mut e.dst, *new);
                    }
                }
            }
            Op::Select { before, after } => {
                if !after.iter().all(|i| h.contains(*i)) {
                    return false;
                }
                *before = std::mem::replace(&mut h.selection, after.clone());
            }
            Op::Batch(ops) => {
                for i in 0..ops.len() {
                    if !ops[i].apply(h) {
                        for op in ops[..i].iter().rev() {
                            op.revert(h);
                        }
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Exact inverse of the last successful `apply`.
    pub(crate) fn revert(&self, h: &mut H) {
        match self {
            Op::Spawn(node) => {
                h.take_node(node.id);
                h.selection.retain(|i| *i != Item::Node(node.id));
            }
            Op::Connect(edges) => {
                for e in edges.iter().rev() {
                    h.take_edge(e.key);
                    h.selection.retain(|i| *i != Item::Edge(e.key));
                }
            }
            Op::Remove {
                nodes,
                edges,
                selection,
            } => {
                for n in nodes {
                    h.put_node(n.clone());
                }
                for e in edges {
                    h.put_edge(e.clone());
                }
                h.selection = selection.clone();
            }
            Op::Rename(changes) => {
                for (id, old, _) in changes {
                    if let Some(n) = h.node_mut(*id) {
                        n.name = old.clone();
                    }
                }
            }
            Op::Recolor(changes) => {
                for (item, old, _) in changes.iter().rev() {
                    h.set_color(*item, *old);
                }
            }
            Op::Move(changes) => {
                for (id, old, _) in changes.iter().rev() {
                    if let Some(n) = h.node_mut(*id) {
                        n.pos = *old;
                    }
                }
            }
            Op::Rewire(changes) => {
                for (key, old, _) in changes.iter().rev() {
                    if let Some(e) = h.edge_mut(*key) {
                        e.dst = *old;
                    }
                }
            }
            Op::Select { before, .. } => {
                h.selection = before.clone();
            }
            Op::Batch(ops) => {
                for op in ops.iter().rev() {
                    op.revert(h);
                }
            }
        }
    }
}

/// One entry of the undo (`history`) or redo (`buffer`) stack.
#[derive(Clone, Debug)]
pub struct Command {
    pub(crate) op: Op,
    description: String,
    invalidates: bool,
}

impl Command {
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether running this command changes the derived view.
    pub fn invalidates(&self) -> bool {
        self.invalidates
    }
}

impl H {
    /// Runs `op` forward, records it on `history`, and marks the derived view
    /// stale if `invalidates` is set. Returns false, recording nothing, if
    /// the op does not fit the document.
    ///
    /// The redo buffer is left as it is: redoing after a fresh command can
    /// replay a future that was undone before it.
    pub(crate) fn exec(
        &mut self,
        mut op: Op,
        description: impl Into<String>,
        invalidates: bool,
    ) -> bool {
        let description = description.into();
        if !op.apply(self) {
            tracing::debug!(command = %description, "command refused");
            return false;
        }
        let cmd = Command {
            op,
            description,
            invalidates,
        };
        if invalidates {
            self.invalid = true;
        }
        tracing::debug!(
            command = %cmd.description,
            history = self.history.len() + 1,
            buffer = self.buffer.len(),
            "exec"
        );
        self.history.push(cmd);
        true
    }

    /// Reverts the most recent command. Returns false if there is none.
    pub fn undo(&mut self) -> bool {
        let Some(cmd) = self.history.pop() else {
            return false;
        };
        cmd.op.revert(self);
        if cmd.invalidates {
            self.invalid = true;
        }
        tracing::debug!(command = %cmd.description, "undo");
        self.buffer.push(cmd);
        true
    }

    /// Re-applies the most recently undone command. Returns false if there
    /// is none, or if commands executed since the undo left it no longer
    /// applicable; such a command is dropped from the buffer.
    pub fn redo(&mut self) -> bool {
        let Some(mut cmd) = self.buffer.pop() else {
            return false;
        };
        if !cmd.op.apply(self) {
            tracing::warn!(command = %cmd.description, "stale redo dropped");
            return false;
        }
        if cmd.invalidates {
            self.invalid = true;
        }
        tracing::debug!(command = %cmd.description, "redo");
        self.history.push(cmd);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Undo stack, oldest first.
    pub fn history(&self) -> &[Command] {
        &self.history
    }

    /// Redo stack, next to redo last.
    pub fn redo_buffer(&self) -> &[Command] {
        &self.buffer
    }

    // Slot primitives used by commands.

    pub(crate) fn put_node(&mut self, node: Node) {
        let idx = node.id.0 as usize;
        if self.nodes.len() <= idx {
            self.nodes.resize(idx + 1, None);
        }
        self.next_node_id = self.next_node_id.max(node.id.0 + 1);
        self.nodes[idx] = Some(node);
    }

    pub(crate) fn take_node(&mut self, id: NodeId) -> Option<Node> {
        self.nodes.get_mut(id.0 as usize).and_then(Option::take)
    }

    pub(crate) fn put_edge(&mut self, edge: Edge) {
        let idx = edge.key.0 as usize;
        if self.edges.len() <= idx {
            self.edges.resize(idx + 1, None);
        }
        self.next_edge_key = self.next_edge_key.max(edge.key.0 + 1);
        self.edges[idx] = Some(edge);
    }

    pub(crate) fn take_edge(&mut self, key: EdgeKey) -> Option<Edge> {
        self.edges.get_mut(key.0 as usize).and_then(Option::take)
    }

    /// Stores `color` on `item`, returning the color it replaced.
    fn set_color(&mut self, item: Item, color: Color) -> Option<Color> {
        let slot = match item {
            Item::Node(id) => &mut self.node_mut(id)?.color,
            Item::Edge(key) => &mut self.edge_mut(key)?.color,
        };
        Some(std::mem::replace(slot, color))
    }
}
