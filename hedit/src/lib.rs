//! Editing engine for H, a graph structure in which an edge may itself be
//! the endpoint of another edge.
//!
//! Items live in slot arenas owned by [`H`]; edges refer to their endpoints
//! through [`Item`] handles. Every mutation runs as a reversible command so
//! it can be undone and redone, and derived data (structural-id index,
//! dependency levels, depths) is computed on demand by [`H::refresh`].

pub mod color;
pub mod command;
pub mod config;
pub mod edit;
pub mod error;
pub mod gesture;
pub mod limits;
pub mod mode;
pub mod model;
pub mod query;
pub mod view;
pub mod visibility;
mod json;

pub use color::ColorStrategy;
pub use command::Command;
pub use config::EngineConfig;
pub use error::{HError, HResult};
pub use gesture::Gesture;
pub use json::VERSION as FORMAT_VERSION;
pub use mode::Mode;
pub use model::{Color, Edge, EdgeKey, Item, Node, NodeId, Point, Rgb, StructuralId};
pub use query::{Direction, NodeTypes, Returns};
pub use view::View;
pub use visibility::{Visibility, VisibilityOptions};

use std::rc::Rc;

/// The graph container: items, selection, mode, and history.
#[derive(Debug)]
pub struct H {
    pub(crate) name: String,
    pub(crate) mode: Mode,
    pub(crate) nodes: Vec<Option<Node>>, // id is index
    pub(crate) edges: Vec<Option<Edge>>, // key is index
    // insertion order, last = most recently selected
    pub(crate) selection: Vec<Item>,
    pub(crate) history: Vec<Command>,
    pub(crate) buffer: Vec<Command>,
    pub(crate) next_node_id: u32,
    pub(crate) next_edge_key: u32,
    pub(crate) invalid: bool,
    pub(crate) view: Option<Rc<View>>,
    pub(crate) config: EngineConfig,
}

impl Default for H {
    fn default() -> Self {
        H::new()
    }
}

impl H {
    pub fn new() -> Self {
        H::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        H {
            name: config.untitled.clone(),
            mode: Mode::default(),
            nodes: Vec::new(),
            edges: Vec::new(),
            selection: Vec::new(),
            history: Vec::new(),
            buffer: Vec::new(),
            next_node_id: 0,
            next_edge_key: 0,
            invalid: true,
            view: None,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Id the next spawned node will receive.
    pub fn next_node_id(&self) -> NodeId {
        NodeId(self.next_node_id)
    }

    // Items

    pub fn nodes(&self) -> impl DoubleEndedIterator<Item = &Node> + '_ {
        self.nodes.iter().flatten()
    }

    pub fn edges(&self) -> impl DoubleEndedIterator<Item = &Edge> + '_ {
        self.edges.iter().flatten()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize).and_then(|n| n.as_ref())
    }

    pub fn edge(&self, key: EdgeKey) -> Option<&Edge> {
        self.edges.get(key.0 as usize).and_then(|e| e.as_ref())
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize).and_then(|n| n.as_mut())
    }

    pub(crate) fn edge_mut(&mut self, key: EdgeKey) -> Option<&mut Edge> {
        self.edges.get_mut(key.0 as usize).and_then(|e| e.as_mut())
    }

    pub fn node_count(&self) -> usize {
        self.nodes().count()
    }

    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }

    pub fn contains(&self, item: Item) -> bool {
        match item {
            Item::Node(id) => self.node(id).is_some(),
            Item::Edge(key) => self.edge(key).is_some(),
        }
    }

    /// Edges whose dst is `item`, in creation order.
    pub fn incoming(&self, item: Item) -> impl Iterator<Item = &Edge> + '_ {
        self.edges().filter(move |e| e.dst == item)
    }

    pub(crate) fn has_incoming(&self, key: EdgeKey) -> bool {
        self.incoming(Item::Edge(key)).next().is_some()
    }

    /// Recursive structural id; `None` if the item (or anything below it)
    /// is missing, or if its endpoint references loop back on themselves.
    pub fn structural_id(&self, item: Item) -> Option<StructuralId> {
        self.structural_id_within(item, self.edges.len())
    }

    // An acyclic chain of edge endpoints visits at most one edge per slot,
    // so `budget` running out means a reference cycle.
    fn structural_id_within(&self, item: Item, budget: usize) -> Option<StructuralId> {
        match item {
            Item::Node(id) => self.node(id).map(|n| StructuralId::Node(n.id.0)),
            Item::Edge(key) => {
                let budget = budget.checked_sub(1)?;
                let e = self.edge(key)?;
                Some(StructuralId::pair(
                    self.structural_id_within(e.src, budget)?,
                    self.structural_id_within(e.dst, budget)?,
                ))
            }
        }
    }

    /// Linear lookup by structural id. Prefer `View::item` on hot paths.
    pub fn find(&self, id: &StructuralId) -> Option<Item> {
        match id {
            StructuralId::Node(n) => {
                let id = NodeId(*n);
                self.node(id).map(|_| Item::Node(id))
            }
            StructuralId::Edge(src, dst) => {
                let src = self.find(src)?;
                let dst = self.find(dst)?;
                self.edges()
                    .find(|e| e.src == src && e.dst == dst)
                    .map(|e| Item::Edge(e.key))
            }
        }
    }

    pub(crate) fn find_edge(&self, src: Item, dst: Item) -> Option<EdgeKey> {
        self.edges()
            .find(|e| e.src == src && e.dst == dst)
            .map(|e| e.key)
    }

    /// Plane position; an edge sits at the midpoint of its endpoints.
    pub fn position_of(&self, item: Item) -> Option<Point> {
        self.position_within(item, self.edges.len())
    }

    fn position_within(&self, item: Item, budget: usize) -> Option<Point> {
        match item {
            Item::Node(id) => self.node(id).map(|n| n.pos),
            Item::Edge(key) => {
                let budget = budget.checked_sub(1)?;
                let e = self.edge(key)?;
                let src = self.position_within(e.src, budget)?;
                Some(src.midpoint(self.position_within(e.dst, budget)?))
            }
        }
    }

    /// Whether `item` is `target` or reaches it through endpoint references.
    pub fn depends_on(&self, item: Item, target: Item) -> bool {
        if item == target {
            return true;
        }
        let mut stack = vec![item];
        let mut seen = std::collections::HashSet::new();
        while let Some(cur) = stack.pop() {
            if cur == target {
                return true;
            }
            if !seen.insert(cur) {
                continue;
            }
            if let Item::Edge(k) = cur {
                if let Some(e) = self.edge(k) {
                    stack.push(e.src);
                    stack.push(e.dst);
                }
            }
        }
        false
    }

    // Selection

    pub fn selection(&self) -> &[Item] {
        &self.selection
    }

    pub fn is_selected(&self, item: Item) -> bool {
        self.selection.contains(&item)
    }

    pub fn last_selected(&self) -> Option<Item> {
        self.selection.last().copied()
    }

    pub fn selected_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.selection.iter().filter_map(|i| match i {
            Item::Node(id) => Some(*id),
            Item::Edge(_) => None,
        })
    }

    pub fn selected_edges(&self) -> impl Iterator<Item = EdgeKey> + '_ {
        self.selection.iter().filter_map(|i| match i {
            Item::Edge(k) => Some(*k),
            Item::Node(_) => None,
        })
    }

    // Documents

    pub fn to_json_value(&self) -> serde_json::Value {
        json::to_json_impl(self)
    }

    pub fn to_json_string(&self) -> String {
        self.to_json_value().to_string()
    }

    /// Builds a fresh H from a saved document, migrating older versions.
    pub fn from_json_value(v: serde_json::Value, config: EngineConfig) -> HResult<H> {
        json::from_json_impl(v, config)
    }

    pub fn from_json_str(s: &str, config: EngineConfig) -> HResult<H> {
        let v: serde_json::Value = serde_json::from_str(s)?;
        H::from_json_value(v, config)
    }

    /// Replaces this document with a loaded one. On error `self` is left
    /// untouched.
    pub fn load_json_value(&mut self, v: serde_json::Value) -> HResult<()> {
        match json::from_json_impl(v, self.config.clone()) {
            Ok(loaded) => {
                *self = loaded;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "document load rejected");
                Err(e)
            }
        }
    }

    // Derived view

    /// Current derived view, recomputed if a structural change happened
    /// since the last call.
    pub fn refresh(&mut self) -> HResult<Rc<View>> {
        if !self.invalid {
            if let Some(view) = &self.view {
                return Ok(Rc::clone(view));
            }
        }
        let view = match View::build(self) {
            Ok(v) => Rc::new(v),
            Err(e) => {
                tracing::warn!(error = %e, "derived view unavailable");
                return Err(e);
            }
        };
        tracing::debug!(
            edges = self.edge_count(),
            waves = view.levels.len(),
            "derived view rebuilt"
        );
        self.view = Some(Rc::clone(&view));
        self.invalid = false;
        Ok(view)
    }

    pub fn is_invalid(&self) -> bool {
        self.invalid
    }
}
