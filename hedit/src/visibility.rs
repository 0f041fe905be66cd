//! Selection-driven visible subgraph.

use crate::model::{EdgeKey, Item, NodeId};
use crate::H;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityOptions {
    /// Include edges leaving a selected item.
    pub outgoing: bool,
    /// Include edges arriving at a selected item.
    pub incoming: bool,
    /// Drop edges nothing points at, unless selected.
    pub hide_untagged_edges: bool,
    /// Drop nodes left without a visible incident edge, unless selected.
    pub hide_isolated_nodes: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Visibility {
    pub nodes: Vec<NodeId>,
    /// Draw order.
    pub edges: Vec<EdgeKey>,
}

impl Visibility {
    pub fn contains(&self, item: Item) -> bool {
        match item {
            Item::Node(id) => self.nodes.contains(&id),
            Item::Edge(k) => self.edges.contains(&k),
        }
    }
}

impl H {
    /// Items to draw. With neither relation flag set this is the whole
    /// document, edges newest first. Otherwise it is the selection plus the
    /// requested edges around it, closed under "an edge brings its
    /// endpoints".
    pub fn visible(&self, opts: VisibilityOptions) -> Visibility {
        let mut vis = if opts.outgoing || opts.incoming {
            self.closure(opts)
        } else {
            Visibility {
                nodes: self.nodes().map(|n| n.id).collect(),
                edges: self.edges().rev().map(|e| e.key).collect(),
            }
        };

        if opts.hide_untagged_edges {
            vis.edges.retain(|k| {
                self.is_selected(Item::Edge(*k)) || self.has_incoming(*k)
            });
        }
        if opts.hide_isolated_nodes {
            let kept: Vec<EdgeKey> = vis.edges.clone();
            vis.nodes.retain(|id| {
                let item = Item::Node(*id);
                self.is_selected(item)
                    || kept
                        .iter()
                        .filter_map(|k| self.edge(*k))
                        .any(|e| e.touches(item))
            });
        }
        vis
    }

    fn closure(&self, opts: VisibilityOptions) -> Visibility {
        let mut acc: Vec<Item> = Vec::new();
        for &item in &self.selection {
            for e in self.edges() {
                let out = opts.outgoing && e.src == item;
                let inc = opts.incoming && e.dst == item;
                if out || inc {
                    acc.push(Item::Edge(e.key));
                }
            }
        }
        acc.extend(self.selection.iter().copied());

        let mut seen: HashSet<Item> = acc.iter().copied().collect();
        let mut scanned = 0;
        // Only endpoints are unwrapped here; the relation flags are not
        // reapplied to what gets pulled in.
        while scanned < acc.len() {
            let end = acc.len();
            for i in scanned..end {
                let Item::Edge(k) = acc[i] else { continue };
                let Some(e) = self.edge(k) else { continue };
                for ep in [e.src, e.dst] {
                    if seen.insert(ep) {
                        acc.push(ep);
                    }
                }
            }
            scanned = end;
        }

        let mut vis = Visibility::default();
        let mut emitted = HashSet::new();
        for item in acc {
            if !emitted.insert(item) {
                continue;
            }
            match item {
                Item::Node(id) => vis.nodes.push(id),
                Item::Edge(k) => vis.edges.push(k),
            }
        }
        vis
    }
}
