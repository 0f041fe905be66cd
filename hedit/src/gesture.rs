//! Two-phase interactive commands.
//!
//! Phase one (`H::begin_*`) captures the acting selection when the gesture
//! starts. Phase two (`Gesture::finish`) receives the point where the
//! gesture ended and the item under it, if any, and either does nothing or
//! executes exactly one command.

use crate::model::{EdgeKey, Item, NodeId, Point};
use crate::H;

#[derive(Clone, Debug, PartialEq)]
pub enum Gesture {
    /// Moves `nodes` so that `anchor` lands on the end point.
    Move { nodes: Vec<NodeId>, anchor: Point },
    /// Connects every source to the hit item.
    Connect { sources: Vec<Item> },
    /// Connects the hit item to every target; without a hit, a new node is
    /// spawned at the end point and used as the tag.
    Tag { targets: Vec<Item> },
    /// Points every captured edge at the hit item.
    Replace { edges: Vec<EdgeKey> },
}

impl H {
    /// Anchored at the most recently selected node.
    pub fn begin_move(&self) -> Gesture {
        let nodes: Vec<NodeId> = self.selected_nodes().collect();
        let anchor = nodes
            .last()
            .and_then(|id| self.node(*id))
            .map(|n| n.pos)
            .unwrap_or_default();
        Gesture::Move { nodes, anchor }
    }

    pub fn begin_connect(&self) -> Gesture {
        Gesture::Connect {
            sources: self.selection.clone(),
        }
    }

    pub fn begin_tag(&self) -> Gesture {
        Gesture::Tag {
            targets: self.selection.clone(),
        }
    }

    pub fn begin_replace(&self) -> Gesture {
        Gesture::Replace {
            edges: self.selected_edges().collect(),
        }
    }
}

impl Gesture {
    /// Completes the gesture. Returns whether a command was executed.
    pub fn finish(self, h: &mut H, point: Point, hit: Option<Item>) -> bool {
        match self {
            Gesture::Move { nodes, anchor } => {
                if nodes.is_empty() {
                    return false;
                }
                h.move_nodes(&nodes, point.x - anchor.x, point.y - anchor.y)
            }
            Gesture::Connect { sources } => match hit {
                Some(target) => !h
                    .connect_many(sources.into_iter().map(|s| (s, target)), "connect")
                    .is_empty(),
                None => false,
            },
            Gesture::Tag { targets } => {
                if targets.is_empty() {
                    return false;
                }
                match hit {
                    Some(tag) => !h
                        .connect_many(targets.into_iter().map(|t| (tag, t)), "tag")
                        .is_empty(),
                    None => h.spawn_tag(point, &targets).is_some(),
                }
            }
            Gesture::Replace { edges } => match hit {
                Some(target) => h.replace_many(&edges, target) > 0,
                None => false,
            },
        }
    }
}
