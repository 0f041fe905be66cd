use crate::model::Item;
use crate::H;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Structural-constraint levels, loosest first.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Mode {
    #[serde(rename = "H")]
    H,
    #[default]
    #[serde(rename = "T")]
    T,
    #[serde(rename = "property_graph")]
    PropertyGraph,
    #[serde(rename = "edge_colored_graph")]
    EdgeColoredGraph,
    #[serde(rename = "graph")]
    Graph,
}

impl Mode {
    pub const ALL: [Mode; 5] = [
        Mode::H,
        Mode::T,
        Mode::PropertyGraph,
        Mode::EdgeColoredGraph,
        Mode::Graph,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::H => "H",
            Mode::T => "T",
            Mode::PropertyGraph => "property_graph",
            Mode::EdgeColoredGraph => "edge_colored_graph",
            Mode::Graph => "graph",
        }
    }

    pub fn from_name(name: &str) -> Option<Mode> {
        Mode::ALL.into_iter().find(|m| m.name() == name)
    }

    /// One step stricter, clamped at `Graph`.
    pub fn tightened(self) -> Mode {
        Mode::ALL[(self.index() + 1).min(Mode::ALL.len() - 1)]
    }

    /// One step looser, clamped at `H`.
    pub fn loosened(self) -> Mode {
        Mode::ALL[self.index().saturating_sub(1)]
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl H {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn mode_name(&self) -> &'static str {
        self.mode.name()
    }

    /// Mode changes are not commands and do not revalidate existing edges.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn tighten(&mut self) -> Mode {
        self.mode = self.mode.tightened();
        self.mode
    }

    pub fn loosen(&mut self) -> Mode {
        self.mode = self.mode.loosened();
        self.mode
    }

    /// Whether an edge `src -> dst` may be created under the current mode.
    /// Absent or unknown endpoints are never connectable.
    pub fn can_connect(&self, src: Option<Item>, dst: Option<Item>) -> bool {
        match (src, dst) {
            (Some(s), Some(d)) if self.contains(s) && self.contains(d) => {
                self.admits(s.is_edge(), d)
            }
            _ => false,
        }
    }

    /// Mode rules only; `src_is_edge` lets callers test a source that does
    /// not exist yet (a node about to be spawned).
    pub(crate) fn admits(&self, src_is_edge: bool, dst: Item) -> bool {
        let mode = self.mode;
        if mode > Mode::H && src_is_edge {
            return false;
        }
        let Item::Edge(dst_key) = dst else {
            return true;
        };
        if mode >= Mode::Graph {
            return false;
        }
        if mode == Mode::EdgeColoredGraph && self.has_incoming(dst_key) {
            return false;
        }
        if mode >= Mode::PropertyGraph {
            if let Some(target) = self.edge(dst_key) {
                if target.dst.is_edge() {
                    return false;
                }
            }
        }
        true
    }
}
