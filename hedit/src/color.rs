//! Derived edge colors.

use crate::error::HResult;
use crate::model::{EdgeKey, Item, Rgb};
use crate::view::View;
use crate::H;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorStrategy {
    /// Average of the sources of the edges pointing into an edge.
    #[default]
    Incoming,
    /// Palette band by dependency wave.
    Level,
    /// Palette band by depth.
    Depth,
}

impl FromStr for ColorStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "incoming" => Ok(ColorStrategy::Incoming),
            "level" => Ok(ColorStrategy::Level),
            "depth" => Ok(ColorStrategy::Depth),
            other => Err(format!("unknown color strategy {:?}", other)),
        }
    }
}

/// Samples `palette` at `f` in `[0, 1]`, blending the two nearest entries.
pub fn interpolate(palette: &[Rgb], f: f64) -> Rgb {
    let k = palette.len();
    match k {
        0 => return Rgb(0, 0, 0),
        1 => return palette[0],
        _ => {}
    }
    let f = if f.is_finite() { f.clamp(0.0, 1.0) } else { 0.0 };
    let pos = f * (k - 1) as f64;
    let i0 = pos.floor() as usize;
    let i1 = (pos.ceil() as usize).min(k - 1);
    palette[i0].lerp(palette[i1], pos - i0 as f64)
}

impl H {
    /// Resolved color of a node or edge under `strategy`.
    pub fn color_of(&mut self, item: Item, strategy: ColorStrategy) -> HResult<Option<Rgb>> {
        Ok(self.colors(strategy)?.get(&item).copied())
    }

    /// Resolved colors of every node and edge.
    pub fn colors(&mut self, strategy: ColorStrategy) -> HResult<HashMap<Item, Rgb>> {
        let view = self.refresh()?;
        let mut out: HashMap<Item, Rgb> = self
            .nodes()
            .map(|n| {
                (
                    Item::Node(n.id),
                    n.color.explicit().unwrap_or(self.config.node_color),
                )
            })
            .collect();
        for (key, c) in edge_colors(self, &view, strategy) {
            out.insert(Item::Edge(key), c);
        }
        Ok(out)
    }
}

/// Edge colors for `h` given its current view. Explicitly colored edges
/// keep their stored color.
pub fn edge_colors(h: &H, view: &View, strategy: ColorStrategy) -> HashMap<EdgeKey, Rgb> {
    let cfg = &h.config;
    let mut out = HashMap::new();
    let (min_depth, max_depth) = view.depth_range().unwrap_or((0, 0));
    let waves = view.levels.len();
    for e in h.edges() {
        if let Some(c) = e.color.explicit() {
            out.insert(e.key, c);
            continue;
        }
        let c = match strategy {
            ColorStrategy::Incoming => {
                let positive = orientation(h, e.key) > 0.0;
                let sources = view
                    .incoming_of(e.key)
                    .iter()
                    .filter_map(|k| h.edge(*k))
                    .map(|i| source_color(h, i.src));
                match Rgb::average(sources) {
                    Some(avg) => avg.offset(u8::from(positive)),
                    None => cfg.incoming_defaults[usize::from(positive)],
                }
            }
            ColorStrategy::Level => {
                let w = view.wave_of.get(&e.key).copied().unwrap_or(0);
                let f = if waves > 1 {
                    w as f64 / (waves - 1) as f64
                } else {
                    0.0
                };
                interpolate(&cfg.palette, f)
            }
            ColorStrategy::Depth => {
                let d = view.depth.get(&e.key).copied().unwrap_or(0);
                let f = if max_depth > min_depth {
                    (d - min_depth) as f64 / (max_depth - min_depth) as f64
                } else {
                    0.0
                };
                interpolate(&cfg.palette, f)
            }
        };
        out.insert(e.key, c);
    }
    out
}

fn source_color(h: &H, item: Item) -> Rgb {
    match item {
        Item::Node(id) => h
            .node(id)
            .and_then(|n| n.color.explicit())
            .unwrap_or(h.config.node_color),
        Item::Edge(key) => h
            .edge(key)
            .and_then(|e| e.color.explicit())
            .unwrap_or(h.config.incoming_defaults[0]),
    }
}

/// Angle of the edge from its src position to its dst position.
fn orientation(h: &H, key: EdgeKey) -> f64 {
    let Some(e) = h.edge(key) else { return 0.0 };
    match (h.position_of(e.src), h.position_of(e.dst)) {
        (Some(a), Some(b)) => (b.y - a.y).atan2(b.x - a.x),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolate_hits_control_points_and_midpoints() {
        let p = [Rgb(0, 0, 0), Rgb(100, 200, 50), Rgb(200, 0, 250)];
        assert_eq!(interpolate(&p, 0.0), Rgb(0, 0, 0));
        assert_eq!(interpolate(&p, 0.5), Rgb(100, 200, 50));
        assert_eq!(interpolate(&p, 1.0), Rgb(200, 0, 250));
        assert_eq!(interpolate(&p, 0.25), Rgb(50, 100, 25));
        assert_eq!(interpolate(&p, 7.0), Rgb(200, 0, 250));
    }

    #[test]
    fn interpolate_degenerate_palettes() {
        assert_eq!(interpolate(&[], 0.3), Rgb(0, 0, 0));
        assert_eq!(interpolate(&[Rgb(1, 2, 3)], 0.9), Rgb(1, 2, 3));
    }

    #[test]
    fn strategy_names_parse() {
        assert_eq!("depth".parse::<ColorStrategy>(), Ok(ColorStrategy::Depth));
        assert!("rainbow".parse::<ColorStrategy>().is_err());
    }
}
