use serde::{Deserialize, Serialize};
use std::fmt;

/// Persisted node id. Assigned from a counter that is never rewound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

/// Arena key of an edge. Internal to one H; never persisted, never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey(pub u32);

/// Handle to either kind of item. Edges point at their endpoints through
/// handles, so an edge never owns what it connects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Item {
    Node(NodeId),
    Edge(EdgeKey),
}

impl Item {
    pub fn is_edge(self) -> bool {
        matches!(self, Item::Edge(_))
    }
}

impl From<NodeId> for Item {
    fn from(id: NodeId) -> Self {
        Item::Node(id)
    }
}

impl From<EdgeKey> for Item {
    fn from(key: EdgeKey) -> Self {
        Item::Edge(key)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }
}

/// RGB triple, serialized as `[r, g, b]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn channels(self) -> [u8; 3] {
        [self.0, self.1, self.2]
    }

    pub fn from_channels(c: [u8; 3]) -> Self {
        Rgb(c[0], c[1], c[2])
    }

    /// Channel-wise blend, `t = 0` gives `self`.
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let a = self.channels();
        let b = other.channels();
        let mut out = [0u8; 3];
        for i in 0..3 {
            let v = a[i] as f64 + (b[i] as f64 - a[i] as f64) * t;
            out[i] = v.round().clamp(0.0, 255.0) as u8;
        }
        Rgb::from_channels(out)
    }

    pub fn offset(self, by: u8) -> Rgb {
        Rgb(
            self.0.saturating_add(by),
            self.1.saturating_add(by),
            self.2.saturating_add(by),
        )
    }

    /// Channel-wise mean; `None` for an empty input.
    pub fn average<I: IntoIterator<Item = Rgb>>(colors: I) -> Option<Rgb> {
        let mut sum = [0u32; 3];
        let mut n = 0u32;
        for c in colors {
            for (s, v) in sum.iter_mut().zip(c.channels()) {
                *s += v as u32;
            }
            n += 1;
        }
        if n == 0 {
            return None;
        }
        Some(Rgb::from_channels(sum.map(|s| (s / n) as u8)))
    }

    /// Parses `#rrggbb` or `#rgb` (leading `#` optional).
    pub fn from_hex(s: &str) -> Option<Rgb> {
        let hex = s.trim().trim_start_matches('#');
        let digit = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
        match hex.len() {
            6 => {
                let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
                Some(Rgb(byte(0)?, byte(2)?, byte(4)?))
            }
            3 => Some(Rgb(digit(0)? * 17, digit(1)? * 17, digit(2)? * 17)),
            _ => None,
        }
    }
}

/// Stored color of an item: explicit, or the "use the default" sentinel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Color {
    #[default]
    Default,
    Rgb(Rgb),
}

impl Color {
    pub fn explicit(self) -> Option<Rgb> {
        match self {
            Color::Default => None,
            Color::Rgb(c) => Some(c),
        }
    }
}

impl From<Option<Rgb>> for Color {
    fn from(c: Option<Rgb>) -> Self {
        c.map_or(Color::Default, Color::Rgb)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub pos: Point,
    pub color: Color,
}

impl Node {
    pub fn new(pos: Point, name: impl Into<String>, id: NodeId, color: Option<Rgb>) -> Self {
        Node {
            id,
            name: name.into(),
            pos,
            color: color.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub key: EdgeKey,
    pub src: Item,
    pub dst: Item,
    /// Explicit override; `Default` leaves the color to the active strategy.
    pub color: Color,
}

impl Edge {
    pub fn new(key: EdgeKey, src: Item, dst: Item) -> Self {
        Edge {
            key,
            src,
            dst,
            color: Color::Default,
        }
    }

    /// Edge-typed endpoints, without repeats.
    pub fn dependencies(&self) -> impl Iterator<Item = EdgeKey> {
        let src = match self.src {
            Item::Edge(k) => Some(k),
            Item::Node(_) => None,
        };
        let dst = match self.dst {
            Item::Edge(k) if Some(k) != src => Some(k),
            _ => None,
        };
        src.into_iter().chain(dst)
    }

    pub fn touches(&self, item: Item) -> bool {
        self.src == item || self.dst == item
    }
}

/// Content-based identity: a node id, or the pair of its endpoints' ids.
/// Serialized untagged, i.e. as `3` or `[3, [0, 1]]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StructuralId {
    Node(u32),
    Edge(Box<StructuralId>, Box<StructuralId>),
}

impl StructuralId {
    pub fn pair(src: StructuralId, dst: StructuralId) -> Self {
        StructuralId::Edge(Box::new(src), Box::new(dst))
    }

    pub fn depth(&self) -> usize {
        match self {
            StructuralId::Node(_) => 0,
            StructuralId::Edge(a, b) => 1 + a.depth().max(b.depth()),
        }
    }
}

impl fmt::Display for StructuralId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructuralId::Node(n) => write!(f, "{}", n),
            StructuralId::Edge(a, b) => write!(f, "[{},{}]", a, b),
        }
    }
}
