use crate::model::Rgb;
use serde::{Deserialize, Serialize};

/// Banding palette, from cool to warm.
pub const DEFAULT_PALETTE: [Rgb; 16] = [
    Rgb(68, 1, 84),
    Rgb(72, 26, 108),
    Rgb(71, 47, 125),
    Rgb(65, 68, 135),
    Rgb(57, 86, 140),
    Rgb(49, 104, 142),
    Rgb(42, 120, 142),
    Rgb(35, 136, 142),
    Rgb(31, 152, 139),
    Rgb(34, 168, 132),
    Rgb(53, 183, 121),
    Rgb(84, 197, 104),
    Rgb(122, 209, 81),
    Rgb(165, 219, 54),
    Rgb(210, 226, 27),
    Rgb(253, 231, 37),
];

/// Edge colors used by the incoming-weighted strategy when an edge carries no
/// incoming edges: index 0 for non-positive orientation, 1 for positive.
pub const DEFAULT_INCOMING: [Rgb; 2] = [Rgb(120, 120, 120), Rgb(160, 160, 160)];

pub const DEFAULT_NODE_COLOR: Rgb = Rgb(200, 200, 200);

/// Engine-wide constants: palettes, default colors, and naming.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub palette: Vec<Rgb>,
    pub incoming_defaults: [Rgb; 2],
    /// Color of nodes whose color is the default sentinel.
    pub node_color: Rgb,
    pub node_name_prefix: String,
    /// Document name used when a loaded document carries none.
    pub untitled: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            palette: DEFAULT_PALETTE.to_vec(),
            incoming_defaults: DEFAULT_INCOMING,
            node_color: DEFAULT_NODE_COLOR,
            node_name_prefix: "New".to_string(),
            untitled: "Unnamed".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_value(v: serde_json::Value) -> crate::HResult<Self> {
        Ok(serde_json::from_value(v)?)
    }
}
