// Ingestion limits applied to untrusted documents. Node ids index a slot
// vector, so the id range is capped as well as the record counts.

pub const MAX_NODES: usize = 200_000;
pub const MAX_EDGES: usize = 300_000;
pub const MAX_NODE_ID: u32 = 4_000_000;

// Nested connection ids deeper than this are rejected before resolution.
pub const MAX_ID_DEPTH: usize = 256;

pub const COORD_MIN: f64 = -10_000_000.0;
pub const COORD_MAX: f64 = 10_000_000.0;

#[inline]
pub fn in_coord_bounds(x: f64) -> bool {
    x.is_finite() && (COORD_MIN..=COORD_MAX).contains(&x)
}
