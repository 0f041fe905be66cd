use crate::config::EngineConfig;
use crate::error::{HError, HResult};
use crate::limits;
use crate::model::{Edge, EdgeKey, Item, Node, NodeId, Point, Rgb, StructuralId};
use crate::{Mode, H};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Schema version written by `to_json_impl`.
pub const VERSION: u32 = 3;

pub fn to_json_impl(h: &H) -> Value {
    #[derive(Serialize)]
    struct NodeSer<'a> {
        id: u32,
        data: &'a str,
        x: i64,
        y: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        color: Option<Rgb>,
    }
    #[derive(Serialize)]
    struct Doc<'a> {
        name: &'a str,
        mode: Mode,
        version: u32,
        data: Vec<NodeSer<'a>>,
        conn: Vec<StructuralId>,
    }
    let data = h
        .nodes()
        .map(|n| NodeSer {
            id: n.id.0,
            data: &n.name,
            x: n.pos.x.round() as i64,
            y: n.pos.y.round() as i64,
            color: n.color.explicit(),
        })
        .collect();
    let conn = h
        .edges()
        .filter_map(|e| h.structural_id(Item::Edge(e.key)))
        .collect();
    let doc = Doc {
        name: &h.name,
        mode: h.mode,
        version: VERSION,
        data,
        conn,
    };
    serde_json::to_value(doc).unwrap_or(Value::Null)
}

pub fn from_json_impl(v: Value, config: EngineConfig) -> HResult<H> {
    #[derive(Deserialize)]
    struct NodeDe {
        id: u32,
        #[serde(default)]
        data: String,
        x: f64,
        y: f64,
        #[serde(default)]
        color: Option<Rgb>,
    }
    #[derive(Deserialize)]
    struct DocDe {
        name: Option<String>,
        mode: Option<Value>,
        data: Vec<NodeDe>,
        conn: Vec<StructuralId>,
    }

    let Value::Object(mut obj) = v else {
        return Err(HError::InvalidRecord("document is not a JSON object".into()));
    };
    for field in ["data", "conn"] {
        if !obj.contains_key(field) {
            return Err(HError::MissingField(field));
        }
    }
    let version = obj.get("version").and_then(Value::as_u64).unwrap_or(1);
    migrate(&mut obj, version)?;

    let doc: DocDe = serde_json::from_value(Value::Object(obj))?;
    if doc.data.len() > limits::MAX_NODES || doc.conn.len() > limits::MAX_EDGES {
        return Err(HError::InvalidRecord("document exceeds size limits".into()));
    }

    let mut h = H::with_config(config);
    h.name = doc.name.unwrap_or_else(|| h.config.untitled.clone());
    h.mode = doc
        .mode
        .as_ref()
        .and_then(Value::as_str)
        .and_then(Mode::from_name)
        .unwrap_or(Mode::H);

    for n in doc.data {
        if n.id > limits::MAX_NODE_ID {
            return Err(HError::InvalidRecord(format!("node id {} out of range", n.id)));
        }
        if !limits::in_coord_bounds(n.x) || !limits::in_coord_bounds(n.y) {
            return Err(HError::InvalidRecord(format!("node {} position out of range", n.id)));
        }
        let id = NodeId(n.id);
        if h.node(id).is_some() {
            return Err(HError::InvalidRecord(format!("duplicate node id {}", n.id)));
        }
        h.put_node(Node::new(Point::new(n.x, n.y), n.data, id, n.color));
    }

    let mut index: HashMap<StructuralId, Item> = h
        .nodes()
        .map(|n| (StructuralId::Node(n.id.0), Item::Node(n.id)))
        .collect();
    let mut pending = Vec::with_capacity(doc.conn.len());
    for id in doc.conn {
        match id {
            StructuralId::Node(n) => {
                return Err(HError::InvalidRecord(format!(
                    "connection record {} is not a pair",
                    n
                )))
            }
            StructuralId::Edge(src, dst) => {
                if src.depth().max(dst.depth()) >= limits::MAX_ID_DEPTH {
                    return Err(HError::InvalidRecord("connection record nested too deep".into()));
                }
                pending.push((*src, *dst));
            }
        }
    }

    // An edge can only be built once both endpoints exist, and an endpoint
    // may be an edge listed later in the document, so scan until a pass
    // builds nothing.
    while !pending.is_empty() {
        let before = pending.len();
        let mut retry = Vec::new();
        for (src, dst) in pending {
            let (Some(&s), Some(&d)) = (index.get(&src), index.get(&dst)) else {
                retry.push((src, dst));
                continue;
            };
            let id = StructuralId::pair(src, dst);
            if index.contains_key(&id) {
                continue;
            }
            let key = EdgeKey(h.next_edge_key);
            h.put_edge(Edge::new(key, s, d));
            index.insert(id, Item::Edge(key));
        }
        if retry.len() == before {
            return Err(HError::UnresolvedEdges(retry.len()));
        }
        pending = retry;
    }

    tracing::debug!(
        nodes = h.node_count(),
        edges = h.edge_count(),
        version,
        "document loaded"
    );
    Ok(h)
}

/// Brings an older document up to the current schema, in place.
fn migrate(obj: &mut Map<String, Value>, version: u64) -> HResult<()> {
    if version < 2 {
        if let Some(Value::Array(conn)) = obj.get_mut("conn") {
            for c in conn.iter_mut() {
                *c = pair_from_object(c.take())?;
            }
        }
    }
    if version < 3 {
        if let Some(Value::Array(data)) = obj.get_mut("data") {
            for node in data.iter_mut() {
                let Some(color) = node.get_mut("color") else { continue };
                let Some(hex) = color.as_str() else { continue };
                let rgb = Rgb::from_hex(hex)
                    .ok_or_else(|| HError::InvalidRecord(format!("bad hex color {:?}", hex)))?;
                *color = serde_json::json!([rgb.0, rgb.1, rgb.2]);
            }
        }
    }
    Ok(())
}

/// `{src, dst}` records become `[src, dst]`, recursively.
fn pair_from_object(v: Value) -> HResult<Value> {
    match v {
        Value::Object(mut o) => {
            let src = o.remove("src").ok_or(HError::MissingField("src"))?;
            let dst = o.remove("dst").ok_or(HError::MissingField("dst"))?;
            Ok(Value::Array(vec![
                pair_from_object(src)?,
                pair_from_object(dst)?,
            ]))
        }
        Value::Array(items) => Ok(Value::Array(
            items
                .into_iter()
                .map(pair_from_object)
                .collect::<HResult<Vec<_>>>()?,
        )),
        other => Ok(other),
    }
}
