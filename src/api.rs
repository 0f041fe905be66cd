use crate::Editor;
use hedit::{ColorStrategy, Item, Mode, Point, Rgb, VisibilityOptions};
use serde::Serialize;
use wasm_bindgen::prelude::*;
type JsValue = wasm_bindgen::JsValue;
use crate::error;
use crate::interop::{object, str_array};
use js_sys::{Float32Array, Uint32Array, Uint8Array};

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Plain JS objects rather than `Map`s, so documents look like parsed JSON.
fn to_js<T: Serialize + ?Sized>(v: &T) -> JsValue {
    v.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::NULL)
}

fn from_js(v: JsValue) -> Result<serde_json::Value, JsValue> {
    serde_wasm_bindgen::from_value::<serde_json::Value>(v)
        .map_err(|e| error::invalid_json(e.to_string()))
}

#[wasm_bindgen]
impl Editor {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Editor {
        Editor::rs_new(hedit::H::new())
    }

    /// Editor with engine settings taken from a plain object. Unknown or
    /// malformed settings fall back to the defaults.
    pub fn with_config(cfg: JsValue) -> Editor {
        if cfg.is_undefined() || cfg.is_null() {
            return Editor::new();
        }
        let config = from_js(cfg)
            .ok()
            .and_then(|v| hedit::EngineConfig::from_json_value(v).ok())
            .unwrap_or_else(|| {
                web_sys::console::warn_1(&JsValue::from_str("hedit: invalid config, using defaults"));
                hedit::EngineConfig::default()
            });
        Editor::rs_new(hedit::H::with_config(config))
    }

    // Document
    pub fn name(&self) -> String {
        self.inner.name().to_string()
    }
    pub fn set_name(&mut self, name: &str) {
        self.inner.set_name(name);
    }
    pub fn node_count(&self) -> u32 {
        self.inner.node_count() as u32
    }
    pub fn edge_count(&self) -> u32 {
        self.inner.edge_count() as u32
    }

    // Mode
    pub fn mode(&self) -> String {
        self.inner.mode_name().to_string()
    }
    pub fn set_mode(&mut self, name: &str) -> bool {
        match Mode::from_name(name) {
            Some(m) => {
                self.inner.set_mode(m);
                true
            }
            None => false,
        }
    }
    pub fn set_mode_res(&mut self, name: &str) -> JsValue {
        if Mode::from_name(name).is_none() {
            return error::invalid_mode(name);
        }
        error::ok(JsValue::from_bool(self.set_mode(name)))
    }
    pub fn tighten(&mut self) -> String {
        self.inner.tighten().name().to_string()
    }
    pub fn loosen(&mut self) -> String {
        self.inner.loosen().name().to_string()
    }
    pub fn can_connect(&self, src: &str, dst: &str) -> bool {
        self.inner.can_connect(self.rs_item(src), self.rs_item(dst))
    }

    // Nodes
    pub fn spawn(&mut self, x: f64, y: f64, name: Option<String>) -> Option<u32> {
        self.inner.spawn(Point::new(x, y), name.as_deref()).map(|id| id.0)
    }
    pub fn spawn_res(&mut self, x: f64, y: f64, name: Option<String>) -> JsValue {
        if !x.is_finite() {
            return error::non_finite("x");
        }
        if !y.is_finite() {
            return error::non_finite("y");
        }
        match self.spawn(x, y, name) {
            Some(id) => error::ok(JsValue::from_f64(id as f64)),
            None => error::non_finite("x"),
        }
    }

    /// `{ids, positions, colors}` as typed arrays: one id, two coordinates,
    /// and three resolved color channels per node.
    pub fn get_node_data(&self) -> JsValue {
        let node_color = self.inner.config().node_color;
        let mut ids = Vec::with_capacity(self.inner.node_count());
        let mut pos = Vec::with_capacity(self.inner.node_count() * 2);
        let mut colors = Vec::with_capacity(self.inner.node_count() * 3);
        for n in self.inner.nodes() {
            ids.push(n.id.0);
            pos.push(n.pos.x as f32);
            pos.push(n.pos.y as f32);
            colors.extend(n.color.explicit().unwrap_or(node_color).channels());
        }
        object([
            ("ids", JsValue::from(Uint32Array::from(&ids[..]))),
            ("positions", JsValue::from(Float32Array::from(&pos[..]))),
            ("colors", JsValue::from(Uint8Array::from(&colors[..]))),
        ])
    }
    pub fn node_name(&self, id: u32) -> Option<String> {
        self.inner.node(hedit::NodeId(id)).map(|n| n.name.clone())
    }

    /// Structural ids of every edge, in creation order.
    pub fn edge_ids(&self) -> JsValue {
        let ids: Vec<String> = self
            .inner
            .edges()
            .filter_map(|e| self.rs_id(Item::Edge(e.key)))
            .collect();
        str_array(ids).into()
    }

    // Edges
    pub fn connect(&mut self, src: &str, dst: &str) -> Option<String> {
        let (s, d) = (self.rs_item(src)?, self.rs_item(dst)?);
        let key = self.inner.connect(s, d)?;
        self.rs_id(Item::Edge(key))
    }
    pub fn connect_res(&mut self, src: &str, dst: &str) -> JsValue {
        let Some(s) = self.rs_item(src) else {
            return error::invalid_id("item", src);
        };
        let Some(d) = self.rs_item(dst) else {
            return error::invalid_id("item", dst);
        };
        match self.inner.connect(s, d) {
            Some(key) => error::ok(to_js(&self.rs_id(Item::Edge(key)))),
            None => error::ok(JsValue::NULL),
        }
    }
    pub fn connect_selection(&mut self, target: &str) -> u32 {
        match self.rs_item(target) {
            Some(t) => self.inner.connect_selection(t).len() as u32,
            None => 0,
        }
    }
    pub fn tag_selection(&mut self, tag: &str) -> u32 {
        match self.rs_item(tag) {
            Some(t) => self.inner.tag_selection(t).len() as u32,
            None => 0,
        }
    }
    pub fn replace_dst_res(&mut self, edge: &str, target: &str) -> JsValue {
        let Some(Item::Edge(key)) = self.rs_item(edge) else {
            return error::invalid_id("edge", edge);
        };
        let Some(t) = self.rs_item(target) else {
            return error::invalid_id("item", target);
        };
        error::ok(JsValue::from_bool(self.inner.replace_dst(key, t)))
    }

    // Selection
    pub fn select(&mut self, id: &str, additive: bool) -> bool {
        match self.rs_item(id) {
            Some(item) => self.inner.select(&[item], additive),
            None => false,
        }
    }
    pub fn select_res(&mut self, id: &str, additive: bool) -> JsValue {
        match self.rs_item(id) {
            Some(item) => error::ok(JsValue::from_bool(self.inner.select(&[item], additive))),
            None => error::invalid_id("item", id),
        }
    }
    pub fn deselect_all(&mut self) -> bool {
        self.inner.deselect_all()
    }
    /// Selected structural ids, least recent first.
    pub fn selection(&self) -> JsValue {
        let ids: Vec<String> = self
            .inner
            .selection()
            .iter()
            .filter_map(|i| self.rs_id(*i))
            .collect();
        str_array(ids).into()
    }
    pub fn delete_selection(&mut self) -> bool {
        self.inner.delete_selection()
    }
    pub fn rename_selection(&mut self, name: &str) -> bool {
        self.inner.rename_selection(name)
    }
    pub fn recolor_selection(&mut self, r: u8, g: u8, b: u8) -> bool {
        self.inner.recolor_selection(Some(Rgb(r, g, b)))
    }
    pub fn clear_selection_color(&mut self) -> bool {
        self.inner.recolor_selection(None)
    }
    pub fn move_selection(&mut self, dx: f64, dy: f64) -> bool {
        self.inner.move_selection(dx, dy)
    }
    pub fn move_selection_res(&mut self, dx: f64, dy: f64) -> JsValue {
        if !dx.is_finite() {
            return error::non_finite("dx");
        }
        if !dy.is_finite() {
            return error::non_finite("dy");
        }
        error::ok(JsValue::from_bool(self.inner.move_selection(dx, dy)))
    }

    // Gestures
    pub fn begin_move(&mut self) {
        self.gesture = Some(self.inner.begin_move());
    }
    pub fn begin_connect(&mut self) {
        self.gesture = Some(self.inner.begin_connect());
    }
    pub fn begin_tag(&mut self) {
        self.gesture = Some(self.inner.begin_tag());
    }
    pub fn begin_replace(&mut self) {
        self.gesture = Some(self.inner.begin_replace());
    }
    pub fn cancel_gesture(&mut self) {
        self.gesture = None;
    }
    /// Completes the pending gesture at `(x, y)`, over the item with
    /// structural id `hit` if any.
    pub fn finish_gesture(&mut self, x: f64, y: f64, hit: Option<String>) -> bool {
        let Some(g) = self.gesture.take() else {
            return false;
        };
        let hit = hit.as_deref().and_then(|h| self.rs_item(h));
        g.finish(&mut self.inner, Point::new(x, y), hit)
    }

    // History
    pub fn undo(&mut self) -> bool {
        self.inner.undo()
    }
    pub fn redo(&mut self) -> bool {
        self.inner.redo()
    }
    pub fn can_undo(&self) -> bool {
        self.inner.can_undo()
    }
    pub fn can_redo(&self) -> bool {
        self.inner.can_redo()
    }
    /// Descriptions of the undo stack, oldest first.
    pub fn history(&self) -> JsValue {
        str_array(self.inner.history().iter().map(|c| c.description())).into()
    }

    // Serialization
    pub fn to_json(&self) -> JsValue {
        to_js(&self.inner.to_json_value())
    }
    pub fn from_json(&mut self, v: JsValue) -> bool {
        match from_js(v) {
            Ok(val) => self.load(val).is_ok(),
            Err(_) => false,
        }
    }
    pub fn from_json_res(&mut self, v: JsValue) -> JsValue {
        let val = match from_js(v) {
            Ok(val) => val,
            Err(e) => return e,
        };
        match self.load(val) {
            Ok(()) => error::ok(JsValue::from_bool(true)),
            Err(e) => error::from_herror(&e),
        }
    }

    // Derived data
    /// Dependency waves as arrays of edge structural ids.
    pub fn levels_res(&mut self) -> JsValue {
        match self.inner.refresh() {
            Ok(view) => {
                let waves: Vec<Vec<String>> = view
                    .levels
                    .iter()
                    .map(|w| w.iter().filter_map(|k| self.rs_id(Item::Edge(*k))).collect())
                    .collect();
                error::ok(to_js(&waves))
            }
            Err(e) => error::from_herror(&e),
        }
    }
    /// Structural id -> `[r, g, b]` for every node and edge.
    pub fn colors_res(&mut self, strategy: &str) -> JsValue {
        let Ok(strategy) = strategy.parse::<ColorStrategy>() else {
            return error::invalid_strategy(strategy);
        };
        match self.inner.colors(strategy) {
            Ok(colors) => {
                let out: std::collections::BTreeMap<String, [u8; 3]> = colors
                    .into_iter()
                    .filter_map(|(item, c)| Some((self.rs_id(item)?, c.channels())))
                    .collect();
                error::ok(to_js(&out))
            }
            Err(e) => error::from_herror(&e),
        }
    }
    /// `{nodes, edges}` to draw under the given visibility flags.
    pub fn visible(&self, opts: JsValue) -> JsValue {
        let opts = if opts.is_undefined() || opts.is_null() {
            VisibilityOptions::default()
        } else {
            serde_wasm_bindgen::from_value(opts).unwrap_or_default()
        };
        let vis = self.inner.visible(opts);
        let nodes: Vec<u32> = vis.nodes.iter().map(|n| n.0).collect();
        let edges: Vec<String> = vis
            .edges
            .iter()
            .filter_map(|k| self.rs_id(Item::Edge(*k)))
            .collect();
        object([
            ("nodes", JsValue::from(Uint32Array::from(&nodes[..]))),
            ("edges", JsValue::from(str_array(edges))),
        ])
    }
    pub fn as_hypergraph_res(&self, remove_subsumed: bool) -> JsValue {
        match self.inner.as_hypergraph(remove_subsumed) {
            Ok(edges) => {
                let edges: Vec<Vec<u32>> = edges
                    .into_iter()
                    .map(|seq| seq.into_iter().map(|n| n.0).collect())
                    .collect();
                error::ok(to_js(&edges))
            }
            Err(e) => error::from_herror(&e),
        }
    }
}

impl Editor {
    fn load(&mut self, v: serde_json::Value) -> hedit::HResult<()> {
        let res = self.inner.load_json_value(v);
        match &res {
            Ok(()) => self.gesture = None,
            Err(e) => web_sys::console::warn_1(&JsValue::from_str(&format!(
                "hedit: document rejected: {}",
                e
            ))),
        }
        res
    }
}

impl Default for Editor {
    fn default() -> Self {
        Editor::new()
    }
}
