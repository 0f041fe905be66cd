use crate::interop::{object, str_fields};
use wasm_bindgen::prelude::*;

pub fn ok(v: JsValue) -> JsValue {
    object([("ok", JsValue::from_bool(true)), ("value", v)])
}

pub fn err(code: &'static str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let message = JsValue::from_str(&message.into());
    let error = match data {
        Some(d) => object([("code", JsValue::from_str(code)), ("message", message), ("data", d)]),
        None => object([("code", JsValue::from_str(code)), ("message", message)]),
    };
    object([("ok", JsValue::from_bool(false)), ("error", error)])
}

/// Maps a core error onto its stable code.
pub fn from_herror(e: &hedit::HError) -> JsValue {
    let data = match e {
        hedit::HError::MissingField(field) => Some(str_fields([("field", *field)])),
        hedit::HError::UnresolvedEdges(n) | hedit::HError::CyclicEdges(n) => {
            Some(object([("count", JsValue::from_f64(*n as f64))]))
        }
        hedit::HError::ModeNotAllowed { op, mode, allowed } => {
            Some(str_fields([("op", *op), ("mode", *mode), ("allowed", allowed.as_str())]))
        }
        _ => None,
    };
    err(e.code(), e.to_string(), data)
}

#[inline]
pub fn non_finite(param: &str) -> JsValue {
    let d = str_fields([("param", param)]);
    err("non_finite", format!("parameter '{}' must be finite", param), Some(d))
}

#[inline]
pub fn invalid_id(kind: &str, id: &str) -> JsValue {
    let d = str_fields([("kind", kind), ("id", id)]);
    err("invalid_id", format!("invalid {} id", kind), Some(d))
}

#[inline]
pub fn invalid_strategy(got: &str) -> JsValue {
    let d = str_fields([("got", got)]);
    err("invalid_strategy", "strategy must be one of incoming, level, depth", Some(d))
}

#[inline]
pub fn invalid_mode(got: &str) -> JsValue {
    let d = str_fields([("got", got)]);
    err(
        "invalid_mode",
        "mode must be one of H, T, property_graph, edge_colored_graph, graph",
        Some(d),
    )
}

#[inline]
pub fn invalid_json(message: impl Into<String>) -> JsValue {
    err("invalid_json", message, None)
}
