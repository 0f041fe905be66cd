use js_sys::{Array, Object, Reflect};
use wasm_bindgen::JsValue;

/// Plain object with `fields` set in order.
pub fn object<const N: usize>(fields: [(&str, JsValue); N]) -> JsValue {
    let obj = Object::new();
    for (k, v) in fields {
        let _ = Reflect::set(&obj, &JsValue::from_str(k), &v);
    }
    obj.into()
}

pub fn str_fields<const N: usize>(fields: [(&str, &str); N]) -> JsValue {
    object(fields.map(|(k, v)| (k, JsValue::from_str(v))))
}

pub fn str_array<S: AsRef<str>>(items: impl IntoIterator<Item = S>) -> Array {
    items.into_iter().map(|s| JsValue::from_str(s.as_ref())).collect()
}
