use wasm_bindgen::prelude::*;
mod api;
mod error;
mod interop;

#[wasm_bindgen]
pub struct Editor {
    pub(crate) inner: hedit::H,
    /// Gesture started by a `begin_*` call, consumed by `finish_gesture`.
    pub(crate) gesture: Option<hedit::Gesture>,
}

impl Editor {
    pub fn rs_new(inner: hedit::H) -> Editor {
        Editor {
            inner,
            gesture: None,
        }
    }

    /// Resolves a structural id string such as `"3"` or `"[0,[1,2]]"`.
    pub fn rs_item(&self, id: &str) -> Option<hedit::Item> {
        let sid: hedit::StructuralId = serde_json::from_str(id).ok()?;
        self.inner.find(&sid)
    }

    pub fn rs_id(&self, item: hedit::Item) -> Option<String> {
        self.inner.structural_id(item).map(|s| s.to_string())
    }
}
