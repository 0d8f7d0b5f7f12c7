//! Header links filled from the query string: `?ca=...&x=...&tg=...`.

use wasm_bindgen::JsValue;
use web_sys::{Document, UrlSearchParams};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderParams {
    pub ca: Option<String>,
    pub x: Option<String>,
    pub tg: Option<String>,
}

impl HeaderParams {
    pub fn from_search(search: &str) -> Result<Self, JsValue> {
        let params = UrlSearchParams::new_with_str(search)?;
        let get = |key: &str| params.get(key).filter(|v| !v.is_empty());
        Ok(Self { ca: get("ca"), x: get("x"), tg: get("tg") })
    }

    /// Write present values into `#caText`, `#xLink` and `#tgLink`.
    /// Missing elements are skipped.
    pub fn apply(&self, document: &Document) -> Result<(), JsValue> {
        if let (Some(ca), Some(el)) = (&self.ca, document.get_element_by_id("caText")) {
            el.set_text_content(Some(ca));
        }
        if let (Some(x), Some(el)) = (&self.x, document.get_element_by_id("xLink")) {
            el.set_attribute("href", x)?;
        }
        if let (Some(tg), Some(el)) = (&self.tg, document.get_element_by_id("tgLink")) {
            el.set_attribute("href", tg)?;
        }
        Ok(())
    }
}

/// Read the page's query string and populate the header.
pub fn apply_from_location(document: &Document) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let search = window.location().search()?;
    HeaderParams::from_search(&search)?.apply(document)
}
