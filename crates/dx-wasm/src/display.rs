//! Reads the browser's display density into a [`DisplayContext`].

use dx_core::{BackingStoreHints, DisplayContext};
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, Window};

const WEBKIT: &str = "webkitBackingStorePixelRatio";
const MOZ: &str = "mozBackingStorePixelRatio";
const MS: &str = "msBackingStorePixelRatio";
const O: &str = "oBackingStorePixelRatio";
const STANDARD: &str = "backingStorePixelRatio";

pub fn display_context(window: &Window, ctx: &CanvasRenderingContext2d) -> DisplayContext {
    let hint = |name: &str| {
        js_sys::Reflect::get(ctx, &JsValue::from_str(name))
            .ok()
            .and_then(|value| value.as_f64())
    };
    DisplayContext {
        device_pixel_ratio: Some(window.device_pixel_ratio()),
        backing_store: BackingStoreHints {
            webkit: hint(WEBKIT),
            moz: hint(MOZ),
            ms: hint(MS),
            o: hint(O),
            standard: hint(STANDARD),
        },
    }
}
