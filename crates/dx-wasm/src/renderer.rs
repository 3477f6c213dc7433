//! Renderer whose hooks are JavaScript functions.

use crate::surface::CanvasSurface;
use crate::throttle::{FrameThrottle, SharedThrottles};
use dx_core::{DrawError, Frame, Options, Renderer};
use js_sys::{Array, Function};
use wasm_bindgen::{JsCast, JsValue};

/// Forwards the engine's hooks to JS callbacks.
///
/// The draw hook is called as `draw(timestamp, ctx, pointerX, pointerY, throttle)`
/// with pointer coordinates in backing pixels (`-1, -1` when outside) and a
/// [`FrameThrottle`] bound to the frame's timestamp.
pub struct JsRenderer {
    pub(crate) draw: Option<Function>,
    pub(crate) resize_width: Option<Function>,
    pub(crate) install_options: Option<Function>,
    throttles: SharedThrottles,
    throttle_handle: JsValue,
}

impl JsRenderer {
    pub fn new(draw: Option<Function>) -> Self {
        let throttles = SharedThrottles::default();
        let throttle_handle = JsValue::from(FrameThrottle::new(throttles.clone()));
        Self {
            draw,
            resize_width: None,
            install_options: None,
            throttles,
            throttle_handle,
        }
    }

    /// The registry behind the draw hook's `throttle` argument.
    pub fn throttles(&self) -> &SharedThrottles {
        &self.throttles
    }
}

impl Renderer<CanvasSurface> for JsRenderer {
    fn draw_frame(&mut self, frame: &mut Frame<'_, CanvasSurface>) -> Result<(), DrawError> {
        let draw = self.draw.as_ref().ok_or(DrawError::NotImplemented)?;
        self.throttles.set_now(frame.timestamp);
        let args = Array::of4(
            &JsValue::from_f64(frame.timestamp),
            frame.surface.context(),
            &JsValue::from_f64(frame.pointer.x),
            &JsValue::from_f64(frame.pointer.y),
        );
        args.push(&self.throttle_handle);
        draw.apply(&JsValue::NULL, &args)
            .map(|_| ())
            .map_err(|err| DrawError::Failed(describe(&err)))
    }

    fn on_resize_width(&mut self, width: u32) {
        if let Some(hook) = &self.resize_width
            && let Err(err) = hook.call1(&JsValue::NULL, &JsValue::from(width))
        {
            log::error!("onResizeWidth threw: {}", describe(&err));
        }
    }

    fn install_options(&mut self, _options: &Options) {
        if let Some(hook) = &self.install_options
            && let Err(err) = hook.call0(&JsValue::NULL)
        {
            log::error!("installOptions threw: {}", describe(&err));
        }
    }
}

/// Best-effort message for a thrown JS value.
pub(crate) fn describe(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
