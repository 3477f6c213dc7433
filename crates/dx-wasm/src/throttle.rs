//! Throttles for JS draw hooks.
//!
//! A visualization registers a routine once with `canvas.createThrottle(rate)`
//! and gates it every frame with `throttle.limitTo(id, fn)`, where `throttle`
//! is the last argument of the draw hook. The registry lives beside the
//! engine rather than inside it, because the engine is borrowed for the
//! whole tick.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use dx_core::{EngineError, ThrottleRegistry};
use js_sys::Function;
use wasm_bindgen::prelude::*;

/// Registry shared between [`DexCanvas`](crate::DexCanvas) and the draw hook.
///
/// Ids handed to JS are the registry's creation indices.
#[derive(Debug, Clone, Default)]
pub struct SharedThrottles {
    registry: Rc<RefCell<ThrottleRegistry>>,
    /// Timestamp of the frame being drawn.
    now: Rc<Cell<f64>>,
}

impl SharedThrottles {
    pub fn create(&self, rate_per_second: f64) -> Result<u32, EngineError> {
        let id = self.registry.borrow_mut().create(rate_per_second)?;
        u32::try_from(id.index()).map_err(|_| EngineError::UnknownThrottle)
    }

    pub fn set_now(&self, timestamp: f64) {
        self.now.set(timestamp);
    }

    /// Run `f` if throttle `index` is due at the current frame.
    ///
    /// The registry is released while `f` runs, so `f` may gate nested
    /// routines or create new throttles.
    pub fn limit_to<T>(&self, index: u32, f: impl FnOnce() -> T) -> Result<Option<T>, EngineError> {
        let now = self.now.get();
        let id = {
            let registry = self.registry.borrow();
            let id = registry
                .id(index as usize)
                .ok_or(EngineError::UnknownThrottle)?;
            if !registry.is_due(id, now)? {
                return Ok(None);
            }
            id
        };
        let out = f();
        self.registry.borrow_mut().record_run(id, now)?;
        Ok(Some(out))
    }

    pub fn len(&self) -> usize {
        self.registry.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.borrow().is_empty()
    }
}

/// Handed to the draw hook every frame.
#[wasm_bindgen]
pub struct FrameThrottle {
    throttles: SharedThrottles,
}

impl FrameThrottle {
    pub(crate) fn new(throttles: SharedThrottles) -> Self {
        Self { throttles }
    }
}

#[wasm_bindgen]
impl FrameThrottle {
    /// Call `f` if throttle `id` is due this frame. Returns whether it ran.
    #[wasm_bindgen(js_name = limitTo)]
    pub fn limit_to(&self, id: u32, f: &Function) -> Result<bool, JsValue> {
        match self.throttles.limit_to(id, || f.call0(&JsValue::NULL)) {
            Ok(Some(called)) => called.map(|_| true),
            Ok(None) => Ok(false),
            Err(err) => Err(JsValue::from_str(&err.to_string())),
        }
    }
}
