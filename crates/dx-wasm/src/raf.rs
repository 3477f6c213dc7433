//! `requestAnimationFrame` frame scheduler.
//!
//! The engine asks for frames through [`RafScheduler`]; the registered JS
//! closure turns each callback into one [`Engine::tick`] call. The closure
//! only holds a weak reference to the engine, so dropping the owner ends the
//! loop.
//!
//! [`Engine::tick`]: dx_core::Engine::tick

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use dx_core::FrameScheduler;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);
}

type RafClosure = Closure<dyn FnMut(f64)>;

#[derive(Default)]
struct RafSlot {
    closure: RefCell<Option<RafClosure>>,
    /// ID of the most recent request, `None` once it has fired.
    pending: Cell<Option<i32>>,
}

/// Requests animation frames for one engine.
///
/// Cloning shares the same registered closure.
#[derive(Clone, Default)]
pub struct RafScheduler {
    slot: Rc<RafSlot>,
}

impl RafScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the per-frame callback.
    ///
    /// `on_frame` runs once per animation frame that the engine requested.
    /// The callback is dropped together with the scheduler's last clone.
    pub fn install<T: 'static>(&self, target: Weak<T>, mut on_frame: impl FnMut(&T, f64) + 'static) {
        let slot = Rc::downgrade(&self.slot);
        let closure = Closure::wrap(Box::new(move |timestamp: f64| {
            if let Some(slot) = slot.upgrade() {
                slot.pending.set(None);
            }
            if let Some(target) = target.upgrade() {
                on_frame(&target, timestamp);
            }
        }) as Box<dyn FnMut(f64)>);
        *self.slot.closure.borrow_mut() = Some(closure);
    }

    /// Cancel a request that has not fired yet.
    pub fn cancel(&self) {
        if let Some(id) = self.slot.pending.take() {
            cancel_animation_frame(id);
        }
    }

    /// Cancel any pending request and release the JS closure.
    pub fn uninstall(&self) {
        self.cancel();
        self.slot.closure.borrow_mut().take();
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) {
        match self.slot.closure.borrow().as_ref() {
            Some(closure) => {
                let id = request_animation_frame(closure.as_ref().unchecked_ref());
                self.slot.pending.set(Some(id));
            }
            None => log::warn!("frame requested before the frame callback was installed"),
        }
    }
}
