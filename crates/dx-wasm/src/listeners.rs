//! Mouse listeners feeding the engine's pointer tracker.

use dx_core::PointerEvent;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{EventTarget, MouseEvent};

type MouseClosure = Closure<dyn FnMut(MouseEvent)>;

const MOVE: &str = "mousemove";
const LEAVE: &str = "mouseleave";

/// `mousemove`/`mouseleave` handlers on one element. Removed on drop.
pub struct PointerListeners {
    target: EventTarget,
    on_move: MouseClosure,
    on_leave: MouseClosure,
}

impl PointerListeners {
    /// Attach handlers that forward every event to `sink` as it arrives.
    pub fn attach(
        target: EventTarget,
        sink: impl Fn(PointerEvent) + Clone + 'static,
    ) -> Result<Self, JsValue> {
        let move_sink = sink.clone();
        let on_move = Closure::wrap(Box::new(move |event: MouseEvent| {
            move_sink(pointer_move(&event));
        }) as Box<dyn FnMut(MouseEvent)>);
        let on_leave = Closure::wrap(Box::new(move |_event: MouseEvent| {
            sink(PointerEvent::Leave);
        }) as Box<dyn FnMut(MouseEvent)>);

        target.add_event_listener_with_callback(MOVE, on_move.as_ref().unchecked_ref())?;
        target.add_event_listener_with_callback(LEAVE, on_leave.as_ref().unchecked_ref())?;

        Ok(Self {
            target,
            on_move,
            on_leave,
        })
    }
}

fn pointer_move(event: &MouseEvent) -> PointerEvent {
    PointerEvent::Move {
        offset_x: f64::from(event.offset_x()),
        offset_y: f64::from(event.offset_y()),
    }
}

impl Drop for PointerListeners {
    fn drop(&mut self) {
        let pairs = [(MOVE, &self.on_move), (LEAVE, &self.on_leave)];
        for (name, closure) in pairs {
            if let Err(err) = self
                .target
                .remove_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
            {
                log::warn!("could not remove {name} listener: {err:?}");
            }
        }
    }
}
