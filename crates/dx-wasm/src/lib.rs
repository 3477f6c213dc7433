//! WASM bridge — runs the dexcanvas engine on an HTML `<canvas>`.
//!
//! Compiled via `wasm-pack build --target web`. Each dashboard visualization
//! creates one [`DexCanvas`] against its mounted canvas element and drops it
//! (`free()`) when the component unmounts.

mod display;
pub mod listeners;
pub mod logging;
pub mod raf;
pub mod renderer;
pub mod surface;
pub mod throttle;

use std::cell::RefCell;
use std::rc::Rc;

use dx_core::{Engine, EngineError, LoopControl, OptionsPatch, Point, PointerEvent};
use js_sys::Function;
use wasm_bindgen::prelude::*;

pub use display::display_context;
pub use listeners::PointerListeners;
pub use raf::RafScheduler;
pub use renderer::JsRenderer;
pub use surface::CanvasSurface;
pub use throttle::{FrameThrottle, SharedThrottles};

pub type WebEngine = Engine<JsRenderer, CanvasSurface, RafScheduler>;

type ErrorSink = Rc<RefCell<Option<Function>>>;

/// A running (or stoppable) canvas visualization.
#[wasm_bindgen]
pub struct DexCanvas {
    engine: Rc<RefCell<WebEngine>>,
    control: LoopControl,
    throttles: SharedThrottles,
    scheduler: RafScheduler,
    on_error: ErrorSink,
    _listeners: PointerListeners,
}

#[wasm_bindgen]
impl DexCanvas {
    /// Attach to the canvas with id `canvas_id`.
    ///
    /// `options_json` uses the options patch format, e.g.
    /// `{"height": -1, "showFPS": true}`. `draw` is called every frame as
    /// `draw(timestamp, ctx, pointerX, pointerY, throttle)`.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, options_json: &str, draw: Option<Function>) -> Result<DexCanvas, JsValue> {
        logging::console_error_panic_hook_setup();

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let surface = CanvasSurface::from_id(&document, canvas_id).map_err(to_js)?;
        let display = display_context(&window, surface.context());

        let mut options = dx_core::Options::default();
        options.merge(parse_options(options_json).map_err(to_js)?);

        let renderer = JsRenderer::new(draw);
        let throttles = renderer.throttles().clone();
        let scheduler = RafScheduler::new();
        let engine = Engine::new(
            renderer,
            surface,
            scheduler.clone(),
            &display,
            options,
        )
        .map_err(to_js)?;
        let control = engine.control();
        let target = engine.surface().canvas().clone();
        let engine = Rc::new(RefCell::new(engine));
        let on_error: ErrorSink = Rc::default();

        let sink = Rc::clone(&on_error);
        scheduler.install(Rc::downgrade(&engine), move |engine, timestamp| {
            let result = match engine.try_borrow_mut() {
                Ok(mut engine) => engine.tick(timestamp),
                Err(_) => {
                    log::warn!("frame callback re-entered the engine, skipping");
                    return;
                }
            };
            if let Err(err) = result {
                report(&sink, &err);
            }
        });

        let weak = Rc::downgrade(&engine);
        let listeners = PointerListeners::attach(target.into(), move |event: PointerEvent| {
            let Some(engine) = weak.upgrade() else { return };
            match engine.try_borrow_mut() {
                Ok(mut engine) => engine.handle_pointer(event),
                Err(_) => log::warn!("pointer event during a frame dropped"),
            };
        })?;

        Ok(Self {
            engine,
            control,
            throttles,
            scheduler,
            on_error,
            _listeners: listeners,
        })
    }

    /// Start the frame loop.
    pub fn start(&self) -> Result<(), JsValue> {
        self.with_engine(|engine| engine.start())
    }

    /// Stop the frame loop. Safe to call from inside any callback.
    pub fn stop(&self) {
        self.control.stop();
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.control.is_running()
    }

    /// Register a routine limited to `rate` calls per second.
    ///
    /// Returns the id to pass to `throttle.limitTo(id, fn)` inside the draw
    /// hook. Works during a frame.
    #[wasm_bindgen(js_name = createThrottle)]
    pub fn create_throttle(&self, rate: f64) -> Result<u32, JsValue> {
        self.throttles.create(rate).map_err(to_js)
    }

    /// Merge an options patch, e.g. `{"showFPS": true}`.
    #[wasm_bindgen(js_name = updateOptions)]
    pub fn update_options(&self, options_json: &str) -> Result<(), JsValue> {
        let patch = parse_options(options_json).map_err(to_js)?;
        self.with_engine(|engine| engine.update_options(patch))
    }

    /// Set the callback run after every frame.
    #[wasm_bindgen(js_name = setAfterDraw)]
    pub fn set_after_draw(&self, after_draw: Function) -> Result<(), JsValue> {
        let patch = OptionsPatch::default().after_draw(move || {
            if let Err(err) = after_draw.call0(&JsValue::NULL) {
                log::error!("afterDraw threw: {}", renderer::describe(&err));
            }
        });
        self.with_engine(|engine| engine.update_options(patch))
    }

    /// Replace the per-frame draw hook.
    #[wasm_bindgen(js_name = setDraw)]
    pub fn set_draw(&self, draw: Option<Function>) -> Result<(), JsValue> {
        self.with_engine(|engine| engine.renderer_mut().draw = draw)
    }

    /// Called with the new backing width whenever it changes.
    #[wasm_bindgen(js_name = onResizeWidth)]
    pub fn on_resize_width(&self, hook: Option<Function>) -> Result<(), JsValue> {
        self.with_engine(|engine| engine.renderer_mut().resize_width = hook)
    }

    /// Called after every options update.
    #[wasm_bindgen(js_name = onInstallOptions)]
    pub fn on_install_options(&self, hook: Option<Function>) -> Result<(), JsValue> {
        self.with_engine(|engine| engine.renderer_mut().install_options = hook)
    }

    /// Called with an error message when a frame fails and the loop halts.
    #[wasm_bindgen(js_name = onError)]
    pub fn on_error(&self, hook: Option<Function>) {
        *self.on_error.borrow_mut() = hook;
    }

    pub fn scale(&self) -> Result<f64, JsValue> {
        self.with_engine(|engine| engine.scale())
    }

    /// Pointer position in backing pixels as `[x, y]`; `[-1, -1]` when outside.
    pub fn pointer(&self) -> Result<Vec<f64>, JsValue> {
        self.with_engine(|engine| {
            let Point { x, y } = engine.pointer();
            vec![x, y]
        })
    }
}

impl DexCanvas {
    fn with_engine<T>(&self, f: impl FnOnce(&mut WebEngine) -> T) -> Result<T, JsValue> {
        let mut engine = self
            .engine
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("engine is busy drawing a frame"))?;
        Ok(f(&mut engine))
    }
}

impl Drop for DexCanvas {
    fn drop(&mut self) {
        self.control.stop();
        self.scheduler.uninstall();
    }
}

/// Route engine logs to the browser console at `level` (`"info"`, `"debug"`, ...).
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: &str) {
    logging::init_logging(logging::parse_level(level));
}

// ─── Standalone validation (no canvas needed) ─────────────────────────────

/// Validate an options patch. Returns JSON: `{"ok":true}` or `{"ok":false,"error":"..."}`.
#[wasm_bindgen(js_name = validateOptions)]
pub fn validate_options(options_json: &str) -> String {
    match parse_options(options_json) {
        Ok(_) => serde_json::json!({ "ok": true }).to_string(),
        Err(err) => serde_json::json!({ "ok": false, "error": err.to_string() }).to_string(),
    }
}

fn parse_options(json: &str) -> Result<OptionsPatch, EngineError> {
    if json.trim().is_empty() {
        return Ok(OptionsPatch::default());
    }
    Ok(OptionsPatch::from_json(json)?)
}

fn to_js(err: EngineError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn report(sink: &ErrorSink, err: &EngineError) {
    // Cloned out so the hook may replace itself through `onError`.
    let hook = sink.borrow().clone();
    match hook {
        Some(hook) => {
            if let Err(thrown) = hook.call1(&JsValue::NULL, &JsValue::from_str(&err.to_string())) {
                log::error!("onError threw: {}", renderer::describe(&thrown));
            }
        }
        None => log::error!("frame loop halted: {err}"),
    }
}
