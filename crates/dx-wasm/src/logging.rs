//! Console-backed `log` sink and panic hook.

use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::Once;

struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!("[{}] {}", record.target(), record.args());
        write_console(record.level(), &line);
    }

    fn flush(&self) {}
}

#[cfg(target_arch = "wasm32")]
fn write_console(level: Level, line: &str) {
    let line = wasm_bindgen::JsValue::from_str(line);
    match level {
        Level::Error => web_sys::console::error_1(&line),
        Level::Warn => web_sys::console::warn_1(&line),
        Level::Info => web_sys::console::info_1(&line),
        Level::Debug | Level::Trace => web_sys::console::debug_1(&line),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn write_console(level: Level, line: &str) {
    eprintln!("{level:<5} {line}");
}

static LOGGER: ConsoleLogger = ConsoleLogger;
static INIT: Once = Once::new();

/// Route `log` records to the browser console.
///
/// Idempotent; only the first call's level is applied. Also installs a panic
/// hook that reports panics through `console.error`.
pub fn init_logging(level: LevelFilter) {
    INIT.call_once(|| {
        console_error_panic_hook_setup();
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(level);
        }
        log::debug!("console logging initialized at {level}");
    });
}

/// Parse a level name (`"warn"`, `"debug"`, ...). Unknown names mean `Info`.
pub fn parse_level(name: &str) -> LevelFilter {
    name.parse().unwrap_or(LevelFilter::Info)
}

pub(crate) fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("dexcanvas panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
