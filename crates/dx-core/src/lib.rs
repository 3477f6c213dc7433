//! Device-pixel canvas frame engine.
//!
//! Platform-agnostic core shared by every canvas visualization of the
//! dashboard (depth chart, trade tape, price chart). Hosts supply a
//! [`Surface`], a [`FrameScheduler`] and a [`DisplayContext`]; visualizations
//! implement [`Renderer`].

pub mod density;
pub mod engine;
pub mod error;
pub mod options;
pub mod pointer;
pub mod renderer;
pub mod scheduler;
pub mod sizing;
pub mod surface;
pub mod throttle;

// Unit tests share the integration tests' host doubles, which name this
// crate as `dx_core`.
#[cfg(test)]
extern crate self as dx_core;
#[cfg(test)]
#[path = "../tests/support/mod.rs"]
mod support;

pub use density::{BackingStoreHints, DisplayContext, MIN_SCALE, resolve_scale};
pub use engine::Engine;
pub use error::{DrawError, EngineError};
pub use options::{AfterDraw, Height, Options, OptionsPatch};
pub use pointer::{PointerEvent, PointerTracker};
pub use renderer::{Frame, Renderer};
pub use scheduler::{FrameScheduler, FrameStatus, LoopControl, LoopState, frames_per_second};
pub use sizing::SurfaceSizer;
pub use surface::{CssLength, Presentation, Surface, TextAlign, TextStyle};
pub use throttle::{ThrottleId, ThrottleRegistry};

// Re-export kurbo geometry so hosts don't need a direct dependency
pub use kurbo::{Affine, Point, Size};
