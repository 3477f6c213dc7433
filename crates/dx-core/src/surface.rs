//! The drawing surface boundary.
//!
//! A surface is an already-mounted canvas-like element owned by the host.
//! The engine only reads its container box, writes its backing size and
//! presentation size, installs a transform, and lets renderers draw into it.

use kurbo::{Affine, Point, Size};
use std::fmt;

/// A CSS-style length for the surface's presentation box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CssLength {
    Percent(f64),
    Px(f64),
}

impl fmt::Display for CssLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CssLength::Percent(p) => write!(f, "{p}%"),
            CssLength::Px(px) => write!(f, "{px}px"),
        }
    }
}

/// Presentation size, independent of backing resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Presentation {
    pub width: CssLength,
    pub height: CssLength,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_css(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

/// Style for overlay text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub align: TextAlign,
    pub color: String,
    pub font: String,
}

impl TextStyle {
    /// Style of the built-in FPS readout.
    pub fn fps_overlay() -> Self {
        Self {
            align: TextAlign::Right,
            color: "#FFFFFF".to_string(),
            font: "12px sans-serif".to_string(),
        }
    }
}

pub trait Surface {
    /// Content box of the containing element, in presentation units.
    fn container_size(&self) -> Size;

    fn backing_width(&self) -> u32;
    fn backing_height(&self) -> u32;

    /// Resize the backing store. On most platforms this clears the surface,
    /// so callers must not write unchanged values.
    fn set_backing_width(&mut self, width: u32);
    fn set_backing_height(&mut self, height: u32);

    fn set_presentation(&mut self, presentation: Presentation);
    fn set_transform(&mut self, transform: Affine);

    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle);
}
