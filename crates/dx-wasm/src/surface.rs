//! `<canvas>`-backed drawing surface.

use dx_core::{Affine, EngineError, Point, Presentation, Size, Surface, TextStyle};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

/// An existing canvas element and its 2d context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Look up a mounted canvas by element id.
    pub fn from_id(document: &Document, id: &str) -> Result<Self, EngineError> {
        let canvas = document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
            .ok_or_else(|| EngineError::SurfaceNotFound(id.to_string()))?;
        Self::from_canvas(canvas)
    }

    pub fn from_canvas(canvas: HtmlCanvasElement) -> Result<Self, EngineError> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or(EngineError::ContextUnavailable)?;
        Ok(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub fn context(&self) -> &CanvasRenderingContext2d {
        &self.ctx
    }
}

impl Surface for CanvasSurface {
    fn container_size(&self) -> Size {
        // A detached canvas reports an empty box until it is mounted again
        self.canvas
            .parent_element()
            .map(|parent| Size::new(f64::from(parent.client_width()), f64::from(parent.client_height())))
            .unwrap_or(Size::ZERO)
    }

    fn backing_width(&self) -> u32 {
        self.canvas.width()
    }

    fn backing_height(&self) -> u32 {
        self.canvas.height()
    }

    fn set_backing_width(&mut self, width: u32) {
        self.canvas.set_width(width);
    }

    fn set_backing_height(&mut self, height: u32) {
        self.canvas.set_height(height);
    }

    fn set_presentation(&mut self, presentation: Presentation) {
        let style = self.canvas.style();
        for (prop, value) in [("width", presentation.width), ("height", presentation.height)] {
            if let Err(err) = style.set_property(prop, &value.to_string()) {
                log::warn!("could not set canvas {prop}: {err:?}");
            }
        }
    }

    fn set_transform(&mut self, transform: Affine) {
        let [a, b, c, d, e, f] = transform.as_coeffs();
        if let Err(err) = self.ctx.set_transform(a, b, c, d, e, f) {
            log::warn!("could not set canvas transform: {err:?}");
        }
    }

    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle) {
        self.ctx.set_text_align(style.align.as_css());
        self.ctx.set_fill_style_str(&style.color);
        self.ctx.set_font(&style.font);
        if let Err(err) = self.ctx.fill_text(text, at.x, at.y) {
            log::warn!("fill_text failed: {err:?}");
        }
    }
}
