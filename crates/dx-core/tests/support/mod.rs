//! Recording host doubles shared by the unit and integration tests.

#![allow(dead_code)]

use dx_core::{Affine, FrameScheduler, Point, Presentation, Size, Surface, TextStyle};
use std::cell::Cell;
use std::rc::Rc;

/// A surface that records every write.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub container: Size,
    pub width: u32,
    pub height: u32,
    pub width_writes: Vec<u32>,
    pub height_writes: Vec<u32>,
    pub presentation: Option<Presentation>,
    pub transforms: Vec<Affine>,
    pub texts: Vec<(String, Point, TextStyle)>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            container: Size::new(width, height),
            ..Default::default()
        }
    }
}

impl Surface for RecordingSurface {
    fn container_size(&self) -> Size {
        self.container
    }

    fn backing_width(&self) -> u32 {
        self.width
    }

    fn backing_height(&self) -> u32 {
        self.height
    }

    fn set_backing_width(&mut self, width: u32) {
        self.width = width;
        self.width_writes.push(width);
    }

    fn set_backing_height(&mut self, height: u32) {
        self.height = height;
        self.height_writes.push(height);
    }

    fn set_presentation(&mut self, presentation: Presentation) {
        self.presentation = Some(presentation);
    }

    fn set_transform(&mut self, transform: Affine) {
        self.transforms.push(transform);
    }

    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle) {
        self.texts.push((text.to_string(), at, style.clone()));
    }
}

/// Mimics a vsync queue: each request becomes one pending callback.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    pending: Rc<Cell<usize>>,
    total: Rc<Cell<usize>>,
}

impl ManualScheduler {
    /// Take one pending callback, if any.
    pub fn take(&self) -> bool {
        let pending = self.pending.get();
        if pending == 0 {
            return false;
        }
        self.pending.set(pending - 1);
        true
    }

    pub fn pending(&self) -> usize {
        self.pending.get()
    }

    pub fn total_requests(&self) -> usize {
        self.total.get()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) {
        self.pending.set(self.pending.get() + 1);
        self.total.set(self.total.get() + 1);
    }
}
