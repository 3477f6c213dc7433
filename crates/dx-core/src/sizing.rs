//! Backing-store sizing.
//!
//! Keeps the surface's backing resolution in step with its container at a
//! fixed scale. Writing a backing dimension clears the surface on common
//! platforms, so every write is guarded by an inequality check.

use crate::options::Height;
use crate::surface::{CssLength, Presentation, Surface};
use kurbo::Affine;

/// Sizes a surface at a scale fixed for the engine's lifetime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSizer {
    scale: f64,
}

impl SurfaceSizer {
    pub fn new(scale: f64) -> Self {
        Self { scale }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Convert a logical length to backing pixels.
    ///
    /// Truncates like a canvas dimension attribute; negative and NaN become 0.
    pub fn to_backing(&self, logical: f64) -> u32 {
        // `as` saturates and maps NaN to 0
        (logical * self.scale) as u32
    }

    /// Pin the presentation box and install the scale transform.
    pub fn setup<S: Surface>(&self, surface: &mut S, height: Height) {
        self.apply_presentation(surface, height);
        surface.set_transform(Affine::scale(self.scale));
    }

    pub fn apply_presentation<S: Surface>(&self, surface: &mut S, height: Height) {
        let height = match height {
            Height::FillParent => CssLength::Percent(100.0),
            Height::Fixed(px) => CssLength::Px(px),
        };
        surface.set_presentation(Presentation {
            width: CssLength::Percent(100.0),
            height,
        });
    }

    /// Match the backing width to the container. Returns `true` if it changed.
    pub fn adjust_width<S: Surface>(&self, surface: &mut S) -> bool {
        let width = self.to_backing(surface.container_size().width);
        self.set_width(surface, width)
    }

    /// Match the backing height to the height policy. Returns `true` if it changed.
    pub fn adjust_height<S: Surface>(&self, surface: &mut S, height: Height) -> bool {
        let logical = match height {
            Height::FillParent => surface.container_size().height,
            Height::Fixed(px) => px,
        };
        self.set_height(surface, self.to_backing(logical))
    }

    pub fn set_width<S: Surface>(&self, surface: &mut S, width: u32) -> bool {
        if surface.backing_width() == width {
            return false;
        }
        log::trace!("backing width {} -> {width}", surface.backing_width());
        surface.set_backing_width(width);
        true
    }

    pub fn set_height<S: Surface>(&self, surface: &mut S, height: u32) -> bool {
        if surface.backing_height() == height {
            return false;
        }
        log::trace!("backing height {} -> {height}", surface.backing_height());
        surface.set_backing_height(height);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::RecordingSurface;
    use pretty_assertions::assert_eq;

    #[test]
    fn width_tracks_container_at_scale() {
        let sizer = SurfaceSizer::new(2.0);
        let mut surface = RecordingSurface::new(300.0, 150.0);

        assert!(sizer.adjust_width(&mut surface));
        assert_eq!(surface.width, 600);
    }

    #[test]
    fn unchanged_size_is_never_rewritten() {
        let sizer = SurfaceSizer::new(2.0);
        let mut surface = RecordingSurface::new(300.0, 150.0);

        for _ in 0..5 {
            sizer.adjust_width(&mut surface);
            sizer.adjust_height(&mut surface, Height::FillParent);
        }

        assert_eq!(surface.width_writes, vec![600]);
        assert_eq!(surface.height_writes, vec![300]);
    }

    #[test]
    fn fixed_height_ignores_container() {
        let sizer = SurfaceSizer::new(3.0);
        let mut surface = RecordingSurface::new(300.0, 999.0);

        sizer.adjust_height(&mut surface, Height::Fixed(100.0));
        assert_eq!(surface.height, 300);
    }

    #[test]
    fn zero_container_yields_zero_backing() {
        let sizer = SurfaceSizer::new(2.0);
        let mut surface = RecordingSurface::new(0.0, 0.0);
        surface.width = 40;

        assert!(sizer.adjust_width(&mut surface));
        assert_eq!(surface.width, 0);
    }

    #[test]
    fn fractional_sizes_truncate() {
        let sizer = SurfaceSizer::new(2.0);
        assert_eq!(sizer.to_backing(100.75), 201);
        assert_eq!(sizer.to_backing(-4.0), 0);
        assert_eq!(sizer.to_backing(f64::NAN), 0);
    }

    #[test]
    fn setup_pins_presentation_and_transform() {
        let sizer = SurfaceSizer::new(2.0);
        let mut surface = RecordingSurface::default();

        sizer.setup(&mut surface, Height::Fixed(180.0));

        let presentation = surface.presentation.unwrap();
        assert_eq!(presentation.width.to_string(), "100%");
        assert_eq!(presentation.height.to_string(), "180px");
        assert_eq!(surface.transforms, vec![Affine::scale(2.0)]);

        sizer.setup(&mut surface, Height::FillParent);
        assert_eq!(surface.presentation.unwrap().height.to_string(), "100%");
    }
}
