//! Pixel-density resolution.
//!
//! The scale factor is computed once per engine from an injected
//! [`DisplayContext`], never from ambient globals, so hosts and tests can
//! describe any display they like.

/// Lowest scale the engine will render at, even on 1x displays.
pub const MIN_SCALE: f64 = 2.0;

/// Backing-store pixel ratios as reported by the 2d context.
///
/// Browsers historically exposed these behind vendor prefixes. Most modern
/// engines report none of them, in which case the ratio is 1.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BackingStoreHints {
    pub webkit: Option<f64>,
    pub moz: Option<f64>,
    pub ms: Option<f64>,
    pub o: Option<f64>,
    pub standard: Option<f64>,
}

impl BackingStoreHints {
    /// First usable hint, in vendor-prefix priority order.
    pub fn ratio(&self) -> f64 {
        [self.webkit, self.moz, self.ms, self.o, self.standard]
            .into_iter()
            .flatten()
            .find(|r| usable(*r))
            .unwrap_or(1.0)
    }
}

/// Display state the resolver reads.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DisplayContext {
    pub device_pixel_ratio: Option<f64>,
    pub backing_store: BackingStoreHints,
}

impl DisplayContext {
    pub fn with_device_pixel_ratio(ratio: f64) -> Self {
        Self {
            device_pixel_ratio: Some(ratio),
            backing_store: BackingStoreHints::default(),
        }
    }
}

/// Resolve the rendering scale for a display.
///
/// `device_pixel_ratio / backing_store_ratio`, floored at [`MIN_SCALE`].
/// Missing, zero and non-finite readings fall back to 1.
pub fn resolve_scale(display: &DisplayContext) -> f64 {
    let dpr = display
        .device_pixel_ratio
        .filter(|r| usable(*r))
        .unwrap_or(1.0);
    let ratio = dpr / display.backing_store.ratio();
    ratio.max(MIN_SCALE)
}

fn usable(ratio: f64) -> bool {
    ratio.is_finite() && ratio > 0.0
}
