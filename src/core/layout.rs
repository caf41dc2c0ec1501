//=========================================================================
// Responsive Layout
//=========================================================================
//
// Viewport arithmetic shared by scenes and overlays.
//
// Everything is authored against a 1920×1080 reference frame:
// - Backgrounds cover the viewport (uniform scale, centred)
// - Relative positions are fractions of the viewport
// - Absolute positions and offsets scale by the reference factor
//
//=========================================================================

//=== Constants ===========================================================

/// Reference authoring width in pixels.
pub const REFERENCE_WIDTH: f32 = 1920.0;

/// Reference authoring height in pixels.
pub const REFERENCE_HEIGHT: f32 = 1080.0;

/// Object scale multiplier applied on mobile devices.
pub const MOBILE_OBJECT_SCALE: f32 = 0.8;

//=== Viewport ============================================================

/// Size of the drawable area in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Centre point of the viewport.
    pub fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }

    /// Uniform factor mapping reference-frame pixels onto this viewport.
    pub fn reference_scale(&self) -> f32 {
        (self.width / REFERENCE_WIDTH).min(self.height / REFERENCE_HEIGHT)
    }

    /// Returns `true` when the viewport is taller than it is wide.
    pub fn is_portrait(&self) -> bool {
        self.height > self.width
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(REFERENCE_WIDTH, REFERENCE_HEIGHT)
    }
}

//=== Free Functions ======================================================

/// Uniform scale making a `width × height` image cover the viewport.
///
/// Degenerate texture sizes fall back to `1.0`.
pub fn cover_scale(viewport: Viewport, width: f32, height: f32) -> f32 {
    if width <= 0.0 || height <= 0.0 {
        return 1.0;
    }
    (viewport.width / width).max(viewport.height / height)
}

/// Maps a relative (0..1) position onto viewport pixels.
pub fn relative_to_viewport(viewport: Viewport, x: f32, y: f32) -> (f32, f32) {
    (x * viewport.width, y * viewport.height)
}

/// Maps an absolute reference-frame position onto viewport pixels.
pub fn absolute_to_viewport(viewport: Viewport, x: f32, y: f32) -> (f32, f32) {
    let factor = viewport.reference_scale();
    (x * factor, y * factor)
}

//=== Responsive ==========================================================

/// Letterbox fit of the reference frame inside the viewport.
///
/// Recomputed on every resize; scenes use it for content that must keep
/// the reference aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Responsive {
    pub scale: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub scaled_width: f32,
    pub scaled_height: f32,
}

impl Responsive {
    /// Computes the fit for the given viewport.
    pub fn fit(viewport: Viewport) -> Self {
        let scale = viewport.reference_scale();
        let scaled_width = REFERENCE_WIDTH * scale;
        let scaled_height = REFERENCE_HEIGHT * scale;

        Self {
            scale,
            offset_x: (viewport.width - scaled_width) / 2.0,
            offset_y: (viewport.height - scaled_height) / 2.0,
            scaled_width,
            scaled_height,
        }
    }

    /// Recomputes the fit in place.
    pub fn update(&mut self, viewport: Viewport) {
        *self = Self::fit(viewport);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn reference_scale_uses_tighter_axis() {
        assert_relative_eq!(Viewport::new(960.0, 1080.0).reference_scale(), 0.5);
        assert_relative_eq!(Viewport::new(1920.0, 540.0).reference_scale(), 0.5);
        assert_relative_eq!(Viewport::default().reference_scale(), 1.0);
    }

    #[test]
    fn cover_scale_uses_looser_axis() {
        let viewport = Viewport::new(800.0, 600.0);
        // 2000x1000 image: width ratio 0.4, height ratio 0.6 → cover = 0.6
        assert_relative_eq!(cover_scale(viewport, 2000.0, 1000.0), 0.6);
        assert_relative_eq!(cover_scale(viewport, 0.0, 100.0), 1.0);
    }

    #[test]
    fn relative_and_absolute_mapping() {
        let viewport = Viewport::new(1000.0, 500.0);
        assert_eq!(relative_to_viewport(viewport, 0.5, 0.5), (500.0, 250.0));

        let (x, y) = absolute_to_viewport(viewport, 960.0, 540.0);
        let factor = 500.0 / 1080.0;
        assert_relative_eq!(x, 960.0 * factor);
        assert_relative_eq!(y, 540.0 * factor);
    }

    #[test]
    fn responsive_centres_letterbox() {
        let fit = Responsive::fit(Viewport::new(1920.0, 1200.0));
        assert_relative_eq!(fit.scale, 1.0);
        assert_relative_eq!(fit.offset_x, 0.0);
        assert_relative_eq!(fit.offset_y, 60.0);
        assert_relative_eq!(fit.scaled_height, 1080.0);
    }

    #[test]
    fn portrait_detection() {
        assert!(Viewport::new(390.0, 844.0).is_portrait());
        assert!(!Viewport::new(844.0, 390.0).is_portrait());
    }
}
