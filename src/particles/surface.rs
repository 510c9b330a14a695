use super::render::DrawingContext;

/// Host window geometry in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub device_pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }

    /// Device pixel ratio, falling back to 1 when the host reports nothing usable.
    pub fn dpr(&self) -> f64 {
        if self.device_pixel_ratio.is_finite() && self.device_pixel_ratio > 0.0 {
            self.device_pixel_ratio
        } else {
            1.0
        }
    }
}

/// Sizes derived from a [`Viewport`]: the canvas backing store in device
/// pixels and its displayed size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMetrics {
    pub backing_width: u32,
    pub backing_height: u32,
    pub display_width: f64,
    pub display_height: f64,
    pub dpr: f64,
}

impl Default for SurfaceMetrics {
    fn default() -> Self {
        Self::for_viewport(Viewport::new(0.0, 0.0, 1.0))
    }
}

impl SurfaceMetrics {
    pub fn for_viewport(viewport: Viewport) -> Self {
        let dpr = viewport.dpr();
        let display_width = non_negative(viewport.width);
        let display_height = non_negative(viewport.height);
        Self {
            backing_width: backing_pixels(display_width * dpr),
            backing_height: backing_pixels(display_height * dpr),
            display_width,
            display_height,
            dpr,
        }
    }

    /// Area cleared each frame, in transformed (CSS pixel) units.
    pub fn clear_extent(&self) -> (f64, f64) {
        (
            f64::from(self.backing_width) / self.dpr,
            f64::from(self.backing_height) / self.dpr,
        )
    }

    /// Range ambient spawns are drawn from: the backing store minus a margin
    /// of `margin_ratio * dpr` on each axis.
    pub fn spawn_extent(&self, margin_ratio: f32) -> (f32, f32) {
        let margin = self.dpr as f32 * margin_ratio;
        (
            (self.backing_width as f32 - margin).max(0.0),
            (self.backing_height as f32 - margin).max(0.0),
        )
    }
}

/// A resizable drawing target, typically a `<canvas>` and its 2D context.
pub trait Surface: DrawingContext {
    /// Sets the backing store size in device pixels. On a real canvas this
    /// also resets the context state, including the transform.
    fn set_backing_size(&mut self, width: u32, height: u32);
    fn set_display_size(&mut self, width: f64, height: f64);
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

fn backing_pixels(value: f64) -> u32 {
    value.floor().clamp(1.0, f64::from(u32::MAX)) as u32
}
