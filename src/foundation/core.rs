use crate::foundation::error::{IrisgateError, IrisgateResult};

pub use kurbo::{Affine, Point, Vec2};

/// Upper bound applied to the device pixel ratio (fill-rate guard on dense displays).
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Logical drawing surface: a CSS-style size plus a device pixel ratio.
///
/// Scene math runs in logical units; the rasterizer multiplies by `scale` to
/// size the physical pixel buffer.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Logical width in CSS-style pixels.
    pub width: u32,
    /// Logical height in CSS-style pixels.
    pub height: u32,
    /// Device pixel ratio, capped at [`MAX_PIXEL_RATIO`].
    pub scale: f64,
}

impl Viewport {
    /// Build a viewport, capping `scale` at [`MAX_PIXEL_RATIO`].
    pub fn new(width: u32, height: u32, scale: f64) -> IrisgateResult<Self> {
        if width == 0 || height == 0 {
            return Err(IrisgateError::validation("Viewport size must be > 0"));
        }
        if !scale.is_finite() || scale <= 0.0 {
            return Err(IrisgateError::validation(
                "Viewport scale must be finite and > 0",
            ));
        }
        Ok(Self {
            width,
            height,
            scale: scale.min(MAX_PIXEL_RATIO),
        })
    }

    /// Width of the pixel buffer after scaling.
    pub fn physical_width(self) -> u32 {
        (f64::from(self.width) * self.scale).round() as u32
    }

    /// Height of the pixel buffer after scaling.
    pub fn physical_height(self) -> u32 {
        (f64::from(self.height) * self.scale).round() as u32
    }

    /// Center point in logical coordinates.
    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    /// Smaller logical dimension.
    pub fn min_dim(self) -> f64 {
        f64::from(self.width.min(self.height))
    }

    /// Larger logical dimension.
    pub fn max_dim(self) -> f64 {
        f64::from(self.width.max(self.height))
    }
}
