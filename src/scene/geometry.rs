use crate::foundation::core::{Point, Vec2, Viewport};
use kurbo::Affine;

/// Static proportions of the rendered eye, in logical pixels.
///
/// Everything hangs off the smaller viewport dimension so the eye keeps its
/// aspect on both portrait and landscape surfaces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EyeGeometry {
    /// Eye center in logical pixels, before the micro-saccade offset.
    pub center: Point,
    /// Eye half-width.
    pub eye_w: f64,
    /// Eye half-height at rest.
    pub eye_h: f64,
    /// Iris radius.
    pub iris_r: f64,
    /// Pupil radius before the breathing modulation.
    pub pupil_base_r: f64,
}

impl EyeGeometry {
    /// Derive proportions from the smaller viewport dimension.
    pub fn from_viewport(vp: Viewport) -> Self {
        let eye_w = vp.min_dim() * 0.3;
        let eye_h = eye_w * 0.48;
        let iris_r = eye_w * 0.33;
        Self {
            center: vp.center(),
            eye_w,
            eye_h,
            iris_r,
            pupil_base_r: iris_r * 0.36,
        }
    }

    /// Involuntary micro-movement of the gaze at `time_ms`.
    ///
    /// Two sine bands per axis: a slow drift gated by openness plus a faster
    /// low-amplitude tremor that never fully rests.
    pub fn micro_saccade(self, time_ms: f64, openness: f64) -> Vec2 {
        let t = time_ms;
        Vec2::new(
            (t * 0.0007).sin() * 1.2 * openness + (t * 0.003).sin() * 0.3,
            (t * 0.0011).cos() * 0.8 * openness + (t * 0.0025).cos() * 0.2,
        )
    }
}

/// Per-frame eyelid opening, derived from openness and the dolly stretch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LidGeometry {
    /// Eye half-height after the dolly's vertical FOV stretch.
    pub effective_h: f64,
    /// Peak rise of the upper lid above the eye centerline.
    pub upper_curve: f64,
    /// Peak drop of the lower lid below the eye centerline.
    pub lower_curve: f64,
}

impl LidGeometry {
    /// Lid extents at the given openness and dolly stretch.
    pub fn resolve(eye: EyeGeometry, openness: f64, fov_multiplier: f64) -> Self {
        let effective_h = eye.eye_h * fov_multiplier;
        let lid_open = openness * effective_h;
        Self {
            effective_h,
            upper_curve: lid_open * 1.15,
            lower_curve: lid_open * 0.6,
        }
    }
}

/// Zoom about a fixed point.
///
/// Canonical order: T(center) * S(scale) * T(-center).
pub fn zoom_about(center: Point, scale: f64) -> Affine {
    Affine::translate(center.to_vec2())
        * Affine::scale(scale)
        * Affine::translate(-center.to_vec2())
}
