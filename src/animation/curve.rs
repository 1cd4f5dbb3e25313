use crate::animation::ease::Ease;
use crate::foundation::error::{IrisgateError, IrisgateResult};
use crate::foundation::math::lerp;

/// One span of a piecewise progress curve.
///
/// Raw progress inside `[start, end]` is renormalized, eased, then mapped
/// onto `[from, to]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CurveSegment {
    /// Raw progress where the segment begins.
    pub start: f64,
    /// Raw progress where the segment ends.
    pub end: f64,
    /// Easing applied to the renormalized local progress.
    pub ease: Ease,
    /// Output value at `start`.
    pub from: f64,
    /// Output value at `end`.
    pub to: f64,
}

/// Piecewise easing curve over raw progress in [0, 1].
///
/// Segments are contiguous and ordered; adjacent segments share their
/// boundary value, so the curve is continuous across breakpoints.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProgressCurve {
    segments: Vec<CurveSegment>,
}

impl ProgressCurve {
    /// Build a curve from contiguous segments covering [0, 1].
    pub fn new(segments: Vec<CurveSegment>) -> IrisgateResult<Self> {
        let Some((first, last)) = segments.first().zip(segments.last()) else {
            return Err(IrisgateError::animation(
                "ProgressCurve needs at least one segment",
            ));
        };
        if first.start != 0.0 || last.end != 1.0 {
            return Err(IrisgateError::animation(
                "ProgressCurve segments must cover [0, 1]",
            ));
        }
        for s in &segments {
            if !(s.end > s.start) {
                return Err(IrisgateError::animation(
                    "CurveSegment range must be ascending",
                ));
            }
        }
        for w in segments.windows(2) {
            if w[0].end != w[1].start {
                return Err(IrisgateError::animation(
                    "ProgressCurve segments must be contiguous",
                ));
            }
        }
        Ok(Self { segments })
    }

    /// Evaluate the curve at raw progress `raw` (clamped to [0, 1]).
    pub fn value_at(&self, raw: f64) -> f64 {
        let raw = raw.clamp(0.0, 1.0);
        let idx = self
            .segments
            .partition_point(|s| s.end < raw)
            .min(self.segments.len() - 1);
        let s = self.segments[idx];
        let local = (raw - s.start) / (s.end - s.start);
        lerp(s.from, s.to, s.ease.apply(local))
    }

    /// The ordered segment table.
    pub fn segments(&self) -> &[CurveSegment] {
        &self.segments
    }
}

/// Eyelid opening curve: raw phase progress to openness in [0, 1].
///
/// Five beats: a first twitch, a reflex close, a second twitch, a brief
/// close, then the full smooth open.
pub fn opening_curve() -> ProgressCurve {
    ProgressCurve {
        segments: vec![
            CurveSegment {
                start: 0.0,
                end: 0.08,
                ease: Ease::OutQuart,
                from: 0.0,
                to: 0.2,
            },
            CurveSegment {
                start: 0.08,
                end: 0.14,
                ease: Ease::InQuad,
                from: 0.2,
                to: 0.04,
            },
            CurveSegment {
                start: 0.14,
                end: 0.22,
                ease: Ease::OutQuart,
                from: 0.04,
                to: 0.12,
            },
            CurveSegment {
                start: 0.22,
                end: 0.28,
                ease: Ease::InQuad,
                from: 0.12,
                to: 0.06,
            },
            CurveSegment {
                start: 0.28,
                end: 1.0,
                ease: Ease::InOutCubic,
                from: 0.06,
                to: 1.0,
            },
        ],
    }
}

/// Dolly-zoom progression: a subtle hold, then hard acceleration into the
/// pupil.
pub fn dolly_curve() -> ProgressCurve {
    ProgressCurve {
        segments: vec![
            CurveSegment {
                start: 0.0,
                end: 0.15,
                ease: Ease::InQuad,
                from: 0.0,
                to: 0.02,
            },
            CurveSegment {
                start: 0.15,
                end: 1.0,
                ease: Ease::InCubic,
                from: 0.02,
                to: 1.0,
            },
        ],
    }
}

/// Camera push scale at dolly progress `dp`: 1 at rest, 81 fully zoomed.
pub fn zoom_scale(dp: f64) -> f64 {
    1.0 + dp.clamp(0.0, 1.0) * 80.0
}

/// Vertical stretch applied to the eye while the camera pushes in.
pub fn fov_multiplier(dp: f64) -> f64 {
    1.0 + dp.clamp(0.0, 1.0) * 0.6
}

/// Half-sine red flash over the middle of the dolly, peaking at 0.08.
pub fn red_flash(dp: f64) -> f64 {
    if dp > 0.3 && dp < 0.6 {
        (((dp - 0.3) / 0.3) * std::f64::consts::PI).sin() * 0.08
    } else {
        0.0
    }
}

/// Terminal fade to black over the last 35% of the dolly.
pub fn fade_to_black(dp: f64) -> f64 {
    if dp > 0.65 {
        ((dp - 0.65) / 0.35).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Dust visibility: follows openness, dimmed as the dolly takes over.
pub fn particle_alpha(openness: f64, dp: f64) -> f64 {
    (openness * (1.0 - dp * 0.9)).clamp(0.0, 1.0)
}

/// Scan-line overlay strength; zero unless the eye is mostly open and the
/// dolly has not taken over.
pub fn scan_line_alpha(openness: f64, dp: f64) -> f64 {
    if openness > 0.4 && dp < 0.8 {
        0.025 * openness * (1.0 - dp)
    } else {
        0.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/curve.rs"]
mod tests;
