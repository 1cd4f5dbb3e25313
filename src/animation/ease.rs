/// Easing functions over normalized progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    /// Identity.
    Linear,
    /// Quadratic acceleration from rest.
    InQuad,
    /// Quadratic deceleration to rest.
    OutQuad,
    /// Quadratic ease on both ends.
    InOutQuad,
    /// Cubic acceleration from rest.
    InCubic,
    /// Cubic deceleration to rest.
    OutCubic,
    /// Cubic ease on both ends.
    InOutCubic,
    /// Quartic deceleration to rest.
    OutQuart,
    /// Decelerating overshoot past the target before settling.
    OutBack,
}

impl Ease {
    /// Eased value at progress `t`; input is clamped to [0, 1].
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::OutQuart => 1.0 - (1.0 - t).powi(4),
            Self::OutBack => {
                // Overshoots above 1.0 inside (0, 1); endpoints are exact.
                const C1: f64 = 1.70158;
                const C3: f64 = C1 + 1.0;
                1.0 + C3 * (t - 1.0).powi(3) + C1 * (t - 1.0).powi(2)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
