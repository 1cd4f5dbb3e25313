use crate::foundation::core::Point;
use crate::foundation::math::Rng64;

/// A single sclera vein: a quadratic main stroke plus short branches.
///
/// Coordinates are eye-normalized: x in eye half-widths, y in lid
/// half-heights, origin at the eye center.
#[derive(Clone, Debug, PartialEq)]
pub struct Vein {
    /// Entry point at the eye corner.
    pub start: Point,
    /// Control point of the quadratic main stroke.
    pub ctrl: Point,
    /// End point toward the iris.
    pub end: Point,
    /// Stroke width in logical pixels.
    pub width: f64,
    /// Short forks off the main stroke.
    pub branches: Vec<VeinBranch>,
}

/// Straight branch forking off a main vein toward the iris.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VeinBranch {
    /// Fork point on the main vein.
    pub from: Point,
    /// Branch end point.
    pub to: Point,
    /// Stroke width, half the parent's.
    pub width: f64,
}

// Ten fixed vein courses: five entering from each corner, widths tapering
// with distance from the caruncle.
const VEIN_SEEDS: [([f64; 2], [f64; 2], [f64; 2], f64); 10] = [
    ([-0.92, -0.04], [-0.6, -0.13], [-0.35, -0.07], 1.0),
    ([-0.95, 0.06], [-0.7, 0.14], [-0.42, 0.09], 0.8),
    ([-0.88, -0.18], [-0.58, -0.24], [-0.35, -0.15], 0.7),
    ([-0.9, 0.2], [-0.62, 0.26], [-0.4, 0.17], 0.6),
    ([-0.87, -0.1], [-0.5, -0.17], [-0.36, -0.11], 0.5),
    ([0.92, -0.05], [0.62, -0.15], [0.38, -0.08], 0.9),
    ([0.95, 0.08], [0.7, 0.17], [0.45, 0.1], 0.7),
    ([0.88, -0.2], [0.6, -0.25], [0.38, -0.16], 0.6),
    ([0.9, 0.22], [0.65, 0.27], [0.42, 0.18], 0.5),
    ([0.87, 0.02], [0.55, -0.05], [0.4, -0.02], 0.4),
];

/// Static vein bed, generated once per scene.
#[derive(Clone, Debug, PartialEq)]
pub struct VeinLayout {
    veins: Vec<Vein>,
}

impl VeinLayout {
    /// Generate the fixed courses with seeded branch jitter.
    pub fn generate(seed: u64) -> Self {
        let mut rng = Rng64::new(seed);
        let veins = VEIN_SEEDS
            .iter()
            .map(|&(start, ctrl, end, width)| {
                let start = Point::new(start[0], start[1]);
                let ctrl = Point::new(ctrl[0], ctrl[1]);
                let end = Point::new(end[0], end[1]);
                // Branches grow inward, toward the iris.
                let dir = if start.x < 0.0 { 1.0 } else { -1.0 };
                let count = 1 + (rng.next_f64_01() * 2.0).floor() as usize;
                let branches = (0..count)
                    .map(|_| {
                        let from_t = 0.3 + rng.next_f64_01() * 0.4;
                        let from = Point::new(
                            start.x + (end.x - start.x) * from_t,
                            start.y + (end.y - start.y) * from_t,
                        );
                        let to = Point::new(
                            from.x + dir * (0.05 + rng.next_f64_01() * 0.08),
                            from.y + (rng.next_f64_01() - 0.5) * 0.12,
                        );
                        VeinBranch {
                            from,
                            to,
                            width: width * 0.5,
                        }
                    })
                    .collect();
                Vein {
                    start,
                    ctrl,
                    end,
                    width,
                    branches,
                }
            })
            .collect();
        Self { veins }
    }

    /// Borrow the vein courses.
    pub fn veins(&self) -> &[Vein] {
        &self.veins
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/veins.rs"]
mod tests;
