use crate::foundation::math::Rng64;

/// One drifting dust mote in normalized scene space.
///
/// Positions live in [-1, 1] on both axes and wrap torus-style at the
/// edges: a mote leaving one side reappears on the opposite side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Horizontal position in [-1, 1].
    pub x: f64,
    /// Vertical position in [-1, 1].
    pub y: f64,
    /// Per-tick horizontal drift.
    pub vx: f64,
    /// Per-tick vertical drift.
    pub vy: f64,
    /// Draw radius in logical pixels.
    pub size: f64,
    /// Base opacity before flicker and scene dimming.
    pub opacity: f64,
    /// Flicker phase offset in radians.
    pub phase: f64,
    /// Flicker speed multiplier.
    pub speed: f64,
}

impl Particle {
    /// Move one tick along the velocity, wrapping at the [-1, 1] border.
    pub fn advance(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
        if self.x < -1.0 {
            self.x = 1.0;
        }
        if self.x > 1.0 {
            self.x = -1.0;
        }
        if self.y < -1.0 {
            self.y = 1.0;
        }
        if self.y > 1.0 {
            self.y = -1.0;
        }
    }

    /// Flicker multiplier at `time_ms`, in [0, 1].
    pub fn flicker(&self, time_ms: f64) -> f64 {
        0.5 + 0.5 * (time_ms * 0.001 * self.speed + self.phase).sin()
    }
}

/// Seeded field of drifting dust motes.
#[derive(Clone, Debug)]
pub struct ParticleField {
    particles: Vec<Particle>,
}

impl ParticleField {
    /// Generate `count` particles deterministically from `seed`.
    pub fn new(count: usize, seed: u64) -> Self {
        let mut rng = Rng64::new(seed);
        let particles = (0..count)
            .map(|_| Particle {
                x: rng.next_f64_01() * 2.0 - 1.0,
                y: rng.next_f64_01() * 2.0 - 1.0,
                vx: (rng.next_f64_01() - 0.5) * 0.0004,
                vy: (rng.next_f64_01() - 0.5) * 0.0004,
                size: 0.8 + rng.next_f64_01() * 2.2,
                opacity: 0.12 + rng.next_f64_01() * 0.45,
                phase: rng.next_f64_01() * std::f64::consts::TAU,
                speed: 0.4 + rng.next_f64_01() * 1.2,
            })
            .collect();
        Self { particles }
    }

    /// Advance every particle by one tick.
    pub fn step(&mut self) {
        for p in &mut self.particles {
            p.advance();
        }
    }

    /// Borrow the motes.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of motes in the field.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the field has no motes.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/particles.rs"]
mod tests;
