use crate::animation::curve::{
    fade_to_black, fov_multiplier, particle_alpha, red_flash, scan_line_alpha, zoom_scale,
};
use crate::foundation::core::Viewport;
use crate::foundation::math::Rng64;
use crate::phase::controller::PhaseTick;
use crate::scene::geometry::EyeGeometry;
use crate::scene::particles::ParticleField;
use crate::scene::veins::VeinLayout;

/// Everything the renderer needs to draw one frame.
///
/// Recomputed on every tick; only the scene accumulators behind it persist.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneFrame {
    /// Tick timestamp in milliseconds.
    pub time_ms: f64,
    /// Eyelid openness in [0, 1].
    pub openness: f64,
    /// Dolly progress in [0, 1].
    pub dolly: f64,
    /// Camera push scale, 1 to 81.
    pub zoom_scale: f64,
    /// Vertical FOV stretch, 1 to 1.6.
    pub fov_multiplier: f64,
    /// Red flash overlay strength, peaking at 0.08 mid-dolly.
    pub red_flash: f64,
    /// Terminal fade overlay strength in [0, 1].
    pub fade_to_black: f64,
    /// Dust visibility in [0, 1].
    pub particle_alpha: f64,
    /// Scan-line overlay strength.
    pub scan_line_alpha: f64,
    /// Accumulated iris rotation in radians.
    pub iris_angle: f64,
}

/// Mutable scene state: eye proportions, dust field, vein bed, and the
/// slowly rotating iris.
pub struct EyeScene {
    geometry: EyeGeometry,
    particles: ParticleField,
    veins: VeinLayout,
    iris_angle: f64,
}

impl EyeScene {
    /// Build the scene for a viewport, seeding all procedural content.
    pub fn new(viewport: Viewport, particle_count: usize, seed: u64) -> Self {
        let mut rng = Rng64::new(seed);
        let particle_seed = rng.next_u64();
        let vein_seed = rng.next_u64();
        Self {
            geometry: EyeGeometry::from_viewport(viewport),
            particles: ParticleField::new(particle_count, particle_seed),
            veins: VeinLayout::generate(vein_seed),
            iris_angle: 0.0,
        }
    }

    /// Adopt a new surface size, preserving animation accumulators.
    ///
    /// Particles and veins live in normalized space and are untouched.
    pub fn resize(&mut self, viewport: Viewport) {
        self.geometry = EyeGeometry::from_viewport(viewport);
    }

    /// Advance one tick and snapshot the frame state.
    #[tracing::instrument(skip(self, tick))]
    pub fn advance(&mut self, time_ms: f64, tick: &PhaseTick) -> SceneFrame {
        self.particles.step();
        self.iris_angle += 0.0002;

        let openness = tick.openness;
        let dolly = tick.dolly;
        SceneFrame {
            time_ms,
            openness,
            dolly,
            zoom_scale: zoom_scale(dolly),
            fov_multiplier: fov_multiplier(dolly),
            red_flash: red_flash(dolly),
            fade_to_black: fade_to_black(dolly),
            particle_alpha: particle_alpha(openness, dolly),
            scan_line_alpha: scan_line_alpha(openness, dolly),
            iris_angle: self.iris_angle,
        }
    }

    /// Current eye proportions.
    pub fn geometry(&self) -> EyeGeometry {
        self.geometry
    }

    /// Borrow the dust field.
    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    /// Borrow the vein bed.
    pub fn veins(&self) -> &VeinLayout {
        &self.veins
    }
}
