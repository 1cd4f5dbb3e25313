//! Irisgate is a deterministic eye-opening cinematic renderer: a red eye
//! blinks open on a black screen, holds, then the camera dolly-zooms into
//! the pupil until the frame fades out.
//!
//! # Pipeline overview
//!
//! 1. **Phase**: `PhaseController + timestamp -> PhaseTick` (which beat of the cinematic is playing)
//! 2. **Scene**: `EyeScene + PhaseTick -> SceneFrame` (animation scalars plus procedural scene state)
//! 3. **Plan**: `SceneFrame -> [DrawLayer]` (visibility-culled paint order)
//! 4. **Render**: `[DrawLayer] -> FrameRGBA` (CPU rasterization via `vello_cpu`)
//! 5. **Drive** (optional): [`IntroSession`] pulls timestamps from a [`FrameScheduler`] and streams
//!    frames into a [`FrameSink`]
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: a seed plus a timestamp stream fully determines every pixel.
//! - **Clock-agnostic**: nothing reads wall time; callers feed timestamps in.
//! - **Premultiplied RGBA8** end-to-end: the renderer outputs premultiplied pixels.
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(missing_docs_in_private_items)]

mod animation;
mod foundation;
mod phase;
mod render;
mod scene;
mod session;

pub use animation::curve::{
    CurveSegment, ProgressCurve, dolly_curve, fade_to_black, fov_multiplier, opening_curve,
    particle_alpha, red_flash, scan_line_alpha, zoom_scale,
};
pub use animation::ease::Ease;
pub use animation::timer::phase_progress;
pub use foundation::core::{Affine, MAX_PIXEL_RATIO, Point, Vec2, Viewport};
pub use foundation::error::{IrisgateError, IrisgateResult};
pub use phase::controller::{Phase, PhaseController, PhaseEvent, PhaseTick};
pub use render::cpu::CpuSceneRenderer;
pub use render::frame::FrameRGBA;
pub use render::layers::{DrawLayer, LayerKind, Space, layer_plan};
pub use scene::eye::{EyeScene, SceneFrame};
pub use scene::geometry::{EyeGeometry, LidGeometry, zoom_about};
pub use scene::particles::{Particle, ParticleField};
pub use scene::veins::{Vein, VeinBranch, VeinLayout};
pub use session::intro::{IntroOpts, IntroSession, IntroTick, RunStats};
pub use session::scheduler::{FixedStepScheduler, FrameScheduler, ManualScheduler};
pub use session::sink::{FrameSink, InMemorySink, PngSequenceSink, SinkConfig};
