use crate::foundation::core::Viewport;
use crate::foundation::error::{IrisgateError, IrisgateResult};
use crate::phase::controller::{Phase, PhaseController, PhaseEvent};
use crate::render::cpu::CpuSceneRenderer;
use crate::render::frame::FrameRGBA;
use crate::scene::eye::{EyeScene, SceneFrame};
use crate::session::scheduler::FrameScheduler;
use crate::session::sink::{FrameSink, SinkConfig};

/// Knobs for a full intro run. All times are in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct IntroOpts {
    /// Logical surface width.
    pub width: u32,
    /// Logical surface height.
    pub height: u32,
    /// Device pixel ratio; capped by the viewport.
    pub device_pixel_ratio: f64,
    /// Seed for particle drift and vein jitter.
    pub seed: u64,
    /// Duration of the eyelid opening phase.
    pub opening_ms: f64,
    /// Duration of the dolly zoom phase.
    pub transition_ms: f64,
    /// Black hold before the eye starts to open.
    pub start_delay_ms: f64,
    /// Hold on the open eye before the dolly starts.
    pub handoff_delay_ms: f64,
    /// Number of dust motes in the scene.
    pub particle_count: usize,
}

impl Default for IntroOpts {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            device_pixel_ratio: 1.0,
            seed: 0,
            opening_ms: 2600.0,
            transition_ms: 3200.0,
            start_delay_ms: 600.0,
            handoff_delay_ms: 600.0,
            particle_count: 90,
        }
    }
}

impl IntroOpts {
    /// Viewport described by the surface fields.
    pub fn viewport(&self) -> IrisgateResult<Viewport> {
        Viewport::new(self.width, self.height, self.device_pixel_ratio)
    }

    /// Check every field without building a session.
    pub fn validate(&self) -> IrisgateResult<()> {
        self.viewport()?;
        PhaseController::new(self.opening_ms, self.transition_ms)?;
        for (name, delay) in [
            ("start_delay_ms", self.start_delay_ms),
            ("handoff_delay_ms", self.handoff_delay_ms),
        ] {
            if !delay.is_finite() || delay < 0.0 {
                return Err(IrisgateError::validation(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }

    /// Wall-clock length of an undisturbed run, first tick to completion.
    pub fn total_duration_ms(&self) -> f64 {
        self.start_delay_ms + self.opening_ms + self.handoff_delay_ms + self.transition_ms
    }
}

/// Everything produced by one [`IntroSession::tick`].
#[derive(Clone, Debug)]
pub struct IntroTick {
    /// Rasterized output frame.
    pub frame: FrameRGBA,
    /// Scene scalars the frame was drawn from.
    pub scene_frame: SceneFrame,
    /// Phase after the tick.
    pub phase: Phase,
    /// Event crossed on this tick, if any.
    pub event: Option<PhaseEvent>,
    /// Whether the cinematic has fully played out.
    pub done: bool,
}

/// Summary of a driven run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Frames pushed to the sink.
    pub frames_rendered: u64,
    /// Whether the opening phase completed.
    pub eye_opened: bool,
    /// Whether the dolly zoom completed.
    pub zoom_completed: bool,
}

/// Orchestrates the whole intro: phase timing, scene state, rasterization
/// and the delayed phase handoffs.
///
/// The session is clock-agnostic. Feed it timestamps via [`tick`](Self::tick)
/// or drive it wholesale with [`run`](Self::run); the first tick's timestamp
/// anchors the start delay.
pub struct IntroSession {
    opts: IntroOpts,
    controller: PhaseController,
    scene: EyeScene,
    renderer: CpuSceneRenderer,
    pending: Option<(f64, Phase)>,
    started_at_ms: Option<f64>,
    done: bool,
    on_eye_opened: Option<Box<dyn FnMut()>>,
    on_zoom_complete: Option<Box<dyn FnMut()>>,
}

impl IntroSession {
    /// Build a session after validating `opts`.
    pub fn new(opts: IntroOpts) -> IrisgateResult<Self> {
        opts.validate()?;
        let viewport = opts.viewport()?;
        Ok(Self {
            opts,
            controller: PhaseController::new(opts.opening_ms, opts.transition_ms)?,
            scene: EyeScene::new(viewport, opts.particle_count, opts.seed),
            renderer: CpuSceneRenderer::new(viewport)?,
            pending: None,
            started_at_ms: None,
            done: false,
            on_eye_opened: None,
            on_zoom_complete: None,
        })
    }

    /// Options the session was built with.
    pub fn opts(&self) -> IntroOpts {
        self.opts
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    /// Whether the cinematic has fully played out.
    pub fn done(&self) -> bool {
        self.done
    }

    /// Call `f` once when the opening phase completes.
    pub fn on_eye_opened(&mut self, f: impl FnMut() + 'static) {
        self.on_eye_opened = Some(Box::new(f));
    }

    /// Call `f` once when the dolly zoom completes.
    pub fn on_zoom_complete(&mut self, f: impl FnMut() + 'static) {
        self.on_zoom_complete = Some(Box::new(f));
    }

    /// Force a phase change now. Any scheduled handoff is dropped.
    pub fn set_phase(&mut self, phase: Phase, now_ms: f64) {
        self.pending = None;
        self.controller.set_phase(phase, now_ms);
    }

    /// Adopt a new surface size between frames. Scene accumulators and the
    /// phase clock carry over.
    pub fn resize(
        &mut self,
        width: u32,
        height: u32,
        device_pixel_ratio: f64,
    ) -> IrisgateResult<()> {
        let viewport = Viewport::new(width, height, device_pixel_ratio)?;
        self.renderer.resize(viewport)?;
        self.scene.resize(viewport);
        self.opts.width = width;
        self.opts.height = height;
        self.opts.device_pixel_ratio = device_pixel_ratio;
        Ok(())
    }

    /// Advance the cinematic to `now_ms` and rasterize the frame.
    ///
    /// The first tick arms the start delay; later ticks execute scheduled
    /// phase handoffs, forward one-shot events to the callbacks and latch
    /// `done` once the zoom completes.
    #[tracing::instrument(skip(self))]
    pub fn tick(&mut self, now_ms: f64) -> IrisgateResult<IntroTick> {
        if !now_ms.is_finite() {
            return Err(IrisgateError::validation("tick timestamp must be finite"));
        }
        if self.started_at_ms.is_none() {
            self.started_at_ms = Some(now_ms);
            if self.controller.phase() == Phase::Idle {
                self.pending = Some((now_ms + self.opts.start_delay_ms, Phase::opening()));
            }
        }
        if let Some((at_ms, phase)) = self.pending {
            if now_ms >= at_ms {
                self.pending = None;
                self.controller.set_phase(phase, now_ms);
            }
        }

        let phase_tick = self.controller.tick(now_ms);
        match phase_tick.event {
            Some(PhaseEvent::EyeOpened) => {
                self.pending = Some((now_ms + self.opts.handoff_delay_ms, Phase::transitioning()));
                if let Some(cb) = self.on_eye_opened.as_mut() {
                    cb();
                }
            }
            Some(PhaseEvent::ZoomComplete) => {
                self.controller.set_phase(Phase::Complete, now_ms);
                self.done = true;
                if let Some(cb) = self.on_zoom_complete.as_mut() {
                    cb();
                }
            }
            None => {}
        }

        let scene_frame = self.scene.advance(now_ms, &phase_tick);
        let frame = self.renderer.render_frame(&self.scene, &scene_frame)?;
        Ok(IntroTick {
            frame,
            scene_frame,
            phase: self.controller.phase(),
            event: phase_tick.event,
            done: self.done,
        })
    }

    /// Drain `scheduler`, pushing every rendered frame into `sink`.
    ///
    /// The run ends when the scheduler is exhausted or on the first tick
    /// that completes the cinematic, whichever comes first.
    #[tracing::instrument(skip(self, scheduler, sink))]
    pub fn run(
        &mut self,
        scheduler: &mut dyn FrameScheduler,
        sink: &mut dyn FrameSink,
    ) -> IrisgateResult<RunStats> {
        let viewport = self.renderer.viewport();
        sink.begin(SinkConfig {
            width: viewport.physical_width(),
            height: viewport.physical_height(),
        })?;

        let mut stats = RunStats::default();
        while let Some(now_ms) = scheduler.next_frame() {
            let tick = self.tick(now_ms)?;
            sink.push_frame(stats.frames_rendered, now_ms, &tick.frame)?;
            stats.frames_rendered += 1;
            match tick.event {
                Some(PhaseEvent::EyeOpened) => stats.eye_opened = true,
                Some(PhaseEvent::ZoomComplete) => stats.zoom_completed = true,
                None => {}
            }
            if tick.done {
                scheduler.cancel();
            }
        }
        sink.end()?;
        Ok(stats)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/intro.rs"]
mod tests;
