use crate::animation::curve::{ProgressCurve, dolly_curve, opening_curve};
use crate::animation::timer::phase_progress;
use crate::foundation::error::{IrisgateError, IrisgateResult};

/// Lifecycle of the intro cinematic.
///
/// Exactly one phase is active at a time. The one-shot completion flag of
/// each animated phase lives inside its variant, so re-entering a phase
/// re-arms the event by construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Phase {
    /// Black screen before the eye starts to open.
    Idle,
    /// The eyelid opening beats are playing.
    Opening {
        /// Whether [`PhaseEvent::EyeOpened`] has been reported.
        fired: bool,
    },
    /// The dolly zoom into the pupil is playing.
    Transitioning {
        /// Whether [`PhaseEvent::ZoomComplete`] has been reported.
        fired: bool,
    },
    /// The cinematic is done; frames keep rendering at terminal values.
    Complete,
}

impl Phase {
    /// Fresh `Opening` state with its one-shot event armed.
    pub fn opening() -> Self {
        Self::Opening { fired: false }
    }

    /// Fresh `Transitioning` state with its one-shot event armed.
    pub fn transitioning() -> Self {
        Self::Transitioning { fired: false }
    }
}

/// One-shot notifications reported by [`PhaseController::tick`].
///
/// Each event is reported at most once per phase activation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseEvent {
    /// The opening phase reached raw progress 1.0.
    EyeOpened,
    /// The transition phase reached raw progress 1.0.
    ZoomComplete,
}

/// Per-tick snapshot of the controller.
///
/// `openness` and `dolly` latch at their last computed values once their
/// phase is left, so later phases render a consistent picture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseTick {
    /// Phase after the tick (one-shot flags included).
    pub phase: Phase,
    /// Raw progress of the active animated phase, 0 outside them.
    pub raw: f64,
    /// Eyelid openness in [0, 1].
    pub openness: f64,
    /// Dolly progress in [0, 1].
    pub dolly: f64,
    /// Event crossed on this tick, if any.
    pub event: Option<PhaseEvent>,
}

/// Owns phase state and timing and turns timestamps into animation scalars.
///
/// Phase changes are externally driven via [`set_phase`](Self::set_phase);
/// the controller never advances phases on its own.
pub struct PhaseController {
    phase: Phase,
    entered_at_ms: f64,
    opening_ms: f64,
    transition_ms: f64,
    openness: f64,
    dolly: f64,
    opening: ProgressCurve,
    dolly_curve: ProgressCurve,
}

impl PhaseController {
    /// Build a controller with the two animated phase durations.
    pub fn new(opening_ms: f64, transition_ms: f64) -> IrisgateResult<Self> {
        if !opening_ms.is_finite() || opening_ms <= 0.0 {
            return Err(IrisgateError::validation("opening duration must be > 0"));
        }
        if !transition_ms.is_finite() || transition_ms <= 0.0 {
            return Err(IrisgateError::validation("transition duration must be > 0"));
        }
        Ok(Self {
            phase: Phase::Idle,
            entered_at_ms: 0.0,
            opening_ms,
            transition_ms,
            openness: 0.0,
            dolly: 0.0,
            opening: opening_curve(),
            dolly_curve: dolly_curve(),
        })
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Switch phases, recording `now_ms` as the new phase's start time.
    pub fn set_phase(&mut self, phase: Phase, now_ms: f64) {
        self.phase = phase;
        self.entered_at_ms = now_ms;
    }

    /// Advance to `now_ms` and report the crossed event, if any.
    #[tracing::instrument(skip(self))]
    pub fn tick(&mut self, now_ms: f64) -> PhaseTick {
        let mut event = None;
        let mut raw = 0.0;
        match self.phase {
            Phase::Opening { fired } => {
                raw = phase_progress(now_ms, self.entered_at_ms, self.opening_ms);
                self.openness = self.opening.value_at(raw);
                if raw >= 1.0 && !fired {
                    self.phase = Phase::Opening { fired: true };
                    event = Some(PhaseEvent::EyeOpened);
                }
            }
            Phase::Transitioning { fired } => {
                raw = phase_progress(now_ms, self.entered_at_ms, self.transition_ms);
                self.dolly = self.dolly_curve.value_at(raw);
                if raw >= 1.0 && !fired {
                    self.phase = Phase::Transitioning { fired: true };
                    event = Some(PhaseEvent::ZoomComplete);
                }
            }
            Phase::Idle | Phase::Complete => {}
        }
        PhaseTick {
            phase: self.phase,
            raw,
            openness: self.openness,
            dolly: self.dolly,
            event,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/phase/controller.rs"]
mod tests;
