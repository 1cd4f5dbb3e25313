use std::collections::VecDeque;

use crate::foundation::error::{IrisgateError, IrisgateResult};

/// Source of frame timestamps for a driven run.
///
/// Timestamps are in milliseconds and must be non-decreasing; the session
/// consumes them until the stream ends or the run completes.
pub trait FrameScheduler {
    /// Next timestamp to render, or `None` when the stream is exhausted.
    fn next_frame(&mut self) -> Option<f64>;
    /// End the stream early; subsequent `next_frame` calls return `None`.
    fn cancel(&mut self);
}

/// Fixed-rate scheduler: frame `n` maps to `n * 1000 / fps` milliseconds.
///
/// `max_frames` is a hard stop so an unfinishable run cannot spin forever.
#[derive(Clone, Copy, Debug)]
pub struct FixedStepScheduler {
    fps: f64,
    frame: u64,
    max_frames: u64,
    cancelled: bool,
}

impl FixedStepScheduler {
    /// Build a scheduler emitting up to `max_frames` frames at `fps`.
    pub fn new(fps: f64, max_frames: u64) -> IrisgateResult<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(IrisgateError::validation("fps must be finite and > 0"));
        }
        if max_frames == 0 {
            return Err(IrisgateError::validation("max_frames must be > 0"));
        }
        Ok(Self {
            fps,
            frame: 0,
            max_frames,
            cancelled: false,
        })
    }

    /// Frames handed out so far.
    pub fn frames_emitted(&self) -> u64 {
        self.frame
    }
}

impl FrameScheduler for FixedStepScheduler {
    fn next_frame(&mut self) -> Option<f64> {
        if self.cancelled || self.frame >= self.max_frames {
            return None;
        }
        let t = self.frame as f64 * 1000.0 / self.fps;
        self.frame += 1;
        Some(t)
    }

    fn cancel(&mut self) {
        self.cancelled = true;
    }
}

/// Scheduler fed from an explicit list of timestamps.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    times: VecDeque<f64>,
}

impl ManualScheduler {
    /// Queue the given timestamps.
    pub fn new(times: impl IntoIterator<Item = f64>) -> Self {
        Self {
            times: times.into_iter().collect(),
        }
    }
}

impl FrameScheduler for ManualScheduler {
    fn next_frame(&mut self) -> Option<f64> {
        self.times.pop_front()
    }

    fn cancel(&mut self) {
        self.times.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/scheduler.rs"]
mod tests;
