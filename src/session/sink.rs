use std::path::PathBuf;

use anyhow::Context as _;

use crate::foundation::error::IrisgateResult;
use crate::render::frame::FrameRGBA;

/// Configuration provided to a [`FrameSink`] at the start of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in physical pixels.
    pub width: u32,
    /// Output height in physical pixels.
    pub height: u32,
}

/// Sink contract for consuming rendered frames in timeline order.
///
/// Ordering contract: `push_frame` is called with strictly increasing `seq`
/// and non-decreasing `time_ms` within one run.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> IrisgateResult<()>;
    /// Push one frame in timeline order.
    fn push_frame(&mut self, seq: u64, time_ms: f64, frame: &FrameRGBA) -> IrisgateResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> IrisgateResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(f64, FrameRGBA)>,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Borrow the captured frames, in timeline order.
    pub fn frames(&self) -> &[(f64, FrameRGBA)] {
        &self.frames
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> IrisgateResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, _seq: u64, time_ms: f64, frame: &FrameRGBA) -> IrisgateResult<()> {
        self.frames.push((time_ms, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> IrisgateResult<()> {
        Ok(())
    }
}

/// Sink writing `frame_00000.png`-style files into a directory.
///
/// Frames arrive premultiplied; pixels are converted back to straight alpha
/// before encoding since PNG stores non-premultiplied color.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    written: u64,
}

impl PngSequenceSink {
    /// Write frames into `dir`, creating it on `begin`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: 0,
        }
    }

    /// Number of frames written so far.
    pub fn written(&self) -> u64 {
        self.written
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, _cfg: SinkConfig) -> IrisgateResult<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create output dir '{}'", self.dir.display()))?;
        self.written = 0;
        Ok(())
    }

    fn push_frame(&mut self, seq: u64, _time_ms: f64, frame: &FrameRGBA) -> IrisgateResult<()> {
        let path = self.dir.join(format!("frame_{seq:05}.png"));
        let data = frame.straight_alpha_data();
        image::save_buffer_with_format(
            &path,
            &data,
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> IrisgateResult<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/sink.rs"]
mod tests;
