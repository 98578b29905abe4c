use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{CaptionError, CaptionResult};

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
}

impl SinkConfig {
    pub(crate) fn check_frame(&self, frame: &image::RgbImage) -> CaptionResult<()> {
        let (w, h) = frame.dimensions();
        if (w, h) != (self.width, self.height) {
            return Err(CaptionError::validation(format!(
                "frame size mismatch: got {w}x{h}, expected {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Sink contract for consuming finished frames in order.
///
/// `push_frame` is called in strictly increasing `FrameIndex` order between `begin` and `end`.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> CaptionResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &image::RgbImage) -> CaptionResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> CaptionResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, image::RgbImage)>,
    finished: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured frames in push order.
    pub fn frames(&self) -> &[(FrameIndex, image::RgbImage)] {
        &self.frames
    }

    /// Whether `end` was called after the last `begin`.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> CaptionResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &image::RgbImage) -> CaptionResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| CaptionError::encode("in-memory sink not started"))?;
        if let Some((last, _)) = self.frames.last()
            && idx <= *last
        {
            return Err(CaptionError::encode("sink received out-of-order frame index"));
        }
        cfg.check_frame(frame)?;
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> CaptionResult<()> {
        if self.cfg.is_none() {
            return Err(CaptionError::encode("in-memory sink not started"));
        }
        self.finished = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
