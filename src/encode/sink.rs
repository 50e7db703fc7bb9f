use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::ReelResult;

/// Configuration provided to a [`FrameSink`] when an export starts.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
}

/// One finished frame as tightly packed RGB8, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGB {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl FrameRGB {
    /// All-black frame of the given size.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 3],
        }
    }
}

/// Sink contract for consuming rendered frames in timeline order.
///
/// `begin` is called once before any frame, `push_frame` once per frame with strictly increasing
/// indices, and `end` exactly once after a successful `begin`, also when the export failed midway.
pub trait FrameSink: Send {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()>;
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGB) -> ReelResult<()>;
    fn end(&mut self) -> ReelResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGB)>,
    begin_calls: u32,
    end_calls: u32,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Captured frames, in arrival order.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGB)] {
        &self.frames
    }

    pub fn begin_calls(&self) -> u32 {
        self.begin_calls
    }

    pub fn end_calls(&self) -> u32 {
        self.end_calls
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.begin_calls += 1;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGB) -> ReelResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> ReelResult<()> {
        self.end_calls += 1;
        Ok(())
    }
}
