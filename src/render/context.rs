use crate::foundation::core::{Fps, FrameIndex, Resolution, Rgb8, Rounding};
use crate::foundation::error::ReelResult;
use crate::model::notes::NoteList;
use crate::model::settings::RenderSettings;
use crate::render::buffer::FrameBuffer;
use crate::stage::phase::Phase;
use crate::stage::registry::{Stages, run_phase};
use std::sync::Arc;

/// Length of the rendered timeline and its pre-roll.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timeline {
    /// Total output frames, pre-roll included.
    pub running_frames: u64,
    /// Pause before content starts, in seconds.
    pub pause_start_secs: f64,
    /// How the raw-minus-intro frame offset is turned into an integer.
    pub frame_rounding: Rounding,
}

impl Timeline {
    /// Derive the timeline from the settings' pauses and the last note end.
    pub fn from_notes(settings: &RenderSettings, notes: &NoteList) -> ReelResult<Self> {
        let fps = settings.fps()?;
        let t = &settings.timeline;
        let secs = t.pause_start + notes.end_time() + t.pause_end;
        Ok(Self {
            running_frames: fps.secs_to_frames_ceil(secs),
            pause_start_secs: t.pause_start,
            frame_rounding: t.frame_rounding,
        })
    }

    /// Pre-roll length in (possibly fractional) frames.
    pub fn intro_frames(&self, fps: Fps) -> f64 {
        self.pause_start_secs * fps.as_f64()
    }

    /// Effective frame index for `raw`; negative during the pre-roll.
    pub fn effective_frame(&self, raw: FrameIndex, fps: Fps) -> i64 {
        self.frame_rounding
            .apply(raw.0 as f64 - self.intro_frames(fps))
    }
}

/// Shared mutable state handed to every operation during one export.
pub struct RenderContext {
    settings: Arc<RenderSettings>,
    pub resolution: Resolution,
    pub fps: Fps,
    pub background: Rgb8,
    pub timeline: Timeline,
    pub stages: Stages,

    raw_frame: FrameIndex,
    frame: i64,
    image: FrameBuffer,
}

impl RenderContext {
    /// Validate `settings` and build a context with empty stages.
    pub fn new(settings: Arc<RenderSettings>, timeline: Timeline) -> ReelResult<Self> {
        settings.validate()?;
        let resolution = settings.output.resolution;
        let fps = settings.fps()?;
        let background = settings.output.background;
        Ok(Self {
            image: FrameBuffer::new(resolution, background),
            settings,
            resolution,
            fps,
            background,
            timeline,
            stages: Stages::new(),
            raw_frame: FrameIndex(0),
            frame: 0,
        })
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn shared_settings(&self) -> Arc<RenderSettings> {
        Arc::clone(&self.settings)
    }

    /// Raw output frame counter.
    pub fn raw_frame(&self) -> FrameIndex {
        self.raw_frame
    }

    /// Effective frame index (raw counter shifted by the pre-roll). May be negative.
    pub fn frame(&self) -> i64 {
        self.frame
    }

    /// Content time of the effective frame in seconds. Negative during the pre-roll.
    pub fn time_secs(&self) -> f64 {
        self.fps.frames_to_secs(self.frame)
    }

    pub fn image(&self) -> &FrameBuffer {
        &self.image
    }

    pub fn image_mut(&mut self) -> &mut FrameBuffer {
        &mut self.image
    }

    /// Run every operation registered for `phase`.
    pub fn run_phase(&mut self, phase: Phase) -> ReelResult<()> {
        run_phase(self, phase)
    }

    /// Advance to `raw`: set both frame counters and blank the image.
    ///
    /// An image replaced by an operation with one of another size is reallocated at the output
    /// resolution.
    pub(crate) fn begin_frame(&mut self, raw: FrameIndex) {
        self.raw_frame = raw;
        self.frame = self.timeline.effective_frame(raw, self.fps);
        if self.image.width() == self.resolution.width
            && self.image.height() == self.resolution.height
        {
            self.image.reset(self.background);
        } else {
            self.image = FrameBuffer::new(self.resolution, self.background);
        }
    }
}

impl std::fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("resolution", &self.resolution)
            .field("fps", &self.fps)
            .field("timeline", &self.timeline)
            .field("stages", &self.stages)
            .field("raw_frame", &self.raw_frame)
            .field("frame", &self.frame)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/context.rs"]
mod tests;
