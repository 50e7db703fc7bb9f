use crate::encode::sink::{FrameRGB, FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ReelError, ReelResult};
use crate::progress::Progress;
use crate::render::context::RenderContext;
use crate::stage::phase::Phase;

/// Export statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ExportStats {
    /// Frames in the timeline.
    pub frames_total: u64,
    /// Frames handed to the sink.
    pub frames_written: u64,
    /// Pre-roll length in (possibly fractional) frames.
    pub intro_frames: f64,
}

/// Render the whole timeline of `ctx` into `sink`.
///
/// Pipeline:
/// 1. the `init` phase, once
/// 2. [`FrameSink::begin`]
/// 3. for each raw frame in `0..timeline.running_frames`: set the frame counters, blank the image,
///    run `frame_init`, `frame`, `frame_deinit`, `modifiers`, convert BGR to RGB and push the
///    frame
/// 4. [`FrameSink::end`], which runs even when step 3 failed
///
/// The first failure aborts the export; an error from the frame loop takes precedence over one
/// from closing the sink.
#[tracing::instrument(skip_all, fields(frames = ctx.timeline.running_frames))]
pub fn export(
    ctx: &mut RenderContext,
    sink: &mut dyn FrameSink,
    progress: &mut dyn Progress,
) -> ReelResult<ExportStats> {
    ctx.run_phase(Phase::Init)?;

    let total = ctx.timeline.running_frames;
    let intro_frames = ctx.timeline.intro_frames(ctx.fps);
    tracing::info!(
        width = ctx.resolution.width,
        height = ctx.resolution.height,
        fps = ctx.fps.as_f64(),
        intro_frames,
        "exporting {total} frames"
    );

    sink.begin(SinkConfig {
        width: ctx.resolution.width,
        height: ctx.resolution.height,
        fps: ctx.fps,
    })?;
    let streamed = stream_frames(ctx, sink, progress, total);
    let closed = sink.end();
    let frames_written = streamed?;
    closed?;

    progress.finish(&format!("finished exporting {frames_written} frames"));
    Ok(ExportStats {
        frames_total: total,
        frames_written,
        intro_frames,
    })
}

fn stream_frames(
    ctx: &mut RenderContext,
    sink: &mut dyn FrameSink,
    progress: &mut dyn Progress,
    total: u64,
) -> ReelResult<u64> {
    let mut out = FrameRGB::blank(ctx.resolution.width, ctx.resolution.height);
    let mut written = 0u64;
    for raw in 0..total {
        let idx = FrameIndex(raw);
        ctx.begin_frame(idx);
        for phase in Phase::PER_FRAME {
            ctx.run_phase(phase)?;
        }
        let image = ctx.image();
        if image.width() != out.width || image.height() != out.height {
            return Err(ReelError::FrameSize {
                width: image.width(),
                height: image.height(),
                expected_width: out.width,
                expected_height: out.height,
            });
        }
        image.write_rgb(&mut out.data);
        sink.push_frame(idx, &out)?;
        written += 1;
        progress.update(written, total);
    }
    Ok(written)
}

#[cfg(test)]
#[path = "../../tests/unit/render/export.rs"]
mod tests;
