//! Pianoreel renders piano note timelines to video.
//!
//! Two pieces share one frame-indexed, append-only contract:
//!
//! - The staged export pipeline: operations register into fixed [`Phase`]s of a
//!   [`RenderContext`]; [`export`] runs `init` once, then `frame_init`, `frame`, `frame_deinit` and
//!   `modifiers` for every frame and streams each finished image into a [`FrameSink`].
//! - The effect precompute cache: [`cache::build`] simulates every note's smoke dots once and
//!   stores them in a compact binary layout that render operations replay through
//!   [`DotCache`].
#![forbid(unsafe_code)]

mod foundation;

pub mod cache;
/// Encoding sinks.
pub mod encode;
pub mod model;
/// Built-in render operations.
pub mod ops;
pub mod progress;
pub mod render;
pub mod stage;

pub use crate::foundation::core::{Fps, FrameIndex, Point, Rect, Resolution, Rgb8, Rounding, Vec2};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::cache::{CacheRecord, CacheSummary, DotCache, DotRecord};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::png::PngSequenceSink;
pub use crate::encode::sink::{FrameRGB, FrameSink, InMemorySink, SinkConfig};
pub use crate::model::keyboard::{KeyGeometry, KeySpan, PianoLayout};
pub use crate::model::notes::{NoteEvent, NoteList};
pub use crate::model::settings::RenderSettings;
pub use crate::ops::register_builtin;
pub use crate::progress::{NoProgress, Progress, TracingProgress};
pub use crate::render::buffer::FrameBuffer;
pub use crate::render::context::{RenderContext, Timeline};
pub use crate::render::export::{ExportStats, export};
pub use crate::stage::phase::Phase;
pub use crate::stage::registry::{FnOperation, Operation, Stages, op, run_phase};
