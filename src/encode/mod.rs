//! Encoding sinks.
//!
//! Sinks consume finished frames in timeline order and are driven by [`crate::export`].

/// `ffmpeg`-based MP4 sink (system `ffmpeg`).
pub mod ffmpeg;
/// PNG image-sequence sink.
pub mod png;
/// Generic frame sink trait and the in-memory sink.
pub mod sink;
