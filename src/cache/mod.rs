//! Effect precompute cache.
//!
//! Built once ahead of rendering from the note events, then replayed by render operations without
//! re-simulating anything.

pub mod build;
pub mod format;
pub mod reader;
pub mod simulate;

pub use build::{CacheSummary, build, build_with, dot_count, dot_time_increment};
pub use format::{CacheRecord, DotRecord};
pub use reader::DotCache;
pub use simulate::{DotSeed, RisingDrift, Trajectory};
