//! Progress reporting for long loops (frame export, cache builds).

/// Observer of a counted loop.
///
/// `update` receives a monotonically increasing `done` out of `total`; `finish` is called once
/// with a completion message.
pub trait Progress {
    fn update(&mut self, done: u64, total: u64);
    fn finish(&mut self, message: &str);
}

/// Reports through `tracing`: every update at debug level, each crossed 10% step at info level.
#[derive(Debug)]
pub struct TracingProgress {
    label: String,
    last_step: u64,
}

impl TracingProgress {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            last_step: 0,
        }
    }
}

impl Progress for TracingProgress {
    fn update(&mut self, done: u64, total: u64) {
        tracing::debug!(label = %self.label, done, total, "progress");
        if total == 0 {
            return;
        }
        let step = done.saturating_mul(10) / total;
        if step > self.last_step {
            self.last_step = step;
            tracing::info!("{}: {}% ({done}/{total})", self.label, step * 10);
        }
    }

    fn finish(&mut self, message: &str) {
        tracing::info!("{}: {message}", self.label);
    }
}

/// Discards all progress.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn update(&mut self, _done: u64, _total: u64) {}

    fn finish(&mut self, _message: &str) {}
}
