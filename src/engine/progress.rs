//! Progress reporting and cooperative cancellation.
//!
//! The engine never spawns its own UI: callers observe a search through a
//! [`ProgressListener`], which doubles as the cancellation channel. Listeners
//! are polled at coarse checkpoints (pool-construction milestones, the start
//! of a search, every generation boundary); returning `false` requests
//! cancellation, honored at the next checkpoint.

/// Receives progress reports from pool construction and the search engine.
pub trait ProgressListener: Send + Sync {
    /// Reports progress as a percentage in `[0, 100]` and a human-readable
    /// message. Returns `false` to request cancellation.
    fn report(&self, percentage: f64, message: &str) -> bool;
}

impl<F> ProgressListener for F
where
    F: Fn(f64, &str) -> bool + Send + Sync,
{
    fn report(&self, percentage: f64, message: &str) -> bool {
        self(percentage, message)
    }
}

/// A listener that discards all reports and never cancels.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

impl ProgressListener for SilentProgress {
    fn report(&self, _percentage: f64, _message: &str) -> bool {
        true
    }
}
