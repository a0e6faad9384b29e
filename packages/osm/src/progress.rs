//! Progress reporting for the element readers.
//!
//! The readers only know how to tick; rendering lives with whichever
//! binary supplies the [`ProgressCallback`].

/// Receives progress from a running reader.
pub trait ProgressCallback: Send + Sync {
    /// Update the message displayed alongside the progress indicator.
    fn set_message(&self, msg: String);

    /// Advance progress by `delta` elements.
    fn inc(&self, delta: u64);

    /// Mark progress as complete with a final message.
    fn finish(&self, msg: String);
}

/// Ignores all progress updates.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_message(&self, _msg: String) {}
    fn inc(&self, _delta: u64) {}
    fn finish(&self, _msg: String) {}
}
