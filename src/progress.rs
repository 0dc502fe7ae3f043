// src/progress.rs

//! Defines a trait for reporting progress of an analysis.
#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};
#[cfg(feature = "progress")]
use std::time::Duration;

/// A trait for reporting progress, abstracting over specific implementations like `indicatif`.
///
/// The total number of files is unknown until the walk ends, so reporters
/// count upwards instead of tracking a length.
///
/// # Examples
///
/// ```
/// use repodigest::progress::ProgressReporter;
/// use std::sync::Mutex;
///
/// struct MockProgress {
///     last_message: Mutex<String>,
///     count: Mutex<u64>,
/// }
/// impl ProgressReporter for MockProgress {
///     fn set_message(&self, msg: String) {
///         *self.last_message.lock().unwrap() = msg;
///     }
///     fn inc(&self, delta: u64) {
///         *self.count.lock().unwrap() += delta;
///     }
///     fn finish(&self) {}
///     fn finish_with_message(&self, msg: String) {
///         *self.last_message.lock().unwrap() = msg;
///     }
/// }
///
/// let reporter = MockProgress { last_message: Mutex::new(String::new()), count: Mutex::new(0) };
/// reporter.set_message("Fetching README...".to_string());
/// reporter.inc(2);
/// assert_eq!(*reporter.last_message.lock().unwrap(), "Fetching README...");
/// assert_eq!(*reporter.count.lock().unwrap(), 2);
/// ```
pub trait ProgressReporter: Send + Sync {
    /// Sets a descriptive message for the current step (e.g., "Fetching README...").
    fn set_message(&self, msg: String);
    /// Advances the processed-entry counter.
    fn inc(&self, delta: u64);
    /// Finishes the progress reporting, hiding the spinner.
    fn finish(&self);
    /// Finishes the progress reporting with a final message.
    fn finish_with_message(&self, msg: String);
}

/// A `ProgressReporter` that does nothing.
///
/// Used in tests, when stderr is not a terminal, and when the `progress`
/// feature is disabled.
pub struct NoOpProgress;

impl ProgressReporter for NoOpProgress {
    fn set_message(&self, _msg: String) {}
    fn inc(&self, _delta: u64) {}
    fn finish(&self) {}
    fn finish_with_message(&self, _msg: String) {}
}

/// A spinner on stderr, using the `indicatif` crate.
#[cfg(feature = "progress")]
#[derive(Clone)]
pub struct IndicatifProgress {
    bar: ProgressBar,
}

#[cfg(feature = "progress")]
impl IndicatifProgress {
    /// Creates a new spinner with a default style.
    pub fn new() -> Self {
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {pos} entries  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(120));
        Self { bar: pb }
    }
}

#[cfg(feature = "progress")]
impl Default for IndicatifProgress {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "progress")]
impl ProgressReporter for IndicatifProgress {
    fn set_message(&self, msg: String) {
        self.bar.set_message(msg);
    }

    fn inc(&self, delta: u64) {
        self.bar.inc(delta);
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }

    fn finish_with_message(&self, msg: String) {
        self.bar.finish_with_message(msg);
    }
}

/// Returns a spinner when stderr is an interactive terminal, otherwise a no-op reporter.
pub fn terminal_reporter() -> Box<dyn ProgressReporter> {
    #[cfg(feature = "progress")]
    {
        if atty::is(atty::Stream::Stderr) {
            return Box::new(IndicatifProgress::new());
        }
    }
    Box::new(NoOpProgress)
}
