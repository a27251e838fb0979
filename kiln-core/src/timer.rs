//! Wall-clock timing

use std::time::Instant;

/// A stopwatch started at creation.
///
/// Timestamps are milliseconds since the Unix epoch; elapsed time is measured
/// with a monotonic clock so that `finish_ts - start_ts == duration`.
#[derive(Clone, Debug)]
pub struct Timer {
    started: Instant,
    start_ts: f64,
    finish_ts: Option<f64>,
    duration: Option<f64>,
}

impl Default for Timer {
    fn default() -> Self {
        Self::start()
    }
}

impl Timer {
    /// Starts a new timer.
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            start_ts: now_ms(),
            finish_ts: None,
            duration: None,
        }
    }

    /// Stops the timer, freezing the finish timestamp and duration, and returns
    /// the duration in milliseconds. Stopping again re-measures from the start.
    pub fn stop(&mut self) -> f64 {
        let elapsed = self.started.elapsed().as_secs_f64() * 1000.0;
        self.finish_ts = Some(self.start_ts + elapsed);
        self.duration = Some(elapsed);
        elapsed
    }

    /// Stops the timer and returns the duration formatted for display.
    pub fn stop_formatted(&mut self) -> String {
        format_duration_ms(self.stop())
    }

    /// Returns the start timestamp.
    pub const fn start_ts(&self) -> f64 {
        self.start_ts
    }

    /// Returns the finish timestamp, if the timer has been stopped.
    pub const fn finish_ts(&self) -> Option<f64> {
        self.finish_ts
    }

    /// Returns the measured duration in milliseconds, if the timer has been stopped.
    pub const fn duration(&self) -> Option<f64> {
        self.duration
    }
}

#[allow(clippy::cast_precision_loss)]
fn now_ms() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1000.0
}

/// Format the given duration in milliseconds with two decimals.
///
/// # Arguments
///
/// * `duration_ms` - The duration to format, in milliseconds.
pub fn format_duration_ms(duration_ms: f64) -> String {
    format!("{duration_ms:.2}ms")
}
