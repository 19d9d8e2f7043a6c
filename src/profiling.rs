//! Rolling tick-duration statistics.

use std::time::Duration;

use circular_buffer::CircularBuffer;
use thousands::Separable;

/// Number of recent ticks kept.
const TIMING_WINDOW_SIZE: usize = 120;

/// The last [`TIMING_WINDOW_SIZE`] tick durations.
#[derive(Debug, Default)]
pub struct FrameStats {
    buffer: CircularBuffer<TIMING_WINDOW_SIZE, Duration>,
    total_ticks: u64,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, duration: Duration) {
        self.buffer.push_back(duration);
        self.total_ticks += 1;
    }

    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    pub fn most_recent(&self) -> Duration {
        self.buffer.back().copied().unwrap_or(Duration::ZERO)
    }

    /// Mean and sample standard deviation over the window (Welford's algorithm).
    pub fn stats(&self) -> (Duration, Duration) {
        let mut count = 0u32;
        let mut mean = 0.0f64;
        let mut squared_diff = 0.0f64;

        for duration in self.buffer.iter() {
            let seconds = duration.as_secs_f64();
            count += 1;
            let diff = seconds - mean;
            mean += diff / count as f64;
            squared_diff += diff * (seconds - mean);
        }

        if count == 0 {
            return (Duration::ZERO, Duration::ZERO);
        }
        let variance = if count > 1 { squared_diff / (count - 1) as f64 } else { 0.0 };
        (Duration::from_secs_f64(mean), Duration::from_secs_f64(variance.sqrt()))
    }

    /// One-line summary: effective tick rate, mean and deviation.
    pub fn summary(&self) -> String {
        let (mean, deviation) = self.stats();
        let rate = if mean.is_zero() {
            "-".to_string()
        } else {
            match 1.0 / mean.as_secs_f64() {
                f if f > 100.0 => format!("{} TPS", (f as u64).separate_with_commas()),
                f if f < 10.0 => format!("{f:.1} TPS"),
                f => format!("{f:.0} TPS"),
            }
        };
        format!(
            "{rate} | {:.3?} ± {:.3?} over {} ticks ({} total)",
            mean,
            deviation,
            self.buffer.len(),
            self.total_ticks.separate_with_commas()
        )
    }
}
