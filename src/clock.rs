//! Elapsed time for the `time` uniform

/// Converts host timestamps (milliseconds) into seconds since setup
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    start_ms: f64,
}

impl FrameClock {
    pub fn new(start_ms: f64) -> Self {
        Self { start_ms }
    }

    /// Seconds since start; timestamps from before setup read as zero
    pub fn elapsed_seconds(&self, now_ms: f64) -> f32 {
        ((now_ms - self.start_ms).max(0.0) / 1000.0) as f32
    }
}
