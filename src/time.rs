//! Frame clock: turns `performance.now()` timestamps into seconds of play.
//!
//! `draw_web()` calls at ~60fps with variable delta. The clock hands the
//! engine the real delta in seconds, clamped so a backgrounded tab does not
//! dump minutes of simulation into one frame.

pub struct FrameClock {
    /// Longest delta (seconds) returned for a single frame.
    max_delta: f64,
    /// Timestamp of the last update (ms), None if first frame
    last_timestamp: Option<f64>,
}

impl FrameClock {
    pub fn new(max_delta: f64) -> Self {
        Self {
            max_delta,
            last_timestamp: None,
        }
    }

    /// Feed a wall-clock timestamp in milliseconds and get the frame delta
    /// in seconds. The first call returns 0; a clock that runs backwards
    /// yields 0 as well.
    pub fn update(&mut self, now_ms: f64) -> f64 {
        if !now_ms.is_finite() {
            return 0.0;
        }
        let delta = match self.last_timestamp {
            Some(prev) => ((now_ms - prev) / 1000.0).clamp(0.0, self.max_delta),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);
        delta
    }
}
