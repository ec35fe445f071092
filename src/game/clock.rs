//! Simulation clock
//!
//! Time only advances through [`SimulationClock::advance`]; nothing in the
//! simulation reads the wall clock. "Now" is milliseconds since the epoch of
//! the current session.

/// Monotonic simulation time source
#[derive(Debug, Clone, Default)]
pub struct SimulationClock {
    now_ms: f64,
    ticks: u64,
}

impl SimulationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `dt_ms` and return the sanitized delta actually applied.
    /// Negative or non-finite deltas count as zero.
    pub fn advance(&mut self, dt_ms: f32) -> f32 {
        let dt_ms = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };
        self.now_ms += f64::from(dt_ms);
        self.ticks += 1;
        dt_ms
    }

    /// Milliseconds since the session epoch
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Number of `advance` calls since the epoch
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
