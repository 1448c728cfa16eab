use std::time::Duration;

/// Drain iterations between two output emissions
pub const DRAIN_ITERATIONS: usize = 10;

/// Pause after each drain iteration
pub const DRAIN_PAUSE: Duration = Duration::from_millis(1);

/// Scheduling policy of the sample-and-flush loop
///
/// Input is drained `drain_iterations` times with `drain_pause` between
/// drains before one motion event is emitted, giving a batching window of
/// roughly `drain_iterations * drain_pause`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cadence {
    pub drain_iterations: usize,
    pub drain_pause: Duration,
}

impl Cadence {
    pub fn batch_window(&self) -> Duration {
        self.drain_pause * self.drain_iterations as u32
    }
}

impl Default for Cadence {
    fn default() -> Self {
        Self {
            drain_iterations: DRAIN_ITERATIONS,
            drain_pause: DRAIN_PAUSE,
        }
    }
}
