use chrono::{DateTime, Duration, Local};
use tracing::info;

/// Throughput counters logged once per window
#[derive(Debug)]
pub struct LoopStats {
    cycles: u64,
    emitted: u64,
    window_start: DateTime<Local>,
    log_interval: Duration,
}

impl LoopStats {
    pub fn new() -> Self {
        Self::with_interval(Duration::seconds(10))
    }

    pub fn with_interval(log_interval: Duration) -> Self {
        Self {
            cycles: 0,
            emitted: 0,
            window_start: Local::now(),
            log_interval,
        }
    }

    pub fn record_cycle(&mut self, emitted: bool) {
        self.cycles += 1;
        if emitted {
            self.emitted += 1;
        }
    }

    /// Logs and resets the counters once the window has elapsed.
    ///
    /// Returns true if a report was written.
    pub fn report_if_due(&mut self, now: DateTime<Local>) -> bool {
        if now - self.window_start <= self.log_interval {
            return false;
        }
        info!(
            "Pointer loop stats: {} cycles, {} motion events in last {} seconds",
            self.cycles,
            self.emitted,
            self.log_interval.num_seconds()
        );
        self.cycles = 0;
        self.emitted = 0;
        self.window_start = now;
        true
    }
}
