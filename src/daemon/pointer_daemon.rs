//! Pointer daemon with statum state machine for the sample-and-flush loop
//!
//! # State Machine
//!
//! ```text
//! Initializing ──► Running ──► Stopped
//!                     │
//!                     └──► (fatal sink error, dropped)
//! ```
//!
//! # Cycle
//!
//! ```text
//! ┌─ drain x10 ─────────────────┐
//! │ poll until empty ► update   │ ──► snapshot ► map ► emit + flush (if non-zero)
//! │ sleep 1ms                   │
//! └─────────────────────────────┘
//! ```
//!
//! Axis state is written only while draining and read only while sampling, on
//! the same task, so it needs no locking.

use crate::controller::axis_state::AxisState;
use crate::controller::input_source::{DeviceError, InputEvent, InputSource};
use crate::daemon::cadence::Cadence;
use crate::daemon::stats::LoopStats;
use crate::mapping::response::Motion;
use crate::output::{OutputSink, SinkError};
use chrono::Local;
use statum::{machine, state};
use tracing::{debug, info, trace};

/// States for the daemon lifecycle using statum
#[state]
#[derive(Debug, Clone)]
pub enum DaemonState {
    Initializing, // Collaborators acquired, loop not started
    Running,      // Sample-and-flush loop active
    Stopped,      // Quit observed, ready for teardown
}

/// Owns every collaborator the loop touches.
///
/// Dropping the daemon in any state releases the input devices and the sink.
#[machine]
pub struct PointerDaemon<S: DaemonState> {
    input: Box<dyn InputSource>,
    output: Box<dyn OutputSink>,
    axes: AxisState,
    cadence: Cadence,
    stats: LoopStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DrainOutcome {
    Continue,
    Quit,
}

impl PointerDaemon<Initializing> {
    pub fn create(
        input: Box<dyn InputSource>,
        output: Box<dyn OutputSink>,
        cadence: Cadence,
    ) -> Self {
        debug!("Creating pointer daemon with cadence: {:?}", cadence);
        Self::new(
            input,
            output,
            AxisState::new(), // axes
            cadence,
            LoopStats::new(), // stats
        )
    }

    /// Verifies at least one input device is held and transitions to Running.
    pub fn start(self) -> Result<PointerDaemon<Running>, DeviceError> {
        let devices = self.input.device_count();
        if devices == 0 {
            return Err(DeviceError::NoDevices { reported: 0 });
        }
        info!(
            "Starting pointer loop with {} joystick(s), {:?} batch window",
            devices,
            self.cadence.batch_window()
        );
        Ok(self.transition())
    }
}

impl PointerDaemon<Running> {
    /// Runs cycles until a quit event is drained.
    ///
    /// A sink failure ends the loop with an error; the daemon is dropped and
    /// its resources released on the way out.
    pub async fn run(mut self) -> Result<PointerDaemon<Stopped>, SinkError> {
        loop {
            if self.drain().await == DrainOutcome::Quit {
                info!("Quit received, leaving pointer loop");
                return Ok(self.transition());
            }

            let emitted = self.sample_and_emit()?;
            self.stats.record_cycle(emitted);
            self.stats.report_if_due(Local::now());
        }
    }

    async fn drain(&mut self) -> DrainOutcome {
        for _ in 0..self.cadence.drain_iterations {
            while let Some(event) = self.input.poll_event() {
                match event {
                    InputEvent::Quit => return DrainOutcome::Quit,
                    InputEvent::AxisChanged {
                        raw_axis_index,
                        raw_value,
                    } => self.axes.update(raw_axis_index, raw_value),
                }
            }
            tokio::time::sleep(self.cadence.drain_pause).await;
        }
        DrainOutcome::Continue
    }

    fn sample_and_emit(&mut self) -> Result<bool, SinkError> {
        let snapshot = self.axes.snapshot();
        let motion = Motion::from_snapshot(snapshot);
        if motion.is_zero() {
            return Ok(false);
        }

        trace!(
            "ev {} {} -> {} {}",
            snapshot.horizontal,
            snapshot.vertical,
            motion.dx,
            motion.dy
        );
        self.output.inject_relative_motion(motion.dx, motion.dy);
        self.output.flush()?;
        Ok(true)
    }
}

impl PointerDaemon<Stopped> {
    /// Releases the joysticks, then the output sink.
    pub fn shutdown(self) {
        info!("Closing joysticks");
        drop(self.input);
        info!("Closing virtual pointer");
        drop(self.output);
        info!("Shutdown complete");
    }
}
