//! Output side: where pointer motion is injected.
//!
//! ```text
//! Motion ──► OutputSink::inject_relative_motion ──► (queued)
//!                                  flush ──► delivered
//! ```

pub mod uinput;

/// Errors from the output sink
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// The injection target could not be reached
    #[error("Failed to connect to uinput: {0}")]
    Connection(#[source] std::io::Error),

    /// The target does not support relative pointer motion
    #[error("Relative motion injection unsupported: {0}")]
    Unsupported(#[source] std::io::Error),

    /// Delivering queued events failed
    #[error("Failed to emit motion: {0}")]
    Emit(#[source] std::io::Error),
}

/// Target accepting relative pointer motion
pub trait OutputSink {
    /// Queues one relative motion event carrying both deltas.
    fn inject_relative_motion(&mut self, dx: i32, dy: i32);

    /// Delivers everything queued so far; returns once it is observable.
    fn flush(&mut self) -> Result<(), SinkError>;
}
