//! Daemon subsystem driving joystick input into pointer motion
//!
//! ```text
//! InputSource ──► AxisState ──► map_axis ──► OutputSink
//!   (drain)        (overwrite)   (sample)     (emit + flush)
//! ```
//!
//! Everything runs on one task. The only suspension points are the pause
//! after each drain iteration and the signal listener waking up.

pub mod cadence;
pub mod pointer_daemon;
pub mod signals;
pub mod stats;

pub use cadence::Cadence;
pub use pointer_daemon::PointerDaemon;
