//! Input Source contract shared by the gilrs backend and test doubles.

/// Event drained from an input device queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// An analog axis moved; `raw_value` is in the device range (-32768..=32767)
    AxisChanged { raw_axis_index: u32, raw_value: i32 },
    /// The process was asked to stop
    Quit,
}

/// Errors while opening input devices
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("Failed to initialize input backend: {0}")]
    Backend(String),

    #[error("No joystick could be opened ({reported} reported)")]
    NoDevices { reported: usize },
}

/// Non-blocking source of joystick events
pub trait InputSource {
    /// Returns the next queued event, or `None` once the queue is empty.
    fn poll_event(&mut self) -> Option<InputEvent>;

    /// Number of devices currently held open
    fn device_count(&self) -> usize;
}
