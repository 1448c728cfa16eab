//! Virtual pointer device using evdev/uinput
//!
//! Appears to the display server as an ordinary relative mouse, which works
//! under both X11 and Wayland compositors.

use crate::output::{OutputSink, SinkError};
use evdev::{
    uinput::{VirtualDevice, VirtualDeviceBuilder},
    AttributeSet, EventType, InputEvent, Key, RelativeAxisType,
};
use tracing::{debug, info};

pub const DEVICE_NAME: &str = "joymouse virtual pointer";

/// Connection to uinput whose capabilities are not declared yet
pub struct PendingPointer {
    builder: VirtualDeviceBuilder<'static>,
}

impl PendingPointer {
    /// Checks that relative motion can be injected and creates the device.
    pub fn require_relative_motion(self) -> Result<VirtualPointer, SinkError> {
        let axes = AttributeSet::from_iter([
            RelativeAxisType::REL_X,
            RelativeAxisType::REL_Y,
            // Never emitted; desktop stacks want a wheel and a button before
            // they classify the device as a mouse
            RelativeAxisType::REL_WHEEL,
        ]);
        let keys = AttributeSet::from_iter([Key::BTN_LEFT]);

        let device = self
            .builder
            .with_relative_axes(&axes)
            .and_then(|b| b.with_keys(&keys))
            .and_then(|b| b.build())
            .map_err(SinkError::Unsupported)?;

        info!("Created virtual pointer '{}'", DEVICE_NAME);
        Ok(VirtualPointer {
            device,
            pending: Vec::new(),
        })
    }
}

/// Relative pointer device backed by uinput
pub struct VirtualPointer {
    device: VirtualDevice,
    pending: Vec<InputEvent>,
}

impl VirtualPointer {
    /// Opens `/dev/uinput`.
    pub fn connect(name: &'static str) -> Result<PendingPointer, SinkError> {
        let builder = VirtualDeviceBuilder::new()
            .map_err(SinkError::Connection)?
            .name(name);
        debug!("Connected to uinput");
        Ok(PendingPointer { builder })
    }

    /// Get the device path (e.g., /dev/input/eventX)
    pub fn device_path(&mut self) -> Option<std::path::PathBuf> {
        self.device
            .enumerate_dev_nodes_blocking()
            .ok()?
            .next()?
            .ok()
    }
}

impl OutputSink for VirtualPointer {
    fn inject_relative_motion(&mut self, dx: i32, dy: i32) {
        self.pending.extend(relative_motion_events(dx, dy));
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        if self.pending.is_empty() {
            return Ok(());
        }
        // emit() appends SYN_REPORT, so the batch lands as one motion
        let result = self.device.emit(&self.pending).map_err(SinkError::Emit);
        self.pending.clear();
        result
    }
}

fn relative_motion_events(dx: i32, dy: i32) -> [InputEvent; 2] {
    [
        InputEvent::new(EventType::RELATIVE, RelativeAxisType::REL_X.0, dx),
        InputEvent::new(EventType::RELATIVE, RelativeAxisType::REL_Y.0, dy),
    ]
}
