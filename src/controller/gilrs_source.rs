use crate::controller::input_source::{DeviceError, InputEvent, InputSource};
use crate::daemon::signals::QuitSignal;
use gilrs::{Axis, Event, EventType, Gamepad, GamepadId, Gilrs, GilrsBuilder};
use std::collections::HashMap;
use std::hash::Hash;
use tracing::{debug, error, info, warn};

/// Axes in the order a joystick driver usually numbers them
const DEVICE_AXIS_ORDER: [Axis; 8] = [
    Axis::LeftStickX,
    Axis::LeftStickY,
    Axis::LeftZ,
    Axis::RightStickX,
    Axis::RightStickY,
    Axis::RightZ,
    Axis::DPadX,
    Axis::DPadY,
];

const DEVICE_AXIS_MAX: f32 = 32767.0;

/// gilrs negates Y axes on Linux so that up is positive; the kernel reports up as negative.
const Y_AXIS_REVERSED: bool = cfg!(target_os = "linux");

/// Native axis codes a device exposes, in the order the device numbers them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisLayout {
    codes: Vec<u32>,
}

impl AxisLayout {
    pub fn from_codes(codes: impl IntoIterator<Item = u32>) -> Self {
        let mut codes: Vec<u32> = codes.into_iter().collect();
        codes.sort_unstable();
        codes.dedup();
        Self { codes }
    }

    fn of_gamepad(gamepad: &Gamepad<'_>) -> Self {
        Self::from_codes(
            DEVICE_AXIS_ORDER
                .iter()
                .filter_map(|axis| gamepad.axis_code(*axis))
                .map(|code| code.into_u32()),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Index of the axis on its device.
    ///
    /// Codes missing from the layout fall back to the usual driver order, then
    /// to the native code itself.
    pub fn raw_axis_index(&self, axis: Axis, native_code: u32) -> u32 {
        self.codes
            .iter()
            .position(|code| *code == native_code)
            .map(|pos| pos as u32)
            .or_else(|| device_axis_position(axis))
            .unwrap_or(native_code)
    }
}

/// Axis layouts of the opened devices, keyed by device id
#[derive(Debug)]
pub struct OpenedDevices<K> {
    layouts: HashMap<K, AxisLayout>,
}

impl<K: Eq + Hash> OpenedDevices<K> {
    pub fn new() -> Self {
        Self {
            layouts: HashMap::new(),
        }
    }

    pub fn insert(&mut self, id: K, layout: AxisLayout) {
        self.layouts.insert(id, layout);
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    /// Converts a gilrs axis reading into a device-range event.
    ///
    /// Returns `None` for devices that were not opened.
    pub fn axis_event(&self, id: &K, axis: Axis, value: f32, native_code: u32) -> Option<InputEvent> {
        let layout = self.layouts.get(id)?;
        Some(InputEvent::AxisChanged {
            raw_axis_index: layout.raw_axis_index(axis, native_code),
            raw_value: to_device_range(to_kernel_orientation(axis, value, Y_AXIS_REVERSED)),
        })
    }
}

/// Input Source backed by every gamepad gilrs could open at startup
pub struct GilrsSource {
    gilrs: Gilrs,
    devices: OpenedDevices<GamepadId>,
    quit: QuitSignal,
}

impl GilrsSource {
    /// Opens all usable gamepads.
    ///
    /// Devices that cannot be used are reported one by one and skipped; the call
    /// only fails when the backend is unavailable or nothing could be opened.
    pub fn open(quit: QuitSignal) -> Result<Self, DeviceError> {
        info!("Initializing gilrs joystick interface");
        // Default filters would add their own deadzone and jitter handling
        let gilrs = match GilrsBuilder::new().with_default_filters(false).build() {
            Ok(g) => {
                info!("Successfully initialized gilrs");
                g
            }
            Err(e) => {
                error!("Failed to initialize gilrs: {}", e);
                return Err(DeviceError::Backend(e.to_string()));
            }
        };

        let (reported, devices) = {
            let candidates: Vec<(GamepadId, Gamepad<'_>)> = gilrs.gamepads().collect();
            info!("Found {} joysticks", candidates.len());

            let mut devices = OpenedDevices::new();
            for (idx, (id, gamepad)) in candidates.iter().enumerate() {
                let layout = AxisLayout::of_gamepad(gamepad);
                match check_usable(gamepad, &layout) {
                    Ok(()) => {
                        info!(
                            "  [{}] opened {} ({}), axis codes {:?}",
                            idx,
                            gamepad.name(),
                            id,
                            layout.codes
                        );
                        devices.insert(*id, layout);
                    }
                    Err(reason) => {
                        warn!("could not open joystick {}: {} ({})", idx, gamepad.name(), reason);
                    }
                }
            }
            (candidates.len(), devices)
        };

        if devices.is_empty() {
            return Err(DeviceError::NoDevices { reported });
        }

        Ok(Self {
            gilrs,
            devices,
            quit,
        })
    }
}

fn convert(devices: &OpenedDevices<GamepadId>, id: GamepadId, event: EventType) -> Option<InputEvent> {
    match event {
        EventType::AxisChanged(axis, value, code) => {
            let converted = devices.axis_event(&id, axis, value, code.into_u32());
            match converted {
                Some(ev) => debug!("Axis {:?} on {} = {:.4} -> {:?}", axis, id, value, ev),
                None => debug!("Skipping axis event from unopened joystick {}", id),
            }
            converted
        }
        EventType::Connected => {
            info!("Joystick {} connected, ignoring until restart", id);
            None
        }
        EventType::Disconnected => {
            warn!("Joystick {} disconnected", id);
            None
        }
        _ => None,
    }
}

impl InputSource for GilrsSource {
    fn poll_event(&mut self) -> Option<InputEvent> {
        let gilrs = &mut self.gilrs;
        let devices = &self.devices;
        next_input(&self.quit, || {
            // Skip non-axis events so an empty return always means an empty queue
            while let Some(Event { id, event, .. }) = gilrs.next_event() {
                if let Some(converted) = convert(devices, id, event) {
                    return Some(converted);
                }
            }
            None
        })
    }

    fn device_count(&self) -> usize {
        self.devices.len()
    }
}

/// A raised quit signal takes precedence over anything still queued.
fn next_input(
    quit: &QuitSignal,
    queued: impl FnOnce() -> Option<InputEvent>,
) -> Option<InputEvent> {
    if quit.is_raised() {
        return Some(InputEvent::Quit);
    }
    queued()
}

fn check_usable(gamepad: &Gamepad<'_>, layout: &AxisLayout) -> Result<(), &'static str> {
    if !gamepad.is_connected() {
        return Err("disconnected");
    }
    if layout.is_empty() {
        return Err("no analog axes");
    }
    Ok(())
}

fn device_axis_position(axis: Axis) -> Option<u32> {
    DEVICE_AXIS_ORDER
        .iter()
        .position(|known| *known == axis)
        .map(|pos| pos as u32)
}

fn to_kernel_orientation(axis: Axis, value: f32, y_reversed: bool) -> f32 {
    match axis {
        Axis::LeftStickY | Axis::RightStickY | Axis::DPadY if y_reversed => -value,
        _ => value,
    }
}

/// gilrs normalizes axes to [-1.0, 1.0]; scale back to the device's integer range.
fn to_device_range(value: f32) -> i32 {
    (value * DEVICE_AXIS_MAX).round().clamp(-32768.0, DEVICE_AXIS_MAX) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::axis_state::{AxisState, LogicalAxis};
    use crate::mapping::response::Motion;

    // Linux ABS codes
    const ABS_X: u32 = 0x00;
    const ABS_Y: u32 = 0x01;
    const ABS_Z: u32 = 0x02;
    const ABS_RX: u32 = 0x03;
    const ABS_RY: u32 = 0x04;

    fn opened(id: usize, codes: &[u32]) -> OpenedDevices<usize> {
        let mut devices = OpenedDevices::new();
        devices.insert(id, AxisLayout::from_codes(codes.iter().copied()));
        devices
    }

    #[test]
    fn test_device_range_scaling() {
        assert_eq!(to_device_range(0.0), 0);
        assert_eq!(to_device_range(1.0), 32767);
        assert_eq!(to_device_range(-1.0), -32767);
        assert_eq!(to_device_range(0.5), 16384);
        assert_eq!(to_device_range(-2.0), -32768);
        assert_eq!(to_device_range(3.0), 32767);
    }

    #[test]
    fn test_y_axes_restored_to_kernel_orientation() {
        assert_eq!(to_kernel_orientation(Axis::LeftStickY, 1.0, true), -1.0);
        assert_eq!(to_kernel_orientation(Axis::RightStickY, -0.5, true), 0.5);
        assert_eq!(to_kernel_orientation(Axis::DPadY, 1.0, true), -1.0);
        assert_eq!(to_kernel_orientation(Axis::LeftStickX, 1.0, true), 1.0);
        assert_eq!(to_kernel_orientation(Axis::LeftStickY, 1.0, false), 1.0);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_stick_up_moves_pointer_up() {
        let devices = opened(0, &[ABS_X, ABS_Y]);
        // gilrs reports a stick pushed fully up as +1.0 on Linux
        let event = devices.axis_event(&0, Axis::LeftStickY, 1.0, ABS_Y).unwrap();
        let InputEvent::AxisChanged {
            raw_axis_index,
            raw_value,
        } = event
        else {
            panic!("expected axis event, got {:?}", event);
        };
        assert_eq!(raw_value, -32767);

        let mut state = AxisState::new();
        state.update(raw_axis_index, raw_value);
        let motion = Motion::from_snapshot(state.snapshot());
        assert!(motion.dy < 0, "dy = {}", motion.dy);
        assert_eq!(motion.dx, 0);
    }

    #[test]
    fn test_unopened_device_is_skipped() {
        let devices = opened(0, &[ABS_X, ABS_Y]);
        assert_eq!(devices.axis_event(&1, Axis::LeftStickX, 1.0, ABS_X), None);
        assert!(devices.axis_event(&0, Axis::LeftStickX, 1.0, ABS_X).is_some());
        assert_eq!(devices.len(), 1);
    }

    #[test]
    fn test_layout_without_z_keeps_right_stick_parity() {
        let layout = AxisLayout::from_codes([ABS_RY, ABS_X, ABS_RX, ABS_Y]);
        let rx = layout.raw_axis_index(Axis::RightStickX, ABS_RX);
        let ry = layout.raw_axis_index(Axis::RightStickY, ABS_RY);
        assert_eq!(rx, 2);
        assert_eq!(ry, 3);
        assert_eq!(LogicalAxis::from_raw_index(rx), LogicalAxis::Horizontal);
        assert_eq!(LogicalAxis::from_raw_index(ry), LogicalAxis::Vertical);
    }

    #[test]
    fn test_layout_with_z_shifts_right_stick() {
        let layout = AxisLayout::from_codes([ABS_X, ABS_Y, ABS_Z, ABS_RX, ABS_RY]);
        assert_eq!(layout.raw_axis_index(Axis::LeftZ, ABS_Z), 2);
        assert_eq!(layout.raw_axis_index(Axis::RightStickX, ABS_RX), 3);
    }

    #[test]
    fn test_unknown_code_falls_back_to_driver_order() {
        let layout = AxisLayout::from_codes([ABS_X, ABS_Y]);
        assert_eq!(layout.raw_axis_index(Axis::RightStickY, 0x40), 4);
        assert_eq!(layout.raw_axis_index(Axis::Unknown, 0x41), 0x41);
    }

    #[test]
    fn test_stick_axes_keep_device_parity() {
        assert_eq!(device_axis_position(Axis::LeftStickX), Some(0));
        assert_eq!(device_axis_position(Axis::LeftStickY), Some(1));
        assert_eq!(device_axis_position(Axis::RightStickX), Some(3));
        assert_eq!(device_axis_position(Axis::RightStickY), Some(4));
        assert_eq!(device_axis_position(Axis::Unknown), None);
    }

    #[test]
    fn test_raised_quit_preempts_queue() {
        let (sender, quit) = QuitSignal::channel();
        let queued = InputEvent::AxisChanged {
            raw_axis_index: 0,
            raw_value: 5000,
        };

        assert_eq!(next_input(&quit, || Some(queued)), Some(queued));
        assert_eq!(next_input(&quit, || None), None);

        sender.send(true).unwrap();
        assert_eq!(next_input(&quit, || Some(queued)), Some(InputEvent::Quit));
        assert_eq!(next_input(&quit, || None), Some(InputEvent::Quit));
    }

    #[test]
    #[ignore] // Requires a connected joystick (run with: cargo test -- --ignored)
    fn test_open_real_devices() {
        let source = GilrsSource::open(QuitSignal::never());
        assert!(source.map(|s| s.device_count() > 0).unwrap_or(false));
    }
}
