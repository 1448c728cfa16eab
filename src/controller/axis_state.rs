use tracing::trace;

/// Raw readings with a magnitude below this are treated as a centered stick.
pub const DEADZONE_THRESHOLD: u32 = 2000;

/// Logical pointer axis a raw device axis feeds into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalAxis {
    Horizontal,
    Vertical,
}

impl LogicalAxis {
    /// Even device axes drive the horizontal slot, odd ones the vertical slot.
    ///
    /// Devices with more than two axes alias onto the same slots, so a throttle
    /// on axis 2 overwrites the stick's horizontal reading.
    pub fn from_raw_index(raw_axis_index: u32) -> Self {
        if raw_axis_index % 2 == 0 {
            LogicalAxis::Horizontal
        } else {
            LogicalAxis::Vertical
        }
    }
}

/// Latest (horizontal, vertical) reading
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AxisSnapshot {
    pub horizontal: i32,
    pub vertical: i32,
}

/// Most recent deadzone-filtered raw value per logical axis.
///
/// Last write wins; no history is kept.
#[derive(Debug, Default)]
pub struct AxisState {
    horizontal: i32,
    vertical: i32,
}

impl AxisState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, raw_axis_index: u32, raw_value: i32) {
        let value = apply_deadzone(raw_value);
        let axis = LogicalAxis::from_raw_index(raw_axis_index);
        trace!("Axis {} ({:?}): {} -> {}", raw_axis_index, axis, raw_value, value);

        match axis {
            LogicalAxis::Horizontal => self.horizontal = value,
            LogicalAxis::Vertical => self.vertical = value,
        }
    }

    pub fn snapshot(&self) -> AxisSnapshot {
        AxisSnapshot {
            horizontal: self.horizontal,
            vertical: self.vertical,
        }
    }
}

fn apply_deadzone(raw_value: i32) -> i32 {
    if raw_value.unsigned_abs() < DEADZONE_THRESHOLD {
        0
    } else {
        raw_value
    }
}
