//! Joystick input handling
//!
//! 1. [`input_source`] - Event contract shared by backends
//! 2. [`gilrs_source`] - Gamepads opened through gilrs
//! 3. [`axis_state`] - Latest deadzone-filtered value per logical axis

pub mod axis_state;
pub mod gilrs_source;
pub mod input_source;

pub use gilrs_source::GilrsSource;
