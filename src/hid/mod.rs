//! # Human interface devices.
//!
//! - [`Hid`] the read side of a gamepad/joystick (axes and buttons)
//! - [`SimGamepad`] an in-process gamepad driven by code (tests, demos,
//!   simulation)
//!
//! Buttons are numbered from 1, axes from 0, like on the driver station.
//! Reading an index the device does not have is not an error: it logs a
//! warning and yields a neutral value (`0.0` / `false`).

mod sim;

pub use sim::SimGamepad;

/// Read access to a gamepad-like device.
pub trait Hid: Send + Sync + 'static {
    /// Driver-station port of the device.
    fn port(&self) -> usize;

    /// Value of axis `axis` in `[-1.0, 1.0]`.
    fn raw_axis(&self, axis: usize) -> f64;

    /// State of button `button` (1-based).
    fn raw_button(&self, button: usize) -> bool;
}
