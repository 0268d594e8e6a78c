use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::Hid;

#[derive(Debug)]
struct State {
    axes: Vec<f64>,
    buttons: Vec<bool>,
}

/// Gamepad whose state is set from code.
///
/// Clones share the same state, so one clone can be handed to the robot while
/// another plays the driver.
#[derive(Clone, Debug)]
pub struct SimGamepad {
    port: usize,
    state: Arc<RwLock<State>>,
}

impl SimGamepad {
    /// Axis and button count of a typical gamepad.
    pub const DEFAULT_AXES: usize = 6;
    pub const DEFAULT_BUTTONS: usize = 10;

    pub fn new(port: usize) -> Self {
        Self::with_layout(port, Self::DEFAULT_AXES, Self::DEFAULT_BUTTONS)
    }

    pub fn with_layout(port: usize, axes: usize, buttons: usize) -> Self {
        Self {
            port,
            state: Arc::new(RwLock::new(State {
                axes: vec![0.0; axes],
                buttons: vec![false; buttons],
            })),
        }
    }

    /// Sets axis `axis`, clamped to `[-1.0, 1.0]`. Unknown axes are ignored.
    pub fn set_axis(&self, axis: usize, value: f64) {
        let value = if value.is_nan() {
            0.0
        } else {
            value.clamp(-1.0, 1.0)
        };
        match self.write_state().axes.get_mut(axis) {
            Some(slot) => *slot = value,
            None => tracing::warn!(port = self.port, axis, "set on missing axis ignored"),
        }
    }

    /// Presses or releases button `button` (1-based). Unknown buttons are ignored.
    pub fn set_button(&self, button: usize, pressed: bool) {
        let mut state = self.write_state();
        match button.checked_sub(1).and_then(|i| state.buttons.get_mut(i)) {
            Some(slot) => *slot = pressed,
            None => tracing::warn!(port = self.port, button, "set on missing button ignored"),
        }
    }

    pub fn axis_count(&self) -> usize {
        self.read_state().axes.len()
    }

    pub fn button_count(&self) -> usize {
        self.read_state().buttons.len()
    }

    fn read_state(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(|p| p.into_inner())
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(|p| p.into_inner())
    }
}

impl Hid for SimGamepad {
    fn port(&self) -> usize {
        self.port
    }

    fn raw_axis(&self, axis: usize) -> f64 {
        match self.read_state().axes.get(axis) {
            Some(v) => *v,
            None => {
                tracing::warn!(port = self.port, axis, "axis out of range");
                0.0
            }
        }
    }

    fn raw_button(&self, button: usize) -> bool {
        let state = self.read_state();
        match button.checked_sub(1).and_then(|i| state.buttons.get(i)) {
            Some(v) => *v,
            None => {
                tracing::warn!(port = self.port, button, "button out of range");
                false
            }
        }
    }
}
