use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

/// Operating mode selected by the field or the driver station.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RobotMode {
    /// Outputs off; bindings are sampled but never fire.
    #[default]
    Disabled,
    /// The program's autonomous command runs.
    Autonomous,
    /// Driver-controlled; bindings fire.
    Teleop,
}

impl RobotMode {
    /// Returns a short stable label for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            RobotMode::Disabled => "disabled",
            RobotMode::Autonomous => "autonomous",
            RobotMode::Teleop => "teleop",
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, RobotMode::Disabled)
    }
}

impl fmt::Display for RobotMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Cloneable handle switching the mode of a running [`Robot`](crate::Robot).
#[derive(Clone, Debug)]
pub struct ModeHandle {
    tx: Arc<watch::Sender<RobotMode>>,
}

impl ModeHandle {
    pub(crate) fn new(initial: RobotMode) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Requests `mode`; the robot applies it before its next tick.
    pub fn set(&self, mode: RobotMode) {
        self.tx.send_replace(mode);
    }

    /// Last requested mode.
    pub fn get(&self) -> RobotMode {
        *self.tx.borrow()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<RobotMode> {
        self.tx.subscribe()
    }
}
