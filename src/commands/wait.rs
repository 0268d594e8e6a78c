//! # Wait command.
//!
//! [`WaitCommand`] does nothing and finishes once its duration has elapsed
//! since `initialize`. A zero duration finishes on the first tick, which makes
//! it the usual placeholder autonomous routine.

use std::time::Duration;

use tokio::time::Instant;

use super::command::Command;

#[derive(Clone, Debug)]
pub struct WaitCommand {
    duration: Duration,
    started: Option<Instant>,
}

impl WaitCommand {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            started: None,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Command for WaitCommand {
    fn name(&self) -> &str {
        "WaitCommand"
    }

    fn initialize(&mut self) {
        self.started = Some(Instant::now());
    }

    fn is_finished(&mut self) -> bool {
        match self.started {
            Some(at) => at.elapsed() >= self.duration,
            None => self.duration.is_zero(),
        }
    }

    fn end(&mut self, _interrupted: bool) {
        self.started = None;
    }
}
