//! # Scheduler: runs commands and polls bindings, one tick at a time.
//!
//! ## Tick
//! ```text
//! run():
//!   ├─► poll bindings          (edges start / cancel / toggle commands)
//!   └─► for each scheduled command (in schedule order):
//!         ├─► execute()
//!         └─► is_finished()? → end(false), remove, publish CommandFinished
//! ```
//!
//! ## Rules
//! - At most **one** scheduled command per name; scheduling a running name is a no-op.
//! - A command scheduled by a binding executes in the **same** tick.
//! - `cancel` calls `end(true)` and publishes `CommandInterrupted`.
//! - The scheduler owns no clock and spawns nothing: the caller decides when a tick happens.

use crate::events::{Bus, Event, EventKind};

use super::command::{Command, CommandBox};
use super::trigger::{Action, Binding};

/// Single-threaded command scheduler.
pub struct Scheduler {
    scheduled: Vec<CommandBox>,
    bindings: Vec<Binding>,
    bus: Bus,
}

impl Scheduler {
    /// Creates an empty scheduler publishing command events on `bus`.
    pub fn new(bus: Bus) -> Self {
        Self {
            scheduled: Vec::new(),
            bindings: Vec::new(),
            bus,
        }
    }

    /// Registers a binding. Its condition is sampled now, so a condition that
    /// is already true does not fire on the next tick.
    pub fn bind(&mut self, mut binding: Binding) {
        binding.sample();
        self.bindings.push(binding);
    }

    /// Schedules `command`, calling its `initialize`.
    ///
    /// Returns `false` if a command with the same name is already scheduled.
    pub fn schedule<C: Command>(&mut self, command: C) -> bool {
        self.schedule_boxed(Box::new(command))
    }

    /// Schedules an already boxed command.
    pub fn schedule_boxed(&mut self, mut command: CommandBox) -> bool {
        if self.is_scheduled(command.name()) {
            tracing::debug!(command = command.name(), "already scheduled");
            return false;
        }
        command.initialize();
        self.bus
            .publish(Event::new(EventKind::CommandScheduled).with_command(command.name()));
        self.scheduled.push(command);
        true
    }

    /// Cancels the command named `name`. Returns `false` if it was not scheduled.
    pub fn cancel(&mut self, name: &str) -> bool {
        match self.scheduled.iter().position(|c| c.name() == name) {
            Some(idx) => {
                let mut command = self.scheduled.remove(idx);
                self.end(&mut command, true);
                true
            }
            None => false,
        }
    }

    /// Cancels every scheduled command (newest first).
    pub fn cancel_all(&mut self) {
        while let Some(mut command) = self.scheduled.pop() {
            self.end(&mut command, true);
        }
    }

    pub fn is_scheduled(&self, name: &str) -> bool {
        self.scheduled.iter().any(|c| c.name() == name)
    }

    /// Names of the scheduled commands, in schedule order.
    pub fn scheduled(&self) -> Vec<String> {
        self.scheduled.iter().map(|c| c.name().to_string()).collect()
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Runs one tick.
    pub fn run(&mut self) {
        self.poll_bindings();

        let mut i = 0;
        while i < self.scheduled.len() {
            let command = &mut self.scheduled[i];
            command.execute();
            if command.is_finished() {
                let mut command = self.scheduled.remove(i);
                self.end(&mut command, false);
            } else {
                i += 1;
            }
        }
    }

    /// Samples every binding without acting on edges.
    ///
    /// Used while the robot is disabled, so that enabling it with a button
    /// held does not fire a stale edge.
    pub fn sample_bindings(&mut self) {
        for binding in &mut self.bindings {
            binding.sample();
        }
    }

    fn poll_bindings(&mut self) {
        let mut actions = Vec::new();
        for (idx, binding) in self.bindings.iter_mut().enumerate() {
            if let Some(action) = binding.poll() {
                actions.push((idx, action));
            }
        }

        for (idx, action) in actions {
            let name = self.bindings[idx].command_name().to_string();
            match action {
                Action::Start => {
                    let command = self.bindings[idx].make_command();
                    self.schedule_boxed(command);
                }
                Action::Cancel => {
                    self.cancel(&name);
                }
                Action::Toggle => {
                    if !self.cancel(&name) {
                        let command = self.bindings[idx].make_command();
                        self.schedule_boxed(command);
                    }
                }
            }
        }
    }

    fn end(&self, command: &mut CommandBox, interrupted: bool) {
        command.end(interrupted);
        let kind = if interrupted {
            EventKind::CommandInterrupted
        } else {
            EventKind::CommandFinished
        };
        self.bus
            .publish(Event::new(kind).with_command(command.name()));
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("scheduled", &self.scheduled())
            .field("bindings", &self.bindings)
            .finish()
    }
}
