//! # Commands, triggers and the per-tick scheduler.
//!
//! This module provides:
//! - [`Command`] - trait for tick-driven units of behavior
//! - [`RunCommand`], [`InstantCommand`], [`WaitCommand`] - ready-made commands
//! - [`Trigger`], [`Binding`] - conditions bound to commands
//! - [`Scheduler`] - runs commands and polls bindings once per tick

mod command;
mod run;
mod scheduler;
mod trigger;
mod wait;

pub use command::{Command, CommandBox};
pub use run::{InstantCommand, RunCommand};
pub use scheduler::Scheduler;
pub use trigger::{Binding, BindingKind, Trigger};
pub use wait::WaitCommand;
