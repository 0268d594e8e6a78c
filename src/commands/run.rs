//! # Function-backed commands.
//!
//! [`RunCommand`] calls its closure on every tick and never finishes on its
//! own; [`InstantCommand`] calls its closure once and finishes. Both share the
//! closure through an `Arc`, so clones are cheap and a trigger binding can
//! start a fresh copy each time it fires.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use super::command::Command;

type Action = Arc<dyn Fn() + Send + Sync>;

/// Command running an action every tick until cancelled.
#[derive(Clone)]
pub struct RunCommand {
    name: Cow<'static, str>,
    action: Action,
}

impl RunCommand {
    pub fn new<F>(name: impl Into<Cow<'static, str>>, action: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            action: Arc::new(action),
        }
    }
}

impl Command for RunCommand {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&mut self) {
        (self.action)();
    }
}

impl fmt::Debug for RunCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunCommand").field("name", &self.name).finish()
    }
}

/// Command running an action once on initialize, finished on its first tick.
#[derive(Clone)]
pub struct InstantCommand {
    name: Cow<'static, str>,
    action: Action,
}

impl InstantCommand {
    pub fn new<F>(name: impl Into<Cow<'static, str>>, action: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            action: Arc::new(action),
        }
    }
}

impl Command for InstantCommand {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self) {
        (self.action)();
    }

    fn is_finished(&mut self) -> bool {
        true
    }
}

impl fmt::Debug for InstantCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstantCommand")
            .field("name", &self.name)
            .finish()
    }
}
