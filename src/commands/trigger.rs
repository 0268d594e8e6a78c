//! # Triggers and bindings.
//!
//! A [`Trigger`] wraps a boolean condition (a button, a sensor threshold, a
//! table flag). Binding methods turn it into a [`Binding`] that the
//! [`Scheduler`](crate::Scheduler) polls once per tick:
//!
//! ```text
//! edge      on_true   on_false   while_true   while_false   toggle_on_true
//! rising    start     -          start        cancel        start / cancel
//! falling   -         start      cancel       start         -
//! ```
//!
//! Every start creates a fresh clone of the bound command, so a binding can
//! fire any number of times.

use std::fmt;
use std::sync::Arc;

use crate::hid::Hid;

use super::command::{Command, CommandBox};

type Condition = Arc<dyn Fn() -> bool + Send + Sync>;
type Factory = Arc<dyn Fn() -> CommandBox + Send + Sync>;

/// Boolean condition sampled once per tick.
#[derive(Clone)]
pub struct Trigger {
    condition: Condition,
}

impl Trigger {
    pub fn new<F>(condition: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Self {
            condition: Arc::new(condition),
        }
    }

    /// Trigger active while button `button` (1-based) of `hid` is held.
    pub fn button<H: Hid>(hid: Arc<H>, button: usize) -> Self {
        Self::new(move || hid.raw_button(button))
    }

    /// Current state of the condition.
    pub fn get(&self) -> bool {
        (self.condition)()
    }

    /// Trigger active when both `self` and `other` are.
    pub fn and(self, other: Trigger) -> Trigger {
        Trigger::new(move || self.get() && other.get())
    }

    /// Trigger active when either `self` or `other` is.
    pub fn or(self, other: Trigger) -> Trigger {
        Trigger::new(move || self.get() || other.get())
    }

    /// Trigger active when `self` is not.
    pub fn negate(self) -> Trigger {
        Trigger::new(move || !self.get())
    }

    /// Starts `command` when the condition becomes true.
    pub fn on_true<C: Command + Clone + Sync>(self, command: C) -> Binding {
        Binding::new(self, BindingKind::OnTrue, command)
    }

    /// Starts `command` when the condition becomes false.
    pub fn on_false<C: Command + Clone + Sync>(self, command: C) -> Binding {
        Binding::new(self, BindingKind::OnFalse, command)
    }

    /// Starts `command` when the condition becomes true, cancels it when it becomes false.
    pub fn while_true<C: Command + Clone + Sync>(self, command: C) -> Binding {
        Binding::new(self, BindingKind::WhileTrue, command)
    }

    /// Starts `command` when the condition becomes false, cancels it when it becomes true.
    pub fn while_false<C: Command + Clone + Sync>(self, command: C) -> Binding {
        Binding::new(self, BindingKind::WhileFalse, command)
    }

    /// Toggles `command` on each rising edge.
    pub fn toggle_on_true<C: Command + Clone + Sync>(self, command: C) -> Binding {
        Binding::new(self, BindingKind::ToggleOnTrue, command)
    }
}

impl fmt::Debug for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trigger").finish_non_exhaustive()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindingKind {
    OnTrue,
    OnFalse,
    WhileTrue,
    WhileFalse,
    ToggleOnTrue,
}

/// What the scheduler has to do after an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    Start,
    Cancel,
    Toggle,
}

/// A trigger bound to a command.
pub struct Binding {
    trigger: Trigger,
    kind: BindingKind,
    command_name: String,
    factory: Factory,
    last: Option<bool>,
}

impl Binding {
    fn new<C: Command + Clone + Sync>(trigger: Trigger, kind: BindingKind, command: C) -> Self {
        let command_name = command.name().to_string();
        let factory: Factory = Arc::new(move || Box::new(command.clone()) as CommandBox);
        Self {
            trigger,
            kind,
            command_name,
            factory,
            last: None,
        }
    }

    pub fn kind(&self) -> BindingKind {
        self.kind
    }

    /// Name of the bound command.
    pub fn command_name(&self) -> &str {
        &self.command_name
    }

    pub(crate) fn make_command(&self) -> CommandBox {
        (self.factory)()
    }

    /// Records the current condition without acting on it.
    pub(crate) fn sample(&mut self) {
        self.last = Some(self.trigger.get());
    }

    /// Samples the condition and returns the action for the observed edge.
    ///
    /// The first poll after binding only records the state: a condition that
    /// is already true when bound does not count as a rising edge.
    pub(crate) fn poll(&mut self) -> Option<Action> {
        let now = self.trigger.get();
        let prev = self.last.replace(now)?;
        match (prev, now) {
            (false, true) => match self.kind {
                BindingKind::OnTrue | BindingKind::WhileTrue => Some(Action::Start),
                BindingKind::WhileFalse => Some(Action::Cancel),
                BindingKind::ToggleOnTrue => Some(Action::Toggle),
                BindingKind::OnFalse => None,
            },
            (true, false) => match self.kind {
                BindingKind::OnFalse | BindingKind::WhileFalse => Some(Action::Start),
                BindingKind::WhileTrue => Some(Action::Cancel),
                BindingKind::OnTrue | BindingKind::ToggleOnTrue => None,
            },
            _ => None,
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("kind", &self.kind)
            .field("command", &self.command_name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::commands::WaitCommand;
    use crate::hid::SimGamepad;

    fn flag() -> (Arc<AtomicBool>, Trigger) {
        let f = Arc::new(AtomicBool::new(false));
        let t = {
            let f = f.clone();
            Trigger::new(move || f.load(Ordering::Relaxed))
        };
        (f, t)
    }

    fn edges(binding: &mut Binding, f: &AtomicBool, states: &[bool]) -> Vec<Option<Action>> {
        states
            .iter()
            .map(|s| {
                f.store(*s, Ordering::Relaxed);
                binding.poll()
            })
            .collect()
    }

    #[test]
    fn test_while_true_edges() {
        let (f, t) = flag();
        let mut b = t.while_true(WaitCommand::new(std::time::Duration::ZERO));
        assert_eq!(
            edges(&mut b, &f, &[false, true, true, false, false]),
            vec![None, Some(Action::Start), None, Some(Action::Cancel), None]
        );
    }

    #[test]
    fn test_first_poll_is_not_an_edge() {
        let (f, t) = flag();
        let mut b = t.on_true(WaitCommand::new(std::time::Duration::ZERO));
        assert_eq!(edges(&mut b, &f, &[true, true]), vec![None, None]);
    }

    #[test]
    fn test_other_kinds() {
        let zero = WaitCommand::new(std::time::Duration::ZERO);
        let pattern = [false, true, false];

        let (f, t) = flag();
        let mut b = t.on_false(zero.clone());
        assert_eq!(
            edges(&mut b, &f, &pattern),
            vec![None, None, Some(Action::Start)]
        );

        let (f, t) = flag();
        let mut b = t.while_false(zero.clone());
        assert_eq!(
            edges(&mut b, &f, &pattern),
            vec![None, Some(Action::Cancel), Some(Action::Start)]
        );

        let (f, t) = flag();
        let mut b = t.toggle_on_true(zero);
        assert_eq!(
            edges(&mut b, &f, &pattern),
            vec![None, Some(Action::Toggle), None]
        );
        assert_eq!(b.kind(), BindingKind::ToggleOnTrue);
        assert_eq!(b.command_name(), "WaitCommand");
    }

    #[test]
    fn test_combinators() {
        let pad = Arc::new(SimGamepad::new(0));
        let a = Trigger::button(pad.clone(), 1);
        let b = Trigger::button(pad.clone(), 2);
        let both = a.clone().and(b.clone());
        let either = a.clone().or(b);
        let not_a = a.negate();

        pad.set_button(1, true);
        assert!(!both.get());
        assert!(either.get());
        assert!(!not_a.get());

        pad.set_button(2, true);
        assert!(both.get());
    }
}
