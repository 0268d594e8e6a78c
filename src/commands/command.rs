//! # Command abstraction.
//!
//! A [`Command`] is a unit of robot behavior driven by the [`Scheduler`](crate::Scheduler)
//! once per tick. It is synchronous: every hook runs inside the tick loop and
//! must return quickly.
//!
//! ## Lifecycle
//! ```text
//! schedule ──► initialize()
//!                  │
//! every tick ──► execute() ──► is_finished()? ──yes──► end(false)
//!                  │
//! cancel ─────────────────────────────────────────────► end(true)
//! ```

/// Tick-driven unit of behavior.
///
/// # Example
/// ```
/// use tunevisor::Command;
///
/// struct Countdown {
///     left: u32,
/// }
///
/// impl Command for Countdown {
///     fn name(&self) -> &str { "countdown" }
///
///     fn execute(&mut self) {
///         self.left = self.left.saturating_sub(1);
///     }
///
///     fn is_finished(&mut self) -> bool {
///         self.left == 0
///     }
/// }
/// ```
pub trait Command: Send + 'static {
    /// Stable, human-readable name. At most one command per name is scheduled.
    fn name(&self) -> &str;

    /// Called once when the command is scheduled.
    fn initialize(&mut self) {}

    /// Called on every tick while scheduled.
    fn execute(&mut self) {}

    /// Checked after each `execute`; `true` ends the command normally.
    fn is_finished(&mut self) -> bool {
        false
    }

    /// Called once when the command ends. `interrupted` is true when it was cancelled.
    fn end(&mut self, interrupted: bool) {
        let _ = interrupted;
    }
}

/// Owned, type-erased command.
pub type CommandBox = Box<dyn Command>;
