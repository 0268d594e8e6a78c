//! # Runtime events emitted by the table, the scheduler and the robot loop.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Table events**: topic first published, value written
//! - **Command events**: scheduled, finished, interrupted
//! - **Robot events**: mode changes, tick overruns, shutdown
//! - **Subscriber events**: overflow and panics inside subscriber workers
//!
//! The [`Event`] struct carries additional metadata such as timestamps, key,
//! value, command name and reasons.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use tunevisor::{Event, EventKind, Value};
//!
//! let ev = Event::new(EventKind::ValueSet)
//!     .with_key("/Axis0Test/Multiplier")
//!     .with_value(Value::Double(1.0));
//!
//! assert_eq!(ev.kind, EventKind::ValueSet);
//! assert_eq!(ev.key.as_deref(), Some("/Axis0Test/Multiplier"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::table::Value;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `reason`: subscriber name and panic info
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `reason`: subscriber name and reason ("full", "closed")
    SubscriberOverflow,

    // === Table events ===
    /// A key received its first value and is now visible in the table.
    ///
    /// Sets:
    /// - `key`: full entry path
    /// - `value`: the first value
    TopicPublished,

    /// A value was written to an entry.
    ///
    /// Sets:
    /// - `key`: full entry path
    /// - `value`: the written value
    /// - `writer`: id of the publisher
    ValueSet,

    // === Command events ===
    /// Command was initialized and will execute from the next tick on.
    ///
    /// Sets:
    /// - `command`: command name
    CommandScheduled,

    /// Command reported `is_finished()` and was ended normally.
    ///
    /// Sets:
    /// - `command`: command name
    CommandFinished,

    /// Command was cancelled before finishing.
    ///
    /// Sets:
    /// - `command`: command name
    CommandInterrupted,

    // === Robot events ===
    /// Robot mode changed.
    ///
    /// Sets:
    /// - `reason`: new mode label
    ModeChanged,

    /// One tick took longer than the configured tick period.
    ///
    /// Sets:
    /// - `elapsed_ms`: tick duration (ms)
    TickOverrun,

    /// Shutdown requested (OS signal or cancellation token).
    ShutdownRequested,

    /// All scheduled commands were ended during shutdown.
    AllStoppedWithin,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Full table path of the entry, if applicable.
    pub key: Option<Arc<str>>,
    /// Value written, if applicable.
    pub value: Option<Value>,
    /// Publisher id of the writer.
    pub writer: Option<u64>,
    /// Name of the command, if applicable.
    pub command: Option<Arc<str>>,
    /// Human-readable reason (mode labels, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// Elapsed time in milliseconds (compact).
    pub elapsed_ms: Option<u32>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            key: None,
            value: None,
            writer: None,
            command: None,
            reason: None,
            elapsed_ms: None,
        }
    }

    /// Attaches an entry path.
    #[inline]
    pub fn with_key(mut self, key: impl Into<Arc<str>>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Attaches a value.
    #[inline]
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    /// Attaches a publisher id.
    #[inline]
    pub fn with_writer(mut self, writer: u64) -> Self {
        self.writer = Some(writer);
        self
    }

    /// Attaches a command name.
    #[inline]
    pub fn with_command(mut self, command: impl Into<Arc<str>>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches an elapsed duration (stored as milliseconds).
    #[inline]
    pub fn with_elapsed(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.elapsed_ms = Some(ms);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_reason(format!("subscriber={subscriber} info={info}"))
    }

    #[inline]
    pub fn is_subscriber_event(&self) -> bool {
        matches!(
            self.kind,
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::ModeChanged);
        let b = Event::new(EventKind::ModeChanged);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_elapsed_saturates() {
        let ev = Event::new(EventKind::TickOverrun).with_elapsed(Duration::from_secs(u64::MAX));
        assert_eq!(ev.elapsed_ms, Some(u32::MAX));
    }

    #[test]
    fn test_subscriber_helpers() {
        let ev = Event::subscriber_overflow("log", "full");
        assert!(ev.is_subscriber_event());
        assert_eq!(ev.reason.as_deref(), Some("subscriber=log reason=full"));
    }
}
