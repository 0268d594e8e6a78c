//! # LogWriter: event logger
//!
//! A subscriber that forwards every [`Event`] to `tracing`. Table writes and
//! command transitions are logged at `debug`, robot-level events at `info`,
//! subscriber failures at `warn`.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! DEBUG topic published key="/Axis0Test/Multiplier" value=1
//! DEBUG value set key="/Axis0Test/Multiplier" value=1 writer=2
//! INFO  mode changed mode="teleop"
//! DEBUG command scheduled command="Axis0Multiplied"
//! DEBUG value set key="/Axis0Test/Axis0Multiplied" value=0.5 writer=1
//! DEBUG command interrupted command="Axis0Multiplied"
//! INFO  shutdown requested
//! ```

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let key = e.key.as_deref().unwrap_or("");
        let command = e.command.as_deref().unwrap_or("");
        let reason = e.reason.as_deref().unwrap_or("");
        let value = e.value.as_ref().map(ToString::to_string).unwrap_or_default();

        match e.kind {
            EventKind::TopicPublished => debug!(key, %value, "topic published"),
            EventKind::ValueSet => debug!(key, %value, writer = e.writer, "value set"),
            EventKind::CommandScheduled => debug!(command, "command scheduled"),
            EventKind::CommandFinished => debug!(command, "command finished"),
            EventKind::CommandInterrupted => debug!(command, "command interrupted"),
            EventKind::ModeChanged => info!(mode = reason, "mode changed"),
            EventKind::TickOverrun => warn!(elapsed_ms = e.elapsed_ms, "tick overrun"),
            EventKind::ShutdownRequested => info!("shutdown requested"),
            EventKind::AllStoppedWithin => info!("all commands stopped"),
            EventKind::SubscriberOverflow => warn!(reason, "subscriber overflow"),
            EventKind::SubscriberPanicked => warn!(reason, "subscriber panicked"),
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
