//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to events emitted by the table, the command scheduler
//! and the robot tick loop.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `TableInstance` writes, `Scheduler`, `Robot`,
//!   `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: `Robot::run` (fans out to `SubscriberSet`) and any caller
//!   holding [`Bus::subscribe`].

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
