//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait and the [`SubscriberSet`]
//! fan-out used by the robot loop to deliver events from the [`Bus`](crate::events::Bus).
//!
//! ## Architecture
//! ```text
//! Table / Scheduler / Robot ── publish(Event) ──► Bus ──► Robot::run listener
//!                                                              │
//!                                                              ▼
//!                                                        SubscriberSet::emit
//!                                                   ┌──────────┼──────────┐
//!                                                   ▼          ▼          ▼
//!                                               LogWriter   Recorder    Custom
//! ```
//!
//! ## Optional features
//! - `logging`: exports [`LogWriter`], which forwards events to `tracing`.

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
