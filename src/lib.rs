//! # tunevisor
//!
//! **Tunevisor** is a small robot-program runtime built around live tuning.
//!
//! Values that an operator adjusts while the robot runs (gains, multipliers,
//! thresholds) live in an in-process table. Robot code reads them through
//! typed subscribers, and [`seed_and_subscribe`] makes sure every tuning
//! entry is visible with its default before anyone touches it.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  ┌───────────────┐          ┌──────────────────────────────────────────┐
//!  │  SimGamepad   │          │ TableInstance                            │
//!  │  (impl Hid)   │          │  /Axis0Test/Multiplier       1.0 (seed)  │
//!  └──────┬────────┘          │  /Axis0Test/Axis0Multiplied  output      │
//!         │ raw_button(1)     └─────────┬───────────────▲────────────────┘
//!         │ raw_axis(0)                 │ get()         │ set()
//!         ▼                             ▼               │
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Container (RobotProgram)                                         │
//! │  - Trigger::button(hid, 1).while_true(RunCommand)                 │
//! │  - autonomous_command() = WaitCommand(0)                          │
//! └──────────────────────────────┬────────────────────────────────────┘
//!                                ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Robot (tick loop, every Config::tick_period)                     │
//! │  - Scheduler (bindings + scheduled commands)                      │
//! │  - ModeHandle (Disabled / Autonomous / Teleop)                    │
//! │  - SubscriberSet (fans out to user subscribers)                   │
//! └──────────────────────────────┬────────────────────────────────────┘
//!                                ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        Bus (broadcast channel)                    │
//! │   TopicPublished, ValueSet, CommandScheduled, ModeChanged, ...    │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ### Tick
//! ```text
//! Disabled   ─► scheduler.sample_bindings()     (edges are recorded, never fired)
//! Autonomous ─► scheduler.run()                 (autonomous command scheduled on entry)
//! Teleop     ─► scheduler.run()
//!                 ├─ poll bindings  ─► schedule / cancel / toggle commands
//!                 └─ execute each command, end the finished ones
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                          |
//! |-------------------|--------------------------------------------------------------|---------------------------------------------|
//! | **Table**         | Typed topics over a shared store; default-seeding factory.   | [`TableInstance`], [`Table`], [`Topic`]     |
//! | **Commands**      | Tick-driven commands and trigger bindings.                   | [`Command`], [`Trigger`], [`Scheduler`]     |
//! | **Input**         | Gamepad read access and an in-process simulator.             | [`Hid`], [`SimGamepad`]                     |
//! | **Runtime**       | Periodic loop with modes and graceful shutdown.              | [`Robot`], [`RobotProgram`], [`RobotMode`]  |
//! | **Subscriber API**| Hook into table, command and mode events.                    | [`Subscribe`]                               |
//! | **Errors**        | Typed errors for table writes and the runtime.               | [`TableError`], [`RuntimeError`]            |
//! | **Configuration** | Centralize runtime settings.                                 | [`Config`]                                  |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use tunevisor::{TableInstance, seed_and_subscribe};
//!
//! let inst = TableInstance::new();
//! let table = inst.table("Shooter");
//!
//! let kp = seed_and_subscribe(&table, "kP", 0.02).unwrap();
//! assert_eq!(kp.get(), 0.02);
//! assert!(table.contains_key("kP"));
//!
//! // an operator changes the value; the subscriber sees it
//! table.double_topic("kP").publish().set(0.05).unwrap();
//! assert_eq!(kp.get(), 0.05);
//! ```
mod commands;
mod config;
mod error;
mod events;
mod hid;
mod robot;
mod subscribers;
mod table;

// ---- Public re-exports ----

pub use commands::{
    Binding, BindingKind, Command, CommandBox, InstantCommand, RunCommand, Scheduler, Trigger,
    WaitCommand,
};
pub use config::Config;
pub use error::{RuntimeError, TableError};
pub use events::{Bus, Event, EventKind};
pub use hid::{Hid, SimGamepad};
pub use robot::{Container, ModeHandle, Robot, RobotBuilder, RobotMode, RobotProgram};
pub use subscribers::{Subscribe, SubscriberSet};
pub use table::{
    PATH_SEPARATOR, PublishErrorOf, Publisher, Subscriber, SubscriberOf, Table, TableInstance,
    TableSource, Timestamped, Topic, TopicSource, TopicType, Value, ValuePublisher,
    ValueSubscriber, seed_and_subscribe,
};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
