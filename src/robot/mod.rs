//! # Robot program and periodic runtime.
//!
//! - [`Container`] wires tables, input devices and trigger bindings.
//! - [`Robot`] runs the scheduler loop for a [`RobotProgram`] and switches
//!   between [`RobotMode`]s.
//!
//! ```text
//! Robot::builder(cfg).with_subscribers(..).build()
//!     │
//!     ├─ robot.instance() ──► Container::new(&cfg, instance, hid)
//!     ├─ robot.mode()     ──► ModeHandle::set(Teleop)
//!     └─ robot.run(container, token).await
//! ```

mod container;
mod mode;
mod runtime;
mod shutdown;

pub use container::Container;
pub use mode::{ModeHandle, RobotMode};
pub use runtime::{Robot, RobotBuilder, RobotProgram};
