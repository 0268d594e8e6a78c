//! # Global runtime configuration.
//!
//! Provides [`Config`] centralized settings for the robot runtime.
//!
//! Config is used in two ways:
//! 1. **Robot creation**: `Robot::builder(config)`
//! 2. **Container wiring**: `Container::new(&config, &instance, hid)` (table name, tuning defaults)
//!
//! ## Sentinel values
//! - `tick_period = 0s` → clamped to 1 ms (an interval cannot have a zero period)
//! - `bus_capacity = 0` → clamped to 1

use std::time::Duration;

/// Global configuration for the robot runtime.
///
/// ## Field semantics
/// - `tick_period`: Period of the scheduler loop (`20ms`, the usual robot loop rate)
/// - `bus_capacity`: Event bus ring buffer size (min 1)
/// - `table_name`: Name of the table holding the tuning entries and outputs
/// - `multiplier_default`: Value seeded into `Multiplier` when the table has none
///
/// ## Notes
/// All fields are public for flexibility. Prefer using helper accessors to avoid
/// sprinkling sentinel checks (`0`) across the codebase.
#[derive(Clone, Debug)]
pub struct Config {
    /// Period of one scheduler tick.
    ///
    /// A tick that takes longer than this publishes `TickOverrun`; missed
    /// ticks are delayed, not burst.
    pub tick_period: Duration,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow receivers that lag behind more than `bus_capacity` messages will
    /// receive `Lagged` and skip older items.
    pub bus_capacity: usize,

    /// Table used by the container (`/Axis0Test`).
    pub table_name: String,

    /// Default for the `Multiplier` tuning entry.
    pub multiplier_default: f64,
}

impl Config {
    /// Returns the tick period clamped to a minimum of 1 ms.
    #[inline]
    pub fn tick_period_clamped(&self) -> Duration {
        self.tick_period.max(Duration::from_millis(1))
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `tick_period = 20ms`
    /// - `bus_capacity = 1024`
    /// - `table_name = "Axis0Test"`
    /// - `multiplier_default = 1.0`
    fn default() -> Self {
        Self {
            tick_period: Duration::from_millis(20),
            bus_capacity: 1024,
            table_name: "Axis0Test".to_string(),
            multiplier_default: 1.0,
        }
    }
}
