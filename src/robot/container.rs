//! # Container: tables, input devices and bindings of the robot program.
//!
//! ```text
//! /Axis0Test
//!   ├─ Multiplier       tuning input, seeded with the default at startup
//!   └─ Axis0Multiplied  output, Multiplier × axis 0 while button 1 is held
//! ```
//!
//! The table is per-subsystem; here there is only one. Entry names appear
//! once, in [`Container::new`]; everything else goes through the typed handles.

use std::sync::Arc;
use std::time::Duration;

use crate::commands::{CommandBox, RunCommand, Scheduler, Trigger, WaitCommand};
use crate::config::Config;
use crate::error::TableError;
use crate::hid::Hid;
use crate::table::{Publisher, Subscriber, Table, TableInstance, seed_and_subscribe};

use super::runtime::RobotProgram;

/// Robot program publishing a tuning-scaled gamepad axis.
pub struct Container<H: Hid> {
    hid: Arc<H>,
    table: Table,
    axis0_pub: Publisher<f64>,
    mult_getter: Subscriber<f64>,
}

impl<H: Hid> Container<H> {
    pub const OUTPUT_KEY: &'static str = "Axis0Multiplied";
    pub const MULTIPLIER_KEY: &'static str = "Multiplier";
    pub const ENABLE_BUTTON: usize = 1;
    pub const INPUT_AXIS: usize = 0;

    /// Builds the handles and seeds the tuning entry.
    ///
    /// Fails only if the table already holds `Multiplier` with a non-double value.
    pub fn new(cfg: &Config, instance: &TableInstance, hid: Arc<H>) -> Result<Self, TableError> {
        let table = instance.table(&cfg.table_name);
        // the output is read by a human, no default needed
        let axis0_pub = table.double_topic(Self::OUTPUT_KEY).publish();
        let mult_getter = seed_and_subscribe(&table, Self::MULTIPLIER_KEY, cfg.multiplier_default)?;

        Ok(Self {
            hid,
            table,
            axis0_pub,
            mult_getter,
        })
    }

    /// Command publishing `multiplier × axis` on every tick.
    pub fn publish_axis_zero_multiplied(&self) -> RunCommand {
        let hid = Arc::clone(&self.hid);
        let out = self.axis0_pub.clone();
        let mult = self.mult_getter.clone();

        RunCommand::new(Self::OUTPUT_KEY, move || {
            let value = mult.get() * hid.raw_axis(Self::INPUT_AXIS);
            if let Err(e) = out.set(value) {
                tracing::warn!(key = out.name(), error = %e, "output publish failed");
            }
        })
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn multiplier(&self) -> &Subscriber<f64> {
        &self.mult_getter
    }

    pub fn output(&self) -> &Publisher<f64> {
        &self.axis0_pub
    }
}

impl<H: Hid> RobotProgram for Container<H> {
    fn configure_bindings(&self, scheduler: &mut Scheduler) {
        let button = Trigger::button(Arc::clone(&self.hid), Self::ENABLE_BUTTON);
        scheduler.bind(button.while_true(self.publish_axis_zero_multiplied()));
    }

    fn autonomous_command(&self) -> Option<CommandBox> {
        Some(Box::new(WaitCommand::new(Duration::ZERO)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Bus;
    use crate::hid::SimGamepad;
    use crate::table::Value;

    fn setup() -> (TableInstance, Arc<SimGamepad>, Container<SimGamepad>) {
        let inst = TableInstance::new();
        let pad = Arc::new(SimGamepad::new(0));
        let container = Container::new(&Config::default(), &inst, pad.clone()).unwrap();
        (inst, pad, container)
    }

    #[test]
    fn test_new_seeds_multiplier_only() {
        let (inst, _pad, container) = setup();
        assert_eq!(
            inst.get_value("/Axis0Test/Multiplier"),
            Some(Value::Double(1.0))
        );
        assert_eq!(container.multiplier().get(), 1.0);
        assert_eq!(container.table().keys(), vec!["Multiplier".to_string()]);
    }

    #[test]
    fn test_new_keeps_operator_value() {
        let inst = TableInstance::new();
        inst.table("Axis0Test")
            .double_topic("Multiplier")
            .publish()
            .set(0.5)
            .unwrap();

        let pad = Arc::new(SimGamepad::new(0));
        let container = Container::new(&Config::default(), &inst, pad).unwrap();
        assert_eq!(container.multiplier().get(), 0.5);
    }

    #[test]
    fn test_new_fails_on_wrong_type() {
        let inst = TableInstance::new();
        inst.table("Axis0Test")
            .string_topic("Multiplier")
            .publish()
            .set("x".into())
            .unwrap();

        let pad = Arc::new(SimGamepad::new(0));
        let err = Container::new(&Config::default(), &inst, pad).err().unwrap();
        assert_eq!(err.as_label(), "table_type_mismatch");
    }

    #[test]
    fn test_button_publishes_scaled_axis() {
        let (inst, pad, container) = setup();
        let mut sched = Scheduler::new(Bus::new(64));
        container.configure_bindings(&mut sched);

        pad.set_axis(0, 0.5);
        sched.run();
        assert!(!container.table().contains_key("Axis0Multiplied"));

        pad.set_button(1, true);
        sched.run();
        assert_eq!(
            inst.get_value("/Axis0Test/Axis0Multiplied"),
            Some(Value::Double(0.5))
        );

        // operator retunes while the button is held
        inst.table("Axis0Test")
            .double_topic("Multiplier")
            .publish()
            .set(3.0)
            .unwrap();
        sched.run();
        assert_eq!(
            inst.get_value("/Axis0Test/Axis0Multiplied"),
            Some(Value::Double(1.5))
        );

        pad.set_button(1, false);
        pad.set_axis(0, -1.0);
        sched.run();
        assert_eq!(
            inst.get_value("/Axis0Test/Axis0Multiplied"),
            Some(Value::Double(1.5))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_autonomous_is_zero_wait() {
        let (_inst, _pad, container) = setup();
        let mut sched = Scheduler::new(Bus::new(8));

        let auto = container.autonomous_command().unwrap();
        assert_eq!(auto.name(), "WaitCommand");
        sched.schedule_boxed(auto);
        sched.run();
        assert!(sched.scheduled().is_empty());
    }
}
