//! # Example: axis_tuning
//!
//! Runs the axis-tuning container against a simulated gamepad and an
//! operator script, logging every table and command event.
//!
//! Shows how to:
//! - Build a [`Robot`] with a [`LogWriter`] subscriber.
//! - Wire a [`Container`] to the robot's table instance.
//! - Drive modes and inputs from another task while the loop runs.
//!
//! ## Flow
//! ```text
//! Robot::builder(cfg).build()
//!     ├─► Container::new()         seeds /Axis0Test/Multiplier = 1.0
//!     ├─► robot.run(container)     ticks every 20ms
//!     └─► operator script
//!           ├─► mode = Teleop
//!           ├─► hold button 1, move axis 0   → Axis0Multiplied = axis
//!           ├─► Multiplier = 2.5             → Axis0Multiplied = 2.5 × axis
//!           ├─► release button 1             → command interrupted
//!           └─► token.cancel()               → ShutdownRequested, AllStoppedWithin
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example axis_tuning --features logging
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tunevisor::{Config, Container, LogWriter, Robot, RobotMode, SimGamepad, Subscribe};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .init();

    let cfg = Config::default();
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let robot = Arc::new(Robot::builder(cfg).with_subscribers(subs).build());

    let pad = Arc::new(SimGamepad::new(0));
    let container = Container::new(robot.config(), robot.instance(), pad.clone())?;
    let token = CancellationToken::new();

    let operator = {
        let robot = Arc::clone(&robot);
        let token = token.clone();
        tokio::spawn(async move {
            let multiplier = robot
                .instance()
                .table(&robot.config().table_name)
                .double_topic("Multiplier")
                .publish();

            robot.mode().set(RobotMode::Teleop);
            tokio::time::sleep(Duration::from_millis(100)).await;

            pad.set_axis(0, 0.4);
            pad.set_button(1, true);
            tokio::time::sleep(Duration::from_millis(60)).await;

            multiplier.set(2.5)?;
            tokio::time::sleep(Duration::from_millis(60)).await;

            pad.set_button(1, false);
            tokio::time::sleep(Duration::from_millis(60)).await;

            robot.mode().set(RobotMode::Disabled);
            tokio::time::sleep(Duration::from_millis(40)).await;

            token.cancel();
            anyhow::Ok(())
        })
    };

    robot.run(container, token).await?;
    operator.await??;

    let last = robot
        .instance()
        .get_value("/Axis0Test/Axis0Multiplied")
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<unset>".to_string());
    println!("final Axis0Multiplied = {last}");
    Ok(())
}
