//! # Robot: the periodic loop driving a [`RobotProgram`].
//!
//! The [`Robot`] owns the event bus, the table instance sharing it, and the
//! mode channel. [`Robot::run`] builds a [`Scheduler`], lets the program bind
//! its triggers, then ticks until cancelled.
//!
//! ## Loop
//! ```text
//! Robot::run(program, token)
//!   ├─ subscriber_listener(): Bus ─► SubscriberSet::emit(&Event)   (own task)
//!   ├─ program.configure_bindings(&mut scheduler)
//!   ├─ enter(initial mode)
//!   └─ loop (biased select):
//!        token.cancelled()            → stop
//!        OS signal                    → stop
//!        mode_rx.changed()            → cancel_all, ModeChanged, enter(mode)
//!        interval.tick()              → tick()
//!
//! tick():
//!   Disabled   → scheduler.sample_bindings()
//!   otherwise  → scheduler.run()
//!   elapsed > tick_period → TickOverrun
//!
//! stop:
//!   ShutdownRequested → scheduler.cancel_all() → AllStoppedWithin
//!   listener drains up to AllStoppedWithin → SubscriberSet::shutdown().await
//! ```
//!
//! ## Rules
//! - Mode changes are applied between ticks, never inside one.
//! - Every mode change cancels every scheduled command.
//! - Entering `Autonomous` schedules the program's autonomous command, if any.
//! - While `Disabled`, bindings are sampled so that an input already held when
//!   the robot is enabled does not count as a fresh press.
//! - Missed ticks are delayed, not burst.
//! - Event delivery runs beside the loop; a busy bus never delays a tick.
//! - The robot listens to its bus from `build()` on, so writes made before
//!   `run` (the container's seeds) still reach subscribers.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{broadcast, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::commands::{CommandBox, Scheduler};
use crate::config::Config;
use crate::error::RuntimeError;
use crate::events::{Bus, Event, EventKind};
use crate::subscribers::{Subscribe, SubscriberSet};
use crate::table::TableInstance;

use super::mode::{ModeHandle, RobotMode};
use super::shutdown;

/// What a robot program provides to the loop.
pub trait RobotProgram: Send + 'static {
    /// Registers trigger bindings; called once before the first tick.
    fn configure_bindings(&self, scheduler: &mut Scheduler);

    /// Command scheduled when the robot enters [`RobotMode::Autonomous`].
    fn autonomous_command(&self) -> Option<CommandBox> {
        None
    }
}

/// Builder for [`Robot`].
pub struct RobotBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
    mode: RobotMode,
    handle_signals: bool,
}

impl RobotBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
            mode: RobotMode::Disabled,
            handle_signals: true,
        }
    }

    /// Sets event subscribers.
    ///
    /// Subscribers receive table, command and mode events through dedicated
    /// workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Mode the robot starts in (default `Disabled`).
    pub fn with_mode(mut self, mode: RobotMode) -> Self {
        self.mode = mode;
        self
    }

    /// Whether OS termination signals stop the loop (default `true`).
    pub fn with_signals(mut self, enabled: bool) -> Self {
        self.handle_signals = enabled;
        self
    }

    pub fn build(self) -> Robot {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let instance = TableInstance::with_bus(bus.clone());
        let early_rx = Mutex::new(Some(bus.subscribe()));

        Robot {
            cfg: self.cfg,
            bus,
            early_rx,
            instance,
            subscribers: self.subscribers,
            mode: ModeHandle::new(self.mode),
            handle_signals: self.handle_signals,
        }
    }
}

/// Periodic runtime for a single robot program.
pub struct Robot {
    cfg: Config,
    bus: Bus,
    // receiver opened by build(); the first run() takes it
    early_rx: Mutex<Option<broadcast::Receiver<Event>>>,
    instance: TableInstance,
    subscribers: Vec<Arc<dyn Subscribe>>,
    mode: ModeHandle,
    handle_signals: bool,
}

impl Robot {
    pub fn builder(cfg: Config) -> RobotBuilder {
        RobotBuilder::new(cfg)
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Table instance whose writes are reported on this robot's bus.
    pub fn instance(&self) -> &TableInstance {
        &self.instance
    }

    /// Handle for switching modes while [`Robot::run`] is active.
    pub fn mode(&self) -> ModeHandle {
        self.mode.clone()
    }

    /// Runs the loop until `token` is cancelled or an OS signal arrives.
    ///
    /// Must be called inside a tokio runtime. Returns an error only if signal
    /// listeners cannot be registered; the loop is still shut down cleanly.
    pub async fn run<P: RobotProgram>(
        &self,
        program: P,
        token: CancellationToken,
    ) -> Result<(), RuntimeError> {
        let (done_tx, done_rx) = oneshot::channel();
        let listener = self.subscriber_listener(done_rx);

        let mut scheduler = Scheduler::new(self.bus.clone());
        program.configure_bindings(&mut scheduler);

        let mut mode_rx = self.mode.subscribe();
        let mut current = *mode_rx.borrow_and_update();
        self.enter(current, &program, &mut scheduler);

        let period = self.cfg.tick_period_clamped();
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let signal = shutdown::stop_requested(self.handle_signals);
        tokio::pin!(signal);

        tracing::info!(
            mode = current.as_label(),
            period_ms = period.as_millis() as u64,
            "robot loop started"
        );
        let mut result = Ok(());

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                res = &mut signal => {
                    if let Err(e) = res {
                        tracing::error!(error = %e, "signal registration failed");
                        result = Err(e);
                    }
                    break;
                }
                changed = mode_rx.changed() => {
                    if changed.is_err() {
                        continue;
                    }
                    let next = *mode_rx.borrow_and_update();
                    if next != current {
                        scheduler.cancel_all();
                        self.bus.publish(
                            Event::new(EventKind::ModeChanged).with_reason(next.as_label()),
                        );
                        current = next;
                        self.enter(current, &program, &mut scheduler);
                    }
                }
                _ = interval.tick() => self.tick(current, &mut scheduler, period),
            }
        }

        let last = self.stop(&mut scheduler);
        let _ = done_tx.send(last);
        if let Err(e) = listener.await {
            tracing::warn!(error = %e, "subscriber listener failed");
        }
        tracing::info!("robot loop stopped");
        result
    }

    /// Forwards bus events to the subscriber set on its own task.
    ///
    /// When `done` yields the seq of the final shutdown event, the listener
    /// delivers what is still queued up to that event, then stops the workers.
    fn subscriber_listener(&self, mut done: oneshot::Receiver<u64>) -> JoinHandle<()> {
        let mut rx = self
            .early_rx
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
            .unwrap_or_else(|| self.bus.subscribe());
        let subs = SubscriberSet::new(self.subscribers.clone(), self.bus.clone());
        let limit = self.cfg.bus_capacity_clamped();

        tokio::spawn(async move {
            let last = loop {
                tokio::select! {
                    biased;
                    last = &mut done => break last.ok(),
                    ev = rx.recv() => match ev {
                        Ok(ev) => subs.emit(&ev),
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            tracing::warn!(skipped = n, "subscriber listener lagged");
                        }
                        Err(broadcast::error::RecvError::Closed) => break None,
                    },
                }
            };
            if let Some(last) = last {
                drain_until(&mut rx, &subs, last, limit);
            }
            subs.shutdown().await;
        })
    }

    fn enter<P: RobotProgram>(&self, mode: RobotMode, program: &P, scheduler: &mut Scheduler) {
        match mode {
            RobotMode::Disabled => scheduler.sample_bindings(),
            RobotMode::Autonomous => {
                if let Some(cmd) = program.autonomous_command() {
                    scheduler.schedule_boxed(cmd);
                }
            }
            RobotMode::Teleop => {}
        }
    }

    fn tick(&self, mode: RobotMode, scheduler: &mut Scheduler, period: Duration) {
        let started = Instant::now();
        if mode.is_enabled() {
            scheduler.run();
        } else {
            scheduler.sample_bindings();
        }
        self.report_overrun(started.elapsed(), period);
    }

    fn report_overrun(&self, elapsed: Duration, period: Duration) {
        if elapsed > period {
            tracing::warn!(elapsed_ms = elapsed.as_millis() as u64, "tick overrun");
            self.bus
                .publish(Event::new(EventKind::TickOverrun).with_elapsed(elapsed));
        }
    }

    /// Publishes the shutdown events; returns the seq of the last one.
    fn stop(&self, scheduler: &mut Scheduler) -> u64 {
        self.bus.publish(Event::new(EventKind::ShutdownRequested));
        let started = Instant::now();
        scheduler.cancel_all();
        let stopped = Event::new(EventKind::AllStoppedWithin).with_elapsed(started.elapsed());
        let seq = stopped.seq;
        self.bus.publish(stopped);
        seq
    }
}

/// Emits queued events until the one with seq `last`, an empty queue, or
/// `limit` events (other writers may keep the bus busy).
fn drain_until(
    rx: &mut broadcast::Receiver<Event>,
    subs: &SubscriberSet,
    last: u64,
    limit: usize,
) {
    let mut emitted = 0;
    while emitted < limit {
        match rx.try_recv() {
            Ok(ev) => {
                subs.emit(&ev);
                emitted += 1;
                if ev.seq == last {
                    break;
                }
            }
            Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::RunCommand;
    use crate::hid::SimGamepad;
    use crate::robot::Container;
    use crate::table::Value;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<(EventKind, Option<String>)>>,
    }

    impl Recorder {
        fn kinds(&self) -> Vec<EventKind> {
            self.seen.lock().unwrap().iter().map(|(k, _)| *k).collect()
        }

        fn with_kind(&self, kind: EventKind) -> Vec<Option<String>> {
            self.seen
                .lock()
                .unwrap()
                .iter()
                .filter(|(k, _)| *k == kind)
                .map(|(_, s)| s.clone())
                .collect()
        }
    }

    #[async_trait]
    impl Subscribe for Recorder {
        async fn on_event(&self, e: &Event) {
            let detail = e
                .command
                .as_deref()
                .or(e.reason.as_deref())
                .map(str::to_string);
            self.seen.lock().unwrap().push((e.kind, detail));
        }

        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    struct AutoProgram {
        runs: Arc<AtomicUsize>,
    }

    impl RobotProgram for AutoProgram {
        fn configure_bindings(&self, _scheduler: &mut Scheduler) {}

        fn autonomous_command(&self) -> Option<CommandBox> {
            let runs = Arc::clone(&self.runs);
            Some(Box::new(RunCommand::new("auto", move || {
                runs.fetch_add(1, Ordering::SeqCst);
            })))
        }
    }

    fn robot(mode: RobotMode, rec: &Arc<Recorder>) -> Robot {
        Robot::builder(Config::default())
            .with_subscribers(vec![rec.clone() as Arc<dyn Subscribe>])
            .with_mode(mode)
            .with_signals(false)
            .build()
    }

    #[tokio::test(start_paused = true)]
    async fn test_teleop_button_drives_output() {
        let rec = Arc::new(Recorder::default());
        let robot = Arc::new(robot(RobotMode::Teleop, &rec));
        let pad = Arc::new(SimGamepad::new(0));
        let container = Container::new(robot.config(), robot.instance(), pad.clone()).unwrap();
        let token = CancellationToken::new();

        let handle = {
            let robot = Arc::clone(&robot);
            let token = token.clone();
            tokio::spawn(async move { robot.run(container, token).await })
        };

        time::sleep(Duration::from_millis(50)).await;
        assert_eq!(robot.instance().get_value("/Axis0Test/Axis0Multiplied"), None);

        pad.set_axis(0, -0.25);
        pad.set_button(1, true);
        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(
            robot.instance().get_value("/Axis0Test/Axis0Multiplied"),
            Some(Value::Double(-0.25))
        );

        robot
            .instance()
            .table("Axis0Test")
            .double_topic("Multiplier")
            .publish()
            .set(4.0)
            .unwrap();
        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(
            robot.instance().get_value("/Axis0Test/Axis0Multiplied"),
            Some(Value::Double(-1.0))
        );

        token.cancel();
        handle.await.unwrap().unwrap();

        let kinds = rec.kinds();
        assert!(kinds.contains(&EventKind::CommandScheduled));
        let requested = kinds
            .iter()
            .position(|k| *k == EventKind::ShutdownRequested)
            .unwrap();
        assert_eq!(kinds[requested + 1], EventKind::CommandInterrupted);
        assert_eq!(kinds.last(), Some(&EventKind::AllStoppedWithin));
        // the held command was interrupted by shutdown
        assert_eq!(
            rec.with_kind(EventKind::CommandInterrupted),
            vec![Some("Axis0Multiplied".to_string())]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_ignores_buttons() {
        let rec = Arc::new(Recorder::default());
        let robot = Arc::new(robot(RobotMode::Disabled, &rec));
        let pad = Arc::new(SimGamepad::new(0));
        let container = Container::new(robot.config(), robot.instance(), pad.clone()).unwrap();
        let token = CancellationToken::new();

        let handle = {
            let robot = Arc::clone(&robot);
            let token = token.clone();
            tokio::spawn(async move { robot.run(container, token).await })
        };

        pad.set_axis(0, 1.0);
        pad.set_button(1, true);
        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(robot.instance().get_value("/Axis0Test/Axis0Multiplied"), None);

        // enabling with the button already held is not a press
        robot.mode().set(RobotMode::Teleop);
        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(robot.instance().get_value("/Axis0Test/Axis0Multiplied"), None);

        pad.set_button(1, false);
        time::sleep(Duration::from_millis(50)).await;
        pad.set_button(1, true);
        time::sleep(Duration::from_millis(50)).await;
        assert_eq!(
            robot.instance().get_value("/Axis0Test/Axis0Multiplied"),
            Some(Value::Double(1.0))
        );

        token.cancel();
        handle.await.unwrap().unwrap();
        assert_eq!(
            rec.with_kind(EventKind::ModeChanged),
            vec![Some("teleop".to_string())]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_autonomous_runs_until_mode_change() {
        let rec = Arc::new(Recorder::default());
        let robot = Arc::new(robot(RobotMode::Autonomous, &rec));
        let runs = Arc::new(AtomicUsize::new(0));
        let program = AutoProgram { runs: runs.clone() };
        let token = CancellationToken::new();

        let handle = {
            let robot = Arc::clone(&robot);
            let token = token.clone();
            tokio::spawn(async move { robot.run(program, token).await })
        };

        time::sleep(Duration::from_millis(100)).await;
        let during_auto = runs.load(Ordering::SeqCst);
        assert!(during_auto >= 3);

        robot.mode().set(RobotMode::Teleop);
        time::sleep(Duration::from_millis(10)).await;
        let after_switch = runs.load(Ordering::SeqCst);
        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(runs.load(Ordering::SeqCst), after_switch);

        token.cancel();
        handle.await.unwrap().unwrap();
        assert_eq!(
            rec.with_kind(EventKind::CommandInterrupted),
            vec![Some("auto".to_string())]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_first_tick() {
        let rec = Arc::new(Recorder::default());
        let robot = robot(RobotMode::Teleop, &rec);
        let token = CancellationToken::new();
        token.cancel();

        let pad = Arc::new(SimGamepad::new(0));
        let container = Container::new(robot.config(), robot.instance(), pad).unwrap();
        robot.run(container, token).await.unwrap();

        // the seed written before run() is delivered too
        assert_eq!(
            rec.kinds(),
            vec![
                EventKind::TopicPublished,
                EventKind::ValueSet,
                EventKind::ShutdownRequested,
                EventKind::AllStoppedWithin
            ]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_table_flood_does_not_starve_ticks() {
        let rec = Arc::new(Recorder::default());
        let robot = Arc::new(robot(RobotMode::Autonomous, &rec));
        let runs = Arc::new(AtomicUsize::new(0));
        let program = AutoProgram { runs: runs.clone() };
        let token = CancellationToken::new();

        let handle = {
            let robot = Arc::clone(&robot);
            let token = token.clone();
            tokio::spawn(async move { robot.run(program, token).await })
        };
        time::sleep(Duration::from_millis(100)).await;

        let flooding = Arc::new(AtomicBool::new(true));
        let dashboard = {
            let publisher = robot.instance().table("Dash").double_topic("x").publish();
            let flooding = flooding.clone();
            std::thread::spawn(move || {
                let mut v = 0.0;
                while flooding.load(Ordering::Relaxed) {
                    publisher.set(v).unwrap();
                    v += 1.0;
                }
            })
        };

        let before = runs.load(Ordering::SeqCst);
        time::sleep(Duration::from_millis(400)).await;
        let ticks = runs.load(Ordering::SeqCst) - before;

        flooding.store(false, Ordering::Relaxed);
        dashboard.join().unwrap();
        token.cancel();
        handle.await.unwrap().unwrap();

        // 20 ticks expected at 20ms
        assert!(ticks >= 16, "ticks during flood: {ticks}");
    }

    #[tokio::test]
    async fn test_overrun_is_reported() {
        let rec = Arc::new(Recorder::default());
        let robot = robot(RobotMode::Disabled, &rec);
        let mut rx = robot.bus().subscribe();

        robot.report_overrun(Duration::from_millis(10), Duration::from_millis(20));
        robot.report_overrun(Duration::from_millis(25), Duration::from_millis(20));

        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::TickOverrun);
        assert_eq!(ev.elapsed_ms, Some(25));
        assert!(rx.try_recv().is_err());
    }
}
