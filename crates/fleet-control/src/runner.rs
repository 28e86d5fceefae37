//! `Runner`: drives a [`Controller`] in real time on background threads.
//!
//! Two threads share the controller behind a mutex:
//!
//! - **driver** steps the running engine once, then waits the clock's
//!   `speed_factor` in wall-clock seconds;
//! - **telemetry** publishes the current [`TelemetryFrame`] every
//!   `telemetry_interval`, independent of the speed factor.
//!
//! Commands go through [`Runner::send`] and are applied between ticks, so a
//! pause always lands on a tick boundary.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use fleet_sim::LiveFrame;
use tracing::{debug, info};

use crate::{Command, ControlError, ControlResult, Controller, Response};

/// What the telemetry thread emits.
pub type TelemetryFrame = LiveFrame;

/// How long the driver sleeps when there is nothing to step.
const IDLE_POLL: Duration = Duration::from_millis(20);

/// Consumer of telemetry frames (a dashboard feed, a hardware bridge).
pub trait TelemetrySink: Send + 'static {
    /// Deliver one frame.  Returns `false` once the consumer has gone away,
    /// which ends the telemetry thread.
    fn emit(&mut self, frame: TelemetryFrame) -> bool;
}

impl TelemetrySink for mpsc::Sender<TelemetryFrame> {
    fn emit(&mut self, frame: TelemetryFrame) -> bool {
        self.send(frame).is_ok()
    }
}

impl TelemetrySink for mpsc::SyncSender<TelemetryFrame> {
    fn emit(&mut self, frame: TelemetryFrame) -> bool {
        self.send(frame).is_ok()
    }
}

pub struct Runner {
    controller: Arc<Mutex<Controller>>,
    /// Dropping these disconnects the threads' stop receivers.
    stop_txs:   Vec<mpsc::Sender<()>>,
    workers:    Vec<JoinHandle<()>>,
}

impl Runner {
    /// Spawn the driver and telemetry threads around `controller`.
    pub fn spawn<S: TelemetrySink>(
        controller: Controller,
        sink: S,
        telemetry_interval: Duration,
    ) -> ControlResult<Self> {
        let controller = Arc::new(Mutex::new(controller));
        let mut runner = Self { controller, stop_txs: Vec::new(), workers: Vec::new() };

        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let shared = Arc::clone(&runner.controller);
        let driver = thread::Builder::new()
            .name("fleet-driver".into())
            .spawn(move || drive(&shared, &stop_rx))
            .map_err(|source| ControlError::Spawn { name: "driver", source })?;
        runner.stop_txs.push(stop_tx);
        runner.workers.push(driver);

        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let shared = Arc::clone(&runner.controller);
        let telemetry = thread::Builder::new()
            .name("fleet-telemetry".into())
            .spawn(move || publish(&shared, sink, telemetry_interval, &stop_rx))
            .map_err(|source| ControlError::Spawn { name: "telemetry", source })?;
        runner.stop_txs.push(stop_tx);
        runner.workers.push(telemetry);

        Ok(runner)
    }

    /// Apply one command between ticks.
    pub fn send(&self, command: Command) -> ControlResult<Response> {
        lock_controller(&self.controller).handle(command)
    }

    /// Run `f` with exclusive access to the controller.
    pub fn with_controller<R>(&self, f: impl FnOnce(&mut Controller) -> R) -> R {
        f(&mut lock_controller(&self.controller))
    }

    /// Stop both threads and wait for them.  The controller, with its last
    /// snapshot, stays reachable through [`with_controller`][Self::with_controller].
    pub fn shutdown(&mut self) {
        for tx in self.stop_txs.drain(..) {
            let _ = tx.send(());
        }
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
        info!("runner shut down");
    }
}

impl Drop for Runner {
    fn drop(&mut self) {
        if !self.workers.is_empty() {
            self.shutdown();
        }
    }
}

fn drive(controller: &Mutex<Controller>, stop_rx: &mpsc::Receiver<()>) {
    loop {
        let wait = {
            let mut c = lock_controller(controller);
            match c.step() {
                Some(_) => c.wall_per_tick().unwrap_or(IDLE_POLL),
                None => IDLE_POLL,
            }
        };
        match stop_rx.recv_timeout(wait) {
            Err(RecvTimeoutError::Timeout) => continue,
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    debug!("driver thread exiting");
}

fn publish<S: TelemetrySink>(
    controller: &Mutex<Controller>,
    mut sink: S,
    interval: Duration,
    stop_rx: &mpsc::Receiver<()>,
) {
    loop {
        let frame = lock_controller(controller).live_frame();
        if let Some(frame) = frame {
            if !sink.emit(frame) {
                break;
            }
        }
        match stop_rx.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => continue,
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    debug!("telemetry thread exiting");
}

/// Lock the controller, recovering from a panicked holder.
fn lock_controller(controller: &Mutex<Controller>) -> MutexGuard<'_, Controller> {
    controller.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
