//! Real-time driver for [`GuidedTimer`].
//!
//! One tokio task owns the timer and ticks it every second, so ticks never
//! overlap. Commands go in over a channel, events come out over another.
//! Dropping the driver aborts the task.
//!
//! Once [`TimerDriver::cancel`] returns, the task emits no further phase
//! change or completion: the cancel flag and each tick share one lock.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::{GuidedTimer, Phase};
use crate::events::Event;

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    Pause,
    Resume,
    Cancel,
}

#[derive(Debug, Clone, Default)]
struct CancelFlag(Arc<Mutex<bool>>);

impl CancelFlag {
    fn lock(&self) -> MutexGuard<'_, bool> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set(&self) {
        *self.lock() = true;
    }

    fn is_set(&self) -> bool {
        *self.lock()
    }
}

/// Handle to a running guided timer.
#[derive(Debug)]
pub struct TimerDriver {
    commands: mpsc::UnboundedSender<TimerCommand>,
    cancelled: CancelFlag,
    handle: Option<JoinHandle<GuidedTimer>>,
}

impl TimerDriver {
    /// Start `timer` on the current runtime.
    ///
    /// The event stream ends after completion or cancellation.
    pub fn start(timer: GuidedTimer) -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let cancelled = CancelFlag::default();
        let handle = tokio::spawn(run(timer, command_rx, event_tx, cancelled.clone()));
        (
            Self {
                commands: command_tx,
                cancelled,
                handle: Some(handle),
            },
            event_rx,
        )
    }

    /// Returns false once the timer task has exited.
    pub fn send(&self, command: TimerCommand) -> bool {
        if command == TimerCommand::Cancel {
            self.cancelled.set();
        }
        self.commands.send(command).is_ok()
    }

    pub fn pause(&self) -> bool {
        self.send(TimerCommand::Pause)
    }

    pub fn resume(&self) -> bool {
        self.send(TimerCommand::Resume)
    }

    pub fn cancel(&self) -> bool {
        self.send(TimerCommand::Cancel)
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Abort the tick task without emitting further events.
    pub fn stop(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Wait for the run to end and hand back the final timer.
    ///
    /// Returns `None` if the task was aborted or panicked.
    pub async fn join(mut self) -> Option<GuidedTimer> {
        let handle = self.handle.take()?;
        handle.await.ok()
    }
}

impl Drop for TimerDriver {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

async fn run(
    mut timer: GuidedTimer,
    mut commands: mpsc::UnboundedReceiver<TimerCommand>,
    events: mpsc::UnboundedSender<Event>,
    cancelled: CancelFlag,
) -> GuidedTimer {
    if let Some(event) = timer.start() {
        let _ = events.send(event);
    }
    let mut ticker = interval_at(Instant::now() + TICK, TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            command = commands.recv() => {
                let command = if cancelled.is_set() {
                    Some(TimerCommand::Cancel)
                } else {
                    command
                };
                match command {
                    Some(TimerCommand::Pause) => {
                        if let Some(event) = timer.pause() {
                            let _ = events.send(event);
                        }
                    }
                    Some(TimerCommand::Resume) => {
                        if let Some(event) = timer.resume() {
                            // A full second elapses before the next decrement.
                            ticker.reset();
                            let _ = events.send(event);
                        }
                    }
                    Some(TimerCommand::Cancel) | None => {
                        cancel_run(&mut timer, &events);
                        break;
                    }
                }
            }
            _ = ticker.tick() => {
                if !tick_unless_cancelled(&mut timer, &events, &cancelled) {
                    cancel_run(&mut timer, &events);
                    break;
                }
                if timer.phase() == Phase::Done {
                    break;
                }
            }
        }
        if !timer.phase().is_running() && timer.phase() != Phase::Done {
            break;
        }
    }
    tracing::debug!(phase = timer.phase().as_str(), "timer driver stopped");
    timer
}

/// Tick and send the resulting events while holding the cancel lock.
/// Returns false without ticking if cancellation was requested.
fn tick_unless_cancelled(
    timer: &mut GuidedTimer,
    events: &mpsc::UnboundedSender<Event>,
    cancelled: &CancelFlag,
) -> bool {
    let guard = cancelled.lock();
    if *guard {
        return false;
    }
    for event in timer.tick() {
        let _ = events.send(event);
    }
    true
}

fn cancel_run(timer: &mut GuidedTimer, events: &mpsc::UnboundedSender<Event>) {
    if let Some(event) = timer.cancel() {
        let _ = events.send(event);
    }
}
