//! Per-question countdown timer.
//!
//! A countdown runs as its own tokio task and reports back through plain
//! callbacks. The task never touches quiz state; callers usually forward the
//! callbacks into a channel as [`TimerEvent`]s tagged with the [`TimerId`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::trace;

const TICK: Duration = Duration::from_secs(1);

static NEXT_TIMER_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies one countdown for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

impl TimerId {
    fn next() -> Self {
        Self(NEXT_TIMER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Something a countdown reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerEvent {
    pub timer: TimerId,
    pub kind: TimerEventKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEventKind {
    /// Seconds left, counting down to 1.
    Tick(u32),
    Expired,
}

/// Owns a running countdown. Dropping the handle cancels it.
#[derive(Debug)]
pub struct TimerHandle {
    id: TimerId,
    task: Option<JoinHandle<()>>,
}

impl TimerHandle {
    pub fn id(&self) -> TimerId {
        self.id
    }

    /// Stops all future ticks and the expiry. Safe to call more than once.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            trace!(timer = self.id.0, "countdown cancelled");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.task.is_none()
    }

    /// True once the expiry callback has run or the countdown was cancelled.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(|task| task.is_finished())
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Starts a countdown of `duration_secs` seconds.
///
/// `on_tick` is called right away with `duration_secs`, then once per second
/// with the remaining time down to 1. One second after the last tick
/// `on_expire` is called exactly once. A zero duration counts as one second.
///
/// Must be called from within a tokio runtime. On a current-thread runtime
/// no callback runs after [`TimerHandle::cancel`] returns. On a multi-thread
/// runtime a callback already running on another worker may still finish.
pub fn start<T, E>(duration_secs: u32, on_tick: T, on_expire: E) -> TimerHandle
where
    T: FnMut(u32) + Send + 'static,
    E: FnOnce() + Send + 'static,
{
    spawn_countdown(TimerId::next(), duration_secs, on_tick, on_expire)
}

fn spawn_countdown<T, E>(id: TimerId, duration_secs: u32, mut on_tick: T, on_expire: E) -> TimerHandle
where
    T: FnMut(u32) + Send + 'static,
    E: FnOnce() + Send + 'static,
{
    let duration_secs = duration_secs.max(1);

    let task = tokio::spawn(async move {
        let mut interval = time::interval(TICK);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        for remaining in (1..=duration_secs).rev() {
            interval.tick().await;
            on_tick(remaining);
        }

        interval.tick().await;
        trace!(timer = id.0, "countdown expired");
        on_expire();
    });

    TimerHandle {
        id,
        task: Some(task),
    }
}

/// Starts a countdown that reports through `sender`.
pub fn start_with_channel(
    duration_secs: u32,
    sender: tokio::sync::mpsc::UnboundedSender<TimerEvent>,
) -> TimerHandle {
    let id = TimerId::next();
    let tick_sender = sender.clone();

    spawn_countdown(
        id,
        duration_secs,
        move |remaining| {
            let _ = tick_sender.send(TimerEvent {
                timer: id,
                kind: TimerEventKind::Tick(remaining),
            });
        },
        move || {
            let _ = sender.send(TimerEvent {
                timer: id,
                kind: TimerEventKind::Expired,
            });
        },
    )
}
