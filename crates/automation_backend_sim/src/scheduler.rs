//! Cancellable tick scheduling for the simulated backend.
//!
//! The backend arms at most one pending tick at a time; pausing cancels the
//! handle and resuming arms a new one. [`ThreadScheduler`] paces ticks in real
//! time, [`ManualScheduler`] fires them only when a test asks it to.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

/// Callback invoked when a scheduled tick fires.
pub type TickFn = Box<dyn FnOnce() + Send>;

/// Handle to one armed tick. Dropping the handle does not cancel the tick.
#[derive(Debug, Clone)]
pub struct ScheduledTick {
    cancelled: Arc<AtomicBool>,
}

impl ScheduledTick {
    fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Prevents the tick callback from running if it has not fired yet.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Schedules a single deferred tick on behalf of a backend.
pub trait TickScheduler: Send + Sync + 'static {
    fn schedule(&self, delay: Duration, tick: TickFn) -> ScheduledTick;
}

/// Real-time scheduler: one named sleeper thread per armed tick.
#[derive(Debug, Default)]
pub struct ThreadScheduler;

impl TickScheduler for ThreadScheduler {
    fn schedule(&self, delay: Duration, tick: TickFn) -> ScheduledTick {
        let handle = ScheduledTick::new();
        let cancelled = Arc::clone(&handle.cancelled);
        let spawned = thread::Builder::new()
            .name("automation-sim-tick".to_string())
            .spawn(move || {
                thread::sleep(delay);
                if !cancelled.load(Ordering::SeqCst) {
                    tick();
                }
            });

        if let Err(error) = spawned {
            tracing::warn!(%error, "failed to spawn tick thread; tick will never fire");
        }

        handle
    }
}

struct PendingTick {
    handle: ScheduledTick,
    tick: TickFn,
}

/// Deterministic scheduler for tests: armed ticks fire only when
/// [`ManualScheduler::fire_next`] is called, so tests never sleep.
#[derive(Default)]
pub struct ManualScheduler {
    pending: Mutex<VecDeque<PendingTick>>,
    last_delay: Mutex<Option<Duration>>,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Number of armed ticks, including ticks already cancelled.
    #[must_use]
    pub fn pending_ticks(&self) -> usize {
        lock_unpoisoned(&self.pending).len()
    }

    /// Delay requested by the most recent `schedule` call.
    #[must_use]
    pub fn last_delay(&self) -> Option<Duration> {
        *lock_unpoisoned(&self.last_delay)
    }

    /// Fires the oldest armed tick; cancelled ticks are discarded without
    /// firing. Returns true when a tick callback actually ran.
    pub fn fire_next(&self) -> bool {
        loop {
            let next = lock_unpoisoned(&self.pending).pop_front();
            match next {
                Some(pending) if pending.handle.is_cancelled() => continue,
                Some(pending) => {
                    (pending.tick)();
                    return true;
                }
                None => return false,
            }
        }
    }
}

impl TickScheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, tick: TickFn) -> ScheduledTick {
        let handle = ScheduledTick::new();
        *lock_unpoisoned(&self.last_delay) = Some(delay);
        lock_unpoisoned(&self.pending).push_back(PendingTick {
            handle: handle.clone(),
            tick,
        });
        handle
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
