//! Deterministic simulated implementation of the `automation_backend` contract.
//!
//! No transport and no inference: a scripted step sequence is paced by a
//! cancellable tick scheduler. Intended for local development and
//! contract-level integration testing.

mod scheduler;
mod script;

use std::sync::{Arc, Mutex, MutexGuard, Weak};

use automation_backend::{AutomationBackend, AutomationObserver};

pub use scheduler::{ManualScheduler, ScheduledTick, ThreadScheduler, TickFn, TickScheduler};
pub use script::{AutomationScript, ScriptError, PROMPT_PLACEHOLDER};

/// Stable backend identifier used for explicit startup selection.
pub const SIMULATED_BACKEND_ID: &str = "simulated";

/// Fixed closing line emitted with the `completed` event.
pub const CLOSING_SUMMARY: &str = "Automation is complete. Feel free to launch another task.";

fn completion_line(prompt: &str) -> String {
    format!("Finished \"{prompt}\" and documented the outcome for review.")
}

#[derive(Default)]
struct RunState {
    observer: Option<Arc<dyn AutomationObserver>>,
    prompt: String,
    step_index: usize,
    running: bool,
    completed: bool,
    destroyed: bool,
    pending_tick: Option<ScheduledTick>,
}

/// Scripted backend: steps through its templates with a fixed delay, then
/// emits one agent message and one completion summary.
///
/// Pausing cancels the pending tick but keeps the step index; resuming arms a
/// new tick with the full step delay (never the remainder) and continues from
/// the retained index, so no step is skipped or replayed. `cancel` and a
/// fresh `start` reset the index and drop the observer synchronously.
pub struct SimulatedBackend {
    script: AutomationScript,
    scheduler: Arc<dyn TickScheduler>,
    state: Mutex<RunState>,
    weak_self: Weak<Self>,
}

impl SimulatedBackend {
    #[must_use]
    pub fn new(scheduler: Arc<dyn TickScheduler>) -> Arc<Self> {
        Self::with_script(AutomationScript::default(), scheduler)
    }

    #[must_use]
    pub fn with_script(script: AutomationScript, scheduler: Arc<dyn TickScheduler>) -> Arc<Self> {
        Arc::new_cyclic(|weak_self| Self {
            script,
            scheduler,
            state: Mutex::new(RunState::default()),
            weak_self: weak_self.clone(),
        })
    }

    #[must_use]
    pub fn script(&self) -> &AutomationScript {
        &self.script
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.lock_state().running
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.lock_state().completed
    }

    /// Index of the next template to emit; retained across pause/resume.
    #[must_use]
    pub fn step_index(&self) -> usize {
        self.lock_state().step_index
    }

    fn arm_tick(&self, state: &mut RunState) {
        let weak_self = self.weak_self.clone();
        let tick: TickFn = Box::new(move || {
            if let Some(backend) = weak_self.upgrade() {
                backend.emit_next_step();
            }
        });
        state.pending_tick = Some(self.scheduler.schedule(self.script.step_delay(), tick));
    }

    fn cancel_pending_tick(state: &mut RunState) {
        if let Some(tick) = state.pending_tick.take() {
            tick.cancel();
        }
    }

    /// Delivers the next scripted event. Runs on the scheduler's context; the
    /// state lock is held across observer delivery so `cancel` cannot return
    /// while a callback is in flight.
    fn emit_next_step(&self) {
        let mut state = self.lock_state();
        state.pending_tick = None;

        if !state.running {
            return;
        }
        let Some(observer) = state.observer.clone() else {
            return;
        };

        if state.step_index < self.script.step_count() {
            let status = self.script.render_step(state.step_index, &state.prompt);
            state.step_index += 1;
            self.arm_tick(&mut state);
            tracing::debug!(step = state.step_index, "emitting scripted status");
            observer.status_updated(&status);
            return;
        }

        state.completed = true;
        state.running = false;
        let prompt = state.prompt.clone();
        tracing::debug!("scripted run complete");
        observer.agent_message(&completion_line(&prompt));
        observer.completed(CLOSING_SUMMARY);
    }

    fn lock_state(&self) -> MutexGuard<'_, RunState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl AutomationBackend for SimulatedBackend {
    fn start(&self, prompt: &str, observer: Arc<dyn AutomationObserver>) {
        self.cancel();

        let mut state = self.lock_state();
        if state.destroyed {
            tracing::warn!("start called on a destroyed simulated backend; ignoring");
            return;
        }

        state.observer = Some(observer);
        state.prompt = prompt.to_string();
        state.step_index = 0;
        state.completed = false;
        state.running = true;
        self.arm_tick(&mut state);
    }

    fn pause(&self) {
        let mut state = self.lock_state();
        if !state.running {
            return;
        }

        state.running = false;
        Self::cancel_pending_tick(&mut state);
        tracing::debug!(step = state.step_index, "simulated run paused");
    }

    fn resume(&self) {
        let mut state = self.lock_state();
        if state.running || state.completed || state.observer.is_none() {
            return;
        }

        state.running = true;
        // Full step delay on every re-arm; a resumed run never uses the
        // remainder of the window that elapsed before the pause.
        self.arm_tick(&mut state);
        tracing::debug!(step = state.step_index, "simulated run resumed");
    }

    fn cancel(&self) {
        let mut state = self.lock_state();
        state.running = false;
        state.completed = false;
        state.step_index = 0;
        state.observer = None;
        Self::cancel_pending_tick(&mut state);
    }

    fn destroy(&self) {
        self.cancel();
        self.lock_state().destroyed = true;
    }
}
