use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use automation_backend::{AutomationBackend, AutomationObserver, BackendEvent};

use crate::panel::{AutomationHost, PanelIntents, PanelSurface};
use crate::session::{AutomationState, LifecycleObserver, Message, SessionController};

/// Serializes controller state, backend calls, and backend event delivery.
///
/// The runtime implements [`AutomationObserver`] by buffering events; nothing
/// is applied to the controller from the backend's delivery context. Call
/// [`PanelRuntime::flush_pending_events`] from the owning context (a UI loop,
/// a headless driver, a test) to apply queued events.
///
/// Lock order is controller, then backend, then the event queue; the observer
/// path takes only the queue lock, which is what lets a backend deliver while
/// holding its own state lock and still detach synchronously on cancel.
pub struct PanelRuntime {
    session: Mutex<SessionController>,
    pending_events: Mutex<VecDeque<BackendEvent>>,
    backend: Arc<dyn AutomationBackend>,
}

impl PanelRuntime {
    #[must_use]
    pub fn new(backend: Arc<dyn AutomationBackend>) -> Arc<Self> {
        Arc::new(Self {
            session: Mutex::new(SessionController::new()),
            pending_events: Mutex::new(VecDeque::new()),
            backend,
        })
    }

    /// Attaches the presentation surface; it is primed with the current
    /// transcript and state immediately.
    pub fn attach_surface(&self, surface: Arc<dyn PanelSurface>) {
        self.lock_session().attach_surface(surface);
    }

    pub fn add_lifecycle_observer(&self, observer: Arc<dyn LifecycleObserver>) {
        self.lock_session().add_lifecycle_observer(observer);
    }

    pub fn remove_lifecycle_observer(&self, observer: &Arc<dyn LifecycleObserver>) {
        self.lock_session().remove_lifecycle_observer(observer);
    }

    pub fn submit_prompt(self: &Arc<Self>, text: &str) {
        let mut host = self.host();
        self.lock_session().submit_prompt(text, &mut host);
    }

    pub fn pause(self: &Arc<Self>) {
        let mut host = self.host();
        self.lock_session().pause(&mut host);
    }

    pub fn resume_session(self: &Arc<Self>) {
        let mut host = self.host();
        self.lock_session().resume_session(&mut host);
    }

    pub fn cancel_session(self: &Arc<Self>) {
        let mut host = self.host();
        self.lock_session().cancel_session(&mut host);
    }

    pub fn toggle_panel_visibility(&self) {
        self.lock_session().toggle_panel_visibility();
    }

    pub fn show_panel(&self) {
        self.lock_session().show_panel();
    }

    pub fn hide_panel(&self) {
        self.lock_session().hide_panel();
    }

    #[must_use]
    pub fn on_back_pressed(&self) -> bool {
        self.lock_session().on_back_pressed()
    }

    #[must_use]
    pub fn state(&self) -> AutomationState {
        self.lock_session().state()
    }

    #[must_use]
    pub fn is_execution_active(&self) -> bool {
        self.lock_session().is_execution_active()
    }

    /// Copy-on-read transcript snapshot for callers outside the controller.
    #[must_use]
    pub fn transcript_snapshot(&self) -> Vec<Message> {
        self.lock_session().transcript().to_vec()
    }

    /// Applies queued backend events to the controller in arrival order.
    /// Returns how many events were applied.
    ///
    /// Use this from non-ticking environments (headless drivers, tests) to
    /// guarantee queued events reach the controller; UI hosts call it from
    /// their frame or idle callback.
    pub fn flush_pending_events(&self) -> usize {
        let mut applied = 0usize;

        loop {
            let event = lock_unpoisoned(&self.pending_events).pop_front();
            let Some(event) = event else {
                break;
            };

            self.apply_event(event);
            applied += 1;
        }

        applied
    }

    /// Tears down the controller and the backend and drops any queued events.
    pub fn destroy(self: &Arc<Self>) {
        let mut host = self.host();
        self.lock_session().destroy(&mut host);
        lock_unpoisoned(&self.pending_events).clear();
    }

    fn apply_event(&self, event: BackendEvent) {
        let mut session = self.lock_session();
        match event {
            BackendEvent::StatusUpdated { text } => session.on_backend_status(&text),
            BackendEvent::AgentMessage { text } => session.on_backend_agent_message(&text),
            BackendEvent::Completed { summary } => session.on_backend_completed(&summary),
            BackendEvent::Error { message } => session.on_backend_error(&message),
        }
    }

    fn enqueue(&self, event: BackendEvent) {
        lock_unpoisoned(&self.pending_events).push_back(event);
    }

    fn host(self: &Arc<Self>) -> BackendHost {
        BackendHost {
            backend: Arc::clone(&self.backend),
            observer: Arc::clone(self) as Arc<dyn AutomationObserver>,
        }
    }

    fn lock_session(&self) -> MutexGuard<'_, SessionController> {
        lock_unpoisoned(&self.session)
    }
}

impl AutomationObserver for PanelRuntime {
    fn status_updated(&self, text: &str) {
        self.enqueue(BackendEvent::StatusUpdated {
            text: text.to_string(),
        });
    }

    fn agent_message(&self, text: &str) {
        self.enqueue(BackendEvent::AgentMessage {
            text: text.to_string(),
        });
    }

    fn completed(&self, summary: &str) {
        self.enqueue(BackendEvent::Completed {
            summary: summary.to_string(),
        });
    }

    fn error(&self, message: &str) {
        self.enqueue(BackendEvent::Error {
            message: message.to_string(),
        });
    }
}

/// Per-call adapter the controller drives; keeps the state machine free of
/// any direct backend dependency.
struct BackendHost {
    backend: Arc<dyn AutomationBackend>,
    observer: Arc<dyn AutomationObserver>,
}

impl AutomationHost for BackendHost {
    fn start_automation(&mut self, prompt: &str) -> Result<(), String> {
        self.backend.start(prompt, Arc::clone(&self.observer));
        Ok(())
    }

    fn pause_automation(&mut self) {
        self.backend.pause();
    }

    fn resume_automation(&mut self) {
        self.backend.resume();
    }

    fn cancel_automation(&mut self) {
        self.backend.cancel();
    }

    fn destroy_backend(&mut self) {
        self.backend.destroy();
    }
}

impl PanelIntents for Arc<PanelRuntime> {
    fn prompt_submitted(&self, text: &str) {
        self.submit_prompt(text);
    }

    fn dismiss_requested(&self) {
        self.hide_panel();
    }

    fn pause_requested(&self) {
        self.pause();
    }

    fn resume_requested(&self) {
        self.resume_session();
    }

    fn back_pressed(&self) -> bool {
        self.on_back_pressed()
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
