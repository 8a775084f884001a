use std::sync::Arc;

use time::OffsetDateTime;

use crate::panel::{AutomationHost, PanelSurface};

/// Lifecycle of the single automation session owned by the controller.
///
/// `Completed` and `Error` are terminal for the session but re-entrant for
/// the controller: a new prompt is accepted from either, same as `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutomationState {
    Idle,
    Running,
    Paused,
    Completed,
    Error,
}

impl AutomationState {
    /// True when `submit_prompt` may begin a new session in this state.
    #[must_use]
    pub fn accepts_prompt(self) -> bool {
        matches!(self, Self::Idle | Self::Completed | Self::Error)
    }

    /// True while a session exists, running or paused.
    #[must_use]
    pub fn session_active(self) -> bool {
        matches!(self, Self::Running | Self::Paused)
    }

    /// Default status caption rendered for this state.
    #[must_use]
    pub fn status_caption(self) -> &'static str {
        match self {
            Self::Idle => "Ready for a task",
            Self::Running => "Working on it\u{2026}",
            Self::Paused => "Paused. Resume when ready.",
            Self::Completed => "Task completed",
            Self::Error => "Automation failed",
        }
    }
}

/// Author of a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Agent,
    System,
}

/// Immutable conversation entry rendered inside the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub text: String,
    pub timestamp: OffsetDateTime,
}

impl Message {
    fn new(role: Role, text: String) -> Self {
        Self {
            role,
            text,
            timestamp: OffsetDateTime::now_utc(),
        }
    }
}

/// Toolbar/UI integrations observe whether an agent is currently executing.
pub trait LifecycleObserver: Send + Sync {
    fn execution_active_changed(&self, is_active: bool);
}

const CANCELLED_NOTICE: &str = "Automation cancelled";

/// Owns one automation session's lifecycle: consumes backend events, appends
/// to the transcript, computes presentation state, and notifies lifecycle
/// observers.
///
/// The controller is a pure state machine: backend calls go through
/// [`AutomationHost`] and rendering goes through the attached
/// [`PanelSurface`], so tests drive it with plain spies.
pub struct SessionController {
    state: AutomationState,
    transcript: Vec<Message>,
    observers: Vec<Arc<dyn LifecycleObserver>>,
    surface: Option<Arc<dyn PanelSurface>>,
    active_prompt: Option<String>,
    panel_visible: bool,
    overlay_visible: bool,
    destroyed: bool,
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionController {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: AutomationState::Idle,
            transcript: Vec::new(),
            observers: Vec::new(),
            surface: None,
            active_prompt: None,
            panel_visible: false,
            overlay_visible: false,
            destroyed: false,
        }
    }

    #[must_use]
    pub fn state(&self) -> AutomationState {
        self.state
    }

    /// Transcript in insertion order; insertion order is display order.
    #[must_use]
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    #[must_use]
    pub fn is_execution_active(&self) -> bool {
        self.state == AutomationState::Running
    }

    #[must_use]
    pub fn panel_visible(&self) -> bool {
        self.panel_visible
    }

    /// Prompt of the live session, if one exists.
    #[must_use]
    pub fn active_prompt(&self) -> Option<&str> {
        self.active_prompt.as_deref()
    }

    /// Attaches the presentation surface and primes it with the current
    /// transcript and state.
    pub fn attach_surface(&mut self, surface: Arc<dyn PanelSurface>) {
        if self.destroyed {
            return;
        }

        surface.render_transcript(&self.transcript);
        surface.render_state(self.state, self.state.status_caption(), false);
        surface.set_input_enabled(self.state.accepts_prompt());
        surface.set_overlay_visible(self.overlay_visible);
        surface.set_panel_visible(self.panel_visible);
        self.surface = Some(surface);
    }

    /// Begins a new session for `text`. No-op for blank prompts and while a
    /// session is running or paused.
    pub fn submit_prompt(&mut self, text: &str, host: &mut dyn AutomationHost) {
        if self.destroyed {
            return;
        }

        let prompt = text.trim();
        if prompt.is_empty() {
            tracing::debug!("ignoring blank prompt submission");
            return;
        }

        if !self.state.accepts_prompt() {
            tracing::debug!(state = ?self.state, "ignoring prompt while a session is active");
            return;
        }

        self.append_message(Role::User, prompt);
        if let Some(surface) = &self.surface {
            surface.clear_prompt_input();
        }

        match host.start_automation(prompt) {
            Ok(()) => {
                self.active_prompt = Some(prompt.to_string());
                self.state = AutomationState::Running;
                tracing::info!(prompt, "automation session started");
                self.hide_panel();
                self.set_overlay(true);
                self.push_state(AutomationState::Running.status_caption(), false);
                self.notify_observers();
            }
            Err(error) => {
                self.state = AutomationState::Error;
                tracing::warn!(%error, "failed to start automation");
                self.append_message(Role::System, &format!("Failed to start automation: {error}"));
                self.push_state(AutomationState::Error.status_caption(), false);
            }
        }
    }

    /// Suspends the running session. No-op unless `Running`.
    pub fn pause(&mut self, host: &mut dyn AutomationHost) {
        if self.destroyed || self.state != AutomationState::Running {
            return;
        }

        host.pause_automation();
        self.state = AutomationState::Paused;
        tracing::info!("automation session paused");
        self.set_overlay(false);
        self.push_state(AutomationState::Paused.status_caption(), true);
        self.show_panel();
        self.notify_observers();
    }

    /// Resumes a paused session. No-op unless `Paused`.
    pub fn resume_session(&mut self, host: &mut dyn AutomationHost) {
        if self.destroyed || self.state != AutomationState::Paused {
            return;
        }

        host.resume_automation();
        self.state = AutomationState::Running;
        tracing::info!("automation session resumed");
        self.hide_panel();
        self.set_overlay(true);
        self.push_state(AutomationState::Running.status_caption(), false);
        self.notify_observers();
    }

    /// Abandons the live session and returns to `Idle`. No-op when no session
    /// is running or paused. A cancelled session gets no terminal summary.
    pub fn cancel_session(&mut self, host: &mut dyn AutomationHost) {
        if self.destroyed || !self.state.session_active() {
            return;
        }

        host.cancel_automation();
        self.active_prompt = None;
        self.state = AutomationState::Idle;
        tracing::info!("automation session cancelled");
        self.append_message(Role::System, CANCELLED_NOTICE);
        self.set_overlay(false);
        self.push_state(AutomationState::Idle.status_caption(), false);
        self.notify_observers();
    }

    /// Backend progress line. Dropped unless a session is running; the
    /// backend detaches observers on cancel, but stray queued events must
    /// still be absorbed here.
    pub fn on_backend_status(&mut self, text: &str) {
        if self.destroyed || self.state != AutomationState::Running {
            tracing::debug!(state = ?self.state, "dropping stray status event");
            return;
        }

        self.append_message(Role::System, text);
        self.push_state(text, false);
    }

    /// Backend agent output. Appends without changing state.
    pub fn on_backend_agent_message(&mut self, text: &str) {
        if self.destroyed || !self.state.session_active() {
            tracing::debug!(state = ?self.state, "dropping stray agent message");
            return;
        }

        self.append_message(Role::Agent, text);
    }

    pub fn on_backend_completed(&mut self, summary: &str) {
        self.finish_session(AutomationState::Completed, Role::Agent, summary);
    }

    pub fn on_backend_error(&mut self, message: &str) {
        self.finish_session(AutomationState::Error, Role::System, message);
    }

    fn finish_session(&mut self, final_state: AutomationState, role: Role, summary: &str) {
        if self.destroyed || !self.state.session_active() {
            tracing::debug!(state = ?self.state, "dropping stray terminal event");
            return;
        }

        self.active_prompt = None;
        self.state = final_state;
        tracing::info!(state = ?final_state, "automation session finished");
        if !summary.trim().is_empty() {
            self.append_message(role, summary);
        }
        self.set_overlay(false);
        self.push_state(final_state.status_caption(), false);
        self.notify_observers();
    }

    pub fn toggle_panel_visibility(&mut self) {
        if self.panel_visible {
            self.hide_panel();
        } else {
            self.show_panel();
        }
    }

    pub fn show_panel(&mut self) {
        if self.destroyed || self.panel_visible {
            return;
        }

        self.panel_visible = true;
        if let Some(surface) = &self.surface {
            surface.set_panel_visible(true);
        }
    }

    pub fn hide_panel(&mut self) {
        if self.destroyed || !self.panel_visible {
            return;
        }

        self.panel_visible = false;
        if let Some(surface) = &self.surface {
            surface.set_panel_visible(false);
        }
    }

    /// Consumes the back action when the panel is visible. Returns true when
    /// handled; callers process the action themselves otherwise.
    #[must_use]
    pub fn on_back_pressed(&mut self) -> bool {
        if self.destroyed || !self.panel_visible {
            return false;
        }

        self.hide_panel();
        true
    }

    /// Registers for execution active/inactive notifications. Registration is
    /// identity-based; adding the same observer twice is a no-op.
    pub fn add_lifecycle_observer(&mut self, observer: Arc<dyn LifecycleObserver>) {
        if self.destroyed {
            return;
        }

        let already_registered = self
            .observers
            .iter()
            .any(|existing| Arc::ptr_eq(existing, &observer));
        if !already_registered {
            self.observers.push(observer);
        }
    }

    pub fn remove_lifecycle_observer(&mut self, observer: &Arc<dyn LifecycleObserver>) {
        self.observers
            .retain(|existing| !Arc::ptr_eq(existing, observer));
    }

    /// Permanently tears down: destroys the backend, detaches the surface,
    /// clears observer registrations. Every later call is a no-op.
    pub fn destroy(&mut self, host: &mut dyn AutomationHost) {
        if self.destroyed {
            return;
        }

        self.destroyed = true;
        host.destroy_backend();
        self.surface = None;
        self.observers.clear();
        tracing::info!("session controller destroyed");
    }

    fn append_message(&mut self, role: Role, text: &str) {
        if text.is_empty() {
            return;
        }

        self.transcript.push(Message::new(role, text.to_string()));
        if let Some(surface) = &self.surface {
            surface.render_transcript(&self.transcript);
        }
    }

    fn push_state(&self, status_text: &str, show_resume: bool) {
        if let Some(surface) = &self.surface {
            surface.render_state(self.state, status_text, show_resume);
            surface.set_input_enabled(self.state.accepts_prompt());
        }
    }

    fn set_overlay(&mut self, visible: bool) {
        if self.overlay_visible == visible {
            return;
        }

        self.overlay_visible = visible;
        if let Some(surface) = &self.surface {
            surface.set_overlay_visible(visible);
        }
    }

    fn notify_observers(&self) {
        let is_active = self.is_execution_active();
        for observer in &self.observers {
            observer.execution_active_changed(is_active);
        }
    }
}
