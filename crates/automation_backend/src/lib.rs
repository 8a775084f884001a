//! Minimal backend-agnostic contract for executing a single automation run.
//!
//! This crate intentionally defines only the shared run lifecycle and the
//! observer capability implemented by the session controller. It excludes
//! transport details, scheduling concerns, and presentation state.

use std::fmt;
use std::sync::Arc;

/// Error returned while constructing/configuring a backend before any run starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendInitError {
    message: String,
}

impl BackendInitError {
    /// Creates a new backend initialization error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the underlying error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for BackendInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for BackendInitError {}

impl From<String> for BackendInitError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for BackendInitError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Backend-emitted lifecycle event for an automation run.
///
/// For one run, delivery order is zero or more `StatusUpdated` events followed
/// by exactly one terminal sequence: `AgentMessage` then `Completed`, or a
/// single `Error`. Nothing fires after a terminal event without a new start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    StatusUpdated { text: String },
    AgentMessage { text: String },
    Completed { summary: String },
    Error { message: String },
}

impl BackendEvent {
    /// Returns true when this event terminates the run lifecycle.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Error { .. })
    }

    /// Forwards this event to the matching observer callback.
    pub fn dispatch(&self, observer: &dyn AutomationObserver) {
        match self {
            Self::StatusUpdated { text } => observer.status_updated(text),
            Self::AgentMessage { text } => observer.agent_message(text),
            Self::Completed { summary } => observer.completed(summary),
            Self::Error { message } => observer.error(message),
        }
    }
}

/// Receives progress updates from an active automation run.
///
/// Callbacks may be invoked while the backend holds internal locks; observers
/// must not call back into the backend from inside a callback.
pub trait AutomationObserver: Send + Sync + 'static {
    fn status_updated(&self, text: &str);

    fn agent_message(&self, text: &str);

    fn completed(&self, summary: &str);

    fn error(&self, message: &str);
}

/// Capability contract for executing automation tasks on behalf of the panel.
///
/// At most one run is active per backend instance; `start` while a run is
/// active behaves last-call-wins by cancelling the previous run first. The
/// only failure channel across this boundary is the observer `error` event;
/// implementations must never panic through these methods.
pub trait AutomationBackend: Send + Sync + 'static {
    /// Begins a new run for `prompt`, delivering progress to `observer`.
    ///
    /// Event delivery is asynchronous; no callback fires from inside `start`.
    fn start(&self, prompt: &str, observer: Arc<dyn AutomationObserver>);

    /// Suspends further event delivery without discarding progress position.
    /// Idempotent when already paused or not running.
    fn pause(&self);

    /// Resumes delivery from the point it was suspended. No-op unless paused.
    fn resume(&self);

    /// Stops all pending and future event delivery and synchronously drops
    /// the stored observer before returning. Safe to call in any state.
    fn cancel(&self);

    /// Releases all resources; `cancel` followed by permanent shutdown. The
    /// backend instance is not reusable afterwards.
    fn destroy(&self);
}
