use std::sync::{Arc, Mutex, MutexGuard};

use agent_panel::panel::PanelSurface;
use agent_panel::session::{AutomationState, LifecycleObserver, Message, Role};

/// One recorded render command, in the order the controller pushed it.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    State {
        state: AutomationState,
        status_text: String,
        show_resume: bool,
    },
    Transcript {
        messages: Vec<(Role, String)>,
    },
    InputEnabled(bool),
    OverlayVisible(bool),
    PanelVisible(bool),
    ClearPromptInput,
}

/// Records every render command the controller pushes.
#[derive(Default)]
pub struct RecordingSurface {
    commands: Mutex<Vec<RenderCommand>>,
}

impl RecordingSurface {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn commands(&self) -> Vec<RenderCommand> {
        lock_unpoisoned(&self.commands).clone()
    }

    /// Drops recorded commands so a test can assert on one phase at a time.
    pub fn clear(&self) {
        lock_unpoisoned(&self.commands).clear();
    }

    pub fn last_state(&self) -> Option<(AutomationState, String, bool)> {
        self.commands().into_iter().rev().find_map(|command| match command {
            RenderCommand::State {
                state,
                status_text,
                show_resume,
            } => Some((state, status_text, show_resume)),
            _ => None,
        })
    }

    pub fn last_input_enabled(&self) -> Option<bool> {
        self.commands().into_iter().rev().find_map(|command| match command {
            RenderCommand::InputEnabled(enabled) => Some(enabled),
            _ => None,
        })
    }

    fn record(&self, command: RenderCommand) {
        lock_unpoisoned(&self.commands).push(command);
    }
}

impl PanelSurface for RecordingSurface {
    fn render_state(&self, state: AutomationState, status_text: &str, show_resume: bool) {
        self.record(RenderCommand::State {
            state,
            status_text: status_text.to_string(),
            show_resume,
        });
    }

    fn render_transcript(&self, messages: &[Message]) {
        self.record(RenderCommand::Transcript {
            messages: messages
                .iter()
                .map(|message| (message.role, message.text.clone()))
                .collect(),
        });
    }

    fn set_input_enabled(&self, enabled: bool) {
        self.record(RenderCommand::InputEnabled(enabled));
    }

    fn set_overlay_visible(&self, visible: bool) {
        self.record(RenderCommand::OverlayVisible(visible));
    }

    fn set_panel_visible(&self, visible: bool) {
        self.record(RenderCommand::PanelVisible(visible));
    }

    fn clear_prompt_input(&self) {
        self.record(RenderCommand::ClearPromptInput);
    }
}

/// Collects execution active/inactive notifications.
#[derive(Default)]
pub struct ActiveProbe {
    notifications: Mutex<Vec<bool>>,
}

impl ActiveProbe {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn notifications(&self) -> Vec<bool> {
        lock_unpoisoned(&self.notifications).clone()
    }
}

impl LifecycleObserver for ActiveProbe {
    fn execution_active_changed(&self, is_active: bool) {
        lock_unpoisoned(&self.notifications).push(is_active);
    }
}

/// Role/text pairs of a transcript, timestamps stripped.
pub fn roles_and_texts(messages: &[Message]) -> Vec<(Role, String)> {
    messages
        .iter()
        .map(|message| (message.role, message.text.clone()))
        .collect()
}

pub fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
