//! Console rendering of panel state for the demo binary.

use crate::panel::PanelSurface;
use crate::session::{AutomationState, Message, Role};

/// Prints render commands as plain lines; stands in for a real panel UI.
///
/// Visibility and input toggles are logged rather than printed since a
/// console has no overlay or prompt field to move.
#[derive(Debug, Default)]
pub struct ConsoleSurface;

fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "you",
        Role::Agent => "agent",
        Role::System => "status",
    }
}

impl PanelSurface for ConsoleSurface {
    fn render_state(&self, state: AutomationState, status_text: &str, show_resume: bool) {
        let resume_hint = if show_resume { " (resume available)" } else { "" };
        println!("[{state:?}] {status_text}{resume_hint}");
    }

    fn render_transcript(&self, messages: &[Message]) {
        if let Some(message) = messages.last() {
            println!("  {}: {}", role_label(message.role), message.text);
        }
    }

    fn set_input_enabled(&self, enabled: bool) {
        tracing::debug!(enabled, "prompt input toggled");
    }

    fn set_overlay_visible(&self, visible: bool) {
        tracing::debug!(visible, "overlay toggled");
    }

    fn set_panel_visible(&self, visible: bool) {
        tracing::debug!(visible, "panel toggled");
    }

    fn clear_prompt_input(&self) {}
}
