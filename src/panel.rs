//! Collaborator contracts between the session controller, the automation
//! backend, and the presentation surface.
//!
//! Presentation is an external collaborator: the controller pushes render
//! commands and read-only transcript snapshots through [`PanelSurface`], and
//! every surface-originated change flows back through [`PanelIntents`]. The
//! surface never mutates controller-owned state directly.

use crate::session::{AutomationState, Message};

/// Render commands the controller pushes to the panel presentation.
pub trait PanelSurface: Send + Sync {
    /// Updates the status chip: current state, caption text, and whether the
    /// resume affordance is shown.
    fn render_state(&self, state: AutomationState, status_text: &str, show_resume: bool);

    /// Replaces the displayed transcript with an ordered snapshot.
    fn render_transcript(&self, messages: &[Message]);

    fn set_input_enabled(&self, enabled: bool);

    /// Shows or hides the blocking overlay that sits above the content while
    /// an agent is executing.
    fn set_overlay_visible(&self, visible: bool);

    fn set_panel_visible(&self, visible: bool);

    /// Clears any pending text in the prompt field after a submission.
    fn clear_prompt_input(&self);
}

/// Backend operations the session state machine drives through its host.
///
/// The controller depends only on this seam, never on a concrete backend, so
/// tests substitute spies and production swaps implementations freely.
pub trait AutomationHost {
    fn start_automation(&mut self, prompt: &str) -> Result<(), String>;

    fn pause_automation(&mut self);

    fn resume_automation(&mut self);

    fn cancel_automation(&mut self);

    fn destroy_backend(&mut self);
}

/// User intents a presentation surface forwards to the runtime.
pub trait PanelIntents {
    fn prompt_submitted(&self, text: &str);

    fn dismiss_requested(&self);

    fn pause_requested(&self);

    fn resume_requested(&self);

    /// Returns true when the back action was consumed.
    fn back_pressed(&self) -> bool;
}
