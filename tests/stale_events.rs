use std::sync::Arc;

use agent_panel::runtime::PanelRuntime;
use agent_panel::session::{AutomationState, Role};
use automation_backend::{AutomationBackend, AutomationObserver};
use automation_backend_sim::{ManualScheduler, SimulatedBackend, TickScheduler};

mod support;

use support::roles_and_texts;

fn setup() -> (Arc<PanelRuntime>, Arc<ManualScheduler>) {
    let scheduler = ManualScheduler::new();
    let backend = SimulatedBackend::new(Arc::clone(&scheduler) as Arc<dyn TickScheduler>);
    let runtime = PanelRuntime::new(backend as Arc<dyn AutomationBackend>);
    (runtime, scheduler)
}

/// Queues events on the runtime the way a detached-but-in-flight backend
/// would, then applies them.
fn inject_all(runtime: &Arc<PanelRuntime>) -> usize {
    let observer: &dyn AutomationObserver = runtime.as_ref();
    observer.status_updated("stale status");
    observer.agent_message("stale agent line");
    observer.completed("stale summary");
    observer.error("stale error");
    runtime.flush_pending_events()
}

#[test]
fn events_without_any_session_are_absorbed() {
    let (runtime, _scheduler) = setup();

    let applied = inject_all(&runtime);

    assert_eq!(applied, 4, "events are drained even when dropped");
    assert_eq!(runtime.state(), AutomationState::Idle);
    assert!(runtime.transcript_snapshot().is_empty());
}

#[test]
fn events_after_cancel_do_not_disturb_the_idle_controller() {
    let (runtime, scheduler) = setup();

    runtime.submit_prompt("cancel me");
    scheduler.fire_next();
    runtime.flush_pending_events();
    runtime.cancel_session();

    let snapshot_state = runtime.state();
    let snapshot_transcript = runtime.transcript_snapshot();

    inject_all(&runtime);

    assert_eq!(runtime.state(), snapshot_state);
    assert_eq!(runtime.transcript_snapshot(), snapshot_transcript);
}

#[test]
fn events_after_completion_do_not_disturb_the_terminal_state() {
    let (runtime, scheduler) = setup();

    runtime.submit_prompt("finish cleanly");
    while scheduler.fire_next() {}
    runtime.flush_pending_events();
    assert_eq!(runtime.state(), AutomationState::Completed);

    let snapshot_transcript = runtime.transcript_snapshot();
    inject_all(&runtime);

    assert_eq!(runtime.state(), AutomationState::Completed);
    assert_eq!(runtime.transcript_snapshot(), snapshot_transcript);
}

#[test]
fn status_events_while_paused_are_dropped_but_terminal_events_land() {
    let (runtime, scheduler) = setup();

    runtime.submit_prompt("pause target");
    scheduler.fire_next();
    runtime.flush_pending_events();
    runtime.pause();

    let observer: &dyn AutomationObserver = runtime.as_ref();
    observer.status_updated("status while paused");
    runtime.flush_pending_events();
    assert_eq!(
        roles_and_texts(&runtime.transcript_snapshot())
            .iter()
            .filter(|(role, _)| *role == Role::System)
            .count(),
        1,
        "paused sessions accept no status lines"
    );

    observer.error("backend gave up during pause");
    runtime.flush_pending_events();

    assert_eq!(runtime.state(), AutomationState::Error);
    assert_eq!(
        roles_and_texts(&runtime.transcript_snapshot()).last(),
        Some(&(Role::System, "backend gave up during pause".to_string()))
    );
}
