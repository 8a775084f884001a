use std::io;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use agent_panel::backends;
use agent_panel::console::ConsoleSurface;
use agent_panel::runtime::PanelRuntime;
use agent_panel::session::LifecycleObserver;

const DEFAULT_PROMPT: &str = "Summarize the open tabs";

/// Stand-in for the toolbar button that tracks whether an agent is executing.
struct ToolbarProbe;

impl LifecycleObserver for ToolbarProbe {
    fn execution_active_changed(&self, is_active: bool) {
        println!("[toolbar] agent {}", if is_active { "executing" } else { "idle" });
    }
}

fn main() -> io::Result<()> {
    setup_tracing();

    let prompt = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    let prompt = if prompt.trim().is_empty() {
        DEFAULT_PROMPT.to_string()
    } else {
        prompt
    };

    let backend = backends::backend_from_env().map_err(io::Error::other)?;
    let runtime = PanelRuntime::new(backend);
    runtime.attach_surface(Arc::new(ConsoleSurface));
    runtime.add_lifecycle_observer(Arc::new(ToolbarProbe));

    runtime.show_panel();
    runtime.submit_prompt(&prompt);

    while runtime.state().session_active() {
        runtime.flush_pending_events();
        thread::sleep(Duration::from_millis(25));
    }
    runtime.flush_pending_events();

    runtime.destroy();
    Ok(())
}

fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
