use std::path::Path;
use std::sync::Arc;

use automation_backend::{AutomationBackend, BackendInitError};
use automation_backend_sim::{
    AutomationScript, SimulatedBackend, ThreadScheduler, TickScheduler, SIMULATED_BACKEND_ID,
};

pub const DEFAULT_BACKEND_ID: &str = SIMULATED_BACKEND_ID;
pub const BACKEND_ENV_VAR: &str = "AGENT_PANEL_BACKEND";
pub const SCRIPT_PATH_ENV_VAR: &str = "AGENT_PANEL_SCRIPT_PATH";

/// Resolves the automation backend from `AGENT_PANEL_BACKEND`, defaulting to
/// the simulated backend when the variable is unset or blank.
pub fn backend_from_env() -> Result<Arc<dyn AutomationBackend>, BackendInitError> {
    let backend_id = std::env::var(BACKEND_ENV_VAR)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    backend_for_id(backend_id.as_deref().unwrap_or(DEFAULT_BACKEND_ID))
}

pub fn backend_for_id(backend_id: &str) -> Result<Arc<dyn AutomationBackend>, BackendInitError> {
    match backend_id {
        SIMULATED_BACKEND_ID => {
            let script = script_from_env()?;
            let scheduler = Arc::new(ThreadScheduler) as Arc<dyn TickScheduler>;
            Ok(SimulatedBackend::with_script(script, scheduler) as Arc<dyn AutomationBackend>)
        }
        unknown => Err(BackendInitError::new(format!(
            "Unsupported backend '{unknown}'. Available backends: {SIMULATED_BACKEND_ID}"
        ))),
    }
}

fn script_from_env() -> Result<AutomationScript, BackendInitError> {
    let path = std::env::var(SCRIPT_PATH_ENV_VAR)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    match path {
        Some(path) => AutomationScript::from_json_file(Path::new(&path)).map_err(|error| {
            BackendInitError::new(format!(
                "Failed to load automation script from {path}: {error}"
            ))
        }),
        None => Ok(AutomationScript::default()),
    }
}
