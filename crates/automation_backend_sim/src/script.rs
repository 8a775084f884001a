//! Step script consumed by the simulated backend.
//!
//! A script is an ordered list of status templates plus the fixed inter-step
//! delay. Templates may reference the submitted prompt through the
//! `{prompt}` placeholder. Scripts are fixed for the lifetime of a backend;
//! the JSON file form exists for development and testing only.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Placeholder substituted with the submitted prompt when a step is rendered.
pub const PROMPT_PLACEHOLDER: &str = "{prompt}";

const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(1500);

const DEFAULT_STEPS: [&str; 4] = [
    "Analyzing \"{prompt}\" in the active context\u{2026}",
    "Composing a deterministic plan for \"{prompt}\"\u{2026}",
    "Executing scripted interactions for \"{prompt}\"\u{2026}",
    "Capturing the activity log for \"{prompt}\"\u{2026}",
];

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("I/O error while reading script at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse script JSON at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("script must declare at least one step")]
    NoSteps,

    #[error("script step {index} is empty")]
    EmptyStep { index: usize },

    #[error("step_delay_ms must be greater than zero")]
    ZeroDelay,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScriptFile {
    steps: Vec<String>,
    step_delay_ms: u64,
}

/// Validated step templates plus the inter-step delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomationScript {
    steps: Vec<String>,
    step_delay: Duration,
}

impl Default for AutomationScript {
    fn default() -> Self {
        Self {
            steps: DEFAULT_STEPS.iter().map(ToString::to_string).collect(),
            step_delay: DEFAULT_STEP_DELAY,
        }
    }
}

impl AutomationScript {
    /// Builds a script from caller-provided templates, rejecting empty
    /// scripts, blank steps, and a zero delay.
    pub fn new(steps: Vec<String>, step_delay: Duration) -> Result<Self, ScriptError> {
        if steps.is_empty() {
            return Err(ScriptError::NoSteps);
        }

        if let Some(index) = steps.iter().position(|step| step.trim().is_empty()) {
            return Err(ScriptError::EmptyStep { index });
        }

        if step_delay.is_zero() {
            return Err(ScriptError::ZeroDelay);
        }

        Ok(Self { steps, step_delay })
    }

    /// Loads and validates a script from a UTF-8 JSON file of the shape
    /// `{ "steps": [...], "step_delay_ms": N }`. Unknown fields are rejected.
    pub fn from_json_file(path: &Path) -> Result<Self, ScriptError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ScriptFile =
            serde_json::from_str(&raw).map_err(|source| ScriptError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        Self::new(file.steps, Duration::from_millis(file.step_delay_ms))
    }

    #[must_use]
    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    #[must_use]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn step_delay(&self) -> Duration {
        self.step_delay
    }

    /// Renders the template at `index` with the prompt substituted.
    #[must_use]
    pub fn render_step(&self, index: usize, prompt: &str) -> String {
        self.steps[index].replace(PROMPT_PLACEHOLDER, prompt)
    }
}
