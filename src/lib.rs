//! In-app assistant panel: automation session controller + backend glue.
//!
//! ## Backend bootstrap
//!
//! `agent_panel` requires explicit backend selection:
//!
//! - `AGENT_PANEL_BACKEND=simulated` (default) for the deterministic scripted
//!   backend used in development and tests
//!
//! When the simulated backend is active, `AGENT_PANEL_SCRIPT_PATH` may point
//! to a readable UTF-8 JSON file with this shape:
//!
//! ```json
//! {
//!   "steps": ["Analyzing \"{prompt}\" in the active context…"],
//!   "step_delay_ms": 1500
//! }
//! ```
//!
//! Contract notes:
//! - `steps` must contain at least one non-blank template; each template may
//!   reference the submitted prompt through the `{prompt}` placeholder.
//! - `step_delay_ms` must be > 0.
//! - Unknown JSON fields are rejected.
//!
//! ## Event delivery
//!
//! The session controller and backend are driven from one serialized context.
//! [`runtime::PanelRuntime`] buffers backend events and applies them when the
//! driving context calls `flush_pending_events`; presentation surfaces only
//! ever receive read-only snapshots and render commands.

pub mod backends;
pub mod console;
pub mod panel;
pub mod runtime;
pub mod session;
