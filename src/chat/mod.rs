//! Interactive chat mode.
//!
//! [`Surface`] holds the session state and the per-message operations;
//! [`ChatSession`] puts a REPL with slash commands in front of it.

/// Slash command parsing and autocomplete.
pub mod command;
mod session;
mod surface;
mod ui;

pub use session::{ChatSession, SessionConfig};
pub use surface::{Dispatch, Notice, SUMMARIZE_THRESHOLD, Surface, SurfaceEvent};
pub use ui::{describe_detection, render_message};
