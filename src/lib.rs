//! # lingo - chat with language detection and translation
//!
//! `lingo` keeps a conversation of messages and lets you detect the
//! language of any message or translate it into a target language. Both
//! capabilities come from an OpenAI-compatible endpoint; without one
//! configured they are reported as unavailable and the conversation still
//! works.
//!
//! ## Quick Start
//!
//! ```bash
//! # Interactive session
//! lingo
//!
//! # Translate a file into Spanish
//! lingo translate --to es ./notes.md
//!
//! # Detect the language of stdin
//! echo "Bonjour le monde" | lingo detect
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/lingo/config.toml`:
//!
//! ```toml
//! [lingo]
//! provider = "ollama"
//! model = "gemma3:12b"
//! to = "es"
//!
//! [providers.ollama]
//! endpoint = "http://localhost:11434"
//! models = ["gemma3:12b"]
//! ```

/// Capability contracts, lifecycle state, and result normalization.
pub mod capability;

/// Interactive chat mode.
pub mod chat;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management and provider settings.
pub mod config;

/// The message log.
pub mod conversation;

/// Input reading from files and stdin.
pub mod input;

/// Supported languages.
pub mod language;

/// Global output configuration and diagnostics.
pub mod output;

/// XDG-style path utilities.
pub mod paths;

/// Capabilities backed by an OpenAI-compatible endpoint.
pub mod provider;

/// Terminal UI components (spinner, colors).
pub mod ui;
