//! Chat mode UI components.

use std::fmt::Write as _;

use crate::capability::{CapabilityLoader, CapabilityState};
use crate::conversation::{ConversationStore, DetectedLanguage, Message};
use crate::ui::Style;

use super::command::SLASH_COMMANDS;
use super::session::SessionConfig;
use super::surface::{Notice, SUMMARIZE_THRESHOLD};

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn print_header() {
    println!(
        "{} {} - Detect and translate as you chat",
        Style::header("lingo"),
        Style::version(format!("v{VERSION}"))
    );
    println!();
}

pub fn print_goodbye() {
    println!("{}", Style::success("Goodbye!"));
}

pub fn print_help() {
    println!("{}", Style::header("Available commands"));
    for (cmd, args, desc) in SLASH_COMMANDS {
        let usage = if args.is_empty() {
            (*cmd).to_string()
        } else {
            format!("{cmd} {args}")
        };
        println!("  {:24}{}", Style::command(usage), Style::secondary(desc));
    }
    println!(
        "  {}",
        Style::hint("Anything not starting with '/' is sent as a message.")
    );
    println!();
}

pub fn print_status(config: &SessionConfig, loader: &CapabilityLoader) {
    println!("{}", Style::header("Capabilities"));
    println!(
        "  {}   {}",
        Style::label("provider"),
        config
            .provider_name
            .as_deref()
            .map_or_else(|| Style::warning("(none)"), Style::value)
    );
    if let Some(model) = &config.model {
        println!("  {}      {}", Style::label("model"), Style::value(model));
    }
    if let Some(endpoint) = &config.endpoint {
        println!("  {}   {}", Style::label("endpoint"), Style::secondary(endpoint));
    }
    println!(
        "  {}   {}",
        Style::label("detector"),
        state_label(loader.detector())
    );
    println!(
        "  {} {} {}",
        Style::label("translator"),
        state_label(loader.translator()),
        Style::secondary(loader.pair())
    );
    println!();
}

fn state_label<H>(state: &CapabilityState<H>) -> String {
    match state {
        CapabilityState::Ready(_) => Style::success(state.label()),
        CapabilityState::Failed(reason) => {
            format!("{} {}", Style::error(state.label()), Style::secondary(reason))
        }
        CapabilityState::Unavailable => Style::warning(state.label()),
        CapabilityState::Uninitialized | CapabilityState::Initializing => {
            Style::secondary(state.label())
        }
    }
}

/// Human-readable form of a detection result.
pub fn describe_detection(detected: &DetectedLanguage) -> String {
    let language = if detected.is_unknown() {
        "Could not detect"
    } else {
        detected.language.as_str()
    };
    format!("{language} (confidence: {:.2})", detected.confidence)
}

/// Renders one message with its annotations, one line each.
pub fn render_message(message: &Message) -> String {
    let mut out = format!("{} {}", Style::id(message.id()), message.content());

    if let Some(translated) = message.translated() {
        let _ = write!(
            out,
            "\n   {} {}",
            Style::label("translated:"),
            Style::translated(translated)
        );
    }
    if let Some(detected) = message.detected_lang() {
        let _ = write!(
            out,
            "\n   {} {}",
            Style::label("language:"),
            Style::detected(describe_detection(detected))
        );
    }

    let mut actions = vec![format!("target {}", Style::code(message.selected_lang()))];
    if message.content().chars().count() >= SUMMARIZE_THRESHOLD {
        actions.push("[summarize]".to_string());
    }
    let _ = write!(out, "\n   {}", Style::secondary(actions.join("  ")));

    out
}

pub fn print_message(message: &Message) {
    println!("{}", render_message(message));
}

pub fn print_conversation(store: &ConversationStore) {
    if store.is_empty() {
        println!("{}", Style::hint("No messages yet."));
        println!();
        return;
    }
    for message in store.iter() {
        print_message(message);
    }
    println!();
}

/// Reports the result of a finished capability call.
pub fn print_notice(notice: &Notice, store: &ConversationStore) {
    match notice {
        Notice::Detected(id) | Notice::Translated(id) => {
            if let Some(message) = store.get(*id) {
                print_message(message);
                println!();
            }
        }
        Notice::NoConfidentResult(id) => {
            println!(
                "{} {}",
                Style::id(id),
                Style::warning("No confident language detected")
            );
        }
        Notice::OperationFailed {
            id,
            capability,
            reason,
        } => {
            print_error(&format!("{id}: {capability} failed: {reason}"));
        }
        Notice::InitFailed { capability, reason } => {
            print_error(&format!("{capability} unavailable: {reason}"));
        }
        Notice::TranslatorReady(pair) => {
            println!(
                "{} Translator ready ({})",
                Style::success("✓"),
                Style::value(pair)
            );
        }
        Notice::DetectorReady | Notice::Stale => {}
    }
}

pub fn print_error(message: &str) {
    eprintln!("{} {message}", Style::error("Error:"));
    eprintln!();
}
