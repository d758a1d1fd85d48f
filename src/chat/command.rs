use inquire::autocompletion::{Autocomplete, Replacement};

use crate::conversation::MessageId;

/// Available slash commands: (command, arguments, description)
pub const SLASH_COMMANDS: &[(&str, &str, &str)] = &[
    ("/detect", "<id>", "Detect the language of a message"),
    ("/translate", "<id>", "Translate a message"),
    ("/lang", "<id> <code>", "Set a message's target language"),
    ("/summarize", "<id>", "Summarize a long message"),
    ("/list", "", "Show the conversation"),
    ("/status", "", "Show capability status"),
    ("/help", "", "Show available commands"),
    ("/quit", "", "Exit chat mode"),
];

/// Slash command autocompleter
#[derive(Clone, Default)]
pub struct SlashCommandCompleter;

impl Autocomplete for SlashCommandCompleter {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, inquire::CustomUserError> {
        if !input.starts_with('/') || input.contains(' ') {
            return Ok(vec![]);
        }

        let suggestions: Vec<String> = SLASH_COMMANDS
            .iter()
            .filter(|(cmd, _, _)| cmd.starts_with(input))
            .map(|(cmd, _, desc)| format!("{cmd}  {desc}"))
            .collect();

        Ok(suggestions)
    }

    fn get_completion(
        &mut self,
        _input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, inquire::CustomUserError> {
        let replacement = highlighted_suggestion.map(|s| {
            let cmd = s.split_whitespace().next().unwrap_or("");
            let takes_args = SLASH_COMMANDS
                .iter()
                .any(|(c, args, _)| *c == cmd && !args.is_empty());
            if takes_args {
                format!("{cmd} ")
            } else {
                cmd.to_string()
            }
        });
        Ok(replacement)
    }
}

/// Slash command types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Detect(MessageId),
    Translate(MessageId),
    Lang { id: MessageId, lang: String },
    Summarize(MessageId),
    List,
    Status,
    Help,
    Quit,
    /// A known command with missing or malformed arguments.
    Usage(&'static str),
    Unknown(String),
}

/// Input types
#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    /// Message text, exactly as typed.
    Text(String),
    Command(SlashCommand),
    Empty,
}

pub fn parse_input(input: &str) -> Input {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Input::Empty;
    }

    trimmed.strip_prefix('/').map_or_else(
        || Input::Text(input.to_string()),
        |cmd| Input::Command(parse_slash_command(cmd)),
    )
}

fn parse_slash_command(cmd: &str) -> SlashCommand {
    let parts: Vec<&str> = cmd.split_whitespace().collect();
    let id = || parts.get(1).and_then(|raw| raw.parse::<MessageId>().ok());

    match parts.first().copied() {
        Some("detect") => id().map_or(SlashCommand::Usage("/detect <id>"), SlashCommand::Detect),
        Some("translate") => id().map_or(
            SlashCommand::Usage("/translate <id>"),
            SlashCommand::Translate,
        ),
        Some("lang") => match (id(), parts.get(2)) {
            (Some(id), Some(lang)) => SlashCommand::Lang {
                id,
                lang: (*lang).to_string(),
            },
            _ => SlashCommand::Usage("/lang <id> <code>"),
        },
        Some("summarize") => id().map_or(
            SlashCommand::Usage("/summarize <id>"),
            SlashCommand::Summarize,
        ),
        Some("list" | "ls") => SlashCommand::List,
        Some("status") => SlashCommand::Status,
        Some("help") => SlashCommand::Help,
        Some("quit" | "exit" | "q") => SlashCommand::Quit,
        _ => SlashCommand::Unknown(parts.join(" ")),
    }
}
