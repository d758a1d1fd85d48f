use anyhow::Result;
use inquire::Text;

use super::command::{Input, SlashCommand, SlashCommandCompleter, parse_input};
use super::surface::{Dispatch, Notice, Surface};
use super::ui;
use crate::capability::CapabilityError;
use crate::conversation::MessageId;
use crate::ui::{Style, is_prompt_cancelled, prompt_render_config};

/// Provider details shown by `/status`.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// The provider name, if one is configured.
    pub provider_name: Option<String>,
    /// The model backing both capabilities.
    pub model: Option<String>,
    /// The API endpoint URL.
    pub endpoint: Option<String>,
}

/// An interactive chat session.
///
/// Runs the prompt loop on top of a [`Surface`]. Capability results that
/// arrive while the prompt is open are applied right away and reported once
/// the current line has been submitted.
pub struct ChatSession {
    config: SessionConfig,
    surface: Surface,
}

impl ChatSession {
    pub const fn new(config: SessionConfig, surface: Surface) -> Self {
        Self { config, surface }
    }

    pub async fn run(&mut self) -> Result<()> {
        ui::print_header();
        self.surface.mount();

        loop {
            while let Some(event) = self.surface.try_next_event() {
                let notice = self.surface.apply(event);
                ui::print_notice(&notice, self.surface.store());
            }

            let mut prompt = tokio::task::spawn_blocking(|| {
                Text::new("")
                    .with_render_config(prompt_render_config())
                    .with_autocomplete(SlashCommandCompleter)
                    .with_help_message("Type a message, /help for commands, Ctrl+C to quit")
                    .prompt()
            });

            let mut arrived: Vec<Notice> = Vec::new();
            let line = loop {
                tokio::select! {
                    joined = &mut prompt => break joined?,
                    Some(event) = self.surface.next_event() => {
                        arrived.push(self.surface.apply(event));
                    }
                }
            };

            for notice in &arrived {
                ui::print_notice(notice, self.surface.store());
            }

            match line {
                Ok(line) => match parse_input(&line) {
                    Input::Empty => {}
                    Input::Command(cmd) => {
                        if !self.handle_command(cmd) {
                            break;
                        }
                    }
                    Input::Text(text) => self.send(&text),
                },
                Err(e) if is_prompt_cancelled(&e) => {
                    println!(); // Clear line before goodbye message
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }

        ui::print_goodbye();
        Ok(())
    }

    fn send(&mut self, text: &str) {
        if let Some(id) = self.surface.send(text) {
            if let Some(message) = self.surface.store().get(id) {
                ui::print_message(message);
            }
            println!();
        }
    }

    fn handle_command(&mut self, cmd: SlashCommand) -> bool {
        match cmd {
            SlashCommand::Detect(id) => {
                let result = self.surface.request_detection(id);
                report_dispatch(id, "Detecting language", result.map(|()| Dispatch::Started));
            }
            SlashCommand::Translate(id) => {
                let result = self.surface.request_translation(id);
                report_dispatch(id, "Translating", result);
            }
            SlashCommand::Lang { id, lang } => self.change_language(id, &lang),
            SlashCommand::Summarize(id) => self.summarize(id),
            SlashCommand::List => ui::print_conversation(self.surface.store()),
            SlashCommand::Status => ui::print_status(&self.config, self.surface.loader()),
            SlashCommand::Help => ui::print_help(),
            SlashCommand::Quit => return false,
            SlashCommand::Usage(usage) => {
                ui::print_error(&format!("Usage: {usage}"));
            }
            SlashCommand::Unknown(cmd) => {
                ui::print_error(&format!("Unknown command: /{cmd}"));
            }
        }
        true
    }

    fn change_language(&mut self, id: MessageId, lang: &str) {
        match self.surface.change_message_language(id, lang) {
            Ok(()) => println!(
                "{} {} now targets {}\n",
                Style::success("✓"),
                Style::id(id),
                Style::value(lang)
            ),
            Err(e) => ui::print_error(&e.to_string()),
        }
    }

    fn summarize(&self, id: MessageId) {
        if self.surface.store().get(id).is_none() {
            ui::print_error(&CapabilityError::UnknownMessage(id).to_string());
        } else if self.surface.can_summarize(id) {
            println!("{}\n", Style::hint("Summarization is not available yet."));
        } else {
            ui::print_error(&format!("{id} is too short to summarize"));
        }
    }
}

fn report_dispatch(id: MessageId, action: &str, result: Result<Dispatch, CapabilityError>) {
    match result {
        Ok(Dispatch::Started) => {
            println!("{}\n", Style::hint(format!("{action} {id}...")));
        }
        Ok(Dispatch::NotNeeded) => {
            println!(
                "{}\n",
                Style::hint(format!("{id} is already in the native language"))
            );
        }
        Err(e) => ui::print_error(&e.to_string()),
    }
}
