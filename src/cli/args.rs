use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "lingo")]
#[command(about = "Chat with automatic language detection and translation")]
#[command(version)]
pub struct Args {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Increase diagnostic output (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Overrides for the config file, shared by every session-like command.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct SessionArgs {
    /// Target language code (e.g., es, fr, pt)
    #[arg(short = 't', long = "to", global = true)]
    pub to: Option<String>,

    /// Provider name from config.toml
    #[arg(short = 'p', long, global = true)]
    pub provider: Option<String>,

    /// Model name
    #[arg(short = 'm', long, global = true)]
    pub model: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive chat session (the default)
    Chat,
    /// Detect the language of a file or stdin
    Detect {
        /// File to read (reads from stdin if not provided)
        file: Option<String>,
    },
    /// Translate a file or stdin into the target language
    Translate {
        /// File to read (reads from stdin if not provided)
        file: Option<String>,
    },
    /// List selectable target languages
    Languages,
    /// List configured providers
    Providers {
        /// Show details for one provider
        provider: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_chat() {
        let args = Args::try_parse_from(["lingo"]).unwrap();
        assert!(args.command.is_none());
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args =
            Args::try_parse_from(["lingo", "translate", "notes.md", "--to", "es", "-vv"]).unwrap();
        assert_eq!(args.session.to.as_deref(), Some("es"));
        assert_eq!(args.verbose, 2);
        match args.command {
            Some(Command::Translate { file }) => assert_eq!(file.as_deref(), Some("notes.md")),
            other => panic!("Expected translate, got {other:?}"),
        }
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Args::try_parse_from(["lingo", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_chat_with_provider_and_model() {
        let args =
            Args::try_parse_from(["lingo", "chat", "--provider", "ollama", "-m", "gemma3"]).unwrap();
        assert!(matches!(args.command, Some(Command::Chat)));
        assert_eq!(args.session.provider.as_deref(), Some("ollama"));
        assert_eq!(args.session.model.as_deref(), Some("gemma3"));
    }
}
