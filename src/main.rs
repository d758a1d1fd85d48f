use anyhow::Result;
use clap::Parser;

use lingo_cli::cli::commands::{chat, detect, providers, translate};
use lingo_cli::cli::{Args, Command};
use lingo_cli::language::{print_languages, validate_language};
use lingo_cli::output::{self, OutputConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    output::init(OutputConfig {
        quiet: args.quiet,
        verbosity: args.verbose,
        ..OutputConfig::default()
    });

    if let Some(ref lang) = args.session.to {
        validate_language(lang)?;
    }

    match args.command {
        Some(Command::Languages) => {
            print_languages();
        }
        Some(Command::Providers { provider }) => {
            providers::print_providers(provider.as_deref())?;
        }
        Some(Command::Detect { file }) => {
            detect::run_detect(file.as_deref(), &args.session).await?;
        }
        Some(Command::Translate { file }) => {
            translate::run_translate(file.as_deref(), &args.session).await?;
        }
        Some(Command::Chat) | None => {
            chat::run_chat(&args.session).await?;
        }
    }

    Ok(())
}
