//! Provider listing command handler.

use anyhow::{Result, bail};

use crate::config::ConfigManager;
use crate::ui::Style;

/// Prints configured providers to stdout.
///
/// With a name, shows that provider's details; otherwise lists them all,
/// sorted by name.
pub fn print_providers(specific_provider: Option<&str>) -> Result<()> {
    let manager = ConfigManager::new()?;
    let config = manager.load_or_default()?;

    if config.providers.is_empty() {
        println!("No providers configured.");
        println!(
            "Add providers to {}",
            Style::secondary(manager.config_path().display())
        );
        return Ok(());
    }

    let default_provider = config.lingo.provider.as_deref();
    let default_marker = |name: &str| {
        if default_provider == Some(name) {
            format!(" {}", Style::default_marker())
        } else {
            String::new()
        }
    };

    if let Some(provider_name) = specific_provider {
        let Some(provider) = config.providers.get(provider_name) else {
            bail!("Provider '{provider_name}' not found");
        };

        println!(
            "{} {}{}",
            Style::header("Provider:"),
            Style::value(provider_name),
            default_marker(provider_name)
        );
        println!("  {} = {}", Style::label("endpoint"), provider.endpoint);
        if provider.requires_api_key() {
            let has_key = provider.get_api_key().is_some();
            println!(
                "  {}  = {}",
                Style::label("api_key"),
                if has_key {
                    Style::success("(set)")
                } else {
                    Style::warning("(not set)")
                }
            );
        }
        if provider.models.is_empty() {
            println!(
                "  {}   = {}",
                Style::label("models"),
                Style::secondary("(none configured)")
            );
        } else {
            println!("  {}:", Style::label("models"));
            for model in &provider.models {
                println!("    - {model}");
            }
        }
        return Ok(());
    }

    println!("{}\n", Style::header("Configured providers:"));
    let mut names: Vec<&String> = config.providers.keys().collect();
    names.sort();
    for name in names {
        let provider = &config.providers[name];
        println!("  {}{}", Style::value(name), default_marker(name));
        println!("    endpoint: {}", provider.endpoint);
        if !provider.models.is_empty() {
            println!("    models: {}", provider.models.join(", "));
        }
    }

    Ok(())
}
