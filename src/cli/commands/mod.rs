//! Subcommand implementations.

use std::sync::Arc;

use anyhow::{Result, bail};
use tracing::{debug, info};

use super::SessionArgs;
use crate::capability::{Host, NoCapabilities};
use crate::chat::Surface;
use crate::config::{ConfigManager, ResolveOptions, ResolvedConfig, resolve_config};
use crate::conversation::MessageId;
use crate::input::InputReader;
use crate::provider::{ChatClient, ProviderHost};

/// Chat mode command handler.
pub mod chat;

/// One-shot language detection.
pub mod detect;

/// Provider listing command handler.
pub mod providers;

/// One-shot translation.
pub mod translate;

/// Merges CLI overrides with the config file.
pub fn load_config(args: &SessionArgs) -> Result<ResolvedConfig> {
    let manager = ConfigManager::new()?;
    let config_file = manager.load_or_default()?;
    let options = ResolveOptions {
        to: args.to.clone(),
        provider: args.provider.clone(),
        model: args.model.clone(),
    };
    resolve_config(&options, &config_file)
}

/// Builds the capability host for a resolved configuration.
///
/// Without a provider both capabilities are unavailable.
pub fn build_host(config: &ResolvedConfig) -> Result<Arc<dyn Host>> {
    let Some(provider) = &config.provider else {
        info!("no provider configured, capabilities unavailable");
        return Ok(Arc::new(NoCapabilities));
    };

    info!(
        provider = %provider.name,
        endpoint = %provider.endpoint,
        model = %provider.model,
        "using provider"
    );
    let client = ChatClient::new(
        provider.endpoint.clone(),
        provider.model.clone(),
        provider.api_key.clone(),
        config.timeout,
    )?;
    Ok(Arc::new(ProviderHost::new(client)))
}

/// Reads the input, loads capabilities, and sends the text as one message.
///
/// Returns once acquisition has settled, so requests made afterwards see
/// the final capability state.
async fn prepare_surface(file: Option<&str>, args: &SessionArgs) -> Result<(Surface, MessageId)> {
    let config = load_config(args)?;
    let text = InputReader::read(file)?;
    if text.trim().is_empty() {
        bail!("Input is empty");
    }

    let host = build_host(&config)?;
    let mut surface = Surface::new(host, config.native, config.target_language);
    surface.mount();
    for notice in surface.settle().await {
        debug!(?notice, "acquisition settled");
    }

    let id = surface
        .send(text.trim_end_matches('\n'))
        .ok_or_else(|| anyhow::anyhow!("Input is empty"))?;
    Ok((surface, id))
}
