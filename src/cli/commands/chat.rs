use anyhow::Result;

use super::{build_host, load_config};
use crate::chat::{ChatSession, SessionConfig, Surface};
use crate::cli::SessionArgs;

pub async fn run_chat(args: &SessionArgs) -> Result<()> {
    let config = load_config(args)?;
    let host = build_host(&config)?;

    let session_config = SessionConfig {
        provider_name: config.provider.as_ref().map(|p| p.name.clone()),
        model: config.provider.as_ref().map(|p| p.model.clone()),
        endpoint: config.provider.as_ref().map(|p| p.endpoint.clone()),
    };
    let surface = Surface::new(host, config.native, config.target_language);

    let mut session = ChatSession::new(session_config, surface);
    session.run().await
}
