//! Configuration file loading and resolution.

mod manager;

pub use manager::{
    ConfigFile, ConfigManager, DEFAULT_TIMEOUT_SECS, LingoConfig, ProviderConfig, ResolveOptions,
    ResolvedConfig, ResolvedProvider, resolve_config,
};
