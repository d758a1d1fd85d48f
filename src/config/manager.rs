use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use crate::language::{NATIVE_LANGUAGE, validate_language};
use crate::paths;

/// Request timeout used when the config file does not set one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default settings in the `[lingo]` section of config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LingoConfig {
    /// Default provider name.
    pub provider: Option<String>,
    /// Default model name.
    pub model: Option<String>,
    /// Initial target language for new messages.
    pub to: Option<String>,
    /// Language messages are assumed to be written in.
    pub native: Option<String>,
    /// Per-request timeout for provider calls, in seconds.
    pub timeout_secs: Option<u64>,
}

/// Configuration for a capability provider.
///
/// Each provider has an endpoint and optional API key settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// The OpenAI-compatible API endpoint URL.
    pub endpoint: String,
    /// API key stored directly in config (not recommended).
    #[serde(default)]
    pub api_key: Option<String>,
    /// Environment variable name containing the API key.
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// List of available models for this provider.
    #[serde(default)]
    pub models: Vec<String>,
}

impl ProviderConfig {
    /// Gets the API key, preferring environment variable over config file.
    pub fn get_api_key(&self) -> Option<String> {
        if let Some(env_var) = &self.api_key_env
            && let Ok(key) = std::env::var(env_var)
            && !key.is_empty()
        {
            return Some(key);
        }
        self.api_key.clone()
    }

    /// Returns `true` if this provider requires an API key.
    pub const fn requires_api_key(&self) -> bool {
        self.api_key.is_some() || self.api_key_env.is_some()
    }
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/lingo/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Default settings.
    #[serde(default)]
    pub lingo: LingoConfig,
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

/// A provider selected and ready to connect to.
#[derive(Debug, Clone)]
pub struct ResolvedProvider {
    pub name: String,
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
}

/// Resolved configuration after merging CLI arguments and config file.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// `None` when no provider is configured: capabilities are then unavailable.
    pub provider: Option<ResolvedProvider>,
    /// The native (source) language code.
    pub native: String,
    /// The initial target language code.
    pub target_language: String,
    pub timeout: Duration,
}

/// Options for resolving configuration.
///
/// Contains CLI overrides that take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Target language code override.
    pub to: Option<String>,
    /// Provider name override.
    pub provider: Option<String>,
    /// Model name override.
    pub model: Option<String>,
}

/// Resolves configuration by merging CLI options with config file settings.
///
/// CLI options take precedence over config file values. A missing provider is
/// not an error; it leaves the session without capabilities.
///
/// # Errors
///
/// Returns an error if a named provider is not found, a provider has no
/// model, a language code is invalid, or a required API key is missing.
pub fn resolve_config(
    options: &ResolveOptions,
    config_file: &ConfigFile,
) -> Result<ResolvedConfig> {
    let native = config_file
        .lingo
        .native
        .clone()
        .unwrap_or_else(|| NATIVE_LANGUAGE.to_string());
    validate_language(&native).context("Invalid 'native' language in config file")?;

    let target_language = options
        .to
        .as_ref()
        .or(config_file.lingo.to.as_ref())
        .cloned()
        .unwrap_or_else(|| native.clone());
    validate_language(&target_language)?;

    let provider_name = options
        .provider
        .as_ref()
        .or(config_file.lingo.provider.as_ref());

    let provider = match provider_name {
        Some(name) => Some(resolve_provider(name, options, config_file)?),
        None => None,
    };

    let timeout = Duration::from_secs(
        config_file
            .lingo
            .timeout_secs
            .unwrap_or(DEFAULT_TIMEOUT_SECS),
    );

    Ok(ResolvedConfig {
        provider,
        native,
        target_language,
        timeout,
    })
}

fn resolve_provider(
    provider_name: &str,
    options: &ResolveOptions,
    config_file: &ConfigFile,
) -> Result<ResolvedProvider> {
    let provider_config = config_file.providers.get(provider_name).ok_or_else(|| {
        let mut available: Vec<_> = config_file.providers.keys().map(String::as_str).collect();
        available.sort_unstable();
        if available.is_empty() {
            anyhow::anyhow!(
                "Provider '{provider_name}' not found\n\n\
                 No providers configured. Add providers to ~/.config/lingo/config.toml"
            )
        } else {
            anyhow::anyhow!(
                "Provider '{provider_name}' not found\n\n\
                 Available providers:\n  \
                 - {}\n\n\
                 Add providers to ~/.config/lingo/config.toml",
                available.join("\n  - ")
            )
        }
    })?;

    let model = options
        .model
        .as_ref()
        .or(config_file.lingo.model.as_ref())
        .cloned()
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Missing required configuration: 'model'\n\n\
                 Please provide it via:\n  \
                 - CLI option: lingo --model <name>\n  \
                 - Config file: ~/.config/lingo/config.toml"
            )
        })?;

    if !provider_config.models.is_empty() && !provider_config.models.contains(&model) {
        warn!(
            provider = provider_name,
            model = %model,
            configured = %provider_config.models.join(", "),
            "model is not in the configured models list, proceeding anyway"
        );
    }

    let api_key = provider_config.get_api_key();

    if provider_config.requires_api_key() && api_key.is_none() {
        let env_var = provider_config.api_key_env.as_deref().unwrap_or("API_KEY");
        bail!(
            "Provider '{provider_name}' requires an API key\n\n\
             Set the {env_var} environment variable:\n  \
             export {env_var}=\"your-api-key\"\n\n\
             Or set api_key in ~/.config/lingo/config.toml"
        );
    }

    Ok(ResolvedProvider {
        name: provider_name.to_string(),
        endpoint: provider_config.endpoint.clone(),
        model,
        api_key,
    })
}

/// Loads the configuration file.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager.
    ///
    /// Configuration is read from `$XDG_CONFIG_HOME/lingo/config.toml`
    /// or `~/.config/lingo/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_dir()?.join("config.toml"),
        })
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile =
            toml::from_str(&contents).with_context(|| "Failed to parse config file")?;

        Ok(config_file)
    }

    /// Loads the config file, treating a missing file as empty.
    ///
    /// A file that exists but does not parse is still an error.
    pub fn load_or_default(&self) -> Result<ConfigFile> {
        if self.config_path.exists() {
            self.load()
        } else {
            Ok(ConfigFile::default())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn create_test_manager(temp_dir: &TempDir) -> ConfigManager {
        ConfigManager {
            config_path: temp_dir.path().join("config.toml"),
        }
    }

    #[test]
    fn test_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        fs::write(
            manager.config_path(),
            r#"
[lingo]
provider = "ollama"
model = "gemma3:12b"
to = "es"
timeout_secs = 15

[providers.ollama]
endpoint = "http://localhost:11434"
models = ["gemma3:12b", "llama3.2"]
"#,
        )
        .unwrap();

        let loaded = manager.load().unwrap();

        assert_eq!(loaded.lingo.provider, Some("ollama".to_string()));
        assert_eq!(loaded.lingo.model, Some("gemma3:12b".to_string()));
        assert_eq!(loaded.lingo.to, Some("es".to_string()));
        assert_eq!(loaded.lingo.timeout_secs, Some(15));
        assert!(loaded.lingo.native.is_none());
        assert_eq!(loaded.providers["ollama"].models.len(), 2);
    }

    #[test]
    fn test_load_nonexistent_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        assert!(manager.load().is_err());
        let config = manager.load_or_default().unwrap();
        assert!(config.providers.is_empty());
    }

    #[test]
    fn test_load_or_default_rejects_broken_file() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        fs::write(manager.config_path(), "[lingo\nprovider = ").unwrap();

        assert!(manager.load_or_default().is_err());
    }

    #[test]
    #[serial]
    fn test_provider_get_api_key_from_env() {
        // SAFETY: serialized with other env-mutating tests
        unsafe {
            std::env::set_var("LINGO_TEST_API_KEY", "test-key-value");
        }

        let provider = ProviderConfig {
            endpoint: "https://api.example.com".to_string(),
            api_key: Some("fallback-key".to_string()),
            api_key_env: Some("LINGO_TEST_API_KEY".to_string()),
            models: vec![],
        };

        // Environment variable takes priority
        assert_eq!(provider.get_api_key(), Some("test-key-value".to_string()));

        // SAFETY: serialized with other env-mutating tests
        unsafe {
            std::env::remove_var("LINGO_TEST_API_KEY");
        }
    }

    #[test]
    #[serial]
    fn test_provider_get_api_key_fallback() {
        // SAFETY: serialized with other env-mutating tests
        unsafe {
            std::env::remove_var("LINGO_NONEXISTENT_KEY");
        }

        let provider = ProviderConfig {
            endpoint: "https://api.example.com".to_string(),
            api_key: Some("fallback-key".to_string()),
            api_key_env: Some("LINGO_NONEXISTENT_KEY".to_string()),
            models: vec![],
        };

        assert_eq!(provider.get_api_key(), Some("fallback-key".to_string()));
    }

    // resolve_config tests

    fn create_test_config() -> ConfigFile {
        let mut providers = HashMap::new();
        providers.insert(
            "ollama".to_string(),
            ProviderConfig {
                endpoint: "http://localhost:11434".to_string(),
                api_key: None,
                api_key_env: None,
                models: vec!["gemma3:12b".to_string()],
            },
        );
        providers.insert(
            "openrouter".to_string(),
            ProviderConfig {
                endpoint: "https://openrouter.ai/api".to_string(),
                api_key: None,
                api_key_env: Some("LINGO_TEST_NONEXISTENT_API_KEY".to_string()),
                models: vec!["gpt-4o".to_string()],
            },
        );

        ConfigFile {
            lingo: LingoConfig {
                provider: Some("ollama".to_string()),
                model: Some("gemma3:12b".to_string()),
                to: Some("es".to_string()),
                native: None,
                timeout_secs: None,
            },
            providers,
        }
    }

    #[test]
    fn test_resolve_config_from_file() {
        let resolved = resolve_config(&ResolveOptions::default(), &create_test_config()).unwrap();

        let provider = resolved.provider.unwrap();
        assert_eq!(provider.name, "ollama");
        assert_eq!(provider.endpoint, "http://localhost:11434");
        assert_eq!(provider.model, "gemma3:12b");
        assert!(provider.api_key.is_none());
        assert_eq!(resolved.native, "en");
        assert_eq!(resolved.target_language, "es");
        assert_eq!(resolved.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_resolve_config_without_provider() {
        let resolved = resolve_config(&ResolveOptions::default(), &ConfigFile::default()).unwrap();

        assert!(resolved.provider.is_none());
        assert_eq!(resolved.target_language, "en");
    }

    #[test]
    fn test_resolve_config_provider_not_found() {
        let options = ResolveOptions {
            provider: Some("nonexistent".to_string()),
            ..ResolveOptions::default()
        };

        let result = resolve_config(&options, &create_test_config());

        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[test]
    fn test_resolve_config_missing_model() {
        let mut config = create_test_config();
        config.lingo.model = None;

        let result = resolve_config(&ResolveOptions::default(), &config);

        assert!(result.unwrap_err().to_string().contains("model"));
    }

    #[test]
    fn test_resolve_config_invalid_target() {
        let options = ResolveOptions {
            to: Some("klingon".to_string()),
            ..ResolveOptions::default()
        };

        let result = resolve_config(&options, &create_test_config());

        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Invalid language code")
        );
    }

    #[test]
    fn test_resolve_config_invalid_native() {
        let mut config = create_test_config();
        config.lingo.native = Some("xx".to_string());

        assert!(resolve_config(&ResolveOptions::default(), &config).is_err());
    }

    #[test]
    #[serial]
    fn test_resolve_config_api_key_required_but_missing() {
        let options = ResolveOptions {
            provider: Some("openrouter".to_string()),
            model: Some("gpt-4o".to_string()),
            ..ResolveOptions::default()
        };

        let result = resolve_config(&options, &create_test_config());

        assert!(result.unwrap_err().to_string().contains("API key"));
    }

    #[test]
    fn test_resolve_config_custom_timeout() {
        let mut config = create_test_config();
        config.lingo.timeout_secs = Some(5);

        let resolved = resolve_config(&ResolveOptions::default(), &config).unwrap();

        assert_eq!(resolved.timeout, Duration::from_secs(5));
    }
}
