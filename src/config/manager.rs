use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::cache::DEFAULT_CAPACITY;
use crate::paths;
use crate::translation::{
    DEFAULT_PROVIDER, Lang, ProviderConfig, ProviderDefinition, find_provider, provider_keys,
    validate_language,
};

/// Default source language code.
pub const DEFAULT_SOURCE_LANGUAGE: &str = "en";

/// Default settings in the `[sync]` section of config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Default provider key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Language of the default `values/` resources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Default target language codes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overwrite: Option<bool>,
    /// Number of translations kept in the cache.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_capacity: Option<usize>,
}

/// Credentials and overrides for one provider (`[providers.<key>]`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    /// Environment variable name containing the app id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id_env: Option<String>,
    /// App key stored directly in config (not recommended).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_key: Option<String>,
    /// Environment variable name containing the app key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_key_env: Option<String>,
    /// Replaces the provider's default base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Model name for LLM-backed providers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl ProviderSettings {
    /// Gets the app id, preferring the environment variable over the config file.
    pub fn get_app_id(&self) -> Option<String> {
        from_env_or(self.app_id_env.as_deref(), self.app_id.as_ref())
    }

    /// Gets the app key, preferring the environment variable over the config file.
    pub fn get_app_key(&self) -> Option<String> {
        from_env_or(self.app_key_env.as_deref(), self.app_key.as_ref())
    }
}

fn from_env_or(env_var: Option<&str>, inline: Option<&String>) -> Option<String> {
    if let Some(env_var) = env_var
        && let Ok(value) = std::env::var(env_var)
        && !value.is_empty()
    {
        return Some(value);
    }
    inline.filter(|value| !value.is_empty()).cloned()
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/strsync/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub sync: SyncConfig,
    /// Provider settings keyed by provider key.
    #[serde(default)]
    pub providers: HashMap<String, ProviderSettings>,
}

/// Options for resolving configuration.
///
/// Contains CLI overrides that take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub provider: Option<String>,
    pub from: Option<String>,
    /// Target language codes; empty means "use the config file".
    pub to: Vec<String>,
    /// Forces overwriting when set; the config file can also enable it.
    pub overwrite: bool,
}

/// Everything a synchronization run needs, after merging CLI, file and defaults.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub definition: &'static ProviderDefinition,
    pub provider: ProviderConfig,
    pub source: Lang,
    pub targets: Vec<Lang>,
    pub overwrite: bool,
    pub cache_capacity: usize,
}

fn unsupported_language(definition: &ProviderDefinition, lang: &Lang) -> String {
    format!(
        "Provider '{}' does not support {lang}\n\n\
         Run 'strsync languages --provider {}' to see its languages.",
        definition.key, definition.key
    )
}

/// Resolves configuration by merging CLI options with config file settings.
///
/// CLI options take precedence over config file values, which take
/// precedence over built-in defaults.
///
/// # Errors
///
/// Returns an error if the provider is unknown, a language code is invalid or
/// unsupported by the provider, no target language is configured, or the
/// provider needs a credential that is not set.
pub fn resolve_config(options: &ResolveOptions, config_file: &ConfigFile) -> Result<ResolvedConfig> {
    let provider_key = options
        .provider
        .as_deref()
        .or(config_file.sync.provider.as_deref())
        .unwrap_or(DEFAULT_PROVIDER);

    let definition = find_provider(provider_key).ok_or_else(|| {
        anyhow::anyhow!(
            "Provider '{provider_key}' not found\n\n\
             Available providers:\n  \
             - {}",
            provider_keys().join("\n  - ")
        )
    })?;

    let source_code = options
        .from
        .as_deref()
        .or(config_file.sync.from.as_deref())
        .unwrap_or(DEFAULT_SOURCE_LANGUAGE);
    let source = validate_language(source_code)?;
    if source.code != "auto" && !definition.supports(&source) {
        bail!(unsupported_language(definition, &source));
    }

    let target_codes = if options.to.is_empty() {
        &config_file.sync.to
    } else {
        &options.to
    };
    if target_codes.is_empty() {
        bail!(
            "Missing required configuration: 'to' (target languages)\n\n\
             Please provide it via:\n  \
             - CLI option: strsync --to fr,de <FILE>\n  \
             - Config file: to = [\"fr\", \"de\"] under [sync] in ~/.config/strsync/config.toml"
        );
    }

    let mut targets: Vec<Lang> = Vec::with_capacity(target_codes.len());
    for code in target_codes {
        let lang = validate_language(code)?;
        if lang.code == "auto" {
            bail!("'auto' can only be used as a source language");
        }
        if !definition.supports(&lang) {
            bail!(unsupported_language(definition, &lang));
        }
        if !targets.contains(&lang) {
            targets.push(lang);
        }
    }

    let settings = config_file
        .providers
        .get(definition.key)
        .cloned()
        .unwrap_or_default();

    let mut provider = ProviderConfig::from_definition(definition).with_credentials(
        settings.get_app_id().unwrap_or_default(),
        settings.get_app_key().unwrap_or_default(),
    );
    provider.endpoint = settings.endpoint.clone();
    provider.model = settings.model.clone();

    if let Some(credential) = provider.missing_credential() {
        let env_var = match credential {
            "app_id" => settings.app_id_env.clone(),
            _ => settings.app_key_env.clone(),
        }
        .unwrap_or_else(|| format!("{}_{}", definition.key, credential).to_uppercase());
        bail!(
            "Provider '{}' requires {credential}\n\n\
             Set the {env_var} environment variable:\n  \
             export {env_var}=\"...\"\n\n\
             Or set {credential} under [providers.{}] in ~/.config/strsync/config.toml",
            definition.key,
            definition.key
        );
    }

    Ok(ResolvedConfig {
        definition,
        provider,
        source,
        targets,
        overwrite: options.overwrite || config_file.sync.overwrite.unwrap_or(false),
        cache_capacity: config_file.sync.cache_capacity.unwrap_or(DEFAULT_CAPACITY),
    })
}

/// Manages loading and saving configuration files.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/strsync/config.toml`
    /// or `~/.config/strsync/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Self {
        Self::at(paths::config_dir().join("config.toml"))
    }

    pub const fn at(config_path: PathBuf) -> Self {
        Self { config_path }
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

    pub fn save(&self, config: &ConfigFile) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(&self.config_path, contents).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;

        Ok(())
    }

    /// Loads the config file, or the defaults when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(&self) -> Result<ConfigFile> {
        if self.config_path.exists() {
            self.load()
        } else {
            Ok(ConfigFile::default())
        }
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
