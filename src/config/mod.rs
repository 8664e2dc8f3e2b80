mod manager;

pub use manager::{
    ConfigFile, ConfigManager, DEFAULT_SOURCE_LANGUAGE, ProviderSettings, ResolveOptions,
    ResolvedConfig, SyncConfig, resolve_config,
};
