//! Provider listing command handler.

use anyhow::{Result, bail};

use crate::config::{ConfigFile, ConfigManager, ProviderSettings};
use crate::translation::{DEFAULT_PROVIDER, PROVIDERS, ProviderDefinition, find_provider};
use crate::ui::Style;

/// Prints the built-in providers to stdout.
///
/// If `specific_provider` is provided, shows detailed information for that provider.
/// Otherwise, lists every provider with whether its credentials are set.
pub fn print_providers(specific_provider: Option<&str>) -> Result<()> {
    let config = ConfigManager::new().load_or_default()?;
    let default_provider = config.sync.provider.as_deref().unwrap_or(DEFAULT_PROVIDER);

    if let Some(key) = specific_provider {
        let Some(definition) = find_provider(key) else {
            bail!("Provider '{key}' not found");
        };
        print_provider_details(definition, &config, default_provider == key);
        return Ok(());
    }

    println!("{}\n", Style::header("Translation providers"));
    for definition in PROVIDERS {
        let settings = settings_for(&config, definition);
        let marker = if definition.key == default_provider {
            format!(" {}", Style::default_marker())
        } else {
            String::new()
        };
        println!(
            "  {:10} {}{marker}",
            Style::value(definition.key),
            Style::secondary(definition.display_name)
        );
        println!(
            "    {} {}",
            Style::label("credentials:"),
            credential_status(definition, &settings)
        );
    }

    Ok(())
}

fn settings_for(config: &ConfigFile, definition: &ProviderDefinition) -> ProviderSettings {
    config
        .providers
        .get(definition.key)
        .cloned()
        .unwrap_or_default()
}

fn credential_status(definition: &ProviderDefinition, settings: &ProviderSettings) -> String {
    if !definition.needs_app_id && !definition.needs_app_key {
        return Style::secondary("not required");
    }
    let id_ok = !definition.needs_app_id || settings.get_app_id().is_some();
    let key_ok = !definition.needs_app_key || settings.get_app_key().is_some();
    if id_ok && key_ok {
        Style::success("set")
    } else {
        Style::warning("not set")
    }
}

fn print_provider_details(
    definition: &ProviderDefinition,
    config: &ConfigFile,
    is_default: bool,
) {
    let settings = settings_for(config, definition);

    println!(
        "Provider: {}{}",
        Style::value(definition.key),
        if is_default {
            format!(" {}", Style::default_marker())
        } else {
            String::new()
        }
    );
    println!("  {}     {}", Style::label("name"), definition.display_name);
    println!(
        "  {} {}",
        Style::label("endpoint"),
        settings.endpoint.as_deref().unwrap_or(definition.base_url)
    );
    if definition.needs_app_id {
        let status = if settings.get_app_id().is_some() {
            "(set)"
        } else {
            "(not set)"
        };
        println!("  {}   {status}", Style::label("app_id"));
    }
    if definition.needs_app_key {
        let status = if settings.get_app_key().is_some() {
            "(set)"
        } else {
            "(not set)"
        };
        println!("  {}  {status}", Style::label("app_key"));
    }
    if let Some(model) = settings.model.as_deref().or(definition.default_model) {
        println!("  {}    {model}", Style::label("model"));
    }
    match definition.languages {
        Some(codes) => println!("  {} {}", Style::label("languages"), codes.len()),
        None => println!("  {} all", Style::label("languages")),
    }
}
