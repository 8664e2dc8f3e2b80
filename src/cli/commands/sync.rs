use anyhow::{Context, Result, bail};
use std::ffi::OsStr;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

use crate::cache::{CacheStore, TranslationCache};
use crate::config::{ConfigManager, ResolveOptions, resolve_config};
use crate::resource::{ResourceStore, XmlResourceStore};
use crate::sync::{SyncEngine, SyncOptions};
use crate::translation::Provider;
use crate::ui::{Style, SyncProgressBar};
use crate::{status, warning};

/// Options for the synchronization command.
#[derive(Debug, Clone, Default)]
pub struct SyncCommandOptions {
    pub file: Option<PathBuf>,
    pub to: Vec<String>,
    pub from: Option<String>,
    pub provider: Option<String>,
    pub overwrite: bool,
    pub no_cache: bool,
}

/// Translates a default resource file into every configured target language.
pub async fn run_sync(options: SyncCommandOptions, cancel: CancellationToken) -> Result<()> {
    let Some(file) = options.file else {
        bail!(
            "No resource file given\n\n\
             Usage: strsync --to fr,de app/src/main/res/values/strings.xml"
        );
    };

    let config_file = ConfigManager::new().load_or_default()?;
    let resolved = resolve_config(
        &ResolveOptions {
            provider: options.provider,
            from: options.from,
            to: options.to,
            overwrite: options.overwrite,
        },
        &config_file,
    )?;

    let store = XmlResourceStore::new();
    let source = store
        .load(&file)
        .with_context(|| format!("Failed to load {}", file.display()))?
        .with_context(|| format!("Resource file not found: {}", file.display()))?;

    if file.parent().and_then(|dir| dir.file_name()) != Some(OsStr::new("values")) {
        warning!(
            "{} is not inside a 'values' directory; target files are written next to its parent",
            file.display()
        );
    }

    let use_cache = !options.no_cache;
    let cache_store = if use_cache {
        Some(CacheStore::new()?)
    } else {
        None
    };
    let mut cache = match &cache_store {
        Some(cache_store) => cache_store.load(resolved.cache_capacity)?,
        None => TranslationCache::new(resolved.cache_capacity),
    };

    let provider = Provider::new(resolved.definition, resolved.provider.clone())?;

    status!(
        "Translating {} from {} into {} language{} with {}",
        Style::value(file.display()),
        Style::code(&resolved.source.code),
        resolved.targets.len(),
        if resolved.targets.len() == 1 { "" } else { "s" },
        Style::value(resolved.definition.display_name)
    );

    let sync_options = SyncOptions {
        source_lang: resolved.source.clone(),
        overwrite: resolved.overwrite,
        use_cache,
    };

    let result = {
        let progress = SyncProgressBar::new();
        let mut engine = SyncEngine::new(&provider, &store, &mut cache, sync_options)
            .with_cancellation(cancel)
            .with_progress(&progress);
        engine.run(&file, &source, &resolved.targets).await
    };

    if let Some(cache_store) = &cache_store
        && let Err(e) = cache_store.save(&cache)
    {
        warning!("Failed to save translation cache: {e:#}");
    }

    let report = result.context("Synchronization aborted")?;

    if report.cancelled {
        warning!("Cancelled; files written before the interruption are kept");
    } else {
        status!(
            "{} {} file{} written, {} provider request{}",
            Style::success("Done:"),
            report.languages.len(),
            if report.languages.len() == 1 { "" } else { "s" },
            report.total_requests(),
            if report.total_requests() == 1 { "" } else { "s" }
        );
    }

    Ok(())
}
