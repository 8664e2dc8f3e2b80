use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::SyncError;
use super::report::{LanguageReport, NoProgress, SyncProgress, SyncReport};
use crate::cache::TranslationCache;
use crate::model::{ContentRun, TreeEntry, ValueNode, ValueTree, split_padding};
use crate::paths::target_resource_path;
use crate::resource::ResourceStore;
use crate::translation::{Lang, TranslationError, Translator};

static NO_PROGRESS: NoProgress = NoProgress;

/// Settings for one synchronization run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Language of the source tree.
    pub source_lang: Lang,
    /// Retranslate nodes that already exist in a target file.
    pub overwrite: bool,
    /// Consult and fill the translation cache.
    pub use_cache: bool,
}

/// Drives a synchronization run over a list of target languages.
///
/// Languages are processed one at a time in the order given, and nodes one at
/// a time in source order. The first translation or resource error aborts the
/// whole run; files written for earlier languages are kept.
pub struct SyncEngine<'a> {
    translator: &'a dyn Translator,
    store: &'a dyn ResourceStore,
    cache: &'a mut TranslationCache,
    options: SyncOptions,
    cancel: CancellationToken,
    progress: &'a dyn SyncProgress,
}

impl<'a> SyncEngine<'a> {
    pub fn new(
        translator: &'a dyn Translator,
        store: &'a dyn ResourceStore,
        cache: &'a mut TranslationCache,
        options: SyncOptions,
    ) -> Self {
        Self {
            translator,
            store,
            cache,
            options,
            cancel: CancellationToken::new(),
            progress: &NO_PROGRESS,
        }
    }

    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    #[must_use]
    pub fn with_progress(mut self, progress: &'a dyn SyncProgress) -> Self {
        self.progress = progress;
        self
    }

    /// Merges `source` (loaded from `source_path`) into the target file of
    /// every language in `targets`.
    pub async fn run(
        &mut self,
        source_path: &Path,
        source: &ValueTree,
        targets: &[Lang],
    ) -> Result<SyncReport, SyncError> {
        let mut report = SyncReport::default();

        for lang in targets {
            if self.cancel.is_cancelled() {
                info!("synchronization cancelled before {}", lang.code);
                report.cancelled = true;
                break;
            }

            if *lang == self.options.source_lang {
                warn!("skipping {}: it is the source language", lang.code);
                continue;
            }

            match self.sync_language(source_path, source, lang).await? {
                Some(lang_report) => report.languages.push(lang_report),
                None => {
                    info!("synchronization cancelled during {}", lang.code);
                    report.cancelled = true;
                    break;
                }
            }
        }

        Ok(report)
    }

    /// Merges `source` into the target file for `lang` and writes it.
    ///
    /// Returns `Ok(None)` if the run was cancelled before the file was written.
    pub async fn sync_language(
        &mut self,
        source_path: &Path,
        source: &ValueTree,
        lang: &Lang,
    ) -> Result<Option<LanguageReport>, SyncError> {
        let target_path = target_resource_path(source_path, &lang.values_dir_name());
        let existing = self
            .store
            .load(&target_path)
            .map_err(|source| SyncError::Resource {
                path: target_path.clone(),
                source,
            })?;
        let existing_nodes = existing
            .as_ref()
            .map(ValueTree::index_by_name)
            .unwrap_or_default();

        debug!(
            lang = %lang.code,
            path = %target_path.display(),
            existing = existing_nodes.len(),
            "syncing language"
        );
        self.progress.language_started(lang, source.node_count());

        let mut report = LanguageReport::new(lang.clone(), target_path.clone());
        let mut merged =
            ValueTree::new().with_root_attributes(merged_root_attributes(source, existing.as_ref()));
        let mut drop_next_passthrough = false;

        for entry in source.entries() {
            if self.cancel.is_cancelled() {
                return Ok(None);
            }

            let TreeEntry::Node(node) = entry else {
                if std::mem::take(&mut drop_next_passthrough) {
                    continue;
                }
                merged.push(entry.clone());
                continue;
            };
            drop_next_passthrough = false;

            if !node.translatable {
                debug!(name = %node.name, "skipping non-translatable node");
                report.skipped += 1;
                drop_next_passthrough = true;
                self.progress.node_finished(&node.name);
                continue;
            }

            let reusable = existing_nodes
                .get(node.name.as_str())
                .filter(|_| !self.options.overwrite);
            if let Some(existing_node) = reusable {
                debug!(name = %node.name, "reusing existing translation");
                merged.push(TreeEntry::Node((*existing_node).clone()));
                report.reused += 1;
                self.progress.node_finished(&node.name);
                continue;
            }

            let translated = self.translate_node(node, lang, &mut report).await?;
            merged.push(TreeEntry::Node(translated));
            report.translated += 1;
            self.progress.node_finished(&node.name);
        }

        self.store
            .write(&target_path, &merged)
            .map_err(|source| SyncError::Resource {
                path: target_path.clone(),
                source,
            })?;

        info!(
            lang = %lang.code,
            translated = report.translated,
            reused = report.reused,
            skipped = report.skipped,
            "wrote {}",
            target_path.display()
        );
        self.progress.language_finished(&report);
        Ok(Some(report))
    }

    /// Returns a copy of `node` with every non-blank text run translated.
    async fn translate_node(
        &mut self,
        node: &ValueNode,
        to: &Lang,
        report: &mut LanguageReport,
    ) -> Result<ValueNode, TranslationError> {
        if !node.has_translatable_text() {
            debug!(name = %node.name, "nothing to translate");
            return Ok(node.clone());
        }

        let mut copy = node.clone();
        for runs in copy.run_lists_mut() {
            for run in runs.iter_mut().filter(|run| run.is_translatable()) {
                if let ContentRun::Text(text) = run {
                    *text = self.translate_text(text, to, report).await?;
                }
            }
        }
        Ok(copy)
    }

    /// Translates the trimmed core of `text`, keeping its surrounding whitespace.
    async fn translate_text(
        &mut self,
        text: &str,
        to: &Lang,
        report: &mut LanguageReport,
    ) -> Result<String, TranslationError> {
        let (leading, core, trailing) = split_padding(text);
        let from = &self.options.source_lang;

        if self.options.use_cache {
            if let Some(hit) = self.cache.lookup(from, to, core) {
                return Ok(format!("{leading}{hit}{trailing}"));
            }
        }

        report.requests += 1;
        let translated = self.translator.translate(from, to, core).await?;
        if self.options.use_cache {
            self.cache.store(from, to, core, &translated);
        }

        Ok(format!("{leading}{translated}{trailing}"))
    }
}

/// Root attributes of the source tree followed by those only the existing
/// target declares, so reused entries keep their namespace prefixes bound.
fn merged_root_attributes(source: &ValueTree, existing: Option<&ValueTree>) -> Vec<(String, String)> {
    let mut attributes = source.root_attributes().to_vec();
    for (key, value) in existing.map(ValueTree::root_attributes).unwrap_or_default() {
        if !attributes.iter().any(|(known, _)| known == key) {
            attributes.push((key.clone(), value.clone()));
        }
    }
    attributes
}
