use std::path::PathBuf;

use crate::translation::Lang;

/// What happened to one target language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageReport {
    pub lang: Lang,
    pub path: PathBuf,
    /// Nodes sent through translation (including those served from the cache).
    pub translated: usize,
    /// Nodes copied unchanged from the existing target file.
    pub reused: usize,
    /// Non-translatable nodes left out of the target file.
    pub skipped: usize,
    /// Calls made to the translation provider.
    pub requests: usize,
}

impl LanguageReport {
    pub const fn new(lang: Lang, path: PathBuf) -> Self {
        Self {
            lang,
            path,
            translated: 0,
            reused: 0,
            skipped: 0,
            requests: 0,
        }
    }
}

/// Outcome of a whole synchronization run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Languages whose target file was written, in run order.
    pub languages: Vec<LanguageReport>,
    /// Set when the run stopped early because it was cancelled.
    pub cancelled: bool,
}

impl SyncReport {
    pub fn total_requests(&self) -> usize {
        self.languages.iter().map(|report| report.requests).sum()
    }
}

/// Receives progress notifications from a running [`SyncEngine`](super::SyncEngine).
pub trait SyncProgress: Send + Sync {
    fn language_started(&self, _lang: &Lang, _nodes: usize) {}

    fn node_finished(&self, _name: &str) {}

    fn language_finished(&self, _report: &LanguageReport) {}
}

/// Progress sink that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl SyncProgress for NoProgress {}
