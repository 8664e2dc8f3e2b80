//! The synchronization engine: merges a source tree into per-language target trees.

mod engine;
mod report;

use std::path::PathBuf;
use thiserror::Error;

use crate::resource::ResourceError;
use crate::translation::TranslationError;

pub use engine::{SyncEngine, SyncOptions};
pub use report::{LanguageReport, NoProgress, SyncProgress, SyncReport};

/// Why a synchronization run was aborted.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Translation(#[from] TranslationError),

    #[error("failed to sync {}", .path.display())]
    Resource {
        path: PathBuf,
        #[source]
        source: ResourceError,
    },
}
