//! Android string resources on disk.
//!
//! The [`ResourceStore`] trait is the seam the synchronization engine loads
//! existing target trees through and writes merged trees to.

mod store;
mod xml;

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::model::ValueTree;

pub use store::XmlResourceStore;
pub use xml::{parse_resources, render_resources};

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("failed to access {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid XML near byte {position}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("malformed resource file: {0}")]
    Malformed(String),
}

/// Loads and writes value trees for resource files.
pub trait ResourceStore: Send + Sync {
    /// Loads the tree stored at `path`, or `None` when there is no such file.
    fn load(&self, path: &Path) -> Result<Option<ValueTree>, ResourceError>;

    /// Serializes `tree` to `path`, replacing any previous contents.
    fn write(&self, path: &Path, tree: &ValueTree) -> Result<(), ResourceError>;
}
