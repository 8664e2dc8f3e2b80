use std::io;
use std::path::Path;
use tracing::debug;

use super::xml::{parse_resources, render_resources};
use super::{ResourceError, ResourceStore};
use crate::fs::atomic_write;
use crate::model::ValueTree;

/// [`ResourceStore`] backed by `strings.xml` files on the local file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlResourceStore;

impl XmlResourceStore {
    pub const fn new() -> Self {
        Self
    }
}

impl ResourceStore for XmlResourceStore {
    fn load(&self, path: &Path) -> Result<Option<ValueTree>, ResourceError> {
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ResourceError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let tree = parse_resources(&source)?;
        debug!(path = %path.display(), nodes = tree.node_count(), "loaded resource file");
        Ok(Some(tree))
    }

    fn write(&self, path: &Path, tree: &ValueTree) -> Result<(), ResourceError> {
        atomic_write(path, &render_resources(tree)).map_err(|source| ResourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), nodes = tree.node_count(), "wrote resource file");
        Ok(())
    }
}
