//! Where strsync keeps its configuration file and translation cache.
//!
//! XDG base directory variables are honored on every platform; otherwise the
//! dot directories under the home directory are used.

use std::path::{Path, PathBuf};

/// Returns the configuration directory for strsync.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/strsync` if `XDG_CONFIG_HOME` is set
/// 2. `~/.config/strsync` otherwise
///
/// # Panics
///
/// Panics if the home directory cannot be determined.
pub fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME").map_or_else(
        |_| home_dir().join(".config").join("strsync"),
        |xdg| PathBuf::from(xdg).join("strsync"),
    )
}

/// Returns the cache directory for strsync.
///
/// Resolution order:
/// 1. `$XDG_CACHE_HOME/strsync` if `XDG_CACHE_HOME` is set
/// 2. `~/.cache/strsync` otherwise
///
/// # Panics
///
/// Panics if the home directory cannot be determined.
pub fn cache_dir() -> PathBuf {
    std::env::var("XDG_CACHE_HOME").map_or_else(
        |_| home_dir().join(".cache").join("strsync"),
        |xdg| PathBuf::from(xdg).join("strsync"),
    )
}

/// Path of the translated copy of `source` for the given values directory.
///
/// `res/values/strings.xml` with `values-fr` becomes
/// `res/values-fr/strings.xml`. A source file with no grandparent directory
/// gets the values directory placed next to it.
pub fn target_resource_path(source: &Path, values_dir: &str) -> PathBuf {
    let file_name = source.file_name().unwrap_or_default();
    let res_dir = source
        .parent()
        .and_then(Path::parent)
        .unwrap_or_else(|| Path::new(""));
    res_dir.join(values_dir).join(file_name)
}

/// Returns the user's home directory.
///
/// # Panics
///
/// Panics if the home directory cannot be determined.
#[allow(clippy::expect_used)]
fn home_dir() -> PathBuf {
    dirs::home_dir().expect("Failed to determine home directory")
}
