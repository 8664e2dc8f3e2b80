//! File system utilities.

use std::fs;
use std::io;
use std::path::Path;

/// Replaces `path` with `content` through a sibling temp file and a rename,
/// so an interrupted run never leaves a half-written resource file behind.
///
/// Missing parent directories are created first.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the temp
/// file cannot be written or renamed.
pub fn atomic_write(path: &Path, content: &str) -> io::Result<()> {
    let parent = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;

    let file_name = path.file_name().unwrap_or_default().to_string_lossy();
    let temp_path = parent.join(format!(".{file_name}.tmp"));

    fs::write(&temp_path, content)?;

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    Ok(())
}
