//! Filesystem helpers.

use std::path::Path;

use crate::error::{EvError, Result};

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Read a file to string, returning None if it doesn't exist.
pub fn read_optional(path: impl AsRef<Path>) -> Result<Option<String>> {
    let path = path.as_ref();
    if path.exists() {
        Ok(Some(std::fs::read_to_string(path)?))
    } else {
        Ok(None)
    }
}

/// Write `contents` to `path` through a sibling temp file and a rename.
///
/// Parent directories are created. Readers never observe a half-written file.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }

    let temp_path = path.with_extension("json.tmp");
    std::fs::write(&temp_path, contents).map_err(EvError::Io)?;
    match std::fs::rename(&temp_path, path) {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
            std::fs::remove_file(path).map_err(EvError::Io)?;
            if let Err(err) = std::fs::rename(&temp_path, path) {
                let _ = std::fs::remove_file(&temp_path);
                return Err(EvError::Io(err));
            }
        }
        Err(err) => {
            let _ = std::fs::remove_file(&temp_path);
            return Err(EvError::Io(err));
        }
    }
    Ok(())
}
