//! JSON records on disk: lenient reads, whole-file atomic writes.

use crate::error::StoreError;
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Reads a record, returning `None` when it is missing or unreadable
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no record on disk");
            return None;
        }
    };

    match serde_json::from_slice::<T>(&bytes) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "corrupt record, using defaults");
            None
        }
    }
}

/// Replaces the record at `path`. Data goes to a sibling temp file first and
/// is renamed over the target, so readers never see a half-written file.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let data = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Json {
        path: path.display().to_string(),
        source,
    })?;

    let tmp = temp_path(path);
    fs::write(&tmp, data).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
