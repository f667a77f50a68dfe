//! 基于 JSON 文件的文档存储
//!
//! Each storage key maps to `<data_dir>/<key>.json`. Writes go to a sibling
//! temporary file first and are renamed into place, so a crash mid-write never
//! leaves a truncated document behind.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyrouter_config_core::error::{CoreError, CoreResult};
use anyrouter_config_core::traits::DocumentStore;

const FILE_EXTENSION: &str = "json";
const TEMP_SUFFIX: &str = ".tmp";
const MAX_STORE_FILE_SIZE: u64 = 10 * 1024 * 1024; // 10MB

/// Document store backed by one JSON file per key
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    /// Directory holding the document files
    data_dir: PathBuf,
}

impl JsonFileStore {
    /// Creates the store, creating `data_dir` if it does not exist yet.
    pub fn new(data_dir: impl Into<PathBuf>) -> CoreResult<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir).map_err(|e| {
            CoreError::StorageError(format!(
                "Failed to create data directory {}: {e}",
                data_dir.display()
            ))
        })?;
        log::debug!("JSON file store at {}", data_dir.display());
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Full path of the file holding `key`.
    pub fn file_path(&self, key: &str) -> CoreResult<PathBuf> {
        validate_key(key)?;
        Ok(self.data_dir.join(format!("{key}.{FILE_EXTENSION}")))
    }
}

/// Keys become file names, so anything that could escape the data directory is rejected.
fn validate_key(key: &str) -> CoreResult<()> {
    let invalid = key.trim().is_empty()
        || key.starts_with('.')
        || key.contains(['/', '\\', '\0']);
    if invalid {
        return Err(CoreError::ValidationError(format!(
            "storage key cannot be used as a file name: {key:?}"
        )));
    }
    Ok(())
}

impl DocumentStore for JsonFileStore {
    fn read(&self, key: &str) -> CoreResult<Option<String>> {
        let path = self.file_path(key)?;

        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("Store file does not exist: {}", path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(CoreError::StorageError(format!(
                    "Failed to read store file metadata: {e}"
                )))
            }
        };

        if metadata.len() > MAX_STORE_FILE_SIZE {
            return Err(CoreError::StorageError(format!(
                "Store file too large: {} bytes (max: {} bytes)",
                metadata.len(),
                MAX_STORE_FILE_SIZE
            )));
        }

        fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| CoreError::StorageError(format!("Failed to read store file: {e}")))
    }

    fn write(&self, key: &str, raw: &str) -> CoreResult<()> {
        let path = self.file_path(key)?;
        let mut temp = path.clone().into_os_string();
        temp.push(TEMP_SUFFIX);
        let temp = PathBuf::from(temp);

        // A failed write or rename must not leave a partial temp file behind
        fs::write(&temp, raw)
            .and_then(|()| fs::rename(&temp, &path))
            .map_err(|e| {
                let _ = fs::remove_file(&temp);
                CoreError::StorageError(format!("Failed to write store file: {e}"))
            })
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        let path = self.file_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::StorageError(format!(
                "Failed to remove store file: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_path_like_keys() {
        for key in ["", "  ", "../escape", "a/b", "a\\b", ".hidden"] {
            assert!(validate_key(key).is_err(), "{key:?}");
        }
        assert!(validate_key("anyrouter-config-v1").is_ok());
    }
}
