//! Roster persistence
//!
//! The [`RecordStore`] trait is the load/save contract between the registry
//! and whatever encoding sits on disk. Both file stores share the helpers
//! here: reads treat a missing file as an empty roster, and writes go
//! through a temp file plus rename so a crash never leaves a half-written
//! roster behind.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::error::{StorageError, StorageResult};
use super::json::JsonFileStore;
use super::text::TextFileStore;
use crate::config::{Config, StoreFormat};
use crate::models::Student;

/// Bulk load/save contract for the whole roster
pub trait RecordStore {
    /// Where the records live (used in messages and for backups)
    fn location(&self) -> &Path;

    /// Read every stored record in order
    ///
    /// A missing resource is a fresh start and yields an empty vector.
    /// Any malformed record fails the whole load with
    /// [`StorageError::CorruptData`].
    fn load(&self) -> StorageResult<Vec<Student>>;

    /// Replace the stored records with `students`
    fn save(&self, students: &[Student]) -> StorageResult<()>;

    /// Check if the resource exists
    fn exists(&self) -> bool {
        self.location().exists()
    }

    /// Copy an unreadable resource aside before it gets overwritten
    ///
    /// Returns the backup path, or `None` when there is nothing to back up.
    fn backup_corrupt(&self) -> StorageResult<Option<PathBuf>> {
        backup_file(self.location())
    }
}

/// Open the store selected by the configuration
pub fn open_store(config: &Config) -> Box<dyn RecordStore> {
    let path = config.data_path();
    match config.format {
        StoreFormat::Text => Box::new(TextFileStore::new(path)),
        StoreFormat::Json => Box::new(JsonFileStore::new(path)),
    }
}

/// Read a whole file, treating a missing file as `None`
pub(crate) fn read_optional(path: &Path) -> StorageResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("No existing data file at {:?}, starting fresh", path);
            Ok(None)
        }
        Err(e) if e.kind() == io::ErrorKind::InvalidData => Err(StorageError::CorruptData {
            path: path.to_path_buf(),
            line: 0,
            details: "file is not valid UTF-8".to_string(),
        }),
        Err(e) => Err(StorageError::from_read(e, path.to_path_buf())),
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
pub(crate) fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    // Same directory, so the rename never crosses filesystems
    let temp_path = sibling_path(path, "tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::from_io(e, temp_path.clone()))?;
    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;
    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;
    drop(file);

    fs::rename(&temp_path, path).map_err(|source| {
        let _ = fs::remove_file(&temp_path);
        StorageError::AtomicWriteFailed {
            from: temp_path.clone(),
            to: path.to_path_buf(),
            source,
        }
    })?;

    Ok(())
}

/// Copy `path` to `<path>.corrupt.backup`
fn backup_file(path: &Path) -> StorageResult<Option<PathBuf>> {
    if !path.exists() {
        return Ok(None);
    }

    let backup_path = sibling_path(path, "corrupt.backup");
    fs::copy(path, &backup_path).map_err(|e| StorageError::from_io(e, backup_path.clone()))?;
    warn!("Backed up unreadable data file to {:?}", backup_path);
    Ok(Some(backup_path))
}

/// `path` with `.suffix` appended to the full file name
fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("roster"));
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}
