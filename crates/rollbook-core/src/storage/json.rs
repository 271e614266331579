//! JSON document store
//!
//! Stores the roster as a pretty-printed JSON array of
//! `{ "name", "roll_number", "marks" }` objects. Records are validated on the
//! way in, exactly like the text store.

use std::path::{Path, PathBuf};

use tracing::info;

use super::error::{StorageError, StorageResult};
use super::persistence::{atomic_write, read_optional, RecordStore};
use crate::models::Student;

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordStore for JsonFileStore {
    fn location(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StorageResult<Vec<Student>> {
        let Some(content) = read_optional(&self.path)? else {
            return Ok(Vec::new());
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let students: Vec<Student> =
            serde_json::from_str(&content).map_err(|e| StorageError::CorruptData {
                path: self.path.clone(),
                line: e.line(),
                details: e.to_string(),
            })?;
        info!("Loaded {} student(s) from {:?}", students.len(), self.path);
        Ok(students)
    }

    fn save(&self, students: &[Student]) -> StorageResult<()> {
        let mut bytes = serde_json::to_vec_pretty(students)
            .map_err(|e| StorageError::Io(e.into()))?;
        bytes.push(b'\n');
        atomic_write(&self.path, &bytes)?;
        info!("Saved {} student(s) to {:?}", students.len(), self.path);
        Ok(())
    }
}
