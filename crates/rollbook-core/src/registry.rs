//! Roster lifecycle
//!
//! The `Registry` owns the in-memory [`Roster`] and the [`RecordStore`] it
//! came from. It is the main entry point for callers:
//!
//! ```ignore
//! let mut registry = Registry::initialize()?;   // load (or start fresh)
//!
//! registry.add_student(Student::new("Alice", 1, 88.5)?)?;
//! let stats = registry.statistics()?;
//!
//! registry.shutdown()?;                         // save everything back
//! ```
//!
//! ## Loading
//!
//! A missing data file is a fresh start. An unreadable one is copied aside
//! and replaced by an empty roster, so a bad file never blocks the program.
//! If that copy cannot be made the registry still opens, but refuses to save
//! over the original. Any other I/O failure is returned to the caller.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::RosterResult;
use crate::models::Student;
use crate::roster::{Roster, Statistics};
use crate::storage::{open_store, RecordStore, StorageError, StorageResult};

/// What happened when the roster was loaded
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// No data file existed yet
    Fresh,
    /// Records were loaded from the data file
    Loaded { count: usize },
    /// The data file was unreadable; the roster started empty
    Recovered {
        details: String,
        backup_path: Option<PathBuf>,
    },
}

/// Owns the roster for one run and persists it on shutdown
pub struct Registry {
    roster: Roster,
    store: Box<dyn RecordStore>,
    outcome: LoadOutcome,
    dirty: bool,
    /// Set when the data file is unreadable and has no backup
    save_blocked: bool,
}

impl Registry {
    /// Load configuration and initialize from the configured store
    pub fn initialize() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Self::initialize_with_config(&config)
    }

    /// Initialize from the store selected by `config`
    pub fn initialize_with_config(config: &Config) -> Result<Self> {
        let store = open_store(config);
        Self::with_store(store)
            .with_context(|| format!("Failed to load roster from {:?}", config.data_path()))
    }

    /// Initialize from an explicit store
    pub fn with_store(store: Box<dyn RecordStore>) -> StorageResult<Self> {
        let (roster, outcome) = match store.load() {
            Ok(records) if records.is_empty() && !store.exists() => {
                (Roster::new(), LoadOutcome::Fresh)
            }
            Ok(records) => match Roster::from_records(records) {
                Ok(roster) => {
                    let count = roster.len();
                    info!("Roster initialized with {} student(s)", count);
                    (roster, LoadOutcome::Loaded { count })
                }
                Err(e) => recover(store.as_ref(), format!("duplicate record: {}", e)),
            },
            Err(e) if e.is_corrupt() => recover(store.as_ref(), e.to_string()),
            Err(e) => return Err(e),
        };

        let save_blocked = matches!(
            &outcome,
            LoadOutcome::Recovered {
                backup_path: None,
                ..
            }
        ) && store.exists();

        Ok(Self {
            roster,
            store,
            outcome,
            dirty: false,
            save_blocked,
        })
    }

    /// How the roster was loaded
    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.outcome
    }

    /// Where the roster is persisted
    pub fn location(&self) -> &Path {
        self.store.location()
    }

    /// Check if the roster changed since it was loaded or last saved
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn len(&self) -> usize {
        self.roster.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    // ==================== Student Operations ====================

    /// Add a new student
    pub fn add_student(&mut self, student: Student) -> RosterResult<()> {
        self.roster.add(student)?;
        self.dirty = true;
        Ok(())
    }

    /// Get all students in insertion order
    pub fn students(&self) -> std::slice::Iter<'_, Student> {
        self.roster.iter()
    }

    /// Find a student by roll number
    pub fn find_student(&self, roll_number: i64) -> Option<&Student> {
        self.roster.find(roll_number)
    }

    /// Replace a student's name and marks
    pub fn update_student(
        &mut self,
        roll_number: i64,
        name: impl Into<String>,
        marks: f64,
    ) -> RosterResult<&Student> {
        let student = self.roster.update(roll_number, name, marks)?;
        self.dirty = true;
        Ok(student)
    }

    /// Delete a student
    pub fn delete_student(&mut self, roll_number: i64) -> RosterResult<Student> {
        let removed = self.roster.delete(roll_number)?;
        self.dirty = true;
        Ok(removed)
    }

    /// Aggregate marks over all students
    pub fn statistics(&self) -> RosterResult<Statistics> {
        self.roster.statistics()
    }

    // ==================== Persistence ====================

    /// Write the whole roster to the store
    ///
    /// Fails with [`StorageError::SaveBlocked`] when the data file was
    /// unreadable at load time and could not be backed up.
    pub fn save(&mut self) -> StorageResult<()> {
        if self.save_blocked {
            return Err(StorageError::SaveBlocked {
                path: self.store.location().to_path_buf(),
            });
        }
        self.store.save(self.roster.as_slice())?;
        self.dirty = false;
        Ok(())
    }

    /// Persist the roster and end the run
    ///
    /// Returns the number of students written.
    pub fn shutdown(mut self) -> StorageResult<usize> {
        debug!("Shutting down registry for {:?}", self.store.location());
        self.save()?;
        Ok(self.roster.len())
    }
}

/// Back up an unreadable data file and fall back to an empty roster
///
/// The backup is best-effort: a failed copy is logged and noted in `details`.
fn recover(store: &dyn RecordStore, mut details: String) -> (Roster, LoadOutcome) {
    warn!("Starting with empty roster: {}", details);
    let backup_path = match store.backup_corrupt() {
        Ok(path) => path,
        Err(e) => {
            warn!("Could not back up {:?}: {}", store.location(), e);
            details.push_str(&format!(
                " (no backup could be made: {}; the file will not be overwritten)",
                e
            ));
            None
        }
    };
    (
        Roster::new(),
        LoadOutcome::Recovered {
            details,
            backup_path,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreFormat;
    use crate::error::RosterError;
    use crate::storage::TextFileStore;
    use std::fs;
    use std::io;
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> Config {
        Config {
            data_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        }
    }

    fn student(name: &str, roll: i64, marks: f64) -> Student {
        Student::new(name, roll, marks).unwrap()
    }

    /// Store whose writes always fail
    struct ReadOnlyStore {
        path: PathBuf,
    }

    impl RecordStore for ReadOnlyStore {
        fn location(&self) -> &Path {
            &self.path
        }

        fn load(&self) -> StorageResult<Vec<Student>> {
            Ok(vec![student("Alice", 1, 50.0)])
        }

        fn save(&self, _students: &[Student]) -> StorageResult<()> {
            Err(StorageError::from_io(
                io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
                self.path.clone(),
            ))
        }

        fn exists(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_initialize_fresh() {
        let temp_dir = TempDir::new().unwrap();
        let registry = Registry::initialize_with_config(&test_config(&temp_dir)).unwrap();

        assert_eq!(registry.load_outcome(), &LoadOutcome::Fresh);
        assert!(registry.is_empty());
        assert!(!registry.is_dirty());
    }

    #[test]
    fn test_data_persists_across_runs() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        {
            let mut registry = Registry::initialize_with_config(&config).unwrap();
            registry.add_student(student("Alice", 1, 40.0)).unwrap();
            registry.add_student(student("Bob", 2, 70.0)).unwrap();
            registry.add_student(student("Carol", 3, 100.0)).unwrap();
            assert_eq!(registry.shutdown().unwrap(), 3);
        }

        let registry = Registry::initialize_with_config(&config).unwrap();
        assert_eq!(registry.load_outcome(), &LoadOutcome::Loaded { count: 3 });
        let names: Vec<&str> = registry.students().map(|s| s.name()).collect();
        assert_eq!(names, vec!["Alice", "Bob", "Carol"]);
    }

    #[test]
    fn test_json_format_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            format: StoreFormat::Json,
            data_file: "students.json".to_string(),
            ..test_config(&temp_dir)
        };

        let mut registry = Registry::initialize_with_config(&config).unwrap();
        registry.add_student(student("Dana", 9, 61.5)).unwrap();
        registry.shutdown().unwrap();

        let registry = Registry::initialize_with_config(&config).unwrap();
        assert_eq!(registry.find_student(9).unwrap().marks(), 61.5);
    }

    #[test]
    fn test_operations_mark_dirty() {
        let temp_dir = TempDir::new().unwrap();
        let mut registry = Registry::initialize_with_config(&test_config(&temp_dir)).unwrap();

        // Failed operations leave it clean
        assert!(registry.delete_student(1).is_err());
        assert!(registry.update_student(1, "X", 1.0).is_err());
        assert!(!registry.is_dirty());

        registry.add_student(student("Alice", 1, 50.0)).unwrap();
        assert!(registry.is_dirty());

        registry.save().unwrap();
        assert!(!registry.is_dirty());

        registry.update_student(1, "Alicia", 55.0).unwrap();
        assert!(registry.is_dirty());
        registry.save().unwrap();

        registry.delete_student(1).unwrap();
        assert!(registry.is_dirty());
    }

    #[test]
    fn test_crud_through_registry() {
        let temp_dir = TempDir::new().unwrap();
        let mut registry = Registry::initialize_with_config(&test_config(&temp_dir)).unwrap();

        registry.add_student(student("Alice", 1, 40.0)).unwrap();
        assert_eq!(
            registry.add_student(student("Again", 1, 10.0)),
            Err(RosterError::DuplicateKey { roll_number: 1 })
        );
        assert_eq!(registry.len(), 1);

        let updated = registry.update_student(1, "Alicia", 45.0).unwrap();
        assert_eq!(updated.name(), "Alicia");

        let stats = registry.statistics().unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.mean, 45.0);

        let removed = registry.delete_student(1).unwrap();
        assert_eq!(removed.roll_number(), 1);
        assert!(registry.find_student(1).is_none());
        assert_eq!(registry.statistics(), Err(RosterError::EmptyCollection));
    }

    #[test]
    fn test_corrupt_file_recovers_empty_with_backup() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        fs::write(config.data_path(), "Alice\n1\n50\nBob\n2\n").unwrap();

        let registry = Registry::initialize_with_config(&config).unwrap();
        assert!(registry.is_empty());

        match registry.load_outcome() {
            LoadOutcome::Recovered {
                details,
                backup_path,
            } => {
                assert!(details.contains("Corrupted data"));
                let backup = backup_path.as_ref().unwrap();
                assert_eq!(
                    fs::read_to_string(backup).unwrap(),
                    "Alice\n1\n50\nBob\n2\n"
                );
            }
            other => panic!("expected Recovered, got {:?}", other),
        }
    }

    #[test]
    fn test_failed_backup_still_opens_but_blocks_save() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        fs::write(config.data_path(), "Alice\n1\n").unwrap();
        // A directory where the backup copy should go makes the copy fail
        fs::create_dir(temp_dir.path().join("students.dat.corrupt.backup")).unwrap();

        let mut registry = Registry::initialize_with_config(&config).unwrap();
        assert!(registry.is_empty());
        match registry.load_outcome() {
            LoadOutcome::Recovered {
                details,
                backup_path,
            } => {
                assert!(details.contains("no backup could be made"));
                assert!(backup_path.is_none());
            }
            other => panic!("expected Recovered, got {:?}", other),
        }

        registry.add_student(student("Bob", 2, 60.0)).unwrap();
        let err = registry.shutdown().unwrap_err();
        assert!(matches!(err, StorageError::SaveBlocked { .. }));
        assert_eq!(
            fs::read_to_string(config.data_path()).unwrap(),
            "Alice\n1\n"
        );
    }

    #[test]
    fn test_duplicate_rolls_on_disk_recover_empty() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        fs::write(config.data_path(), "Alice\n1\n50\nBob\n1\n60\n").unwrap();

        let registry = Registry::initialize_with_config(&config).unwrap();
        assert!(registry.is_empty());
        assert!(matches!(
            registry.load_outcome(),
            LoadOutcome::Recovered { .. }
        ));
    }

    #[test]
    fn test_empty_existing_file_is_loaded() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        fs::write(config.data_path(), "").unwrap();

        let registry = Registry::initialize_with_config(&config).unwrap();
        assert_eq!(registry.load_outcome(), &LoadOutcome::Loaded { count: 0 });
    }

    #[test]
    fn test_save_failure_is_reported() {
        let store = ReadOnlyStore {
            path: PathBuf::from("/readonly/students.dat"),
        };
        let mut registry = Registry::with_store(Box::new(store)).unwrap();
        registry.add_student(student("Bob", 2, 60.0)).unwrap();

        let err = registry.shutdown().unwrap_err();
        assert!(matches!(err, StorageError::PermissionDenied { .. }));
    }

    #[test]
    fn test_with_store_explicit() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.dat");
        let store = TextFileStore::new(path.clone());

        let mut registry = Registry::with_store(Box::new(store)).unwrap();
        assert_eq!(registry.location(), path.as_path());
        registry.add_student(student("Eve", 5, 77.0)).unwrap();
        registry.shutdown().unwrap();

        assert_eq!(fs::read_to_string(path).unwrap(), "Eve\n5\n77\n");
    }
}
