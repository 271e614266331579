//! Line-oriented text store
//!
//! Each student occupies three consecutive lines: name, roll number, marks.
//! There is no header, count or separator; end of file ends the roster.
//!
//! ```text
//! Alice
//! 1
//! 88.5
//! Bob
//! 2
//! 70
//! ```

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use tracing::info;

use super::error::{StorageError, StorageResult};
use super::persistence::{atomic_write, read_optional, RecordStore};
use crate::models::Student;

/// Lines per stored student
const FIELDS_PER_RECORD: usize = 3;

/// Text file store (the default format)
#[derive(Debug, Clone)]
pub struct TextFileStore {
    path: PathBuf,
}

impl TextFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordStore for TextFileStore {
    fn location(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StorageResult<Vec<Student>> {
        let Some(content) = read_optional(&self.path)? else {
            return Ok(Vec::new());
        };
        let students = decode(&content, &self.path)?;
        info!("Loaded {} student(s) from {:?}", students.len(), self.path);
        Ok(students)
    }

    fn save(&self, students: &[Student]) -> StorageResult<()> {
        atomic_write(&self.path, encode(students).as_bytes())?;
        info!("Saved {} student(s) to {:?}", students.len(), self.path);
        Ok(())
    }
}

/// Serialize students as name / roll number / marks lines
pub fn encode(students: &[Student]) -> String {
    let mut out = String::new();
    for student in students {
        // Writing to a String cannot fail
        let _ = writeln!(out, "{}", student.name());
        let _ = writeln!(out, "{}", student.roll_number());
        let _ = writeln!(out, "{}", student.marks());
    }
    out
}

/// Parse the text layout, failing on the first malformed record
///
/// `path` is only used for error context.
pub fn decode(content: &str, path: &Path) -> StorageResult<Vec<Student>> {
    // Only truly empty trailing lines; " " is a valid name
    let mut lines: Vec<&str> = content.lines().collect();
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    let corrupt = |line: usize, details: String| StorageError::CorruptData {
        path: path.to_path_buf(),
        line,
        details,
    };

    let mut students = Vec::with_capacity(lines.len() / FIELDS_PER_RECORD);
    for (index, record) in lines.chunks(FIELDS_PER_RECORD).enumerate() {
        let first_line = index * FIELDS_PER_RECORD + 1;

        let [name, roll, marks] = record else {
            let missing = if record.len() == 1 { "roll number" } else { "marks" };
            return Err(corrupt(
                first_line + record.len(),
                format!("truncated record, missing {}", missing),
            ));
        };

        let roll_number: i64 = roll.trim().parse().map_err(|e| {
            corrupt(
                first_line + 1,
                format!("invalid roll number {:?}: {}", roll, e),
            )
        })?;
        let marks: f64 = marks
            .trim()
            .parse()
            .map_err(|e| corrupt(first_line + 2, format!("invalid marks {:?}: {}", marks, e)))?;

        let student = Student::new(*name, roll_number, marks)
            .map_err(|e| corrupt(first_line, format!("invalid record: {}", e)))?;
        students.push(student);
    }

    Ok(students)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn path() -> PathBuf {
        PathBuf::from("students.dat")
    }

    fn sample() -> Vec<Student> {
        vec![
            Student::new("Alice Smith", 1, 88.5).unwrap(),
            Student::new("Bob", 2, 70.0).unwrap(),
            Student::new("Carol", 0, 100.0).unwrap(),
        ]
    }

    #[test]
    fn test_encode_layout() {
        let text = encode(&sample()[..2]);
        assert_eq!(text, "Alice Smith\n1\n88.5\nBob\n2\n70\n");
        assert_eq!(encode(&[]), "");
    }

    #[test]
    fn test_decode() {
        let students = decode("Alice Smith\n1\n88.5\nBob\n2\n70\n", &path()).unwrap();
        assert_eq!(students.len(), 2);
        assert_eq!(students[0].name(), "Alice Smith");
        assert_eq!(students[1].roll_number(), 2);
        assert_eq!(students[1].marks(), 70.0);
    }

    #[test]
    fn test_decode_tolerates_crlf_and_trailing_blank_lines() {
        let students = decode("Alice\r\n1\r\n50\r\n\n\n", &path()).unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].name(), "Alice");
        assert!(decode("", &path()).unwrap().is_empty());
    }

    #[test]
    fn test_decode_truncated_record() {
        let err = decode("Alice\n1\n50\nBob\n2\n", &path()).unwrap_err();
        match err {
            StorageError::CorruptData { line, details, .. } => {
                assert_eq!(line, 6);
                assert!(details.contains("marks"));
            }
            other => panic!("expected CorruptData, got {:?}", other),
        }

        let err = decode("Alice\n1\n50\nBob\n", &path()).unwrap_err();
        assert!(matches!(err, StorageError::CorruptData { line: 5, .. }));
    }

    #[test]
    fn test_decode_whitespace_trailing_line_is_a_record() {
        // A whitespace-only name that lost its roll number and marks
        let err = decode("Alice\n1\n50\n \n", &path()).unwrap_err();
        match err {
            StorageError::CorruptData { line, details, .. } => {
                assert_eq!(line, 5);
                assert!(details.contains("roll number"));
            }
            other => panic!("expected CorruptData, got {:?}", other),
        }

        let students = decode("Alice\n1\n50\n \n2\n70\n\n", &path()).unwrap();
        assert_eq!(students[1].name(), " ");
    }

    #[test]
    fn test_decode_unparsable_numbers() {
        let err = decode("Alice\none\n50\n", &path()).unwrap_err();
        assert!(matches!(err, StorageError::CorruptData { line: 2, .. }));

        let err = decode("Alice\n1\nfifty\n", &path()).unwrap_err();
        assert!(matches!(err, StorageError::CorruptData { line: 3, .. }));
    }

    #[test]
    fn test_decode_out_of_domain_values() {
        let err = decode("Alice\n-1\n50\n", &path()).unwrap_err();
        assert!(err.is_corrupt());

        let err = decode("Alice\n1\n150\n", &path()).unwrap_err();
        assert!(err.is_corrupt());

        let err = decode("\n1\n50\n", &path()).unwrap_err();
        assert!(matches!(err, StorageError::CorruptData { line: 1, .. }));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = TextFileStore::new(temp_dir.path().join("students.dat"));

        assert!(!store.exists());
        assert!(store.load().unwrap().is_empty());

        store.save(&sample()).unwrap();
        assert!(store.exists());
        assert_eq!(store.load().unwrap(), sample());
    }

    #[test]
    fn test_save_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let store = TextFileStore::new(temp_dir.path().join("students.dat"));

        store.save(&sample()).unwrap();
        store.save(&sample()[2..]).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name(), "Carol");
    }

    #[test]
    fn test_load_truncated_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("students.dat");
        fs::write(&path, "Alice\n1\n50\nBob\n2").unwrap();

        let store = TextFileStore::new(path.clone());
        assert!(store.load().unwrap_err().is_corrupt());
    }
}
