//! Student command handlers

use anyhow::{bail, Context, Result};

use rollbook_core::{Registry, RosterError, Student};

use crate::output::Output;
use crate::prompt::confirm;

/// Add a new student
pub fn add(
    registry: &mut Registry,
    name: String,
    roll_number: i64,
    marks: f64,
    output: &Output,
) -> Result<()> {
    let student = Student::new(name, roll_number, marks)?;
    registry
        .add_student(student.clone())
        .context("Failed to add student")?;

    output.success(&format!("Added student {}", roll_number));
    output.print_student(&student);
    Ok(())
}

/// List all students
pub fn list(registry: &Registry, output: &Output) -> Result<()> {
    let students: Vec<&Student> = registry.students().collect();
    output.print_students(&students);
    Ok(())
}

/// Show a single student
pub fn show(registry: &Registry, roll_number: i64, output: &Output) -> Result<()> {
    let student = registry
        .find_student(roll_number)
        .ok_or(RosterError::NotFound { roll_number })?;

    output.print_student(student);
    Ok(())
}

/// Update a student's name and/or marks
///
/// Omitted fields keep their current values.
pub fn update(
    registry: &mut Registry,
    roll_number: i64,
    name: Option<String>,
    marks: Option<f64>,
    output: &Output,
) -> Result<()> {
    if name.is_none() && marks.is_none() {
        bail!("Nothing to update. Pass --name and/or --marks.");
    }

    let current = registry
        .find_student(roll_number)
        .ok_or(RosterError::NotFound { roll_number })?;
    let name = name.unwrap_or_else(|| current.name().to_string());
    let marks = marks.unwrap_or(current.marks());

    let updated = registry
        .update_student(roll_number, name, marks)
        .context("Failed to update student")?;

    output.success(&format!("Updated student {}", roll_number));
    output.print_student(updated);
    Ok(())
}

/// Delete a student
pub fn delete(registry: &mut Registry, roll_number: i64, yes: bool, output: &Output) -> Result<()> {
    let student = registry
        .find_student(roll_number)
        .ok_or(RosterError::NotFound { roll_number })?;

    if !yes && output.should_prompt() {
        println!("Delete student: {} - {}", student.roll_number(), student.name());
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    registry
        .delete_student(roll_number)
        .context("Failed to delete student")?;

    output.success(&format!("Deleted student {}", roll_number));
    Ok(())
}

/// Show count, average, highest and lowest marks
pub fn stats(registry: &Registry, output: &Output) -> Result<()> {
    let stats = registry.statistics()?;
    output.print_statistics(&stats);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use rollbook_core::{Config, TextFileStore};
    use tempfile::TempDir;

    fn registry(temp_dir: &TempDir) -> Registry {
        let config = Config {
            data_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        };
        Registry::initialize_with_config(&config).unwrap()
    }

    fn quiet() -> Output {
        Output::new(OutputFormat::Quiet)
    }

    #[test]
    fn test_add_and_show() {
        let temp_dir = TempDir::new().unwrap();
        let mut registry = registry(&temp_dir);

        add(&mut registry, "Alice".into(), 1, 80.0, &quiet()).unwrap();
        assert!(show(&registry, 1, &quiet()).is_ok());
        assert!(show(&registry, 2, &quiet()).is_err());
    }

    #[test]
    fn test_add_rejects_invalid_and_duplicate() {
        let temp_dir = TempDir::new().unwrap();
        let mut registry = registry(&temp_dir);

        assert!(add(&mut registry, "".into(), 1, 80.0, &quiet()).is_err());
        assert!(add(&mut registry, "Neg".into(), -4, 80.0, &quiet()).is_err());
        add(&mut registry, "Alice".into(), 1, 80.0, &quiet()).unwrap();

        let err = add(&mut registry, "Bob".into(), 1, 10.0, &quiet()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RosterError>(),
            Some(RosterError::DuplicateKey { roll_number: 1 })
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_update_keeps_omitted_fields() {
        let temp_dir = TempDir::new().unwrap();
        let mut registry = registry(&temp_dir);
        add(&mut registry, "Alice".into(), 1, 80.0, &quiet()).unwrap();

        update(&mut registry, 1, None, Some(90.0), &quiet()).unwrap();
        let student = registry.find_student(1).unwrap();
        assert_eq!(student.name(), "Alice");
        assert_eq!(student.marks(), 90.0);

        update(&mut registry, 1, Some("Alicia".into()), None, &quiet()).unwrap();
        let student = registry.find_student(1).unwrap();
        assert_eq!(student.name(), "Alicia");
        assert_eq!(student.marks(), 90.0);

        assert!(update(&mut registry, 1, None, None, &quiet()).is_err());
        assert!(update(&mut registry, 9, None, Some(1.0), &quiet()).is_err());
    }

    #[test]
    fn test_delete_without_prompt() {
        let temp_dir = TempDir::new().unwrap();
        let mut registry = registry(&temp_dir);
        add(&mut registry, "Alice".into(), 1, 80.0, &quiet()).unwrap();

        delete(&mut registry, 1, false, &quiet()).unwrap();
        assert!(registry.is_empty());
        assert!(delete(&mut registry, 1, true, &quiet()).is_err());
    }

    #[test]
    fn test_stats_empty_roster() {
        let temp_dir = TempDir::new().unwrap();
        let store = TextFileStore::new(temp_dir.path().join("students.dat"));
        let registry = Registry::with_store(Box::new(store)).unwrap();

        let err = stats(&registry, &quiet()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RosterError>(),
            Some(RosterError::EmptyCollection)
        ));
    }
}
