//! Interactive menu shell
//!
//! The numbered menu used when `rollbook` runs without a subcommand. Every
//! action reports its own failure and returns to the menu; only end of input
//! or the Exit entry leaves the loop.

use std::io::{BufRead, Write};

use anyhow::{anyhow, Result};

use rollbook_core::{Registry, RosterError, Student};

use crate::output::{format_statistics, format_table};
use crate::prompt::read_line;

const MENU: &str = "
Main Menu:
1. Add Student
2. Display All Students
3. Search Student
4. Update Student
5. Delete Student
6. Show Statistics
7. Exit";

/// Run the menu loop until Exit or end of input
pub fn run(registry: &mut Registry, input: &mut impl BufRead, out: &mut impl Write) -> Result<()> {
    writeln!(out, "=== STUDENT MANAGEMENT SYSTEM ===")?;

    loop {
        writeln!(out, "{}", MENU)?;
        let Some(choice) = read_line(input, out, "Enter your choice (1-7): ")? else {
            writeln!(out)?;
            break;
        };

        let result = match choice.trim() {
            "1" => add_student(registry, input, out),
            "2" => display_all(registry, out),
            "3" => search_student(registry, input, out),
            "4" => update_student(registry, input, out),
            "5" => delete_student(registry, input, out),
            "6" => show_statistics(registry, out),
            "7" => {
                writeln!(out, "Exiting... Thank you for using the system!")?;
                break;
            }
            _ => {
                writeln!(out, "Invalid choice! Please enter 1-7.")?;
                continue;
            }
        };

        if let Err(e) = result {
            writeln!(out, "Error: {}", e)?;
        }
    }

    Ok(())
}

fn add_student(
    registry: &mut Registry,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    writeln!(out, "\nEnter Student Details:")?;
    let name = ask(input, out, "Name: ")?;
    let roll_number = ask_roll_number(input, out, "Roll No: ")?;
    let marks = ask_marks(input, out, "Marks: ")?;

    registry.add_student(Student::new(name, roll_number, marks)?)?;
    writeln!(out, "Student added successfully!")?;
    Ok(())
}

fn display_all(registry: &Registry, out: &mut impl Write) -> Result<()> {
    if registry.is_empty() {
        writeln!(out, "No students found!")?;
        return Ok(());
    }
    write!(out, "\n{}", format_table(registry.students()))?;
    Ok(())
}

fn search_student(
    registry: &Registry,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    let roll_number = ask_roll_number(input, out, "Enter Roll No to search: ")?;
    let student = registry
        .find_student(roll_number)
        .ok_or(RosterError::NotFound { roll_number })?;

    write!(out, "\nStudent Found:\n{}", format_table([student]))?;
    Ok(())
}

fn update_student(
    registry: &mut Registry,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    let roll_number = ask_roll_number(input, out, "Enter Roll No to update: ")?;
    if registry.find_student(roll_number).is_none() {
        return Err(RosterError::NotFound { roll_number }.into());
    }

    let name = ask(input, out, "Enter new Name: ")?;
    let marks = ask_marks(input, out, "Enter new Marks: ")?;

    registry.update_student(roll_number, name, marks)?;
    writeln!(out, "Student details updated successfully!")?;
    Ok(())
}

fn delete_student(
    registry: &mut Registry,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    let roll_number = ask_roll_number(input, out, "Enter Roll No to delete: ")?;
    registry.delete_student(roll_number)?;
    writeln!(out, "Student deleted successfully!")?;
    Ok(())
}

fn show_statistics(registry: &Registry, out: &mut impl Write) -> Result<()> {
    match registry.statistics() {
        Ok(stats) => {
            write!(out, "\n--- Statistics ---\n{}", format_statistics(&stats))?;
        }
        Err(RosterError::EmptyCollection) => writeln!(out, "No students found!")?,
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

/// Read a line, treating end of input as an error
fn ask(input: &mut impl BufRead, out: &mut impl Write, prompt: &str) -> Result<String> {
    read_line(input, out, prompt)?.ok_or_else(|| anyhow!("Input closed"))
}

fn ask_roll_number(input: &mut impl BufRead, out: &mut impl Write, prompt: &str) -> Result<i64> {
    ask(input, out, prompt)?
        .trim()
        .parse()
        .map_err(|_| anyhow!("Invalid input for roll number"))
}

fn ask_marks(input: &mut impl BufRead, out: &mut impl Write, prompt: &str) -> Result<f64> {
    ask(input, out, prompt)?
        .trim()
        .parse()
        .map_err(|_| anyhow!("Invalid input for marks"))
}
