//! In-memory student roster
//!
//! An insertion-ordered collection of [`Student`]s keyed by roll number.
//! Lookups are linear scans; rosters are small and order matters for display.

use serde::Serialize;
use tracing::debug;

use crate::error::{RosterError, RosterResult};
use crate::models::Student;

/// Ordered collection of students with unique roll numbers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    students: Vec<Student>,
}

/// Aggregate marks over the whole roster
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Statistics {
    pub count: usize,
    pub mean: f64,
    pub max: f64,
    pub min: f64,
}

impl Roster {
    /// Create an empty roster
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a roster from loaded records, rejecting duplicate roll numbers
    pub fn from_records(records: impl IntoIterator<Item = Student>) -> RosterResult<Self> {
        let mut roster = Self::new();
        for student in records {
            roster.add(student)?;
        }
        Ok(roster)
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Students in insertion order
    pub fn as_slice(&self) -> &[Student] {
        &self.students
    }

    /// Iterate students in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Student> {
        self.students.iter()
    }

    /// Append a student
    pub fn add(&mut self, student: Student) -> RosterResult<()> {
        let roll_number = student.roll_number();
        if self.position(roll_number).is_some() {
            return Err(RosterError::DuplicateKey { roll_number });
        }
        debug!(roll_number, "Adding student");
        self.students.push(student);
        Ok(())
    }

    /// Index of the student with the given roll number
    pub fn position(&self, roll_number: i64) -> Option<usize> {
        self.students
            .iter()
            .position(|s| s.roll_number() == roll_number)
    }

    /// Find a student by roll number
    pub fn find(&self, roll_number: i64) -> Option<&Student> {
        self.position(roll_number).map(|i| &self.students[i])
    }

    /// Replace the name and marks of an existing student
    ///
    /// Both fields are validated before either is applied.
    pub fn update(
        &mut self,
        roll_number: i64,
        name: impl Into<String>,
        marks: f64,
    ) -> RosterResult<&Student> {
        let index = self
            .position(roll_number)
            .ok_or(RosterError::NotFound { roll_number })?;

        let student = &mut self.students[index];
        student.update(name, marks)?;
        debug!(roll_number, "Updated student");
        Ok(student)
    }

    /// Remove a student, keeping the order of the rest
    pub fn delete(&mut self, roll_number: i64) -> RosterResult<Student> {
        let index = self
            .position(roll_number)
            .ok_or(RosterError::NotFound { roll_number })?;
        debug!(roll_number, "Deleting student");
        Ok(self.students.remove(index))
    }

    /// Count, mean, max and min of marks
    pub fn statistics(&self) -> RosterResult<Statistics> {
        let first = self.students.first().ok_or(RosterError::EmptyCollection)?;

        let mut total = 0.0;
        let mut max = first.marks();
        let mut min = first.marks();
        for student in &self.students {
            let marks = student.marks();
            total += marks;
            max = max.max(marks);
            min = min.min(marks);
        }

        let count = self.students.len();
        Ok(Statistics {
            count,
            mean: total / count as f64,
            max,
            min,
        })
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Student;
    type IntoIter = std::slice::Iter<'a, Student>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
