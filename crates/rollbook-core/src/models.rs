//! Data models for Rollbook
//!
//! Defines the `Student` record. Every constructor and setter validates, so a
//! `Student` is never observable with an out-of-domain field.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Lowest accepted marks value
pub const MIN_MARKS: f64 = 0.0;
/// Highest accepted marks value
pub const MAX_MARKS: f64 = 100.0;

/// One student's identity and score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StudentFields")]
pub struct Student {
    name: String,
    roll_number: i64,
    marks: f64,
}

/// Unvalidated field set, used as the deserialization target
#[derive(Deserialize)]
struct StudentFields {
    name: String,
    roll_number: i64,
    marks: f64,
}

impl TryFrom<StudentFields> for Student {
    type Error = ValidationError;

    fn try_from(fields: StudentFields) -> Result<Self, Self::Error> {
        Student::new(fields.name, fields.roll_number, fields.marks)
    }
}

impl Student {
    /// Create a new student, validating all three fields
    pub fn new(
        name: impl Into<String>,
        roll_number: i64,
        marks: f64,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        validate_name(&name)?;
        validate_roll_number(roll_number)?;
        validate_marks(marks)?;
        Ok(Self {
            name,
            roll_number,
            marks,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn roll_number(&self) -> i64 {
        self.roll_number
    }

    pub fn marks(&self) -> f64 {
        self.marks
    }

    /// Update the name
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        Ok(())
    }

    /// Update the roll number
    ///
    /// Uniqueness is the roster's concern; this only checks the domain.
    pub fn set_roll_number(&mut self, roll_number: i64) -> Result<(), ValidationError> {
        validate_roll_number(roll_number)?;
        self.roll_number = roll_number;
        Ok(())
    }

    /// Update the marks
    pub fn set_marks(&mut self, marks: f64) -> Result<(), ValidationError> {
        validate_marks(marks)?;
        self.marks = marks;
        Ok(())
    }

    /// Replace name and marks together
    ///
    /// Both values are validated before either is applied.
    pub fn update(&mut self, name: impl Into<String>, marks: f64) -> Result<(), ValidationError> {
        let name = name.into();
        validate_name(&name)?;
        validate_marks(marks)?;
        self.name = name;
        self.marks = marks;
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    // Names are stored one per line
    if name.contains(['\n', '\r']) {
        return Err(ValidationError::MultiLineName);
    }
    Ok(())
}

fn validate_roll_number(roll_number: i64) -> Result<(), ValidationError> {
    if roll_number < 0 {
        return Err(ValidationError::NegativeRollNumber(roll_number));
    }
    Ok(())
}

fn validate_marks(marks: f64) -> Result<(), ValidationError> {
    // NaN fails the range check too
    if !(MIN_MARKS..=MAX_MARKS).contains(&marks) {
        return Err(ValidationError::MarksOutOfRange(marks));
    }
    Ok(())
}
