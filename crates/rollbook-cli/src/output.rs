//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use rollbook_core::{Statistics, Student};

/// Width of the name column in tables
const NAME_WIDTH: usize = 20;
/// Width of the roll number and marks columns
const NUMBER_WIDTH: usize = 10;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print a single student
    pub fn print_student(&self, student: &Student) {
        match self.format {
            OutputFormat::Human => print!("{}", format_table(std::iter::once(student))),
            OutputFormat::Json => print_json(student),
            OutputFormat::Quiet => println!("{}", student.roll_number()),
        }
    }

    /// Print a list of students
    pub fn print_students(&self, students: &[&Student]) {
        match self.format {
            OutputFormat::Human => {
                if students.is_empty() {
                    println!("No students found.");
                    return;
                }
                print!("{}", format_table(students.iter().copied()));
                println!("\n{} student(s)", students.len());
            }
            OutputFormat::Json => print_json(&students),
            OutputFormat::Quiet => {
                for student in students {
                    println!("{}", student.roll_number());
                }
            }
        }
    }

    /// Print roster statistics
    pub fn print_statistics(&self, stats: &Statistics) {
        match self.format {
            OutputFormat::Human => print!("{}", format_statistics(stats)),
            OutputFormat::Json => print_json(stats),
            OutputFormat::Quiet => println!("{}", stats.count),
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a warning to stderr (shown in every mode but quiet)
    pub fn warning(&self, msg: &str) {
        if !self.is_quiet() {
            eprintln!("⚠ {}", msg);
        }
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to encode JSON output: {}", e),
    }
}

/// Render students as a fixed-width table with a header
pub fn format_table<'a>(students: impl IntoIterator<Item = &'a Student>) -> String {
    let mut out = format!(
        "{:<name$}{:<num$}{:<num$}\n{}\n",
        "Name",
        "Roll No",
        "Marks",
        "-".repeat(NAME_WIDTH + 2 * NUMBER_WIDTH),
        name = NAME_WIDTH,
        num = NUMBER_WIDTH,
    );
    for student in students {
        out.push_str(&format!(
            "{:<name$}{:<num$}{:<num$}\n",
            truncate(student.name(), NAME_WIDTH - 1),
            student.roll_number(),
            student.marks(),
            name = NAME_WIDTH,
            num = NUMBER_WIDTH,
        ));
    }
    out
}

/// Render statistics as labelled lines
pub fn format_statistics(stats: &Statistics) -> String {
    format!(
        "Total Students: {}\nAverage Marks:  {:.2}\nHighest Marks:  {}\nLowest Marks:   {}\n",
        stats.count, stats.mean, stats.max, stats.min
    )
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
