//! Rollbook Core Library
//!
//! This crate provides the core functionality for Rollbook, a small roster
//! manager for student records (name, roll number, marks).
//!
//! # Architecture
//!
//! - **Roster**: in-memory, insertion-ordered, unique roll numbers
//! - **Store**: whole-file persistence, loaded at startup and saved at shutdown
//!
//! # Quick Start
//!
//! ```text
//! let mut registry = Registry::initialize()?;
//!
//! registry.add_student(Student::new("Alice", 1, 88.5)?)?;
//! for student in registry.students() {
//!     println!("{} {}", student.roll_number(), student.name());
//! }
//!
//! registry.shutdown()?;
//! ```
//!
//! # Modules
//!
//! - `registry`: Load/save lifecycle (main entry point)
//! - `roster`: Collection operations and statistics
//! - `models`: The validated `Student` record
//! - `storage`: Text and JSON file stores
//! - `config`: Application configuration

pub mod config;
pub mod error;
pub mod models;
pub mod registry;
pub mod roster;
pub mod storage;

pub use config::{Config, StoreFormat};
pub use error::{RosterError, RosterResult, ValidationError};
pub use models::{Student, MAX_MARKS, MIN_MARKS};
pub use registry::{LoadOutcome, Registry};
pub use roster::{Roster, Statistics};
pub use storage::{
    open_store, JsonFileStore, RecordStore, StorageError, StorageResult, TextFileStore,
};
