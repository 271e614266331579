//! Storage layer
//!
//! Whole-roster persistence behind the [`RecordStore`] trait.
//!
//! ## Formats
//!
//! - **Text** (default): three lines per student, see [`text`]
//! - **JSON**: an array of student objects, see [`json`]
//!
//! Both load an empty roster when the file is missing and write atomically.

pub mod error;
pub mod json;
pub mod persistence;
pub mod text;

pub use error::{StorageError, StorageResult};
pub use json::JsonFileStore;
pub use persistence::{open_store, RecordStore};
pub use text::TextFileStore;
