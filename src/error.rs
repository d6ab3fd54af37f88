//! Error types shared by the detector, the schema model, and the field parsers.

use std::path::PathBuf;

use thiserror::Error;

use crate::field::FieldType;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// The schema cannot be used as-is (duplicate names, missing fields, ...).
    #[error("Schema error: {note}")]
    Schema { note: String },

    #[error("Invalid detector configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to apply schema patch: {0}")]
    Patch(#[source] serde_json::Error),

    #[error("I/O error on {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON descriptor: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML descriptor: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    pub fn schema(note: impl Into<String>) -> Self {
        Error::Schema { note: note.into() }
    }
}

/// A cell that does not satisfy a field's type or format.
///
/// During detection this is ordinary evidence for the scorer and never
/// escapes as a failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cell '{cell}' does not match field '{field}' of type '{field_type}'")]
pub struct CellError {
    pub field: String,
    pub field_type: FieldType,
    pub cell: String,
}
