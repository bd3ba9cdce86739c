//! Fatal error types for the schema-to-header pipeline.
//!
//! Non-fatal issues (keyword collisions, unsafe overrides, ...) are not
//! errors at all — see [`crate::diagnostics`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenError {
    /// The metaModel JSON decoded but is structurally invalid: a required
    /// key is missing, an unknown `TypeExpr.kind` was seen, or a reference
    /// points at an undeclared name.
    #[error("bad schema at {path}: {message}")]
    BadSchema { path: String, message: String },

    /// The schema file could not be read, the output directory could not
    /// be created, or the header could not be written.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl GenError {
    pub fn bad_schema(path: impl Into<String>, message: impl Into<String>) -> Self {
        GenError::BadSchema {
            path: path.into(),
            message: message.into(),
        }
    }
}
