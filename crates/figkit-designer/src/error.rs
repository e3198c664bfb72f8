//! Error types for the designer crate.

use std::io;
use thiserror::Error;

use figkit_core::{ElementId, GeometryError};

use crate::backend::BackendError;

/// Errors produced by selection, gestures, history and save.
#[derive(Error, Debug)]
pub enum EditError {
    /// The element no longer exists in the figure tree.
    #[error("Element {0} no longer exists")]
    StaleElementReference(ElementId),

    /// The element does not expose the requested capability.
    #[error("{element} does not support {capability}")]
    UnsupportedCapability {
        element: ElementId,
        capability: &'static str,
    },

    /// A computed box or value cannot be represented.
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Rendered statements did not parse back to the same edits.
    #[error("Generated code does not round-trip at '{statement}': {reason}")]
    SerializationMismatch { statement: String, reason: String },

    /// Another gesture is still active.
    #[error("A gesture is already in progress")]
    GestureInProgress,

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    /// The session has no script to save into.
    #[error("No script file associated with figure {0}")]
    NoScript(u32),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// A generated statement could not be parsed.
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<GeometryError> for EditError {
    fn from(err: GeometryError) -> Self {
        EditError::DegenerateGeometry(err.to_string())
    }
}

impl EditError {
    /// Create a parse error for a 1-based line number.
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        EditError::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Result type alias for designer operations.
pub type EditResult<T> = Result<T, EditError>;
