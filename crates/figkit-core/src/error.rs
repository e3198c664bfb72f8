//! Error handling for FigKit core types
//!
//! Provides error types for the lowest layer of the workspace:
//! - Geometry errors (non-finite or collapsed boxes)
//! - Unit errors (length parsing)
//! - Reference errors (element reference parsing)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Geometry error type
///
/// Raised when a bounding box or point cannot be represented in
/// figure-fraction space.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A coordinate was NaN or infinite
    #[error("Non-finite coordinate in {context}")]
    NonFinite {
        /// Where the value came from.
        context: String,
    },

    /// A box collapsed to zero or negative extent
    #[error("Degenerate extent: width {width}, height {height}")]
    DegenerateExtent {
        /// The offending width.
        width: f64,
        /// The offending height.
        height: f64,
    },
}

/// Unit error type
///
/// Represents failures while parsing or converting physical lengths.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnitError {
    /// Unit suffix is not known
    #[error("Unknown length unit: {0}")]
    UnknownUnit(String),

    /// Numeric part could not be parsed
    #[error("Invalid length '{input}': {reason}")]
    InvalidLength {
        /// The raw input.
        input: String,
        /// Why parsing failed.
        reason: String,
    },

    /// Conversion against a zero-sized figure
    #[error("Figure extent must be positive, got {0}")]
    ZeroExtent(f64),
}

/// Element reference error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReferenceError {
    /// The reference text does not follow `plt.figure(N).attr[i]...`
    #[error("Invalid element reference '{input}': {reason}")]
    Invalid {
        /// The raw reference text.
        input: String,
        /// What was expected at the failure point.
        reason: String,
    },
}

/// Main error type for FigKit core
#[derive(Error, Debug)]
pub enum Error {
    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Unit error
    #[error(transparent)]
    Unit(#[from] UnitError),

    /// Reference error
    #[error(transparent)]
    Reference(#[from] ReferenceError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a geometry error
    pub fn is_geometry_error(&self) -> bool {
        matches!(self, Error::Geometry(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
